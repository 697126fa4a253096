use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use super::{seed, EmployeeStore, SeedOutcome};
use crate::errors::StoreError;
use crate::models::employee::{format_employee_code, Employee, EmployeeUpdate, NewEmployee};

const EMPLOYEE_COLUMNS: &str =
    "id, employee_id, full_name, gender, date_of_birth, profile_image, state, is_active, created_at, updated_at";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Persisted store backed by a sqlx sqlite pool.
///
/// Every write either is a single statement or opens its transaction with a
/// write, so concurrent writers queue on the busy timeout instead of failing
/// on a lock upgrade.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        // every connection to an in-memory database gets its own database,
        // and closing the last one discards it
        let (pool_options, connect_options) = if in_memory {
            let pool_options = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (pool_options, SqliteConnectOptions::from_str(database_url)?)
        } else {
            let connect_options = SqliteConnectOptions::from_str(database_url)?
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(BUSY_TIMEOUT);
            (SqlitePoolOptions::new().max_connections(max_connections.max(1)), connect_options)
        };

        let pool = pool_options.connect_with(connect_options).await?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, bringing its schema up to date.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Employee schema is up to date");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn fetch_employee(conn: &mut SqliteConnection, id: Uuid) -> Result<Employee, StoreError> {
    sqlx::query_as::<_, Employee>(&format!("SELECT {} FROM employees WHERE id = ?1", EMPLOYEE_COLUMNS))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(StoreError::NotFound)
}

/// Reserves the next `EMP###` code: one past the larger of the stored
/// high-water mark and the highest code still present. A single write, so it
/// takes the write lock as the first statement of the enclosing transaction.
async fn next_employee_code(conn: &mut SqliteConnection) -> Result<String, StoreError> {
    let next: i64 = sqlx::query_scalar(
        "UPDATE employee_code_sequence \
         SET last_value = MAX(last_value, COALESCE((SELECT MAX(CAST(SUBSTR(employee_id, 4) AS INTEGER)) \
             FROM employees WHERE employee_id LIKE 'EMP%'), 0)) + 1 \
         WHERE id = 1 \
         RETURNING last_value",
    )
    .fetch_one(&mut *conn)
    .await?;

    let next = u32::try_from(next).map_err(|_| StoreError::Database(format!("employee code counter overflow: {}", next)))?;
    Ok(format_employee_code(next))
}

async fn insert_employee(conn: &mut SqliteConnection, new_employee: NewEmployee) -> Result<Employee, StoreError> {
    let employee_id = next_employee_code(&mut *conn).await?;
    let employee = Employee::from_new(new_employee, Some(employee_id), Utc::now());

    sqlx::query(
        "INSERT INTO employees (id, employee_id, full_name, gender, date_of_birth, profile_image, state, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(employee.id)
    .bind(&employee.employee_id)
    .bind(&employee.full_name)
    .bind(employee.gender)
    .bind(employee.date_of_birth)
    .bind(&employee.profile_image)
    .bind(&employee.state)
    .bind(employee.is_active)
    .bind(employee.created_at)
    .bind(employee.updated_at)
    .execute(&mut *conn)
    .await?;

    debug!("Inserted employee {} ({:?})", employee.id, employee.employee_id);
    Ok(employee)
}

#[async_trait]
impl EmployeeStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees ORDER BY created_at DESC, rowid DESC",
            EMPLOYEE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    async fn get(&self, id: Uuid) -> Result<Employee, StoreError> {
        let mut conn = self.pool.acquire().await?;
        fetch_employee(&mut conn, id).await
    }

    async fn create(&self, new_employee: NewEmployee) -> Result<Employee, StoreError> {
        let mut tx = self.pool.begin().await?;
        let employee = insert_employee(&mut tx, new_employee).await?;
        tx.commit().await?;
        Ok(employee)
    }

    async fn update(&self, id: Uuid, update: EmployeeUpdate) -> Result<Employee, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "UPDATE employees SET full_name = COALESCE(?1, full_name), gender = COALESCE(?2, gender), \
             date_of_birth = COALESCE(?3, date_of_birth), profile_image = COALESCE(?4, profile_image), \
             state = COALESCE(?5, state), is_active = COALESCE(?6, is_active), updated_at = ?7 \
             WHERE id = ?8 RETURNING {}",
            EMPLOYEE_COLUMNS
        ))
        .bind(update.full_name)
        .bind(update.gender)
        .bind(update.date_of_birth)
        .bind(update.profile_image)
        .bind(update.state)
        .bind(update.is_active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        debug!("Updated employee {}", employee.id);
        Ok(employee)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn toggle_status(&self, id: Uuid) -> Result<Employee, StoreError> {
        sqlx::query_as::<_, Employee>(&format!(
            "UPDATE employees SET is_active = NOT is_active, updated_at = ?1 WHERE id = ?2 RETURNING {}",
            EMPLOYEE_COLUMNS
        ))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn seed(&self) -> Result<SeedOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        // write lock before the emptiness check
        sqlx::query("UPDATE employee_code_sequence SET last_value = last_value WHERE id = 1")
            .execute(&mut *tx)
            .await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            return Ok(SeedOutcome::AlreadyPopulated);
        }

        let samples = seed::sample_employees();
        let inserted = samples.len();
        for sample in samples {
            insert_employee(&mut tx, sample).await?;
        }
        tx.commit().await?;

        info!("Seeded {} sample employees", inserted);
        Ok(SeedOutcome::Seeded(inserted))
    }
}
