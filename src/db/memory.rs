use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{seed, EmployeeStore, SeedOutcome};
use crate::errors::StoreError;
use crate::models::employee::{next_employee_code, Employee, EmployeeUpdate, NewEmployee};

#[derive(Default)]
struct Inner {
    employees: Vec<Employee>,
    last_code: u32,
}

impl Inner {
    fn insert(&mut self, new_employee: NewEmployee) -> Employee {
        let (number, code) = next_employee_code(
            self.employees.iter().filter_map(|e| e.employee_id.as_deref()),
            self.last_code,
        );
        self.last_code = number;
        let employee = Employee::from_new(new_employee, Some(code), Utc::now());
        self.employees.push(employee.clone());
        employee
    }

    fn find_mut(&mut self, id: Uuid) -> Result<&mut Employee, StoreError> {
        self.employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound)
    }
}

/// Ephemeral store keeping records in insertion order. The code counter
/// only moves forward, so deleted codes are not handed out again.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.inner.read().await.employees.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Employee, StoreError> {
        self.inner
            .read()
            .await
            .employees
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, new_employee: NewEmployee) -> Result<Employee, StoreError> {
        Ok(self.inner.write().await.insert(new_employee))
    }

    async fn update(&self, id: Uuid, update: EmployeeUpdate) -> Result<Employee, StoreError> {
        let mut inner = self.inner.write().await;
        let employee = inner.find_mut(id)?;
        employee.apply(update, Utc::now());
        Ok(employee.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let position = inner
            .employees
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::NotFound)?;
        inner.employees.remove(position);
        Ok(())
    }

    async fn toggle_status(&self, id: Uuid) -> Result<Employee, StoreError> {
        let mut inner = self.inner.write().await;
        let employee = inner.find_mut(id)?;
        employee.is_active = !employee.is_active;
        employee.updated_at = Utc::now();
        Ok(employee.clone())
    }

    async fn seed(&self) -> Result<SeedOutcome, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.employees.is_empty() {
            return Ok(SeedOutcome::AlreadyPopulated);
        }
        let samples = seed::sample_employees();
        let count = samples.len();
        for sample in samples {
            inner.insert(sample);
        }
        Ok(SeedOutcome::Seeded(count))
    }
}
