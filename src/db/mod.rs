pub mod memory;
pub mod seed;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use uuid::Uuid;

use crate::config::{ServerConfig, StoreKind};
use crate::errors::StoreError;
use crate::models::employee::{Employee, EmployeeUpdate, NewEmployee};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Result of a `seed()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(usize),
    AlreadyPopulated,
}

impl SeedOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SeedOutcome::Seeded(_) => seed::SEEDED_MESSAGE,
            SeedOutcome::AlreadyPopulated => seed::ALREADY_SEEDED_MESSAGE,
        }
    }
}

/// The authoritative collection of employee records.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Employee>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Employee, StoreError>;

    /// Stores a new record, assigning its `id` and next `EMP###` code.
    async fn create(&self, new_employee: NewEmployee) -> Result<Employee, StoreError>;

    async fn update(&self, id: Uuid, update: EmployeeUpdate) -> Result<Employee, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    async fn toggle_status(&self, id: Uuid) -> Result<Employee, StoreError>;

    /// Writes the sample set when the store is empty, otherwise nothing.
    async fn seed(&self) -> Result<SeedOutcome, StoreError>;
}

pub async fn create_store(config: &ServerConfig) -> Result<Arc<dyn EmployeeStore>, StoreError> {
    match config.store {
        StoreKind::Memory => {
            info!("Using in-memory employee store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreKind::Sqlite => {
            info!("Using sqlite employee store at {}", config.database_url);
            let store = SqliteStore::connect(&config.database_url, config.max_connections).await?;
            Ok(Arc::new(store))
        }
    }
}
