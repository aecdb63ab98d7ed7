//! Employee resource: data types and document store.
//!
//! This module handles:
//! - Wire and stored employee types
//! - The `EmployeeStore` seam used by the HTTP handlers
//! - MongoDB store and the in-memory store used in tests

pub mod memory;
pub mod mongo;
pub mod store;
pub mod types;

use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::error::StoreError;

pub use memory::{MemoryEmployeeStore, MemoryStoreConfig};
pub use mongo::MongoEmployeeStore;
pub use store::{EmployeeStore, StoreOperation};
pub use types::{Employee, EmployeeDocument, EmployeeFields, EmployeeId};

/// Build the store selected by `config.store_backend`.
pub async fn connect(config: &Config) -> Result<Arc<dyn EmployeeStore>, StoreError> {
    match config.store_backend {
        StoreBackend::Mongo => Ok(Arc::new(MongoEmployeeStore::connect(config).await?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryEmployeeStore::new())),
    }
}
