//! Store abstraction shared by the HTTP handlers.

use async_trait::async_trait;
use strum::{Display, IntoStaticStr};

use crate::config::StoreBackend;
use crate::error::StoreError;

use super::types::{Employee, EmployeeFields, EmployeeId};

/// Store operations, used as metric and log labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StoreOperation {
    Ping,
    List,
    Insert,
    Get,
    Update,
    Delete,
    Count,
}

/// Persistence for employee documents.
///
/// Implementations must be safe to share across concurrent requests without
/// external locking. Each method is a single round-trip to the store.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Which backend this is.
    fn backend(&self) -> StoreBackend;

    /// Cheap liveness check.
    async fn ping(&self) -> Result<(), StoreError>;

    /// All documents, in store-native order.
    async fn list(&self) -> Result<Vec<Employee>, StoreError>;

    /// Insert a new document and return its generated id.
    async fn insert(&self, fields: &EmployeeFields) -> Result<EmployeeId, StoreError>;

    /// Fetch one document. [`StoreError::NotFound`] if absent.
    async fn get(&self, id: EmployeeId) -> Result<Employee, StoreError>;

    /// Replace name, salary and age. [`StoreError::NotFound`] if absent.
    async fn update(&self, id: EmployeeId, fields: &EmployeeFields) -> Result<(), StoreError>;

    /// Remove one document, returning how many were removed (0 or 1).
    async fn delete(&self, id: EmployeeId) -> Result<u64, StoreError>;

    /// Number of documents in the collection.
    async fn count(&self) -> Result<u64, StoreError>;
}
