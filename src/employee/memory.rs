//! In-memory employee store.
//!
//! Backs the service when `STORE_BACKEND=memory` and stands in for MongoDB in
//! tests. Failures can be injected per operation.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::config::StoreBackend;
use crate::error::StoreError;

use super::store::{EmployeeStore, StoreOperation};
use super::types::{Employee, EmployeeFields, EmployeeId};

/// Configuration for injected failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreConfig {
    /// Fail `ping` and `count`.
    pub fail_ping: bool,
    /// Fail `list`.
    pub fail_list: bool,
    /// Fail `insert`.
    pub fail_insert: bool,
    /// Fail `get`.
    pub fail_get: bool,
    /// Fail `update`.
    pub fail_update: bool,
    /// Fail `delete`.
    pub fail_delete: bool,
}

impl MemoryStoreConfig {
    /// Fail every operation.
    pub fn failing() -> Self {
        Self {
            fail_ping: true,
            fail_list: true,
            fail_insert: true,
            fail_get: true,
            fail_update: true,
            fail_delete: true,
        }
    }
}

/// Employee store held in a concurrent map.
#[derive(Debug, Clone, Default)]
pub struct MemoryEmployeeStore {
    /// Injected failure switches.
    config: MemoryStoreConfig,
    /// Documents by id.
    employees: Arc<DashMap<EmployeeId, EmployeeFields>>,
}

impl MemoryEmployeeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with injected failures.
    pub fn with_config(config: MemoryStoreConfig) -> Self {
        Self {
            config,
            employees: Arc::new(DashMap::new()),
        }
    }

    /// Seed a document directly, bypassing failure injection.
    pub fn seed(&self, fields: EmployeeFields) -> EmployeeId {
        let id = EmployeeId::generate();
        self.employees.insert(id, fields);
        id
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    fn check(&self, fail: bool, operation: StoreOperation) -> Result<(), StoreError> {
        if fail {
            return Err(StoreError::Unavailable(format!(
                "in-memory store {operation} failure"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Memory
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check(self.config.fail_ping, StoreOperation::Ping)
    }

    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        self.check(self.config.fail_list, StoreOperation::List)?;
        Ok(self
            .employees
            .iter()
            .map(|entry| Employee::from_fields(entry.key().to_string(), entry.value().clone()))
            .collect())
    }

    async fn insert(&self, fields: &EmployeeFields) -> Result<EmployeeId, StoreError> {
        self.check(self.config.fail_insert, StoreOperation::Insert)?;
        let id = EmployeeId::generate();
        self.employees.insert(id, fields.clone());
        Ok(id)
    }

    async fn get(&self, id: EmployeeId) -> Result<Employee, StoreError> {
        self.check(self.config.fail_get, StoreOperation::Get)?;
        self.employees
            .get(&id)
            .map(|entry| Employee::from_fields(id.to_string(), entry.value().clone()))
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    async fn update(&self, id: EmployeeId, fields: &EmployeeFields) -> Result<(), StoreError> {
        self.check(self.config.fail_update, StoreOperation::Update)?;
        match self.employees.get_mut(&id) {
            Some(mut entry) => {
                *entry = fields.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound { id: id.to_string() }),
        }
    }

    async fn delete(&self, id: EmployeeId) -> Result<u64, StoreError> {
        self.check(self.config.fail_delete, StoreOperation::Delete)?;
        Ok(self.employees.remove(&id).map_or(0, |_| 1))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.check(self.config.fail_ping, StoreOperation::Count)?;
        Ok(self.employees.len() as u64)
    }
}
