//! Unified error types for the employee service.

use thiserror::Error;

/// Unified error type for the service binary and startup path.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Store connection or operation error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Metrics recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by an [`EmployeeStore`](crate::employee::EmployeeStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not establish the initial connection.
    #[error("failed to connect to store: {0}")]
    Connection(String),

    /// The initial connection did not complete in time.
    #[error("store connection timed out after {seconds}s")]
    ConnectTimeout {
        /// Timeout that elapsed.
        seconds: u64,
    },

    /// No document matches the requested id.
    #[error("employee {id} not found")]
    NotFound {
        /// Hex id that was looked up.
        id: String,
    },

    /// The store acknowledged an insert without returning an ObjectId.
    #[error("store returned a non-ObjectId inserted id: {0}")]
    UnexpectedInsertedId(String),

    /// Injected failure from the in-memory store.
    #[error("{0}")]
    Unavailable(String),

    /// MongoDB driver error.
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),
}

impl StoreError {
    /// Whether this error means the target document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// A path parameter that is not a valid store identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid employee id {input:?}: {reason}")]
pub struct InvalidEmployeeId {
    /// Raw input.
    pub input: String,
    /// Parser message.
    pub reason: String,
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
