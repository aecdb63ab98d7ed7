//! Employee CRUD service over a MongoDB collection.
//!
//! Exposes one resource over HTTP:
//!
//! ```text
//! GET    /employee        list every employee
//! POST   /employee        create, returning the stored document
//! PUT    /employee/{id}   replace name, salary and age
//! DELETE /employee/{id}   remove one employee
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`employee`]: Employee types and the MongoDB / in-memory stores
//! - [`api`]: HTTP handlers, routes and OpenAPI document
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod employee;
pub mod error;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
