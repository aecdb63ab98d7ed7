//! HTTP API module for the employee resource and operational endpoints.

pub mod docs;
pub mod error;
pub mod handlers;
pub mod routes;

pub use error::ApiError;
pub use handlers::AppState;
pub use routes::create_router;
