//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::employee::{Employee, EmployeeFields, EmployeeId, EmployeeStore};
use crate::error::StoreError;
use crate::metrics;

use super::error::{ApiError, DOCUMENT_NOT_FOUND, RECORD_DELETED, RECORD_NOT_FOUND};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Employee store, shared by every request.
    pub store: Arc<dyn EmployeeStore>,
    /// Prometheus handle when the recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around a store.
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether the store answered a ping.
    pub ready: bool,
    /// Store backend name.
    pub store: String,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if the store answers, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.backend().to_string();

    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(ReadyResponse { ready: true, store })),
        Err(e) => {
            warn!(error = %e, "Store ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    ready: false,
                    store,
                }),
            )
        }
    }
}

/// Prometheus exposition handler - 404 when metrics are disabled.
pub async fn metrics_export(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}

/// Decode a request body into employee fields.
///
/// Missing fields become zero values; malformed JSON is a 400 with the parser
/// message.
fn parse_body(body: &Bytes) -> Result<EmployeeFields, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Rejected employee body");
        ApiError::bad_request(e.to_string())
    })
}

fn store_failure(action: &'static str) -> impl Fn(StoreError) -> ApiError {
    move |e| {
        error!(error = %e, action, "Store operation failed");
        ApiError::internal(e.to_string())
    }
}

/// List all employees.
#[utoipa::path(
    get,
    path = "/employee",
    tag = "employee",
    responses(
        (status = 200, description = "Every stored employee", body = [Employee]),
        (status = 500, description = "Store error text", body = String)
    )
)]
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees = state
        .store
        .list()
        .await
        .map_err(store_failure("list"))?;

    Ok(Json(employees))
}

/// Create an employee.
///
/// Any `id` in the body is ignored. The response is the document as read back
/// from the store after insertion.
#[utoipa::path(
    post,
    path = "/employee",
    tag = "employee",
    request_body = EmployeeFields,
    responses(
        (status = 201, description = "Stored employee with its new id", body = Employee),
        (status = 400, description = "Malformed body", body = String),
        (status = 500, description = "Store error text", body = String)
    )
)]
pub async fn create_employee(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let fields = parse_body(&body)?;

    let id = state
        .store
        .insert(&fields)
        .await
        .map_err(store_failure("insert"))?;

    match state.store.get(id).await {
        Ok(created) => {
            metrics::inc_employees_created();
            info!(id = %id, "Created employee");
            Ok((StatusCode::CREATED, Json(created)))
        }
        Err(e) => {
            error!(id = %id, error = %e, "Inserted employee could not be read back");
            // Roll back so a failed response leaves nothing behind.
            if let Err(cleanup) = state.store.delete(id).await {
                warn!(id = %id, error = %cleanup, "Compensating delete failed");
            }
            Err(ApiError::internal(e.to_string()))
        }
    }
}

/// Replace an employee's fields.
///
/// Fields absent from the body are reset to zero.
#[utoipa::path(
    put,
    path = "/employee/{id}",
    tag = "employee",
    params(("id" = String, Path, description = "Hex ObjectId of the employee")),
    request_body = EmployeeFields,
    responses(
        (status = 200, description = "The submitted employee with its id", body = Employee),
        (status = 400, description = "Malformed id or body", body = String),
        (status = 404, description = "No such employee", body = String, example = json!("Document not found!")),
        (status = 500, description = "Store error text", body = String)
    )
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Employee>, ApiError> {
    let id = raw_id.parse::<EmployeeId>().map_err(|e| {
        warn!(error = %e, "Rejected employee id");
        ApiError::bad_request(e.to_string())
    })?;
    let fields = parse_body(&body)?;

    match state.store.update(id, &fields).await {
        Ok(()) => {
            info!(id = %id, "Updated employee");
            Ok(Json(Employee::from_fields(raw_id, fields)))
        }
        Err(e) if e.is_not_found() => Err(ApiError::new(StatusCode::NOT_FOUND, DOCUMENT_NOT_FOUND)),
        Err(e) => Err(store_failure("update")(e)),
    }
}

/// Delete an employee.
///
/// Error responses other than 404 carry no body.
#[utoipa::path(
    delete,
    path = "/employee/{id}",
    tag = "employee",
    params(("id" = String, Path, description = "Hex ObjectId of the employee")),
    responses(
        (status = 200, description = "Deleted", body = String, example = json!("Record deleted successfully.")),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such employee", body = String, example = json!("Record not founded.")),
        (status = 500, description = "Store error")
    )
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let id = raw_id.parse::<EmployeeId>().map_err(|e| {
        warn!(error = %e, "Rejected employee id");
        ApiError::bare(StatusCode::BAD_REQUEST)
    })?;

    let deleted = state.store.delete(id).await.map_err(|e| {
        error!(id = %id, error = %e, "Store operation failed");
        ApiError::bare(StatusCode::INTERNAL_SERVER_ERROR)
    })?;

    if deleted < 1 {
        return Err(ApiError::new(StatusCode::NOT_FOUND, RECORD_NOT_FOUND));
    }

    metrics::inc_employees_deleted();
    info!(id = %id, "Deleted employee");
    Ok((StatusCode::OK, RECORD_DELETED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::config::StoreBackend;
    use crate::employee::{MemoryEmployeeStore, MemoryStoreConfig};

    fn state_with(store: MemoryEmployeeStore) -> AppState {
        AppState::new(Arc::new(store))
    }

    /// Store whose reads trim `name`, so stored and submitted values differ.
    struct TrimmingStore(MemoryEmployeeStore);

    #[async_trait]
    impl EmployeeStore for TrimmingStore {
        fn backend(&self) -> StoreBackend {
            self.0.backend()
        }

        async fn ping(&self) -> Result<(), StoreError> {
            self.0.ping().await
        }

        async fn list(&self) -> Result<Vec<Employee>, StoreError> {
            self.0.list().await
        }

        async fn insert(&self, fields: &EmployeeFields) -> Result<EmployeeId, StoreError> {
            self.0.insert(fields).await
        }

        async fn get(&self, id: EmployeeId) -> Result<Employee, StoreError> {
            let mut employee = self.0.get(id).await?;
            employee.name = employee.name.trim().to_string();
            Ok(employee)
        }

        async fn update(&self, id: EmployeeId, fields: &EmployeeFields) -> Result<(), StoreError> {
            self.0.update(id, fields).await
        }

        async fn delete(&self, id: EmployeeId) -> Result<u64, StoreError> {
            self.0.delete(id).await
        }

        async fn count(&self) -> Result<u64, StoreError> {
            self.0.count().await
        }
    }

    #[test]
    fn parse_body_reports_parser_text() {
        let err = parse_body(&Bytes::from_static(b"{\"name\":")).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn create_rolls_back_when_read_back_fails() {
        let store = MemoryEmployeeStore::with_config(MemoryStoreConfig {
            fail_get: true,
            ..MemoryStoreConfig::default()
        });
        let state = state_with(store.clone());

        let err = create_employee(
            State(state),
            Bytes::from_static(br#"{"name":"Ada","salary":1000,"age":30}"#),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn create_returns_the_stored_document() {
        let state = AppState::new(Arc::new(TrimmingStore(MemoryEmployeeStore::new())));

        let (status, Json(created)) = create_employee(
            State(state),
            Bytes::from_static(br#"{"name":"  Ada  ","salary":1000,"age":30}"#),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.name, "Ada");
        assert_eq!(created.id.len(), 24);
    }

    #[tokio::test]
    async fn update_echoes_path_id() {
        let store = MemoryEmployeeStore::new();
        let id = store.seed(EmployeeFields::default());
        let state = state_with(store);

        let Json(employee) = update_employee(
            State(state),
            Path(id.to_string()),
            Bytes::from_static(br#"{"id":"ignored","name":"Ada","salary":1200,"age":30}"#),
        )
        .await
        .unwrap();

        assert_eq!(employee.id, id.to_string());
        assert_eq!(employee.salary, 1200.0);
    }

    #[tokio::test]
    async fn delete_store_failure_has_no_body() {
        let store = MemoryEmployeeStore::with_config(MemoryStoreConfig {
            fail_delete: true,
            ..MemoryStoreConfig::default()
        });
        let id = store.seed(EmployeeFields::default());

        let err = delete_employee(State(state_with(store)), Path(id.to_string()))
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::bare(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
