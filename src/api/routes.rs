//! HTTP API route definitions.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::metrics;

use super::docs::ApiDoc;
use super::handlers::{
    create_employee, delete_employee, health, list_employees, metrics_export, ready,
    update_employee, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Employee resource
        .route("/employee", get(list_employees).post(create_employee))
        .route("/employee/:id", put(update_employee).delete(delete_employee))
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics_export))
        .route_layer(middleware::from_fn(track_metrics))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Record latency and status for every matched route.
async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let method = request.method().clone();

    let response = next.run(request).await;

    metrics::record_http_request(start, method.as_str(), &route, response.status().as_u16());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, StatusCode};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use crate::api::error::{DOCUMENT_NOT_FOUND, RECORD_DELETED, RECORD_NOT_FOUND};
    use crate::employee::{Employee, EmployeeFields, EmployeeId, MemoryEmployeeStore, MemoryStoreConfig};

    fn app(store: MemoryEmployeeStore) -> Router {
        create_router(AppState::new(Arc::new(store)))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, String) {
        let request = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let app = app(MemoryEmployeeStore::new());
        let (status, _) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn ready_endpoint_follows_store_ping() {
        let (status, body) = send(&app(MemoryEmployeeStore::new()), Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"store\":\"memory\""));

        let failing = app(MemoryEmployeeStore::with_config(MemoryStoreConfig::failing()));
        let (status, _) = send(&failing, Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn metrics_endpoint_is_404_without_recorder() {
        let (status, _) = send(&app(MemoryEmployeeStore::new()), Method::GET, "/metrics", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_returns_empty_array() {
        let (status, body) = send(&app(MemoryEmployeeStore::new()), Method::GET, "/employee", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn employee_lifecycle() {
        let app = app(MemoryEmployeeStore::new());

        let (status, body) = send(
            &app,
            Method::POST,
            "/employee",
            Some(r#"{"id":"client-chosen","name":"Ada","salary":1000,"age":30}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: Employee = serde_json::from_str(&body).unwrap();
        assert!(!created.id.is_empty());
        assert_ne!(created.id, "client-chosen");
        assert_eq!(created.name, "Ada");
        assert_eq!(created.salary, 1000.0);
        assert_eq!(created.age, 30.0);

        let (status, body) = send(&app, Method::GET, "/employee", None).await;
        assert_eq!(status, StatusCode::OK);
        let listed: Vec<Employee> = serde_json::from_str(&body).unwrap();
        assert_eq!(listed, vec![created.clone()]);

        let uri = format!("/employee/{}", created.id);
        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(r#"{"name":"Ada","salary":1200,"age":30}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let updated: Employee = serde_json::from_str(&body).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.salary, 1200.0);

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, RECORD_DELETED);

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, RECORD_NOT_FOUND);
    }

    #[tokio::test]
    async fn update_is_full_replacement() {
        let store = MemoryEmployeeStore::new();
        let id = store.seed(EmployeeFields {
            name: "Grace".to_string(),
            salary: 5000.0,
            age: 45.0,
        });
        let app = app(store.clone());

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/employee/{id}"),
            Some(r#"{"name":"Grace"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, Method::GET, "/employee", None).await;
        let listed: Vec<Employee> = serde_json::from_str(&body).unwrap();
        assert_eq!(
            listed,
            vec![Employee {
                id: id.to_string(),
                name: "Grace".to_string(),
                salary: 0.0,
                age: 0.0,
            }]
        );
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let app = app(MemoryEmployeeStore::new());
        let uri = format!("/employee/{}", EmployeeId::generate());

        let (status, body) = send(&app, Method::PUT, &uri, Some(r#"{"name":"Nobody"}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, DOCUMENT_NOT_FOUND);

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, RECORD_NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_ids_are_bad_requests() {
        let app = app(MemoryEmployeeStore::new());

        for bad in ["123", "not-an-id", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
            let uri = format!("/employee/{bad}");

            let (status, body) = send(&app, Method::DELETE, &uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body.is_empty());

            let (status, body) = send(&app, Method::PUT, &uri, Some("{}")).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(!body.is_empty());
        }
    }

    #[tokio::test]
    async fn malformed_bodies_are_bad_requests() {
        let store = MemoryEmployeeStore::new();
        let id = store.seed(EmployeeFields::default());
        let app = app(store.clone());

        let (status, body) = send(&app, Method::POST, "/employee", Some("{\"name\":")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.is_empty());

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/employee/{id}"),
            Some(r#"{"salary":"a lot"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn store_failures_are_server_errors() {
        let store = MemoryEmployeeStore::with_config(MemoryStoreConfig::failing());
        let id = store.seed(EmployeeFields::default());
        let app = app(store);
        let uri = format!("/employee/{id}");

        let (status, body) = send(&app, Method::GET, "/employee", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.is_empty());

        let (status, body) = send(&app, Method::POST, "/employee", Some("{}")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.is_empty());

        let (status, body) = send(&app, Method::PUT, &uri, Some("{}")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.is_empty());

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, body) = send(
            &app(MemoryEmployeeStore::new()),
            Method::GET,
            "/api-docs/openapi.json",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/employee/{id}"));
    }
}
