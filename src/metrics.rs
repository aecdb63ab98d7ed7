//! Prometheus metrics for request and store latency.
//!
//! This module provides metrics for:
//! - HTTP request latency and counts per route
//! - Store operation latency and failures
//! - Employees created and deleted

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::employee::StoreOperation;
use crate::error::AppError;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// Store operation latency metric name.
pub const METRIC_STORE_LATENCY: &str = "store_operation_latency_ms";
/// Store failures counter metric name.
pub const METRIC_STORE_FAILURES: &str = "store_failures_total";
/// Employees created counter metric name.
pub const METRIC_EMPLOYEES_CREATED: &str = "employees_created_total";
/// Employees deleted counter metric name.
pub const METRIC_EMPLOYEES_DELETED: &str = "employees_deleted_total";

/// Install the global Prometheus recorder and describe all metrics.
/// Call this once at startup.
pub fn install_recorder() -> Result<PrometheusHandle, AppError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AppError::Metrics(e.to_string()))?;
    init_metrics();
    Ok(handle)
}

/// Initialize all metric descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests");
    describe_histogram!(
        METRIC_STORE_LATENCY,
        "Store round-trip latency in milliseconds"
    );
    describe_counter!(
        METRIC_STORE_FAILURES,
        "Total number of failed store operations"
    );
    describe_counter!(METRIC_EMPLOYEES_CREATED, "Total number of employees created");
    describe_counter!(METRIC_EMPLOYEES_DELETED, "Total number of employees deleted");

    debug!("Metrics initialized");
}

/// Record HTTP request latency and count.
pub fn record_http_request(start: Instant, method: &str, route: &str, status: u16) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(latency_ms);
    counter!(
        METRIC_HTTP_REQUESTS,
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment store failures counter.
pub fn inc_store_failures(operation: StoreOperation) {
    counter!(METRIC_STORE_FAILURES, "operation" => operation.to_string()).increment(1);
}

/// Increment employees created counter.
pub fn inc_employees_created() {
    counter!(METRIC_EMPLOYEES_CREATED).increment(1);
}

/// Increment employees deleted counter.
pub fn inc_employees_deleted() {
    counter!(METRIC_EMPLOYEES_DELETED).increment(1);
}

/// RAII guard for timing store operations.
/// Automatically records latency when dropped.
pub struct StoreTimer {
    start: Instant,
    operation: StoreOperation,
}

impl StoreTimer {
    /// Start timing the given operation.
    pub fn new(operation: StoreOperation) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for StoreTimer {
    fn drop(&mut self) {
        let op: &'static str = self.operation.into();
        histogram!(METRIC_STORE_LATENCY, "operation" => op).record(self.elapsed_ms());
    }
}
