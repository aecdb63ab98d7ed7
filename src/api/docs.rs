//! OpenAPI description of the employee endpoints.

use utoipa::OpenApi;

use crate::employee::{Employee, EmployeeFields};

use super::handlers;

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_employees,
        handlers::create_employee,
        handlers::update_employee,
        handlers::delete_employee
    ),
    components(schemas(Employee, EmployeeFields)),
    tags((name = "employee", description = "Employee records"))
)]
pub struct ApiDoc;
