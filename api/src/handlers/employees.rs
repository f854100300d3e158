use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::handlers::ApiError;
use crate::state::AppState;
use common::errors::ValidationError;
use common::models::Employee;
use common::telemetry;
use common::validation::{parse_employee_id, validate_employee};

/// Query parameters accepted when listing employees
#[derive(Debug, Deserialize)]
pub struct ListEmployeesQuery {
    #[serde(rename = "namePrefix")]
    pub name_prefix: Option<String>,
}

/// List employees ordered by name, optionally filtered by a name prefix
#[tracing::instrument(skip(state))]
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let name_prefix = query.name_prefix.as_deref().filter(|p| !p.is_empty());

    let result = state
        .employees
        .list(name_prefix)
        .await
        .map_err(ApiError::store("Database error while fetching employees"));

    observe("list", result.map(Json))
}

/// Create a new employee
#[tracing::instrument(skip(state, payload))]
pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    observe("create", create(&state, payload).await)
}

async fn create(
    state: &AppState,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let input = validate_employee(&json_body(payload)?)?;

    let employee = state
        .employees
        .create(&input)
        .await
        .map_err(ApiError::store("Database error while adding employee"))?;

    tracing::info!(employee_id = employee.id, "Employee created successfully");
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Replace the name, salary and role of an employee
#[tracing::instrument(skip(state, path, payload))]
pub async fn update_employee(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    observe("update", update(&state, path, payload).await)
}

async fn update(
    state: &AppState,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    // Body rules are reported before a malformed id
    let input = validate_employee(&json_body(payload)?)?;
    let id = path_id(path)?;

    let employee = state
        .employees
        .update(id, &input)
        .await
        .map_err(ApiError::store("Database error while updating employee"))?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(employee_id = id, "Employee updated successfully");
    Ok(Json(employee))
}

/// Delete an employee
#[tracing::instrument(skip(state, path))]
pub async fn delete_employee(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    observe("delete", delete(&state, path).await)
}

async fn delete(
    state: &AppState,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(path)?;

    let deleted = state
        .employees
        .delete(id)
        .await
        .map_err(ApiError::store("Database error while deleting employee"))?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    tracing::info!(employee_id = id, "Employee deleted successfully");
    Ok(StatusCode::NO_CONTENT)
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ValidationError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))
}

/// Parse the id path segment; a segment that does not decode is an invalid id
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<i64, ValidationError> {
    let Path(raw_id) = path.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected employee id path segment");
        ValidationError::InvalidId
    })?;
    parse_employee_id(&raw_id)
}

fn observe<T>(operation: &'static str, result: Result<T, ApiError>) -> Result<T, ApiError> {
    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.outcome(),
    };
    telemetry::record_request(operation, outcome);
    result
}
