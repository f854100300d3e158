// Input validation for employee payloads and path identifiers
//
// Fields are checked against their JSON types with no coercion: a salary
// sent as "50000" is rejected just like a missing one.

use crate::errors::ValidationError;
use crate::models::EmployeeInput;
use serde_json::Value;

/// Validate an employee payload
///
/// Rules are evaluated in order (name, salary, role) and the first failing
/// rule is reported. Unknown fields are ignored. A value that is not a JSON
/// object carries no fields and therefore fails on `name`.
pub fn validate_employee(body: &Value) -> Result<EmployeeInput, ValidationError> {
    let name = non_empty_string(body, "name").ok_or(ValidationError::InvalidName)?;

    let salary = body
        .get("salary")
        .and_then(Value::as_f64)
        .filter(|salary| salary.is_finite() && *salary > 0.0)
        .ok_or(ValidationError::InvalidSalary)?;

    let role = non_empty_string(body, "role").ok_or(ValidationError::InvalidRole)?;

    Ok(EmployeeInput {
        name: name.to_string(),
        salary,
        role: role.to_string(),
    })
}

/// Parse an employee id taken from a request path
///
/// Only plain decimal digits are accepted; signs, whitespace, fractions and
/// trailing characters are all rejected, as is zero.
pub fn parse_employee_id(raw: &str) -> Result<i64, ValidationError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidId);
    }

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidId),
    }
}

fn non_empty_string<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}
