use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;

// ============================================================================
// Employee Models
// ============================================================================

/// A persisted employee record
///
/// `id` is assigned by the database on insert and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    #[serde(serialize_with = "serialize_salary")]
    pub salary: f64,
    pub role: String,
}

/// The business fields of an employee, already validated
///
/// Used both for inserts and for full-record updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub name: String,
    pub salary: f64,
    pub role: String,
}

/// Whole salaries are written as JSON integers (`50000`, not `50000.0`)
fn serialize_salary<S: Serializer>(salary: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // Integers beyond 2^53 are not exactly representable as f64
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if salary.fract() == 0.0 && salary.abs() <= MAX_EXACT {
        serializer.serialize_i64(*salary as i64)
    } else {
        serializer.serialize_f64(*salary)
    }
}
