// Employee repository implementation

use crate::db::DbPool;
use crate::errors::StoreError;
use crate::models::{Employee, EmployeeInput};
use async_trait::async_trait;
use tracing::instrument;

/// Storage operations the HTTP layer needs for employees
///
/// Every method runs exactly one statement on one pooled connection.
/// "No such row" is reported through the return value, never as an error.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// All employees ordered by name, optionally restricted to names starting
    /// with `name_prefix` (case-insensitive)
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Employee>, StoreError>;

    /// Insert a new employee and return it with its generated id
    async fn create(&self, input: &EmployeeInput) -> Result<Employee, StoreError>;

    /// Replace all business fields of employee `id`; `None` if it does not exist
    async fn update(&self, id: i64, input: &EmployeeInput)
        -> Result<Option<Employee>, StoreError>;

    /// Delete employee `id`; `false` if it does not exist
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Check that the store is reachable
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Repository for employee-related database operations
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: DbPool,
}

impl EmployeeRepository {
    /// Create a new EmployeeRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for EmployeeRepository {
    #[instrument(skip(self))]
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Employee>, StoreError> {
        let employees = match name_prefix {
            Some(prefix) => {
                sqlx::query_as::<_, Employee>(
                    r#"
                    SELECT id, name, salary, role
                    FROM employees
                    WHERE name ILIKE $1
                    ORDER BY name, id
                    "#,
                )
                .bind(like_prefix_pattern(prefix))
                .fetch_all(self.pool.pool())
                .await?
            }
            None => {
                sqlx::query_as::<_, Employee>(
                    r#"
                    SELECT id, name, salary, role
                    FROM employees
                    ORDER BY name, id
                    "#,
                )
                .fetch_all(self.pool.pool())
                .await?
            }
        };

        tracing::debug!(count = employees.len(), "Listed employees");
        Ok(employees)
    }

    #[instrument(skip(self, input))]
    async fn create(&self, input: &EmployeeInput) -> Result<Employee, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (name, salary, role)
            VALUES ($1, $2, $3)
            RETURNING id, name, salary, role
            "#,
        )
        .bind(&input.name)
        .bind(input.salary)
        .bind(&input.role)
        .fetch_one(self.pool.pool())
        .await?;

        tracing::info!(employee_id = employee.id, "Employee created");
        Ok(employee)
    }

    #[instrument(skip(self, input))]
    async fn update(
        &self,
        id: i64,
        input: &EmployeeInput,
    ) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET name = $1, salary = $2, role = $3
            WHERE id = $4
            RETURNING id, name, salary, role
            "#,
        )
        .bind(&input.name)
        .bind(input.salary)
        .bind(&input.role)
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        match &employee {
            Some(_) => tracing::info!(employee_id = id, "Employee updated"),
            None => tracing::debug!(employee_id = id, "No employee to update"),
        }
        Ok(employee)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(self.pool.pool())
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(employee_id = id, "Employee deleted");
        }
        Ok(deleted)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.pool.health_check().await
    }
}

/// Build an ILIKE pattern matching names that start with `prefix` literally
///
/// `\` is the default LIKE escape character in PostgreSQL.
fn like_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
