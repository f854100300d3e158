// In-memory stores and request helpers for handler tests

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::db::repositories::EmployeeStore;
use common::errors::StoreError;
use common::models::{Employee, EmployeeInput};
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

use crate::state::AppState;

fn employee_from_input(id: i64, input: &EmployeeInput) -> Employee {
    Employee {
        id,
        name: input.name.clone(),
        salary: input.salary,
        role: input.role.clone(),
    }
}

/// Employee store backed by a map, assigning ids like a sequence would
pub struct InMemoryEmployeeStore {
    rows: Mutex<BTreeMap<i64, Employee>>,
    next_id: Mutex<i64>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            next_id: Mutex::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, id: i64) -> Option<Employee> {
        self.rows.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Employee>, StoreError> {
        let prefix = name_prefix.map(str::to_lowercase);
        let mut employees: Vec<Employee> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|e| match &prefix {
                Some(p) => e.name.to_lowercase().starts_with(p.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(employees)
    }

    async fn create(&self, input: &EmployeeInput) -> Result<Employee, StoreError> {
        let mut next_id = self.next_id.lock().unwrap();
        let employee = employee_from_input(*next_id, input);
        *next_id += 1;
        self.rows
            .lock()
            .unwrap()
            .insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn update(
        &self,
        id: i64,
        input: &EmployeeInput,
    ) -> Result<Option<Employee>, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(&id).map(|row| {
            *row = employee_from_input(id, input);
            row.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Employee store whose every call fails as if the database were gone
pub struct FailingEmployeeStore;

pub const FAILURE_DETAIL: &str = "connection refused by db-secret-host:5432";

#[async_trait]
impl EmployeeStore for FailingEmployeeStore {
    async fn list(&self, _name_prefix: Option<&str>) -> Result<Vec<Employee>, StoreError> {
        Err(StoreError::ConnectionFailed(FAILURE_DETAIL.to_string()))
    }

    async fn create(&self, _input: &EmployeeInput) -> Result<Employee, StoreError> {
        Err(StoreError::ConnectionFailed(FAILURE_DETAIL.to_string()))
    }

    async fn update(
        &self,
        _id: i64,
        _input: &EmployeeInput,
    ) -> Result<Option<Employee>, StoreError> {
        Err(StoreError::ConnectionFailed(FAILURE_DETAIL.to_string()))
    }

    async fn delete(&self, _id: i64) -> Result<bool, StoreError> {
        Err(StoreError::ConnectionFailed(FAILURE_DETAIL.to_string()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::HealthCheckFailed(FAILURE_DETAIL.to_string()))
    }
}

/// Build application state around `store` with a private metrics recorder
pub fn test_state(store: Arc<dyn EmployeeStore>) -> AppState {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    AppState::new(store, handle)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.text).unwrap()
    }
}

/// Send one request through the router, with an optional JSON body
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> TestResponse {
    match body {
        Some(body) => send_raw(app, method, uri, Some("application/json"), body.to_string()).await,
        None => send_raw(app, method, uri, None, String::new()).await,
    }
}

/// Send one request with an arbitrary body and content type
pub async fn send_raw(
    app: Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: String,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body)).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    TestResponse {
        status,
        text: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}
