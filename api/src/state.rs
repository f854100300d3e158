use std::sync::Arc;

use common::db::repositories::EmployeeStore;
use metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub employees: Arc<dyn EmployeeStore>,
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(employees: Arc<dyn EmployeeStore>, metrics: PrometheusHandle) -> Self {
        Self { employees, metrics }
    }
}
