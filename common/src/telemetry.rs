// Telemetry module for structured logging and metrics

use crate::config::LogFormat;
use anyhow::Result;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Counter of handled employee requests, labelled by operation and outcome
pub const REQUESTS_TOTAL: &str = "employee_requests_total";

/// Initialize structured logging
///
/// `RUST_LOG` takes precedence over the configured level. The JSON format
/// includes the current span so request fields travel with every event.
pub fn init_logging(log_level: &str, format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {}", e))?;

    let layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(false)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;

    tracing::info!(
        log_level = log_level,
        log_format = ?format,
        "Structured logging initialized"
    );

    Ok(())
}

/// Install the Prometheus recorder as the global metrics recorder
///
/// The returned handle renders the scrape payload served on `/metrics`.
pub fn install_metrics_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    describe_counter!(
        REQUESTS_TOTAL,
        "Total number of employee API requests by operation and outcome"
    );

    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// Record the outcome of one employee API request
#[inline]
pub fn record_request(operation: &'static str, outcome: &'static str) {
    counter!(REQUESTS_TOTAL, "operation" => operation, "outcome" => outcome).increment(1);
}
