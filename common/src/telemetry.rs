// Telemetry module for structured logging and metrics

use crate::config::LogFormat;
use anyhow::Result;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize structured logging
///
/// `RUST_LOG` takes precedence over the configured level. JSON output
/// carries the current span and span list so request fields from
/// `#[tracing::instrument]` end up on every line.
pub fn init_logging(log_level: &str, format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {}", e))?;

    let layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
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

    tracing::info!(log_level = log_level, format = ?format, "Logging initialized");

    Ok(())
}

/// Install the Prometheus recorder and describe the service counters
///
/// The returned handle renders the exposition text for `/metrics`.
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    describe_counter!("bakery_updates_total", "Total number of bakery renames");
    describe_counter!(
        "baked_goods_created_total",
        "Total number of baked goods created"
    );
    describe_counter!(
        "baked_goods_deleted_total",
        "Total number of baked goods deleted"
    );
    describe_counter!(
        "store_errors_total",
        "Store failures surfaced to clients, by kind"
    );

    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}

#[inline]
pub fn record_bakery_update() {
    counter!("bakery_updates_total").increment(1);
}

#[inline]
pub fn record_baked_good_created() {
    counter!("baked_goods_created_total").increment(1);
}

#[inline]
pub fn record_baked_good_deleted() {
    counter!("baked_goods_deleted_total").increment(1);
}

#[inline]
pub fn record_store_error(kind: &'static str) {
    counter!("store_errors_total", "kind" => kind).increment(1);
}
