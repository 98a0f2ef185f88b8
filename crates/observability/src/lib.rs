//! # Observability
//!
//! Tracing + Prometheus metrics initialization.
//!
//! The pipeline crates emit `tracing` events and `metrics` counters from
//! their hot paths; this crate wires up the subscriber and the exporter
//! once, at process startup.
//!
//! ```ignore
//! observability::init()?;
//! // or, when the CLI already configured tracing:
//! observability::init_metrics_only(9000)?;
//! ```

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize observability (tracing + Prometheus) with defaults
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log output format
    pub log_format: LogFormat,
    /// Prometheus port (None = disabled)
    pub metrics_port: Option<u16>,
    /// Default log level when RUST_LOG is unset
    pub default_log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            metrics_port: Some(9000),
            default_log_level: "info".to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON structured logging
    #[default]
    Json,
    /// Human-readable format
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Initialize with custom configuration
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level));

    match config.log_format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer().pretty();

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer().compact();

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
    }

    if let Some(port) = config.metrics_port {
        install_prometheus(port)?;
    }

    tracing::info!(
        log_format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );

    Ok(())
}

/// Initialize only the Prometheus exporter (tracing already set up elsewhere)
pub fn init_metrics_only(port: u16) -> Result<()> {
    install_prometheus(port)?;
    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}

fn install_prometheus(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    describe_pipeline_metrics();
    Ok(())
}

/// Register help text for the counters the pipeline crates emit
fn describe_pipeline_metrics() {
    metrics::describe_counter!(
        "depth_frames_polled",
        "Depth frames polled from the active source"
    );
    metrics::describe_counter!(
        "depth_frames_degraded",
        "Polls that produced an all-invalid frame"
    );
    metrics::describe_counter!(
        "session_frames_rendered",
        "Frames rendered and handed to the output sink"
    );
    metrics::describe_counter!(
        "session_degraded_renders",
        "Renders fed by an all-invalid source frame"
    );
    metrics::describe_counter!(
        "session_mutations_rejected",
        "Profile mutations rejected by invariant checks"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.metrics_port, Some(9000));
        assert_eq!(config.default_log_level, "info");
    }
}
