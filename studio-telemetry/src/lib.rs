//! Telemetry initialization and configuration
//!
//! Binaries call [`init_telemetry`] once at startup. The filter comes from
//! `RUST_LOG` and defaults to `info`. Logs go to stderr so command output on
//! stdout stays clean.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines with target, thread id and line number
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Initialize console logging
///
/// # Arguments
/// * `service_name` - Name of the service for trace identification
///
/// # Example
/// ```
/// use studio_telemetry::init_telemetry;
/// init_telemetry("deploy-studio").expect("Failed to initialize telemetry");
/// ```
pub fn init_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    init_with_format(service_name, LogFormat::Pretty, "info")
}

/// Initialize console logging with an explicit format and default filter.
///
/// Only the first call in a process installs a subscriber; later calls are
/// no-ops.
pub fn init_with_format(
    service_name: &str,
    format: LogFormat,
    default_directive: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut result = Ok(());
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(env_filter(default_directive));
        let installed = match format {
            LogFormat::Pretty => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_line_number(true),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_current_span(true),
                )
                .try_init(),
        };

        match installed {
            Ok(()) => tracing::info!(service.name = service_name, ?format, "Telemetry initialized"),
            Err(e) => result = Err(e.into()),
        }
    });

    result
}
