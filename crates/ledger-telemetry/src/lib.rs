//! # Ledger Telemetry
//!
//! Logging bootstrap for review ledger processes and tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Ledger spans and events are now written to stdout.
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RL_SERVICE_NAME` | `review-ledger` | Service name on the startup record |
//! | `RL_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `RL_CONSOLE_OUTPUT` | `true` | Write log lines to stdout |
//! | `RL_JSON_LOGS` | `false` (`true` in containers) | JSON line format |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Global subscriber already set: {0}")]
    AlreadyInitialized(String),
}

/// Install logging for a ledger process and record the startup.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_logging(config)?;
    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        version = env!("CARGO_PKG_VERSION"),
        "telemetry initialized"
    );
    Ok(())
}
