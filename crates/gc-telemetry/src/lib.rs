//! # GC Telemetry
//!
//! Logging bootstrap for the invite-list workspace.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gc_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GC_SERVICE_NAME` | `gc-invite-list` | Service name in log output |
//! | `GC_LOG_LEVEL` / `RUST_LOG` | `info` | Level filter directive |
//! | `GC_CONSOLE_OUTPUT` | `true` | Write log output |
//! | `GC_JSON_LOGS` | `false` | JSON instead of pretty output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
