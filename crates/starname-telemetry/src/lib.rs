//! # Starname Telemetry
//!
//! Logging bootstrap for the Starname registry.
//!
//! The registry itself only depends on the `tracing` facade. This crate owns
//! the subscriber: level filtering, pretty or JSON output, and the
//! `log_event!` family of macros that stamp every record with a `subsystem`
//! field.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use starname_telemetry::{init_tracing, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_tracing(&config).expect("Failed to init telemetry");
//!
//!     // Registry code below this point logs through the subscriber.
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SN_SERVICE_NAME` | `starname` | Service name attached to the startup record |
//! | `SN_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `SN_JSON_LOGS` | `false` | Emit newline-delimited JSON instead of pretty text |
//! | `SN_CONSOLE_OUTPUT` | `true` | Disable to install the filter without any writer |

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{init_test_tracing, init_tracing};

use thiserror::Error;

#[doc(hidden)]
pub mod __private {
    pub use tracing as __tracing;
}

/// Subsystem label stamped on records emitted by the registry.
pub const REGISTRY_SUBSYSTEM: &str = "starname-registry";

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },
}
