//! Logging setup for RouteDoc services.
//!
//! Every RouteDoc crate logs through `tracing`. This crate installs the
//! subscriber that turns those events into output:
//!
//! - [`LogConfig`] with `development()` and `production()` presets
//! - [`init_logging`] building a registry with an `EnvFilter` and a JSON,
//!   pretty or compact layer
//! - `log_request_start!`, `log_request_complete!` and `log_request_error!`
//!   for consistent request events
//!
//! # Example
//!
//! ```rust,ignore
//! use routedoc_telemetry::{init_logging, LogConfig};
//!
//! fn main() {
//!     init_logging(&LogConfig::production()).expect("logging");
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
