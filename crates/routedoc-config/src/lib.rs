//! Typed configuration for RouteDoc services.
//!
//! Provides:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//!
//! [document]
//! enabled = true
//! title = "Items API"
//! version = "1.0.0"
//! spec_path = "/openapi.json"
//! format = "json"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY`, for example
//! `ROUTEDOC__DOCUMENT__FORMAT=yaml`.

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::RouteDocConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{DocumentConfig, DocumentFormat, LoggingConfig, ServerConfig};

pub use routedoc_telemetry::LogFormat;
