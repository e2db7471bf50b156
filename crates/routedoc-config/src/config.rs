//! Main configuration type.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, DocumentConfig, LoggingConfig, ServerConfig};

/// Complete RouteDoc service configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use routedoc_config::RouteDocConfig;
///
/// let config = RouteDocConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert_eq!(config.document.spec_path, "/openapi.json");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct RouteDocConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// API document configuration.
    #[serde(default)]
    pub document: DocumentConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RouteDocConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - the server address is not a socket address
    /// - a timeout is zero
    /// - the document title or version is empty
    /// - `document.spec_path` does not start with `/`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .server
            .http_addr
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::invalid(
                "server.http_addr",
                format!("is not a socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.server.shutdown_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "server.shutdown_timeout_secs",
                "must be greater than zero",
            ));
        }

        if self.document.title.trim().is_empty() {
            return Err(ConfigError::invalid("document.title", "must not be empty"));
        }

        if self.document.version.trim().is_empty() {
            return Err(ConfigError::invalid("document.version", "must not be empty"));
        }

        if !self.document.spec_path.starts_with('/') {
            return Err(ConfigError::invalid(
                "document.spec_path",
                format!("must start with '/': {}", self.document.spec_path),
            ));
        }

        Ok(())
    }

    /// Development preset: debug level, pretty logs with source locations,
    /// local bind address.
    ///
    /// ```
    /// use routedoc_config::RouteDocConfig;
    ///
    /// let config = RouteDocConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.server.http_addr = "127.0.0.1:8080".to_string();
        config.logging.level = "debug".to_string();
        config.logging.format = routedoc_telemetry::LogFormat::Pretty;
        config.logging.include_location = true;
        config
    }

    /// Production preset: info level, JSON logs.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = routedoc_telemetry::LogFormat::Json;
        config
    }
}
