//! Why a [`RouteDocConfig`](crate::RouteDocConfig) could not be loaded.

use std::path::PathBuf;
use thiserror::Error;

/// A configuration layer was rejected.
///
/// Each variant names the layer it came from: a file, an inline string, a
/// `PREFIX__SECTION__KEY` override or the final validation pass.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `with_file` was given a path that does not exist.
    #[error("no configuration file at {path}")]
    Missing {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read configuration file {path}")]
    Unreadable {
        /// The file.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// TOML that does not describe a configuration, unknown keys included.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON that does not describe a configuration, unknown keys included.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither `toml` nor `json`.
    #[error("cannot load configuration from '{0}', use toml or json")]
    UnknownFormat(String),

    /// A setting failed validation.
    #[error("{field} {reason}")]
    Invalid {
        /// Dotted key, such as `document.spec_path`.
        field: String,
        /// What the value must satisfy.
        reason: String,
    },

    /// An environment override could not be applied.
    #[error("environment override {var}: {reason}")]
    EnvOverride {
        /// The variable name.
        var: String,
        /// What was expected.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn missing(path: impl Into<PathBuf>) -> Self {
        Self::Missing { path: path.into() }
    }

    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env_override(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvOverride {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// The setting or variable at fault, when one can be named.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Invalid { field, .. } => Some(field),
            Self::EnvOverride { var, .. } => Some(var),
            _ => None,
        }
    }
}
