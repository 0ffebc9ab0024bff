//! Error types for batch generation
//!
//! Covers the failure modes of a run:
//! - Template ingress (missing or unreadable template)
//! - Configuration (invalid bounds, counts, malformed TOML)
//! - Egress (any write to the output directory)
//! - Marker policy violations in strict mode

use std::path::{Path, PathBuf};

/// Convenience alias used throughout the crate
pub type Result<T, E = BatchError> = std::result::Result<T, E>;

/// Main batch error type
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Template file does not exist or cannot be read
    #[error("cannot read template {path}: {source}")]
    MissingTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template file is not valid UTF-8 text
    #[error("template {path} is not valid UTF-8: {source}")]
    TemplateEncoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// IO error while writing the output directory, a variant or the log
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration rejected before sampling
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Configuration file could not be parsed
    #[error("malformed configuration {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Strict marker mode and the template does not yield exactly one substitution
    #[error("expected exactly one substitution after '{marker}', template yields {found}")]
    MarkerMismatch { marker: String, found: usize },
}

impl BatchError {
    /// Create missing-template error for path
    pub fn missing_template(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MissingTemplate {
            path: path.into(),
            source,
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Whether the error was raised before any output was produced
    #[inline]
    #[must_use]
    pub fn is_pre_output(&self) -> bool {
        matches!(
            self,
            Self::MissingTemplate { .. }
                | Self::TemplateEncoding { .. }
                | Self::InvalidConfiguration(_)
                | Self::ConfigParse { .. }
        )
    }
}
