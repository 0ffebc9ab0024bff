//! Batch configuration
//!
//! Immutable description of a run. Loaded from TOML, overridden by CLI
//! flags, and validated once before any sampling happens.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BatchError, Result};

/// Closed sampling interval of one stiffness axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    /// Lower bound, first sampled value
    pub min: f64,
    /// Upper bound, last sampled value
    pub max: f64,
}

impl ParameterRange {
    /// Create new range
    #[inline]
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, axis: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(BatchError::invalid_config(format!(
                "{axis} bounds must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if !(self.max - self.min).is_finite() {
            return Err(BatchError::invalid_config(format!(
                "{axis} span overflows: [{}, {}]",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(BatchError::invalid_config(format!(
                "{axis} bounds are inverted: min {} > max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Batch run configuration
///
/// Field defaults reproduce the classic `ControlModel.inp` sweep: one
/// hundred variants, `knn` over `[1, 5]`, `kss` and `ktt` over `[0.1, 3]`.
/// Scalar fields precede the range tables so the TOML form stays flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Template input deck
    pub template_path: PathBuf,
    /// Directory receiving the variants and the log
    pub output_dir: PathBuf,
    /// Log file name, relative to `output_dir`
    pub log_file: String,
    /// Number of variants to generate
    pub variant_count: usize,
    /// Substring identifying the line preceding the stiffness row
    pub marker: String,
    /// Variant file name prefix, followed by the 1-based variant number
    pub file_prefix: String,
    /// Variant file extension, without the dot
    pub file_extension: String,
    /// Fail unless the template yields exactly one substitution
    pub strict_marker: bool,
    /// Normal (mode I) stiffness range
    pub knn: ParameterRange,
    /// First shear direction (mode II) stiffness range
    pub kss: ParameterRange,
    /// Second shear direction (mode III) stiffness range
    pub ktt: ParameterRange,
}

impl BatchConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns `BatchError::ConfigParse` if the text is not valid TOML or
    /// names an unknown field
    pub fn from_toml_str(text: &str, origin: impl Into<PathBuf>) -> Result<Self> {
        toml::from_str(text).map_err(|source| BatchError::ConfigParse {
            path: origin.into(),
            source,
        })
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// - `BatchError::Io` if the file cannot be read
    /// - `BatchError::ConfigParse` if it is malformed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| BatchError::io_error(path, e))?;
        let config = Self::from_toml_str(&text, path)?;
        tracing::debug!(path = %path.display(), "loaded batch configuration");
        Ok(config)
    }

    /// Render configuration as TOML
    ///
    /// # Errors
    /// Returns `BatchError::InvalidConfiguration` if a value has no TOML form
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| BatchError::invalid_config(e.to_string()))
    }

    /// Check counts, bounds and naming before a run
    ///
    /// # Errors
    /// Returns `BatchError::InvalidConfiguration` describing the first
    /// offending field
    pub fn validate(&self) -> Result<()> {
        if self.variant_count == 0 {
            return Err(BatchError::invalid_config("variant_count must be at least 1"));
        }
        self.knn.validate("knn")?;
        self.kss.validate("kss")?;
        self.ktt.validate("ktt")?;
        if self.marker.is_empty() {
            return Err(BatchError::invalid_config("marker must not be empty"));
        }
        if self.file_prefix.is_empty() {
            return Err(BatchError::invalid_config("file_prefix must not be empty"));
        }
        if self.log_file.is_empty() {
            return Err(BatchError::invalid_config("log_file must not be empty"));
        }
        Ok(())
    }

    /// Path of the log inside the output directory
    #[inline]
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(&self.log_file)
    }

    /// With template path
    #[inline]
    #[must_use]
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = path.into();
        self
    }

    /// With output directory
    #[inline]
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// With variant count
    #[inline]
    #[must_use]
    pub fn with_variant_count(mut self, count: usize) -> Self {
        self.variant_count = count;
        self
    }

    /// With the three stiffness ranges
    #[inline]
    #[must_use]
    pub fn with_ranges(mut self, knn: ParameterRange, kss: ParameterRange, ktt: ParameterRange) -> Self {
        self.knn = knn;
        self.kss = kss;
        self.ktt = ktt;
        self
    }

    /// With strict marker checking
    #[inline]
    #[must_use]
    pub fn with_strict_marker(mut self, strict: bool) -> Self {
        self.strict_marker = strict;
        self
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("ControlModel.inp"),
            output_dir: PathBuf::from("czm_batch_models"),
            log_file: "czm_assigned_values.txt".to_string(),
            variant_count: 100,
            knn: ParameterRange::new(1.0, 5.0),
            kss: ParameterRange::new(0.1, 3.0),
            ktt: ParameterRange::new(0.1, 3.0),
            marker: "*Cohesive Behavior".to_string(),
            file_prefix: "czmknn_kss_ktt_var".to_string(),
            file_extension: "inp".to_string(),
            strict_marker: false,
        }
    }
}
