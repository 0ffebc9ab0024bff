//! Batch egress
//!
//! [`BatchWriter`] owns the output directory and the open log stream. Each
//! [`BatchWriter::write_variant`] call persists one variant file and appends
//! its [`LogRecord`], so the log order always matches call order.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::BatchConfig;
use crate::error::{BatchError, Result};
use crate::sampler::ParameterTriple;

/// First line of every log file
pub const LOG_HEADER: &str = "Variant, knn, kss, ktt";

/// 1-based variant number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariantId(pub usize);

impl VariantId {
    /// Variant for a 0-based sample index
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index + 1)
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var{}", self.0)
    }
}

/// One log row: `var<i>, <knn>, <kss>, <ktt>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRecord {
    /// Variant number
    pub variant: VariantId,
    /// Assigned stiffness values
    pub triple: ParameterTriple,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.variant, self.triple)
    }
}

/// Deterministic variant file naming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantNaming {
    prefix: String,
    extension: String,
}

impl VariantNaming {
    /// Create naming scheme, `extension` given without the dot
    #[must_use]
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// File name of `variant`
    #[must_use]
    pub fn file_name(&self, variant: VariantId) -> String {
        if self.extension.is_empty() {
            format!("{}{}", self.prefix, variant.0)
        } else {
            format!("{}{}.{}", self.prefix, variant.0, self.extension)
        }
    }
}

/// Writes variant files and the assignment log into one directory
#[derive(Debug)]
pub struct BatchWriter {
    output_dir: PathBuf,
    naming: VariantNaming,
    log_path: PathBuf,
    log: BufWriter<File>,
    records: usize,
}

impl BatchWriter {
    /// Create the output directory (if absent) and open the log with its header
    ///
    /// # Errors
    /// Returns `BatchError::Io` if the directory or the log cannot be created
    pub fn create(config: &BatchConfig) -> Result<Self> {
        let output_dir = config.output_dir.clone();
        std::fs::create_dir_all(&output_dir).map_err(|e| BatchError::io_error(&output_dir, e))?;

        let log_path = config.log_path();
        let file = File::create(&log_path).map_err(|e| BatchError::io_error(&log_path, e))?;
        let mut log = BufWriter::new(file);
        writeln!(log, "{LOG_HEADER}").map_err(|e| BatchError::io_error(&log_path, e))?;

        Ok(Self {
            output_dir,
            naming: VariantNaming::new(&config.file_prefix, &config.file_extension),
            log_path,
            log,
            records: 0,
        })
    }

    /// Write one variant file and append its log record
    ///
    /// Returns the path of the written file.
    ///
    /// # Errors
    /// Returns `BatchError::Io` if the file or the log record cannot be written
    pub fn write_variant(
        &mut self,
        variant: VariantId,
        lines: &[String],
        triple: &ParameterTriple,
    ) -> Result<PathBuf> {
        let path = self.variant_path(variant);
        write_lines(&path, lines)?;

        let record = LogRecord {
            variant,
            triple: *triple,
        };
        writeln!(self.log, "{record}").map_err(|e| BatchError::io_error(&self.log_path, e))?;
        self.records += 1;
        Ok(path)
    }

    /// Path a variant is written to
    #[must_use]
    pub fn variant_path(&self, variant: VariantId) -> PathBuf {
        self.output_dir.join(self.naming.file_name(variant))
    }

    /// Log file path
    #[inline]
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Records appended so far, header excluded
    #[inline]
    #[must_use]
    pub fn records(&self) -> usize {
        self.records
    }

    /// Flush and close the log
    ///
    /// # Errors
    /// Returns `BatchError::Io` if buffered records cannot be flushed
    pub fn finish(mut self) -> Result<PathBuf> {
        self.log
            .flush()
            .map_err(|e| BatchError::io_error(&self.log_path, e))?;
        Ok(self.log_path)
    }
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let file = File::create(path).map_err(|e| BatchError::io_error(path, e))?;
    let mut out = BufWriter::new(file);
    for line in lines {
        out.write_all(line.as_bytes())
            .map_err(|e| BatchError::io_error(path, e))?;
    }
    out.flush().map_err(|e| BatchError::io_error(path, e))
}
