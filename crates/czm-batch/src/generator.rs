//! Batch generation
//!
//! Drives one run end to end:
//! 1. Validate the configuration
//! 2. Sample the parameter triples
//! 3. Load the template
//! 4. For each triple, substitute and persist the variant plus its log record
//!
//! The run stops at the first error. Variant files already written stay on
//! disk.

use std::path::PathBuf;

use crate::config::BatchConfig;
use crate::error::{BatchError, Result};
use crate::sampler::{sample_triples, ParameterTriple};
use crate::template::Template;
use crate::writer::{BatchWriter, VariantId};

/// One persisted variant, reported to progress callbacks
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedVariant {
    /// Variant number
    pub variant: VariantId,
    /// Written file
    pub path: PathBuf,
    /// Assigned stiffness values
    pub triple: ParameterTriple,
    /// Lines replaced in this variant
    pub replacements: usize,
}

impl GeneratedVariant {
    /// File name of the written variant
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    /// Directory holding the batch
    pub output_dir: PathBuf,
    /// Assignment log
    pub log_path: PathBuf,
    /// Variant files in variant order
    pub files: Vec<PathBuf>,
    /// Substitutions performed per variant
    pub replacements_per_variant: usize,
}

impl BatchSummary {
    /// Number of generated variants
    #[inline]
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.files.len()
    }
}

/// Batch generator bound to a validated configuration
#[derive(Debug, Clone)]
pub struct BatchGenerator {
    config: BatchConfig,
}

impl BatchGenerator {
    /// Create generator
    ///
    /// # Errors
    /// Returns `BatchError::InvalidConfiguration` if `config` fails validation
    pub fn new(config: BatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Sampled triples without touching the filesystem
    ///
    /// # Errors
    /// Returns `BatchError::InvalidConfiguration` if sampling is impossible
    pub fn preview(&self) -> Result<Vec<ParameterTriple>> {
        sample_triples(&self.config)
    }

    /// Run the batch silently
    ///
    /// # Errors
    /// See [`BatchGenerator::run_with_progress`]
    pub fn run(&self) -> Result<BatchSummary> {
        self.run_with_progress(|_| {})
    }

    /// Run the batch, reporting each persisted variant to `on_variant`
    ///
    /// # Errors
    /// - `BatchError::MissingTemplate` before any output is produced
    /// - `BatchError::MarkerMismatch` in strict mode, before the output directory
    ///   or the log is touched
    /// - `BatchError::Io` on the first failed write
    pub fn run_with_progress<F>(&self, mut on_variant: F) -> Result<BatchSummary>
    where
        F: FnMut(&GeneratedVariant),
    {
        let config = &self.config;
        let triples = sample_triples(config)?;
        let template = Template::load(&config.template_path)?;

        // Substitution count depends on the template only, so the first
        // triple settles the marker policy before the log is truncated.
        let replacements_per_variant = template
            .substitute(&config.marker, &triples[0])
            .replacements;
        self.check_replacements(replacements_per_variant)?;

        let mut writer = BatchWriter::create(config)?;
        let mut files = Vec::with_capacity(triples.len());

        for (index, triple) in triples.iter().enumerate() {
            let variant = VariantId::from_index(index);
            let substitution = template.substitute(&config.marker, triple);

            let path = writer.write_variant(variant, &substitution.lines, triple)?;
            tracing::info!(variant = variant.0, path = %path.display(), "created variant");

            let generated = GeneratedVariant {
                variant,
                path,
                triple: *triple,
                replacements: substitution.replacements,
            };
            on_variant(&generated);
            files.push(generated.path);
        }

        let log_path = writer.finish()?;
        tracing::info!(
            variants = files.len(),
            log = %log_path.display(),
            "batch generation finished"
        );

        Ok(BatchSummary {
            output_dir: config.output_dir.clone(),
            log_path,
            files,
            replacements_per_variant,
        })
    }

    fn check_replacements(&self, found: usize) -> Result<()> {
        if found == 1 {
            return Ok(());
        }
        if self.config.strict_marker {
            return Err(BatchError::MarkerMismatch {
                marker: self.config.marker.clone(),
                found,
            });
        }
        tracing::warn!(
            marker = %self.config.marker,
            found,
            "template does not yield exactly one substitution"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParameterRange;

    fn scenario(dir: &std::path::Path) -> BatchConfig {
        let template = dir.join("ControlModel.inp");
        std::fs::write(
            &template,
            "Header\n*Cohesive Behavior\n1.0, 1.0, 1.0\nFooter\n",
        )
        .unwrap();
        BatchConfig::new()
            .with_template(template)
            .with_output_dir(dir.join("out"))
            .with_variant_count(2)
            .with_ranges(
                ParameterRange::new(1.0, 2.0),
                ParameterRange::new(0.1, 0.2),
                ParameterRange::new(0.1, 0.2),
            )
    }

    #[test]
    fn invalid_config_rejected_up_front() {
        let err = BatchGenerator::new(BatchConfig::new().with_variant_count(0)).unwrap_err();
        assert!(err.is_pre_output());
    }

    #[test]
    fn progress_reported_in_variant_order() {
        let dir = tempfile::tempdir().unwrap();
        let generator = BatchGenerator::new(scenario(dir.path())).unwrap();

        let mut seen = Vec::new();
        let summary = generator
            .run_with_progress(|v| seen.push((v.variant.0, v.file_name())))
            .unwrap();

        assert_eq!(
            seen,
            vec![
                (1, "czmknn_kss_ktt_var1.inp".to_string()),
                (2, "czmknn_kss_ktt_var2.inp".to_string()),
            ]
        );
        assert_eq!(summary.variant_count(), 2);
        assert_eq!(summary.replacements_per_variant, 1);
    }

    #[test]
    fn missing_template_produces_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = scenario(dir.path()).with_template(dir.path().join("absent.inp"));
        let generator = BatchGenerator::new(config).unwrap();

        let err = generator.run().unwrap_err();
        assert!(matches!(err, BatchError::MissingTemplate { .. }));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn strict_marker_rejects_template_without_marker() {
        let dir = tempfile::tempdir().unwrap();
        let config = scenario(dir.path()).with_strict_marker(true);
        std::fs::write(&config.template_path, "Header\nFooter\n").unwrap();
        let generator = BatchGenerator::new(config).unwrap();

        let err = generator.run().unwrap_err();
        assert!(matches!(err, BatchError::MarkerMismatch { found: 0, .. }));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn strict_marker_failure_keeps_previous_log() {
        let dir = tempfile::tempdir().unwrap();
        let config = scenario(dir.path());
        let first = BatchGenerator::new(config.clone()).unwrap().run().unwrap();
        let before = std::fs::read_to_string(&first.log_path).unwrap();

        std::fs::write(&config.template_path, "Header\nFooter\n").unwrap();
        let err = BatchGenerator::new(config.with_strict_marker(true))
            .unwrap()
            .run()
            .unwrap_err();
        assert!(matches!(err, BatchError::MarkerMismatch { .. }));

        let after = std::fs::read_to_string(&first.log_path).unwrap();
        assert_eq!(after, before);
        assert_eq!(
            after,
            "Variant, knn, kss, ktt\nvar1, 1, 0.1, 0.1\nvar2, 2, 0.2, 0.2\n"
        );
        for file in &first.files {
            assert!(file.exists());
        }
    }

    #[test]
    fn lenient_marker_copies_template() {
        let dir = tempfile::tempdir().unwrap();
        let config = scenario(dir.path());
        std::fs::write(&config.template_path, "Header\nFooter\n").unwrap();
        let summary = BatchGenerator::new(config).unwrap().run().unwrap();

        assert_eq!(summary.replacements_per_variant, 0);
        for file in &summary.files {
            assert_eq!(std::fs::read_to_string(file).unwrap(), "Header\nFooter\n");
        }
    }

    #[test]
    fn preview_matches_sampling() {
        let dir = tempfile::tempdir().unwrap();
        let generator = BatchGenerator::new(scenario(dir.path())).unwrap();
        let triples = generator.preview().unwrap();
        assert_eq!(
            triples,
            vec![
                ParameterTriple::new(1.0, 0.1, 0.1),
                ParameterTriple::new(2.0, 0.2, 0.2),
            ]
        );
    }
}
