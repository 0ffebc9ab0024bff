//! Testing utilities for the CZM batch workspace
//!
//! Shared fixtures: template texts, on-disk scenarios and log helpers.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use czm_batch::{BatchConfig, ParameterRange, Template};
use tempfile::TempDir;

pub const MARKER: &str = "*Cohesive Behavior";

/// Minimal deck with one cohesive block
pub const COHESIVE_TEMPLATE: &str = "Header\n*Cohesive Behavior\n1.0, 1.0, 1.0\nFooter\n";

/// Excerpt shaped like a real Abaqus interaction property section
pub const ABAQUS_TEMPLATE: &str = "\
*Heading
** Job name: ControlModel Model name: Model-1
*Part, name=Beam
*End Part
**
** INTERACTION PROPERTIES
**
*Surface Interaction, name=CZM
1.,
*Cohesive Behavior
 1., 1., 1.
*Damage Initiation, criterion=QUADS
 0.01, 0.02, 0.02
*Damage Evolution, type=ENERGY
 0.5,
*Step, name=Load, nlgeom=NO
*End Step
";

pub fn cohesive_template() -> Template {
    Template::parse(COHESIVE_TEMPLATE)
}

/// Temporary workspace holding a template file
pub struct Scenario {
    pub dir: TempDir,
    pub template_path: PathBuf,
}

impl Scenario {
    pub fn with_template(text: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("ControlModel.inp");
        std::fs::write(&template_path, text).unwrap();
        Self { dir, template_path }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("czm_batch_models")
    }

    /// Config pointing at this scenario's template and output directory
    pub fn config(&self) -> BatchConfig {
        BatchConfig::new()
            .with_template(&self.template_path)
            .with_output_dir(self.output_dir())
    }

    /// The two-variant sweep used across the end-to-end tests
    pub fn two_variant_config(&self) -> BatchConfig {
        self.config().with_variant_count(2).with_ranges(
            ParameterRange::new(1.0, 2.0),
            ParameterRange::new(0.1, 0.2),
            ParameterRange::new(0.1, 0.2),
        )
    }
}

pub fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}

/// Log rows after the header
pub fn log_records(path: impl AsRef<Path>) -> Vec<String> {
    read(path).lines().skip(1).map(str::to_owned).collect()
}
