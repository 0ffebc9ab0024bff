//! CZM Batch
//!
//! Generates families of Abaqus input decks that differ only in their
//! cohesive-zone interface stiffness.
//!
//! # Pipeline
//!
//! ```text
//! BatchConfig → sampler → [ParameterTriple; N]
//!                              ↓
//! ControlModel.inp → Template::substitute → BatchWriter → var1..varN + log
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use czm_batch::{BatchConfig, BatchGenerator};
//!
//! # fn example() -> czm_batch::Result<()> {
//! let config = BatchConfig::new()
//!     .with_template("ControlModel.inp")
//!     .with_variant_count(10);
//!
//! let summary = BatchGenerator::new(config)?
//!     .run_with_progress(|v| println!("Created {}", v.file_name()))?;
//! println!("{} variants in {}", summary.variant_count(), summary.output_dir.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod format;
pub mod generator;
pub mod sampler;
pub mod template;
pub mod writer;

pub use config::{BatchConfig, ParameterRange};
pub use error::{BatchError, Result};
pub use generator::{BatchGenerator, BatchSummary, GeneratedVariant};
pub use sampler::{linspace, sample_triples, ParameterTriple};
pub use template::{Substitution, Template};
pub use writer::{BatchWriter, LogRecord, VariantId, VariantNaming, LOG_HEADER};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
