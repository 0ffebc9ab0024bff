//! Parameter sampling
//!
//! Each stiffness axis is sampled independently with evenly spaced values
//! over its closed range. The three sequences are zipped by index into
//! [`ParameterTriple`]s, one per variant.

use std::fmt;

use crate::config::{BatchConfig, ParameterRange};
use crate::error::{BatchError, Result};
use crate::format::general;

/// Stiffness values assigned to one variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterTriple {
    /// Normal stiffness
    pub knn: f64,
    /// First shear stiffness
    pub kss: f64,
    /// Second shear stiffness
    pub ktt: f64,
}

impl ParameterTriple {
    /// Create new triple
    #[inline]
    #[must_use]
    pub const fn new(knn: f64, kss: f64, ktt: f64) -> Self {
        Self { knn, kss, ktt }
    }
}

/// Renders `knn, kss, ktt` in general format, no line terminator
impl fmt::Display for ParameterTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            general(self.knn),
            general(self.kss),
            general(self.ktt)
        )
    }
}

/// `count` evenly spaced values from `min` to `max` inclusive
///
/// `count == 1` yields `[min]`. For `count >= 2` the last element is exactly
/// `max`; descending ranges produce a non-increasing sequence.
///
/// # Errors
/// Returns `BatchError::InvalidConfiguration` if `count` is zero or the
/// span `max - min` is not finite
pub fn linspace(min: f64, max: f64, count: usize) -> Result<Vec<f64>> {
    if count == 0 {
        return Err(BatchError::invalid_config("sample count must be at least 1"));
    }
    if !(max - min).is_finite() {
        return Err(BatchError::invalid_config(format!(
            "span of [{min}, {max}] is not finite"
        )));
    }

    let mut values: Vec<f64> = itertools_num::linspace(min, max, count).collect();
    // The crate ends on `min + step * (count - 1)`, which may miss `max` by an ulp.
    if count >= 2 {
        values[count - 1] = max;
    }
    Ok(values)
}

/// Sample one axis over its range
///
/// # Errors
/// Returns `BatchError::InvalidConfiguration` if `count` is zero
#[inline]
pub fn sample_range(range: ParameterRange, count: usize) -> Result<Vec<f64>> {
    linspace(range.min, range.max, count)
}

/// Sample all three axes of `config` and zip them into triples
///
/// # Errors
/// Returns `BatchError::InvalidConfiguration` if the variant count is zero
pub fn sample_triples(config: &BatchConfig) -> Result<Vec<ParameterTriple>> {
    let count = config.variant_count;
    let knn = sample_range(config.knn, count)?;
    let kss = sample_range(config.kss, count)?;
    let ktt = sample_range(config.ktt, count)?;

    let triples: Vec<ParameterTriple> = knn
        .into_iter()
        .zip(kss)
        .zip(ktt)
        .map(|((knn, kss), ktt)| ParameterTriple::new(knn, kss, ktt))
        .collect();

    tracing::debug!(count = triples.len(), "sampled parameter triples");
    Ok(triples)
}
