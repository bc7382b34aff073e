//! Mating tables.
//!
//! A mating table is a dense `N x N` matrix whose entry `(i, j)` is the
//! probability that a mating pairs genotype `i` with genotype `j`. The
//! generation stepper only depends on [`MatingTableProvider`]; which rule
//! produces the table is up to the caller.

use crate::base::{DenseMatrix, FrequencyVector, Genotype};
use crate::errors::SimError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense genotype-by-genotype mating probabilities summing to one.
pub type MatingTable = DenseMatrix;

/// Above this many genotypes the table is filled on the rayon pool.
const PARALLEL_MIN_GENOTYPES: usize = 256;

/// Produces a mating table from the current (post-selection) frequencies.
///
/// Implementations must return a table with non-negative entries that sums
/// to one. Plain functions and closures with the right signature implement
/// this trait too.
pub trait MatingTableProvider: Send + Sync {
    fn mating_table(&self, freqs: &FrequencyVector) -> Result<MatingTable, SimError>;

    /// Short name used in logs and summaries.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> MatingTableProvider for F
where
    F: Fn(&FrequencyVector) -> Result<MatingTable, SimError> + Send + Sync,
{
    fn mating_table(&self, freqs: &FrequencyVector) -> Result<MatingTable, SimError> {
        self(freqs)
    }
}

/// Fill `M[i][j] = f_i f_j * weight(i, j)` and normalize to one.
fn weighted_table<W>(freqs: &FrequencyVector, weight: W) -> Result<MatingTable, SimError>
where
    W: Fn(Genotype, Genotype) -> f64 + Sync,
{
    let f = freqs.as_slice();
    let n = f.len();
    let cell = |idx: usize| {
        let (i, j) = (idx / n, idx % n);
        f[i] * f[j] * weight(i, j)
    };
    let data: Vec<f64> = if n >= PARALLEL_MIN_GENOTYPES {
        (0..n * n).into_par_iter().map(cell).collect()
    } else {
        (0..n * n).map(cell).collect()
    };
    let mut table = DenseMatrix::from_row_major(n, data)?;
    table.normalize()?;
    Ok(table)
}

fn check_distortion(distortion: f64) -> Result<f64, SimError> {
    if !(0.0..=1.0).contains(&distortion) {
        return Err(SimError::InvalidParameter(format!(
            "mating distortion must be between 0.0 and 1.0, got {distortion}"
        )));
    }
    Ok(distortion)
}

/// Random union of gametes: `M[i][j] = f_i f_j`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RandomMating;

impl MatingTableProvider for RandomMating {
    fn mating_table(&self, freqs: &FrequencyVector) -> Result<MatingTable, SimError> {
        weighted_table(freqs, |_, _| 1.0)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Positive assortment by identity.
///
/// Pairs of identical genotypes are weighted by `1 - distortion`, every
/// other pair by `distortion`. A distortion of `0.5` is random mating;
/// `0.0` allows only like-with-like matings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssortativeMating {
    distortion: f64,
}

impl AssortativeMating {
    pub fn new(distortion: f64) -> Result<Self, SimError> {
        Ok(Self {
            distortion: check_distortion(distortion)?,
        })
    }

    pub fn distortion(&self) -> f64 {
        self.distortion
    }
}

impl MatingTableProvider for AssortativeMating {
    fn mating_table(&self, freqs: &FrequencyVector) -> Result<MatingTable, SimError> {
        let d = self.distortion;
        weighted_table(freqs, |i, j| if i == j { 1.0 - d } else { d })
    }

    fn name(&self) -> &'static str {
        "assortative"
    }
}

/// Assortment graded by similarity.
///
/// A pair differing at `h` of `L` loci is weighted by
/// `(1 - distortion)^(L - h) * distortion^h`, so each shared locus counts
/// like an identical pair in [`AssortativeMating`] and each differing locus
/// like a mismatched one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityMating {
    distortion: f64,
}

impl SimilarityMating {
    pub fn new(distortion: f64) -> Result<Self, SimError> {
        Ok(Self {
            distortion: check_distortion(distortion)?,
        })
    }

    pub fn distortion(&self) -> f64 {
        self.distortion
    }
}

impl MatingTableProvider for SimilarityMating {
    fn mating_table(&self, freqs: &FrequencyVector) -> Result<MatingTable, SimError> {
        let space = freqs.space();
        let loci = space.loci() as i32;
        let d = self.distortion;
        // One weight per Hamming distance.
        let weights: Vec<f64> = (0..=loci)
            .map(|h| (1.0 - d).powi(loci - h) * d.powi(h))
            .collect();
        weighted_table(freqs, |i, j| {
            weights[space.hamming_distance(i, j) as usize]
        })
    }

    fn name(&self) -> &'static str {
        "similarity"
    }
}

/// Serializable choice of mating rule, as stored in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatingRule {
    #[default]
    Random,
    Assortative {
        distortion: f64,
    },
    Similarity {
        distortion: f64,
    },
}

impl MatingRule {
    /// Check parameters without building a table.
    pub fn validate(&self) -> Result<(), SimError> {
        match self {
            Self::Random => Ok(()),
            Self::Assortative { distortion } | Self::Similarity { distortion } => {
                check_distortion(*distortion).map(|_| ())
            }
        }
    }
}

impl MatingTableProvider for MatingRule {
    fn mating_table(&self, freqs: &FrequencyVector) -> Result<MatingTable, SimError> {
        match *self {
            Self::Random => RandomMating.mating_table(freqs),
            Self::Assortative { distortion } => {
                AssortativeMating::new(distortion)?.mating_table(freqs)
            }
            Self::Similarity { distortion } => {
                SimilarityMating::new(distortion)?.mating_table(freqs)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Random => RandomMating.name(),
            Self::Assortative { .. } => "assortative",
            Self::Similarity { .. } => "similarity",
        }
    }
}

impl fmt::Display for MatingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Assortative { distortion } => write!(f, "assortative (distortion {distortion})"),
            Self::Similarity { distortion } => write!(f, "similarity (distortion {distortion})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::GenotypeSpace;

    fn freqs() -> FrequencyVector {
        FrequencyVector::new(vec![0.1, 0.2, 0.3, 0.4]).unwrap()
    }

    fn assert_table(table: &MatingTable) {
        assert!((table.total() - 1.0).abs() < 1e-12);
        assert!(table.as_slice().iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_random_mating_is_outer_product() {
        let f = freqs();
        let table = RandomMating.mating_table(&f).unwrap();
        assert_table(&table);
        for i in 0..4 {
            for j in 0..4 {
                assert!((table.get(i, j) - f.get(i) * f.get(j)).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_assortative_half_is_random() {
        let f = freqs();
        let random = RandomMating.mating_table(&f).unwrap();
        let half = AssortativeMating::new(0.5).unwrap().mating_table(&f).unwrap();
        for (a, b) in random.as_slice().iter().zip(half.as_slice()) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_assortative_zero_is_diagonal() {
        let table = AssortativeMating::new(0.0)
            .unwrap()
            .mating_table(&freqs())
            .unwrap();
        assert_table(&table);
        assert_eq!(table.get(0, 1), 0.0);
        assert!(table.get(3, 3) > table.get(2, 2));
    }

    #[test]
    fn test_similarity_weights_by_distance() {
        let space = GenotypeSpace::new(2).unwrap();
        let table = SimilarityMating::new(0.1)
            .unwrap()
            .mating_table(&FrequencyVector::uniform(space))
            .unwrap();
        assert_table(&table);
        // distance 0 : 1 : 2 weighted 0.81 : 0.09 : 0.01
        assert!((table.get(0, 0) / table.get(0, 1) - 9.0).abs() < 1e-9);
        assert!((table.get(0, 1) / table.get(0, 3) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_distortion_bounds() {
        assert!(AssortativeMating::new(1.1).is_err());
        assert!(SimilarityMating::new(-0.1).is_err());
        assert!(MatingRule::Assortative { distortion: f64::NAN }.validate().is_err());
        assert!(MatingRule::Random.validate().is_ok());
    }

    #[test]
    fn test_degenerate_table_fails() {
        // Only mismatched pairs allowed, but the population is monomorphic.
        let fixed = FrequencyVector::fixed(GenotypeSpace::new(2).unwrap(), 0).unwrap();
        let err = AssortativeMating::new(1.0).unwrap().mating_table(&fixed);
        assert!(matches!(err, Err(SimError::NormalizationFailure(_))));
    }

    #[test]
    fn test_closure_provider() {
        let provider = |f: &FrequencyVector| RandomMating.mating_table(f);
        assert_eq!(provider.name(), "custom");
        assert_table(&provider.mating_table(&freqs()).unwrap());
    }

    #[test]
    fn test_rule_serde() {
        let rule: MatingRule =
            serde_json::from_str(r#"{"type":"assortative","distortion":0.2}"#).unwrap();
        assert_eq!(rule, MatingRule::Assortative { distortion: 0.2 });
        assert_eq!(rule.name(), "assortative");
        let json = serde_json::to_string(&MatingRule::Random).unwrap();
        assert_eq!(json, r#"{"type":"random"}"#);
    }
}
