//! Haploid viability selection.
//!
//! Each genotype `i` carries a fitness `W_i`. Selection reweights genotype
//! frequencies by fitness and divides by the population mean fitness
//! `w̄ = Σ f_i W_i`, so only fitness ratios matter:
//!
//! ```text
//! f'_i = f_i W_i / w̄
//! ```
//!
//! ## Fitness Models
//!
//! A [`FitnessModel`] describes how the per-genotype fitness vector is built:
//! - **Neutral**: every genotype has fitness 1 and selection is the identity
//! - **Explicit**: one value per genotype, as read from a configuration file
//! - **Additive**: `W = base + Σ effect_i · bit_i`, so loci contribute
//!   independently on the arithmetic scale
//! - **Multiplicative**: `W = Π (1 + s_i)^bit_i`, independent effects on the
//!   log scale (no epistasis in log fitness)
//!
//! Any model producing a negative or non-finite fitness is rejected when the
//! vector is built.

use crate::base::genotype::is_set;
use crate::base::{FitnessVector, FrequencyVector, Genotype, GenotypeSpace};
use crate::errors::SimError;
use serde::{Deserialize, Serialize};

/// How per-genotype fitness is derived for a run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FitnessModel {
    #[default]
    Neutral,
    /// One fitness per genotype, indexed by genotype integer.
    Explicit { values: Vec<f64> },
    /// `base + Σ effects[i]` over the loci where the genotype carries allele 1.
    Additive { base: f64, effects: Vec<f64> },
    /// `Π (1 + coefficients[i])` over the loci where the genotype carries allele 1.
    Multiplicative { coefficients: Vec<f64> },
}

impl FitnessModel {
    /// Fitness of a single genotype. Does not validate the result.
    pub fn fitness_of(&self, genotype: Genotype) -> f64 {
        match self {
            Self::Neutral => 1.0,
            Self::Explicit { values } => values.get(genotype).copied().unwrap_or(f64::NAN),
            Self::Additive { base, effects } => {
                base + effects
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| is_set(genotype, *i))
                    .map(|(_, e)| e)
                    .sum::<f64>()
            }
            Self::Multiplicative { coefficients } => coefficients
                .iter()
                .enumerate()
                .filter(|(i, _)| is_set(genotype, *i))
                .map(|(_, s)| 1.0 + s)
                .product(),
        }
    }

    /// Build the fitness vector over `space`.
    ///
    /// # Errors
    /// - [`SimError::LengthMismatch`] if an explicit vector has the wrong size,
    ///   or per-locus parameters do not match the locus count
    /// - [`SimError::InvalidParameter`] if any resulting fitness is negative
    ///   or not finite
    pub fn fitness_vector(&self, space: GenotypeSpace) -> Result<FitnessVector, SimError> {
        let expected = match self {
            Self::Neutral => return Ok(FitnessVector::neutral(space)),
            Self::Explicit { values } => (space.size(), values.len()),
            Self::Additive { effects, .. } => (space.loci(), effects.len()),
            Self::Multiplicative { coefficients } => (space.loci(), coefficients.len()),
        };
        if expected.0 != expected.1 {
            return Err(SimError::LengthMismatch {
                expected: expected.0,
                actual: expected.1,
            });
        }
        FitnessVector::new(space.genotypes().map(|g| self.fitness_of(g)).collect())
    }

    /// Short name for summaries.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Explicit { .. } => "explicit",
            Self::Additive { .. } => "additive",
            Self::Multiplicative { .. } => "multiplicative",
        }
    }
}

/// Reweight `freqs` by `fitness` and renormalize by the mean fitness.
///
/// # Errors
/// - [`SimError::LengthMismatch`] if the vectors differ in length
/// - [`SimError::DegenerateFitness`] if the mean fitness is non-positive or NaN
pub fn apply_selection(
    freqs: &FrequencyVector,
    fitness: &FitnessVector,
) -> Result<FrequencyVector, SimError> {
    let mean = fitness.mean(freqs)?;
    if !(mean > 0.0 && mean.is_finite()) {
        return Err(SimError::DegenerateFitness(mean));
    }
    let values = freqs
        .iter()
        .zip(fitness.as_slice())
        .map(|(f, w)| f * w / mean)
        .collect();
    Ok(FrequencyVector::from_normalized(freqs.space(), values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(loci: usize) -> GenotypeSpace {
        GenotypeSpace::new(loci).unwrap()
    }

    #[test]
    fn test_neutral_selection_is_identity() {
        let f = FrequencyVector::new(vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let w = FitnessModel::Neutral.fitness_vector(space(2)).unwrap();
        let selected = apply_selection(&f, &w).unwrap();
        for (a, b) in f.iter().zip(selected.iter()) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_selection_reweights() {
        let f = FrequencyVector::uniform(space(1));
        let w = FitnessVector::new(vec![1.0, 3.0]).unwrap();
        let selected = apply_selection(&f, &w).unwrap();
        assert!((selected.get(0) - 0.25).abs() < 1e-15);
        assert!((selected.get(1) - 0.75).abs() < 1e-15);
    }

    #[test]
    fn test_degenerate_fitness() {
        // All surviving mass sits on a lethal genotype.
        let f = FrequencyVector::fixed(space(1), 1).unwrap();
        let w = FitnessVector::new(vec![1.0, 0.0]).unwrap();
        assert_eq!(
            apply_selection(&f, &w),
            Err(SimError::DegenerateFitness(0.0))
        );
    }

    #[test]
    fn test_additive_model() {
        let model = FitnessModel::Additive {
            base: 1.0,
            effects: vec![0.1, 0.2],
        };
        let w = model.fitness_vector(space(2)).unwrap();
        let expected = [1.0, 1.1, 1.2, 1.3];
        for (a, b) in w.as_slice().iter().zip(expected) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_multiplicative_model() {
        let model = FitnessModel::Multiplicative {
            coefficients: vec![0.5, -0.5],
        };
        let w = model.fitness_vector(space(2)).unwrap();
        assert_eq!(w.as_slice(), &[1.0, 1.5, 0.5, 0.75]);
    }

    #[test]
    fn test_model_validation() {
        let wrong_len = FitnessModel::Explicit { values: vec![1.0; 3] };
        assert!(matches!(
            wrong_len.fitness_vector(space(2)),
            Err(SimError::LengthMismatch { expected: 4, actual: 3 })
        ));
        let negative = FitnessModel::Additive {
            base: 0.0,
            effects: vec![-1.0],
        };
        assert!(matches!(
            negative.fitness_vector(space(1)),
            Err(SimError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_model_serde() {
        let model: FitnessModel =
            serde_json::from_str(r#"{"type":"explicit","values":[1.0,0.9]}"#).unwrap();
        assert_eq!(model.name(), "explicit");
        assert_eq!(model.fitness_of(1), 0.9);
    }
}
