//! Starting frequency vectors for trials.

use crate::base::{FrequencyVector, Genotype, GenotypeSpace};
use crate::errors::SimError;
use rand::Rng;
use rand_distr::Exp1;
use serde::{Deserialize, Serialize};

/// How each trial's initial [`FrequencyVector`] is chosen.
///
/// Deterministic variants give every trial the same start. `Corners` walks
/// the fixed genotypes first and falls back to random allele frequencies,
/// and the `Random*` variants draw from the trial's own RNG.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InitialCondition {
    /// Equal frequency for every genotype.
    #[default]
    Uniform,
    /// Explicit genotype frequencies.
    Genotypes { frequencies: Vec<f64> },
    /// Per-locus allele frequencies at linkage equilibrium.
    Alleles { frequencies: Vec<f64> },
    /// Monomorphic for one genotype.
    Fixed { genotype: Genotype },
    /// Allele frequencies plus a two-locus disequilibrium.
    Disequilibrium { alleles: Vec<f64>, d: f64 },
    /// Trial `i < N` starts fixed for genotype `i`; later trials use random
    /// allele frequencies.
    Corners,
    /// Uniform random allele frequency per locus.
    RandomAlleles,
    /// Normalized `Exp(1)` draws per genotype (uniform on the simplex).
    RandomGenotypes,
}

impl InitialCondition {
    /// Whether trials draw on their RNG.
    pub fn is_random(&self) -> bool {
        matches!(self, Self::Corners | Self::RandomAlleles | Self::RandomGenotypes)
    }

    /// Check parameters against `space` without drawing.
    pub fn validate(&self, space: GenotypeSpace) -> Result<(), SimError> {
        match self {
            Self::Uniform | Self::Corners | Self::RandomAlleles | Self::RandomGenotypes => Ok(()),
            _ => self.deterministic(space).map(|_| ()),
        }
    }

    /// The starting vector for trial `trial`.
    pub fn realize<R: Rng + ?Sized>(
        &self,
        space: GenotypeSpace,
        trial: usize,
        rng: &mut R,
    ) -> Result<FrequencyVector, SimError> {
        match self {
            Self::Corners if trial < space.size() => FrequencyVector::fixed(space, trial),
            Self::Corners | Self::RandomAlleles => {
                let alleles: Vec<f64> = (0..space.loci()).map(|_| rng.random::<f64>()).collect();
                FrequencyVector::from_allele_frequencies(space, &alleles)
            }
            Self::RandomGenotypes => {
                let weights: Vec<f64> = space.genotypes().map(|_| rng.sample(Exp1)).collect();
                FrequencyVector::from_weights(weights)
            }
            _ => self.deterministic(space),
        }
    }

    fn deterministic(&self, space: GenotypeSpace) -> Result<FrequencyVector, SimError> {
        match self {
            Self::Uniform => Ok(FrequencyVector::uniform(space)),
            Self::Genotypes { frequencies } => {
                let freqs = FrequencyVector::new(frequencies.clone())?;
                if freqs.len() != space.size() {
                    return Err(SimError::LengthMismatch {
                        expected: space.size(),
                        actual: freqs.len(),
                    });
                }
                Ok(freqs)
            }
            Self::Alleles { frequencies } => {
                FrequencyVector::from_allele_frequencies(space, frequencies)
            }
            Self::Fixed { genotype } => FrequencyVector::fixed(space, *genotype),
            Self::Disequilibrium { alleles, d } => {
                FrequencyVector::from_allele_frequencies(space, alleles)?.with_disequilibrium(*d)
            }
            Self::Corners | Self::RandomAlleles | Self::RandomGenotypes => Err(
                SimError::InvalidParameter("random initial condition needs an RNG".into()),
            ),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Genotypes { .. } => "genotypes",
            Self::Alleles { .. } => "alleles",
            Self::Fixed { .. } => "fixed",
            Self::Disequilibrium { .. } => "disequilibrium",
            Self::Corners => "corners",
            Self::RandomAlleles => "random_alleles",
            Self::RandomGenotypes => "random_genotypes",
        }
    }
}
