use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::base::{FrequencyVector, Genotype, GenotypeSpace};
use crate::errors::SimError;

/// Per-genotype fitness `W`, constant for a trial.
///
/// Values are finite and non-negative. Unlike a frequency vector there is no
/// normalization: only ratios between entries matter to selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct FitnessVector(Vec<f64>);

impl FitnessVector {
    /// Validate a fitness vector.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidParameter`] if the length is not `2^L` or
    /// any entry is negative or not finite.
    pub fn new(values: Vec<f64>) -> Result<Self, SimError> {
        GenotypeSpace::from_size(values.len())?;
        if let Some((g, w)) = values
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(SimError::InvalidParameter(format!(
                "fitness of genotype {g} is {w}"
            )));
        }
        Ok(Self(values))
    }

    /// Every genotype has fitness one.
    pub fn neutral(space: GenotypeSpace) -> Self {
        Self(vec![1.0; space.size()])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Whether every genotype has the same fitness.
    pub fn is_neutral(&self) -> bool {
        self.0.windows(2).all(|w| w[0] == w[1])
    }

    /// Population mean fitness `w̄ = Σ f_i W_i`.
    ///
    /// # Errors
    /// Returns [`SimError::LengthMismatch`] if the vectors differ in length.
    pub fn mean(&self, freqs: &FrequencyVector) -> Result<f64, SimError> {
        if freqs.len() != self.len() {
            return Err(SimError::LengthMismatch {
                expected: self.len(),
                actual: freqs.len(),
            });
        }
        Ok(freqs.iter().zip(&self.0).map(|(f, w)| f * w).sum())
    }
}

impl Index<Genotype> for FitnessVector {
    type Output = f64;

    fn index(&self, g: Genotype) -> &f64 {
        &self.0[g]
    }
}

impl TryFrom<Vec<f64>> for FitnessVector {
    type Error = SimError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<FitnessVector> for Vec<f64> {
    fn from(fitness: FitnessVector) -> Self {
        fitness.0
    }
}

impl fmt::Display for FitnessVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, w) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{w}")?;
        }
        write!(f, "]")
    }
}
