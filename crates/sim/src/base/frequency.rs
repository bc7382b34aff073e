//! Genotype frequency vectors.

use crate::base::genotype::is_set;
use crate::base::{Genotype, GenotypeSpace};
use crate::errors::SimError;
use serde::{Deserialize, Serialize};

/// How far a caller-supplied vector may sum away from one before it is
/// rejected rather than renormalized.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// A probability distribution over the genotypes of a [`GenotypeSpace`].
///
/// Entries are finite, non-negative, and sum to one up to floating error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct FrequencyVector {
    space: GenotypeSpace,
    values: Vec<f64>,
}

impl FrequencyVector {
    /// Validate and renormalize `values`.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidFrequency`] if the length is not `2^L`, any
    /// entry is negative or not finite, or the sum is further than
    /// [`SUM_TOLERANCE`] from one.
    pub fn new(values: Vec<f64>) -> Result<Self, SimError> {
        let checked = Self::checked(values)?;
        let total = checked.total();
        Ok(Self::normalized(checked.space, checked.values, total))
    }

    /// Validate like [`Self::new`] but keep the values bit for bit. Used
    /// when reading back vectors that were normalized before being stored.
    pub fn checked(values: Vec<f64>) -> Result<Self, SimError> {
        let space = GenotypeSpace::from_size(values.len())
            .map_err(|e| SimError::InvalidFrequency(e.to_string()))?;
        if let Some((g, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(SimError::InvalidFrequency(format!(
                "genotype {g} has frequency {v}"
            )));
        }
        let total: f64 = values.iter().sum();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(SimError::InvalidFrequency(format!(
                "frequencies sum to {total}, expected 1"
            )));
        }
        Ok(Self { space, values })
    }

    /// Scale arbitrary non-negative weights to sum to one.
    ///
    /// # Errors
    /// Returns [`SimError::NormalizationFailure`] if the weights sum to zero
    /// or NaN, and [`SimError::InvalidFrequency`] for a negative weight or a
    /// length that is not `2^L`.
    pub fn from_weights(weights: Vec<f64>) -> Result<Self, SimError> {
        let space = GenotypeSpace::from_size(weights.len())
            .map_err(|e| SimError::InvalidFrequency(e.to_string()))?;
        if weights.iter().any(|w| *w < 0.0) {
            return Err(SimError::InvalidFrequency("negative weight".into()));
        }
        let total: f64 = weights.iter().sum();
        if !(total > 0.0 && total.is_finite()) {
            return Err(SimError::NormalizationFailure(total));
        }
        Ok(Self::normalized(space, weights, total))
    }

    /// Equal frequency for every genotype.
    pub fn uniform(space: GenotypeSpace) -> Self {
        let n = space.size();
        Self {
            space,
            values: vec![1.0 / n as f64; n],
        }
    }

    /// Population fixed for a single genotype.
    pub fn fixed(space: GenotypeSpace, genotype: Genotype) -> Result<Self, SimError> {
        if !space.contains(genotype) {
            return Err(SimError::InvalidFrequency(format!(
                "genotype {genotype} outside space of size {}",
                space.size()
            )));
        }
        let mut values = vec![0.0; space.size()];
        values[genotype] = 1.0;
        Ok(Self { space, values })
    }

    /// Linkage-equilibrium genotype frequencies from per-locus allele
    /// frequencies: `f(g) = Π p_i^{bit_i} (1 - p_i)^{1 - bit_i}`.
    pub fn from_allele_frequencies(
        space: GenotypeSpace,
        alleles: &[f64],
    ) -> Result<Self, SimError> {
        if alleles.len() != space.loci() {
            return Err(SimError::LengthMismatch {
                expected: space.loci(),
                actual: alleles.len(),
            });
        }
        if let Some((i, p)) = alleles
            .iter()
            .enumerate()
            .find(|(_, p)| !(0.0..=1.0).contains(*p))
        {
            return Err(SimError::InvalidFrequency(format!(
                "allele frequency at locus {i} is {p}"
            )));
        }
        let values: Vec<f64> = space
            .genotypes()
            .map(|g| {
                alleles
                    .iter()
                    .enumerate()
                    .map(|(i, p)| if is_set(g, i) { *p } else { 1.0 - p })
                    .product()
            })
            .collect();
        let total = values.iter().sum();
        Ok(Self::normalized(space, values, total))
    }

    /// Shift two-locus equilibrium frequencies by a disequilibrium `d`:
    /// the two coupling genotypes (`0` and `N-1`) gain `d`, the repulsion
    /// genotypes (`1` and `N-2`) lose it.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidFrequency`] if any shifted entry would go
    /// negative.
    pub fn with_disequilibrium(&self, d: f64) -> Result<Self, SimError> {
        if self.space.loci() < 2 {
            return Err(SimError::InvalidParameter(
                "disequilibrium needs at least two loci".into(),
            ));
        }
        let n = self.values.len();
        let mut values = self.values.clone();
        values[0] += d;
        values[n - 1] += d;
        values[1] -= d;
        values[n - 2] -= d;
        if values.iter().any(|v| *v < 0.0) {
            return Err(SimError::InvalidFrequency(format!(
                "disequilibrium {d} drives a genotype frequency negative"
            )));
        }
        Self::new(values)
    }

    /// Construct from values the caller has already normalized.
    pub(crate) fn from_normalized(space: GenotypeSpace, values: Vec<f64>) -> Self {
        debug_assert_eq!(space.size(), values.len());
        Self { space, values }
    }

    fn normalized(space: GenotypeSpace, mut values: Vec<f64>, total: f64) -> Self {
        values.iter_mut().for_each(|v| *v /= total);
        Self { space, values }
    }

    /// The genotype space this vector lives in.
    #[inline]
    pub fn space(&self) -> GenotypeSpace {
        self.space
    }

    /// Number of genotypes.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Frequency of genotype `g`, or `0.0` outside the space.
    #[inline]
    pub fn get(&self, g: Genotype) -> f64 {
        self.values.get(g).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Per-locus allele frequencies: the summed frequency of every genotype
    /// whose bit at that locus is set.
    pub fn allele_frequencies(&self) -> Vec<f64> {
        let loci = self.space.loci();
        (0..loci)
            .map(|i| {
                self.values
                    .iter()
                    .enumerate()
                    .filter(|(g, _)| is_set(*g, i))
                    .map(|(_, f)| f)
                    .sum()
            })
            .collect()
    }

    /// Two-locus linkage disequilibrium `f[0] f[N-1] - f[1] f[N-2]`.
    ///
    /// For `L = 2` this is the usual `D = x1 x4 - x2 x3`. A single-locus
    /// vector has no disequilibrium.
    pub fn linkage_disequilibrium(&self) -> f64 {
        let n = self.values.len();
        if n < 4 {
            return 0.0;
        }
        self.values[0] * self.values[n - 1] - self.values[1] * self.values[n - 2]
    }

    /// Euclidean distance to another vector of the same length.
    pub fn distance(&self, other: &Self) -> Result<f64, SimError> {
        if self.len() != other.len() {
            return Err(SimError::LengthMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(crate::simulation::convergence::euclidean_distance(
            &self.values,
            &other.values,
        ))
    }
}

impl TryFrom<Vec<f64>> for FrequencyVector {
    type Error = SimError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<FrequencyVector> for Vec<f64> {
    fn from(freqs: FrequencyVector) -> Self {
        freqs.values
    }
}

impl AsRef<[f64]> for FrequencyVector {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(loci: usize) -> GenotypeSpace {
        GenotypeSpace::new(loci).unwrap()
    }

    #[test]
    fn test_new_validates() {
        assert!(FrequencyVector::new(vec![0.25; 4]).is_ok());
        assert!(FrequencyVector::new(vec![0.5; 3]).is_err());
        assert!(FrequencyVector::new(vec![1.5, -0.5, 0.0, 0.0]).is_err());
        assert!(FrequencyVector::new(vec![0.5, 0.5, 0.5, 0.5]).is_err());
        assert!(FrequencyVector::new(vec![f64::NAN, 0.5, 0.5, 0.0]).is_err());
    }

    #[test]
    fn test_from_weights() {
        let f = FrequencyVector::from_weights(vec![1.0, 1.0, 2.0, 0.0]).unwrap();
        assert_eq!(f.as_slice(), &[0.25, 0.25, 0.5, 0.0]);
        assert!(matches!(
            FrequencyVector::from_weights(vec![0.0; 4]),
            Err(SimError::NormalizationFailure(_))
        ));
    }

    #[test]
    fn test_uniform_and_fixed() {
        let u = FrequencyVector::uniform(space(2));
        assert_eq!(u.as_slice(), &[0.25; 4]);

        let f = FrequencyVector::fixed(space(2), 3).unwrap();
        assert_eq!(f.as_slice(), &[0.0, 0.0, 0.0, 1.0]);
        assert!(FrequencyVector::fixed(space(2), 4).is_err());
    }

    #[test]
    fn test_allele_round_trip() {
        let alleles = [0.1, 0.7, 0.4];
        let f = FrequencyVector::from_allele_frequencies(space(3), &alleles).unwrap();
        assert!((f.total() - 1.0).abs() < 1e-12);
        for (expected, actual) in alleles.iter().zip(f.allele_frequencies()) {
            assert!((expected - actual).abs() < 1e-12);
        }
        // Built at linkage equilibrium.
        assert!(f.linkage_disequilibrium().abs() < 1e-12);
    }

    #[test]
    fn test_allele_frequencies_corner_genotypes() {
        let f = FrequencyVector::from_allele_frequencies(space(2), &[1.0, 0.0]).unwrap();
        assert_eq!(f.as_slice(), &[0.0, 1.0, 0.0, 0.0]);
        assert!(FrequencyVector::from_allele_frequencies(space(2), &[0.5]).is_err());
        assert!(FrequencyVector::from_allele_frequencies(space(2), &[0.5, 1.2]).is_err());
    }

    #[test]
    fn test_disequilibrium() {
        let base = FrequencyVector::from_allele_frequencies(space(2), &[0.5, 0.5]).unwrap();
        let shifted = base.with_disequilibrium(0.1).unwrap();
        assert!((shifted.linkage_disequilibrium() - 0.1).abs() < 1e-12);
        // Allele frequencies are untouched by D.
        for (a, b) in shifted
            .allele_frequencies()
            .iter()
            .zip(base.allele_frequencies())
        {
            assert!((a - b).abs() < 1e-12);
        }
        assert!(base.with_disequilibrium(0.3).is_err());
    }

    #[test]
    fn test_distance() {
        let a = FrequencyVector::fixed(space(1), 0).unwrap();
        let b = FrequencyVector::fixed(space(1), 1).unwrap();
        assert!((a.distance(&b).unwrap() - 2f64.sqrt()).abs() < 1e-15);
        let c = FrequencyVector::uniform(space(2));
        assert!(a.distance(&c).is_err());
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let ok: FrequencyVector = serde_json::from_str("[0.5, 0.5]").unwrap();
        assert_eq!(ok.len(), 2);
        assert!(serde_json::from_str::<FrequencyVector>("[0.5, 0.6]").is_err());
    }
}
