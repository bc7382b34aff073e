//! Bit-encoded biallelic haplotypes.
//!
//! A haplotype over `L` biallelic loci is stored as an integer in
//! `[0, 2^L)`: bit `i` holds the allele at locus `i`. Genotype equality is
//! integer equality, so no two genotypes alias.

use crate::errors::SimError;
use serde::{Deserialize, Serialize};

/// A haplotype index in `[0, 2^L)`.
pub type Genotype = usize;

/// Largest locus count a [`GenotypeSpace`] accepts.
///
/// Dense per-generation storage is `N^2` doubles, so anything past this is
/// impractical long before the index arithmetic overflows.
pub const MAX_LOCI: usize = 16;

/// The set of all haplotypes over a fixed number of biallelic loci.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenotypeSpace {
    loci: usize,
}

impl GenotypeSpace {
    /// Create a genotype space over `loci` loci.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidParameter`] if `loci` is zero or exceeds
    /// [`MAX_LOCI`].
    pub fn new(loci: usize) -> Result<Self, SimError> {
        if loci == 0 || loci > MAX_LOCI {
            return Err(SimError::InvalidParameter(format!(
                "locus count must be between 1 and {MAX_LOCI}, got {loci}"
            )));
        }
        Ok(Self { loci })
    }

    /// Recover the space from a genotype count `N = 2^L`.
    pub fn from_size(size: usize) -> Result<Self, SimError> {
        if !size.is_power_of_two() || size < 2 {
            return Err(SimError::InvalidParameter(format!(
                "genotype count {size} is not 2^L for L >= 1"
            )));
        }
        Self::new(size.trailing_zeros() as usize)
    }

    /// Number of loci `L`.
    #[inline]
    pub fn loci(&self) -> usize {
        self.loci
    }

    /// Number of genotypes `N = 2^L`.
    #[inline]
    pub fn size(&self) -> usize {
        1 << self.loci
    }

    /// Bit mask with one bit set per locus.
    #[inline]
    pub fn full_mask(&self) -> Genotype {
        self.size() - 1
    }

    /// Iterate over every genotype in the space.
    pub fn genotypes(&self) -> std::ops::Range<Genotype> {
        0..self.size()
    }

    /// Whether `g` is a member of this space.
    #[inline]
    pub fn contains(&self, g: Genotype) -> bool {
        g < self.size()
    }

    /// Allele of genotype `g` at locus `locus`.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidLocus`] if `locus >= L`.
    pub fn bit(&self, g: Genotype, locus: usize) -> Result<bool, SimError> {
        if locus >= self.loci {
            return Err(SimError::InvalidLocus {
                locus,
                loci: self.loci,
            });
        }
        Ok(is_set(g, locus))
    }

    /// Number of loci at which `a` and `b` carry different alleles.
    #[inline]
    pub fn hamming_distance(&self, a: Genotype, b: Genotype) -> u32 {
        ((a ^ b) & self.full_mask()).count_ones()
    }

    /// Bitwise complement of `g` within the space.
    #[inline]
    pub fn complement(&self, g: Genotype) -> Genotype {
        !g & self.full_mask()
    }

    /// Genotype carrying the given alleles, locus 0 first.
    pub fn from_alleles(&self, alleles: &[bool]) -> Result<Genotype, SimError> {
        if alleles.len() != self.loci {
            return Err(SimError::LengthMismatch {
                expected: self.loci,
                actual: alleles.len(),
            });
        }
        Ok(alleles
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .fold(0, |g, (i, _)| g | (1 << i)))
    }

    /// Render `g` as an allele string, locus 0 first (e.g. `"10"` for `g = 1`, `L = 2`).
    pub fn label(&self, g: Genotype) -> String {
        (0..self.loci)
            .map(|i| if is_set(g, i) { '1' } else { '0' })
            .collect()
    }
}

/// Unchecked bit access for hot loops where the locus is known to be in range.
#[inline(always)]
pub(crate) fn is_set(g: Genotype, locus: usize) -> bool {
    (g >> locus) & 1 == 1
}
