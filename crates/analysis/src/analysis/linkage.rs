//! Linkage disequilibrium analysis
//!
//! Measures non-random association of alleles at different loci directly
//! from genotype frequencies, with no sampling involved.

use hapdyn_sim::{FrequencyVector, SimError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Linkage disequilibrium statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LDStatistics {
    /// D statistic (raw disequilibrium)
    pub d: f64,
    /// D' (normalized D)
    pub d_prime: f64,
    /// r² (correlation coefficient squared)
    pub r_squared: f64,
}

impl LDStatistics {
    const NONE: Self = Self {
        d: 0.0,
        d_prime: 0.0,
        r_squared: 0.0,
    };
}

/// Two-locus disequilibrium of the corner genotypes.
///
/// # Formula
///
/// $$D = f_0 f_{N-1} - f_1 f_{N-2}$$
///
/// For `L = 2` this is the classic `x₁x₄ − x₂x₃`.
pub fn two_locus_d(freqs: &FrequencyVector) -> f64 {
    freqs.linkage_disequilibrium()
}

/// Calculate linkage disequilibrium between loci `i` and `j`
///
/// With `p_i`, `p_j` the frequencies of allele 1 at each locus and `p_ij`
/// the frequency of genotypes carrying allele 1 at both:
///
/// $$D = p_{ij} - p_i p_j$$
///
/// D' divides by the largest |D| the allele frequencies allow and r² by
/// `p_i(1-p_i)p_j(1-p_j)`. Both are zero when a locus is monomorphic.
///
/// # Errors
///
/// Returns [`SimError::InvalidLocus`] if either locus is out of range.
///
/// # References
///
/// Lewontin, R. C. (1964). The Interaction of Selection and Linkage. I. General
/// Considerations; Heterotic Models. Genetics, 49(1), 49-67.
pub fn pairwise_ld(freqs: &FrequencyVector, i: usize, j: usize) -> Result<LDStatistics, SimError> {
    let loci = freqs.space().loci();
    for locus in [i, j] {
        if locus >= loci {
            return Err(SimError::InvalidLocus { locus, loci });
        }
    }
    if i == j {
        return Ok(LDStatistics::NONE);
    }

    let (mut p_i, mut p_j, mut p_ij) = (0.0, 0.0, 0.0);
    for (g, f) in freqs.iter().enumerate() {
        let a = (g >> i) & 1 == 1;
        let b = (g >> j) & 1 == 1;
        if a {
            p_i += f;
        }
        if b {
            p_j += f;
        }
        if a && b {
            p_ij += f;
        }
    }

    let d = p_ij - p_i * p_j;

    let d_prime = if d >= 0.0 {
        let d_max = (p_i * (1.0 - p_j)).min((1.0 - p_i) * p_j);
        if d_max > 0.0 { d / d_max } else { 0.0 }
    } else {
        let d_max = (p_i * p_j).min((1.0 - p_i) * (1.0 - p_j));
        if d_max > 0.0 { -d / d_max } else { 0.0 }
    };

    let denominator = p_i * (1.0 - p_i) * p_j * (1.0 - p_j);
    let r_squared = if denominator > 0.0 {
        (d * d) / denominator
    } else {
        0.0
    };

    Ok(LDStatistics {
        d,
        d_prime,
        r_squared,
    })
}

/// All pairwise statistics as an `L x L` matrix (diagonal is zero).
pub fn ld_matrix(freqs: &FrequencyVector) -> Vec<Vec<LDStatistics>> {
    let loci = freqs.space().loci();
    (0..loci)
        .into_par_iter()
        .map(|i| {
            (0..loci)
                .map(|j| pairwise_ld(freqs, i, j).unwrap_or(LDStatistics::NONE))
                .collect()
        })
        .collect()
}

/// Mean r² over locus pairs at each distance `1..L`.
pub fn ld_decay(freqs: &FrequencyVector) -> Vec<(usize, f64)> {
    let matrix = ld_matrix(freqs);
    let loci = matrix.len();
    (1..loci)
        .map(|distance| {
            let pairs: Vec<f64> = (0..loci - distance)
                .map(|i| matrix[i][i + distance].r_squared)
                .collect();
            (distance, pairs.iter().sum::<f64>() / pairs.len() as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_coupling() {
        let f = FrequencyVector::new(vec![0.5, 0.0, 0.0, 0.5]).unwrap();
        let ld = pairwise_ld(&f, 0, 1).unwrap();
        assert!((ld.d - 0.25).abs() < 1e-12);
        assert!((ld.d_prime - 1.0).abs() < 1e-12);
        assert!((ld.r_squared - 1.0).abs() < 1e-12);
        assert!((two_locus_d(&f) - ld.d).abs() < 1e-12);
    }

    #[test]
    fn test_repulsion_is_negative() {
        let f = FrequencyVector::new(vec![0.0, 0.5, 0.5, 0.0]).unwrap();
        let ld = pairwise_ld(&f, 0, 1).unwrap();
        assert!((ld.d + 0.25).abs() < 1e-12);
        assert!((ld.d_prime - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_equilibrium_and_monomorphic() {
        let f = FrequencyVector::new(vec![0.25; 4]).unwrap();
        assert_eq!(pairwise_ld(&f, 0, 1).unwrap().d, 0.0);

        let fixed = FrequencyVector::new(vec![0.0, 0.0, 0.0, 1.0]).unwrap();
        let ld = pairwise_ld(&fixed, 0, 1).unwrap();
        assert_eq!(ld.d_prime, 0.0);
        assert_eq!(ld.r_squared, 0.0);
    }

    #[test]
    fn test_invalid_locus() {
        let f = FrequencyVector::new(vec![0.25; 4]).unwrap();
        assert!(matches!(
            pairwise_ld(&f, 0, 2),
            Err(SimError::InvalidLocus { locus: 2, loci: 2 })
        ));
    }

    #[test]
    fn test_matrix_and_decay() {
        // Loci 0 and 1 fully associated, locus 2 independent.
        let f = FrequencyVector::from_weights(vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0]).unwrap();
        let m = ld_matrix(&f);
        assert_eq!(m.len(), 3);
        assert!((m[0][1].r_squared - 1.0).abs() < 1e-12);
        assert!(m[0][2].r_squared.abs() < 1e-12);
        assert_eq!(m[1][1], LDStatistics::NONE);

        let decay = ld_decay(&f);
        assert_eq!(decay.len(), 2);
        assert!((decay[0].1 - 0.5).abs() < 1e-12);
        assert!(decay[1].1.abs() < 1e-12);
    }
}
