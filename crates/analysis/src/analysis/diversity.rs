//! Diversity metrics for haplotype frequencies
//!
//! Implements standard measures of haplotype diversity:
//! - Haplotype (gene) diversity
//! - Shannon entropy
//! - Effective number of haplotypes

use hapdyn_sim::FrequencyVector;

/// Calculate haplotype diversity
///
/// Probability that two haplotypes drawn at random are different.
///
/// # Formula
///
/// $$H = 1 - \sum_i f_i^2$$
///
/// # Examples
///
/// ```
/// use hapdyn_analysis::analysis::diversity::haplotype_diversity;
/// use hapdyn_sim::FrequencyVector;
///
/// let f = FrequencyVector::new(vec![0.25; 4]).unwrap();
/// assert_eq!(haplotype_diversity(&f), 0.75);
/// ```
pub fn haplotype_diversity(freqs: &FrequencyVector) -> f64 {
    1.0 - homozygosity(freqs)
}

/// Shannon entropy in nats, `-Σ f ln f` over non-zero frequencies.
pub fn shannon_entropy(freqs: &FrequencyVector) -> f64 {
    -freqs
        .iter()
        .filter(|f| **f > 0.0)
        .map(|f| f * f.ln())
        .sum::<f64>()
}

/// Effective number of haplotypes, `1 / Σ f²`.
pub fn effective_haplotypes(freqs: &FrequencyVector) -> f64 {
    1.0 / homozygosity(freqs)
}

fn homozygosity(freqs: &FrequencyVector) -> f64 {
    freqs.iter().map(|f| f * f).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hapdyn_sim::GenotypeSpace;

    #[test]
    fn test_monomorphic() {
        let f = FrequencyVector::fixed(GenotypeSpace::new(3).unwrap(), 5).unwrap();
        assert_eq!(haplotype_diversity(&f), 0.0);
        assert_eq!(shannon_entropy(&f), 0.0);
        assert_eq!(effective_haplotypes(&f), 1.0);
    }

    #[test]
    fn test_uniform_is_maximal() {
        let f = FrequencyVector::uniform(GenotypeSpace::new(3).unwrap());
        assert!((shannon_entropy(&f) - 8f64.ln()).abs() < 1e-12);
        assert!((effective_haplotypes(&f) - 8.0).abs() < 1e-12);
        assert!((haplotype_diversity(&f) - 0.875).abs() < 1e-12);
    }
}
