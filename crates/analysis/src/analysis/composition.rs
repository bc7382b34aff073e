//! Allele composition of a genotype-frequency vector.

use hapdyn_sim::FrequencyVector;

/// Frequency of allele 1 at every locus.
///
/// Sum of the frequencies of all genotypes whose bit at that locus is set.
pub fn allele_frequencies(freqs: &FrequencyVector) -> Vec<f64> {
    freqs.allele_frequencies()
}

/// Expected heterozygosity `2p(1-p)` per locus.
pub fn heterozygosity(freqs: &FrequencyVector) -> Vec<f64> {
    allele_frequencies(freqs)
        .into_iter()
        .map(|p| 2.0 * p * (1.0 - p))
        .collect()
}

/// Heterozygosity averaged over loci.
pub fn mean_heterozygosity(freqs: &FrequencyVector) -> f64 {
    let h = heterozygosity(freqs);
    h.iter().sum::<f64>() / h.len() as f64
}

/// Loci whose minor allele frequency exceeds `threshold`.
pub fn segregating_loci(freqs: &FrequencyVector, threshold: f64) -> Vec<usize> {
    allele_frequencies(freqs)
        .into_iter()
        .enumerate()
        .filter(|(_, p)| p.min(1.0 - p) > threshold)
        .map(|(i, _)| i)
        .collect()
}
