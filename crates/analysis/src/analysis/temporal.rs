//! Temporal analysis
//!
//! Functions for tracking changes over the recorded generations of a trial.

use hapdyn_sim::simulation::GenerationRecord;

/// Expected two-locus disequilibrium after `t` generations of neutral random
/// mating with recombination fraction `r`.
///
/// # Formula
///
/// $$D_t = D_0 (1 - r)^t$$
pub fn expected_ld_decay(d0: f64, r: f64, t: usize) -> f64 {
    d0 * (1.0 - r).powi(t as i32)
}

/// `(generation, D)` for every recorded generation.
pub fn ld_trajectory(records: &[GenerationRecord]) -> Vec<(usize, f64)> {
    records.iter().map(|r| (r.generation, r.ld)).collect()
}

/// `(generation, p)` of allele 1 at `locus`; empty if the locus is out of range.
pub fn allele_trajectory(records: &[GenerationRecord], locus: usize) -> Vec<(usize, f64)> {
    records
        .iter()
        .filter_map(|r| {
            r.allele_frequencies()
                .get(locus)
                .map(|p| (r.generation, *p))
        })
        .collect()
}

/// `(generation, w̄)` for every recorded generation.
pub fn fitness_dynamics(records: &[GenerationRecord]) -> Vec<(usize, f64)> {
    records.iter().map(|r| (r.generation, r.mean_fitness)).collect()
}

/// First recorded generation in which one genotype reaches frequency
/// `1 - threshold`.
pub fn generations_to_fixation(records: &[GenerationRecord], threshold: f64) -> Option<usize> {
    records
        .iter()
        .find(|r| r.frequencies.iter().any(|f| *f >= 1.0 - threshold))
        .map(|r| r.generation)
}

/// Recombination fraction implied by the decay of D between the first and
/// last recorded generations, assuming neutral random mating.
///
/// Returns `None` without two records, or when D starts at zero or changes sign.
pub fn implied_recombination(records: &[GenerationRecord]) -> Option<f64> {
    let (first, last) = (records.first()?, records.last()?);
    let span = last.generation.checked_sub(first.generation)?;
    if span == 0 || first.ld == 0.0 {
        return None;
    }
    let ratio = last.ld / first.ld;
    if ratio < 0.0 {
        return None;
    }
    Some(1.0 - ratio.powf(1.0 / span as f64))
}
