//! Population genetics analysis tools for hapdyn
//!
//! This module provides analysis of genotype-frequency vectors and recorded
//! trajectories:
//! - Linkage disequilibrium (D, D', r²)
//! - Allele composition and heterozygosity
//! - Haplotype diversity
//! - Temporal dynamics

pub mod composition;
pub mod diversity;
pub mod linkage;
pub mod temporal;

// Re-export commonly used functions
pub use composition::{allele_frequencies, heterozygosity, mean_heterozygosity};
pub use diversity::{effective_haplotypes, haplotype_diversity, shannon_entropy};
pub use linkage::{LDStatistics, ld_decay, ld_matrix, pairwise_ld, two_locus_d};
pub use temporal::{
    allele_trajectory, expected_ld_decay, fitness_dynamics, generations_to_fixation,
    implied_recombination, ld_trajectory,
};
