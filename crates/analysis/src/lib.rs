//! Summary statistics for hapdyn frequency vectors and trajectories.

pub mod analysis;

pub use analysis::{LDStatistics, haplotype_diversity, pairwise_ld, two_locus_d};
