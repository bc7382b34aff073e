//! # Simulation Crate
//!
//! The `sim` crate provides the core of hapdyn: deterministic dynamics of
//! genotype frequencies in a haploid population with `L` biallelic loci.
//! It includes modules for the genotype space and its sparse and dense
//! probability surfaces, the evolutionary operators (recombination, mating,
//! selection), the generation transform and trial driver, and SQLite
//! storage of finished runs.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod prelude;
pub mod simulation;
pub mod storage;

pub use base::{FrequencyVector, Genotype, GenotypeSpace};
pub use errors::SimError;
