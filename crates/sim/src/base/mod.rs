//! Base types for genotype-frequency dynamics.
//!
//! This module provides the bit-encoded genotype space, the dense and sparse
//! matrices the recombination engine works with, and the frequency and
//! fitness vectors a simulation carries between generations.

pub mod fitness;
pub mod frequency;
pub mod genotype;
mod matrix;
mod sparse;

pub use fitness::FitnessVector;
pub use frequency::FrequencyVector;
pub use genotype::{Genotype, GenotypeSpace, MAX_LOCI};
pub use matrix::DenseMatrix;
pub use sparse::{SparseEntry, SparseMatrix};
