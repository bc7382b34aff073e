//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use hapdyn_sim::prelude::*;
//!
//! let table = RecombinationTable::build(2, &[0.5]).unwrap();
//! let freqs = FrequencyVector::new(vec![0.5, 0.0, 0.0, 0.5]).unwrap();
//! let fitness = FitnessVector::neutral(freqs.space());
//!
//! let next = step(&freqs, &fitness, &table, &RandomMating).unwrap();
//! assert!((next.linkage_disequilibrium() - 0.125).abs() < 1e-12);
//! ```

pub use crate::base::{
    DenseMatrix, FitnessVector, FrequencyVector, Genotype, GenotypeSpace, SparseMatrix,
};
pub use crate::errors::{self, ConfigError, DatabaseError, SimError};
pub use crate::evolution::{
    AssortativeMating, FitnessModel, MatingRule, MatingTable, MatingTableProvider, RandomMating,
    RecombinationMap, RecombinationTable, RecombinationTableBuilder, SimilarityMating, TableCache,
};
pub use crate::simulation::{
    Configuration, ConvergenceDetector, GenerationStepper, InitialCondition, Simulation,
    SimulationBuilder, TrialOutcome, step,
};
