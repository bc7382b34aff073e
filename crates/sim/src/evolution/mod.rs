//! Evolutionary operators on genotype frequencies.
//!
//! - **Recombination**: offspring-by-parents probability tables built once per map
//! - **Mating**: pairing probabilities recomputed from the current frequencies
//! - **Selection**: fitness reweighting by mean fitness

pub mod cache;
pub mod mating;
pub mod recombination;
pub mod selection;

pub use cache::TableCache;
pub use mating::{
    AssortativeMating, MatingRule, MatingTable, MatingTableProvider, RandomMating,
    SimilarityMating,
};
pub use recombination::{
    MAX_TABLE_ENTRIES, RecombinationMap, RecombinationTable, RecombinationTableBuilder,
    offspring_probability,
};
pub use selection::{FitnessModel, apply_selection};
