//! Storage module for persisting simulation data.
//!
//! This module provides SQLite-based recording of runs (configuration,
//! per-trial outcomes, recorded generations and built recombination tables)
//! for reproducibility and post-simulation analysis.

mod database;
mod query;
mod recorder;
pub mod types;

pub use database::{Database, DatabaseStats};
pub use query::QueryBuilder;
pub use recorder::{Recorder, RecorderStats};
pub use types::{
    TrajectoryPoint, TrialRecord, decode_frequencies, decode_table, encode_frequencies,
    encode_table,
};
