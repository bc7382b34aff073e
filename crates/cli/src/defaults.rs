//! Shared default values for run configuration.
//! These values are used by both `init` and `run` (via clap).

pub const CONFIG_FILE: &str = "hapdyn.json";

pub const LOCI: usize = 2;
pub const RECOMBINATION: &str = "0.5";

pub const MATING: &str = "random";
pub const DISTORTION: f64 = 0.0;

pub const TRIALS: usize = 1;
pub const MAX_GENERATIONS: usize = hapdyn_sim::simulation::DEFAULT_MAX_GENERATIONS;
pub const TOLERANCE: f64 = hapdyn_sim::simulation::DEFAULT_TOLERANCE;
pub const INITIAL: &str = "uniform";
pub const RECORD_EVERY: usize = 0;
pub const CODEC: &str = "zstd";

/// Largest table whose target matrices `table --show` will print.
pub const MAX_SHOWN_LOCI: usize = 4;

/// Largest `check` discrepancy accepted as a pass.
pub const CHECK_TOLERANCE: f64 = 1e-9;
