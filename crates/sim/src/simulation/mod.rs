//! Simulation engine: the generation transform and the trial driver.
//!
//! The most commonly used types are re-exported here:
//!
//! - `Simulation`: runs trials to convergence over one shared recombination table.
//! - `SimulationBuilder`: fluent builder with defaults and validation.
//! - `GenerationStepper` / `step`: the per-generation transform.
//! - `Configuration`: serializable description of a run.

pub mod builder;
pub mod configs;
pub mod convergence;
pub mod engine;
pub mod initialization;
pub mod stepper;

pub use builder::SimulationBuilder;
pub use configs::{Configuration, ExecutionConfig, MAX_CONFIG_LOCI, ModelConfig};
pub use convergence::{
    ConvergenceDetector, ConvergenceStatus, DEFAULT_MAX_GENERATIONS, DEFAULT_TOLERANCE,
    euclidean_distance, has_converged,
};
pub use engine::{GenerationRecord, Simulation, TrialOutcome};
pub use initialization::InitialCondition;
pub use stepper::{GenerationStepper, step};
