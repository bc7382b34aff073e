//! Builder pattern for creating simulations.
//!
//! Provides a fluent API for configuring and creating simulations with
//! sensible defaults and comprehensive validation.

use crate::errors::ConfigError;
use crate::evolution::{
    FitnessModel, MatingRule, MatingTableProvider, RecombinationTable, TableCache,
};
use crate::simulation::{Configuration, ExecutionConfig, InitialCondition, ModelConfig, Simulation};
use hapdyn_codec::CodecStrategy;
use std::sync::Arc;

/// Builder for constructing [`Simulation`] instances with a fluent API.
///
/// Defaults: neutral fitness, random mating, one trial, uniform initial
/// frequencies, tolerance `1e-9`, and a cap of 100 000 generations.
///
/// # Examples
///
/// ```
/// use hapdyn_sim::simulation::SimulationBuilder;
///
/// // Two loci, r = 0.25, defaults everywhere else
/// let sim = SimulationBuilder::new()
///     .loci(2)
///     .uniform_recombination(0.25)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let outcome = sim.run_trial(0, 7).unwrap();
/// assert!(outcome.converged);
/// ```
///
/// ```
/// use hapdyn_sim::evolution::{FitnessModel, MatingRule};
/// use hapdyn_sim::simulation::{InitialCondition, SimulationBuilder};
///
/// let sim = SimulationBuilder::new()
///     .loci(3)
///     .recombination(vec![0.1, 0.3])
///     .fitness(FitnessModel::Multiplicative { coefficients: vec![0.05, 0.0, -0.02] })
///     .mating(MatingRule::Assortative { distortion: 0.2 })
///     .initial(InitialCondition::RandomGenotypes)
///     .trials(8)
///     .max_generations(5_000)
///     .build()
///     .unwrap();
/// assert_eq!(sim.trial_seeds().len(), 8);
/// ```
#[derive(Clone, Default)]
pub struct SimulationBuilder {
    loci: Option<usize>,
    recombination: Option<Vec<f64>>,
    uniform_fraction: Option<f64>,
    fitness: FitnessModel,
    mating: MatingRule,
    provider: Option<Arc<dyn MatingTableProvider>>,
    execution: ExecutionConfig,
    table: Option<Arc<RecombinationTable>>,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: Configuration) -> Self {
        Self {
            loci: Some(config.model.loci),
            recombination: Some(config.model.recombination),
            uniform_fraction: None,
            fitness: config.model.fitness,
            mating: config.model.mating,
            provider: None,
            execution: config.execution,
            table: None,
        }
    }

    /// Number of biallelic loci (required).
    pub fn loci(mut self, loci: usize) -> Self {
        self.loci = Some(loci);
        self
    }

    /// Per-junction recombination fractions.
    pub fn recombination(mut self, fractions: Vec<f64>) -> Self {
        self.recombination = Some(fractions);
        self.uniform_fraction = None;
        self
    }

    /// The same fraction at every junction.
    pub fn uniform_recombination(mut self, r: f64) -> Self {
        self.uniform_fraction = Some(r);
        self.recombination = None;
        self
    }

    pub fn fitness(mut self, fitness: FitnessModel) -> Self {
        self.fitness = fitness;
        self
    }

    pub fn mating(mut self, mating: MatingRule) -> Self {
        self.mating = mating;
        self.provider = None;
        self
    }

    /// Plug in any mating-table provider. Such a run cannot be described by
    /// a stored configuration, which keeps the last [`MatingRule`].
    pub fn mating_provider(mut self, provider: Arc<dyn MatingTableProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn trials(mut self, trials: usize) -> Self {
        self.execution.trials = trials;
        self
    }

    pub fn max_generations(mut self, max_generations: usize) -> Self {
        self.execution.max_generations = max_generations;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.execution.tolerance = tolerance;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.execution.seed = Some(seed);
        self
    }

    pub fn initial(mut self, initial: InitialCondition) -> Self {
        self.execution.initial = initial;
        self
    }

    pub fn record_every(mut self, every: usize) -> Self {
        self.execution.record_every = every;
        self
    }

    pub fn codec(mut self, codec: CodecStrategy) -> Self {
        self.execution.codec = codec;
        self
    }

    /// Reuse an already built table instead of building one.
    pub fn table(mut self, table: Arc<RecombinationTable>) -> Self {
        self.table = Some(table);
        self
    }

    /// Assemble and validate the configuration without building a table.
    pub fn configuration(&self) -> Result<Configuration, ConfigError> {
        let loci = self
            .loci
            .ok_or_else(|| ConfigError::Invalid("number of loci is required".into()))?;
        let recombination = match (&self.recombination, self.uniform_fraction) {
            (Some(fractions), _) => fractions.clone(),
            (None, Some(r)) => vec![r; loci.saturating_sub(1)],
            (None, None) if loci == 1 => Vec::new(),
            (None, None) => {
                return Err(ConfigError::Invalid(
                    "recombination fractions are required for more than one locus".into(),
                ));
            }
        };
        let config = Configuration::new(
            ModelConfig {
                loci,
                recombination,
                fitness: self.fitness.clone(),
                mating: self.mating,
            },
            self.execution.clone(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Build the simulation.
    pub fn build(self) -> Result<Simulation, ConfigError> {
        self.build_with(&TableCache::new())
    }

    /// Build the simulation, taking the table from `cache` unless one was given.
    pub fn build_with(self, cache: &TableCache) -> Result<Simulation, ConfigError> {
        let config = self.configuration()?;
        let table = match self.table {
            Some(table) => table,
            None => cache.get_or_build(config.model.loci, &config.model.recombination_map()?)?,
        };
        let provider = self
            .provider
            .unwrap_or_else(|| Arc::new(config.model.mating));
        Simulation::with_parts(config, table, provider)
    }
}
