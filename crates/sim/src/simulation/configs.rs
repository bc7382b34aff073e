//! Simulation configuration.
//!
//! A [`Configuration`] fully describes a run and round-trips through JSON, so
//! a stored configuration reproduces the same trials.

use crate::base::{FitnessVector, GenotypeSpace};
use crate::errors::ConfigError;
use crate::evolution::{FitnessModel, MatingRule, RecombinationMap};
use crate::simulation::convergence::{DEFAULT_MAX_GENERATIONS, DEFAULT_TOLERANCE};
use crate::simulation::InitialCondition;
use hapdyn_codec::CodecStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest locus count accepted by a configuration. A table holds up to
/// `2^L * 3^L` entries, which stays under `MAX_TABLE_ENTRIES` up to here.
pub const MAX_CONFIG_LOCI: usize = 10;

/// The master configuration struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub model: ModelConfig,
    pub execution: ExecutionConfig,
}

/// The population-genetic model: loci, linkage, fitness and mating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of biallelic loci
    pub loci: usize,
    /// Recombination fractions between adjacent loci (`loci - 1` entries)
    pub recombination: Vec<f64>,
    #[serde(default)]
    pub fitness: FitnessModel,
    #[serde(default)]
    pub mating: MatingRule,
}

/// How trials are run and recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Number of independent trials
    pub trials: usize,
    /// Generation cap per trial
    pub max_generations: usize,
    /// Euclidean distance below which a trial has converged
    pub tolerance: f64,
    /// Optional RNG seed for reproducibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub initial: InitialCondition,
    /// Keep every n-th generation in the trajectory (0 keeps none)
    #[serde(default)]
    pub record_every: usize,
    /// Encoding strategy for database payloads
    #[serde(default)]
    pub codec: CodecStrategy,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            trials: 1,
            max_generations: DEFAULT_MAX_GENERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            seed: None,
            initial: InitialCondition::default(),
            record_every: 0,
            codec: CodecStrategy::default(),
        }
    }
}

impl ModelConfig {
    /// Two-or-more-locus model with the same fraction at every junction.
    pub fn uniform(loci: usize, r: f64) -> Self {
        Self {
            loci,
            recombination: vec![r; loci.saturating_sub(1)],
            fitness: FitnessModel::Neutral,
            mating: MatingRule::Random,
        }
    }

    pub fn space(&self) -> Result<GenotypeSpace, ConfigError> {
        Ok(GenotypeSpace::new(self.loci)?)
    }

    pub fn recombination_map(&self) -> Result<RecombinationMap, ConfigError> {
        Ok(RecombinationMap::new(self.recombination.clone())?)
    }

    pub fn fitness_vector(&self) -> Result<FitnessVector, ConfigError> {
        Ok(self.fitness.fitness_vector(self.space()?)?)
    }
}

impl Configuration {
    pub fn new(model: ModelConfig, execution: ExecutionConfig) -> Self {
        Self { model, execution }
    }

    /// Check every parameter before anything is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let model = &self.model;
        if model.loci == 0 || model.loci > MAX_CONFIG_LOCI {
            return Err(ConfigError::Invalid(format!(
                "loci must be between 1 and {MAX_CONFIG_LOCI}, got {}",
                model.loci
            )));
        }
        if model.recombination.len() != model.loci - 1 {
            return Err(ConfigError::Invalid(format!(
                "{} loci need {} recombination fractions, got {}",
                model.loci,
                model.loci - 1,
                model.recombination.len()
            )));
        }
        let space = model.space()?;
        model.recombination_map()?;
        model.fitness_vector()?;
        model.mating.validate()?;

        let exec = &self.execution;
        if exec.trials == 0 {
            return Err(ConfigError::Invalid("at least one trial is required".into()));
        }
        if exec.max_generations == 0 {
            return Err(ConfigError::Invalid("max_generations must be positive".into()));
        }
        if !(exec.tolerance > 0.0 && exec.tolerance.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be a positive number, got {}",
                exec.tolerance
            )));
        }
        exec.initial.validate(space)?;
        Ok(())
    }

    /// Read and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
