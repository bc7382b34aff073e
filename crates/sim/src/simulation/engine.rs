//! Simulation driver.
//!
//! A [`Simulation`] owns the constants of a run (one shared recombination
//! table, the fitness vector and the mating rule) and iterates the generation
//! transform for each trial until it converges or hits the generation cap.
//! Trials are independent: each draws its own RNG from the run seed, owns
//! its frequency vector, and fails alone on a numeric error.

use crate::base::FrequencyVector;
use crate::errors::{ConfigError, SimError};
use crate::evolution::{MatingTableProvider, RecombinationTable, TableCache};
use crate::simulation::convergence::{ConvergenceDetector, ConvergenceStatus};
use crate::simulation::{Configuration, GenerationStepper};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Summary of one recorded generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub frequencies: FrequencyVector,
    /// Mean fitness of the frequencies before selection
    pub mean_fitness: f64,
    /// Disequilibrium `f[0] f[N-1] - f[1] f[N-2]`
    pub ld: f64,
}

impl GenerationRecord {
    pub fn allele_frequencies(&self) -> Vec<f64> {
        self.frequencies.allele_frequencies()
    }
}

/// Result of one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub trial: usize,
    pub seed: u64,
    pub initial: FrequencyVector,
    pub final_frequencies: FrequencyVector,
    /// Generations actually taken
    pub generations: usize,
    /// False when the cap was reached first
    pub converged: bool,
    /// Distance covered by the last generation
    pub final_distance: f64,
    pub mean_fitness: f64,
    pub trajectory: Vec<GenerationRecord>,
}

impl TrialOutcome {
    pub fn linkage_disequilibrium(&self) -> f64 {
        self.final_frequencies.linkage_disequilibrium()
    }

    pub fn allele_frequencies(&self) -> Vec<f64> {
        self.final_frequencies.allele_frequencies()
    }
}

/// Main simulation engine.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: Configuration,
    stepper: GenerationStepper,
    detector: ConvergenceDetector,
    /// Resolved run seed (drawn from entropy if the configuration has none)
    seed: u64,
}

impl Simulation {
    /// Validate `config` and build its recombination table.
    pub fn from_config(config: Configuration) -> Result<Self, ConfigError> {
        config.validate()?;
        let map = config.model.recombination_map()?;
        let table = TableCache::new().get_or_build(config.model.loci, &map)?;
        Self::with_table(config, table)
    }

    /// Validate `config` and reuse a table from `cache`.
    pub fn from_config_cached(
        config: Configuration,
        cache: &TableCache,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let map = config.model.recombination_map()?;
        let table = cache.get_or_build(config.model.loci, &map)?;
        Self::with_table(config, table)
    }

    /// Use an already built table. The table must match the configuration's
    /// locus count and map.
    pub fn with_table(
        config: Configuration,
        table: Arc<RecombinationTable>,
    ) -> Result<Self, ConfigError> {
        let mating: Arc<dyn MatingTableProvider> = Arc::new(config.model.mating);
        Self::with_parts(config, table, mating)
    }

    pub(crate) fn with_parts(
        config: Configuration,
        table: Arc<RecombinationTable>,
        mating: Arc<dyn MatingTableProvider>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if table.space().loci() != config.model.loci
            || table.map().fractions() != config.model.recombination.as_slice()
        {
            return Err(ConfigError::Invalid(
                "recombination table does not match the configured map".into(),
            ));
        }
        let fitness = config.model.fitness_vector()?;
        let stepper = GenerationStepper::new(table, fitness, mating)?;
        let detector = ConvergenceDetector::new(
            config.execution.tolerance,
            config.execution.max_generations,
        );
        let seed = config
            .execution
            .seed
            .unwrap_or_else(|| rand::rng().random());
        Ok(Self {
            config,
            stepper,
            detector,
            seed,
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn table(&self) -> &Arc<RecombinationTable> {
        self.stepper.table()
    }

    pub fn stepper(&self) -> &GenerationStepper {
        &self.stepper
    }

    pub fn detector(&self) -> ConvergenceDetector {
        self.detector
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// One seed per trial, drawn in order from the run seed.
    pub fn trial_seeds(&self) -> Vec<u64> {
        let mut master = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        (0..self.config.execution.trials)
            .map(|_| master.random())
            .collect()
    }

    /// Run trial `trial` from its configured initial condition.
    pub fn run_trial(&self, trial: usize, seed: u64) -> Result<TrialOutcome, SimError> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let initial = self.config.execution.initial.realize(
            self.table().space(),
            trial,
            &mut rng,
        )?;
        let mut outcome = self.run_from(trial, initial)?;
        outcome.seed = seed;
        Ok(outcome)
    }

    /// Iterate from an explicit starting vector until convergence or the cap.
    pub fn run_from(
        &self,
        trial: usize,
        initial: FrequencyVector,
    ) -> Result<TrialOutcome, SimError> {
        let record_every = self.config.execution.record_every;
        let mut trajectory = Vec::new();
        if record_every > 0 {
            trajectory.push(self.record(0, &initial)?);
        }

        let mut current = initial.clone();
        let mut generation = 0;
        let status = loop {
            let next = self.stepper.step(&current)?;
            generation += 1;
            let status = self
                .detector
                .observe(current.as_slice(), next.as_slice(), generation);
            tracing::trace!(trial, generation, distance = status.distance());
            current = next;
            if record_every > 0 && generation % record_every == 0 {
                trajectory.push(self.record(generation, &current)?);
            }
            if status.is_finished() {
                break status;
            }
        };

        let converged = matches!(status, ConvergenceStatus::Converged(_));
        if !converged {
            tracing::warn!(
                trial,
                generations = generation,
                distance = status.distance(),
                "trial reached the generation cap without converging"
            );
        }
        let mean_fitness = self.stepper.fitness().mean(&current)?;
        tracing::debug!(trial, generations = generation, converged, mean_fitness, "trial finished");

        Ok(TrialOutcome {
            trial,
            seed: 0,
            initial,
            final_frequencies: current,
            generations: generation,
            converged,
            final_distance: status.distance(),
            mean_fitness,
            trajectory,
        })
    }

    /// Run every configured trial in parallel.
    ///
    /// A numeric failure in one trial is reported in its slot and does not
    /// stop the others.
    pub fn run_trials(&self) -> Vec<Result<TrialOutcome, SimError>> {
        self.run_trials_with(|_| {})
    }

    /// As [`Self::run_trials`], calling `on_done` as each trial finishes.
    pub fn run_trials_with<F>(&self, on_done: F) -> Vec<Result<TrialOutcome, SimError>>
    where
        F: Fn(&Result<TrialOutcome, SimError>) + Sync,
    {
        let _span = tracing::info_span!(
            "trials",
            count = self.config.execution.trials,
            seed = self.seed
        )
        .entered();
        self.trial_seeds()
            .into_par_iter()
            .enumerate()
            .map(|(trial, seed)| {
                let result = self.run_trial(trial, seed);
                if let Err(e) = &result {
                    tracing::warn!(trial, error = %e, "trial failed");
                }
                on_done(&result);
                result
            })
            .collect()
    }

    fn record(
        &self,
        generation: usize,
        freqs: &FrequencyVector,
    ) -> Result<GenerationRecord, SimError> {
        Ok(GenerationRecord {
            generation,
            frequencies: freqs.clone(),
            mean_fitness: self.stepper.fitness().mean(freqs)?,
            ld: freqs.linkage_disequilibrium(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::FitnessModel;
    use crate::simulation::{ExecutionConfig, InitialCondition, ModelConfig};

    fn config(loci: usize, r: f64, initial: InitialCondition) -> Configuration {
        Configuration::new(
            ModelConfig::uniform(loci, r),
            ExecutionConfig {
                trials: 4,
                max_generations: 10_000,
                tolerance: 1e-10,
                seed: Some(42),
                initial,
                record_every: 0,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_neutral_run_reaches_linkage_equilibrium() {
        let init = InitialCondition::Genotypes {
            frequencies: vec![0.5, 0.0, 0.0, 0.5],
        };
        let sim = Simulation::from_config(config(2, 0.5, init)).unwrap();
        let outcome = sim.run_from(0, FrequencyVector::new(vec![0.5, 0.0, 0.0, 0.5]).unwrap())
            .unwrap();
        assert!(outcome.converged);
        assert!(outcome.linkage_disequilibrium().abs() < 1e-9);
        // Allele frequencies are conserved under neutrality.
        for p in outcome.allele_frequencies() {
            assert!((p - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_generation_cap_reports_non_convergence() {
        let mut c = config(2, 0.01, InitialCondition::Genotypes {
            frequencies: vec![0.5, 0.0, 0.0, 0.5],
        });
        c.execution.max_generations = 3;
        let sim = Simulation::from_config(c).unwrap();
        let outcome = sim.run_trial(0, 1).unwrap();
        assert!(!outcome.converged);
        assert_eq!(outcome.generations, 3);
        assert_eq!(outcome.seed, 1);
    }

    #[test]
    fn test_trials_are_reproducible() {
        let sim = Simulation::from_config(config(3, 0.2, InitialCondition::RandomGenotypes))
            .unwrap();
        let a: Vec<_> = sim.run_trials().into_iter().map(Result::unwrap).collect();
        let b: Vec<_> = sim.run_trials().into_iter().map(Result::unwrap).collect();
        assert_eq!(a.len(), 4);
        assert_eq!(a, b);
        assert_ne!(a[0].initial, a[1].initial);
    }

    #[test]
    fn test_trajectory_recording() {
        let mut c = config(2, 0.3, InitialCondition::Disequilibrium {
            alleles: vec![0.5, 0.5],
            d: 0.2,
        });
        c.execution.record_every = 2;
        c.execution.max_generations = 6;
        c.execution.tolerance = 1e-300;
        let sim = Simulation::from_config(c).unwrap();
        let outcome = sim.run_trial(0, 0).unwrap();
        let gens: Vec<_> = outcome.trajectory.iter().map(|r| r.generation).collect();
        assert_eq!(gens, vec![0, 2, 4, 6]);
        let d0 = outcome.trajectory[0].ld;
        let d2 = outcome.trajectory[1].ld;
        assert!((d2 - d0 * 0.7 * 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_failed_trial_is_isolated() {
        // Genotype 0 is lethal; trials fixed on it fail, the rest do not.
        let mut c = config(1, 0.0, InitialCondition::Corners);
        c.model.fitness = FitnessModel::Explicit {
            values: vec![0.0, 1.0],
        };
        c.execution.trials = 2;
        let sim = Simulation::from_config(c).unwrap();
        let results = sim.run_trials();
        assert!(matches!(results[0], Err(SimError::DegenerateFitness(_))));
        assert!(results[1].as_ref().unwrap().converged);
    }

    #[test]
    fn test_table_must_match_config() {
        let table = Arc::new(RecombinationTable::build(2, &[0.1]).unwrap());
        let c = config(2, 0.2, InitialCondition::Uniform);
        assert!(Simulation::with_table(c, table).is_err());
    }
}
