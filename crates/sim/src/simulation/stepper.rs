//! One generation of selection, mating and recombination.

use crate::base::{FitnessVector, FrequencyVector};
use crate::errors::SimError;
use crate::evolution::{MatingTableProvider, RecombinationTable, apply_selection};
use rayon::prelude::*;
use std::sync::Arc;

/// Above this many genotypes the per-offspring reduction runs on the rayon pool.
const PARALLEL_MIN_GENOTYPES: usize = 64;

/// Advance `freqs` by one generation.
///
/// 1. selection: `f'_i = f_i W_i / w̄`
/// 2. mating table `M = provider(f')`
/// 3. reduction: `new_k = table[k] · M` for every offspring `k`
/// 4. normalization of `new` to sum to one
///
/// Neither the table nor the provider is modified.
///
/// # Errors
/// - [`SimError::LengthMismatch`] if the operands disagree on `N`
/// - [`SimError::DegenerateFitness`] if the mean fitness is non-positive or NaN
/// - [`SimError::NormalizationFailure`] if the offspring frequencies sum to
///   zero or NaN
pub fn step(
    freqs: &FrequencyVector,
    fitness: &FitnessVector,
    table: &RecombinationTable,
    provider: &dyn MatingTableProvider,
) -> Result<FrequencyVector, SimError> {
    if table.len() != freqs.len() {
        return Err(SimError::LengthMismatch {
            expected: table.len(),
            actual: freqs.len(),
        });
    }

    let selected = apply_selection(freqs, fitness)?;
    let mating = provider.mating_table(&selected)?;
    if mating.dim() != freqs.len() {
        return Err(SimError::LengthMismatch {
            expected: freqs.len(),
            actual: mating.dim(),
        });
    }

    let offspring: Vec<f64> = if table.len() >= PARALLEL_MIN_GENOTYPES {
        table
            .matrices()
            .par_iter()
            .map(|t| t.weighted_sum(&mating))
            .collect()
    } else {
        table
            .matrices()
            .iter()
            .map(|t| t.weighted_sum(&mating))
            .collect()
    };

    let total: f64 = offspring.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return Err(SimError::NormalizationFailure(total));
    }
    Ok(FrequencyVector::from_normalized(
        freqs.space(),
        offspring.into_iter().map(|v| v / total).collect(),
    ))
}

/// The constants of a trial bundled for repeated [`step`] calls.
#[derive(Clone)]
pub struct GenerationStepper {
    table: Arc<RecombinationTable>,
    fitness: FitnessVector,
    mating: Arc<dyn MatingTableProvider>,
}

impl std::fmt::Debug for GenerationStepper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationStepper")
            .field("loci", &self.table.space().loci())
            .field("fitness", &self.fitness)
            .field("mating", &self.mating.name())
            .finish()
    }
}

impl GenerationStepper {
    /// # Errors
    /// Returns [`SimError::LengthMismatch`] if the fitness vector does not
    /// cover the table's genotype space.
    pub fn new(
        table: Arc<RecombinationTable>,
        fitness: FitnessVector,
        mating: Arc<dyn MatingTableProvider>,
    ) -> Result<Self, SimError> {
        if fitness.len() != table.len() {
            return Err(SimError::LengthMismatch {
                expected: table.len(),
                actual: fitness.len(),
            });
        }
        Ok(Self {
            table,
            fitness,
            mating,
        })
    }

    pub fn step(&self, freqs: &FrequencyVector) -> Result<FrequencyVector, SimError> {
        step(freqs, &self.fitness, &self.table, self.mating.as_ref())
    }

    pub fn table(&self) -> &Arc<RecombinationTable> {
        &self.table
    }

    pub fn fitness(&self) -> &FitnessVector {
        &self.fitness
    }

    pub fn mating(&self) -> &dyn MatingTableProvider {
        self.mating.as_ref()
    }
}
