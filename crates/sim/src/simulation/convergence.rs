//! Stopping rule for the generation loop.

use serde::{Deserialize, Serialize};

/// Default Euclidean tolerance between successive generations.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Default cap on generations per trial.
pub const DEFAULT_MAX_GENERATIONS: usize = 100_000;

/// `‖a - b‖₂`. Extra trailing entries of the longer slice are ignored.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// True iff successive vectors are closer than `tolerance`.
pub fn has_converged(prev: &[f64], curr: &[f64], tolerance: f64) -> bool {
    euclidean_distance(prev, curr) < tolerance
}

/// What a [`ConvergenceDetector`] says after observing a generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConvergenceStatus {
    /// Keep iterating; carries the last distance.
    Running(f64),
    /// The last step moved less than the tolerance.
    Converged(f64),
    /// The generation cap was reached first.
    Exhausted(f64),
}

impl ConvergenceStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Running(_))
    }

    pub fn distance(&self) -> f64 {
        match *self {
            Self::Running(d) | Self::Converged(d) | Self::Exhausted(d) => d,
        }
    }
}

/// Euclidean stopping rule with an iteration cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceDetector {
    pub tolerance: f64,
    pub max_generations: usize,
}

impl Default for ConvergenceDetector {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_generations: DEFAULT_MAX_GENERATIONS,
        }
    }
}

impl ConvergenceDetector {
    pub fn new(tolerance: f64, max_generations: usize) -> Self {
        Self {
            tolerance,
            max_generations,
        }
    }

    /// Classify generation `generation` (1-based count of steps taken).
    pub fn observe(&self, prev: &[f64], curr: &[f64], generation: usize) -> ConvergenceStatus {
        let distance = euclidean_distance(prev, curr);
        if distance < self.tolerance {
            ConvergenceStatus::Converged(distance)
        } else if generation >= self.max_generations {
            ConvergenceStatus::Exhausted(distance)
        } else {
            ConvergenceStatus::Running(distance)
        }
    }
}
