//! Error types for the simulation crate.

use hapdyn_codec::CodecError;
use thiserror::Error;

/// Errors raised by the recombination engine and the per-generation transform.
///
/// Every variant is detected at the boundary of the operation that would
/// otherwise produce an invalid numeric result. None of them leave shared
/// state (a built [`RecombinationTable`](crate::evolution::RecombinationTable))
/// modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A locus index at or beyond the locus count.
    #[error("Invalid locus {locus} (genotype space has {loci} loci)")]
    InvalidLocus { locus: usize, loci: usize },

    /// A recombination fraction that is NaN or outside [0, 1].
    #[error("Invalid recombination fraction {value} between loci {junction} and {} (must be between 0.0 and 1.0)", .junction + 1)]
    InvalidRecombinationFraction { junction: usize, value: f64 },

    /// A sparse matrix entry that is NaN, outside [0, 1], or out of bounds.
    #[error("Invalid sparse entry ({row}, {col}) = {value}")]
    InvalidValue { row: usize, col: usize, value: f64 },

    /// Mean fitness was non-positive or NaN.
    #[error("Degenerate mean fitness: {0}")]
    DegenerateFitness(f64),

    /// A frequency vector summed to zero, a negative value, or NaN.
    #[error("Cannot normalize frequencies summing to {0}")]
    NormalizationFailure(f64),

    /// Storage for a table could not be reserved.
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    /// Two operands disagree on the size of the genotype space.
    #[error("Length mismatch: expected {expected}, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A frequency vector that is not a probability distribution.
    #[error("Invalid frequencies: {0}")]
    InvalidFrequency(String),

    /// Any other out-of-range model parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Errors raised while assembling or loading a simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Model(#[from] SimError),
}

/// Database error types.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(String),
    #[error("Database initialization error: {0}")]
    Initialization(String),
    #[error("Transaction error: {0}")]
    Transaction(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Insert error: {0}")]
    Insert(String),
    #[error("Close error: {0}")]
    Close(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("Stored data is invalid: {0}")]
    Model(#[from] SimError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::InvalidRecombinationFraction {
            junction: 0,
            value: 1.5,
        };
        let msg = format!("{err}");
        assert!(msg.contains("between loci 0 and 1"));
        assert!(msg.contains("1.5"));

        let err = SimError::InvalidLocus { locus: 4, loci: 3 };
        assert!(err.to_string().contains("3 loci"));

        let err = SimError::LengthMismatch {
            expected: 4,
            actual: 8,
        };
        assert!(err.to_string().contains("expected 4, found 8"));
    }

    #[test]
    fn test_config_error_wraps_model_error() {
        let err: ConfigError = SimError::DegenerateFitness(0.0).into();
        assert_eq!(err.to_string(), "Degenerate mean fitness: 0");
    }
}
