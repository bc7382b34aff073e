//! Stored record types and payload encoding.

use crate::base::FrequencyVector;
use crate::errors::DatabaseError;
use crate::evolution::RecombinationTable;
use crate::simulation::{GenerationRecord, TrialOutcome};
use hapdyn_codec::{CodecStrategy, decode_f64s, encode_f64s};
use serde::{Deserialize, Serialize};

/// Encode a frequency vector as little-endian `f64`s through `codec`.
pub fn encode_frequencies(
    freqs: &FrequencyVector,
    codec: CodecStrategy,
) -> Result<Vec<u8>, DatabaseError> {
    Ok(codec.encode(&encode_f64s(freqs.as_slice()))?)
}

/// Decode and re-validate a stored frequency vector.
pub fn decode_frequencies(
    bytes: &[u8],
    codec: CodecStrategy,
) -> Result<FrequencyVector, DatabaseError> {
    let values = decode_f64s(&codec.decode(bytes)?)?;
    Ok(FrequencyVector::checked(values)?)
}

/// Serialize a recombination table with bincode, then encode through `codec`.
pub fn encode_table(
    table: &RecombinationTable,
    codec: CodecStrategy,
) -> Result<Vec<u8>, DatabaseError> {
    let bytes =
        bincode::serialize(table).map_err(|e| DatabaseError::Serialization(e.to_string()))?;
    Ok(codec.encode(&bytes)?)
}

/// Decode a stored table. Dimensions and entry bounds are checked while
/// deserializing.
pub fn decode_table(
    bytes: &[u8],
    codec: CodecStrategy,
) -> Result<RecombinationTable, DatabaseError> {
    let raw = codec.decode(bytes)?;
    bincode::deserialize(&raw).map_err(|e| DatabaseError::Serialization(e.to_string()))
}

/// One row of the `trials` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial: usize,
    pub seed: u64,
    pub generations: usize,
    pub converged: bool,
    pub final_distance: f64,
    pub mean_fitness: f64,
    pub ld: f64,
    pub final_frequencies: FrequencyVector,
}

impl From<&TrialOutcome> for TrialRecord {
    fn from(outcome: &TrialOutcome) -> Self {
        Self {
            trial: outcome.trial,
            seed: outcome.seed,
            generations: outcome.generations,
            converged: outcome.converged,
            final_distance: outcome.final_distance,
            mean_fitness: outcome.mean_fitness,
            ld: outcome.linkage_disequilibrium(),
            final_frequencies: outcome.final_frequencies.clone(),
        }
    }
}

/// One row of the `trajectory` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub trial: usize,
    pub generation: usize,
    pub mean_fitness: f64,
    pub ld: f64,
    pub frequencies: FrequencyVector,
}

impl TrajectoryPoint {
    pub fn from_record(trial: usize, record: &GenerationRecord) -> Self {
        Self {
            trial,
            generation: record.generation,
            mean_fitness: record.mean_fitness,
            ld: record.ld,
            frequencies: record.frequencies.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_payload() {
        let f = FrequencyVector::new(vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        for codec in [CodecStrategy::Plain, CodecStrategy::Zstd] {
            let bytes = encode_frequencies(&f, codec).unwrap();
            assert_eq!(decode_frequencies(&bytes, codec).unwrap(), f);
        }
    }

    #[test]
    fn test_corrupt_frequency_payload_is_rejected() {
        let bytes = CodecStrategy::Plain
            .encode(&encode_f64s(&[0.5, 0.6]))
            .unwrap();
        assert!(matches!(
            decode_frequencies(&bytes, CodecStrategy::Plain),
            Err(DatabaseError::Model(_))
        ));
        assert!(decode_frequencies(&[1, 2, 3], CodecStrategy::Plain).is_err());
    }

    #[test]
    fn test_table_payload() {
        let table = RecombinationTable::build(3, &[0.1, 0.4]).unwrap();
        let bytes = encode_table(&table, CodecStrategy::Zstd).unwrap();
        let restored = decode_table(&bytes, CodecStrategy::Zstd).unwrap();
        assert_eq!(restored, table);
        assert!(restored.conservation_error() < 1e-12);
    }
}
