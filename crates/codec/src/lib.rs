//! Byte-level encoding for persisted hapdyn payloads.
//!
//! Frequency vectors and recombination tables are serialized by the
//! simulation crate and handed to one of the strategies here before they are
//! written to disk or to the database.

mod error;
mod strategies;
mod traits;
mod utils;

pub use error::CodecError as Error;
pub use error::CodecError;
pub use strategies::{Plain, Zstd};
pub use traits::Codec;
pub use utils::{decode_f64s, encode_f64s};

use serde::{Deserialize, Serialize};

/// Strategies for encoding payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodecStrategy {
    /// Length-prefixed raw bytes.
    Plain,
    /// Length-prefixed bytes compressed with zstd.
    Zstd,
}

impl CodecStrategy {
    /// Encode using the selected strategy.
    pub fn encode(&self, payload: &[u8]) -> Result<Vec<u8>, CodecError> {
        match self {
            CodecStrategy::Plain => Plain.encode(payload),
            CodecStrategy::Zstd => Zstd::default().encode(payload),
        }
    }

    /// Decode using the selected strategy.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        match self {
            CodecStrategy::Plain => Plain.decode(data),
            CodecStrategy::Zstd => Zstd::default().decode(data),
        }
    }
}

impl Default for CodecStrategy {
    fn default() -> Self {
        Self::Zstd
    }
}

impl std::fmt::Display for CodecStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Zstd => write!(f, "zstd"),
        }
    }
}

impl std::str::FromStr for CodecStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" | "raw" => Ok(Self::Plain),
            "zstd" => Ok(Self::Zstd),
            _ => Err(format!("Unknown codec strategy: {s}. Available: plain, zstd")),
        }
    }
}

impl Codec for CodecStrategy {
    fn encode(&self, payload: &[u8]) -> Result<Vec<u8>, CodecError> {
        CodecStrategy::encode(self, payload)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        CodecStrategy::decode(self, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategies_round_trip() {
        let payload: Vec<u8> = (0..=255).cycle().take(4096).collect();

        let encoded = CodecStrategy::Plain.encode(&payload).unwrap();
        assert_eq!(CodecStrategy::Plain.decode(&encoded).unwrap(), payload);

        let encoded = CodecStrategy::Zstd.encode(&payload).unwrap();
        assert_eq!(CodecStrategy::Zstd.decode(&encoded).unwrap(), payload);
    }

    #[test]
    fn test_zstd_shrinks_repetitive_payload() {
        let payload = vec![7u8; 10_000];
        let encoded = CodecStrategy::Zstd.encode(&payload).unwrap();
        assert!(encoded.len() < payload.len() / 10);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("plain".parse::<CodecStrategy>(), Ok(CodecStrategy::Plain));
        assert_eq!("zstd".parse::<CodecStrategy>(), Ok(CodecStrategy::Zstd));
        assert!("gzip".parse::<CodecStrategy>().is_err());
        assert_eq!(CodecStrategy::Zstd.to_string(), "zstd");
    }
}
