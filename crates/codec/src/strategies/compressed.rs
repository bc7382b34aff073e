use crate::error::CodecError;
use crate::traits::Codec;
use crate::utils::{strip_length_header, with_length_header};

/// Strategy: length-prefixed payload compressed with zstd.
///
/// Recombination tables for larger locus counts are mostly repeated
/// probabilities and compress well.
pub struct Zstd {
    level: i32,
}

impl Zstd {
    /// Create a strategy with an explicit compression level (1-22).
    pub fn with_level(level: i32) -> Self {
        Self { level }
    }
}

impl Default for Zstd {
    fn default() -> Self {
        // Level 3 is the zstd default and a good speed/ratio balance.
        Self { level: 3 }
    }
}

impl Codec for Zstd {
    fn encode(&self, payload: &[u8]) -> Result<Vec<u8>, CodecError> {
        zstd::bulk::compress(&with_length_header(payload), self.level)
            .map_err(|e| CodecError::Encode(format!("Zstd compression failed: {e}")))
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let decompressed = zstd::stream::decode_all(std::io::Cursor::new(data))
            .map_err(|e| CodecError::Decode(format!("Zstd decompression failed: {e}")))?;
        strip_length_header(&decompressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zstd_levels_agree() {
        let payload: Vec<u8> = b"0.25 0.25 0.25 0.25 ".repeat(100);
        let fast = Zstd::with_level(1).encode(&payload).unwrap();
        let slow = Zstd::with_level(19).encode(&payload).unwrap();
        assert_eq!(Zstd::default().decode(&fast).unwrap(), payload);
        assert_eq!(Zstd::default().decode(&slow).unwrap(), payload);
    }

    #[test]
    fn test_zstd_rejects_garbage() {
        assert!(Zstd::default().decode(&[0xde, 0xad, 0xbe, 0xef]).is_err());
    }
}
