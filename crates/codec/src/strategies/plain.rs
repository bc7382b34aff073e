use crate::error::CodecError;
use crate::traits::Codec;
use crate::utils::{strip_length_header, with_length_header};

/// Strategy: length header followed by the raw payload.
///
/// Cheapest to read back; used for small frequency vectors where compression
/// does not pay for itself.
pub struct Plain;

impl Codec for Plain {
    fn encode(&self, payload: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(with_length_header(payload))
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        strip_length_header(data)
    }
}
