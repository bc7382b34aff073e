use crate::error::CodecError;

/// Core trait for payload codecs.
///
/// `decode(encode(x))` must return `x` for every strategy.
pub trait Codec {
    fn encode(&self, payload: &[u8]) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;
}
