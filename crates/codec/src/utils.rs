use crate::error::CodecError;

/// Size of the little-endian length header every strategy writes.
pub const HEADER_LEN: usize = 8;

/// Prefix `payload` with its length.
pub fn with_length_header(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Strip and check the length header written by [`with_length_header`].
pub fn strip_length_header(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    if data.len() < HEADER_LEN {
        return Err(CodecError::Decode("Payload too short for header".into()));
    }
    let mut len_bytes = [0u8; HEADER_LEN];
    len_bytes.copy_from_slice(&data[..HEADER_LEN]);
    let expected = u64::from_le_bytes(len_bytes) as usize;
    let body = &data[HEADER_LEN..];
    if body.len() != expected {
        return Err(CodecError::Corruption(format!(
            "header announces {expected} bytes, found {}",
            body.len()
        )));
    }
    Ok(body.to_vec())
}

/// Pack a slice of doubles as little-endian bytes.
pub fn encode_f64s(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Inverse of [`encode_f64s`].
pub fn decode_f64s(bytes: &[u8]) -> Result<Vec<f64>, CodecError> {
    if bytes.len() % 8 != 0 {
        return Err(CodecError::Decode(format!(
            "byte length {} is not a multiple of 8",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            f64::from_le_bytes(buf)
        })
        .collect())
}
