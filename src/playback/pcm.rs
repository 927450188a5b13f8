//! Decoding of synthesized audio payloads.
//!
//! The speech endpoint returns base64 text wrapping raw little-endian 16-bit
//! mono PCM (24 kHz). [`decode_base64_pcm`] turns that payload into `i16`
//! samples ready for an output sink; there is no container format to probe.

use base64::Engine as _;
use thiserror::Error;

// ---------------------------------------------------------------------------
// PcmError
// ---------------------------------------------------------------------------

/// Errors that can occur while decoding an audio payload.
#[derive(Debug, Error)]
pub enum PcmError {
    /// The payload was not valid base64.
    #[error("invalid base64 audio payload: {0}")]
    Base64(String),

    /// The decoded byte stream cannot be a whole number of 16-bit samples.
    #[error("PCM payload has an odd byte length ({0})")]
    Truncated(usize),
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a base64 payload into little-endian 16-bit PCM samples.
///
/// # Example
/// ```rust
/// use hanzi_etymology::playback::pcm::decode_base64_pcm;
///
/// // 0x0100 and 0xFFFF little-endian
/// let samples = decode_base64_pcm("AAH//w==").unwrap();
/// assert_eq!(samples, vec![256, -1]);
/// ```
pub fn decode_base64_pcm(payload: &str) -> Result<Vec<i16>, PcmError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| PcmError::Base64(e.to_string()))?;

    if bytes.len() % 2 != 0 {
        return Err(PcmError::Truncated(bytes.len()));
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    fn encode(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn decodes_little_endian_samples() {
        // 1, -1, 0x1234
        let payload = encode(&[0x01, 0x00, 0xFF, 0xFF, 0x34, 0x12]);
        let samples = decode_base64_pcm(&payload).unwrap();
        assert_eq!(samples, vec![1, -1, 0x1234]);
    }

    #[test]
    fn empty_payload_decodes_to_no_samples() {
        assert_eq!(decode_base64_pcm("").unwrap(), Vec::<i16>::new());
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let payload = format!("  {}\n", encode(&[0x00, 0x01]));
        assert_eq!(decode_base64_pcm(&payload).unwrap(), vec![256]);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        assert!(matches!(
            decode_base64_pcm("!!not-base64!!"),
            Err(PcmError::Base64(_))
        ));
    }

    #[test]
    fn odd_byte_count_is_rejected() {
        let payload = encode(&[0x01, 0x02, 0x03]);
        assert!(matches!(
            decode_base64_pcm(&payload),
            Err(PcmError::Truncated(3))
        ));
    }
}
