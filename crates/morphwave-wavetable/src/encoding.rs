//! Base64 payloads embedded in saved wavetables.
//!
//! Drawn waves are stored as little-endian `f32` so they reload exactly.
//! Audio buffers are stored as little-endian 16-bit PCM to keep files small.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const PCM16_SCALE: f32 = i16::MAX as f32;

/// Encode samples as base64 little-endian `f32`.
pub fn encode_f32(samples: &[f32]) -> String {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    STANDARD.encode(bytes)
}

/// Decode base64 little-endian `f32`. A trailing partial sample is dropped.
pub fn decode_f32(encoded: &str) -> Result<Vec<f32>> {
    let bytes = STANDARD.decode(encoded)?;
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Encode samples as base64 little-endian 16-bit PCM, clipping to `[-1, 1]`.
pub fn encode_pcm16(samples: &[f32]) -> String {
    let bytes: Vec<u8> = samples
        .iter()
        .flat_map(|s| ((s.clamp(-1.0, 1.0) * PCM16_SCALE) as i16).to_le_bytes())
        .collect();
    STANDARD.encode(bytes)
}

/// Decode base64 little-endian 16-bit PCM into `[-1, 1]` floats.
pub fn decode_pcm16(encoded: &str) -> Result<Vec<f32>> {
    let bytes = STANDARD.decode(encoded)?;
    Ok(bytes
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]) as f32 / PCM16_SCALE)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_is_lossless() {
        let samples = [0.0, -1.5, 0.123_456_79, f32::MIN_POSITIVE];
        let decoded = decode_f32(&encode_f32(&samples)).unwrap();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn test_pcm16_quantizes_and_clips() {
        let decoded = decode_pcm16(&encode_pcm16(&[0.5, -0.25, 2.0, -3.0])).unwrap();
        assert!((decoded[0] - 0.5).abs() < 1.0 / 32767.0);
        assert!((decoded[1] + 0.25).abs() < 1.0 / 32767.0);
        assert_eq!(decoded[2], 1.0);
        assert_eq!(decoded[3], -1.0);
    }

    #[test]
    fn test_pcm16_little_endian_layout() {
        // 0x0100 = 256
        let encoded = STANDARD.encode([0x00u8, 0x01]);
        let decoded = decode_pcm16(&encoded).unwrap();
        assert!((decoded[0] - 256.0 / 32767.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_base64() {
        assert!(decode_pcm16("not base64!").is_err());
    }
}
