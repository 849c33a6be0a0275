// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data URI handling and WAV wrapping of raw PCM audio.

use crate::error::AppError;
use base64::Engine;

/// Speech synthesis output format: 24 kHz, mono, 16-bit little-endian PCM.
pub const TTS_SAMPLE_RATE: u32 = 24_000;
pub const TTS_CHANNELS: u16 = 1;
pub const TTS_BITS_PER_SAMPLE: u16 = 16;

/// A parsed `data:<mime>;base64,<data>` URI. `data` stays base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime_type: &'a str,
    pub data: &'a str,
}

/// Parse a base64 data URI.
pub fn parse_data_uri(uri: &str) -> Result<DataUri<'_>, AppError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| AppError::BadRequest("media must be a data URI".to_string()))?;
    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| AppError::BadRequest("data URI has no payload".to_string()))?;
    let params = header.strip_suffix(";base64").ok_or_else(|| {
        AppError::BadRequest("data URI must use base64 encoding".to_string())
    })?;
    // Recorders add parameters such as `;codecs=opus`; the model takes the bare type
    let mime_type = params.split(';').next().unwrap_or_default().trim();
    if mime_type.is_empty() {
        return Err(AppError::BadRequest("data URI has no MIME type".to_string()));
    }
    if data.is_empty() {
        return Err(AppError::BadRequest("data URI has an empty payload".to_string()));
    }
    Ok(DataUri { mime_type, data })
}

pub fn build_data_uri(mime_type: &str, base64_data: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_data)
}

/// Wrap raw PCM samples in a RIFF/WAVE container.
pub fn pcm_to_wav(pcm: &[u8], sample_rate: u32, channels: u16, bits_per_sample: u16) -> Vec<u8> {
    let block_align = channels * (bits_per_sample / 8);
    let byte_rate = sample_rate * u32::from(block_align);
    let data_size = pcm.len() as u32;

    let mut wav = Vec::with_capacity(44 + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // Format chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // Data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.extend_from_slice(pcm);
    wav
}

/// Decode base64 speech-synthesis PCM and return a WAV data URI.
pub fn tts_pcm_to_wav_data_uri(pcm_base64: &str) -> Result<String, AppError> {
    let engine = base64::engine::general_purpose::STANDARD;
    let pcm = engine
        .decode(pcm_base64)
        .map_err(|e| AppError::ModelApi(format!("audio payload is not valid base64: {}", e)))?;
    let wav = pcm_to_wav(&pcm, TTS_SAMPLE_RATE, TTS_CHANNELS, TTS_BITS_PER_SAMPLE);
    Ok(build_data_uri("audio/wav", &engine.encode(wav)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_uri() {
        let uri = parse_data_uri("data:audio/webm;base64,GkXfow==").unwrap();
        assert_eq!(uri.mime_type, "audio/webm");
        assert_eq!(uri.data, "GkXfow==");
    }

    #[test]
    fn test_parse_data_uri_with_codec_parameter() {
        let uri = parse_data_uri("data:audio/webm;codecs=opus;base64,AAAA").unwrap();
        assert_eq!(uri.mime_type, "audio/webm");
        assert_eq!(uri.data, "AAAA");

        assert!(parse_data_uri("data:;codecs=opus;base64,AAAA").is_err());
    }

    #[test]
    fn test_rejects_malformed_uris() {
        assert!(parse_data_uri("https://example.com/a.png").is_err());
        assert!(parse_data_uri("data:audio/webm;base64").is_err());
        assert!(parse_data_uri("data:text/plain,hello").is_err());
        assert!(parse_data_uri("data:;base64,AAAA").is_err());
        assert!(parse_data_uri("data:audio/wav;base64,").is_err());
    }

    #[test]
    fn test_wav_header() {
        let pcm = [0u8, 1, 2, 3, 4, 5];
        let wav = pcm_to_wav(&pcm, 24_000, 1, 16);

        assert_eq!(wav.len(), 44 + pcm.len());
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 36 + 6);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u16::from_le_bytes(wav[22..24].try_into().unwrap()), 1);
        assert_eq!(u32::from_le_bytes(wav[24..28].try_into().unwrap()), 24_000);
        // byte rate = rate * channels * 2
        assert_eq!(u32::from_le_bytes(wav[28..32].try_into().unwrap()), 48_000);
        assert_eq!(u16::from_le_bytes(wav[32..34].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(wav[34..36].try_into().unwrap()), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 6);
        assert_eq!(&wav[44..], &pcm);
    }

    #[test]
    fn test_tts_data_uri() {
        let uri = tts_pcm_to_wav_data_uri("AAAA").unwrap();
        assert!(uri.starts_with("data:audio/wav;base64,UklGR"));
        assert!(tts_pcm_to_wav_data_uri("not base64!").is_err());
    }
}
