// crates/skyfire_core/src/audio/wav.rs
//! RIFF/WAVE decoding for uncompressed PCM, down-mixed to mono.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WavError {
    #[error("not a RIFF/WAVE file")]
    NotWave,
    #[error("file ends inside a chunk")]
    Truncated,
    #[error("missing '{0}' chunk")]
    MissingChunk(&'static str),
    #[error("unsupported format tag {0} (only PCM)")]
    UnsupportedFormat(u16),
    #[error("unsupported sample size of {0} bits")]
    UnsupportedBits(u16),
    #[error("zero channels")]
    NoChannels,
}

/// Mono samples in [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl PcmBuffer {
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

const WAVE_FORMAT_PCM: u16 = 1;

struct Format {
    channels: u16,
    sample_rate: u32,
    bits: u16,
}

fn u16_at(bytes: &[u8], at: usize) -> Result<u16, WavError> {
    bytes
        .get(at..at + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or(WavError::Truncated)
}

fn u32_at(bytes: &[u8], at: usize) -> Result<u32, WavError> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(WavError::Truncated)
}

pub fn decode_wav(bytes: &[u8]) -> Result<PcmBuffer, WavError> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(WavError::NotWave);
    }

    let mut format = None;
    let mut data = None;
    let mut at = 12;
    while at + 8 <= bytes.len() {
        let id = &bytes[at..at + 4];
        let size = u32_at(bytes, at + 4)? as usize;
        let body = bytes.get(at + 8..at + 8 + size).ok_or(WavError::Truncated)?;
        match id {
            b"fmt " => {
                let tag = u16_at(body, 0)?;
                if tag != WAVE_FORMAT_PCM {
                    return Err(WavError::UnsupportedFormat(tag));
                }
                format = Some(Format {
                    channels: u16_at(body, 2)?,
                    sample_rate: u32_at(body, 4)?,
                    bits: u16_at(body, 14)?,
                });
            }
            b"data" => data = Some(body),
            _ => {}
        }
        // Chunks are word aligned.
        at += 8 + size + (size & 1);
    }

    let format = format.ok_or(WavError::MissingChunk("fmt "))?;
    let data = data.ok_or(WavError::MissingChunk("data"))?;
    if format.channels == 0 {
        return Err(WavError::NoChannels);
    }

    let channels = usize::from(format.channels);
    let samples = match format.bits {
        8 => mix_down(data.chunks_exact(channels), |frame| {
            frame.iter().map(|&s| (f32::from(s) - 128.0) / 128.0).sum()
        }),
        16 => mix_down(data.chunks_exact(2 * channels), |frame| {
            frame
                .chunks_exact(2)
                .map(|s| f32::from(i16::from_le_bytes([s[0], s[1]])) / 32768.0)
                .sum()
        }),
        bits => return Err(WavError::UnsupportedBits(bits)),
    }
    .into_iter()
    .map(|sum| sum / channels as f32)
    .collect();

    Ok(PcmBuffer {
        sample_rate: format.sample_rate,
        samples,
    })
}

fn mix_down<'a>(
    frames: impl Iterator<Item = &'a [u8]>,
    frame_sum: impl Fn(&[u8]) -> f32,
) -> Vec<f32> {
    frames.map(frame_sum).collect()
}
