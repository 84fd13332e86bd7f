// crates/skyfire_core/src/audio/mod.rs
//! Software mixer behind a cpal output stream.
//!
//! Sources are voices in the mixer. The game thread starts and polls them;
//! the stream callback advances them. Without an output device the system
//! still hands out handles, but nothing ever plays.

pub mod wav;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use skyfire_shared::{AssetError, SoundBufferId, SoundSourceId};
use tracing::{debug, warn};

pub use wav::{decode_wav, PcmBuffer, WavError};

const OUTPUT_RATE: u32 = 44_100;
const OUTPUT_CHANNELS: u16 = 2;

struct Voice {
    gain: f32,
    buffer: Option<Arc<PcmBuffer>>,
    /// Read position in source samples while playing.
    cursor: Option<f64>,
}

#[derive(Default)]
pub struct Mixer {
    buffers: HashMap<SoundBufferId, Arc<PcmBuffer>>,
    voices: HashMap<SoundSourceId, Voice>,
}

impl Mixer {
    fn start(&mut self, source: SoundSourceId) {
        if let Some(voice) = self.voices.get_mut(&source) {
            if voice.buffer.is_some() {
                voice.cursor = Some(0.0);
            }
        }
    }

    fn is_playing(&self, source: SoundSourceId) -> bool {
        self.voices
            .get(&source)
            .is_some_and(|voice| voice.cursor.is_some())
    }

    /// Fills interleaved `out` with every playing voice, resampled by
    /// nearest neighbour. Voices that run off their buffer stop.
    pub fn mix(&mut self, out: &mut [f32], channels: usize, out_rate: u32) {
        out.fill(0.0);
        for voice in self.voices.values_mut() {
            let (Some(buffer), Some(mut cursor)) = (&voice.buffer, voice.cursor) else {
                continue;
            };
            let step = f64::from(buffer.sample_rate) / f64::from(out_rate);
            for frame in out.chunks_mut(channels) {
                let Some(&sample) = buffer.samples.get(cursor as usize) else {
                    break;
                };
                for channel in frame.iter_mut() {
                    *channel += sample * voice.gain;
                }
                cursor += step;
            }
            voice.cursor = (cursor < buffer.samples.len() as f64).then_some(cursor);
        }
    }
}

fn lock(mixer: &Mutex<Mixer>) -> MutexGuard<'_, Mixer> {
    mixer.lock().unwrap_or_else(PoisonError::into_inner)
}

mod native {
    use super::*;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{SampleRate, Stream, StreamConfig};

    pub fn init_audio_stream(mixer: Arc<Mutex<Mixer>>) -> Option<Stream> {
        let host = cpal::default_host();
        let device = host.default_output_device()?;

        let config = StreamConfig {
            channels: OUTPUT_CHANNELS,
            sample_rate: SampleRate(OUTPUT_RATE),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    lock(&mixer).mix(data, usize::from(OUTPUT_CHANNELS), OUTPUT_RATE);
                },
                |err| warn!("Audio stream error: {err}"),
                None,
            )
            .ok()?;

        stream.play().ok()?;
        Some(stream)
    }
}

pub struct AudioSystem {
    mixer: Arc<Mutex<Mixer>>,
    /// Kept alive for as long as the system; `None` means silent.
    _stream: Option<cpal::Stream>,
    output: bool,
    next_id: u32,
}

impl AudioSystem {
    pub fn new() -> Self {
        let mixer = Arc::new(Mutex::new(Mixer::default()));
        let stream = native::init_audio_stream(Arc::clone(&mixer));
        if stream.is_none() {
            warn!("No audio output device, sound is disabled");
        }
        Self {
            mixer,
            output: stream.is_some(),
            _stream: stream,
            next_id: 0,
        }
    }

    /// Hands out handles but never plays.
    pub fn silent() -> Self {
        Self {
            mixer: Arc::new(Mutex::new(Mixer::default())),
            _stream: None,
            output: false,
            next_id: 0,
        }
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn decode(&mut self, path: &Path) -> Result<SoundBufferId, AssetError> {
        let bytes = fs::read(path).map_err(|err| AssetError::io(path, err))?;
        let pcm = decode_wav(&bytes).map_err(|err| match err {
            WavError::UnsupportedFormat(_) | WavError::UnsupportedBits(_) => {
                AssetError::unsupported(path, err)
            }
            _ => AssetError::decode(path, err),
        })?;
        debug!(
            path = %path.display(),
            seconds = pcm.duration(),
            rate = pcm.sample_rate,
            "Decoded sound"
        );

        let id = SoundBufferId(self.next());
        lock(&self.mixer).buffers.insert(id, Arc::new(pcm));
        Ok(id)
    }

    pub fn create_source(&mut self, gain: f32) -> SoundSourceId {
        let id = SoundSourceId(self.next());
        lock(&self.mixer).voices.insert(
            id,
            Voice {
                gain,
                buffer: None,
                cursor: None,
            },
        );
        id
    }

    pub fn bind(&mut self, source: SoundSourceId, buffer: SoundBufferId) {
        let mut mixer = lock(&self.mixer);
        let pcm = mixer.buffers.get(&buffer).cloned();
        if let Some(voice) = mixer.voices.get_mut(&source) {
            voice.buffer = pcm;
            voice.cursor = None;
        }
    }

    pub fn play(&mut self, source: SoundSourceId) {
        if self.output {
            lock(&self.mixer).start(source);
        }
    }

    pub fn is_playing(&self, source: SoundSourceId) -> bool {
        lock(&self.mixer).is_playing(source)
    }

    pub fn release_source(&mut self, source: SoundSourceId) {
        lock(&self.mixer).voices.remove(&source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixer_with(samples: Vec<f32>, sample_rate: u32, gain: f32) -> (Mixer, SoundSourceId) {
        let mut mixer = Mixer::default();
        let source = SoundSourceId(1);
        mixer.voices.insert(
            source,
            Voice {
                gain,
                buffer: Some(Arc::new(PcmBuffer {
                    sample_rate,
                    samples,
                })),
                cursor: None,
            },
        );
        (mixer, source)
    }

    #[test]
    fn voice_plays_to_the_end_then_stops() {
        let (mut mixer, source) = mixer_with(vec![0.5, 1.0, -1.0], 100, 0.5);
        mixer.start(source);
        assert!(mixer.is_playing(source));

        let mut out = [0.0; 8];
        mixer.mix(&mut out, 2, 100);
        assert_eq!(out, [0.25, 0.25, 0.5, 0.5, -0.5, -0.5, 0.0, 0.0]);
        assert!(!mixer.is_playing(source));
    }

    #[test]
    fn slower_sources_are_stretched() {
        let (mut mixer, source) = mixer_with(vec![1.0, 0.5], 50, 1.0);
        mixer.start(source);

        let mut out = [0.0; 3];
        mixer.mix(&mut out, 1, 100);
        assert_eq!(out, [1.0, 1.0, 0.5]);
        assert!(mixer.is_playing(source));

        mixer.mix(&mut out, 1, 100);
        assert_eq!(out, [0.5, 0.0, 0.0]);
        assert!(!mixer.is_playing(source));
    }

    #[test]
    fn silent_system_never_plays() {
        let mut audio = AudioSystem::silent();
        let source = audio.create_source(1.0);
        audio.play(source);
        assert!(!audio.is_playing(source));
        audio.release_source(source);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut audio = AudioSystem::silent();
        let err = audio.decode(Path::new("no/such/laser.wav")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
