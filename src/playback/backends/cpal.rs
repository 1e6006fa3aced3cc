//! Low-level audio-host backend
//!
//! Decodes the stream to PCM and writes the frames to an output stream
//! on a named cpal host (for example `alsa` or `coreaudio`). When no
//! host name is supplied via `--backend-options`, one is guessed from
//! the platform; an unguessable platform is a configuration error.

use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, warn};
use once_cell::sync::OnceCell;
use rodio::Source;

use crate::platform::HostPlatform;
use crate::playback::{AudioSource, Availability, Backend};
use crate::{Result, SayitError};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Samples queued for the audio callback.
struct PlayState {
    samples: Vec<f32>,
    pos: usize,
}

pub struct CpalBackend {
    host: Option<String>,
}

impl CpalBackend {
    pub fn new(host: Option<&str>) -> Self {
        Self {
            host: host.map(str::to_string),
        }
    }

    fn resolve_host(&self) -> Result<cpal::Host> {
        let name = match &self.host {
            Some(name) => name.clone(),
            None => HostPlatform::detect()
                .ok_or_else(|| {
                    SayitError::Configuration(
                        "Can't guess a usable audio host for this platform; \
                         specify one with --backend-options"
                            .to_string(),
                    )
                })?
                .audio_host_guess()
                .to_string(),
        };

        let host_id = cpal::available_hosts()
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(&name))
            .ok_or_else(|| {
                SayitError::Configuration(format!("Audio host '{}' is not available", name))
            })?;

        debug!("Using audio host {}", host_id.name());
        cpal::host_from_id(host_id)
            .map_err(|e| SayitError::Playback(format!("Failed to open audio host: {}", e)))
    }
}

impl Backend for CpalBackend {
    fn play(&self, source: AudioSource) -> Result<()> {
        let mut reader: Box<dyn Read + Send> = match source {
            AudioSource::Stream(stream) => stream,
            AudioSource::File(handle) => Box::new(handle.file),
        };
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let decoder = rodio::Decoder::new(Cursor::new(bytes))
            .map_err(|e| SayitError::Playback(format!("Failed to decode audio: {}", e)))?;
        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<f32> = decoder.collect();
        debug!(
            "Decoded {} samples at {} Hz, {} channel(s)",
            samples.len(),
            sample_rate,
            channels
        );

        let host = self.resolve_host()?;
        let device = host.default_output_device().ok_or_else(|| {
            SayitError::Playback(format!("Host {} has no output device", host.id().name()))
        })?;

        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let state = Arc::new(Mutex::new(PlayState { samples, pos: 0 }));
        let done = Arc::new(AtomicBool::new(false));

        let callback_state = Arc::clone(&state);
        let callback_done = Arc::clone(&done);
        let stream = device
            .build_output_stream(
                &config,
                move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut state = callback_state.lock().unwrap();
                    for slot in out.iter_mut() {
                        if state.pos < state.samples.len() {
                            *slot = state.samples[state.pos];
                            state.pos += 1;
                        } else {
                            *slot = 0.0;
                            callback_done.store(true, Ordering::Relaxed);
                        }
                    }
                },
                |e| warn!("Audio stream error: {}", e),
                None,
            )
            .map_err(|e| SayitError::Playback(format!("Failed to build output stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| SayitError::Playback(format!("Failed to start playback: {}", e)))?;

        // Poll until the callback has drained the queue
        while !done.load(Ordering::Relaxed) {
            thread::sleep(POLL_INTERVAL);
        }
        // Let the last buffer reach the device before it closes
        thread::sleep(POLL_INTERVAL);

        drop(stream);
        Ok(())
    }
}

/// The decoder is statically linked, so the probe only checks for an
/// output device on the default host.
pub fn probe() -> Availability {
    static PROBE: OnceCell<Availability> = OnceCell::new();
    PROBE
        .get_or_init(|| {
            if cpal::default_host().default_output_device().is_some() {
                Availability::Available
            } else {
                Availability::Unavailable("No low-level audio output device".to_string())
            }
        })
        .clone()
}

pub fn build(options: Option<&str>) -> Result<Box<dyn Backend>> {
    Ok(Box::new(CpalBackend::new(options)))
}
