//! Default-output playback of a stored file
//!
//! Decodes the named file and plays it synchronously through the
//! system's default audio output, polling until the sink drains.

use std::io::BufReader;
use std::thread;
use std::time::Duration;

use log::debug;

use crate::playback::{default_output_available, AudioSource, Availability, Backend};
use crate::{Result, SayitError};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct NativeBackend;

impl Backend for NativeBackend {
    fn play(&self, source: AudioSource) -> Result<()> {
        let handle = match source {
            AudioSource::File(handle) => handle,
            AudioSource::Stream(_) => {
                return Err(SayitError::Playback(
                    "native backend requires a named file".to_string(),
                ))
            }
        };

        debug!("Playing {} on the default output", handle.path.display());

        let stream = rodio::OutputStreamBuilder::open_default_stream()
            .map_err(|e| SayitError::Playback(format!("Failed to open audio output: {}", e)))?;
        let sink = rodio::Sink::connect_new(stream.mixer());

        let source = rodio::Decoder::new(BufReader::new(handle.file))
            .map_err(|e| SayitError::Playback(format!("Failed to decode audio: {}", e)))?;
        sink.append(source);

        // Poll until playback completes
        while !sink.empty() {
            thread::sleep(POLL_INTERVAL);
        }

        Ok(())
    }
}

pub fn probe() -> Availability {
    default_output_available()
}

pub fn build(_options: Option<&str>) -> Result<Box<dyn Backend>> {
    Ok(Box::new(NativeBackend))
}
