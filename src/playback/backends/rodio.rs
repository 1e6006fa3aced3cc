//! In-memory decode to the default audio output
//!
//! Buffers the fetched stream, decodes it with rodio's codecs, and
//! plays it on the default output device, blocking until the sink
//! finishes. Needs no temp file.

use std::io::{Cursor, Read};

use log::debug;

use crate::playback::{default_output_available, AudioSource, Availability, Backend};
use crate::{Result, SayitError};

pub struct RodioBackend;

impl Backend for RodioBackend {
    fn play(&self, source: AudioSource) -> Result<()> {
        // The decoder needs a seekable source, so the read-once stream
        // is buffered fully before decoding starts.
        let mut reader: Box<dyn Read + Send> = match source {
            AudioSource::Stream(stream) => stream,
            AudioSource::File(handle) => Box::new(handle.file),
        };
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        debug!("Decoding {} bytes of audio", bytes.len());

        let stream = rodio::OutputStreamBuilder::open_default_stream()
            .map_err(|e| SayitError::Playback(format!("Failed to open audio output: {}", e)))?;
        let sink = rodio::Sink::connect_new(stream.mixer());

        let source = rodio::Decoder::new(Cursor::new(bytes))
            .map_err(|e| SayitError::Playback(format!("Failed to decode audio: {}", e)))?;
        sink.append(source);
        sink.sleep_until_end();

        Ok(())
    }
}

pub fn probe() -> Availability {
    default_output_available()
}

pub fn build(_options: Option<&str>) -> Result<Box<dyn Backend>> {
    Ok(Box::new(RodioBackend))
}
