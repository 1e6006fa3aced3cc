//! Standard-output backend
//!
//! Copies the raw audio bytes to stdout. Always available; useful for
//! piping into another player or for testing without a sound device.

use std::io::{self, Read};

use crate::playback::{AudioSource, Availability, Backend};
use crate::Result;

pub struct StdoutBackend;

impl Backend for StdoutBackend {
    fn play(&self, source: AudioSource) -> Result<()> {
        let mut reader: Box<dyn Read + Send> = match source {
            AudioSource::Stream(stream) => stream,
            // a stored file works just as well as a pass-through source
            AudioSource::File(handle) => Box::new(handle.file),
        };

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        io::copy(&mut reader, &mut lock)?;
        Ok(())
    }
}

pub fn probe() -> Availability {
    Availability::Available
}

pub fn build(_options: Option<&str>) -> Result<Box<dyn Backend>> {
    Ok(Box::new(StdoutBackend))
}
