//! Desktop sound-facility backend
//!
//! Hands the stored file to the macOS sound facility (`afplay`) and
//! polls the child process until playback finishes. Only available on
//! macOS; other platforms get the rodio or cpal backends instead.

use std::path::PathBuf;
use std::process::Command;
use std::thread;
use std::time::Duration;

use log::debug;
use once_cell::sync::OnceCell;

use crate::platform::{find_in_path, HostPlatform};
use crate::playback::{AudioSource, Availability, Backend};
use crate::{Result, SayitError};

const PLAYER: &str = "afplay";
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct DesktopBackend {
    player: PathBuf,
}

impl DesktopBackend {
    pub fn new() -> Result<Self> {
        let player = find_in_path(PLAYER).ok_or_else(|| {
            SayitError::Configuration(format!("{} not found on PATH", PLAYER))
        })?;
        Ok(Self { player })
    }
}

impl Backend for DesktopBackend {
    fn play(&self, source: AudioSource) -> Result<()> {
        let handle = match source {
            AudioSource::File(handle) => handle,
            AudioSource::Stream(_) => {
                return Err(SayitError::Playback(
                    "desktop backend requires a named file".to_string(),
                ))
            }
        };

        debug!("Playing {} with {}", handle.path.display(), self.player.display());

        let mut child = Command::new(&self.player)
            .arg(&handle.path)
            .spawn()
            .map_err(|e| SayitError::Playback(format!("Failed to start {}: {}", PLAYER, e)))?;

        // Poll until the player exits
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if status.success() {
                        return Ok(());
                    }
                    return Err(SayitError::Playback(format!(
                        "{} exited with {}",
                        PLAYER, status
                    )));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    return Err(SayitError::Playback(format!(
                        "Failed to wait for {}: {}",
                        PLAYER, e
                    )))
                }
            }
        }
    }
}

/// Available on macOS when afplay is on PATH.
pub fn probe() -> Availability {
    static PROBE: OnceCell<Availability> = OnceCell::new();
    PROBE
        .get_or_init(|| {
            if HostPlatform::detect() != Some(HostPlatform::MacOs) {
                return Availability::Unavailable(
                    "Requires the macOS sound facility (afplay)".to_string(),
                );
            }
            match find_in_path(PLAYER) {
                Some(_) => Availability::Available,
                None => Availability::Unavailable(format!("{} not found on PATH", PLAYER)),
            }
        })
        .clone()
}

pub fn build(_options: Option<&str>) -> Result<Box<dyn Backend>> {
    Ok(Box::new(DesktopBackend::new()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_is_memoized() {
        // Two calls must agree; the second one comes from the cache.
        let first = probe().is_available();
        let second = probe().is_available();
        assert_eq!(first, second);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_unavailable_on_linux() {
        assert!(!probe().is_available());
    }
}
