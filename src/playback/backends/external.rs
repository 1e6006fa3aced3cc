//! External-program backends
//!
//! Runs a user-supplied (or autodetected) shell command template with
//! the stored file path substituted in, blocking until the command
//! returns. The default-app variant is the same mechanism with the
//! platform's "open with default application" command as the template.

use std::process::Command;

use log::debug;
use once_cell::sync::OnceCell;

use crate::platform::{find_in_path, HostPlatform};
use crate::playback::{AudioSource, Availability, Backend};
use crate::{Result, SayitError};

/// Known player executables probed during autodetection, in preference
/// order, with the command template each one gets.
const KNOWN_PLAYERS: &[(&str, &str)] = &[
    ("mpg123", "mpg123 -q %s"),
    ("playsound", "playsound %s"),
    ("mplayer", "mplayer %s >/dev/null 2>&1"),
];

pub struct ExternalBackend {
    command: String,
}

impl ExternalBackend {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

impl Backend for ExternalBackend {
    fn play(&self, source: AudioSource) -> Result<()> {
        let handle = match source {
            AudioSource::File(handle) => handle,
            AudioSource::Stream(_) => {
                return Err(SayitError::Playback(
                    "external backend requires a named file".to_string(),
                ))
            }
        };

        let command = build_command(&self.command, &handle.path.to_string_lossy());
        debug!("Running external player: {}", command);

        let status = shell_command(&command)
            .status()
            .map_err(|e| SayitError::Playback(format!("Failed to run '{}': {}", command, e)))?;

        if !status.success() {
            return Err(SayitError::Playback(format!(
                "'{}' exited with {}",
                command, status
            )));
        }
        Ok(())
    }
}

/// Substitute the file path into the template. A template without a
/// `%s` placeholder gets the path appended after a space.
pub fn build_command(template: &str, path: &str) -> String {
    if template.contains("%s") {
        template.replace("%s", path)
    } else {
        format!("{} {}", template, path)
    }
}

#[cfg(unix)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Scan PATH for a known player executable and return the command
/// template of the first one found.
pub fn autodetect_command() -> Option<&'static str> {
    for (program, command) in KNOWN_PLAYERS {
        if find_in_path(program).is_some() {
            debug!("Found {} on PATH", program);
            return Some(command);
        }
    }
    None
}

/// The external backend itself is always usable; it just needs a
/// command template, which is checked at construction time.
pub fn probe() -> Availability {
    Availability::Available
}

pub fn build(options: Option<&str>) -> Result<Box<dyn Backend>> {
    let command = options.ok_or_else(|| {
        SayitError::Configuration(
            "external backend needs a command template via --backend-options".to_string(),
        )
    })?;
    Ok(Box::new(ExternalBackend::new(command)))
}

/// Usable whenever the host platform has a known open command.
pub fn probe_defaultapp() -> Availability {
    static PROBE: OnceCell<Availability> = OnceCell::new();
    PROBE
        .get_or_init(|| match HostPlatform::detect() {
            Some(_) => Availability::Available,
            None => Availability::Unavailable(format!(
                "No default-application open command known for platform '{}'",
                std::env::consts::OS
            )),
        })
        .clone()
}

pub fn build_defaultapp(_options: Option<&str>) -> Result<Box<dyn Backend>> {
    let platform = HostPlatform::detect().ok_or_else(|| {
        SayitError::Configuration(format!(
            "No default-application open command known for platform '{}'",
            std::env::consts::OS
        ))
    })?;
    Ok(Box::new(ExternalBackend::new(platform.open_command())))
}
