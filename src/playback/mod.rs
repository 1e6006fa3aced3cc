//! Audio playback backends
//!
//! Every backend implements the same `play` contract; they differ in
//! which runtime facility they drive and in whether they need the audio
//! on disk under a real file name. A static registry maps backend names
//! to constructors and is consulted both by explicit `--backend`
//! selection and by autodetection.

pub mod backends;

use log::{debug, info};
use once_cell::sync::OnceCell;

use crate::loader::AudioStream;
use crate::storage::NamedAudioHandle;
use crate::{Result, SayitError};

/// Audio handed to a backend: either a stored file or the raw stream.
///
/// The orchestrator consults `named_file_required` and only passes the
/// matching variant; backends reject the other one.
pub enum AudioSource {
    File(NamedAudioHandle),
    Stream(AudioStream),
}

/// An audio playback backend.
pub trait Backend {
    /// Play the audio to completion, blocking until playback ends.
    fn play(&self, source: AudioSource) -> Result<()>;
}

/// Result of a backend capability probe.
#[derive(Debug, Clone)]
pub enum Availability {
    Available,
    Unavailable(String),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Registry entry for one backend variant.
pub struct BackendInfo {
    pub name: &'static str,
    pub description: &'static str,
    /// Whether the backend needs the audio stored under a file name.
    pub named_file_required: bool,
    /// Capability probe; memoized per variant.
    pub probe: fn() -> Availability,
    /// Constructor; receives the raw `--backend-options` string.
    pub build: fn(Option<&str>) -> Result<Box<dyn Backend>>,
}

/// All known backends. Order here is listing order only; autodetection
/// preference is encoded in [`autodetect`].
pub const REGISTRY: &[BackendInfo] = &[
    BackendInfo {
        name: "desktop",
        description: "Plays the stored file through the macOS sound facility (afplay)",
        named_file_required: true,
        probe: backends::desktop::probe,
        build: backends::desktop::build,
    },
    BackendInfo {
        name: "native",
        description: "Decodes the stored file and plays it on the default audio output",
        named_file_required: true,
        probe: backends::native::probe,
        build: backends::native::build,
    },
    BackendInfo {
        name: "stdout",
        description: "Writes the raw audio bytes to standard output",
        named_file_required: false,
        probe: backends::stdout::probe,
        build: backends::stdout::build,
    },
    BackendInfo {
        name: "external",
        description: "Runs an external player given as a command template (--backend-options)",
        named_file_required: true,
        probe: backends::external::probe,
        build: backends::external::build,
    },
    BackendInfo {
        name: "defaultapp",
        description: "Opens the stored file with the system default application",
        named_file_required: true,
        probe: backends::external::probe_defaultapp,
        build: backends::external::build_defaultapp,
    },
    BackendInfo {
        name: "rodio",
        description: "Decodes the stream in memory and plays it on the default audio output",
        named_file_required: false,
        probe: backends::rodio::probe,
        build: backends::rodio::build,
    },
    BackendInfo {
        name: "cpal",
        description: "Decodes the stream and writes PCM frames to a named low-level audio host",
        named_file_required: false,
        probe: backends::cpal::probe,
        build: backends::cpal::build,
    },
];

/// A constructed backend together with its registry entry.
pub struct Selection {
    pub backend: Box<dyn Backend>,
    pub info: &'static BackendInfo,
}

/// Look up a registry entry by backend name.
pub fn lookup(name: &str) -> Option<&'static BackendInfo> {
    REGISTRY.iter().find(|info| info.name == name)
}

/// Construct a backend by explicit name.
///
/// Unknown or currently-unavailable names fail fast with a
/// configuration error; playback is never attempted.
pub fn create(name: &str, options: Option<&str>) -> Result<Selection> {
    let info = lookup(name)
        .ok_or_else(|| SayitError::Configuration(format!("Unknown backend '{}'", name)))?;

    match (info.probe)() {
        Availability::Available => Ok(Selection {
            backend: (info.build)(options)?,
            info,
        }),
        Availability::Unavailable(reason) => Err(SayitError::Configuration(format!(
            "Backend '{}' is unavailable: {}",
            name, reason
        ))),
    }
}

/// Pick the first usable backend in fixed preference order:
///
/// 1. desktop (platform sound facility)
/// 2. rodio (decoder + default output device)
/// 3. external (known player executable found on PATH)
/// 4. cpal (decoder + low-level audio host)
/// 5. defaultapp (last resort, always available)
///
/// Deterministic for a fixed environment: probes are memoized and the
/// order never changes.
pub fn autodetect() -> Result<Selection> {
    if let Some(selection) = try_variant("desktop")? {
        return Ok(selection);
    }

    if let Some(selection) = try_variant("rodio")? {
        return Ok(selection);
    }

    if let Some(command) = backends::external::autodetect_command() {
        info!("Autodetected external player: {}", command);
        if let Some(info) = lookup("external") {
            return Ok(Selection {
                backend: Box::new(backends::external::ExternalBackend::new(command)),
                info,
            });
        }
    }

    if let Some(selection) = try_variant("cpal")? {
        return Ok(selection);
    }

    info!("No backend was found; trying to play using your default application");
    create("defaultapp", None)
}

fn try_variant(name: &str) -> Result<Option<Selection>> {
    let Some(info) = lookup(name) else {
        return Ok(None);
    };

    match (info.probe)() {
        Availability::Available => {
            info!("Selected {} backend", info.name);
            let backend = (info.build)(None)?;
            Ok(Some(Selection { backend, info }))
        }
        Availability::Unavailable(reason) => {
            debug!("{} backend unavailable: {}", info.name, reason);
            Ok(None)
        }
    }
}

/// Backends usable right now, with their descriptions.
pub fn available_backends() -> Vec<(&'static str, &'static str)> {
    REGISTRY
        .iter()
        .filter(|info| (info.probe)().is_available())
        .map(|info| (info.name, info.description))
        .collect()
}

/// Backends that cannot be used right now, with the probe's reason.
pub fn unavailable_backends() -> Vec<(&'static str, String)> {
    REGISTRY
        .iter()
        .filter_map(|info| match (info.probe)() {
            Availability::Available => None,
            Availability::Unavailable(reason) => Some((info.name, reason)),
        })
        .collect()
}

/// Shared probe for backends that play through the default output
/// device. Opening the device is expensive, so the result is computed
/// once per process.
pub(crate) fn default_output_available() -> Availability {
    static PROBE: OnceCell<Availability> = OnceCell::new();
    PROBE
        .get_or_init(|| match rodio::OutputStreamBuilder::open_default_stream() {
            Ok(_) => Availability::Available,
            Err(e) => Availability::Unavailable(format!("No default audio output device: {}", e)),
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_are_unique() {
        for (i, a) in REGISTRY.iter().enumerate() {
            for b in &REGISTRY[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        assert!(lookup("stdout").is_some());
        assert!(lookup("rodio").is_some());
        assert!(lookup("does-not-exist").is_none());
    }

    #[test]
    fn test_create_unknown_backend_is_configuration_error() {
        match create("does-not-exist", None) {
            Err(SayitError::Configuration(_)) => {}
            _ => panic!("expected Configuration error"),
        }
    }

    #[test]
    fn test_stdout_backend_never_needs_named_file() {
        let info = lookup("stdout").unwrap();
        assert!(!info.named_file_required);
        assert!((info.probe)().is_available());
    }
}
