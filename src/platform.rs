//! Host platform detection and platform-specific command mapping

use std::env;
use std::path::{Path, PathBuf};

/// The platforms sayit knows how to drive audio on.
///
/// Anything else detects as `None` and consumers report a configuration
/// error instead of guessing at a command that cannot work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    MacOs,
    Windows,
    Linux,
}

impl HostPlatform {
    /// Detect the platform the process is running on.
    pub fn detect() -> Option<Self> {
        Self::from_os_name(env::consts::OS)
    }

    fn from_os_name(os: &str) -> Option<Self> {
        match os {
            "macos" => Some(HostPlatform::MacOs),
            "windows" => Some(HostPlatform::Windows),
            "linux" => Some(HostPlatform::Linux),
            _ => None,
        }
    }

    /// Command template that opens a file with the default application.
    pub fn open_command(self) -> &'static str {
        match self {
            HostPlatform::MacOs => "open %s",
            HostPlatform::Windows => "cmd /c \"start %s\"",
            HostPlatform::Linux => "xdg-open %s",
        }
    }

    /// Best-guess low-level audio host name for the cpal backend.
    pub fn audio_host_guess(self) -> &'static str {
        match self {
            HostPlatform::MacOs => "coreaudio",
            HostPlatform::Windows => "wasapi",
            HostPlatform::Linux => "alsa",
        }
    }
}

/// Scan every directory on `PATH` for an executable file named `program`.
///
/// Returns the full path of the first match, in `PATH` order.
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    for dir in env::split_paths(&path_var) {
        let candidate = dir.join(program);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
