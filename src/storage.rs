//! Temporary audio storage
//!
//! Some backends can only play from a named file on disk. Storage
//! persists a fetched audio stream to a temp file keyed by a
//! content-derived identifier, and deletes it again after playback.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::PathBuf;

use log::debug;
use sha2::{Digest, Sha256};

use crate::{Result, SayitError};

/// Compute the storage identifier for a (language, text) pair.
///
/// Lowercase hex SHA-256 of `language`, a `:` separator, and the UTF-8
/// text. Deterministic; identical inputs always map to the same
/// identifier. Hash collisions are not specially handled.
pub fn identifier(language: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(language.as_bytes());
    hasher.update(b":");
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// An open read handle to a stored audio file, together with its path.
///
/// The path is what file-based backends hand to external programs.
pub struct NamedAudioHandle {
    pub file: File,
    pub path: PathBuf,
}

/// Identifier-keyed persistence for audio streams.
///
/// Only the temp-file implementation exists today; the trait keeps the
/// orchestrator independent of where the bytes actually land.
pub trait Storage {
    /// Write all bytes from `stream` under `identifier` and return a
    /// read handle to the stored copy.
    fn store(&mut self, identifier: &str, stream: &mut dyn Read) -> Result<NamedAudioHandle>;

    /// Reopen the file stored under `identifier`, read-only.
    fn retrieve(&self, identifier: &str) -> Result<NamedAudioHandle>;

    /// Delete the file stored under `identifier` and forget the mapping.
    fn release(&mut self, identifier: &str) -> Result<()>;
}

/// Storage backed by uniquely-named files in the system temp directory.
///
/// The mapping lives for the process only; nothing persists across runs.
pub struct TempfileStorage {
    dir: PathBuf,
    fmap: HashMap<String, PathBuf>,
}

impl TempfileStorage {
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    /// Storage rooted at a specific directory instead of the system
    /// temp dir.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            fmap: HashMap::new(),
        }
    }
}

impl Default for TempfileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for TempfileStorage {
    fn store(&mut self, identifier: &str, stream: &mut dyn Read) -> Result<NamedAudioHandle> {
        // .mp3 suffix so external players recognize the format
        let mut tf = tempfile::Builder::new()
            .prefix("sayit-")
            .suffix(".mp3")
            .tempfile_in(&self.dir)?;

        // Copy while delete-on-drop still guards the file: a stream
        // that fails mid-read must not leave an orphan behind.
        io::copy(stream, &mut tf)?;

        // Detach from delete-on-drop only now; release() owns deletion.
        let (_file, path) = tf.keep().map_err(|e| SayitError::Io(e.error))?;
        debug!("Stored audio for {} at {}", identifier, path.display());

        self.fmap.insert(identifier.to_string(), path);
        self.retrieve(identifier)
    }

    fn retrieve(&self, identifier: &str) -> Result<NamedAudioHandle> {
        let path = self
            .fmap
            .get(identifier)
            .ok_or_else(|| SayitError::NotFound(format!("No stored audio for {}", identifier)))?;

        let file = File::open(path).map_err(|e| {
            SayitError::NotFound(format!("Stored audio at {} unreadable: {}", path.display(), e))
        })?;

        Ok(NamedAudioHandle {
            file,
            path: path.clone(),
        })
    }

    /// Releasing an identifier that was never stored is a no-op; the
    /// caller cannot usefully react to it.
    fn release(&mut self, identifier: &str) -> Result<()> {
        if let Some(path) = self.fmap.remove(identifier) {
            debug!("Releasing {}", path.display());
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_is_deterministic() {
        let a = identifier("en", "hello world");
        let b = identifier("en", "hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn test_identifier_varies_with_input() {
        let base = identifier("en", "hello");
        assert_ne!(base, identifier("pt", "hello"));
        assert_ne!(base, identifier("en", "hello "));
        assert_ne!(base, identifier("en", "Hello"));
    }

    #[test]
    fn test_identifier_is_hex_sha256() {
        let id = identifier("en", "hello");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_retrieve_unknown_identifier() {
        let storage = TempfileStorage::new();
        match storage.retrieve("deadbeef") {
            Err(SayitError::NotFound(_)) => {}
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_release_unknown_identifier_is_noop() {
        let mut storage = TempfileStorage::new();
        assert!(storage.release("deadbeef").is_ok());
    }
}
