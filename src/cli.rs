//! Command-line interface and playback orchestration

use std::io::Read;

use clap::{CommandFactory, Parser};
use log::debug;

use crate::loader::HttpLoader;
use crate::playback::{self, AudioSource, Backend, Selection};
use crate::storage::{self, Storage, TempfileStorage};
use crate::{Result, SayitError};

/// Spoken when no phrase words are given.
pub const DEFAULT_PHRASE: &str = "Sayit, o falador.";

#[derive(Parser, Debug)]
#[command(
    name = "sayit",
    version,
    about = "Say what you type using a remote translation service's speech engine",
    disable_help_flag = true
)]
pub struct Args {
    /// Show this help and the available backends
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// Language code for the synthesized speech
    #[arg(short = 'l', long = "language", default_value = "pt")]
    pub language: String,

    /// Audio output backend (autodetected when not given)
    #[arg(short = 'b', long = "backend")]
    pub backend: Option<String>,

    /// Options forwarded to the chosen backend
    #[arg(short = 'o', long = "backend-options")]
    pub backend_options: Option<String>,

    /// List backends that are currently unusable, with reasons
    #[arg(short = 'u', long = "show-unavailable")]
    pub show_unavailable: bool,

    /// Words forming the phrase to speak
    pub phrase: Vec<String>,
}

/// Space-join the phrase words; an empty list falls back to the
/// default phrase.
pub fn resolve_phrase(words: &[String]) -> String {
    if words.is_empty() {
        DEFAULT_PHRASE.to_string()
    } else {
        words.join(" ")
    }
}

fn print_help() {
    let mut command = Args::command();
    let _ = command.print_help();
    println!();
    println!("Available backends:");
    for (name, description) in playback::available_backends() {
        println!("{:<20} {}", name, description);
    }
}

fn print_unavailable() {
    println!("Unavailable backends:");
    for (name, reason) in playback::unavailable_backends() {
        println!("{:<20} {}", name, reason);
    }
}

/// Resolve the backend: explicit name wins, otherwise autodetect.
/// Backend options without a backend name is a usage error, caught
/// before any network activity.
fn resolve_backend(args: &Args) -> Result<Selection> {
    match &args.backend {
        Some(name) => playback::create(name, args.backend_options.as_deref()),
        None if args.backend_options.is_some() => Err(SayitError::Usage(
            "--backend-options was given without --backend".to_string(),
        )),
        None => playback::autodetect(),
    }
}

/// Fetch the phrase's audio and play it through the resolved backend.
///
/// Backends that need a named file get the stream persisted first; the
/// temp file is released on every path, including playback failure.
pub fn run(args: Args) -> Result<()> {
    if args.show_unavailable {
        print_unavailable();
        return Ok(());
    }
    if args.help {
        print_help();
        return Ok(());
    }

    let selection = resolve_backend(&args)?;
    let text = resolve_phrase(&args.phrase);
    debug!(
        "Speaking {:?} in '{}' via the {} backend",
        text, args.language, selection.info.name
    );

    let loader = HttpLoader::new();
    let mut stream = loader.load(&text, &args.language)?;

    if selection.info.named_file_required {
        let identifier = storage::identifier(&args.language, &text);
        let mut store = TempfileStorage::new();
        play_stored(&mut store, selection.backend.as_ref(), &identifier, &mut *stream)?;
    } else {
        selection.backend.play(AudioSource::Stream(stream))?;
    }

    Ok(())
}

/// Persist the stream under `identifier`, play the stored file, and
/// release the file again. Release happens on every path, including a
/// playback failure, in which case the playback error is reported.
fn play_stored(
    storage: &mut dyn Storage,
    backend: &dyn Backend,
    identifier: &str,
    stream: &mut dyn Read,
) -> Result<()> {
    let handle = storage.store(identifier, stream)?;

    let played = backend.play(AudioSource::File(handle));
    let released = storage.release(identifier);

    // a playback failure is the more useful report
    played?;
    released?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::sync::Mutex;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Backend whose play always fails, remembering the file path it
    /// was handed.
    struct BrokenBackend {
        seen_path: Mutex<Option<PathBuf>>,
    }

    impl Backend for BrokenBackend {
        fn play(&self, source: AudioSource) -> Result<()> {
            if let AudioSource::File(handle) = source {
                *self.seen_path.lock().unwrap() = Some(handle.path.clone());
            }
            Err(SayitError::Playback("speaker on fire".to_string()))
        }
    }

    #[test]
    fn test_temp_file_released_when_playback_fails() {
        let mut store = TempfileStorage::new();
        let backend = BrokenBackend {
            seen_path: Mutex::new(None),
        };
        let identifier = storage::identifier("en", "cleanup on failure");
        let mut stream = Cursor::new(b"audio bytes".to_vec());

        let result = play_stored(&mut store, &backend, &identifier, &mut stream);

        match result {
            Err(SayitError::Playback(_)) => {}
            _ => panic!("the playback error should be reported"),
        }

        let path = backend
            .seen_path
            .lock()
            .unwrap()
            .take()
            .expect("backend should have been handed a stored file");
        assert!(!path.exists(), "temp file must be released after a failed play");

        match store.retrieve(&identifier) {
            Err(SayitError::NotFound(_)) => {}
            _ => panic!("mapping entry should be gone after release"),
        }
    }

    #[test]
    fn test_play_stored_releases_on_success() {
        struct SilentBackend;
        impl Backend for SilentBackend {
            fn play(&self, _source: AudioSource) -> Result<()> {
                Ok(())
            }
        }

        let mut store = TempfileStorage::new();
        let identifier = storage::identifier("en", "cleanup on success");
        let mut stream = Cursor::new(b"audio bytes".to_vec());

        play_stored(&mut store, &SilentBackend, &identifier, &mut stream)
            .expect("playback should succeed");

        match store.retrieve(&identifier) {
            Err(SayitError::NotFound(_)) => {}
            _ => panic!("temp file should be released after playback"),
        }
    }

    #[test]
    fn test_resolve_phrase_joins_with_spaces() {
        assert_eq!(resolve_phrase(&words(&["hello"])), "hello");
        assert_eq!(resolve_phrase(&words(&["bom", "dia"])), "bom dia");
        assert_eq!(
            resolve_phrase(&words(&["one", "two", "three"])),
            "one two three"
        );
    }

    #[test]
    fn test_resolve_phrase_empty_falls_back() {
        assert_eq!(resolve_phrase(&[]), DEFAULT_PHRASE);
    }

    #[test]
    fn test_backend_options_without_backend_is_usage_error() {
        let args = Args::parse_from(["sayit", "-o", "mpg123 %s", "hello"]);
        match resolve_backend(&args) {
            Err(SayitError::Usage(_)) => {}
            _ => panic!("expected Usage error"),
        }
    }

    #[test]
    fn test_language_default_and_override() {
        let args = Args::parse_from(["sayit", "hello"]);
        assert_eq!(args.language, "pt");

        let args = Args::parse_from(["sayit", "-l", "en", "hello"]);
        assert_eq!(args.language, "en");
    }

    #[test]
    fn test_phrase_words_are_positional() {
        let args = Args::parse_from(["sayit", "-l", "en", "hello", "world"]);
        assert_eq!(args.phrase, words(&["hello", "world"]));
    }

    #[test]
    fn test_explicit_backend_is_parsed() {
        let args = Args::parse_from(["sayit", "-b", "stdout", "hi"]);
        assert_eq!(args.backend.as_deref(), Some("stdout"));
    }
}
