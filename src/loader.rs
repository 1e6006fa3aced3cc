//! Remote speech loader
//!
//! Fetches synthesized speech for a (text, language) pair from the
//! translation service's speech endpoint. The response body is returned
//! as a lazily-read byte stream; the audio format is whatever the
//! service produces and is treated opaquely downstream.

use std::io::Read;

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use reqwest::Url;

use crate::{Result, SayitError};

/// Speech endpoint of the translation service.
const SPEECH_ENDPOINT: &str = "http://translate.google.com/translate_tts";

/// The service rejects requests without a browser User-Agent.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// An opaque, read-once stream of encoded audio bytes.
pub type AudioStream = Box<dyn Read + Send>;

/// Fetches speech audio over HTTP.
pub struct HttpLoader {
    endpoint: String,
    client: Client,
}

impl HttpLoader {
    pub fn new() -> Self {
        Self::with_endpoint(SPEECH_ENDPOINT)
    }

    /// Point the loader at a different endpoint (used by tests).
    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: Client::new(),
        }
    }

    /// Fetch speech audio for `text` in `language`.
    ///
    /// Issues a blocking GET and returns the response body without
    /// reading it; a transport failure or non-2xx status is a
    /// `Network` error. No retries are attempted.
    pub fn load(&self, text: &str, language: &str) -> Result<AudioStream> {
        let url = speech_url(&self.endpoint, text, language)?;
        debug!("Fetching speech audio from {}", url);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()?
            .error_for_status()?;

        Ok(Box::new(response))
    }
}

impl Default for HttpLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the request URL with `target_language` and `query` parameters.
fn speech_url(endpoint: &str, text: &str, language: &str) -> Result<Url> {
    Url::parse_with_params(endpoint, &[("target_language", language), ("query", text)])
        .map_err(|e| SayitError::Network(format!("Invalid speech URL: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_url_carries_language_and_text() {
        let url = speech_url(SPEECH_ENDPOINT, "hello", "en").unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("target_language=en"));
        assert!(query.contains("query=hello"));
    }

    #[test]
    fn test_speech_url_encodes_utf8_text() {
        let url = speech_url(SPEECH_ENDPOINT, "bom dia, José", "pt").unwrap();
        let query = url.query().unwrap();
        // space and the accented character must be percent-encoded
        assert!(query.contains("target_language=pt"));
        assert!(!query.contains(' '));
        assert!(query.contains("Jos%C3%A9"));
    }

    #[test]
    fn test_speech_url_rejects_garbage_endpoint() {
        assert!(speech_url("not a url", "hi", "en").is_err());
    }
}
