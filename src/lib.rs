//! sayit - Say what you type
//!
//! Fetches synthesized speech for a phrase from a remote translation
//! service's speech endpoint and plays it through one of several
//! interchangeable audio backends selected at runtime.

pub mod cli;
pub mod error;
pub mod loader;
pub mod platform;
pub mod playback;
pub mod storage;

pub use error::{Result, SayitError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "sayit";
