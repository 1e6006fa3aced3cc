//! Backend implementations

// macOS sound facility (afplay)
pub mod desktop;

// Default-output playback of the stored file
pub mod native;

// Raw bytes to standard output
pub mod stdout;

// External player command templates, including the default-app opener
pub mod external;

// In-memory decode to the default output device
pub mod rodio;

// In-memory decode to a named low-level audio host
pub mod cpal;
