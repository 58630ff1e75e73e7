//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::parser::validator::ValidationError;
use thiserror::Error;

/// Errors that can occur while turning wperf output into a sample
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to decode wperf output as JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),
}

/// A failed or interrupted wperf invocation
#[derive(Error, Debug, Clone, Default)]
#[error("{message}")]
pub struct ExecError {
    pub message: String,

    /// Exit code, absent when the process could not be spawned or died by signal
    pub code: Option<i32>,

    pub stdout: String,
    pub stderr: String,

    /// Cancellation was requested before the process finished
    pub cancelled: bool,
}

impl ExecError {
    /// Error output first, then the message, for marker searches
    pub fn diagnostic_text(&self) -> String {
        format!("{}\n{}\n{}", self.stderr, self.stdout, self.message)
    }
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors from the persisted studio state
#[derive(Error, Debug)]
pub enum StateError {
    #[error("State file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("State file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the TOML configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
