//! Unified error types for scribe

use std::path::PathBuf;
use thiserror::Error;

/// Phase of a file operation, used to give filesystem errors context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsPhase {
    Read,
    Backup,
    Write,
    Enumerate,
}

impl std::fmt::Display for FsPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsPhase::Read => write!(f, "read"),
            FsPhase::Backup => write!(f, "backup"),
            FsPhase::Write => write!(f, "write"),
            FsPhase::Enumerate => write!(f, "enumerate"),
        }
    }
}

/// Unified error type for all scribe operations
#[derive(Error, Debug)]
pub enum ScribeError {
    // Fatal before any work starts
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Too many files in {}: found {found}, limit is {cap}", path.display())]
    FanOutLimit {
        path: PathBuf,
        found: usize,
        cap: usize,
    },

    // Model errors, recovered per file
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response format: {0}")]
    Format(String),

    #[error("Filesystem error during {phase} of {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        phase: FsPhase,
        #[source]
        source: std::io::Error,
    },

    // Version control
    #[error("Git command failed: {0}")]
    Vcs(String),

    // Live panel
    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("File watcher error: {0}")]
    Watch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScribeError {
    /// Wrap an I/O error with the path and phase it happened in
    pub fn fs(path: impl Into<PathBuf>, phase: FsPhase, source: std::io::Error) -> Self {
        ScribeError::Filesystem {
            path: path.into(),
            phase,
            source,
        }
    }

    /// Whether this error must stop the whole invocation rather than one file
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScribeError::Config(_) | ScribeError::InvalidInput(_) | ScribeError::FanOutLimit { .. }
        )
    }
}

/// Result type alias using ScribeError
pub type Result<T> = std::result::Result<T, ScribeError>;
