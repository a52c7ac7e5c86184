//! # scribe-core
//!
//! Core types shared by the scribe tools.
//!
//! Scribe sends prompts to a Gemini text-generation endpoint and applies the
//! answers to local files (`ai`), to stdout (`gemini`) or to a live log
//! summary panel (`tailpal`).
//!
//! ## Contents
//!
//! - [`ScribeError`] - the error taxonomy every crate reports through
//! - [`ScribeConfig`] - optional `.scribe/config.toml` settings
//! - [`response`] - response types, prompt suffixes and reply cleanup
//! - [`fail_open`] - best-effort execution for non-critical probes

pub mod config;
mod error;
pub mod fail_open;
pub mod response;

pub use config::{BackupNaming, FilesConfig, ModelConfig, ScribeConfig, TailConfig};
pub use error::{FsPhase, Result, ScribeError};
pub use fail_open::fail_open;
pub use response::ResponseType;
