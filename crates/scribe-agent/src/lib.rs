//! # scribe-agent
//!
//! Gemini client and file mutation for scribe.
//!
//! This crate implements the request side and the write side of the tools:
//! - [`GeminiClient`] sends one prompt per call and returns cleaned text
//! - [`FileMutator`] rewrites a single file from an instruction, taking a
//!   backup first unless git already holds a clean copy
//! - [`DirectoryWalker`] applies the mutator to every file under a
//!   directory, refusing up front when there are too many
//!
//! ## Key Pattern
//!
//! Every model call is independent. Nothing is remembered between calls:
//! the file content and the instruction travel in each prompt.

mod auth;
mod backup;
mod client;
mod file_mutator;
mod types;
mod walker;

pub use auth::get_api_key;
pub use backup::{backup_file_name, create_backup};
pub use client::{GeminiClient, MockGenerator, TextGenerator};
pub use file_mutator::{edit_prompt, FileMutator, MutationReport};
pub use types::{GenerateRequest, GenerateResponse};
pub use walker::{collect_files, DirectoryWalker, DEFAULT_MAX_FILES};
