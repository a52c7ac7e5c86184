//! # scribe-vcs
//!
//! Git integration for scribe.
//!
//! This crate provides:
//! - Git command execution abstraction (real and scripted)
//! - The [`VersionControlProbe`] capability the backup policy asks
//!   "is this file safe to overwrite without a copy?"

mod command;
mod probe;

pub use command::{GitCommand, GitExecutor, GitOutput, MockGitExecutor};
pub use probe::{GitProbe, TrackingStatus, VersionControlProbe};
