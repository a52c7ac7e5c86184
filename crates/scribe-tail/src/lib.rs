//! # scribe-tail
//!
//! Live log summarizer behind `tailpal`.
//!
//! Follows a growing text file, batches the new lines, and every interval
//! asks the model for a short in-character summary of just those lines.
//! The latest summary is shown in a small inline panel:
//!
//! ```text
//! ┌Log Monitor──────────────────────────────────────────────┐
//! │[14:05:07] Two timeouts against the cache, then recovery.│
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Architecture
//!
//! - [`LogTail`] reads complete new lines from the end of the file
//! - [`LogMonitor`] buffers them and decides when a summary is due
//! - [`FileWatcher`] wakes the loop when the file changes
//! - [`StatusPanel`] renders the latest summary
//! - [`run`] ties them together until Ctrl-C

mod monitor;
mod run;
mod tail;
mod terminal;
mod ui;
mod watch;

pub use monitor::{persona_prompt, LogMonitor, Summary};
pub use run::{follow, run, TailOptions, FALLBACK_TICK};
pub use tail::LogTail;
pub use ui::StatusPanel;
pub use watch::FileWatcher;
