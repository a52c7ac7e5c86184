//! Batching of new log lines into periodic summaries
//!
//! Lines accumulate until the interval since the last summary attempt has
//! passed. A failed attempt keeps the lines so the next attempt, one
//! interval later, covers them too.

use chrono::{DateTime, Local};
use scribe_agent::TextGenerator;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Prompt asking for a brief in-character summary of `lines`
pub fn persona_prompt(persona: &str, lines: &[String]) -> String {
    format!(
        "You are acting as {persona}. Analyze these new log entries and provide a summary:\n\
         \n\
         {}\n\
         \n\
         Respond conversationally in character as {persona}, but keep it brief (1-2 sentences).\n\
         Focus only on new activity, errors, or patterns seen in these specific log lines.",
        lines.join("\n")
    )
}

/// A summary produced by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub at: DateTime<Local>,
    pub text: String,
}

impl Summary {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            text: text.into(),
        }
    }

    /// `HH:MM:SS` of when the summary arrived
    pub fn timestamp(&self) -> String {
        self.at.format("%H:%M:%S").to_string()
    }
}

/// Pending lines plus the timer that gates summaries
#[derive(Debug)]
pub struct LogMonitor {
    persona: String,
    interval: Duration,
    buffer: Vec<String>,
    last_attempt: Option<Instant>,
}

impl LogMonitor {
    pub fn new(persona: impl Into<String>, interval: Duration) -> Self {
        Self {
            persona: persona.into(),
            interval,
            buffer: Vec::new(),
            last_attempt: None,
        }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Lines waiting for the next summary
    pub fn pending(&self) -> &[String] {
        &self.buffer
    }

    pub fn ingest(&mut self, lines: impl IntoIterator<Item = String>) {
        self.buffer.extend(lines);
    }

    /// A summary is due when lines are pending and the interval has passed
    ///
    /// Before the first attempt the interval counts as passed.
    pub fn is_due(&self, now: Instant) -> bool {
        if self.buffer.is_empty() {
            return false;
        }
        match self.last_attempt {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// When pending lines become due, or `None` while nothing is pending
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        if self.buffer.is_empty() {
            return None;
        }
        match self.last_attempt {
            Some(last) => Some((last + self.interval).max(now)),
            None => Some(now),
        }
    }

    /// Ask `generator` for a summary of the pending lines if one is due
    ///
    /// On success the buffer is cleared. Either way the timer restarts.
    pub async fn summarize_if_due<G: TextGenerator + ?Sized>(
        &mut self,
        generator: &G,
        now: Instant,
    ) -> Option<Summary> {
        if !self.is_due(now) {
            return None;
        }

        debug!("Summarizing {} new log lines", self.buffer.len());
        let prompt = persona_prompt(&self.persona, &self.buffer);
        self.last_attempt = Some(now);

        match generator.generate(&prompt, None).await {
            Ok(text) => {
                self.buffer.clear();
                Some(Summary::new(text))
            }
            Err(e) => {
                error!(
                    "Failed to generate summary, keeping {} lines for the next attempt: {}",
                    self.buffer.len(),
                    e
                );
                None
            }
        }
    }
}
