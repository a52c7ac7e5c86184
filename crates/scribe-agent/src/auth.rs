//! API key lookup for the Gemini API
//!
//! The key comes from a single environment variable (`GEMINI_API_KEY` unless
//! configured otherwise). A missing or empty key is a configuration error
//! raised before any request is built.

use scribe_core::{Result, ScribeError};
use std::env;

/// Read the API key from the environment variable `var`
pub fn get_api_key(var: &str) -> Result<String> {
    match env::var(var) {
        Ok(key) if !key.trim().is_empty() => {
            tracing::debug!("Using API key from {}", var);
            Ok(key)
        }
        Ok(_) => Err(ScribeError::Config(format!(
            "{} environment variable is empty",
            var
        ))),
        Err(_) => Err(ScribeError::Config(format!(
            "{} environment variable not set",
            var
        ))),
    }
}
