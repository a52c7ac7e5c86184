//! Shared startup for the scribe binaries
//!
//! Each binary parses its own arguments, then goes through the same steps:
//! install logging, load `.scribe/config.toml`, and build a Gemini client.
//! Any failure here happens before a request is sent or a file is touched.

use anyhow::{Context, Result};
use scribe_agent::GeminiClient;
use scribe_core::{ResponseType, ScribeConfig, ScribeError};
use std::ffi::OsString;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the stderr log subscriber; `--debug` lowers the level to DEBUG
pub fn init_logging(debug: bool) -> Result<()> {
    let level = if debug { Level::DEBUG } else { Level::INFO };

    // stdout is reserved for command output and the panel
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Load configuration from the current directory
pub fn load_config() -> Result<ScribeConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let config = ScribeConfig::load_or_default(&cwd)?;
    Ok(config)
}

/// Build the Gemini client, failing fast when the API key is missing
pub fn build_client(config: &ScribeConfig, debug: bool) -> Result<GeminiClient> {
    let client = GeminiClient::from_config(&config.model)?.with_debug(debug);
    tracing::debug!("Using endpoint {}", client.endpoint());
    Ok(client)
}

/// Accept the two-letter `-rt` spelling of `--response-type`
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-rt") => OsString::from("--response-type"),
            Some(s) if s.starts_with("-rt=") => {
                OsString::from(format!("--response-type={}", &s["-rt=".len()..]))
            }
            _ => arg,
        })
        .collect()
}

/// Clap value parser for response types
pub fn parse_response_type(value: &str) -> std::result::Result<ResponseType, String> {
    value.parse().map_err(|e: ScribeError| e.to_string())
}

/// Log a startup failure and map it to exit code 1
pub fn report(err: anyhow::Error) -> ExitCode {
    tracing::error!("{:#}", err);
    ExitCode::FAILURE
}

pub fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
