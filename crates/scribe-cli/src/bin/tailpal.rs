//! tailpal - live, in-character summaries of a growing log file
//!
//! Usage:
//!   tailpal <log_file> [--interval <secs>] [--persona <text>] [--debug]

use anyhow::Result;
use clap::Parser;
use scribe_cli::{build_client, init_logging, load_config, report};
use scribe_tail::TailOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "tailpal")]
#[command(version, about = "Summarize new log lines as they arrive")]
struct Cli {
    /// Path to the log file to monitor
    log_file: PathBuf,

    /// Interval in seconds between log summaries [default: 5]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Persona to use for the log summary [default: a concise systems analyst]
    #[arg(long)]
    persona: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.debug) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    if !cli.log_file.is_file() {
        tracing::error!("Log file does not exist: {}", cli.log_file.display());
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => {
            println!("Shutting down...");
            ExitCode::SUCCESS
        }
        Err(e) => report(e),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config()?;
    let client = build_client(&config, cli.debug)?;

    let options = TailOptions {
        path: cli.log_file,
        interval: Duration::from_secs(cli.interval.unwrap_or(config.tail.interval_secs)),
        persona: cli.persona.unwrap_or(config.tail.persona),
    };

    scribe_tail::run(&client, options).await?;
    Ok(())
}
