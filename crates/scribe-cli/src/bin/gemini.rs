//! gemini - send one prompt and print the answer
//!
//! Usage:
//!   gemini <prompt words...> [-rt|--response-type file|files|cmd] [--debug]

use anyhow::Result;
use clap::Parser;
use scribe_agent::TextGenerator;
use scribe_cli::{build_client, init_logging, load_config, normalize_args, parse_response_type, report};
use scribe_core::ResponseType;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "gemini")]
#[command(version, about = "Gemini API Client")]
struct Cli {
    /// The prompt to send to Gemini
    #[arg(required = true, num_args = 1..)]
    prompt: Vec<String>,

    /// Response format type (file, files, cmd); `-rt` also works
    #[arg(long, value_parser = parse_response_type)]
    response_type: Option<ResponseType>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    if let Err(e) = init_logging(cli.debug) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => report(e),
    }
}

async fn run(cli: Cli) -> Result<String> {
    let config = load_config()?;
    let client = build_client(&config, cli.debug)?;

    let prompt = cli.prompt.join(" ");
    let text = client.generate(&prompt, cli.response_type).await?;
    Ok(text)
}
