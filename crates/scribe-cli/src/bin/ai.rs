//! ai - rewrite a file, or every file in a directory, from an instruction
//!
//! Usage:
//!   ai <path> <instruction> [--debug]

use anyhow::Result;
use clap::Parser;
use scribe_agent::{DirectoryWalker, FileMutator};
use scribe_cli::{build_client, exit_code, init_logging, load_config, report};
use scribe_vcs::GitProbe;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "ai")]
#[command(version, about = "Process files with AI modifications")]
struct Cli {
    /// Path to file or directory to process
    path: PathBuf,

    /// Instructions for changes to make to the file(s)
    instruction: String,

    /// Maximum number of files in a directory run (overrides config)
    #[arg(long)]
    max_files: Option<usize>,

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

    match run(cli).await {
        Ok(ok) => exit_code(ok),
        Err(e) => report(e),
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let config = load_config()?;
    let client = build_client(&config, cli.debug)?;

    let mutator =
        FileMutator::new(client, GitProbe::system()).with_backup_naming(config.files.backup);
    let walker = DirectoryWalker::new(mutator)
        .with_max_files(cli.max_files.unwrap_or(config.files.max_files));

    let ok = walker.process_entry(&cli.path, &cli.instruction).await?;
    if ok {
        info!("All files processed successfully");
    } else {
        error!("Some files could not be processed");
    }
    Ok(ok)
}
