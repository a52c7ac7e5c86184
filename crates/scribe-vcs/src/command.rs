//! Git command execution abstraction

use async_trait::async_trait;
use scribe_core::{Result, ScribeError};
use std::collections::HashMap;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Output from a git command
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl GitOutput {
    /// A successful run printing `stdout`
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            success: true,
        }
    }

    /// A failed run printing `stderr`
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            success: false,
        }
    }
}

impl From<Output> for GitOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        }
    }
}

/// Trait for executing git commands (allows mocking in tests)
#[async_trait]
pub trait GitExecutor: Send + Sync {
    /// Execute git with the given arguments from inside `cwd`
    ///
    /// A non-zero exit is reported through [`GitOutput::success`]; `Err` means
    /// git could not be run at all.
    async fn exec(&self, cwd: &Path, args: &[&str]) -> Result<GitOutput>;
}

/// Real git command executor
#[derive(Debug, Clone)]
pub struct GitCommand {
    program: String,
}

impl GitCommand {
    /// Executor running `git` from `PATH`
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    /// Executor running a specific git binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitExecutor for GitCommand {
    #[instrument(skip(self, cwd), fields(cwd = %cwd.display()))]
    async fn exec(&self, cwd: &Path, args: &[&str]) -> Result<GitOutput> {
        debug!("Executing git {:?}", args);

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .output()
            .await
            .map_err(|e| ScribeError::Vcs(format!("Failed to execute {}: {}", self.program, e)))?;

        let git_output = GitOutput::from(output);

        if !git_output.success {
            debug!("git command failed: {}", git_output.stderr.trim());
        }

        Ok(git_output)
    }
}

/// Mock git executor for testing
///
/// Responses are keyed by the space-joined argument list; unknown commands
/// fail the way a missing git binary would.
#[derive(Debug, Clone, Default)]
pub struct MockGitExecutor {
    responses: HashMap<String, GitOutput>,
}

impl MockGitExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, command: &str, output: GitOutput) -> Self {
        self.responses.insert(command.to_string(), output);
        self
    }
}

#[async_trait]
impl GitExecutor for MockGitExecutor {
    async fn exec(&self, _cwd: &Path, args: &[&str]) -> Result<GitOutput> {
        let key = args.join(" ");
        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| ScribeError::Vcs(format!("No mock response for: {}", key)))
    }
}
