//! Version-control probe used by the backup policy
//!
//! The probe answers one question for a file: is it tracked, and if so does
//! it have uncommitted changes? Both git calls fail open. If git is missing,
//! the file lives outside a repository, or anything else goes wrong, the
//! answer leans toward taking a backup.

use async_trait::async_trait;
use scribe_core::{fail_open, Result, ScribeError};
use std::path::Path;
use tracing::debug;

use crate::command::{GitCommand, GitExecutor};

/// Version-control state of a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingStatus {
    /// Not tracked, or tracking could not be determined
    Untracked,
    /// Tracked with no local modifications
    Clean,
    /// Tracked with uncommitted modifications, or unknown modifications
    Dirty,
}

impl TrackingStatus {
    /// Only a clean tracked file can be recovered from version control
    pub fn needs_backup(&self) -> bool {
        !matches!(self, TrackingStatus::Clean)
    }
}

/// Capability that reports the version-control state of a file
#[async_trait]
pub trait VersionControlProbe: Send + Sync {
    /// Never fails; an unknown state is reported as one needing a backup
    async fn status(&self, path: &Path) -> TrackingStatus;
}

/// Probe backed by the git command line
#[derive(Debug, Clone)]
pub struct GitProbe<E: GitExecutor> {
    executor: E,
}

impl GitProbe<GitCommand> {
    /// Probe running `git` from `PATH`
    pub fn system() -> Self {
        Self::new(GitCommand::new())
    }
}

impl<E: GitExecutor> GitProbe<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    async fn is_tracked(&self, cwd: &Path, name: &str) -> Result<bool> {
        let output = self
            .executor
            .exec(cwd, &["ls-files", "--error-unmatch", "--", name])
            .await?;
        Ok(output.success)
    }

    async fn has_changes(&self, cwd: &Path, name: &str) -> Result<bool> {
        let output = self
            .executor
            .exec(cwd, &["status", "--porcelain", "--", name])
            .await?;

        if !output.success {
            return Err(ScribeError::Vcs(format!(
                "git status failed: {}",
                output.stderr.trim()
            )));
        }

        Ok(!output.stdout.trim().is_empty())
    }
}

#[async_trait]
impl<E: GitExecutor> VersionControlProbe for GitProbe<E> {
    async fn status(&self, path: &Path) -> TrackingStatus {
        // git runs from the file's directory so relative paths resolve the same way
        let cwd = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            debug!("Cannot pass {} to git, assuming untracked", path.display());
            return TrackingStatus::Untracked;
        };

        let tracked = fail_open("git ls-files", || self.is_tracked(cwd, name))
            .await
            .unwrap_or(false);
        if !tracked {
            debug!("{} is not tracked", path.display());
            return TrackingStatus::Untracked;
        }

        let dirty = fail_open("git status", || self.has_changes(cwd, name))
            .await
            .unwrap_or(true);

        let status = if dirty {
            TrackingStatus::Dirty
        } else {
            TrackingStatus::Clean
        };
        debug!("{} is {:?}", path.display(), status);
        status
    }
}
