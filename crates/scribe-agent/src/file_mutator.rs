//! File Mutator - rewrites one file from a natural-language instruction
//!
//! The whole file travels in the prompt and the whole reply replaces it.
//! Before anything is written the backup policy must hold: unless git
//! reports the file as tracked and clean, the original bytes are copied to
//! a sibling backup first.

use scribe_core::{BackupNaming, FsPhase, ResponseType, Result, ScribeError};
use scribe_vcs::{TrackingStatus, VersionControlProbe};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::backup;
use crate::client::TextGenerator;

/// Build the edit prompt for `content` and `instruction`
pub fn edit_prompt(content: &str, instruction: &str) -> String {
    format!(
        "You are editing a file. Apply the following instruction to the file content below.\n\
         \n\
         Instruction: {instruction}\n\
         \n\
         Current file content:\n\
         ```\n\
         {content}\n\
         ```\n\
         \n\
         Make precise, minimal changes that satisfy the instruction. Preserve the \
         existing structure, formatting and everything the instruction does not ask \
         you to change. Return the complete updated file."
    )
}

/// Outcome of one successful file mutation
#[derive(Debug, Clone)]
pub struct MutationReport {
    pub path: PathBuf,
    /// Backup written before the overwrite, if any
    pub backup: Option<PathBuf>,
    pub status: TrackingStatus,
    /// False when the model returned the content unchanged and nothing was written
    pub changed: bool,
}

/// Applies model edits to single files under the backup policy
pub struct FileMutator<G, P> {
    generator: G,
    probe: P,
    backup: BackupNaming,
}

impl<G: TextGenerator, P: VersionControlProbe> FileMutator<G, P> {
    pub fn new(generator: G, probe: P) -> Self {
        Self {
            generator,
            probe,
            backup: BackupNaming::default(),
        }
    }

    pub fn with_backup_naming(mut self, naming: BackupNaming) -> Self {
        self.backup = naming;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Rewrite `path` according to `instruction`
    ///
    /// Errors are per file: nothing is written unless generation succeeded
    /// and the backup policy was satisfied.
    pub async fn mutate_file(&self, path: &Path, instruction: &str) -> Result<MutationReport> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ScribeError::fs(path, FsPhase::Read, e))?;
        if !metadata.is_file() {
            return Err(ScribeError::InvalidInput(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ScribeError::fs(path, FsPhase::Read, e))?;
        let content = std::str::from_utf8(&bytes).map_err(|e| {
            ScribeError::fs(
                path,
                FsPhase::Read,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;

        debug!("Read {} ({} bytes)", path.display(), bytes.len());

        let updated = self
            .generator
            .generate(&edit_prompt(content, instruction), Some(ResponseType::File))
            .await?;

        let status = self.probe.status(path).await;

        if updated == content {
            info!("No changes for {}", path.display());
            return Ok(MutationReport {
                path: path.to_path_buf(),
                backup: None,
                status,
                changed: false,
            });
        }

        let backup = if status.needs_backup() {
            backup::create_backup(path, &bytes, self.backup)?
        } else {
            debug!("{} is clean in git, skipping backup", path.display());
            None
        };

        tokio::fs::write(path, updated.as_bytes())
            .await
            .map_err(|e| ScribeError::fs(path, FsPhase::Write, e))?;

        Ok(MutationReport {
            path: path.to_path_buf(),
            backup,
            status,
            changed: true,
        })
    }

    /// Rewrite `path`, logging the outcome instead of returning errors
    pub async fn process_file(&self, path: &Path, instruction: &str) -> bool {
        info!("Processing {}", path.display());

        match self.mutate_file(path, instruction).await {
            Ok(report) => {
                match &report.backup {
                    Some(backup) => info!(
                        "Successfully processed {} (backup: {})",
                        path.display(),
                        backup.display()
                    ),
                    None => info!("Successfully processed {}", path.display()),
                }
                true
            }
            Err(e) => {
                error!(
                    "Failed to process file {} during {}: {}",
                    path.display(),
                    failure_phase(&e),
                    e
                );
                false
            }
        }
    }
}

fn failure_phase(err: &ScribeError) -> String {
    match err {
        ScribeError::Filesystem { phase, .. } => phase.to_string(),
        ScribeError::Transport(_) | ScribeError::Format(_) | ScribeError::Config(_) => {
            "generate".to_string()
        }
        _ => "read".to_string(),
    }
}

impl<G, P> std::fmt::Debug for FileMutator<G, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileMutator")
            .field("backup", &self.backup)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockGenerator;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    struct FixedProbe(TrackingStatus);

    #[async_trait]
    impl VersionControlProbe for FixedProbe {
        async fn status(&self, _path: &Path) -> TrackingStatus {
            self.0
        }
    }

    fn backups_in(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().ends_with(".bak"))
            .collect()
    }

    #[test]
    fn test_edit_prompt_embeds_content_and_instruction() {
        let prompt = edit_prompt("line one\nline two", "uppercase everything");
        assert!(prompt.contains("Instruction: uppercase everything"));
        assert!(prompt.contains("```\nline one\nline two\n```"));
        assert!(prompt.contains("minimal"));
    }

    #[tokio::test]
    async fn test_untracked_file_is_backed_up_then_written() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("greeting.txt");
        fs::write(&path, "hello").unwrap();

        let mutator = FileMutator::new(
            MockGenerator::replying("goodbye"),
            FixedProbe(TrackingStatus::Untracked),
        );
        let report = mutator.mutate_file(&path, "say goodbye").await.unwrap();

        assert!(report.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "goodbye");
        let backup = report.backup.unwrap();
        assert_eq!(fs::read_to_string(backup).unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_clean_file_is_not_backed_up() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("greeting.txt");
        fs::write(&path, "hello").unwrap();

        let mutator = FileMutator::new(
            MockGenerator::replying("goodbye"),
            FixedProbe(TrackingStatus::Clean),
        );
        let report = mutator.mutate_file(&path, "say goodbye").await.unwrap();

        assert!(report.backup.is_none());
        assert!(backups_in(temp.path()).is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "goodbye");
    }

    #[tokio::test]
    async fn test_generator_failure_leaves_file_alone() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("greeting.txt");
        fs::write(&path, "hello").unwrap();

        let mutator = FileMutator::new(
            MockGenerator::failing("connection reset"),
            FixedProbe(TrackingStatus::Dirty),
        );

        assert!(!mutator.process_file(&path, "say goodbye").await);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
        assert!(backups_in(temp.path()).is_empty());
    }

    #[tokio::test]
    async fn test_unchanged_reply_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("greeting.txt");
        fs::write(&path, "hello").unwrap();

        let mutator = FileMutator::new(
            MockGenerator::replying("hello"),
            FixedProbe(TrackingStatus::Dirty),
        );
        let report = mutator.mutate_file(&path, "leave it").await.unwrap();

        assert!(!report.changed);
        assert!(backups_in(temp.path()).is_empty());
    }

    #[tokio::test]
    async fn test_non_utf8_file_fails_on_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("blob.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let mutator = FileMutator::new(
            MockGenerator::replying("text"),
            FixedProbe(TrackingStatus::Untracked),
        );
        let err = mutator.mutate_file(&path, "edit").await.unwrap_err();

        assert!(matches!(
            err,
            ScribeError::Filesystem {
                phase: FsPhase::Read,
                ..
            }
        ));
        assert_eq!(mutator.generator().call_count(), 0);
    }

    #[tokio::test]
    async fn test_directory_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mutator = FileMutator::new(
            MockGenerator::replying("text"),
            FixedProbe(TrackingStatus::Untracked),
        );

        assert!(!mutator.process_file(temp.path(), "edit").await);
        assert_eq!(mutator.generator().call_count(), 0);
    }

    #[tokio::test]
    async fn test_requests_file_response_type() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.txt");
        fs::write(&path, "a").unwrap();

        let mutator = FileMutator::new(
            MockGenerator::new(|_, rt| {
                assert_eq!(rt, Some(ResponseType::File));
                Ok("b".to_string())
            }),
            FixedProbe(TrackingStatus::Untracked),
        );

        assert!(mutator.process_file(&path, "a to b").await);
    }

    #[test]
    fn test_failure_phase_labels() {
        assert_eq!(failure_phase(&ScribeError::Transport("x".into())), "generate");
        assert_eq!(
            failure_phase(&ScribeError::fs(
                "f",
                FsPhase::Write,
                std::io::Error::new(std::io::ErrorKind::Other, "x")
            )),
            "write"
        );
    }
}
