//! Directory fan-out for the file mutator

use scribe_core::{FsPhase, Result, ScribeError};
use scribe_vcs::VersionControlProbe;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::client::TextGenerator;
use crate::file_mutator::FileMutator;

/// Most regular files a single directory run may touch
pub const DEFAULT_MAX_FILES: usize = 10;

/// Regular files under `dir`, depth first, siblings sorted by name
///
/// Symlinks are not followed and are not counted.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
            ScribeError::fs(path, FsPhase::Enumerate, e.into())
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Applies a [`FileMutator`] to a file or to every file in a directory
#[derive(Debug)]
pub struct DirectoryWalker<G, P> {
    mutator: FileMutator<G, P>,
    max_files: usize,
}

impl<G: TextGenerator, P: VersionControlProbe> DirectoryWalker<G, P> {
    pub fn new(mutator: FileMutator<G, P>) -> Self {
        Self {
            mutator,
            max_files: DEFAULT_MAX_FILES,
        }
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn mutator(&self) -> &FileMutator<G, P> {
        &self.mutator
    }

    /// Process `path` with `instruction`
    ///
    /// Returns `Ok(true)` only if every file succeeded. Errors are fatal:
    /// a path that is neither file nor directory, or a directory over the
    /// file cap. Nothing is written in either case.
    pub async fn process_entry(&self, path: &Path, instruction: &str) -> Result<bool> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            ScribeError::InvalidInput(format!("{}: {}", path.display(), e))
        })?;

        if metadata.is_file() {
            return Ok(self.mutator.process_file(path, instruction).await);
        }

        if !metadata.is_dir() {
            return Err(ScribeError::InvalidInput(format!(
                "{} is neither a file nor a directory",
                path.display()
            )));
        }

        let files = collect_files(path)?;
        if files.len() > self.max_files {
            return Err(ScribeError::FanOutLimit {
                path: path.to_path_buf(),
                found: files.len(),
                cap: self.max_files,
            });
        }

        if files.is_empty() {
            warn!("No files found in {}", path.display());
            return Ok(true);
        }

        info!("Processing {} files in {}", files.len(), path.display());

        let mut all_ok = true;
        for file in &files {
            // every file is attempted even after a failure
            let ok = self.mutator.process_file(file, instruction).await;
            all_ok &= ok;
        }

        Ok(all_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockGenerator;
    use scribe_vcs::{GitOutput, GitProbe, MockGitExecutor};
    use std::fs;
    use tempfile::TempDir;

    fn walker(generator: MockGenerator) -> DirectoryWalker<MockGenerator, GitProbe<MockGitExecutor>> {
        // every git call errors, so every file is treated as untracked
        let probe = GitProbe::new(MockGitExecutor::new());
        DirectoryWalker::new(FileMutator::new(generator, probe))
    }

    #[test]
    fn test_collect_files_sorted_and_recursive() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::write(temp.path().join("sub").join("c.txt"), "c").unwrap();

        let files = collect_files(temp.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("sub").join("c.txt"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_files_skips_symlinks() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("real.txt"), "x").unwrap();
        std::os::unix::fs::symlink(temp.path().join("real.txt"), temp.path().join("link.txt"))
            .unwrap();

        let files = collect_files(temp.path()).unwrap();
        assert_eq!(files, vec![temp.path().join("real.txt")]);
    }

    #[tokio::test]
    async fn test_cap_counts_nested_files() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        for i in 0..2 {
            fs::write(temp.path().join(format!("top{}.txt", i)), "x").unwrap();
            fs::write(temp.path().join("nested").join(format!("n{}.txt", i)), "x").unwrap();
        }

        let walker = walker(MockGenerator::replying("y")).with_max_files(3);
        let err = walker.process_entry(temp.path(), "edit").await.unwrap_err();

        assert!(matches!(err, ScribeError::FanOutLimit { found: 4, cap: 3, .. }));
        assert_eq!(walker.mutator().generator().call_count(), 0);
    }

    #[tokio::test]
    async fn test_single_file_entry() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("one.txt");
        fs::write(&path, "old").unwrap();

        let walker = walker(MockGenerator::replying("new"));
        assert!(walker.process_entry(&path, "edit").await.unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_empty_directory_succeeds() {
        let temp = TempDir::new().unwrap();
        let walker = walker(MockGenerator::replying("new"));
        assert!(walker.process_entry(temp.path(), "edit").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_path_is_invalid_input() {
        let temp = TempDir::new().unwrap();
        let walker = walker(MockGenerator::replying("new"));

        let err = walker
            .process_entry(&temp.path().join("missing"), "edit")
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::InvalidInput(_)));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_clean_probe_via_mock_git() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tracked.txt");
        fs::write(&path, "old").unwrap();

        let probe = GitProbe::new(
            MockGitExecutor::new()
                .with_response("ls-files --error-unmatch -- tracked.txt", GitOutput::ok("tracked.txt\n"))
                .with_response("status --porcelain -- tracked.txt", GitOutput::ok("")),
        );
        let walker = DirectoryWalker::new(FileMutator::new(MockGenerator::replying("new"), probe));

        assert!(walker.process_entry(&path, "edit").await.unwrap());
        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1);
    }
}
