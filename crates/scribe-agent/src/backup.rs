//! Sibling backups taken before a file is overwritten
//!
//! Backups sit next to the original and are never removed by scribe.
//! Files are opened with `create_new`, so an existing backup is never
//! overwritten: fixed names skip the backup, timestamped names pick a free
//! `-N` suffix.

use chrono::{DateTime, Local};
use scribe_core::{BackupNaming, FsPhase, Result, ScribeError};
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Give up on timestamped names after this many collisions
const MAX_COLLISIONS: u32 = 1000;

/// Backup path for `path` under `naming`, before collision handling
pub fn backup_file_name(path: &Path, naming: BackupNaming, now: DateTime<Local>) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("backup"));

    match naming {
        BackupNaming::Fixed => name.push(".bak"),
        BackupNaming::Timestamped => {
            name.push(".");
            name.push(now.format("%Y%m%d%H%M%S%3f").to_string());
            name.push(".bak");
        }
    }

    path.with_file_name(name)
}

/// Write `content` to a new backup of `path`
///
/// Returns the backup path, or `None` when a fixed-name backup already
/// exists and was left in place.
pub fn create_backup(path: &Path, content: &[u8], naming: BackupNaming) -> Result<Option<PathBuf>> {
    let base = backup_file_name(path, naming, Local::now());

    match naming {
        BackupNaming::Fixed => match write_new(&base, content) {
            Ok(()) => {
                debug!("Backed up {} to {}", path.display(), base.display());
                Ok(Some(base))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                warn!(
                    "Backup {} already exists, skipping backup of {}",
                    base.display(),
                    path.display()
                );
                Ok(None)
            }
            Err(e) => Err(ScribeError::fs(&base, FsPhase::Backup, e)),
        },
        BackupNaming::Timestamped => {
            for attempt in 0..MAX_COLLISIONS {
                let candidate = if attempt == 0 {
                    base.clone()
                } else {
                    with_counter(&base, attempt)
                };

                match write_new(&candidate, content) {
                    Ok(()) => {
                        debug!("Backed up {} to {}", path.display(), candidate.display());
                        return Ok(Some(candidate));
                    }
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                    Err(e) => return Err(ScribeError::fs(&candidate, FsPhase::Backup, e)),
                }
            }

            Err(ScribeError::fs(
                &base,
                FsPhase::Backup,
                std::io::Error::new(ErrorKind::AlreadyExists, "no free backup name"),
            ))
        }
    }
}

/// `notes.txt.20240101120000123.bak` -> `notes.txt.20240101120000123-2.bak`
fn with_counter(base: &Path, counter: u32) -> PathBuf {
    let name = base
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(".bak").unwrap_or(&name);
    base.with_file_name(format!("{}-{}.bak", stem, counter))
}

fn write_new(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_fixed_name() {
        let name = backup_file_name(Path::new("dir/notes.txt"), BackupNaming::Fixed, fixed_time());
        assert_eq!(name, PathBuf::from("dir/notes.txt.bak"));
    }

    #[test]
    fn test_timestamped_name() {
        let name = backup_file_name(
            Path::new("dir/notes.txt"),
            BackupNaming::Timestamped,
            fixed_time(),
        );
        assert_eq!(name, PathBuf::from("dir/notes.txt.20240309140507000.bak"));
    }

    #[test]
    fn test_counter_suffix() {
        let counted = with_counter(Path::new("a/x.txt.20240309140507000.bak"), 3);
        assert_eq!(counted, PathBuf::from("a/x.txt.20240309140507000-3.bak"));
    }

    #[test]
    fn test_create_fixed_backup() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "original").unwrap();

        let backup = create_backup(&path, b"original", BackupNaming::Fixed)
            .unwrap()
            .unwrap();
        assert_eq!(backup, temp.path().join("notes.txt.bak"));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "original");
    }

    #[test]
    fn test_fixed_backup_collision_keeps_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "second").unwrap();
        fs::write(temp.path().join("notes.txt.bak"), "first").unwrap();

        let backup = create_backup(&path, b"second", BackupNaming::Fixed).unwrap();
        assert!(backup.is_none());
        assert_eq!(
            fs::read_to_string(temp.path().join("notes.txt.bak")).unwrap(),
            "first"
        );
    }

    #[test]
    fn test_timestamped_backups_never_collide() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "v1").unwrap();

        let first = create_backup(&path, b"v1", BackupNaming::Timestamped)
            .unwrap()
            .unwrap();
        let second = create_backup(&path, b"v2", BackupNaming::Timestamped)
            .unwrap()
            .unwrap();
        let third = create_backup(&path, b"v3", BackupNaming::Timestamped)
            .unwrap()
            .unwrap();

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_eq!(fs::read_to_string(&first).unwrap(), "v1");
        assert_eq!(fs::read_to_string(&second).unwrap(), "v2");
        assert_eq!(fs::read_to_string(&third).unwrap(), "v3");
    }

    #[test]
    fn test_backup_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gone").join("notes.txt");

        let err = create_backup(&path, b"x", BackupNaming::Fixed).unwrap_err();
        assert!(matches!(
            err,
            ScribeError::Filesystem {
                phase: FsPhase::Backup,
                ..
            }
        ));
    }
}
