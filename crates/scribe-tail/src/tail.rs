//! Incremental reader for a growing log file

use scribe_core::{FsPhase, Result, ScribeError};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Follows a file from its current end, yielding complete lines
#[derive(Debug)]
pub struct LogTail {
    path: PathBuf,
    file: File,
    position: u64,
    /// Bytes after the last newline, held until the line is finished
    partial: Vec<u8>,
}

impl LogTail {
    /// Open `path` positioned at its end; existing content is skipped
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| ScribeError::fs(path, FsPhase::Read, e))?;
        let position = file
            .seek(SeekFrom::End(0))
            .map_err(|e| ScribeError::fs(path, FsPhase::Read, e))?;

        debug!("Tailing {} from byte {}", path.display(), position);

        Ok(Self {
            path: path.to_path_buf(),
            file,
            position,
            partial: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Complete lines appended since the last call, trimmed
    ///
    /// Blank lines are dropped and invalid UTF-8 is replaced. If the file
    /// shrank, reading restarts from the beginning.
    pub fn read_new_lines(&mut self) -> Result<Vec<String>> {
        let len = self
            .file
            .metadata()
            .map_err(|e| ScribeError::fs(&self.path, FsPhase::Read, e))?
            .len();

        if len < self.position {
            info!("{} was truncated, reading from the start", self.path.display());
            self.position = 0;
            self.partial.clear();
        }

        if len == self.position {
            return Ok(Vec::new());
        }

        self.file
            .seek(SeekFrom::Start(self.position))
            .map_err(|e| ScribeError::fs(&self.path, FsPhase::Read, e))?;

        let mut chunk = Vec::new();
        let read = self
            .file
            .read_to_end(&mut chunk)
            .map_err(|e| ScribeError::fs(&self.path, FsPhase::Read, e))?;
        self.position += read as u64;
        self.partial.extend_from_slice(&chunk);

        let Some(last_newline) = self.partial.iter().rposition(|&b| b == b'\n') else {
            return Ok(Vec::new());
        };

        let rest = self.partial.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.partial, rest);

        Ok(complete
            .split(|&b| b == b'\n')
            .map(|line| String::from_utf8_lossy(line).trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }
}
