//! File-backed shell profile.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::backends::ShellProfile;
use crate::error::Result;

/// A shell profile file such as `~/.zprofile`.
///
/// Appends are idempotent: a line already present (ignoring surrounding
/// whitespace) is never written twice.
#[derive(Debug, Clone)]
pub struct FileProfile {
    path: PathBuf,
}

impl FileProfile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the profile file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Profile content; a missing file reads as empty. Bytes that are not
    /// UTF-8 are replaced so the remaining lines still compare.
    fn read(&self) -> io::Result<String> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }
}

fn has_line(content: &str, line: &str) -> bool {
    let wanted = line.trim();
    content.lines().any(|l| l.trim() == wanted)
}

impl ShellProfile for FileProfile {
    fn contains(&self, line: &str) -> bool {
        match self.read() {
            Ok(content) => has_line(&content, line),
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", self.path.display(), e);
                false
            }
        }
    }

    fn append(&self, line: &str) -> Result<()> {
        let existing = self.read()?;
        if has_line(&existing, line) {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if !existing.is_empty() && !existing.ends_with('\n') {
            writeln!(file)?;
        }
        writeln!(file, "{}", line.trim())?;

        tracing::debug!("Appended to {}: {}", self.path.display(), line.trim());
        Ok(())
    }
}
