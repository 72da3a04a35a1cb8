//! Shell command execution.
//!
//! Every command runs through `/bin/sh -c` with stdin closed and both
//! output streams captured, so nothing a child prints reaches the
//! terminal or a `--json` stream.

use crate::error::{KitupError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Stdout followed by stderr, trimmed.
    pub fn combined_output(&self) -> String {
        let mut out = self.stdout.trim().to_string();
        let err = self.stderr.trim();
        if !err.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(err);
        }
        out
    }

    /// Last non-empty line of output, for one-line failure details.
    pub fn last_line(&self) -> Option<String> {
        self.combined_output()
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(String::from)
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Extra environment variables for the child.
    pub env: HashMap<String, String>,

    /// Replacement search path for the child (`PATH`).
    pub search_path: Option<Vec<PathBuf>>,
}

impl CommandOptions {
    /// Options resolving executables on `search_path`.
    pub fn on_path(search_path: &[PathBuf]) -> Self {
        Self {
            search_path: Some(search_path.to_vec()),
            ..Default::default()
        }
    }
}

/// Execute a command through `/bin/sh -c`.
///
/// A command that runs and exits non-zero is an `Ok` failure result; only a
/// command that cannot be spawned at all is an error.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    if let Some(search_path) = &options.search_path {
        if let Ok(joined) = std::env::join_paths(search_path) {
            cmd.env("PATH", joined);
        }
    }
    cmd.envs(&options.env);

    tracing::debug!("Executing: {}", command);

    let output = cmd.output().map_err(|_| KitupError::CommandFailed {
        command: command.to_string(),
        code: None,
    })?;

    let success = output.status.success();
    if !success {
        tracing::debug!(
            "Command exited with {:?} after {:?}: {}",
            output.status.code(),
            start.elapsed(),
            command
        );
    }

    Ok(CommandResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        success,
    })
}

/// Execute a command and return success/failure.
pub fn execute_check(command: &str, search_path: &[PathBuf], cwd: Option<&Path>) -> bool {
    let options = CommandOptions {
        cwd: cwd.map(|p| p.to_path_buf()),
        ..CommandOptions::on_path(search_path)
    };

    execute(command, &options)
        .map(|r| r.success)
        .unwrap_or(false)
}

/// Execute a command, turning a non-zero exit into [`KitupError::CommandFailed`].
pub fn execute_required(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let result = execute(command, options)?;
    if result.success {
        Ok(result)
    } else {
        Err(KitupError::CommandFailed {
            command: command.to_string(),
            code: result.exit_code,
        })
    }
}
