//! Husky hook file appending.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory Husky keeps its hook scripts in.
pub const HUSKY_DIR: &str = ".husky";

/// Result of appending to a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// The command was appended.
    Appended,
    /// The hook file does not exist; nothing was done.
    Missing,
    /// The hook already runs this exact command.
    AlreadyPresent,
}

/// Errors that can occur when appending to a hook.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("failed to read hook {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write hook {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Append `command` as a new line of the hook at `path`.
pub fn append_hook(path: &Path, command: &str) -> Result<HookOutcome, HookError> {
    let existing = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HookOutcome::Missing),
        Err(source) => {
            return Err(HookError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if existing.lines().any(|line| line.trim_end() == command) {
        return Ok(HookOutcome::AlreadyPresent);
    }

    let updated = appended(&existing, command);
    fs::write(path, updated).map_err(|source| HookError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    make_executable(path).map_err(|source| HookError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(HookOutcome::Appended)
}

/// Hook content with `command` added on its own line.
fn appended(existing: &str, command: &str) -> String {
    let mut out = String::with_capacity(existing.len() + command.len() + 2);
    out.push_str(existing);
    if !existing.is_empty() && !existing.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(command);
    out.push('\n');
    out
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
