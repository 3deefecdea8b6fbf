//! Config file writing.

use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while writing a config file.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to create directory for {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write `contents` to `path`, replacing whatever was there.
///
/// Parent directories are created as needed. Existing content is truncated
/// without backup.
pub fn write_config(path: &Path, contents: &str) -> Result<(), WriteError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, contents).map_err(|source| WriteError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}
