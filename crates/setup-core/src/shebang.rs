//! Interpreter line insertion for shell scripts.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &[".git", "node_modules"];

/// Errors for a single script or the walk itself.
#[derive(Debug, thiserror::Error)]
pub enum ShebangError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Which files were updated and which could not be processed.
#[derive(Debug, Default)]
pub struct ShebangReport {
    pub changed: Vec<PathBuf>,
    pub errors: Vec<ShebangError>,
}

/// Shebang expected for a script, by file extension.
pub fn shebang_for(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()? {
        "sh" => Some("#!/bin/bash"),
        "ps1" => Some("#!/usr/bin/env pwsh"),
        _ => None,
    }
}

/// `content` with `shebang` prepended, or `None` if its first line already
/// is the shebang.
pub fn with_shebang(content: &str, shebang: &str) -> Option<String> {
    let first = content.lines().next().unwrap_or("");
    if first == shebang {
        return None;
    }
    Some(format!("{shebang}\n{content}"))
}

/// Add the missing shebang to every `.sh` and `.ps1` file under `root`.
///
/// Failures are collected per file and the walk continues. With `dry_run`
/// the files that would change are reported but not written.
pub fn insert_shebangs(root: &Path, dry_run: bool) -> ShebangReport {
    let mut report = ShebangReport::default();

    let walker = WalkDir::new(root).into_iter().filter_entry(|e| !is_skipped(e));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.errors.push(e.into());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(shebang) = shebang_for(entry.path()) else {
            continue;
        };

        match update_file(entry.path(), shebang, dry_run) {
            Ok(true) => report.changed.push(entry.into_path()),
            Ok(false) => {}
            Err(e) => report.errors.push(e),
        }
    }

    report
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}

/// Rewrite one file in place. Writing to the existing file keeps its mode.
fn update_file(path: &Path, shebang: &str, dry_run: bool) -> Result<bool, ShebangError> {
    let content = fs::read_to_string(path).map_err(|source| ShebangError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let Some(updated) = with_shebang(&content, shebang) else {
        return Ok(false);
    };
    if dry_run {
        return Ok(true);
    }

    log::debug!("adding {shebang} to {}", path.display());
    fs::write(path, updated).map_err(|source| ShebangError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}
