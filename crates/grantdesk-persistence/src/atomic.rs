//! Atomic file operations for crash-safe persistence.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::{PersistenceError, Result};

/// Ensures the parent directory of `path` exists.
fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Writes `data` to a temp file next to `path` and flushes it.
fn stage(path: &Path, data: &[u8]) -> Result<NamedTempFile> {
    ensure_parent(path)?;

    // Same directory keeps the final rename on one filesystem
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut temp_file =
        NamedTempFile::new_in(dir).map_err(|source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    temp_file
        .write_all(data)
        .and_then(|_| temp_file.flush())
        .map_err(|source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(temp_file)
}

/// Writes data to a file atomically.
///
/// This function writes to a temporary file first, then renames it to the
/// target path. This ensures that the file is never in a partially written
/// state, even if the process crashes. An existing file is replaced.
///
/// # Errors
/// Returns an error if the write or rename fails.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let temp_file = stage(path, data)?;

    temp_file
        .persist(path)
        .map_err(|e| PersistenceError::Write {
            path: path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}

/// Creates a file atomically, failing if it already exists.
///
/// The content is staged in a temp file and linked into place without
/// clobbering. Of several concurrent writers targeting the same path, exactly
/// one succeeds; the rest get [`PersistenceError::PathExists`].
pub fn atomic_create(path: &Path, data: &[u8]) -> Result<()> {
    if path.exists() {
        return Err(PersistenceError::PathExists(path.to_path_buf()));
    }

    let temp_file = stage(path, data)?;

    match temp_file.persist_noclobber(path) {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
            Err(PersistenceError::PathExists(path.to_path_buf()))
        }
        Err(e) => Err(PersistenceError::Write {
            path: path.to_path_buf(),
            source: e.error,
        }),
    }
}

/// Writes JSON data to a file atomically.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())
}

/// Creates a JSON file atomically, failing if it already exists.
pub fn atomic_create_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_create(path, json.as_bytes())
}

/// Reads and deserializes JSON from a file.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_str(&data)?;
    Ok(value)
}

/// Reads JSON from a file, returning None if the file doesn't exist.
pub fn read_json_optional<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}

/// Reads every `*.json` file in a directory.
///
/// A missing directory yields an empty list. Files that fail to parse are
/// skipped with a warning so one corrupt record cannot hide the rest.
pub fn read_json_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|source| PersistenceError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut items = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PersistenceError::Read {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            match read_json::<T>(&path) {
                Ok(item) => items.push(item),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable record"),
            }
        }
    }

    Ok(items)
}

/// Lists the names of the subdirectories of `dir`.
pub fn list_subdirs(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|source| PersistenceError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PersistenceError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.path().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
