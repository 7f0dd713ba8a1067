//! Filesystem operations used by the materializer and the file commands.
//!
//! Every operation reports failures as an [`ActionFailure`] so callers can
//! log and carry on instead of aborting.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::data::ActionFailure;

/// Recursive, idempotent directory creation.
pub fn create_dir(path: &Path) -> Result<(), ActionFailure> {
    if path.as_os_str().is_empty() {
        return Err(ActionFailure::InvalidPath {
            path: path.to_path_buf(),
            reason: "empty path".to_string(),
        });
    }
    make_dirs(path)
}

/// `create_dir_all` reports a plain file in the way as `AlreadyExists`.
fn make_dirs(path: &Path) -> Result<(), ActionFailure> {
    fs::create_dir_all(path).map_err(|e| {
        let blocked = matches!(
            e.kind(),
            std::io::ErrorKind::AlreadyExists | std::io::ErrorKind::NotADirectory
        );
        if blocked && !path.is_dir() {
            ActionFailure::InvalidPath {
                path: path.to_path_buf(),
                reason: "not a directory".to_string(),
            }
        } else {
            ActionFailure::from_io(path, e)
        }
    })
}

/// Writes `content` to `path`, creating parent directories as needed.
///
/// With `overwrite` unset an existing file is left alone and reported as
/// [`ActionFailure::AlreadyExists`].
pub fn create_file(path: &Path, content: &str, overwrite: bool) -> Result<(), ActionFailure> {
    if path.file_name().is_none() {
        return Err(ActionFailure::InvalidPath {
            path: path.to_path_buf(),
            reason: "no file name".to_string(),
        });
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            make_dirs(parent)?;
        }
    }

    if overwrite {
        return fs::write(path, content).map_err(|e| ActionFailure::from_io(path, e));
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| ActionFailure::from_io(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| ActionFailure::from_io(path, e))
}

/// Replaces or appends to an existing file. Appending inserts a newline
/// before the new content.
pub fn edit_file(path: &Path, content: &str, append: bool) -> Result<(), ActionFailure> {
    if !path.is_file() {
        return Err(ActionFailure::InvalidPath {
            path: path.to_path_buf(),
            reason: "file does not exist".to_string(),
        });
    }

    if append {
        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|e| ActionFailure::from_io(path, e))?;
        file.write_all(format!("\n{}", content).as_bytes())
            .map_err(|e| ActionFailure::from_io(path, e))
    } else {
        fs::write(path, content).map_err(|e| ActionFailure::from_io(path, e))
    }
}

pub fn read_file(path: &Path) -> Result<String, ActionFailure> {
    fs::read_to_string(path).map_err(|e| ActionFailure::from_io(path, e))
}

pub fn delete_file(path: &Path) -> Result<(), ActionFailure> {
    fs::remove_file(path).map_err(|e| ActionFailure::from_io(path, e))
}

/// Files under `dir`, recursively, as sorted paths relative to `dir`.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ActionFailure> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            match e.into_io_error() {
                Some(io_err) => ActionFailure::from_io(&path, io_err),
                None => ActionFailure::InvalidPath {
                    path,
                    reason: "filesystem loop".to_string(),
                },
            }
        })?;
        if entry.file_type().is_file() {
            if let Ok(relative) = entry.path().strip_prefix(dir) {
                files.push(relative.to_path_buf());
            }
        }
    }
    files.sort();
    Ok(files)
}
