//! Folder scan.
//!
//! Lists the images directly inside one folder (no recursion), keeping only
//! regular files whose extension is in the configured set, compared
//! case-insensitively. Results are sorted by path so runs are reproducible.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Folder does not exist: {0}")]
    FolderNotFound(PathBuf),
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Check that `folder` exists and is a directory.
pub fn validate_folder(folder: &Path) -> Result<(), ScanError> {
    if !folder.exists() {
        return Err(ScanError::FolderNotFound(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(ScanError::NotADirectory(folder.to_path_buf()));
    }
    Ok(())
}

/// Whether `path` has one of `extensions` (lowercase, without the dot).
pub fn has_supported_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|ext| extensions.iter().any(|e| *e == ext))
}

/// Find the supported images directly inside `folder`.
pub fn find_images(folder: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ScanError> {
    validate_folder(folder)?;

    let mut images = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && has_supported_extension(&path, extensions) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}
