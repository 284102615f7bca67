//! Filesystem operations
//!
//! Handles directory removal and accounting for artifacts the
//! provisioner owns.

use std::path::Path;

use crate::error::FilesystemError;

/// Remove a directory and all its contents.
///
/// Returns `true` if the directory existed and was removed, `false` if
/// there was nothing to remove.
pub fn remove_dir_all(path: &Path) -> Result<bool, FilesystemError> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(true)
}

/// Total size in bytes of all files under a directory.
pub fn dir_size(path: &Path) -> u64 {
    if !path.exists() {
        return 0;
    }

    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}
