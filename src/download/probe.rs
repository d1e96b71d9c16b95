//! Existence probe for the destination directory.
//!
//! Answers one question: does a non-directory entry with the exact target
//! name exist directly inside the destination directory? No recursion, no
//! pattern matching, no side effects.

use std::path::Path;

use tracing::debug;

use super::error::DownloadError;

/// Returns whether `file_name` exists as a non-directory entry directly
/// inside `dir`.
///
/// A subdirectory with the same name does not count as a match.
///
/// # Errors
///
/// Returns [`DownloadError::DirectoryAccess`] when the directory cannot be
/// opened or its entries cannot be listed.
pub async fn file_exists(file_name: &str, dir: &Path) -> Result<bool, DownloadError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| DownloadError::directory_access(dir, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DownloadError::directory_access(dir, e))?
    {
        if entry.file_name() != file_name {
            continue;
        }
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| DownloadError::directory_access(dir, e))?;
        if file_type.is_dir() {
            continue;
        }
        debug!(file = %file_name, dir = %dir.display(), "found existing partial file");
        return Ok(true);
    }

    Ok(false)
}
