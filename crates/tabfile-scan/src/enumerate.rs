//! Single-level directory enumeration.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use tabfile_core::{ItemRecord, SessionConfig, SessionError, normalize_path};

/// Why an enumeration produced no items.
#[derive(Debug, Error)]
pub enum EnumerateError {
    /// The token was cancelled before enumeration finished.
    #[error("Enumeration cancelled")]
    Cancelled,

    /// The directory could not be read.
    #[error(transparent)]
    Failed(#[from] SessionError),
}

/// Check that `path` names an existing directory and return it normalized.
pub fn validate_directory(path: &Path) -> Result<PathBuf, SessionError> {
    let path = normalize_path(path);
    let metadata = fs::metadata(&path).map_err(|e| SessionError::io(&path, e))?;
    if !metadata.is_dir() {
        return Err(SessionError::Validation { path });
    }
    Ok(path)
}

/// List the direct children of `path`: folders first, then files, each group
/// ordered case-insensitively by name.
///
/// Blocking. The token is checked once per `config.enumeration_batch`
/// entries; a cancelled run returns [`EnumerateError::Cancelled`] and nothing
/// else. Entries whose metadata cannot be read are skipped.
pub fn enumerate_directory(
    path: &Path,
    config: &SessionConfig,
    cancel: &CancellationToken,
) -> Result<Vec<ItemRecord>, EnumerateError> {
    let root = validate_directory(path)?;
    let reader = fs::read_dir(&root).map_err(|e| SessionError::io(&root, e))?;

    let batch = config.enumeration_batch.max(1);
    let mut directories = Vec::new();
    let mut files = Vec::new();

    for (seen, entry_result) in reader.enumerate() {
        if seen % batch == 0 && cancel.is_cancelled() {
            return Err(EnumerateError::Cancelled);
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!(path = %root.display(), error = %err, "Skipping unreadable entry");
                continue;
            }
        };

        let file_name = entry.file_name();
        if config.should_skip_hidden(&file_name.to_string_lossy()) {
            continue;
        }

        // Follow symlinks so linked folders list with the folders
        let entry_path = entry.path();
        let metadata = match fs::metadata(&entry_path) {
            Ok(m) => m,
            Err(err) => {
                tracing::debug!(path = %entry_path.display(), error = %err, "Skipping entry without metadata");
                continue;
            }
        };

        let record = ItemRecord::from_metadata(&entry_path, &metadata);
        if record.is_dir() {
            directories.push(record);
        } else {
            files.push(record);
        }
    }

    if cancel.is_cancelled() {
        return Err(EnumerateError::Cancelled);
    }

    sort_by_name(&mut directories);
    sort_by_name(&mut files);
    directories.append(&mut files);

    tracing::trace!(path = %root.display(), count = directories.len(), "Enumerated directory");
    Ok(directories)
}

fn sort_by_name(records: &mut [ItemRecord]) {
    records.sort_by_cached_key(|r| r.display_name.to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_directory_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "x").unwrap();

        assert!(validate_directory(dir.path()).is_ok());
        assert!(matches!(
            validate_directory(&file),
            Err(SessionError::Validation { .. })
        ));
        assert!(matches!(
            validate_directory(&dir.path().join("missing")),
            Err(SessionError::Validation { .. })
        ));
    }

    #[test]
    fn test_cancelled_before_start() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), "").unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let result = enumerate_directory(dir.path(), &SessionConfig::default(), &token);
        assert!(matches!(result, Err(EnumerateError::Cancelled)));
    }

    #[test]
    fn test_hidden_entries_skipped_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::write(dir.path().join("shown"), "").unwrap();

        let mut config = SessionConfig::default();
        config.include_hidden = false;
        let items = enumerate_directory(dir.path(), &config, &CancellationToken::new()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].display_name.as_str(), "shown");
    }
}
