//! Inline rename commit.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tabfile_core::{SessionError, SessionResult};

/// Characters no file name may contain on any supported platform.
const FORBIDDEN_CHARS: &[char] = &['/', '\0'];

/// Additional characters rejected on Windows.
#[cfg(windows)]
const WINDOWS_FORBIDDEN_CHARS: &[char] = &['\\', ':', '*', '?', '"', '<', '>', '|'];

#[cfg(windows)]
const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Check that `name` is usable as a single path segment.
pub fn validate_filename(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".into());
    }
    if name.len() > 255 {
        return Err("Name is too long (max 255 bytes)".into());
    }
    if name == "." || name == ".." {
        return Err("'.' and '..' are reserved names".into());
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(format!("Name cannot contain {c:?}"));
    }

    #[cfg(windows)]
    {
        if let Some(c) = name.chars().find(|c| WINDOWS_FORBIDDEN_CHARS.contains(c)) {
            return Err(format!("Name cannot contain {c:?}"));
        }
        let base = name.split('.').next().unwrap_or_default().to_uppercase();
        if WINDOWS_RESERVED.contains(&base.as_str()) {
            return Err(format!("{base} is a reserved name"));
        }
    }

    if name.starts_with(' ') || name.ends_with(' ') {
        return Err("Name cannot start or end with spaces".into());
    }
    if name.ends_with('.') {
        return Err("Name cannot end with a dot".into());
    }
    Ok(())
}

/// Byte range of `name` the rename editor pre-selects: the text before the
/// last `.`, or the whole name for folders, dotfiles and names without an
/// extension.
pub fn stem_range(name: &str, is_dir: bool) -> Range<usize> {
    if is_dir {
        return 0..name.len();
    }
    match name.rfind('.') {
        Some(dot) if dot > 0 => 0..dot,
        _ => 0..name.len(),
    }
}

/// Whether renaming `old_name` to `new_name` changes the extension.
pub fn extension_changed(old_name: &str, new_name: &str) -> bool {
    Path::new(old_name).extension() != Path::new(new_name).extension()
}

/// What committing a rename would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenamePlan {
    /// The name did not change.
    Unchanged,
    /// The extension changes and the user has not confirmed it yet.
    ConfirmExtensionChange {
        from: Option<String>,
        to: Option<String>,
    },
    /// Ready to move `source` to `target`.
    Rename { target: PathBuf },
}

/// Validate a proposed rename of `source` to `new_name` within the same
/// folder.
pub fn plan_rename(
    source: &Path,
    new_name: &str,
    extension_confirmed: bool,
) -> SessionResult<RenamePlan> {
    validate_filename(new_name).map_err(|msg| SessionError::rename(source, msg))?;

    let old_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| SessionError::rename(source, "Roots cannot be renamed"))?;

    if old_name == new_name {
        return Ok(RenamePlan::Unchanged);
    }

    if extension_changed(&old_name, new_name) && !extension_confirmed {
        let ext = |name: &str| {
            Path::new(name)
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
        };
        return Ok(RenamePlan::ConfirmExtensionChange {
            from: ext(&old_name),
            to: ext(new_name),
        });
    }

    let target = source
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(new_name);

    // A case-only change resolves to the source itself on case-insensitive
    // filesystems.
    let case_only = old_name.to_lowercase() == new_name.to_lowercase();
    if target.exists() && !case_only {
        return Err(SessionError::rename(
            source,
            format!("'{new_name}' already exists"),
        ));
    }

    Ok(RenamePlan::Rename { target })
}

/// Performs a planned rename.
pub trait RenameCommitter: Send + Sync {
    fn commit_rename(&self, source: &Path, target: &Path) -> SessionResult<()>;
}

/// [`RenameCommitter`] that renames on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRenamer;

impl RenameCommitter for FsRenamer {
    fn commit_rename(&self, source: &Path, target: &Path) -> SessionResult<()> {
        fs::rename(source, target)
            .map_err(|e| SessionError::rename(source, format!("Rename failed: {e}")))?;
        tracing::debug!(from = %source.display(), to = %target.display(), "Renamed item");
        Ok(())
    }
}
