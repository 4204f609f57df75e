//! Navigation targets.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::item::normalize_path;

/// Text that stands for the virtual root listing.
pub const ROOT_SENTINEL: &str = "This computer";

/// Where a session is pointed: the virtual root listing or a directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// Top-level roots (drives, mount points).
    Roots,
    /// A directory path, normalized.
    Path(PathBuf),
}

impl Location {
    /// Parse user input. Blank text and the root sentinel mean [`Location::Roots`].
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == ROOT_SENTINEL {
            Self::Roots
        } else {
            Self::Path(normalize_path(Path::new(trimmed)))
        }
    }

    /// Create a location from a path; an empty path means the roots.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            Self::Roots
        } else {
            Self::Path(normalize_path(path))
        }
    }

    /// Check if this is the root listing.
    pub fn is_roots(&self) -> bool {
        matches!(self, Self::Roots)
    }

    /// The directory path, if any.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Roots => None,
            Self::Path(path) => Some(path),
        }
    }

    /// One level up.
    ///
    /// A root drive (or a path without separators) goes to the roots listing;
    /// the roots listing has no parent.
    pub fn parent(&self) -> Option<Location> {
        match self {
            Self::Roots => None,
            Self::Path(path) => match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => {
                    Some(Self::Path(parent.to_path_buf()))
                }
                _ => Some(Self::Roots),
            },
        }
    }

    /// Short label for tab headers: the last path segment, or the whole path
    /// for a bare root.
    pub fn header(&self) -> String {
        match self {
            Self::Roots => ROOT_SENTINEL.to_string(),
            Self::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Self::from_path(path)
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Self::from_path(path)
    }
}

impl From<&str> for Location {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Roots => f.write_str(ROOT_SENTINEL),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
