//! Browsable item records.

use std::fmt;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Normalize a path for use as an item identity.
///
/// Trailing separators and `.` segments are dropped; a bare root such as
/// `/` or `C:\` keeps its separator.
pub fn normalize_path(path: &Path) -> PathBuf {
    let normalized: PathBuf = path.components().collect();
    if normalized.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        normalized
    }
}

/// Stable identity of an item: its normalized full path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(PathBuf);

impl ItemId {
    /// Create an id from a path, normalizing it.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(normalize_path(path.as_ref()))
    }

    /// Borrow the underlying path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Consume the id and return the path.
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl From<&Path> for ItemId {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for ItemId {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl AsRef<Path> for ItemId {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Type of browsable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Regular file.
    File,
    /// Directory inside a browsed folder.
    Directory,
    /// Top-level root (drive letter or mount point).
    Drive,
    /// Result of an external query.
    SearchHit {
        /// Whether the hit is a directory.
        is_dir: bool,
    },
}

impl ItemKind {
    /// Check if this kind can be entered like a folder.
    pub fn is_dir(&self) -> bool {
        matches!(
            self,
            ItemKind::Directory | ItemKind::Drive | ItemKind::SearchHit { is_dir: true }
        )
    }

    /// Check if this kind is a plain file.
    pub fn is_file(&self) -> bool {
        !self.is_dir()
    }

    /// Whether the entity may be moved or copied by drag and drop.
    ///
    /// Roots can only be linked to.
    pub fn is_relocatable(&self) -> bool {
        !matches!(self, ItemKind::Drive)
    }
}

/// One browsable entity in a session's item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Identity (normalized full path).
    pub id: ItemId,

    /// Name shown to the user (file name, or full path for roots).
    pub display_name: CompactString,

    /// Entity type.
    pub kind: ItemKind,

    /// Size in bytes; `None` for folders or when unknown.
    pub size: Option<u64>,

    /// Last modification time, if the platform reports it.
    pub modified: Option<SystemTime>,

    /// Whether this is a folder without entries.
    pub is_empty_folder: bool,
}

impl ItemRecord {
    /// Create a file record.
    pub fn file(path: impl AsRef<Path>, size: u64, modified: Option<SystemTime>) -> Self {
        let id = ItemId::new(path);
        Self {
            display_name: display_name_of(id.as_path()),
            id,
            kind: ItemKind::File,
            size: Some(size),
            modified,
            is_empty_folder: false,
        }
    }

    /// Create a directory record.
    pub fn directory(
        path: impl AsRef<Path>,
        modified: Option<SystemTime>,
        is_empty_folder: bool,
    ) -> Self {
        let id = ItemId::new(path);
        Self {
            display_name: display_name_of(id.as_path()),
            id,
            kind: ItemKind::Directory,
            size: None,
            modified,
            is_empty_folder,
        }
    }

    /// Create a root (drive) record.
    pub fn drive(path: impl AsRef<Path>) -> Self {
        let id = ItemId::new(path);
        Self {
            display_name: display_name_of(id.as_path()),
            id,
            kind: ItemKind::Drive,
            size: None,
            modified: None,
            is_empty_folder: false,
        }
    }

    /// Build a record for an existing path by reading its metadata.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;
        Ok(Self::from_metadata(path, &metadata))
    }

    /// Build a record from already-fetched metadata.
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Self {
        if metadata.is_dir() {
            Self::directory(path, metadata.modified().ok(), dir_is_empty(path))
        } else {
            Self::file(path, metadata.len(), metadata.modified().ok())
        }
    }

    /// Build a search-hit record for an existing path.
    pub fn search_hit(path: impl AsRef<Path>) -> io::Result<Self> {
        let mut record = Self::from_path(path)?;
        record.kind = ItemKind::SearchHit {
            is_dir: record.kind.is_dir(),
        };
        Ok(record)
    }

    /// Full path of the item.
    pub fn path(&self) -> &Path {
        self.id.as_path()
    }

    /// Check if this item is a folder-like entity.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Re-read the refreshable fields (size, modified time, empty-folder flag)
    /// in place. Identity, name and position are untouched.
    pub fn refresh(&mut self) -> io::Result<()> {
        let metadata = fs::metadata(self.id.as_path())?;
        self.modified = metadata.modified().ok();
        if metadata.is_dir() {
            self.size = None;
            self.is_empty_folder = dir_is_empty(self.id.as_path());
        } else {
            self.size = Some(metadata.len());
            self.is_empty_folder = false;
        }
        Ok(())
    }
}

fn display_name_of(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into(),
        None => path.display().to_string().into(),
    }
}

fn dir_is_empty(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
