//! Top-level roots: drives on Windows, mount points elsewhere.

use std::path::PathBuf;

use tabfile_core::ItemRecord;

/// List the roots shown by the virtual root location.
///
/// Every entry has kind [`Drive`](tabfile_core::ItemKind::Drive) and its
/// full path as display name. Missing candidates are skipped silently.
pub fn list_roots() -> Vec<ItemRecord> {
    let roots: Vec<ItemRecord> = candidate_roots()
        .into_iter()
        .filter(|p| p.is_dir())
        .map(ItemRecord::drive)
        .collect();
    tracing::trace!(count = roots.len(), "Listed roots");
    roots
}

#[cfg(windows)]
fn candidate_roots() -> Vec<PathBuf> {
    (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .collect()
}

#[cfg(not(windows))]
fn candidate_roots() -> Vec<PathBuf> {
    let mut roots = vec![PathBuf::from("/")];
    for mount_dir in ["/mnt", "/media", "/Volumes"] {
        let Ok(entries) = std::fs::read_dir(mount_dir) else {
            continue;
        };
        let mut mounts: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        mounts.sort();
        roots.extend(mounts);
    }
    roots
}
