//! Applying change notifications to a loaded item list.

use std::path::Path;

use tabfile_core::{ItemId, ItemRecord, SessionConfig};
use tabfile_scan::ChangeEvent;

use crate::selection::SelectionModel;

/// Effect of one change notification on the item list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    Added { index: usize, id: ItemId },
    Removed { index: usize, id: ItemId },
    Renamed { index: usize, from: ItemId, to: ItemId },
    Refreshed { index: usize },
}

/// Apply `event` for the directory `dir` to `items`, keeping `selection`
/// consistent in the same step.
///
/// Only direct children of `dir` are considered. Returns `None` when the
/// event did not change anything.
pub(crate) fn reconcile(
    items: &mut Vec<ItemRecord>,
    selection: &mut SelectionModel,
    dir: &Path,
    config: &SessionConfig,
    event: &ChangeEvent,
) -> Option<Reconciled> {
    match event {
        ChangeEvent::Created(path) => add(items, dir, config, path),
        ChangeEvent::Deleted(path) => remove(items, selection, path),
        ChangeEvent::Renamed { from, to } => {
            let from_id = ItemId::new(from);
            let Some(index) = position_of(items, &from_id) else {
                return add(items, dir, config, to);
            };
            if !is_child(dir, to) {
                return remove(items, selection, from);
            }
            match ItemRecord::from_path(to) {
                Ok(record) => {
                    let to_id = record.id.clone();
                    if position_of(items, &to_id).is_some() {
                        // Target already listed; the rename just drops the source
                        return remove(items, selection, from);
                    }
                    items[index] = record;
                    selection.on_item_renamed(&from_id, &to_id);
                    Some(Reconciled::Renamed {
                        index,
                        from: from_id,
                        to: to_id,
                    })
                }
                Err(err) => {
                    tracing::debug!(path = %to.display(), error = %err, "Rename target vanished");
                    remove(items, selection, from)
                }
            }
        }
        ChangeEvent::Changed(path) => {
            let index = position_of(items, &ItemId::new(path))?;
            match items[index].refresh() {
                Ok(()) => Some(Reconciled::Refreshed { index }),
                Err(err) => {
                    tracing::trace!(path = %path.display(), error = %err, "Refresh skipped");
                    None
                }
            }
        }
        // Handled by the session
        ChangeEvent::Error(_) => None,
    }
}

fn add(
    items: &mut Vec<ItemRecord>,
    dir: &Path,
    config: &SessionConfig,
    path: &Path,
) -> Option<Reconciled> {
    if !is_child(dir, path) {
        return None;
    }
    let id = ItemId::new(path);
    if position_of(items, &id).is_some() {
        return None;
    }
    let name = path.file_name()?.to_string_lossy();
    if config.should_skip_hidden(&name) {
        return None;
    }
    let record = ItemRecord::from_path(path).ok()?;
    items.push(record);
    Some(Reconciled::Added {
        index: items.len() - 1,
        id,
    })
}

fn remove(
    items: &mut Vec<ItemRecord>,
    selection: &mut SelectionModel,
    path: &Path,
) -> Option<Reconciled> {
    let id = ItemId::new(path);
    let index = position_of(items, &id)?;
    items.remove(index);
    selection.on_item_removed(index, &id);
    Some(Reconciled::Removed { index, id })
}

fn position_of(items: &[ItemRecord], id: &ItemId) -> Option<usize> {
    items.iter().position(|item| &item.id == id)
}

fn is_child(dir: &Path, path: &Path) -> bool {
    path.parent().is_some_and(|parent| parent == dir)
}
