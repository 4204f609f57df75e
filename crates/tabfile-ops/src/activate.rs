//! Item activation (double-click) intents and the system opener.

use std::path::Path;

use bitflags::bitflags;
use strum::Display;

use tabfile_core::{ItemKind, SessionError, SessionResult};

bitflags! {
    /// Keyboard modifiers held during a pointer gesture.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CTRL = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
    }
}

/// What activating an item should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ActivationIntent {
    /// Navigate the session into the folder.
    Enter,
    /// Open a file with its default application.
    Open,
    /// Open a file with elevated privileges.
    OpenElevated,
    /// Open the folder in a new tab.
    OpenInNewTab,
    /// Open the folder in a new window.
    OpenInNewWindow,
    /// Show the item's properties.
    ShowProperties,
}

impl ActivationIntent {
    /// Resolve the intent for activating an item of `kind` with `modifiers`.
    ///
    /// Alt always shows properties. On folders and roots Ctrl opens a new
    /// tab and Shift a new window; on files either one opens elevated.
    pub fn resolve(kind: ItemKind, modifiers: Modifiers) -> Self {
        if modifiers.contains(Modifiers::ALT) {
            return Self::ShowProperties;
        }
        let elevated = modifiers.intersects(Modifiers::CTRL | Modifiers::SHIFT);
        match (kind.is_dir(), modifiers) {
            (true, m) if m.contains(Modifiers::CTRL) => Self::OpenInNewTab,
            (true, m) if m.contains(Modifiers::SHIFT) => Self::OpenInNewWindow,
            (true, _) => Self::Enter,
            (false, _) if elevated => Self::OpenElevated,
            (false, _) => Self::Open,
        }
    }

    /// Whether the session itself handles the intent by navigating.
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::Enter)
    }
}

/// Carries out activation intents the session does not handle itself.
pub trait Activator: Send + Sync {
    fn activate(&self, path: &Path, intent: ActivationIntent) -> SessionResult<()>;
}

/// [`Activator`] using the platform opener.
///
/// New tabs and windows open the folder in the system file manager;
/// properties reveal the item's parent folder.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemActivator;

impl Activator for SystemActivator {
    fn activate(&self, path: &Path, intent: ActivationIntent) -> SessionResult<()> {
        let target = match intent {
            ActivationIntent::ShowProperties => path.parent().unwrap_or(path),
            ActivationIntent::OpenElevated => {
                tracing::debug!(path = %path.display(), "Elevated open not supported, opening normally");
                path
            }
            _ => path,
        };
        tracing::debug!(path = %target.display(), %intent, "Activating item");
        open::that(target).map_err(|e| SessionError::io(target, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_intents() {
        let dir = ItemKind::Directory;
        assert_eq!(ActivationIntent::resolve(dir, Modifiers::empty()), ActivationIntent::Enter);
        assert_eq!(ActivationIntent::resolve(dir, Modifiers::CTRL), ActivationIntent::OpenInNewTab);
        assert_eq!(
            ActivationIntent::resolve(dir, Modifiers::SHIFT),
            ActivationIntent::OpenInNewWindow
        );
        assert_eq!(
            ActivationIntent::resolve(ItemKind::Drive, Modifiers::ALT | Modifiers::CTRL),
            ActivationIntent::ShowProperties
        );
    }

    #[test]
    fn test_file_intents() {
        let file = ItemKind::File;
        assert_eq!(ActivationIntent::resolve(file, Modifiers::empty()), ActivationIntent::Open);
        assert_eq!(ActivationIntent::resolve(file, Modifiers::SHIFT), ActivationIntent::OpenElevated);
        assert_eq!(
            ActivationIntent::resolve(ItemKind::SearchHit { is_dir: false }, Modifiers::CTRL),
            ActivationIntent::OpenElevated
        );
        assert!(ActivationIntent::resolve(ItemKind::SearchHit { is_dir: true }, Modifiers::empty()).is_navigation());
    }

    #[test]
    fn test_intent_display() {
        assert_eq!(ActivationIntent::OpenInNewTab.to_string(), "open-in-new-tab");
    }
}
