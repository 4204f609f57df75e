//! Error types for session operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the session crates.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors a browsing session can report.
///
/// None of these are fatal: the worst outcome is a session falling back to
/// its previous valid location or to the roots listing.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Path does not exist or is not a directory.
    #[error("Cannot open path: {path}")]
    Validation { path: PathBuf },

    /// Watch subscription or enumeration was denied.
    #[error("Access denied: {path}")]
    Access {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Change notifications were dropped or the watcher failed.
    #[error("Change notifications for {path} are unreliable: {message}")]
    NotifierUnreliable { path: PathBuf, message: String },

    /// The search backend is missing.
    #[error("Search provider unavailable: {message}")]
    ProviderUnavailable { message: String },

    /// An async result belonged to a superseded request.
    #[error("Result for generation {generation} is stale")]
    StaleResult { generation: u64 },

    /// Inline rename could not be committed.
    #[error("Cannot rename {path}: {message}")]
    Rename { path: PathBuf, message: String },
}

impl SessionError {
    /// Create an error from an I/O failure with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory => {
                Self::Validation { path }
            }
            _ => Self::Access {
                path,
                source: Some(source),
            },
        }
    }

    /// Create an access error without an underlying I/O error.
    pub fn access(path: impl Into<PathBuf>) -> Self {
        Self::Access {
            path: path.into(),
            source: None,
        }
    }

    /// Create a rename error.
    pub fn rename(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Rename {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error is routine and must never reach the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::StaleResult { .. })
    }
}
