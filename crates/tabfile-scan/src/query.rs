//! External query providers for search mode.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use jwalk::{Parallelism, WalkDir};
use tokio_util::sync::CancellationToken;

use tabfile_core::{SessionError, SessionResult};

/// One search request, tagged so its reply can be matched to it.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// Echoed back in the reply.
    pub correlation_id: u64,
    /// Raw query text.
    pub text: String,
    /// Where to search. `None` lets the provider pick.
    pub scope: Option<PathBuf>,
    /// Upper bound on returned paths.
    pub max_results: usize,
    /// Cancelled when the request is superseded.
    pub cancel: CancellationToken,
}

/// Result of a [`QueryRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReply {
    pub correlation_id: u64,
    pub paths: Vec<PathBuf>,
}

/// Callback receiving a query reply, invoked at most once from any thread.
pub type ReplySink = Box<dyn FnOnce(QueryReply) + Send>;

/// Search backend used by search mode.
pub trait QueryProvider: Send + Sync {
    /// Whether the backend can serve queries right now.
    fn is_available(&self) -> bool {
        true
    }

    /// Start a query. The reply is delivered later through `reply`; a
    /// cancelled request may never reply.
    fn dispatch(&self, request: QueryRequest, reply: ReplySink) -> SessionResult<()>;
}

/// Filename search over a local directory tree.
///
/// Queries containing `*`, `?` or `[` are matched as case-insensitive globs
/// against file names; anything else is a case-insensitive substring match.
#[derive(Debug, Clone)]
pub struct LocalQueryProvider {
    default_scope: Option<PathBuf>,
    include_hidden: bool,
}

impl LocalQueryProvider {
    /// Search under `scope` when a request names none.
    pub fn new(default_scope: impl Into<PathBuf>) -> Self {
        Self {
            default_scope: Some(default_scope.into()),
            include_hidden: false,
        }
    }

    /// Search under the user's home directory by default.
    pub fn home() -> Self {
        Self {
            default_scope: dirs::home_dir(),
            include_hidden: false,
        }
    }

    /// Also descend into hidden entries.
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Run a query synchronously.
    pub fn search(&self, request: &QueryRequest) -> SessionResult<Vec<PathBuf>> {
        let scope = request
            .scope
            .clone()
            .or_else(|| self.default_scope.clone())
            .ok_or_else(|| SessionError::ProviderUnavailable {
                message: "No search scope".to_string(),
            })?;
        let matcher = NameMatcher::new(&request.text)?;
        Ok(walk_matches(
            &scope,
            &matcher,
            request.max_results,
            self.include_hidden,
            &request.cancel,
        ))
    }
}

impl QueryProvider for LocalQueryProvider {
    fn is_available(&self) -> bool {
        self.default_scope.as_deref().is_some_and(Path::is_dir)
    }

    fn dispatch(&self, request: QueryRequest, reply: ReplySink) -> SessionResult<()> {
        // Validate up front so bad patterns surface to the caller
        NameMatcher::new(&request.text)?;
        if request.scope.is_none() && self.default_scope.is_none() {
            return Err(SessionError::ProviderUnavailable {
                message: "No search scope".to_string(),
            });
        }

        let provider = self.clone();
        tokio::task::spawn_blocking(move || match provider.search(&request) {
            Ok(paths) if !request.cancel.is_cancelled() => reply(QueryReply {
                correlation_id: request.correlation_id,
                paths,
            }),
            Ok(_) => {
                tracing::trace!(correlation_id = request.correlation_id, "Query cancelled");
            }
            Err(err) => {
                tracing::warn!(error = %err, "Query failed");
            }
        });
        Ok(())
    }
}

enum NameMatcher {
    Glob(GlobMatcher),
    Substring(String),
}

impl NameMatcher {
    fn new(text: &str) -> SessionResult<Self> {
        let text = text.trim();
        if text.contains(['*', '?', '[']) {
            let glob = GlobBuilder::new(text)
                .case_insensitive(true)
                .build()
                .map_err(|e| SessionError::ProviderUnavailable {
                    message: format!("Invalid pattern {text:?}: {e}"),
                })?;
            Ok(Self::Glob(glob.compile_matcher()))
        } else {
            Ok(Self::Substring(text.to_lowercase()))
        }
    }

    fn is_match(&self, name: &str) -> bool {
        match self {
            Self::Glob(glob) => glob.is_match(name),
            Self::Substring(needle) => name.to_lowercase().contains(needle.as_str()),
        }
    }
}

fn walk_matches(
    scope: &Path,
    matcher: &NameMatcher,
    max_results: usize,
    include_hidden: bool,
    cancel: &CancellationToken,
) -> Vec<PathBuf> {
    let walker = WalkDir::new(scope)
        .parallelism(Parallelism::RayonDefaultPool {
            busy_timeout: std::time::Duration::from_millis(100),
        })
        .skip_hidden(!include_hidden)
        .follow_links(false)
        .sort(true)
        .min_depth(1);

    let mut results = Vec::new();
    for entry in walker {
        if results.len() >= max_results || cancel.is_cancelled() {
            break;
        }
        let Ok(entry) = entry else {
            continue;
        };
        if matcher.is_match(&entry.file_name().to_string_lossy()) {
            results.push(entry.path());
        }
    }
    results
}
