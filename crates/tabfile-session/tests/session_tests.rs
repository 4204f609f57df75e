//! Integration tests for DirectorySession against real directory trees.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tabfile_core::SessionResult;
use tabfile_scan::{ChangeSink, QueryReply, QueryRequest, ReplySink, WatchHandle};
use tabfile_session::{
    ActivationIntent, Activator, ChangeEvent, ChangeNotifier, DirectorySession, FsRenamer,
    InputAction, InputStateMachine, ItemId, ItemKind, Location, Modifiers, QueryProvider,
    Reconciled, RenameCommitter, RenameOutcome, SessionConfig, SessionError, SessionEvent,
    SessionMessage, SessionMode,
};

// ==================== Test doubles ====================

struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Notifier that records sinks so tests can inject events.
#[derive(Default)]
struct FakeNotifier {
    sinks: Mutex<HashMap<PathBuf, ChangeSink>>,
    failing: Mutex<HashSet<PathBuf>>,
    active: Arc<AtomicUsize>,
}

impl FakeNotifier {
    fn fail_on(&self, path: &Path) {
        self.failing.lock().unwrap().insert(path.to_path_buf());
    }

    fn emit(&self, root: &Path, event: ChangeEvent) {
        let sink = self.sinks.lock().unwrap().get(root).cloned();
        if let Some(sink) = sink {
            sink(event);
        }
    }

    fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl ChangeNotifier for FakeNotifier {
    fn subscribe(&self, root: &Path, sink: ChangeSink) -> SessionResult<WatchHandle> {
        if self.failing.lock().unwrap().contains(root) {
            return Err(SessionError::access(root));
        }
        self.sinks.lock().unwrap().insert(root.to_path_buf(), sink);
        self.active.fetch_add(1, Ordering::SeqCst);
        Ok(WatchHandle::new(root, ActiveGuard(Arc::clone(&self.active))))
    }
}

/// Provider answering with the known paths whose name contains the query.
struct FakeProvider {
    paths: Vec<PathBuf>,
}

impl QueryProvider for FakeProvider {
    fn dispatch(&self, request: QueryRequest, reply: ReplySink) -> SessionResult<()> {
        let paths = self
            .paths
            .iter()
            .filter(|p| {
                p.file_name()
                    .is_some_and(|n| n.to_string_lossy().contains(&request.text))
            })
            .cloned()
            .collect();
        reply(QueryReply {
            correlation_id: request.correlation_id,
            paths,
        });
        Ok(())
    }
}

struct DownProvider;

impl QueryProvider for DownProvider {
    fn is_available(&self) -> bool {
        false
    }

    fn dispatch(&self, _request: QueryRequest, _reply: ReplySink) -> SessionResult<()> {
        unreachable!("unavailable provider must not be dispatched to")
    }
}

/// Provider that rejects every query at dispatch time.
struct RejectingProvider;

impl QueryProvider for RejectingProvider {
    fn dispatch(&self, request: QueryRequest, _reply: ReplySink) -> SessionResult<()> {
        Err(SessionError::ProviderUnavailable {
            message: format!("Invalid pattern {:?}", request.text),
        })
    }
}

#[derive(Default)]
struct RecordingActivator {
    calls: Mutex<Vec<(PathBuf, ActivationIntent)>>,
}

impl Activator for RecordingActivator {
    fn activate(&self, path: &Path, intent: ActivationIntent) -> SessionResult<()> {
        self.calls.lock().unwrap().push((path.to_path_buf(), intent));
        Ok(())
    }
}

struct RefusingRenamer;

impl RenameCommitter for RefusingRenamer {
    fn commit_rename(&self, source: &Path, _target: &Path) -> SessionResult<()> {
        Err(SessionError::rename(source, "read-only"))
    }
}

// ==================== Fixtures ====================

/// root/{alpha/inner.txt, beta/, notes.txt, photo.png}
fn tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("alpha")).unwrap();
    fs::write(dir.path().join("alpha").join("inner.txt"), "inner").unwrap();
    fs::create_dir(dir.path().join("beta")).unwrap();
    fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    fs::write(dir.path().join("photo.png"), "png").unwrap();
    dir
}

fn session(notifier: &Arc<FakeNotifier>) -> DirectorySession {
    DirectorySession::new(SessionConfig::default(), notifier.clone())
}

fn names(session: &DirectorySession) -> Vec<String> {
    session
        .items()
        .iter()
        .map(|i| i.display_name.to_string())
        .collect()
}

fn selected(session: &DirectorySession) -> Vec<ItemId> {
    session.selection().iter().cloned().collect()
}

async fn open(session: &mut DirectorySession, path: &Path) {
    session.navigate_to(path, true, None).unwrap();
    session.settle().await;
}

// ==================== Navigation ====================

#[tokio::test]
async fn test_navigate_lists_folders_then_files() {
    let root = tree();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);

    session.navigate_to(root.path(), true, None).unwrap();
    assert!(session.is_busy());
    let events = session.settle().await;

    assert!(matches!(events.as_slice(), [SessionEvent::Loaded { count: 4, .. }]));
    assert_eq!(session.mode(), SessionMode::Browse);
    assert_eq!(names(&session), vec!["alpha", "beta", "notes.txt", "photo.png"]);
    assert_eq!(session.history().len(), 1);
    assert!(!session.can_go_back());
    assert!(session.is_watching());
    assert_eq!(notifier.active(), 1);
}

#[tokio::test]
async fn test_navigate_preselects_item() {
    let root = tree();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);

    let target = ItemId::new(root.path().join("notes.txt"));
    session
        .navigate_to(root.path(), true, Some(target.clone()))
        .unwrap();
    session.settle().await;

    assert_eq!(selected(&session), vec![target]);
    assert_eq!(session.selection().anchor(), Some(2));
}

#[tokio::test]
async fn test_invalid_path_leaves_session_untouched() {
    let root = tree();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    open(&mut session, root.path()).await;
    let generation = session.generation();

    let err = session
        .navigate_to(root.path().join("missing"), true, None)
        .unwrap_err();
    assert!(matches!(err, SessionError::Validation { .. }));
    assert_eq!(session.generation(), generation);
    assert!(!session.is_busy());
    assert_eq!(session.location(), &Location::from_path(root.path()));
    assert_eq!(session.items().len(), 4);
}

#[tokio::test]
async fn test_back_and_forward_reselect_where_user_came_from() {
    let root = tree();
    let alpha = root.path().join("alpha");
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);

    open(&mut session, root.path()).await;
    open(&mut session, &alpha).await;
    assert!(session.can_go_back());

    session.go_back().unwrap();
    session.settle().await;
    assert_eq!(session.location(), &Location::from_path(root.path()));
    assert_eq!(selected(&session), vec![ItemId::new(&alpha)]);
    assert!(session.can_go_forward());

    session.go_forward().unwrap();
    session.settle().await;
    assert_eq!(session.location(), &Location::from_path(&alpha));
    assert!(!session.can_go_forward());
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_back_forward_round_trip_restores_anchor() {
    let root = tree();
    let alpha = root.path().join("alpha");
    let inner = ItemId::new(alpha.join("inner.txt"));
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);

    open(&mut session, root.path()).await;
    open(&mut session, &alpha).await;
    assert!(session.select_by_name("inner.txt"));

    session.go_back().unwrap();
    session.settle().await;
    session.go_forward().unwrap();
    session.settle().await;

    assert_eq!(selected(&session), vec![inner]);
}

#[tokio::test]
async fn test_go_to_upper_level_selects_child() {
    let root = tree();
    let alpha = root.path().join("alpha");
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);

    open(&mut session, &alpha).await;
    session.go_to_upper_level().unwrap();
    session.settle().await;

    assert_eq!(session.location(), &Location::from_path(root.path()));
    assert_eq!(selected(&session), vec![ItemId::new(&alpha)]);
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_roots_listing() {
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);

    session.navigate_to(Location::Roots, true, None).unwrap();
    session.settle().await;

    assert_eq!(session.mode(), SessionMode::Roots);
    assert!(!session.items().is_empty());
    assert!(session.items().iter().all(|i| i.kind == ItemKind::Drive));
    assert_eq!(notifier.active(), 0);

    // No level above the roots
    session.go_to_upper_level().unwrap();
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_stale_history_entry_is_removed() {
    let root = tree();
    let alpha = root.path().join("alpha");
    let beta = root.path().join("beta");
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);

    open(&mut session, &alpha).await;
    open(&mut session, &beta).await;
    fs::remove_dir_all(&alpha).unwrap();

    let err = session.go_back().unwrap_err();
    assert!(matches!(err, SessionError::Validation { .. }));
    assert_eq!(session.location(), &Location::from_path(&beta));
    assert_eq!(session.history().len(), 1);
    assert!(!session.can_go_back());
}

#[tokio::test]
async fn test_history_bounds_hold_after_every_step() {
    fn check(session: &DirectorySession) {
        let history = session.history();
        assert!(history.cursor() <= history.len());
        assert_eq!(session.can_go_back(), history.cursor() > 1);
        assert_eq!(session.can_go_forward(), history.cursor() < history.len());
    }

    let root = tree();
    let alpha = root.path().join("alpha");
    let beta = root.path().join("beta");
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    check(&session);

    for path in [root.path(), alpha.as_path(), beta.as_path()] {
        open(&mut session, path).await;
        check(&session);
    }

    session.go_back().unwrap();
    session.settle().await;
    check(&session);
    session.go_back().unwrap();
    session.settle().await;
    check(&session);
    assert!(!session.can_go_back());

    // At a bound both moves are no-ops
    session.go_back().unwrap();
    session.settle().await;
    check(&session);

    session.go_forward().unwrap();
    session.settle().await;
    check(&session);
    assert_eq!(session.location(), &Location::from_path(&alpha));

    // Forward target goes away
    fs::remove_dir_all(&beta).unwrap();
    assert!(session.go_forward().is_err());
    check(&session);
    assert!(!session.can_go_forward());

    session.go_back().unwrap();
    session.settle().await;
    check(&session);
    open(&mut session, root.path()).await;
    check(&session);
    assert!(session.can_go_forward());

    // Visiting a new place truncates the forward entries
    session.go_to_upper_level().unwrap();
    session.settle().await;
    check(&session);
    session.refresh().unwrap();
    session.settle().await;
    check(&session);
    assert_eq!(session.history().cursor(), session.history().len());
}

#[tokio::test]
async fn test_watch_failure_falls_back_to_previous_location() {
    let root = tree();
    let beta = root.path().join("beta");
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);

    open(&mut session, root.path()).await;
    notifier.fail_on(&beta);

    let err = session.navigate_to(beta.as_path(), true, None).unwrap_err();
    assert!(matches!(err, SessionError::Access { .. }));
    session.settle().await;

    assert_eq!(session.location(), &Location::from_path(root.path()));
    assert_eq!(selected(&session), vec![ItemId::new(&beta)]);
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn test_superseded_navigation_is_discarded() {
    let root = tree();
    let alpha = root.path().join("alpha");
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);

    session.navigate_to(root.path(), true, None).unwrap();
    let first = session.generation();
    session.navigate_to(alpha.as_path(), true, None).unwrap();
    session.settle().await;

    assert_eq!(session.location(), &Location::from_path(&alpha));
    assert_eq!(names(&session), vec!["inner.txt"]);
    assert_eq!(session.history().len(), 1);

    // A late result from the first navigation changes nothing
    let events = session.apply(SessionMessage::Loaded {
        generation: first,
        result: Ok(Vec::new()),
    });
    assert!(events.is_empty());
    assert_eq!(names(&session), vec!["inner.txt"]);
}

#[tokio::test]
async fn test_prior_generation_change_is_dropped_during_load() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let alpha = dir.join("alpha");
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    open(&mut session, &dir).await;
    let previous = session.generation();

    session.navigate_to(alpha.as_path(), true, None).unwrap();
    let events = session.apply(SessionMessage::Change {
        generation: previous,
        event: ChangeEvent::Deleted(dir.join("notes.txt")),
    });
    assert!(events.is_empty());
    assert_eq!(session.items().len(), 4);

    session.settle().await;
    assert_eq!(names(&session), vec!["inner.txt"]);
}

// ==================== Change notifications ====================

#[tokio::test]
async fn test_changes_reconcile_items_and_selection() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    open(&mut session, &dir).await;

    let created = dir.join("zz.log");
    fs::write(&created, "").unwrap();
    notifier.emit(&dir, ChangeEvent::Created(created.clone()));
    let events = session.drain();
    assert!(matches!(
        events.as_slice(),
        [SessionEvent::Reconciled(Reconciled::Added { index: 4, .. })]
    ));

    session.select_by_name("notes.txt");
    fs::remove_file(dir.join("notes.txt")).unwrap();
    notifier.emit(&dir, ChangeEvent::Deleted(dir.join("notes.txt")));
    session.drain();

    assert_eq!(names(&session), vec!["alpha", "beta", "photo.png", "zz.log"]);
    assert!(session.selection().is_empty());
}

#[tokio::test]
async fn test_rename_event_repoints_selection() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    open(&mut session, &dir).await;

    session.select_by_name("photo.png");
    fs::rename(dir.join("photo.png"), dir.join("image.png")).unwrap();
    notifier.emit(
        &dir,
        ChangeEvent::Renamed {
            from: dir.join("photo.png"),
            to: dir.join("image.png"),
        },
    );
    session.drain();

    assert_eq!(names(&session), vec!["alpha", "beta", "notes.txt", "image.png"]);
    assert_eq!(selected(&session), vec![ItemId::new(dir.join("image.png"))]);
}

#[tokio::test]
async fn test_changes_during_load_are_buffered() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);

    session.navigate_to(dir.as_path(), true, None).unwrap();
    notifier.emit(&dir, ChangeEvent::Created(dir.join("notes.txt")));
    session.settle().await;

    assert_eq!(names(&session), vec!["alpha", "beta", "notes.txt", "photo.png"]);
}

#[tokio::test]
async fn test_notifier_error_degrades_until_refresh() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    open(&mut session, &dir).await;

    notifier.emit(&dir, ChangeEvent::Error("queue overflow".into()));
    let events = session.drain();
    assert!(matches!(events.as_slice(), [SessionEvent::Degraded { .. }]));
    assert!(session.is_degraded());

    fs::write(dir.join("late.txt"), "").unwrap();
    session.refresh().unwrap();
    session.settle().await;
    assert!(!session.is_degraded());
    assert!(names(&session).contains(&"late.txt".to_string()));
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn test_current_directory_removed_goes_to_parent() {
    let root = tree();
    let alpha = root.path().join("alpha");
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    open(&mut session, &alpha).await;

    fs::remove_dir_all(&alpha).unwrap();
    notifier.emit(&alpha, ChangeEvent::Deleted(alpha.clone()));
    session.drain();
    session.settle().await;

    assert_eq!(session.location(), &Location::from_path(root.path()));
    assert_eq!(names(&session), vec!["beta", "notes.txt", "photo.png"]);
}

#[tokio::test]
async fn test_current_directory_renamed_follows() {
    let root = tree();
    let alpha = root.path().join("alpha");
    let gamma = root.path().join("gamma");
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    open(&mut session, &alpha).await;

    fs::rename(&alpha, &gamma).unwrap();
    notifier.emit(
        &alpha,
        ChangeEvent::Renamed {
            from: alpha.clone(),
            to: gamma.clone(),
        },
    );
    session.drain();
    session.settle().await;

    assert_eq!(session.location(), &Location::from_path(&gamma));
    assert_eq!(names(&session), vec!["inner.txt"]);
}

// ==================== Search ====================

#[tokio::test]
async fn test_search_replaces_items_and_exit_restores() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let provider = Arc::new(FakeProvider {
        paths: vec![
            dir.join("notes.txt"),
            dir.join("photo.png"),
            dir.join("alpha").join("inner.txt"),
            dir.join("deleted.txt"),
        ],
    });
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier).with_query_provider(provider);
    open(&mut session, &dir).await;

    session.enter_search_mode(".txt").unwrap();
    assert_eq!(session.mode(), SessionMode::Search);
    assert!(session.items().is_empty());
    assert!(!session.is_watching());

    let events = session.settle().await;
    assert!(matches!(
        events.as_slice(),
        [SessionEvent::SearchCompleted { count: 2, .. }]
    ));
    assert_eq!(names(&session), vec!["notes.txt", "inner.txt"]);
    assert!(session
        .items()
        .iter()
        .all(|i| matches!(i.kind, ItemKind::SearchHit { is_dir: false })));
    assert_eq!(session.header(), "Search: .txt");

    session.update_search("  ").unwrap();
    session.settle().await;
    assert_eq!(session.mode(), SessionMode::Browse);
    assert_eq!(session.items().len(), 4);
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn test_newer_query_wins() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let provider = Arc::new(FakeProvider {
        paths: vec![dir.join("notes.txt"), dir.join("photo.png")],
    });
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier).with_query_provider(provider);
    open(&mut session, &dir).await;

    session.update_search("notes").unwrap();
    session.update_search("photo").unwrap();
    session.settle().await;

    assert_eq!(names(&session), vec!["photo.png"]);
    assert_eq!(session.search_text(), Some("photo"));
}

#[tokio::test]
async fn test_search_results_are_capped() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let provider = Arc::new(FakeProvider {
        paths: vec![
            dir.join("notes.txt"),
            dir.join("photo.png"),
            dir.join("alpha").join("inner.txt"),
        ],
    });
    let notifier = Arc::new(FakeNotifier::default());
    let config = SessionConfig::builder().max_search_results(2usize).build().unwrap();
    let mut session = DirectorySession::new(config, notifier).with_query_provider(provider);
    open(&mut session, &dir).await;

    session.enter_search_mode("t").unwrap();
    session.settle().await;
    assert_eq!(session.items().len(), 2);
}

#[tokio::test]
async fn test_unavailable_provider_keeps_mode() {
    let root = tree();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    open(&mut session, root.path()).await;

    let err = session.enter_search_mode("x").unwrap_err();
    assert!(matches!(err, SessionError::ProviderUnavailable { .. }));

    let mut session = session.with_query_provider(Arc::new(DownProvider));
    let err = session.enter_search_mode("x").unwrap_err();
    assert!(matches!(err, SessionError::ProviderUnavailable { .. }));
    assert_eq!(session.mode(), SessionMode::Browse);
    assert_eq!(session.items().len(), 4);
}

#[tokio::test]
async fn test_rejected_query_keeps_watch_live() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier).with_query_provider(Arc::new(RejectingProvider));
    open(&mut session, &dir).await;
    let generation = session.generation();

    let err = session.enter_search_mode("[").unwrap_err();
    assert!(matches!(err, SessionError::ProviderUnavailable { .. }));
    assert_eq!(session.mode(), SessionMode::Browse);
    assert_eq!(session.generation(), generation);
    assert!(session.is_watching());

    let created = dir.join("zz.log");
    fs::write(&created, "").unwrap();
    notifier.emit(&dir, ChangeEvent::Created(created));
    let events = session.drain();

    assert!(matches!(
        events.as_slice(),
        [SessionEvent::Reconciled(Reconciled::Added { index: 4, .. })]
    ));
    assert_eq!(session.items().len(), 5);
}

#[tokio::test]
async fn test_rejected_query_does_not_cancel_navigation() {
    let root = tree();
    let alpha = root.path().join("alpha");
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier).with_query_provider(Arc::new(RejectingProvider));
    open(&mut session, root.path()).await;

    session.navigate_to(alpha.as_path(), true, None).unwrap();
    assert!(session.enter_search_mode("[").is_err());
    session.settle().await;

    assert_eq!(session.location(), &Location::from_path(&alpha));
    assert_eq!(names(&session), vec!["inner.txt"]);
}

// ==================== Items ====================

#[tokio::test]
async fn test_commit_rename_rekeys_in_place() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    open(&mut session, &dir).await;

    session.select_by_name("notes.txt");
    let id = ItemId::new(dir.join("notes.txt"));
    let outcome = session
        .commit_rename(&id, "renamed.txt", false, &FsRenamer)
        .unwrap();

    let new_id = ItemId::new(dir.join("renamed.txt"));
    assert_eq!(
        outcome,
        RenameOutcome::Renamed {
            index: 2,
            from: id,
            to: new_id.clone(),
        }
    );
    assert_eq!(names(&session), vec!["alpha", "beta", "renamed.txt", "photo.png"]);
    assert_eq!(selected(&session), vec![new_id]);
    assert!(dir.join("renamed.txt").exists());
}

#[tokio::test]
async fn test_commit_rename_needs_confirmation_or_fails_cleanly() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    open(&mut session, &dir).await;
    let id = ItemId::new(dir.join("notes.txt"));

    let outcome = session.commit_rename(&id, "notes.md", false, &FsRenamer).unwrap();
    assert_eq!(
        outcome,
        RenameOutcome::NeedsConfirmation {
            from: Some("txt".into()),
            to: Some("md".into()),
        }
    );
    assert!(dir.join("notes.txt").exists());

    let err = session
        .commit_rename(&id, "other.txt", false, &RefusingRenamer)
        .unwrap_err();
    assert!(matches!(err, SessionError::Rename { .. }));
    assert_eq!(names(&session), vec!["alpha", "beta", "notes.txt", "photo.png"]);

    assert_eq!(
        session.commit_rename(&id, "notes.txt", false, &FsRenamer).unwrap(),
        RenameOutcome::Unchanged
    );
}

#[tokio::test]
async fn test_activate_dispatches_by_kind() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let notifier = Arc::new(FakeNotifier::default());
    let activator = RecordingActivator::default();
    let mut session = session(&notifier);
    open(&mut session, &dir).await;

    let notes = ItemId::new(dir.join("notes.txt"));
    let alpha = ItemId::new(dir.join("alpha"));
    assert_eq!(
        session.activate(&notes, Modifiers::empty(), &activator).unwrap(),
        ActivationIntent::Open
    );
    assert_eq!(
        session.activate(&alpha, Modifiers::CTRL, &activator).unwrap(),
        ActivationIntent::OpenInNewTab
    );
    assert_eq!(activator.calls.lock().unwrap().len(), 2);
    assert!(!session.is_busy());

    assert_eq!(
        session.activate(&alpha, Modifiers::empty(), &activator).unwrap(),
        ActivationIntent::Enter
    );
    session.settle().await;
    assert_eq!(session.location(), &Location::from_path(dir.join("alpha")));
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_start_rename_by_name_opens_editor() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    let mut input = InputStateMachine::new(SessionConfig::default());
    open(&mut session, &dir).await;

    let actions = session.start_rename_by_name("photo.png", &mut input);
    assert_eq!(
        actions,
        vec![InputAction::BeginRename {
            id: ItemId::new(dir.join("photo.png")),
            name: "photo.png".into(),
            selection: 0..5,
        }]
    );
    assert_eq!(selected(&session), vec![ItemId::new(dir.join("photo.png"))]);
    assert!(session.start_rename_by_name("nope", &mut input).is_empty());
}

#[tokio::test]
async fn test_selected_size_and_header() {
    let root = tree();
    let dir = root.path().to_path_buf();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    open(&mut session, &dir).await;

    assert_eq!(session.selected_size(), None);
    session.select_by_name("notes.txt");
    assert_eq!(session.selected_size(), Some(5));
    assert_eq!(session.header(), Location::from_path(&dir).header());
}

#[tokio::test]
async fn test_drop_releases_watch() {
    let root = tree();
    let notifier = Arc::new(FakeNotifier::default());
    let mut session = session(&notifier);
    open(&mut session, root.path()).await;
    assert_eq!(notifier.active(), 1);

    open(&mut session, &root.path().join("beta")).await;
    assert_eq!(notifier.active(), 1);

    drop(session);
    assert_eq!(notifier.active(), 0);
}
