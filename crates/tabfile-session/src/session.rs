//! One tab's browsing session.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use strum::Display;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use tabfile_core::{
    ItemId, ItemKind, ItemRecord, Location, SessionConfig, SessionError, SessionResult,
    normalize_path,
};
use tabfile_ops::{ActivationIntent, Activator, Modifiers, RenameCommitter, RenamePlan, plan_rename};
use tabfile_scan::{
    ChangeEvent, ChangeNotifier, ChangeSink, EnumerateError, QueryProvider, QueryReply,
    QueryRequest, WatchHandle, enumerate_directory, list_roots, validate_directory,
};

use crate::history::History;
use crate::input::{InputAction, InputStateMachine, PointerEvent};
use crate::reconcile::{Reconciled, reconcile};
use crate::selection::SelectionModel;

/// What the session is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum SessionMode {
    /// The virtual root listing.
    #[default]
    Roots,
    /// A directory's children.
    Browse,
    /// Results of a query.
    Search,
}

/// Result of background work, posted to the session's inbox.
#[derive(Debug)]
pub enum SessionMessage {
    /// An enumeration finished.
    Loaded {
        generation: u64,
        result: SessionResult<Vec<ItemRecord>>,
    },
    /// The watcher reported a change.
    Change { generation: u64, event: ChangeEvent },
    /// Query results were materialized.
    SearchResults {
        generation: u64,
        items: Vec<ItemRecord>,
    },
}

/// Observable outcome of applying a [`SessionMessage`].
#[derive(Debug)]
pub enum SessionEvent {
    /// The item list was replaced by a finished enumeration.
    Loaded { location: Location, count: usize },
    /// The item list was replaced by query results.
    SearchCompleted { query: String, count: usize },
    /// One change notification was applied.
    Reconciled(Reconciled),
    /// Change notifications can no longer be trusted until a refresh.
    Degraded { message: String },
    /// A recoverable failure the user should hear about.
    Error(SessionError),
}

/// Result of [`DirectorySession::commit_rename`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The name did not change; nothing was done.
    Unchanged,
    /// The extension changes. Ask, then commit again with confirmation.
    NeedsConfirmation {
        from: Option<String>,
        to: Option<String>,
    },
    /// The item was renamed and re-keyed in place.
    Renamed {
        index: usize,
        from: ItemId,
        to: ItemId,
    },
}

#[derive(Debug)]
struct PendingLoad {
    location: Location,
    record_history: bool,
    select_after: Option<ItemId>,
}

/// A tab's navigable state: location, items, selection, history and mode.
///
/// All mutation happens through `&mut self` on the owning task. Background
/// enumeration, watcher callbacks and query replies only post
/// [`SessionMessage`]s, which the owner receives with
/// [`next_message`](Self::next_message) and applies with
/// [`apply`](Self::apply). Every message carries the generation it was
/// started under; messages from older generations are dropped.
///
/// Navigation spawns blocking tasks, so the session must be driven from
/// inside a tokio runtime.
pub struct DirectorySession {
    config: SessionConfig,
    notifier: Arc<dyn ChangeNotifier>,
    provider: Option<Arc<dyn QueryProvider>>,

    mode: SessionMode,
    location: Location,
    items: Vec<ItemRecord>,
    selection: SelectionModel,
    history: History,

    generation: u64,
    cancel: CancellationToken,
    pending: Option<PendingLoad>,
    search_pending: bool,
    search_text: Option<String>,
    buffered: Vec<ChangeEvent>,
    watch: Option<WatchHandle>,
    degraded: bool,

    inbox_tx: mpsc::UnboundedSender<SessionMessage>,
    inbox_rx: mpsc::UnboundedReceiver<SessionMessage>,
}

impl DirectorySession {
    /// Create an empty session showing nothing until the first navigation.
    pub fn new(config: SessionConfig, notifier: Arc<dyn ChangeNotifier>) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            config,
            notifier,
            provider: None,
            mode: SessionMode::Roots,
            location: Location::Roots,
            items: Vec::new(),
            selection: SelectionModel::new(),
            history: History::new(),
            generation: 0,
            cancel: CancellationToken::new(),
            pending: None,
            search_pending: false,
            search_text: None,
            buffered: Vec::new(),
            watch: None,
            degraded: false,
            inbox_tx,
            inbox_rx,
        }
    }

    /// Attach the search backend used by search mode.
    pub fn with_query_provider(mut self, provider: Arc<dyn QueryProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// The location whose items are shown. During search this is where the
    /// search was started from.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The location an in-flight navigation is heading to.
    pub fn pending_location(&self) -> Option<&Location> {
        self.pending.as_ref().map(|p| &p.location)
    }

    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a watcher error made the listing untrustworthy.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Whether an enumeration or query of the current generation is running.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.search_pending
    }

    pub fn search_text(&self) -> Option<&str> {
        self.search_text.as_deref()
    }

    /// Whether a change watch is active.
    pub fn is_watching(&self) -> bool {
        self.watch.as_ref().is_some_and(WatchHandle::is_active)
    }

    /// Tab header text.
    pub fn header(&self) -> String {
        match (self.mode, &self.search_text) {
            (SessionMode::Search, Some(query)) => format!("Search: {query}"),
            _ => self.location.header(),
        }
    }

    /// Total size of the selected files.
    pub fn selected_size(&self) -> Option<u64> {
        self.selection.selected_size(&self.items)
    }

    // ==================== Navigation ====================

    /// Show `location`, optionally recording it in history and pre-selecting
    /// `select_after` once the items arrive.
    ///
    /// Returns once the enumeration has started; the items are replaced when
    /// the matching [`SessionMessage::Loaded`] is applied. An invalid path
    /// fails with [`SessionError::Validation`] and leaves the session as it
    /// was. If the directory cannot be watched the session falls back to
    /// the previous valid location and the access error is returned.
    pub fn navigate_to(
        &mut self,
        location: impl Into<Location>,
        record_history: bool,
        select_after: Option<ItemId>,
    ) -> SessionResult<()> {
        let location = location.into();
        self.remember_anchor();
        self.load(location, record_history, select_after)
    }

    /// Step back in history, reselecting the item that was anchored there
    /// (or the folder just left).
    ///
    /// A history entry whose directory disappeared is removed and reported
    /// as [`SessionError::Validation`]; the session stays where it is.
    pub fn go_back(&mut self) -> SessionResult<()> {
        let Some(target) = self.history.back_target().cloned() else {
            return Ok(());
        };
        if let Err(err) = check_location(&target.location) {
            tracing::warn!(location = %target.location, "Dropping stale history entry");
            self.history.remove_back_target();
            return Err(err);
        }

        let came_from = self
            .history
            .current()
            .and_then(|entry| entry.location.as_path().map(ItemId::new));
        self.remember_anchor();
        self.history.step_back();
        self.load(target.location, false, target.anchor.or(came_from))
    }

    /// Step forward in history, reselecting the item that was anchored there.
    pub fn go_forward(&mut self) -> SessionResult<()> {
        let Some(target) = self.history.forward_target().cloned() else {
            return Ok(());
        };
        if let Err(err) = check_location(&target.location) {
            tracing::warn!(location = %target.location, "Dropping stale history entry");
            self.history.remove_forward_target();
            return Err(err);
        }

        self.remember_anchor();
        self.history.step_forward();
        self.load(target.location, false, target.anchor)
    }

    /// Go to the parent folder, or to the roots from a root. Does nothing
    /// in search mode or while showing the roots.
    pub fn go_to_upper_level(&mut self) -> SessionResult<()> {
        if self.mode != SessionMode::Browse {
            return Ok(());
        }
        let Some(parent) = self.location.parent() else {
            return Ok(());
        };
        let came_from = self.location.as_path().map(ItemId::new);
        self.navigate_to(parent, true, came_from)
    }

    /// Re-enumerate the current location (or re-run the current query) and
    /// clear the degraded flag.
    pub fn refresh(&mut self) -> SessionResult<()> {
        self.degraded = false;
        if self.mode == SessionMode::Search {
            let query = self.search_text.clone().unwrap_or_default();
            return self.enter_search_mode(&query);
        }
        let anchor = self.selection.anchor_id(&self.items);
        self.load(self.location.clone(), false, anchor)
    }

    // ==================== Search ====================

    /// Replace the items with the results of `query`.
    ///
    /// Fails with [`SessionError::ProviderUnavailable`] (the session stays
    /// in its current mode) when no provider is attached or it is down.
    pub fn enter_search_mode(&mut self, query: &str) -> SessionResult<()> {
        let provider = match &self.provider {
            Some(p) if p.is_available() => Arc::clone(p),
            Some(_) => {
                return Err(SessionError::ProviderUnavailable {
                    message: "Search provider is not running".to_string(),
                });
            }
            None => {
                return Err(SessionError::ProviderUnavailable {
                    message: "No search provider configured".to_string(),
                });
            }
        };

        let query = query.trim().to_string();
        let generation = self.generation + 1;
        let cancel = CancellationToken::new();
        let request = QueryRequest {
            correlation_id: generation,
            text: query.clone(),
            scope: self.location.as_path().map(Path::to_path_buf),
            max_results: self.config.max_search_results,
            cancel: cancel.clone(),
        };

        let tx = self.inbox_tx.clone();
        let max_results = self.config.max_search_results;
        let task_cancel = cancel.clone();
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            SessionError::ProviderUnavailable {
                message: e.to_string(),
            }
        })?;
        provider.dispatch(
            request,
            Box::new(move |reply: QueryReply| {
                runtime.spawn_blocking(move || {
                    if task_cancel.is_cancelled() {
                        return;
                    }
                    let items = materialize_hits(reply.paths, max_results);
                    let _ = tx.send(SessionMessage::SearchResults {
                        generation: reply.correlation_id,
                        items,
                    });
                });
            }),
        )?;

        // Nothing changes until the provider accepted the query.
        self.commit_generation(generation, cancel);
        tracing::debug!(generation, query = %query, "Dispatched query");
        self.unsubscribe();
        self.items.clear();
        self.selection.reset();
        self.mode = SessionMode::Search;
        self.search_text = Some(query);
        self.search_pending = true;
        Ok(())
    }

    /// Return to browsing the location search was started from.
    pub fn exit_search_mode(&mut self) -> SessionResult<()> {
        if self.mode != SessionMode::Search {
            return Ok(());
        }
        self.search_text = None;
        self.load(self.location.clone(), false, None)
    }

    /// Follow the search box: blank text leaves search mode, anything else
    /// (re)runs the query.
    pub fn update_search(&mut self, text: &str) -> SessionResult<()> {
        if text.trim().is_empty() {
            self.exit_search_mode()
        } else {
            self.enter_search_mode(text)
        }
    }

    // ==================== Items ====================

    /// Select the item whose display name is `name`.
    pub fn select_by_name(&mut self, name: &str) -> bool {
        match self.index_of_name(name) {
            Some(index) => self.selection.select_index(&self.items, index, false),
            None => false,
        }
    }

    /// Select the item named `name` and open the inline rename editor on it.
    pub fn start_rename_by_name(
        &mut self,
        name: &str,
        input: &mut InputStateMachine,
    ) -> Vec<InputAction> {
        match self.index_of_name(name) {
            Some(index) => input.begin_rename(&self.items, &mut self.selection, index),
            None => Vec::new(),
        }
    }

    /// Feed a pointer event through `input` against this session's items.
    pub fn handle_input(
        &mut self,
        input: &mut InputStateMachine,
        event: PointerEvent,
    ) -> Vec<InputAction> {
        let mut actions = input.sync(&self.items);
        actions.extend(input.handle(event, &self.items, &mut self.selection));
        actions
    }

    /// Fire due input timers against this session's items.
    pub fn poll_input(&mut self, input: &mut InputStateMachine, now: Instant) -> Vec<InputAction> {
        let mut actions = input.sync(&self.items);
        actions.extend(input.poll_timers(now, &self.items, &mut self.selection));
        actions
    }

    /// Commit an inline rename of `id` to `new_name`.
    ///
    /// The item list is only touched on success, when the record is re-keyed
    /// in place and the selection follows it.
    pub fn commit_rename(
        &mut self,
        id: &ItemId,
        new_name: &str,
        extension_confirmed: bool,
        committer: &dyn RenameCommitter,
    ) -> SessionResult<RenameOutcome> {
        let index = self
            .position_of(id)
            .ok_or_else(|| SessionError::rename(id.as_path(), "Item is no longer listed"))?;
        let old_kind = self.items[index].kind;
        if old_kind == ItemKind::Drive {
            return Err(SessionError::rename(id.as_path(), "Roots cannot be renamed"));
        }

        let target = match plan_rename(id.as_path(), new_name, extension_confirmed)? {
            RenamePlan::Unchanged => return Ok(RenameOutcome::Unchanged),
            RenamePlan::ConfirmExtensionChange { from, to } => {
                return Ok(RenameOutcome::NeedsConfirmation { from, to });
            }
            RenamePlan::Rename { target } => target,
        };

        committer.commit_rename(id.as_path(), &target)?;

        let mut record = match ItemRecord::from_path(&target) {
            Ok(record) => record,
            Err(_) => {
                let mut record = self.items[index].clone();
                record.id = ItemId::new(&target);
                record.display_name = new_name.into();
                record
            }
        };
        if let ItemKind::SearchHit { .. } = old_kind {
            record.kind = ItemKind::SearchHit {
                is_dir: record.is_dir(),
            };
        }

        let from = id.clone();
        let to = record.id.clone();
        self.items[index] = record;
        self.selection.on_item_renamed(&from, &to);
        Ok(RenameOutcome::Renamed { index, from, to })
    }

    /// Activate (double-click) `id`. Folders are entered by this session;
    /// every other intent goes to `activator`.
    pub fn activate(
        &mut self,
        id: &ItemId,
        modifiers: Modifiers,
        activator: &dyn Activator,
    ) -> SessionResult<ActivationIntent> {
        let index = self.position_of(id).ok_or_else(|| SessionError::Validation {
            path: id.as_path().to_path_buf(),
        })?;
        let item = &self.items[index];
        let intent = ActivationIntent::resolve(item.kind, modifiers);
        let path = item.path().to_path_buf();

        if intent.is_navigation() {
            self.navigate_to(Location::from_path(&path), true, None)?;
        } else {
            activator.activate(&path, intent)?;
        }
        Ok(intent)
    }

    // ==================== Messages ====================

    /// Wait for the next background message.
    pub async fn next_message(&mut self) -> Option<SessionMessage> {
        self.inbox_rx.recv().await
    }

    /// Take a queued message without waiting.
    pub fn try_next_message(&mut self) -> Option<SessionMessage> {
        self.inbox_rx.try_recv().ok()
    }

    /// Apply every queued message without waiting.
    pub fn drain(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(message) = self.try_next_message() {
            events.extend(self.apply(message));
        }
        events
    }

    /// Apply messages until the current enumeration or query has landed,
    /// then drain whatever else is queued.
    pub async fn settle(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while self.is_busy() {
            match self.inbox_rx.recv().await {
                Some(message) => events.extend(self.apply(message)),
                None => break,
            }
        }
        events.extend(self.drain());
        events
    }

    /// Apply one background message on the owning task.
    pub fn apply(&mut self, message: SessionMessage) -> Vec<SessionEvent> {
        match message {
            SessionMessage::Loaded { generation, result } => {
                if self.is_stale(generation) {
                    return Vec::new();
                }
                self.finish_load(result)
            }
            SessionMessage::Change { generation, event } => {
                if self.is_stale(generation) {
                    return Vec::new();
                }
                if self.pending.is_some() {
                    self.buffered.push(event);
                    return Vec::new();
                }
                self.apply_change(event)
            }
            SessionMessage::SearchResults { generation, items } => {
                if self.is_stale(generation) || self.mode != SessionMode::Search {
                    return Vec::new();
                }
                self.search_pending = false;
                self.items = items;
                self.selection.reset();
                vec![SessionEvent::SearchCompleted {
                    query: self.search_text.clone().unwrap_or_default(),
                    count: self.items.len(),
                }]
            }
        }
    }

    // ==================== Internals ====================

    fn is_stale(&self, generation: u64) -> bool {
        if generation == self.generation {
            return false;
        }
        let err = SessionError::StaleResult { generation };
        tracing::trace!(current = self.generation, "{err}");
        true
    }

    fn remember_anchor(&mut self) {
        let showing_current = self
            .history
            .current()
            .is_some_and(|entry| entry.location == self.location);
        if showing_current && self.mode != SessionMode::Search {
            self.history
                .remember_anchor(self.selection.anchor_id(&self.items));
        }
    }

    /// Load `location`, falling back to the previous valid location when
    /// the watch cannot be set up.
    fn load(
        &mut self,
        location: Location,
        record_history: bool,
        select_after: Option<ItemId>,
    ) -> SessionResult<()> {
        match self.try_load(location.clone(), record_history, select_after) {
            Err(err @ SessionError::Access { .. }) if !self.history.is_empty() => {
                tracing::warn!(location = %location, error = %err, "Cannot open location, falling back");
                self.recover(&location);
                Err(err)
            }
            other => other,
        }
    }

    fn try_load(
        &mut self,
        location: Location,
        record_history: bool,
        select_after: Option<ItemId>,
    ) -> SessionResult<()> {
        let path = match &location {
            Location::Roots => None,
            Location::Path(path) => Some(validate_directory(path)?),
        };
        let (generation, cancel) = self.begin_generation();
        self.unsubscribe();

        let Some(path) = path else {
            self.pending = Some(PendingLoad {
                location: Location::Roots,
                record_history,
                select_after,
            });
            let _ = self.inbox_tx.send(SessionMessage::Loaded {
                generation,
                result: Ok(list_roots()),
            });
            return Ok(());
        };

        let tx = self.inbox_tx.clone();
        let sink: ChangeSink = Arc::new(move |event| {
            let _ = tx.send(SessionMessage::Change { generation, event });
        });
        self.watch = Some(self.notifier.subscribe(&path, sink)?);

        self.pending = Some(PendingLoad {
            location: Location::Path(path.clone()),
            record_history,
            select_after,
        });
        self.spawn_enumeration(generation, path, cancel);
        Ok(())
    }

    fn spawn_enumeration(&self, generation: u64, path: PathBuf, cancel: CancellationToken) {
        let tx = self.inbox_tx.clone();
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            let result = match enumerate_directory(&path, &config, &cancel) {
                Ok(items) => {
                    tracing::debug!(
                        path = %path.display(),
                        count = items.len(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Enumerated"
                    );
                    Ok(items)
                }
                Err(EnumerateError::Cancelled) => {
                    tracing::trace!(generation, path = %path.display(), "Enumeration cancelled");
                    return;
                }
                Err(EnumerateError::Failed(err)) => Err(err),
            };
            let _ = tx.send(SessionMessage::Loaded { generation, result });
        });
    }

    /// Supersede whatever is in flight.
    fn begin_generation(&mut self) -> (u64, CancellationToken) {
        let cancel = CancellationToken::new();
        self.commit_generation(self.generation + 1, cancel.clone());
        (self.generation, cancel)
    }

    fn commit_generation(&mut self, generation: u64, cancel: CancellationToken) {
        self.cancel.cancel();
        self.cancel = cancel;
        self.generation = generation;
        self.pending = None;
        self.search_pending = false;
        self.buffered.clear();
    }

    fn unsubscribe(&mut self) {
        if let Some(mut handle) = self.watch.take() {
            handle.unsubscribe();
        }
    }

    fn finish_load(&mut self, result: SessionResult<Vec<ItemRecord>>) -> Vec<SessionEvent> {
        let Some(pending) = self.pending.take() else {
            return Vec::new();
        };

        let items = match result {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(location = %pending.location, error = %err, "Enumeration failed");
                self.buffered.clear();
                self.unsubscribe();
                if !self.history.is_empty() {
                    self.recover(&pending.location);
                }
                return vec![SessionEvent::Error(err)];
            }
        };

        self.items = items;
        self.selection.reset();
        if let Some(id) = &pending.select_after {
            self.selection.select(&self.items, id, false);
        }
        self.mode = if pending.location.is_roots() {
            SessionMode::Roots
        } else {
            SessionMode::Browse
        };
        self.search_text = None;
        self.location = pending.location;
        if pending.record_history {
            self.history.push(self.location.clone());
        }

        let mut events = vec![SessionEvent::Loaded {
            location: self.location.clone(),
            count: self.items.len(),
        }];
        for event in std::mem::take(&mut self.buffered) {
            if self.pending.is_some() {
                break;
            }
            events.extend(self.apply_change(event));
        }
        events
    }

    fn apply_change(&mut self, event: ChangeEvent) -> Vec<SessionEvent> {
        if self.mode != SessionMode::Browse {
            return Vec::new();
        }
        let Some(dir) = self.location.as_path().map(Path::to_path_buf) else {
            return Vec::new();
        };

        match &event {
            ChangeEvent::Error(message) => {
                self.degraded = true;
                let err = SessionError::NotifierUnreliable {
                    path: dir,
                    message: message.clone(),
                };
                tracing::warn!(error = %err, "Watch degraded");
                return vec![SessionEvent::Degraded {
                    message: err.to_string(),
                }];
            }
            ChangeEvent::Deleted(path) if normalize_path(path) == dir => {
                tracing::warn!(path = %dir.display(), "Current directory removed");
                self.recover(&Location::Path(dir));
                return Vec::new();
            }
            ChangeEvent::Renamed { from, to } if normalize_path(from) == dir => {
                tracing::debug!(from = %dir.display(), to = %to.display(), "Current directory renamed");
                if self.load(Location::from_path(to), false, None).is_err() {
                    self.recover(&Location::Path(dir));
                }
                return Vec::new();
            }
            _ => {}
        }

        reconcile(
            &mut self.items,
            &mut self.selection,
            &dir,
            &self.config,
            &event,
        )
        .map(SessionEvent::Reconciled)
        .into_iter()
        .collect()
    }

    /// Show the first location that still opens: the current history
    /// entry, then each ancestor of `failed`, then the roots.
    fn recover(&mut self, failed: &Location) {
        let select_after = failed.as_path().map(ItemId::new);
        for candidate in self.recovery_candidates(failed) {
            match self.try_load(candidate.clone(), false, select_after.clone()) {
                Ok(()) => {
                    tracing::debug!(location = %candidate, "Recovered");
                    return;
                }
                Err(err) => {
                    tracing::debug!(location = %candidate, error = %err, "Recovery candidate failed");
                }
            }
        }
    }

    fn recovery_candidates(&self, failed: &Location) -> Vec<Location> {
        let mut candidates = Vec::new();
        if let Some(entry) = self.history.current() {
            if &entry.location != failed {
                candidates.push(entry.location.clone());
            }
        }
        let mut next = failed.parent();
        while let Some(location) = next {
            next = location.parent();
            candidates.push(location);
        }
        if !candidates.contains(&Location::Roots) {
            candidates.push(Location::Roots);
        }
        candidates
    }

    fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    fn index_of_name(&self, name: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.display_name.as_str() == name)
    }
}

impl Drop for DirectorySession {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.unsubscribe();
    }
}

fn check_location(location: &Location) -> SessionResult<()> {
    match location {
        Location::Roots => Ok(()),
        Location::Path(path) => validate_directory(path).map(|_| ()),
    }
}

/// Turn query paths into search-hit records, skipping paths that no longer
/// exist.
fn materialize_hits(paths: Vec<PathBuf>, max_results: usize) -> Vec<ItemRecord> {
    paths
        .into_iter()
        .filter_map(|path| ItemRecord::search_hit(&path).ok())
        .take(max_results)
        .collect()
}
