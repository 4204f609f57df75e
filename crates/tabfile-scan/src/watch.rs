//! Directory change notification.
//!
//! A [`ChangeNotifier`] delivers [`ChangeEvent`]s for the direct children of
//! one directory on an arbitrary thread. Sinks must only post the event
//! somewhere and return; the session applies it on its own thread.

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use tabfile_core::{SessionError, SessionResult};

/// How long a half of a rename waits for its partner before it is reported
/// on its own.
const PAIRING_WINDOW: Duration = Duration::from_millis(50);

/// A change to the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Created(PathBuf),
    Deleted(PathBuf),
    Renamed { from: PathBuf, to: PathBuf },
    Changed(PathBuf),
    /// The notifier failed or dropped events; the listing may be stale.
    Error(String),
}

/// Callback receiving change events.
pub type ChangeSink = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

/// Source of directory change notifications.
pub trait ChangeNotifier: Send + Sync {
    /// Start watching the direct children of `root`.
    ///
    /// Fails with [`SessionError::Access`] or [`SessionError::Validation`]
    /// when the directory cannot be watched.
    fn subscribe(&self, root: &Path, sink: ChangeSink) -> SessionResult<WatchHandle>;
}

/// Active subscription. Dropping it unsubscribes.
pub struct WatchHandle {
    root: PathBuf,
    guard: Option<Box<dyn Any + Send>>,
}

impl WatchHandle {
    /// Wrap whatever keeps a subscription alive.
    pub fn new(root: impl Into<PathBuf>, guard: impl Any + Send) -> Self {
        Self {
            root: root.into(),
            guard: Some(Box::new(guard)),
        }
    }

    /// The watched directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the subscription is still live.
    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }

    /// Stop receiving events. Calling this more than once is a no-op.
    pub fn unsubscribe(&mut self) {
        if self.guard.take().is_some() {
            tracing::trace!(root = %self.root.display(), "Unsubscribed watcher");
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("root", &self.root)
            .field("active", &self.is_active())
            .finish()
    }
}

/// [`ChangeNotifier`] backed by the platform watcher from `notify`.
#[derive(Debug, Clone, Default)]
pub struct NotifyChangeNotifier {
    config: Config,
}

impl NotifyChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChangeNotifier for NotifyChangeNotifier {
    fn subscribe(&self, root: &Path, sink: ChangeSink) -> SessionResult<WatchHandle> {
        let pairing = Arc::new(Mutex::new(RenamePairing::default()));
        let stop = Arc::new(AtomicBool::new(false));

        let handler_pairing = Arc::clone(&pairing);
        let handler_sink = Arc::clone(&sink);
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let mut out = Vec::new();
                match res {
                    Ok(event) => lock(&handler_pairing).push(event, Instant::now(), &mut out),
                    Err(err) => out.push(ChangeEvent::Error(err.to_string())),
                }
                for change in out {
                    handler_sink(change);
                }
            },
            self.config,
        )
        .map_err(|e| map_notify_error(root, e))?;

        watcher
            .watch(root, RecursiveMode::NonRecursive)
            .map_err(|e| map_notify_error(root, e))?;

        spawn_pair_flusher(pairing, sink, Arc::clone(&stop));

        tracing::debug!(root = %root.display(), "Subscribed watcher");
        Ok(WatchHandle::new(
            root,
            NotifyGuard {
                _watcher: watcher,
                stop,
            },
        ))
    }
}

struct NotifyGuard {
    _watcher: RecommendedWatcher,
    stop: Arc<AtomicBool>,
}

impl Drop for NotifyGuard {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Reports rename halves whose partner never arrived, e.g. a file moved out
/// of the watched directory.
fn spawn_pair_flusher(pairing: Arc<Mutex<RenamePairing>>, sink: ChangeSink, stop: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        loop {
            std::thread::sleep(PAIRING_WINDOW);
            if stop.load(Ordering::Relaxed) {
                break;
            }
            let mut out = Vec::new();
            lock(&pairing).flush_expired(Instant::now(), PAIRING_WINDOW, &mut out);
            for change in out {
                sink(change);
            }
        }
    });
}

fn lock(pairing: &Mutex<RenamePairing>) -> std::sync::MutexGuard<'_, RenamePairing> {
    pairing.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn map_notify_error(root: &Path, err: notify::Error) -> SessionError {
    match err.kind {
        notify::ErrorKind::PathNotFound => SessionError::Validation {
            path: root.to_path_buf(),
        },
        notify::ErrorKind::Io(io) => SessionError::io(root, io),
        other => SessionError::Access {
            path: root.to_path_buf(),
            source: Some(std::io::Error::other(format!("{other:?}"))),
        },
    }
}

#[derive(Debug)]
struct PendingMove {
    tracker: Option<usize>,
    from: PathBuf,
    to: Option<PathBuf>,
    since: Instant,
}

/// Joins the separate "from" and "to" halves some backends report for a
/// rename into one [`ChangeEvent::Renamed`].
#[derive(Debug, Default)]
struct RenamePairing {
    pending: Option<PendingMove>,
}

impl RenamePairing {
    fn push(&mut self, event: Event, now: Instant, out: &mut Vec<ChangeEvent>) {
        if let EventKind::Modify(ModifyKind::Name(mode)) = event.kind {
            let tracker = event.tracker();
            let mut paths = event.paths;
            match mode {
                RenameMode::Both if paths.len() >= 2 => {
                    self.pending = None;
                    let to = paths.swap_remove(1);
                    let from = paths.swap_remove(0);
                    out.push(ChangeEvent::Renamed { from, to });
                }
                RenameMode::From if !paths.is_empty() => {
                    self.flush(out);
                    self.pending = Some(PendingMove {
                        tracker,
                        from: paths.swap_remove(0),
                        to: None,
                        since: now,
                    });
                }
                RenameMode::To if self.is_partner(tracker) => {
                    if let Some(pending) = self.pending.as_mut() {
                        pending.to = paths.into_iter().next();
                    }
                }
                RenameMode::To => {
                    self.flush(out);
                    out.extend(paths.into_iter().map(ChangeEvent::Created));
                }
                _ => {
                    self.flush(out);
                    out.extend(paths.into_iter().map(|path| {
                        if path.exists() {
                            ChangeEvent::Created(path)
                        } else {
                            ChangeEvent::Deleted(path)
                        }
                    }));
                }
            }
            return;
        }

        self.flush(out);

        if event.need_rescan() {
            out.push(ChangeEvent::Error("Change notifications were dropped".into()));
            return;
        }

        match event.kind {
            EventKind::Create(_) => out.extend(event.paths.into_iter().map(ChangeEvent::Created)),
            EventKind::Remove(_) => out.extend(event.paths.into_iter().map(ChangeEvent::Deleted)),
            EventKind::Modify(_) => out.extend(event.paths.into_iter().map(ChangeEvent::Changed)),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => {}
        }
    }

    fn is_partner(&self, tracker: Option<usize>) -> bool {
        matches!(&self.pending, Some(p) if p.tracker.is_some() && p.tracker == tracker)
    }

    fn flush(&mut self, out: &mut Vec<ChangeEvent>) {
        if let Some(pending) = self.pending.take() {
            out.push(match pending.to {
                Some(to) => ChangeEvent::Renamed {
                    from: pending.from,
                    to,
                },
                None => ChangeEvent::Deleted(pending.from),
            });
        }
    }

    fn flush_expired(&mut self, now: Instant, max_age: Duration, out: &mut Vec<ChangeEvent>) {
        let expired = self
            .pending
            .as_ref()
            .is_some_and(|p| now.duration_since(p.since) >= max_age);
        if expired {
            self.flush(out);
        }
    }
}
