//! The queue store: authoritative collection of transcript entries.
//!
//! [`QueueStore`] is cheap to clone (`Arc` inside) and safe to share between
//! the egui thread and tokio tasks. Every mutation publishes a fresh
//! [`QueueSnapshot`] on a `tokio::sync::watch` channel; renderers subscribe to
//! snapshots and never touch the store's internals.
//!
//! # Processing flow
//!
//! ```text
//! process_one(id)
//!   └─▶ guard: exists, not Processing, not Completed
//!         └─▶ Processing ─▶ analyzer.analyze(content).await
//!               ├─ Ok  → Completed(text)
//!               └─ Err → Error(message)
//!
//! process_all_pending()
//!   └─▶ snapshot pending ids ─▶ process_one(id) for each, one at a time
//!         └─▶ view = Results, select first snapshot id
//! ```
//!
//! The internal lock is never held across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::analysis::Analyzer;

use super::entry::{EntryId, EntryStatus, TranscriptEntry};

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Which top-level view the front end shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Intake: paste box, dropped files, queue list.
    #[default]
    Input,
    /// Archive of completed audits and the report view.
    Results,
}

// ---------------------------------------------------------------------------
// QueueSnapshot
// ---------------------------------------------------------------------------

/// Immutable copy of the store state, published after every mutation.
#[derive(Debug, Clone, Default)]
pub struct QueueSnapshot {
    /// Entries, newest first.
    pub entries: Vec<TranscriptEntry>,
    /// Entry shown in the report view.
    pub selected: Option<EntryId>,
    /// Active view.
    pub view: View,
    /// A `process_all_pending` run is in progress.
    pub batch_running: bool,
}

impl QueueSnapshot {
    pub fn get(&self, id: EntryId) -> Option<&TranscriptEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The selected entry, if it still exists.
    pub fn selected_entry(&self) -> Option<&TranscriptEntry> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_pending(&self) -> bool {
        self.entries.iter().any(TranscriptEntry::is_pending)
    }

    pub fn completed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_completed()).count()
    }

    /// Completed entries whose name or result contains `query`,
    /// case-insensitively. An empty query matches every completed entry.
    pub fn search_completed(&self, query: &str) -> Vec<&TranscriptEntry> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.is_completed() && e.matches_lowercase(&needle))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// BatchSummary
// ---------------------------------------------------------------------------

/// Outcome counts of one `process_all_pending` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    /// Entries in the pending snapshot that were still present and
    /// processable when their turn came.
    pub attempted: usize,
    pub completed: usize,
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// QueueStore
// ---------------------------------------------------------------------------

struct QueueState {
    entries: Vec<TranscriptEntry>,
    selected: Option<EntryId>,
    view: View,
    batch_running: bool,
    /// Running counter behind `"Pasted Transcript N"` names.
    pasted_count: usize,
}

impl QueueState {
    fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            entries: self.entries.clone(),
            selected: self.selected,
            view: self.view,
            batch_running: self.batch_running,
        }
    }

    fn find_mut(&mut self, id: EntryId) -> Option<&mut TranscriptEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }
}

struct Inner {
    state: Mutex<QueueState>,
    snapshots: watch::Sender<QueueSnapshot>,
    analyzer: Arc<dyn Analyzer>,
}

/// Shared handle to the transcript queue.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use auditpro::analysis::GeminiAnalyzer;
/// use auditpro::config::AppConfig;
/// use auditpro::queue::QueueStore;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let store = QueueStore::new(Arc::new(GeminiAnalyzer::from_config(&config.analysis)));
///
/// store.add_from_text("Agent: Thanks for calling...");
/// let summary = store.process_all_pending().await;
/// println!("{} completed, {} failed", summary.completed, summary.failed);
/// # }
/// ```
#[derive(Clone)]
pub struct QueueStore {
    inner: Arc<Inner>,
}

impl QueueStore {
    /// Create an empty store that analyzes entries with `analyzer`.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        let state = QueueState {
            entries: Vec::new(),
            selected: None,
            view: View::Input,
            batch_running: false,
            pasted_count: 0,
        };
        let (snapshots, _) = watch::channel(state.snapshot());
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                snapshots,
                analyzer,
            }),
        }
    }

    /// Receive a new snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<QueueSnapshot> {
        self.inner.snapshots.subscribe()
    }

    /// Current state.
    pub fn snapshot(&self) -> QueueSnapshot {
        self.lock().snapshot()
    }

    // -----------------------------------------------------------------------
    // Intake
    // -----------------------------------------------------------------------

    /// Stage pasted text. Blank text is ignored and returns `None`.
    pub fn add_from_text(&self, text: &str) -> Option<EntryId> {
        if text.trim().is_empty() {
            return None;
        }
        self.mutate(|state| {
            state.pasted_count += 1;
            let name = format!("Pasted Transcript {}", state.pasted_count);
            let entry = TranscriptEntry::new(name, text);
            let id = entry.id;
            log::info!("queue: staged '{}' ({} chars)", entry.name, text.len());
            state.entries.insert(0, entry);
            Some(id)
        })
    }

    /// Stage the contents of a file that finished loading.
    pub fn add_from_file(&self, name: &str, content: String) -> EntryId {
        self.mutate(|state| {
            let entry = TranscriptEntry::new(name, content);
            let id = entry.id;
            log::info!("queue: staged file '{name}'");
            state.entries.insert(0, entry);
            id
        })
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Delete an entry. Unknown ids are ignored.
    ///
    /// An in-flight analysis for the entry is not cancelled; its outcome is
    /// discarded when it arrives.
    pub fn remove(&self, id: EntryId) {
        self.mutate(|state| {
            state.entries.retain(|e| e.id != id);
            if state.selected == Some(id) {
                state.selected = None;
            }
        });
    }

    /// Delete every entry and clear the selection.
    pub fn clear_all(&self) {
        self.mutate(|state| {
            log::info!("queue: purging {} entries", state.entries.len());
            state.entries.clear();
            state.selected = None;
        });
    }

    // -----------------------------------------------------------------------
    // Selection / view
    // -----------------------------------------------------------------------

    pub fn select(&self, id: EntryId) {
        self.mutate(|state| state.selected = Some(id));
    }

    pub fn clear_selection(&self) {
        self.mutate(|state| state.selected = None);
    }

    pub fn set_view(&self, view: View) {
        self.mutate(|state| state.view = view);
    }

    // -----------------------------------------------------------------------
    // Processing
    // -----------------------------------------------------------------------

    /// Analyze one entry.
    ///
    /// Returns the final status, or `None` when nothing was done: the entry
    /// is unknown, already processing, already completed, or was removed
    /// while its analysis was in flight.
    pub async fn process_one(&self, id: EntryId) -> Option<EntryStatus> {
        let content = self.mutate(|state| {
            let entry = state.find_mut(id)?;
            if !entry.status.is_processable() {
                log::debug!("queue: skip '{}' ({})", entry.name, entry.status.label());
                return None;
            }
            entry.status = EntryStatus::Processing;
            log::info!("queue: processing '{}'", entry.name);
            Some(entry.content.clone())
        })?;

        let status = match self.inner.analyzer.analyze(&content).await {
            Ok(text) => EntryStatus::Completed(text),
            Err(e) => {
                log::warn!("queue: analysis failed for {id}: {e}");
                EntryStatus::Error(e.to_string())
            }
        };

        self.mutate(|state| match state.find_mut(id) {
            Some(entry) => {
                log::info!("queue: '{}' → {}", entry.name, status.label());
                entry.status = status.clone();
                Some(status)
            }
            None => {
                log::info!("queue: {id} removed during analysis, discarding outcome");
                None
            }
        })
    }

    /// Analyze every entry that is pending right now, one at a time.
    ///
    /// Entries staged during the run wait for the next batch. A failed entry
    /// does not stop the batch. A request made while a batch is running does
    /// nothing and returns an empty summary. When the batch was non-empty the view
    /// switches to [`View::Results`] with the first batch entry selected.
    pub async fn process_all_pending(&self) -> BatchSummary {
        let batch: Option<Vec<EntryId>> = self.mutate(|state| {
            if state.batch_running {
                return None;
            }
            state.batch_running = true;
            Some(
                state
                    .entries
                    .iter()
                    .filter(|e| e.is_pending())
                    .map(|e| e.id)
                    .collect(),
            )
        });
        let Some(batch) = batch else {
            log::debug!("queue: batch already running, ignoring request");
            return BatchSummary::default();
        };

        log::info!("queue: batch of {} pending entries", batch.len());

        let mut summary = BatchSummary::default();
        for &id in &batch {
            match self.process_one(id).await {
                Some(EntryStatus::Completed(_)) => {
                    summary.attempted += 1;
                    summary.completed += 1;
                }
                Some(EntryStatus::Error(_)) => {
                    summary.attempted += 1;
                    summary.failed += 1;
                }
                _ => {}
            }
        }

        self.mutate(|state| {
            state.batch_running = false;
            if let Some(&first) = batch.first() {
                state.view = View::Results;
                if state.find_mut(first).is_some() {
                    state.selected = Some(first);
                }
            }
        });

        log::info!(
            "queue: batch done ({} completed, {} failed)",
            summary.completed,
            summary.failed
        );
        summary
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` under the lock and publish the resulting snapshot.
    fn mutate<R>(&self, f: impl FnOnce(&mut QueueState) -> R) -> R {
        let mut state = self.lock();
        let out = f(&mut state);
        self.inner.snapshots.send_replace(state.snapshot());
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
