//! Transcript queue: entries, lifecycle and processing.
//!
//! # Architecture
//!
//! ```text
//! paste / file drop / CLI args
//!        │
//!        ▼
//! QueueStore::add_from_text / intake::spawn_file_loads
//!        │
//!        ├─ process_one(id)          ─▶ Analyzer::analyze ─▶ Completed | Error
//!        └─ process_all_pending()    ─▶ process_one, one entry at a time
//!
//! watch::Receiver<QueueSnapshot> ←─── read by the egui update() each frame
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use auditpro::analysis::GeminiAnalyzer;
//! use auditpro::config::AppConfig;
//! use auditpro::queue::QueueStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let store = QueueStore::new(Arc::new(GeminiAnalyzer::from_config(&config.analysis)));
//!
//!     let id = store.add_from_text("Agent: How can I help?").unwrap();
//!     store.process_one(id).await;
//!
//!     let snapshot = store.snapshot();
//!     println!("{:?}", snapshot.get(id).map(|e| e.status.label()));
//! }
//! ```

pub mod entry;
pub mod intake;
pub mod store;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use entry::{EntryId, EntryStatus, TranscriptEntry};
pub use store::{BatchSummary, QueueSnapshot, QueueStore, View};
