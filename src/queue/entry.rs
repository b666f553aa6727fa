//! Transcript entries and their lifecycle state.
//!
//! [`EntryStatus`] carries the analysis outcome inside the variant, so an
//! entry can never hold a result and an error at the same time.

use std::fmt;

use chrono::{DateTime, Local};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// EntryId
// ---------------------------------------------------------------------------

/// Opaque unique identifier of a [`TranscriptEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// EntryStatus
// ---------------------------------------------------------------------------

/// Lifecycle of one transcript.
///
/// ```text
/// Pending ──process──▶ Processing ──ok──▶ Completed
///                                 ──err─▶ Error ──retry──▶ Processing
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EntryStatus {
    /// Staged, not yet sent for analysis.
    #[default]
    Pending,
    /// An analysis call is in flight.
    Processing,
    /// Analysis succeeded; holds the model's text verbatim.
    Completed(String),
    /// Analysis failed; holds a human-readable message.
    Error(String),
}

impl EntryStatus {
    /// Lower-case label shown next to each queue item.
    ///
    /// ```
    /// use auditpro::queue::EntryStatus;
    ///
    /// assert_eq!(EntryStatus::Pending.label(), "pending");
    /// assert_eq!(EntryStatus::Completed("x".into()).label(), "completed");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Processing => "processing",
            EntryStatus::Completed(_) => "completed",
            EntryStatus::Error(_) => "error",
        }
    }

    /// Whether `process_one` may (re)start analysis from this state.
    pub fn is_processable(&self) -> bool {
        matches!(self, EntryStatus::Pending | EntryStatus::Error(_))
    }
}

// ---------------------------------------------------------------------------
// TranscriptEntry
// ---------------------------------------------------------------------------

/// One transcript submitted for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    /// Unique id, fixed at creation.
    pub id: EntryId,
    /// File name or `"Pasted Transcript N"`.
    pub name: String,
    /// Raw transcript text.
    pub content: String,
    /// Current lifecycle state.
    pub status: EntryStatus,
    /// Creation time; informational only.
    pub timestamp: DateTime<Local>,
}

impl TranscriptEntry {
    /// Create a new pending entry.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            name: name.into(),
            content: content.into(),
            status: EntryStatus::Pending,
            timestamp: Local::now(),
        }
    }

    /// Analysis text, present only when completed.
    pub fn result(&self) -> Option<&str> {
        match &self.status {
            EntryStatus::Completed(text) => Some(text),
            _ => None,
        }
    }

    /// Failure message, present only when in error.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            EntryStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == EntryStatus::Pending
    }

    pub fn is_processing(&self) -> bool {
        self.status == EntryStatus::Processing
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, EntryStatus::Completed(_))
    }

    /// Case-insensitive match of `needle` (already lower-cased) against the
    /// name and, when completed, the result text.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self
                .result()
                .is_some_and(|r| r.to_lowercase().contains(needle))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
