//! Asynchronous file intake.
//!
//! Each file is read on its own tokio task; every successful read appends
//! exactly one entry to the [`QueueStore`] as soon as it completes. Files
//! uploaded together may therefore land in any order.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::entry::EntryId;
use super::store::QueueStore;

/// File extensions accepted as transcripts.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "md"];

/// Whether `path` has an accepted transcript extension (case-insensitive).
///
/// ```
/// use std::path::Path;
/// use auditpro::queue::intake::is_transcript_file;
///
/// assert!(is_transcript_file(Path::new("call.TXT")));
/// assert!(!is_transcript_file(Path::new("call.wav")));
/// ```
pub fn is_transcript_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Read one transcript file, returning its display name and text.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub async fn read_transcript(path: &Path) -> Result<(String, String)> {
    if !is_transcript_file(path) {
        bail!(
            "{} is not a transcript (expected .{})",
            path.display(),
            ACCEPTED_EXTENSIONS.join(" or .")
        );
    }
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((name, String::from_utf8_lossy(&bytes).into_owned()))
}

/// Read `path` and stage it. Failures are logged and yield `None`.
pub async fn load_file(store: QueueStore, path: PathBuf) -> Option<EntryId> {
    match read_transcript(&path).await {
        Ok((name, content)) => Some(store.add_from_file(&name, content)),
        Err(e) => {
            log::warn!("intake: {e:#}");
            None
        }
    }
}

/// Spawn one independent read task per path on `handle`.
pub fn spawn_file_loads(
    handle: &Handle,
    store: &QueueStore,
    paths: impl IntoIterator<Item = PathBuf>,
) -> Vec<JoinHandle<Option<EntryId>>> {
    paths
        .into_iter()
        .map(|path| handle.spawn(load_file(store.clone(), path)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
