//! Persistent scan history — a bounded, newest-first log.
//!
//! The whole log is one JSON array blob on disk, capped at the 20 most
//! recent entries. Policy is best-effort, never block the user: a missing
//! or corrupt blob reads as an empty history, and a failed write is logged
//! and dropped rather than surfaced.

use crate::capture::SourceType;
use crate::classify::ScanResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hard cap on retained entries. Insertion prepends and truncates.
pub const HISTORY_LIMIT: usize = 20;

/// Last id handed out, so ids stay strictly increasing even when two scans
/// resolve inside the same millisecond.
static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// One completed (successful) classification, persisted for the history
/// screen. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Millisecond-epoch token; unique and monotonically increasing, so
    /// insertion order is recoverable without a separate sort key.
    pub id: String,
    #[serde(flatten)]
    pub result: ScanResult,
    /// Human-readable local timestamp, shown (and searched) as-is.
    pub captured_at: String,
    pub source_type: SourceType,
}

impl HistoryEntry {
    /// Build an entry for a just-resolved result, stamped with the current
    /// time and a fresh monotonic id.
    pub fn new(result: ScanResult, source_type: SourceType) -> Self {
        let now_ms = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let id = LAST_ID
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now_ms.max(last + 1))
            })
            .map(|last| now_ms.max(last + 1))
            .unwrap_or(now_ms);
        Self {
            id: id.to_string(),
            result,
            captured_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source_type,
        }
    }
}

/// Durable store for the history log.
///
/// Single-writer by protocol: only the scan controller appends, so reads
/// and read-modify-write appends need no locking. The bound holds after
/// every write regardless.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Store at the platform data directory (`<data_dir>/halal-lens/
    /// scan_history.json`).
    pub fn new() -> Self {
        let path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("halal-lens")
            .join("scan_history.json");
        Self { path }
    }

    /// Store at an explicit path. Used by tests and by callers that manage
    /// their own data directory.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the full log, newest first.
    ///
    /// An absent or malformed blob is an empty history — corruption is
    /// logged and absorbed, never an error.
    pub fn load_all(&self) -> Vec<HistoryEntry> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("[HISTORY] Corrupt history blob, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Prepend an entry and truncate to the bound, then persist.
    ///
    /// Write failures are logged and dropped — history is best-effort and
    /// must never fail a scan that already resolved.
    pub fn append(&self, entry: HistoryEntry) {
        let mut entries = self.load_all();
        entries.insert(0, entry);
        entries.truncate(HISTORY_LIMIT);

        if let Some(dir) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                log::error!("[HISTORY] Failed to create data dir: {}", e);
                return;
            }
        }
        match serde_json::to_string(&entries) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    log::error!("[HISTORY] Failed to save history: {}", e);
                } else {
                    log::info!("[HISTORY] Saved ({} entries)", entries.len());
                }
            }
            Err(e) => log::error!("[HISTORY] Failed to serialize history: {}", e),
        }
    }

    /// Drop the entire log.
    pub fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::error!("[HISTORY] Failed to clear history: {}", e);
            }
        }
    }

    /// Case-insensitive filter over status, reason, timestamp, and source
    /// label. An empty query returns the full log.
    pub fn search(&self, query: &str) -> Vec<HistoryEntry> {
        let entries = self.load_all();
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return entries;
        }
        entries
            .into_iter()
            .filter(|e| {
                e.result.status.as_str().to_lowercase().contains(&needle)
                    || e.result.reason.to_lowercase().contains(&needle)
                    || e.captured_at.contains(&needle)
                    || e.source_type.label().to_lowercase().contains(&needle)
            })
            .collect()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}
