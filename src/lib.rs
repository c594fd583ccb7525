//! Halal-Lens — ingredient halal-status scanner core.
//!
//! This crate is the scan-submission and result-lifecycle engine behind a
//! label-scanning client: three capture modalities are reconciled into one
//! request protocol, classified by a remote service, and kept in a bounded
//! local history. No UI lives here — the presentation layer is an external
//! collaborator behind the `ResultSink` seam.
//!
//! Domains:
//!   - capture/    — camera, gallery, and manual-text payload producers
//!   - classify/   — the single HTTP round trip and its typed result
//!   - history.rs  — bounded, newest-first persisted scan log
//!   - scanner.rs  — the per-session state machine that ties them together
//!   - config.rs   — endpoint/timeout resolution from the environment
//!   - error.rs    — the scan error taxonomy

pub mod capture;
pub mod classify;
pub mod config;
pub mod error;
pub mod history;
pub mod scanner;

pub use capture::{CameraDevice, GalleryPicker, ScanPayload, SourceType};
pub use classify::{Classify, HttpClassifier, RegionCode, ScanResult, Verdict};
pub use config::ClassifierConfig;
pub use error::ScanError;
pub use history::{HistoryEntry, HistoryStore, HISTORY_LIMIT};
pub use scanner::{Phase, ResultSink, ScanController, ScanMode, ScanSession};
