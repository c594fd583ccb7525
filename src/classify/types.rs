//! Classification domain types — region codes, verdicts, scan results.
//!
//! `ScanResult` is the immutable output of one classification round trip.
//! The wire schema (`status`, `reason`, `color`) lives in `classify::mod`;
//! these are the decoded, typed forms the rest of the crate works with.

use serde::{Deserialize, Serialize};

/// Language/script profile hint for the remote classifier's OCR stage.
///
/// Selected by the user before capture; defaults to General. Session-scoped
/// only — never written to history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegionCode {
    #[default]
    General,
    Japan,
    Korea,
    Thai,
    China,
    /// Wildcard — the classifier runs every script profile. Slowest.
    All,
}

impl RegionCode {
    /// Wire token sent in the `region` field of image requests.
    pub fn as_str(self) -> &'static str {
        match self {
            RegionCode::General => "GENERAL",
            RegionCode::Japan => "JAPAN",
            RegionCode::Korea => "KOREA",
            RegionCode::Thai => "THAI",
            RegionCode::China => "CHINA",
            RegionCode::All => "ALL",
        }
    }
}

/// Halal-status classification returned by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Halal,
    Haram,
    Mushbooh,
    /// Anything the service reports that is not one of the three verdicts
    /// (e.g. "Error", "Unreadable"). Kept rather than rejected so the user
    /// still sees the reason text.
    Unknown,
}

impl Verdict {
    /// Decode a wire status string. Unrecognized values map to Unknown.
    pub fn from_wire(status: &str) -> Self {
        match status {
            "Halal" => Verdict::Halal,
            "Haram" => Verdict::Haram,
            "Mushbooh" => Verdict::Mushbooh,
            _ => Verdict::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Halal => "Halal",
            Verdict::Haram => "Haram",
            Verdict::Mushbooh => "Mushbooh",
            Verdict::Unknown => "Unknown",
        }
    }
}

/// One resolved classification. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub status: Verdict,
    /// Flagged-ingredient rationale. Empty means "no flagged ingredients".
    pub reason: String,
    /// Hex or named color the service suggests for the verdict badge.
    pub color_hint: String,
}
