//! Manual text adapter.
//!
//! Takes whatever the user typed and passes it through unmodified — no
//! ingredient syntax checking happens client-side, the backend interprets
//! everything. Empty or whitespace-only input produces no payload.

use super::ScanPayload;

/// Build a text payload from raw user input; `None` if there is nothing
/// to submit.
pub fn manual_text(input: &str) -> Option<ScanPayload> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(ScanPayload::Text {
        content: trimmed.to_string(),
    })
}
