//! Error taxonomy for the scan pipeline.
//!
//! Every failure a scan can hit is one of these. They are absorbed at the
//! ScanController boundary: the controller reports them to the result sink
//! and returns the session to Idle — nothing propagates past it.

use thiserror::Error;

/// Failures produced by capture adapters and the classification client.
///
/// Storage corruption is deliberately absent: the history store treats a
/// malformed blob as an empty history and never surfaces it.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The capture device is not ready or permission was revoked.
    #[error("capture device unavailable")]
    CaptureUnavailable,

    /// The capture device or image encoding failed mid-operation.
    #[error("capture failed: {0}")]
    CaptureFailed(String),

    /// Network round trip failed: connection error, non-2xx status, or a
    /// response body that does not match the expected schema.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

impl ScanError {
    /// Short user-facing message for the presentation surface.
    ///
    /// Detail stays in the logs; the user gets the same generic wording
    /// for every variant of a given family.
    pub fn user_message(&self) -> &'static str {
        match self {
            ScanError::CaptureUnavailable => "Camera is not available.",
            ScanError::CaptureFailed(_) => "Could not capture image.",
            ScanError::ConnectionFailed(_) => "Connection failed. Check your network.",
        }
    }
}
