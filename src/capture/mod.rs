//! Capture domain — the three payload producers.
//!
//! This module owns everything that turns user input into a `ScanPayload`:
//!   - camera.rs  — single-frame capture through an opaque device handle
//!   - gallery.rs — platform image picker (cancellable)
//!   - manual.rs  — raw ingredient text
//!
//! All three normalize to the same payload shape so the classification
//! client only ever sees one request protocol.

mod camera;
mod gallery;
mod manual;

pub use camera::{camera_capture, CameraDevice};
pub use gallery::{gallery_pick, GalleryPicker};
pub use manual::manual_text;

use crate::classify::RegionCode;
use crate::error::ScanError;
use serde::{Deserialize, Serialize};

/// Originating modality of a history entry, as shown on the history screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    CameraScan,
    ManualSearch,
}

impl SourceType {
    /// Display label, also matched by history search.
    pub fn label(self) -> &'static str {
        match self {
            SourceType::CameraScan => "Camera Scan",
            SourceType::ManualSearch => "Manual Search",
        }
    }
}

/// Normalized unit of data submitted for classification.
///
/// Produced by exactly one capture adapter, consumed exactly once by the
/// classification client, never retained after submission.
#[derive(Debug, Clone)]
pub enum ScanPayload {
    Image { jpeg: Vec<u8>, region: RegionCode },
    Text { content: String },
}

impl ScanPayload {
    /// Modality tag for the eventual history entry. Gallery picks are
    /// image payloads and label as camera scans, same as the source app.
    pub fn source_type(&self) -> SourceType {
        match self {
            ScanPayload::Image { .. } => SourceType::CameraScan,
            ScanPayload::Text { .. } => SourceType::ManualSearch,
        }
    }
}

/// Re-encode a raw captured image to JPEG at the given quality.
///
/// Both image adapters funnel through this so camera frames and gallery
/// picks hit the wire in the same format. Quality is fixed per adapter
/// (camera 30, gallery 50) to balance upload latency against OCR accuracy.
/// Everything happens in memory — no temp files.
pub(crate) fn encode_jpeg(raw: &[u8], quality: u8) -> Result<Vec<u8>, ScanError> {
    let decoded = image::load_from_memory(raw)
        .map_err(|e| ScanError::CaptureFailed(format!("image decode: {}", e)))?;

    // JPEG has no alpha channel; flatten whatever the device handed us.
    let rgb = decoded.to_rgb8();
    let mut jpeg = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| ScanError::CaptureFailed(format!("jpeg encode: {}", e)))?;

    log::info!(
        "[CAPTURE] JPEG encode: {} bytes in, {} bytes out (q={})",
        raw.len(),
        jpeg.len(),
        quality
    );
    Ok(jpeg)
}

#[cfg(test)]
pub(crate) fn test_png_bytes() -> Vec<u8> {
    // 4x4 solid-color PNG, enough for the encode path.
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200u8, 120, 40]));
    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    png
}
