//! Gallery adapter — platform image picker.
//!
//! Cancellation is a normal outcome here, not an error: the picker returns
//! `None` and the caller stays idle with no side effects. A selected asset
//! is normalized to the same JPEG encoding as camera frames.

use super::{encode_jpeg, ScanPayload};
use crate::classify::RegionCode;
use crate::error::ScanError;

/// Picker assets are usually already well-compressed; keep a bit more
/// quality than the live camera path.
const GALLERY_JPEG_QUALITY: u8 = 50;

/// Opaque handle to the platform image-selection facility.
///
/// `Ok(None)` means the user dismissed the picker without choosing.
pub trait GalleryPicker {
    fn pick_image(&mut self)
        -> impl std::future::Future<Output = Result<Option<Vec<u8>>, ScanError>> + Send;
}

/// Let the user pick an image; `Ok(None)` on cancellation.
pub async fn gallery_pick<G: GalleryPicker>(
    picker: &mut G,
    region: RegionCode,
) -> Result<Option<ScanPayload>, ScanError> {
    let raw = match picker.pick_image().await? {
        Some(bytes) => bytes,
        None => {
            log::info!("[CAPTURE] Gallery pick cancelled");
            return Ok(None);
        }
    };
    log::info!("[CAPTURE] Gallery asset: {} bytes", raw.len());
    let jpeg = encode_jpeg(&raw, GALLERY_JPEG_QUALITY)?;
    Ok(Some(ScanPayload::Image { jpeg, region }))
}
