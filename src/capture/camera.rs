//! Camera adapter — single-frame capture at fixed quality.
//!
//! The camera itself is an opaque platform handle behind `CameraDevice`;
//! this adapter only normalizes whatever frame it hands back. Reentrancy
//! is handled one level up: the scan controller drops capture intents
//! while anything is in flight, so this function is never called twice
//! concurrently.

use super::{encode_jpeg, ScanPayload};
use crate::classify::RegionCode;
use crate::error::ScanError;

/// Upload-size/accuracy trade-off for camera frames. The backend resizes
/// anyway, so low quality here mostly buys upload latency.
const CAMERA_JPEG_QUALITY: u8 = 30;

/// Opaque handle to the platform camera.
///
/// `capture_frame` returns one encoded frame (any format the `image` crate
/// can decode). Implementations signal a missing/denied device with
/// `CaptureUnavailable` and I/O problems with `CaptureFailed`.
pub trait CameraDevice {
    fn capture_frame(&mut self) -> impl std::future::Future<Output = Result<Vec<u8>, ScanError>> + Send;
}

/// Capture one frame and normalize it to a transmissible image payload.
pub async fn camera_capture<C: CameraDevice>(
    device: &mut C,
    region: RegionCode,
) -> Result<ScanPayload, ScanError> {
    let frame = device.capture_frame().await?;
    log::info!("[CAPTURE] Camera frame: {} bytes", frame.len());
    let jpeg = encode_jpeg(&frame, CAMERA_JPEG_QUALITY)?;
    Ok(ScanPayload::Image { jpeg, region })
}
