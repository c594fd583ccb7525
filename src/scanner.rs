//! Scan controller — the process-wide "current scan" lifecycle.
//!
//! Owns the session state machine (Idle → Capturing → Submitting →
//! Resolved | Failed) and mediates between the capture adapters, the
//! classification client, and the history store. The presentation layer
//! sits behind `ResultSink` and only ever receives rendering props and a
//! dismiss intent.
//!
//! Guard invariant: at most one payload in flight. Any capture or submit
//! intent received while the session is not Idle is dropped with a warn —
//! no queueing, no cancellation of the in-flight request.

use crate::capture::{
    camera_capture, gallery_pick, manual_text, CameraDevice, GalleryPicker, ScanPayload,
};
use crate::classify::{Classify, RegionCode, ScanResult};
use crate::error::ScanError;
use crate::history::{HistoryEntry, HistoryStore};

/// Which capture tab the UI has active. A session property only — the
/// per-modality intents below are explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    #[default]
    Camera,
    Manual,
}

/// Lifecycle phase of the current scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Capturing,
    Submitting,
    Resolved,
    Failed,
}

/// Transient, in-memory session state. Owned by the controller; reset to
/// Idle when the result is dismissed or a new capture begins.
#[derive(Debug, Default)]
pub struct ScanSession {
    pub mode: ScanMode,
    pub region: RegionCode,
    pub phase: Phase,
    pub pending: Option<ScanResult>,
}

/// Presentation surface seam.
///
/// `show_result` implies visible=true with the result's status, reason,
/// and color props; `hide` implies visible=false. The surface emits its
/// dismiss intent back through `ScanController::dismiss`.
pub trait ResultSink {
    fn show_result(&mut self, result: &ScanResult);
    fn show_error(&mut self, message: &str);
    fn hide(&mut self);
}

/// Orchestrates one scan at a time from capture through history append.
///
/// Single-writer by construction: everything that mutates the session or
/// the store goes through `&mut self`, so the phase guard is the only
/// exclusivity mechanism needed.
pub struct ScanController<C, G, K, S>
where
    C: CameraDevice,
    G: GalleryPicker,
    K: Classify,
    S: ResultSink,
{
    session: ScanSession,
    camera: C,
    gallery: G,
    classifier: K,
    store: HistoryStore,
    sink: S,
}

impl<C, G, K, S> ScanController<C, G, K, S>
where
    C: CameraDevice,
    G: GalleryPicker,
    K: Classify,
    S: ResultSink,
{
    pub fn new(camera: C, gallery: G, classifier: K, store: HistoryStore, sink: S) -> Self {
        Self {
            session: ScanSession::default(),
            camera,
            gallery,
            classifier,
            store,
            sink,
        }
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    pub fn history(&self) -> &HistoryStore {
        &self.store
    }

    /// Side-channel setters — legal in any phase, effective on the next
    /// capture. Text submissions ignore the region entirely.
    pub fn set_region(&mut self, region: RegionCode) {
        log::info!("[SCAN] Region selected: {}", region.as_str());
        self.session.region = region;
    }

    pub fn set_mode(&mut self, mode: ScanMode) {
        self.session.mode = mode;
    }

    /// Camera capture intent: one frame, then straight into submission.
    pub async fn scan_camera(&mut self) {
        if !self.enter_capturing("camera") {
            return;
        }
        let region = self.session.region;
        match camera_capture(&mut self.camera, region).await {
            Ok(payload) => self.submit(payload).await,
            Err(e) => self.capture_failed(e),
        }
    }

    /// Gallery pick intent. Cancellation is silent — back to Idle with no
    /// side effects.
    pub async fn scan_gallery(&mut self) {
        if !self.enter_capturing("gallery") {
            return;
        }
        let region = self.session.region;
        match gallery_pick(&mut self.gallery, region).await {
            Ok(Some(payload)) => self.submit(payload).await,
            Ok(None) => {
                self.session.phase = Phase::Idle;
            }
            Err(e) => self.capture_failed(e),
        }
    }

    /// Manual text intent. Empty or whitespace-only input is a silent
    /// no-op, not an error.
    pub async fn scan_text(&mut self, input: &str) {
        if !self.enter_capturing("text") {
            return;
        }
        match manual_text(input) {
            Some(payload) => self.submit(payload).await,
            None => {
                log::info!("[SCAN] Empty manual input — nothing to submit");
                self.session.phase = Phase::Idle;
            }
        }
    }

    /// Dismiss intent from the presentation surface. Presentation-only:
    /// clears the pending result and visibility, never touches history.
    pub fn dismiss(&mut self) {
        match self.session.phase {
            Phase::Resolved | Phase::Failed => {
                self.session.pending = None;
                self.sink.hide();
                self.session.phase = Phase::Idle;
                log::info!("[SCAN] Dismissed — session idle");
            }
            // Dismiss outside a terminal phase has nothing to clear; in
            // particular it must not cancel an in-flight submission.
            _ => {}
        }
    }

    /// Phase guard shared by all three capture intents.
    fn enter_capturing(&mut self, what: &str) -> bool {
        if self.session.phase != Phase::Idle {
            log::warn!(
                "[SCAN] Ignoring {} intent — scan already in flight (phase {:?})",
                what,
                self.session.phase
            );
            return false;
        }
        self.session.phase = Phase::Capturing;
        true
    }

    fn capture_failed(&mut self, e: ScanError) {
        log::error!("[SCAN] Capture failed: {}", e);
        self.sink.show_error(e.user_message());
        self.session.phase = Phase::Idle;
    }

    /// Submitting → Resolved | Failed. Success appends to history (the
    /// store enforces the bound) and publishes the result; failure only
    /// notifies the surface.
    async fn submit(&mut self, payload: ScanPayload) {
        self.session.phase = Phase::Submitting;
        let source_type = payload.source_type();

        match self.classifier.classify(&payload).await {
            Ok(result) => {
                self.store
                    .append(HistoryEntry::new(result.clone(), source_type));
                self.sink.show_result(&result);
                self.session.pending = Some(result);
                self.session.phase = Phase::Resolved;
                log::info!("[SCAN] Resolved ({})", source_type.label());
            }
            Err(e) => {
                log::error!("[SCAN] Submission failed: {}", e);
                self.sink.show_error(e.user_message());
                self.session.pending = None;
                self.session.phase = Phase::Failed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{test_png_bytes, SourceType};
    use crate::classify::Verdict;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // ── Test doubles ─────────────────────────────────────────────────

    struct FakeCamera {
        frames: Mutex<VecDeque<Result<Vec<u8>, ScanError>>>,
    }

    impl CameraDevice for FakeCamera {
        async fn capture_frame(&mut self) -> Result<Vec<u8>, ScanError> {
            self.frames
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ScanError::CaptureUnavailable))
        }
    }

    struct FakePicker {
        picks: Mutex<VecDeque<Result<Option<Vec<u8>>, ScanError>>>,
    }

    impl GalleryPicker for FakePicker {
        async fn pick_image(&mut self) -> Result<Option<Vec<u8>>, ScanError> {
            self.picks.lock().unwrap().pop_front().unwrap_or(Ok(None))
        }
    }

    struct MockClassifier {
        responses: Mutex<VecDeque<Result<ScanResult, ScanError>>>,
        calls: AtomicUsize,
        seen: Mutex<Vec<ScanPayload>>,
    }

    impl MockClassifier {
        fn scripted(responses: Vec<Result<ScanResult, ScanError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Classify for MockClassifier {
        async fn classify(&self, payload: &ScanPayload) -> Result<ScanResult, ScanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(payload.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ScanError::ConnectionFailed("script exhausted".into())))
        }
    }

    #[derive(Debug, PartialEq)]
    enum SinkEvent {
        Shown(String),
        Error(String),
        Hidden,
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<SinkEvent>,
        visible: bool,
    }

    impl ResultSink for RecordingSink {
        fn show_result(&mut self, result: &ScanResult) {
            self.visible = true;
            self.events.push(SinkEvent::Shown(result.reason.clone()));
        }
        fn show_error(&mut self, message: &str) {
            self.events.push(SinkEvent::Error(message.to_string()));
        }
        fn hide(&mut self) {
            self.visible = false;
            self.events.push(SinkEvent::Hidden);
        }
    }

    fn haram_result() -> ScanResult {
        ScanResult {
            status: Verdict::Haram,
            reason: "Contains alcohol (Sake, Mirin)".to_string(),
            color_hint: "#FF4D4D".to_string(),
        }
    }

    fn halal_result() -> ScanResult {
        ScanResult {
            status: Verdict::Halal,
            reason: String::new(),
            color_hint: "#4CAF50".to_string(),
        }
    }

    type TestController = ScanController<FakeCamera, FakePicker, MockClassifier, RecordingSink>;

    fn controller(
        classifier: MockClassifier,
        camera_frames: Vec<Result<Vec<u8>, ScanError>>,
        picks: Vec<Result<Option<Vec<u8>>, ScanError>>,
    ) -> (tempfile::TempDir, TestController) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::with_path(dir.path().join("scan_history.json"));
        let ctrl = ScanController::new(
            FakeCamera {
                frames: Mutex::new(camera_frames.into()),
            },
            FakePicker {
                picks: Mutex::new(picks.into()),
            },
            classifier,
            store,
            RecordingSink::default(),
        );
        (dir, ctrl)
    }

    // ── Scenarios ────────────────────────────────────────────────────

    #[tokio::test]
    async fn manual_haram_scan_appends_history_and_shows_result() {
        let (_dir, mut ctrl) =
            controller(MockClassifier::scripted(vec![Ok(haram_result())]), vec![], vec![]);

        ctrl.scan_text("Sake, Mirin").await;

        assert_eq!(ctrl.session().phase, Phase::Resolved);
        let history = ctrl.history().load_all();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].source_type, SourceType::ManualSearch);
        assert_eq!(history[0].result.status, Verdict::Haram);

        assert!(ctrl.sink.visible);
        assert_eq!(
            ctrl.sink.events,
            vec![SinkEvent::Shown("Contains alcohol (Sake, Mirin)".into())]
        );
    }

    #[tokio::test]
    async fn twenty_one_scans_keep_the_newest_twenty() {
        let responses: Vec<_> = (1..=21)
            .map(|i| {
                Ok(ScanResult {
                    status: Verdict::Halal,
                    reason: format!("scan {}", i),
                    color_hint: "#4CAF50".to_string(),
                })
            })
            .collect();
        let (_dir, mut ctrl) = controller(MockClassifier::scripted(responses), vec![], vec![]);

        for i in 1..=21 {
            ctrl.scan_text(&format!("ingredients {}", i)).await;
            ctrl.dismiss();
        }

        let history = ctrl.history().load_all();
        assert_eq!(history.len(), 20);
        assert_eq!(history[0].result.reason, "scan 21");
        assert_eq!(history[19].result.reason, "scan 2");
    }

    #[tokio::test]
    async fn backend_failure_surfaces_error_and_leaves_history_untouched() {
        let (_dir, mut ctrl) = controller(
            MockClassifier::scripted(vec![Err(ScanError::ConnectionFailed("HTTP 500".into()))]),
            vec![],
            vec![],
        );

        ctrl.scan_text("gelatin").await;

        assert_eq!(ctrl.session().phase, Phase::Failed);
        assert!(ctrl.history().load_all().is_empty());
        assert_eq!(
            ctrl.sink.events,
            vec![SinkEvent::Error("Connection failed. Check your network.".into())]
        );

        ctrl.dismiss();
        assert_eq!(ctrl.session().phase, Phase::Idle);
    }

    #[tokio::test]
    async fn gallery_cancellation_is_a_silent_no_op() {
        let (_dir, mut ctrl) =
            controller(MockClassifier::scripted(vec![]), vec![], vec![Ok(None)]);

        ctrl.scan_gallery().await;

        assert_eq!(ctrl.session().phase, Phase::Idle);
        assert_eq!(ctrl.classifier.calls.load(Ordering::SeqCst), 0);
        assert!(ctrl.sink.events.is_empty());
        assert!(ctrl.history().load_all().is_empty());
    }

    #[tokio::test]
    async fn empty_manual_text_is_a_silent_no_op() {
        let (_dir, mut ctrl) = controller(MockClassifier::scripted(vec![]), vec![], vec![]);

        ctrl.scan_text("   ").await;

        assert_eq!(ctrl.session().phase, Phase::Idle);
        assert_eq!(ctrl.classifier.calls.load(Ordering::SeqCst), 0);
        assert!(ctrl.sink.events.is_empty());
    }

    #[tokio::test]
    async fn intents_outside_idle_are_dropped() {
        let (_dir, mut ctrl) =
            controller(MockClassifier::scripted(vec![Ok(halal_result())]), vec![], vec![]);

        ctrl.scan_text("water").await;
        assert_eq!(ctrl.session().phase, Phase::Resolved);

        // Result still showing — every further intent must be a no-op.
        ctrl.scan_text("sugar").await;
        ctrl.scan_camera().await;
        ctrl.scan_gallery().await;

        assert_eq!(ctrl.session().phase, Phase::Resolved);
        assert_eq!(ctrl.classifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctrl.history().load_all().len(), 1);
    }

    #[tokio::test]
    async fn dismiss_is_presentation_only() {
        let (_dir, mut ctrl) =
            controller(MockClassifier::scripted(vec![Ok(halal_result())]), vec![], vec![]);

        ctrl.scan_text("water").await;
        let before = ctrl.history().load_all();

        ctrl.dismiss();

        assert_eq!(ctrl.session().phase, Phase::Idle);
        assert!(ctrl.session().pending.is_none());
        assert!(!ctrl.sink.visible);
        let after = ctrl.history().load_all();
        assert_eq!(before.len(), after.len());
        assert_eq!(before[0].id, after[0].id);

        // Dismiss while already idle stays a no-op.
        ctrl.dismiss();
        assert_eq!(ctrl.session().phase, Phase::Idle);
    }

    #[tokio::test]
    async fn camera_uses_selected_region_and_text_ignores_it() {
        let (_dir, mut ctrl) = controller(
            MockClassifier::scripted(vec![Ok(halal_result()), Ok(halal_result())]),
            vec![Ok(test_png_bytes())],
            vec![],
        );

        ctrl.set_region(RegionCode::Japan);

        ctrl.scan_camera().await;
        ctrl.dismiss();
        ctrl.scan_text("miso").await;

        let seen = ctrl.classifier.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        match &seen[0] {
            ScanPayload::Image { region, .. } => assert_eq!(*region, RegionCode::Japan),
            ScanPayload::Text { .. } => panic!("expected image payload"),
        }
        // Text payload carries no region at all — wildcard routing is the
        // backend default and the UI selection never applies.
        assert!(matches!(&seen[1], ScanPayload::Text { .. }));
    }

    #[tokio::test]
    async fn camera_failure_returns_to_idle_with_an_error() {
        let (_dir, mut ctrl) = controller(
            MockClassifier::scripted(vec![]),
            vec![Err(ScanError::CaptureUnavailable)],
            vec![],
        );

        ctrl.scan_camera().await;

        assert_eq!(ctrl.session().phase, Phase::Idle);
        assert_eq!(
            ctrl.sink.events,
            vec![SinkEvent::Error("Camera is not available.".into())]
        );
        assert_eq!(ctrl.classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn region_can_change_in_any_phase_and_applies_next_capture() {
        let (_dir, mut ctrl) = controller(
            MockClassifier::scripted(vec![Ok(halal_result()), Ok(halal_result())]),
            vec![Ok(test_png_bytes()), Ok(test_png_bytes())],
            vec![],
        );

        ctrl.scan_camera().await;
        // Resolved — region change is still allowed.
        ctrl.set_region(RegionCode::China);
        ctrl.dismiss();
        ctrl.scan_camera().await;

        let seen = ctrl.classifier.seen.lock().unwrap();
        match &seen[0] {
            ScanPayload::Image { region, .. } => assert_eq!(*region, RegionCode::General),
            ScanPayload::Text { .. } => panic!("expected image payload"),
        }
        match &seen[1] {
            ScanPayload::Image { region, .. } => assert_eq!(*region, RegionCode::China),
            ScanPayload::Text { .. } => panic!("expected image payload"),
        }
    }
}
