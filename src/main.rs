//! Halal-Lens CLI — manual-text checks against the configured backend.
//!
//! The camera and gallery modalities need a device host; from a terminal
//! only the manual path is live. Usage:
//!
//!   halal-lens <ingredients...>      check a comma-separated list
//!   halal-lens --history [query]     show (optionally filter) the log
//!   halal-lens --clear               wipe the log

use halal_lens::{
    CameraDevice, ClassifierConfig, GalleryPicker, HistoryStore, HttpClassifier, ResultSink,
    ScanController, ScanError, ScanResult,
};

/// No camera attached to a terminal session.
struct NoCamera;

impl CameraDevice for NoCamera {
    async fn capture_frame(&mut self) -> Result<Vec<u8>, ScanError> {
        Err(ScanError::CaptureUnavailable)
    }
}

/// No picker either — behaves like an immediate user cancellation.
struct NoGallery;

impl GalleryPicker for NoGallery {
    async fn pick_image(&mut self) -> Result<Option<Vec<u8>>, ScanError> {
        Ok(None)
    }
}

/// Presentation surface for a terminal: print the verdict props.
#[derive(Default)]
struct TerminalSink;

impl ResultSink for TerminalSink {
    fn show_result(&mut self, result: &ScanResult) {
        println!("{} ({})", result.status.as_str(), result.color_hint);
        if result.reason.is_empty() {
            println!("No flagged ingredients.");
        } else {
            println!("{}", result.reason);
        }
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("Error: {}", message);
    }

    fn hide(&mut self) {}
}

#[tokio::main]
async fn main() {
    // Load .env.local → .env from the project root, then init logging.
    for env_file in [".env.local", ".env"] {
        if std::path::Path::new(env_file).exists() {
            match dotenvy::from_path(env_file) {
                Ok(_) => eprintln!("[STARTUP] Loaded {}", env_file),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", env_file, e),
            }
            break;
        }
    }
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let store = HistoryStore::new();

    match args.first().map(String::as_str) {
        None | Some("--help") => {
            eprintln!("usage: halal-lens <ingredients...> | --history [query] | --clear");
        }
        Some("--history") => {
            let query = args.get(1).map(String::as_str).unwrap_or("");
            for entry in store.search(query) {
                let reason = if entry.result.reason.is_empty() {
                    "No flagged ingredients."
                } else {
                    entry.result.reason.as_str()
                };
                println!(
                    "{}  {:<8}  {:<13}  {}",
                    entry.captured_at,
                    entry.result.status.as_str(),
                    entry.source_type.label(),
                    reason
                );
            }
        }
        Some("--clear") => {
            store.clear();
            println!("History cleared.");
        }
        Some(_) => {
            let text = args.join(" ");
            let classifier = match HttpClassifier::new(ClassifierConfig::from_env()) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            let mut controller =
                ScanController::new(NoCamera, NoGallery, classifier, store, TerminalSink);
            controller.scan_text(&text).await;
            controller.dismiss();
        }
    }
}
