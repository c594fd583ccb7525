//! Classification domain — the single remote round trip.
//!
//! One operation: submit a payload, get a verdict. The wire protocol is
//! `POST {base_url}/check-ingredients` with a JSON body:
//!   - image: `{ "image": "<base64 jpeg>", "region": "<CODE>" }`
//!   - text:  `{ "text": "<string>" }` (no region — the backend runs its
//!     wildcard profile for text)
//!
//! Response decoding is strict: non-2xx status, a non-JSON body, or a
//! missing/mistyped field all normalize to `ConnectionFailed`. Retry is
//! user-initiated re-submission, never automatic.

pub mod types;

pub use types::{RegionCode, ScanResult, Verdict};

use crate::capture::ScanPayload;
use crate::config::ClassifierConfig;
use crate::error::ScanError;
use serde::Deserialize;

/// Seam between the scan controller and the remote service. Lets tests
/// drive the controller with a scripted classifier.
pub trait Classify {
    fn classify(
        &self,
        payload: &ScanPayload,
    ) -> impl std::future::Future<Output = Result<ScanResult, ScanError>> + Send;
}

/// HTTP implementation of `Classify` against the ingredient-check backend.
pub struct HttpClassifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClassifier {
    /// Build a classifier with a bounded request timeout.
    pub fn new(config: ClassifierConfig) -> Result<Self, ScanError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScanError::ConnectionFailed(format!("client build: {}", e)))?;
        log::info!(
            "[CLASSIFY] Endpoint: {}/check-ingredients (timeout {}s)",
            config.base_url,
            config.timeout.as_secs()
        );
        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }
}

impl Classify for HttpClassifier {
    async fn classify(&self, payload: &ScanPayload) -> Result<ScanResult, ScanError> {
        let body = encode_request(payload);
        let url = format!("{}/check-ingredients", self.base_url);

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("[CLASSIFY] HTTP request failed: {}", e);
                ScanError::ConnectionFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            log::error!("[CLASSIFY] Backend returned {}: {}", status, text);
            return Err(ScanError::ConnectionFailed(format!("HTTP {}", status)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ScanError::ConnectionFailed(e.to_string()))?;
        let result = decode_response(&text)?;

        log::info!(
            "[CLASSIFY] {} in {}ms (reason: {} chars)",
            result.status.as_str(),
            start.elapsed().as_millis(),
            result.reason.len()
        );
        Ok(result)
    }
}

/// Build the JSON request body for a payload.
///
/// Text payloads deliberately carry no region field — the classifier's
/// wildcard profile applies regardless of the UI's region selection.
fn encode_request(payload: &ScanPayload) -> serde_json::Value {
    match payload {
        ScanPayload::Image { jpeg, region } => {
            let encoded =
                base64::Engine::encode(&base64::engine::general_purpose::STANDARD, jpeg);
            serde_json::json!({ "image": encoded, "region": region.as_str() })
        }
        ScanPayload::Text { content } => serde_json::json!({ "text": content }),
    }
}

/// Expected response schema. All three fields are required; serde rejects
/// anything missing or null, which is exactly the strictness we want at
/// this boundary.
#[derive(Debug, Deserialize)]
struct WireResult {
    status: String,
    reason: String,
    color: String,
}

/// Decode a response body into a `ScanResult`, or `ConnectionFailed`.
fn decode_response(body: &str) -> Result<ScanResult, ScanError> {
    let wire: WireResult = serde_json::from_str(body).map_err(|e| {
        log::error!("[CLASSIFY] Malformed response: {}", e);
        ScanError::ConnectionFailed(format!("malformed response: {}", e))
    })?;
    Ok(ScanResult {
        status: Verdict::from_wire(&wire.status),
        reason: wire.reason,
        color_hint: wire.color,
    })
}
