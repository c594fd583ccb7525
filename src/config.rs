//! Runtime configuration — endpoint and timeout resolution.
//!
//! The classifier's network location is external configuration, never
//! computed here. Resolution order: environment variable, then the
//! development default (a LAN backend on port 5000, same as the source
//! setup this replaces).

use std::time::Duration;

const ENDPOINT_ENV: &str = "HALAL_LENS_ENDPOINT";
const TIMEOUT_ENV: &str = "HALAL_LENS_TIMEOUT_SECS";

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Settings for the classification client.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Base URL of the classification service, without the path.
    pub base_url: String,
    /// Bound on the whole round trip. A hung connection resolves as
    /// ConnectionFailed instead of suspending the scan forever.
    pub timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClassifierConfig {
    /// Resolve configuration from the environment.
    pub fn from_env() -> Self {
        let base_url = match std::env::var(ENDPOINT_ENV) {
            Ok(url) if !url.is_empty() => {
                log::info!("[CONFIG] Endpoint override: {}", url);
                url.trim_end_matches('/').to_string()
            }
            _ => DEFAULT_ENDPOINT.to_string(),
        };

        let timeout_secs = std::env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}
