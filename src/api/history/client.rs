use reqwest::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use tracing::{debug, info};

use super::models::{decode_history, LoadError};
use crate::models::History;

/// Client for the static history document
pub struct HistoryClient {
    http_client: HttpClient,
    base_url: String,
}

impl HistoryClient {
    /// Fixed location of the history document relative to the base URL
    pub const HISTORY_PATH: &'static str = "data/usdbrl.json";

    /// Create a new client for the given origin
    pub fn new(base_url: String) -> Self {
        Self::with_http_client(HttpClient::new(), base_url)
    }

    /// Create a client around an existing HTTP client (for testing)
    pub fn with_http_client(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    pub fn history_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), Self::HISTORY_PATH)
    }

    /// Every fetch must reach the origin
    fn no_cache_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers
    }

    /// GET data/usdbrl.json
    ///
    /// # Returns
    /// * `Ok(History)` - Decoded history, possibly empty
    /// * `Err(LoadError)` - Non-success status, network failure or invalid JSON
    pub async fn load_history(&self) -> Result<History, LoadError> {
        let url = self.history_url();
        debug!("Fetching history from {}", url);

        let response = self.http_client
            .get(&url)
            .headers(Self::no_cache_headers())
            .send()
            .await
            .map_err(|e| LoadError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Transport { status });
        }

        let document = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| LoadError::Parse(e.to_string()))?;

        let history = decode_history(document);
        info!("Loaded {} observations from {}", history.len(), url);
        Ok(history)
    }
}
