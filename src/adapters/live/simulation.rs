//! Live adapter for the `SimulationService` port using `reqwest`.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use crate::ports::simulation::{SimulationFuture, SimulationService, SubmitResponse};

const DEFAULT_CONFIG_PATH: &str = "/config/default";
const SUBMIT_PATH: &str = "/simulation/simulation";
const JSON_MEDIA_TYPE: &str = "application/json";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Live simulation client speaking HTTP to the local service.
pub struct LiveSimulationService {
    client: Client,
    base_url: String,
}

impl LiveSimulationService {
    /// Creates a client for the service rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: Client::new(), base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl LiveSimulationService {
    async fn get_default_config(&self, url: String) -> Result<String, BoxError> {
        tracing::info!(%url, "fetching default config");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| format!("GET {url} failed: {e}"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response from {url}: {e}"))?;

        if !status.is_success() {
            return Err(format!("GET {url} returned {}: {text}", status.as_u16()).into());
        }
        Ok(text)
    }

    async fn post_simulation(&self, url: String, body: String) -> Result<SubmitResponse, BoxError> {
        tracing::info!(%url, bytes = body.len(), "submitting simulation");
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| format!("POST {url} failed: {e}"))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response from {url}: {e}"))?;
        let body = serde_json::from_str(&text).map_err(|e| {
            format!("POST {url} returned {status} with a non-JSON body ({e}): {text}")
        })?;

        Ok(SubmitResponse { status, body })
    }
}

impl SimulationService for LiveSimulationService {
    fn fetch_default_config(&self) -> SimulationFuture<'_, String> {
        Box::pin(self.get_default_config(self.url(DEFAULT_CONFIG_PATH)))
    }

    fn submit_simulation(&self, config: &str) -> SimulationFuture<'_, SubmitResponse> {
        Box::pin(self.post_simulation(self.url(SUBMIT_PATH), config.to_string()))
    }
}
