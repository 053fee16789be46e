//! Simulation service port for the two REST calls the tool makes.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future type alias used by [`SimulationService`] to keep the trait dyn-compatible.
pub type SimulationFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// What the service answered to a simulation submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON response body.
    pub body: serde_json::Value,
}

impl SubmitResponse {
    /// Returns `true` for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Talks to the ATM network simulation service.
pub trait SimulationService: Send + Sync {
    /// Fetches the service's default configuration document as raw JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 2xx.
    fn fetch_default_config(&self) -> SimulationFuture<'_, String>;

    /// Submits a configuration document to start a simulation.
    ///
    /// The body is sent unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response body is not JSON.
    fn submit_simulation(&self, config: &str) -> SimulationFuture<'_, SubmitResponse>;
}
