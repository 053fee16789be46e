//! Recording adapter for the `SimulationService` port.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::simulation::{SimulationFuture, SimulationService, SubmitResponse};

const PORT: &str = "simulation";

/// Records simulation calls while delegating to an inner implementation.
pub struct RecordingSimulationService {
    inner: Box<dyn SimulationService>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSimulationService {
    /// Wraps `inner`, appending every call and its result to `recorder`.
    pub fn new(inner: Box<dyn SimulationService>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl SimulationService for RecordingSimulationService {
    fn fetch_default_config(&self) -> SimulationFuture<'_, String> {
        Box::pin(async move {
            let result = self.inner.fetch_default_config().await;
            record_result(&self.recorder, PORT, "fetch_default_config", &json!({}), &result);
            result
        })
    }

    fn submit_simulation(&self, config: &str) -> SimulationFuture<'_, SubmitResponse> {
        let config = config.to_string();
        Box::pin(async move {
            let result = self.inner.submit_simulation(&config).await;
            record_result(
                &self.recorder,
                PORT,
                "submit_simulation",
                &json!({ "config": config }),
                &result,
            );
            result
        })
    }
}
