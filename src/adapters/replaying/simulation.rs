//! Replaying adapter for the `SimulationService` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::simulation::{SimulationFuture, SimulationService, SubmitResponse};

const PORT: &str = "simulation";

/// Serves recorded simulation responses from a cassette.
pub struct ReplayingSimulationService {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingSimulationService {
    /// Creates a replaying service backed by `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl SimulationService for ReplayingSimulationService {
    fn fetch_default_config(&self) -> SimulationFuture<'_, String> {
        let output = next_output(&self.replayer, PORT, "fetch_default_config");
        Box::pin(async move {
            output.and_then(|o| replay_result::<String>(&o, "simulation::fetch_default_config"))
        })
    }

    fn submit_simulation(&self, _config: &str) -> SimulationFuture<'_, SubmitResponse> {
        let output = next_output(&self.replayer, PORT, "submit_simulation");
        Box::pin(async move {
            output.and_then(|o| {
                replay_result::<SubmitResponse>(&o, "simulation::submit_simulation")
            })
        })
    }
}
