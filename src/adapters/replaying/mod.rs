//! Replaying adapters that serve recorded interactions.

pub mod simulation;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

pub use simulation::ReplayingSimulationService;

/// Pull the next recorded output for `port`/`method`.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, Box<dyn std::error::Error + Send + Sync>> {
    let mut replayer = replayer.lock().map_err(|e| format!("replayer lock poisoned: {e}"))?;
    let interaction = replayer.next_interaction(port, method)?;
    Ok(interaction.output)
}

/// Turn a recorded `{"ok": v}` / `{"err": "msg"}` output back into a `Result`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}
