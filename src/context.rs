//! Service context bundling the port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::simulation::LiveSimulationService;
use crate::adapters::recording::RecordingSimulationService;
use crate::adapters::replaying::ReplayingSimulationService;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::filesystem::FileSystem;
use crate::ports::simulation::SimulationService;
use crate::settings::Settings;

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live, recording,
/// replaying). The filesystem is always live; only the simulation service
/// is recorded or replayed.
pub struct ServiceContext {
    /// Filesystem for config and template files.
    pub fs: Box<dyn FileSystem>,
    /// Client for the simulation service.
    pub simulation: Box<dyn SimulationService>,
    /// Shared with the recording adapter; saved when the context is dropped.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context talking to `settings.base_url`.
    #[must_use]
    pub fn live(settings: &Settings) -> Self {
        Self::from_parts(
            Box::new(LiveFileSystem),
            Box::new(LiveSimulationService::new(settings.base_url.as_str())),
        )
    }

    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn from_parts(fs: Box<dyn FileSystem>, simulation: Box<dyn SimulationService>) -> Self {
        Self { fs, simulation, recorder: None }
    }

    /// Creates a live context that also records every simulation call.
    ///
    /// The cassette is written to `path` when this context is dropped, unless
    /// nothing was recorded.
    #[must_use]
    pub fn recording(path: &Path, settings: &Settings) -> Self {
        let recorder = Arc::new(Mutex::new(
            CassetteRecorder::new(path, "atmgen-session").with_base_url(settings.base_url.as_str()),
        ));
        let live = Box::new(LiveSimulationService::new(settings.base_url.as_str()));

        Self {
            fs: Box::new(LiveFileSystem),
            simulation: Box::new(RecordingSimulationService::new(live, Arc::clone(&recorder))),
            recorder: Some(recorder),
        }
    }

    /// Creates a context whose simulation calls are served from the cassette
    /// at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let replayer = CassetteReplayer::new(&Cassette::load(path)?);
        tracing::debug!(
            path = %path.display(),
            count = replayer.remaining(),
            "replaying cassette"
        );
        Ok(Self::from_parts(
            Box::new(LiveFileSystem),
            Box::new(ReplayingSimulationService::new(replayer)),
        ))
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let result = match recorder.lock() {
                Ok(guard) if guard.is_empty() => {
                    tracing::debug!("no simulation calls recorded, cassette left alone");
                    Ok(())
                }
                Ok(guard) => guard.save().map(drop).map_err(|e| e.to_string()),
                Err(e) => Err(format!("recorder lock poisoned: {e}")),
            };
            if let Err(e) = result {
                tracing::warn!("failed to write cassette: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn replaying_context_serves_simulation_from_cassette() {
        let dir = std::env::temp_dir().join("atmgen_ctx_replaying");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sim.cassette.yaml");
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            base_url: None,
            interactions: vec![Interaction {
                seq: 0,
                port: "simulation".into(),
                method: "fetch_default_config".into(),
                input: json!({}),
                output: json!({"ok": "{\"atms\":[]}"}),
            }],
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert_eq!(ctx.simulation.fetch_default_config().await.unwrap(), "{\"atms\":[]}");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn replaying_missing_cassette_errors() {
        let err = ServiceContext::replaying(Path::new("/nonexistent/sim.cassette.yaml"))
            .err()
            .unwrap();
        assert!(err.contains("Failed to read cassette file"));
    }

    #[tokio::test]
    async fn recording_context_writes_cassette_on_drop() {
        let dir = std::env::temp_dir().join("atmgen_ctx_recording");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("session.cassette.yaml");
        let settings = Settings { base_url: "http://127.0.0.1:9".into(), ..Settings::default() };

        {
            let ctx = ServiceContext::recording(&path, &settings);
            assert!(ctx.simulation.fetch_default_config().await.is_err());
        }

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.base_url.as_deref(), Some("http://127.0.0.1:9"));
        assert_eq!(cassette.interactions.len(), 1);
        assert!(cassette.interactions[0].output.get("err").is_some());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unused_recording_context_keeps_existing_cassette() {
        let dir = std::env::temp_dir().join("atmgen_ctx_recording_unused");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.cassette.yaml");
        std::fs::write(&path, "previous recording").unwrap();

        drop(ServiceContext::recording(&path, &Settings::default()));

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous recording");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
