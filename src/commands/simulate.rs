//! `atmgen simulate` command.

use std::io::Write;

use crate::context::ServiceContext;
use crate::ports::simulation::{SimulationService, SubmitResponse};

/// Fetches the default config and submits it unchanged.
///
/// # Errors
///
/// Returns an error string if either call fails.
pub async fn start_simulation(service: &dyn SimulationService) -> Result<SubmitResponse, String> {
    let config = service
        .fetch_default_config()
        .await
        .map_err(|e| format!("Failed to fetch default config: {e}"))?;
    tracing::debug!(bytes = config.len(), "fetched default config");

    service
        .submit_simulation(&config)
        .await
        .map_err(|e| format!("Failed to submit simulation: {e}"))
}

/// Execute the `simulate` command: run both calls, print status and body.
///
/// # Errors
///
/// Returns an error string if a call fails or the service answers with a
/// non-2xx status (after printing it).
pub fn run(ctx: &ServiceContext, out: &mut dyn Write) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    let response = runtime.block_on(start_simulation(ctx.simulation.as_ref()))?;

    let body = serde_json::to_string_pretty(&response.body)
        .map_err(|e| format!("Failed to render response body: {e}"))?;
    writeln!(out, "{}\n{body}", response.status)
        .map_err(|e| format!("Failed to write output: {e}"))?;

    if response.is_success() {
        Ok(())
    } else {
        Err(format!("Simulation service answered with status {}", response.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::simulation::SimulationFuture;
    use serde_json::json;
    use std::sync::Mutex;

    type BoxError = Box<dyn std::error::Error + Send + Sync>;

    /// Echoes the submitted body back and remembers it.
    struct EchoService {
        config: String,
        status: u16,
        submitted: Mutex<Option<String>>,
    }

    impl EchoService {
        fn new(config: &str, status: u16) -> Self {
            Self { config: config.to_string(), status, submitted: Mutex::new(None) }
        }
    }

    impl SimulationService for EchoService {
        fn fetch_default_config(&self) -> SimulationFuture<'_, String> {
            let config: Result<String, BoxError> = Ok(self.config.clone());
            Box::pin(async move { config })
        }

        fn submit_simulation(&self, config: &str) -> SimulationFuture<'_, SubmitResponse> {
            *self.submitted.lock().unwrap() = Some(config.to_string());
            let response: Result<SubmitResponse, BoxError> = serde_json::from_str(config)
                .map(|body| SubmitResponse { status: self.status, body })
                .map_err(Into::into);
            Box::pin(async move { response })
        }
    }

    #[tokio::test]
    async fn forwards_fetched_config_byte_for_byte() {
        let raw = "{\"atms\": [ {\"name\": 1, \"location\": [1.0, 2.0]} ]}";
        let service = EchoService::new(raw, 200);

        let response = start_simulation(&service).await.unwrap();

        assert_eq!(service.submitted.lock().unwrap().as_deref(), Some(raw));
        assert_eq!(response.status, 200);
        assert_eq!(response.body["atms"][0]["name"], json!(1));
    }

    #[test]
    fn prints_status_and_body() {
        let ctx = ServiceContext::from_parts(
            Box::new(crate::adapters::live::filesystem::LiveFileSystem),
            Box::new(EchoService::new("{\"ok\":true}", 200)),
        );
        let mut out = Vec::new();
        run(&ctx, &mut out).unwrap();

        let stdout = String::from_utf8(out).unwrap();
        assert!(stdout.starts_with("200\n"));
        assert!(stdout.contains("\"ok\": true"));
    }

    #[test]
    fn non_success_status_fails_after_printing() {
        let ctx = ServiceContext::from_parts(
            Box::new(crate::adapters::live::filesystem::LiveFileSystem),
            Box::new(EchoService::new("{\"error\":\"bad\"}", 400)),
        );
        let mut out = Vec::new();
        let err = run(&ctx, &mut out).unwrap_err();

        assert!(err.contains("400"));
        assert!(String::from_utf8(out).unwrap().starts_with("400\n"));
    }
}
