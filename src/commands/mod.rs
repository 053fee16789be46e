//! Command dispatch and handlers.

pub mod generate;
pub mod replace;
pub mod simulate;

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::cli::{Cli, Command, GenerationArgs};
use crate::context::ServiceContext;
use crate::fixture;
use crate::record::AtmRecord;
use crate::settings::Settings;

/// Cassette file to record simulation calls into.
pub const RECORD_ENV: &str = "ATMGEN_RECORD";

/// Cassette file to replay simulation calls from.
pub const REPLAY_ENV: &str = "ATMGEN_REPLAY";

/// Dispatch a parsed command line to its handler.
///
/// Settings are resolved from the settings file and `ATMGEN_*` variables,
/// then overridden by flags. For `simulate`, `ATMGEN_REPLAY` serves the
/// simulation service from a cassette and `ATMGEN_RECORD` records into one;
/// the other commands never call the service and always run live.
///
/// # Errors
///
/// Returns an error string if settings are invalid or the handler fails.
pub fn dispatch(cli: &Cli, out: &mut dyn Write) -> Result<(), String> {
    let mut settings = Settings::load(&LiveFileSystem, cli.config.as_deref())?;
    settings.apply_env(|key| env::var(key).ok())?;
    apply_flags(&mut settings, &cli.command);
    settings.validate()?;
    tracing::debug!(?settings, "resolved settings");

    let ctx = select_context(&cli.command, &settings, |key| env::var(key).ok())?;
    dispatch_with_context(&cli.command, &ctx, &settings, out)
}

/// Picks the live, recording, or replaying context for `command`.
fn select_context<F>(
    command: &Command,
    settings: &Settings,
    lookup: F,
) -> Result<ServiceContext, String>
where
    F: Fn(&str) -> Option<String>,
{
    if !matches!(command, Command::Simulate { .. }) {
        return Ok(ServiceContext::live(settings));
    }
    if let Some(path) = lookup(REPLAY_ENV) {
        tracing::info!(%path, "replaying simulation calls");
        ServiceContext::replaying(Path::new(&path))
    } else if let Some(path) = lookup(RECORD_ENV) {
        tracing::info!(%path, "recording simulation calls");
        Ok(ServiceContext::recording(&PathBuf::from(path), settings))
    } else {
        Ok(ServiceContext::live(settings))
    }
}

/// Dispatch a command with the given service context and settings.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<(), String> {
    match command {
        Command::Generate { generation, pretty } => {
            generate::run(ctx, settings, generation, *pretty, out)
        }
        Command::Replace { file, generation, .. } => {
            replace::run(ctx, settings, file, generation, out)
        }
        Command::Simulate { .. } => simulate::run(ctx, out),
    }
}

fn apply_flags(settings: &mut Settings, command: &Command) {
    match command {
        Command::Generate { generation, .. } => apply_generation_flags(settings, generation),
        Command::Replace { field, generation, .. } => {
            if let Some(field) = field {
                settings.field.clone_from(field);
            }
            apply_generation_flags(settings, generation);
        }
        Command::Simulate { base_url } => {
            if let Some(url) = base_url {
                settings.base_url.clone_from(url);
            }
        }
    }
}

fn apply_generation_flags(settings: &mut Settings, generation: &GenerationArgs) {
    if let Some(max_attempts) = generation.max_attempts {
        settings.max_attempts = max_attempts;
    }
}

/// RNG for one run: seeded when asked, OS entropy otherwise.
fn make_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

/// Template from `--template`, or the built-in one.
fn resolve_template(
    ctx: &ServiceContext,
    generation: &GenerationArgs,
) -> Result<AtmRecord, String> {
    match &generation.template {
        Some(path) => fixture::load_template(ctx.fs.as_ref(), path).map_err(|e| error_chain(&e)),
        None => Ok(AtmRecord::default()),
    }
}

/// Renders an error and its sources as `outer: inner: ...`.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
