//! `atmgen generate` command.

use std::io::Write;

use crate::cli::GenerationArgs;
use crate::context::ServiceContext;
use crate::generator::generate;
use crate::settings::Settings;

use super::{error_chain, make_rng, resolve_template};

/// Execute the `generate` command: print a JSON array of records to `out`.
///
/// # Errors
///
/// Returns an error string if the template cannot be loaded, generation
/// fails, or output cannot be written.
pub fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    generation: &GenerationArgs,
    pretty: bool,
    out: &mut dyn Write,
) -> Result<(), String> {
    let template = resolve_template(ctx, generation)?;
    let mut rng = make_rng(generation.seed);
    let records = generate(&template, generation.count, &mut rng, &settings.generator_options())
        .map_err(|e| error_chain(&e))?;

    let json = if pretty {
        serde_json::to_string_pretty(&records)
    } else {
        crate::fixture::records_json(&records)
    }
    .map_err(|e| format!("Failed to serialize records: {e}"))?;

    writeln!(out, "{json}").map_err(|e| format!("Failed to write output: {e}"))
}
