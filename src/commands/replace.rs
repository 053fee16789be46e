//! `atmgen replace` command.

use std::io::Write;
use std::path::Path;

use crate::cli::GenerationArgs;
use crate::context::ServiceContext;
use crate::fixture::replace_field;
use crate::settings::Settings;

use super::{error_chain, make_rng, resolve_template};

/// Execute the `replace` command: rewrite `settings.field` in `file`.
///
/// # Errors
///
/// Returns an error string if the template or file cannot be loaded,
/// generation fails, or the file cannot be written.
pub fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    file: &Path,
    generation: &GenerationArgs,
    out: &mut dyn Write,
) -> Result<(), String> {
    let template = resolve_template(ctx, generation)?;
    let mut rng = make_rng(generation.seed);
    let records = replace_field(
        ctx.fs.as_ref(),
        file,
        &settings.field,
        &template,
        generation.count,
        &mut rng,
        &settings.generator_options(),
    )
    .map_err(|e| error_chain(&e))?;

    writeln!(
        out,
        "Replaced \"{}\" in {} with {} records",
        settings.field,
        file.display(),
        records.len()
    )
    .map_err(|e| format!("Failed to write output: {e}"))
}
