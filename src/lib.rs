//! Core library for `atmgen`: synthetic ATM fixtures for the simulation service.
//!
//! The generator and fixture functions are usable directly; the CLI in
//! [`run`] wires them to settings, the filesystem, and the service.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod context;
pub mod fixture;
pub mod generator;
pub mod logging;
pub mod ports;
pub mod record;
pub mod settings;

use clap::Parser;

pub use fixture::{load_template, records_json, replace_field, FixtureError};
pub use generator::{generate, GenerateError, GeneratorOptions, IdentifierPool, IDENTIFIER_SPACE};
pub use record::{AtmRecord, Location};

/// Run the CLI with the provided arguments, writing command output to stdout.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::dispatch(&cli, &mut out)
}
