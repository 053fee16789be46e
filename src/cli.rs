//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `atmgen`.
#[derive(Debug, Parser)]
#[command(
    name = "atmgen",
    version,
    about = "Generate synthetic ATM fixtures and start simulations"
)]
pub struct Cli {
    /// YAML settings file (defaults to ./atmgen.yaml when present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command that generates records.
#[derive(Debug, Args)]
pub struct GenerationArgs {
    /// Number of records to generate.
    #[arg(short = 'n', long)]
    pub count: usize,
    /// Seed for reproducible identifiers.
    #[arg(long)]
    pub seed: Option<u64>,
    /// JSON file holding the template record.
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,
    /// Draws allowed per record before giving up.
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a JSON array of generated records.
    Generate {
        /// Generation options.
        #[command(flatten)]
        generation: GenerationArgs,
        /// Pretty-print the output.
        #[arg(long)]
        pretty: bool,
    },
    /// Replace the ATM list in a JSON config file with generated records.
    Replace {
        /// Config file to rewrite in place.
        file: PathBuf,
        /// Field holding the ATM list.
        #[arg(long)]
        field: Option<String>,
        /// Generation options.
        #[command(flatten)]
        generation: GenerationArgs,
    },
    /// Fetch the default config from the service and submit it.
    Simulate {
        /// Root URL of the simulation service.
        #[arg(long)]
        base_url: Option<String>,
    },
}
