//! Stratus command line interface.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stratus - weather entity caches and temperature statistics.
#[derive(Parser, Debug)]
#[command(name = "stratus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = "stratus.toml")]
    pub config: PathBuf,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Writes a default configuration file.
    Init {
        /// Target directory (default: current directory).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Serves JSON-RPC over stdin/stdout.
    Serve,

    /// Computes statistics for a location from a samples file.
    Stats {
        /// Location name.
        location: String,

        /// JSON array of {"location", "date", "temperature"} objects.
        #[arg(short, long)]
        samples: PathBuf,
    },

    /// Prints the effective configuration.
    Config,

    /// Shows the version.
    Version,
}
