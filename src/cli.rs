//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::lint::OutputFormat;

/// loopcheck: find Go loop variables captured by escaping func literals.
#[derive(Debug, Parser)]
#[command(name = "loopcheck", version, about)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-diagnostic output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a .loopcheck.toml config file (default: auto-discover
    /// from the current directory up to the repository root).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check Go files and directories for loop-variable captures.
    Check {
        /// Files and directories to check.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Also flag parallel subtests (`t.Run` with `t.Parallel()`).
        #[arg(long)]
        parallel_subtests: bool,

        /// Glob patterns to skip during directory walks (repeatable).
        #[arg(long, value_name = "GLOB")]
        exclude: Vec<String>,

        /// Output format.
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Exit with code 0 even when issues are found.
        #[arg(long)]
        exit_zero: bool,
    },

    /// List available rules.
    Rules,
}
