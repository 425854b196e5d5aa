//! loopcheck: a linter for Go loop-variable capture bugs.
//!
//! # Usage
//!
//! ```bash
//! # Check files or directories
//! loopcheck check src/
//!
//! # Include parallel subtests as escape points
//! loopcheck check --parallel-subtests ./...
//!
//! # Machine-readable output
//! loopcheck check --format json src/
//!
//! # List rules
//! loopcheck rules
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use loopcheck::cli::{Cli, Commands};
use loopcheck::error::exit_code;
use loopcheck::lint::{print_rules, LintConfig, LintEngine, OutputFormat};
use loopcheck::lint_config::{discover_and_load_config, LintFileConfig};

fn main() {
    let cli = Cli::parse();

    // Config is loaded before logging starts so its quiet setting can
    // shape the log level.
    let (file_config, config_path) = load_file_config(&cli);

    // Initialize logging to stderr; stdout is reserved for diagnostics.
    let quiet = cli.quiet
        || file_config
            .as_ref()
            .is_some_and(|fc| fc.output.quiet);
    let log_level = if cli.debug {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(exit_code::INTERNAL_ERROR);
    }
    if let Some(path) = config_path {
        info!("Using config: {}", path.display());
    }

    match cli.command {
        Commands::Check {
            paths,
            parallel_subtests,
            exclude,
            format,
            exit_zero,
        } => {
            let config = build_lint_config(parallel_subtests, exclude, &file_config);
            let format = resolve_format(format, &file_config);
            let engine = LintEngine::new(config);
            let code = engine.check(&paths, format);
            if exit_zero {
                std::process::exit(exit_code::CLEAN);
            }
            std::process::exit(code);
        }
        Commands::Rules => {
            print_rules();
        }
    }
}

/// Load the `.loopcheck.toml` config file, respecting --config. Runs
/// before the tracing subscriber exists, so failures go to stderr
/// directly.
fn load_file_config(cli: &Cli) -> (Option<LintFileConfig>, Option<PathBuf>) {
    if let Some(ref explicit_path) = cli.config {
        match LintFileConfig::load(explicit_path) {
            Ok(config) => return (Some(config), Some(explicit_path.clone())),
            Err(e) => {
                eprintln!("Error loading config {}: {}", explicit_path.display(), e);
                std::process::exit(exit_code::CONFIG_ERROR);
            }
        }
    }

    // Auto-discover config file from CWD upwards.
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match discover_and_load_config(&cwd) {
        Ok(Some((config, path))) => (Some(config), Some(path)),
        Ok(None) => (None, None),
        Err(e) => {
            eprintln!("Warning: failed to load .loopcheck.toml: {}", e);
            (None, None)
        }
    }
}

/// Merge CLI flags with the file config. CLI flags take precedence;
/// the parallel-subtests flag is an enable-only toggle, so either source
/// can switch it on.
fn build_lint_config(
    cli_parallel_subtests: bool,
    cli_exclude: Vec<String>,
    file_config: &Option<LintFileConfig>,
) -> LintConfig {
    let parallel_subtests = cli_parallel_subtests
        || file_config
            .as_ref()
            .is_some_and(|fc| fc.rules.parallel_subtests);
    let exclude = if cli_exclude.is_empty() {
        file_config
            .as_ref()
            .map(|fc| fc.files.exclude.clone())
            .unwrap_or_default()
    } else {
        cli_exclude
    };
    LintConfig {
        parallel_subtests,
        exclude,
    }
}

fn resolve_format(
    cli_format: Option<OutputFormat>,
    file_config: &Option<LintFileConfig>,
) -> OutputFormat {
    if let Some(format) = cli_format {
        return format;
    }
    match file_config
        .as_ref()
        .and_then(|fc| fc.output.format.as_deref())
    {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    }
}
