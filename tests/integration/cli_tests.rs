//! Integration tests for CLI argument validation.
//!
//! Uses [`clap::Parser::try_parse_from`] to exercise clap-level validation
//! without spawning a subprocess.

use clap::Parser;
use std::path::PathBuf;

use loopcheck::cli::{Cli, Commands};
use loopcheck::lint::OutputFormat;

// =============================================================================
// HELPERS
// =============================================================================

/// Attempt to parse a command line, returning Ok(Cli) or the clap error string.
fn try_parse(args: &[&str]) -> Result<Cli, String> {
    Cli::try_parse_from(args).map_err(|e| e.to_string())
}

/// Shorthand: parse must succeed.
fn must_parse(args: &[&str]) -> Cli {
    try_parse(args).unwrap_or_else(|e| panic!("expected parse to succeed, got:\n{}", e))
}

/// Shorthand: parse must fail and the error must contain `needle`.
fn must_fail_containing(args: &[&str], needle: &str) {
    let err = try_parse(args).expect_err("expected parse to fail");
    assert!(
        err.contains(needle),
        "error does not contain '{}'. Full error:\n{}",
        needle,
        err,
    );
}

// =============================================================================
// check subcommand
// =============================================================================

#[test]
fn check_accepts_multiple_paths() {
    let cli = must_parse(&["loopcheck", "check", "src/", "cmd/tool/main.go"]);
    match cli.command {
        Commands::Check { paths, .. } => {
            assert_eq!(
                paths,
                vec![PathBuf::from("src/"), PathBuf::from("cmd/tool/main.go")]
            );
        }
        _ => panic!("expected Check command"),
    }
}

#[test]
fn check_without_paths_rejected() {
    must_fail_containing(&["loopcheck", "check"], "PATHS");
}

#[test]
fn check_format_values() {
    let cli = must_parse(&["loopcheck", "check", ".", "--format", "text"]);
    match cli.command {
        Commands::Check { format, .. } => assert_eq!(format, Some(OutputFormat::Text)),
        _ => panic!("expected Check command"),
    }
    must_fail_containing(&["loopcheck", "check", ".", "--format", "sarif"], "sarif");
}

#[test]
fn check_exclude_is_repeatable() {
    let cli = must_parse(&[
        "loopcheck",
        "check",
        ".",
        "--exclude",
        "vendor/**",
        "--exclude",
        "testdata/**",
    ]);
    match cli.command {
        Commands::Check { exclude, .. } => {
            assert_eq!(exclude, vec!["vendor/**", "testdata/**"]);
        }
        _ => panic!("expected Check command"),
    }
}

#[test]
fn check_exit_zero_flag() {
    let cli = must_parse(&["loopcheck", "check", ".", "--exit-zero"]);
    match cli.command {
        Commands::Check { exit_zero, .. } => assert!(exit_zero),
        _ => panic!("expected Check command"),
    }
}

// =============================================================================
// global flags and rules subcommand
// =============================================================================

#[test]
fn global_flags_parse_after_subcommand() {
    let cli = must_parse(&["loopcheck", "check", ".", "--debug", "--quiet"]);
    assert!(cli.debug);
    assert!(cli.quiet);
}

#[test]
fn config_flag_takes_a_path() {
    let cli = must_parse(&["loopcheck", "--config", "conf/lint.toml", "rules"]);
    assert_eq!(cli.config, Some(PathBuf::from("conf/lint.toml")));
    assert!(matches!(cli.command, Commands::Rules));
}

#[test]
fn rules_takes_no_positional_args() {
    assert!(try_parse(&["loopcheck", "rules", "extra"]).is_err());
}

#[test]
fn missing_subcommand_rejected() {
    assert!(try_parse(&["loopcheck"]).is_err());
}
