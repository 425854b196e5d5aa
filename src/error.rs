//! Error types for the loopcheck linter.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

/// Process exit codes for the loopcheck CLI.
///
/// These follow a Unix-style convention where 0 is success and higher
/// values indicate increasingly severe problems.
pub mod exit_code {
    /// No issues found (clean).
    pub const CLEAN: i32 = 0;
    /// Lint issues were found.
    pub const LINT_ISSUES: i32 = 1;
    /// Configuration error (bad config file, invalid CLI args).
    pub const CONFIG_ERROR: i32 = 2;
    /// I/O error (file not found, permission denied, etc.).
    pub const IO_ERROR: i32 = 3;
    /// Internal error (bug in loopcheck itself).
    pub const INTERNAL_ERROR: i32 = 4;
}

// ---------------------------------------------------------------------------
// Lint errors
// ---------------------------------------------------------------------------

/// Errors that can occur while linting.
///
/// None of these arise from the rule itself: an unresolvable binding or an
/// unexpected node shape is a silent non-match, never an error. These cover
/// the surrounding infrastructure (file I/O, configuration, parser setup).
#[derive(Error, Debug)]
pub enum LoopcheckError {
    #[error("I/O error reading {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("file is not valid UTF-8: {path}")]
    Encoding { path: PathBuf },

    #[error("parse error in {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] ignore::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("tree-sitter grammar error: {0}")]
    Grammar(String),
}

pub type Result<T> = std::result::Result<T, LoopcheckError>;
