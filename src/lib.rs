//! Loop-variable capture linter for Go.
//!
//! Detects func literals defined inside loop bodies that capture the
//! loop's variables by reference and escape the iteration through `go`,
//! `defer`, `errgroup.Group.Go`, or parallel subtests.

pub mod ast;
pub mod cli;
pub mod error;
pub mod lint;
pub mod lint_config;
pub mod resolve;

pub use cli::{Cli, Commands};
pub use error::{exit_code, LoopcheckError, Result};
pub use lint::{Diagnostic, LintConfig, LintEngine, Options, OutputFormat, RuleCode};
pub use lint_config::{
    discover_and_load_config, discover_config, LintFileConfig, CONFIG_FILE_NAME,
};
pub use resolve::{FileResolver, Resolver};
