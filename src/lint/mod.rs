//! Linting: rule definitions, the GO001 loop-capture rule, and the
//! engine that drives them over files.

pub mod engine;
pub mod loop_capture;
pub mod matcher;
pub mod output;
pub mod rules;

pub use engine::{LintConfig, LintEngine};
pub use loop_capture::Options;
pub use output::{LintSummary, OutputFormat};
pub use rules::{print_rules, Diagnostic, DiagnosticSeverity, Range, RuleCode};
