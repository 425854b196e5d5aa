//! Diagnostic rendering: human-readable text and machine-readable JSON.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::ValueEnum;
use serde_json::json;

use super::rules::Diagnostic;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One `file:line:col: severity: message [CODE]` line per diagnostic.
    #[default]
    Text,
    /// A single JSON document with diagnostics and summary.
    Json,
}

/// Counts for the end-of-run summary line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintSummary {
    pub files_checked: usize,
    pub files_with_issues: usize,
    pub total_diagnostics: usize,
}

impl LintSummary {
    pub fn tally(files_checked: usize, diagnostics: &[Diagnostic]) -> Self {
        let files_with_issues: HashSet<&PathBuf> =
            diagnostics.iter().map(|d| &d.file).collect();
        Self {
            files_checked,
            files_with_issues: files_with_issues.len(),
            total_diagnostics: diagnostics.len(),
        }
    }
}

/// Print the full report to stdout.
pub fn print_report(
    diagnostics: &[Diagnostic],
    summary: &LintSummary,
    format: OutputFormat,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_report(&mut handle, diagnostics, summary, format)
}

fn write_report(
    out: &mut impl Write,
    diagnostics: &[Diagnostic],
    summary: &LintSummary,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            for diag in diagnostics {
                writeln!(
                    out,
                    "{}:{}:{}: {}: {} [{}]",
                    diag.file.display(),
                    diag.range.start_line,
                    diag.range.start_col,
                    diag.severity,
                    diag.message,
                    diag.rule,
                )?;
            }
            if summary.total_diagnostics == 0 {
                writeln!(out, "No issues found ({} file(s) checked).", summary.files_checked)?;
            } else {
                writeln!(
                    out,
                    "\n{} issue(s) in {} file(s) ({} file(s) checked).",
                    summary.total_diagnostics,
                    summary.files_with_issues,
                    summary.files_checked,
                )?;
            }
        }
        OutputFormat::Json => {
            let doc = json!({
                "diagnostics": diagnostics.iter().map(|d| {
                    json!({
                        "rule": d.rule.as_str(),
                        "name": d.rule.name(),
                        "severity": d.severity.to_string(),
                        "file": d.file,
                        "range": {
                            "start_line": d.range.start_line,
                            "start_col": d.range.start_col,
                            "end_line": d.range.end_line,
                            "end_col": d.range.end_col,
                        },
                        "message": d.message,
                    })
                }).collect::<Vec<_>>(),
                "summary": {
                    "files_checked": summary.files_checked,
                    "files_with_issues": summary.files_with_issues,
                    "total_diagnostics": summary.total_diagnostics,
                },
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
        }
    }
    Ok(())
}
