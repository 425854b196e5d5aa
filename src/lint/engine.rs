//! Lint engine that orchestrates file collection and rule checking.
//!
//! Files are collected up front (sorted, for deterministic processing
//! order) and checked in parallel with rayon. Each file gets its own
//! parse and resolver, so rule invocations share no mutable state.

use std::path::{Path, PathBuf};

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::ast::SourceFile;
use crate::error::{exit_code, Result};
use crate::resolve::FileResolver;

use super::loop_capture::{self, Options};
use super::output::{print_report, LintSummary, OutputFormat};
use super::rules::Diagnostic;

/// Configuration for the lint engine.
#[derive(Debug, Clone, Default)]
pub struct LintConfig {
    /// Enable the parallel-subtest escape point (GO001).
    pub parallel_subtests: bool,
    /// Glob patterns for files to skip during directory walks.
    pub exclude: Vec<String>,
}

/// The main lint engine.
pub struct LintEngine {
    config: LintConfig,
}

impl LintEngine {
    /// Create a new lint engine with the given configuration.
    pub fn new(config: LintConfig) -> Self {
        Self { config }
    }

    /// Check files and directories, print the report, and return the
    /// process exit code.
    pub fn check(&self, paths: &[PathBuf], format: OutputFormat) -> i32 {
        info!("Checking {} path(s)", paths.len());

        let files = self.collect_files(paths);
        info!("Found {} Go file(s)", files.len());

        // rayon's indexed collect preserves file order, and within a file
        // diagnostics stay in visit order; no sorting happens afterwards.
        let diagnostics: Vec<Diagnostic> = files
            .par_iter()
            .flat_map_iter(|file| self.check_file(file))
            .collect();

        let summary = LintSummary::tally(files.len(), &diagnostics);
        if let Err(e) = print_report(&diagnostics, &summary, format) {
            eprintln!("Error printing report: {}", e);
        }

        if diagnostics.is_empty() {
            exit_code::CLEAN
        } else {
            exit_code::LINT_ISSUES
        }
    }

    /// Check one file from disk. Unreadable or unparsable files are
    /// logged and skipped; they never abort the run.
    pub fn check_file(&self, path: &Path) -> Vec<Diagnostic> {
        match SourceFile::open(path) {
            Ok(file) => self.run_rules(&file),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Check in-memory content without disk I/O.
    pub fn check_content(&self, path: impl Into<PathBuf>, content: String) -> Result<Vec<Diagnostic>> {
        let file = SourceFile::parse(path, content)?;
        Ok(self.run_rules(&file))
    }

    fn run_rules(&self, file: &SourceFile) -> Vec<Diagnostic> {
        let resolver = FileResolver::build(file.root(), file.bytes());
        let options = Options {
            parallel_subtests: self.config.parallel_subtests,
        };
        let diagnostics = loop_capture::check(file, &resolver, &options);
        debug!(
            "{}: {} diagnostic(s)",
            file.path().display(),
            diagnostics.len()
        );
        diagnostics
    }

    // -----------------------------------------------------------------------
    // File collection
    // -----------------------------------------------------------------------

    /// Collect Go files from the given paths, in sorted order.
    ///
    /// Directories are walked with gitignore rules applied; configured
    /// exclude patterns are layered on top. Files named explicitly are
    /// taken as-is (no exclusion applies).
    fn collect_files(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for path in paths {
            if !path.exists() {
                warn!("Path does not exist: {}", path.display());
                continue;
            }
            if path.is_file() {
                if is_go_file(path) {
                    files.push(path.clone());
                }
            } else {
                self.collect_dir(path, &mut files);
            }
        }
        files.sort();
        files.dedup();
        files
    }

    fn collect_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let mut builder = WalkBuilder::new(dir);
        builder.follow_links(false);
        if !self.config.exclude.is_empty() {
            let mut overrides = OverrideBuilder::new(dir);
            for pattern in &self.config.exclude {
                // Overrides whitelist by default; a leading `!` excludes.
                if let Err(e) = overrides.add(&format!("!{}", pattern)) {
                    warn!("Invalid exclude pattern '{}': {}", pattern, e);
                }
            }
            match overrides.build() {
                Ok(built) => {
                    builder.overrides(built);
                }
                Err(e) => warn!("Failed to build exclude patterns: {}", e),
            }
        }
        for entry in builder.build() {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|t| t.is_file());
                    if is_file && is_go_file(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => warn!("Walk error under {}: {}", dir.display(), e),
            }
        }
    }
}

fn is_go_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_go_file() {
        assert!(is_go_file(Path::new("main.go")));
        assert!(is_go_file(Path::new("dir/sub/loop_test.go")));
        assert!(!is_go_file(Path::new("main.rs")));
        assert!(!is_go_file(Path::new("go")));
    }

    #[test]
    fn check_content_reports_capture() {
        let engine = LintEngine::new(LintConfig::default());
        let diags = engine
            .check_content(
                "m.go",
                concat!(
                    "package main\n\n",
                    "func main() {\n",
                    "\tfor i := range []int{1} {\n",
                    "\t\tgo func() { println(i) }()\n",
                    "\t}\n",
                    "}\n",
                )
                .to_string(),
            )
            .unwrap();
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn config_toggle_reaches_the_rule() {
        let src = concat!(
            "package main\n\n",
            "import \"testing\"\n\n",
            "func TestAll(t *testing.T) {\n",
            "\tfor _, tc := range []string{\"a\"} {\n",
            "\t\tt.Run(tc, func(t *testing.T) {\n",
            "\t\t\tt.Parallel()\n",
            "\t\t\tprintln(tc)\n",
            "\t\t})\n",
            "\t\tprintln(\"next\")\n",
            "\t}\n",
            "}\n",
        );
        let off = LintEngine::new(LintConfig::default());
        assert!(off.check_content("t.go", src.to_string()).unwrap().is_empty());

        let on = LintEngine::new(LintConfig {
            parallel_subtests: true,
            ..LintConfig::default()
        });
        assert_eq!(on.check_content("t.go", src.to_string()).unwrap().len(), 1);
    }
}
