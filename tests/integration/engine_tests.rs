//! Integration tests for the lint engine: file collection, exclusion
//! patterns, and per-file error tolerance over real temporary files.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use loopcheck::lint::{LintConfig, LintEngine};

// =============================================================================
// HELPERS
// =============================================================================

/// Create a file inside `dir` (creating parents) and return its absolute path.
fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create_dir_all failed");
    }
    fs::write(&path, content).expect("write_file failed");
    path
}

const BUGGY: &str = "package main\n\nfunc main() {\n\tfor i := range []int{1} {\n\t\tgo func() { println(i) }()\n\t}\n}\n";
const CLEAN: &str = "package main\n\nfunc main() {\n\tfor i := range []int{1} {\n\t\tprintln(i)\n\t}\n}\n";

fn engine() -> LintEngine {
    LintEngine::new(LintConfig::default())
}

// =============================================================================
// Per-file checking
// =============================================================================

#[test]
fn check_file_reports_capture() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(tmp.path(), "main.go", BUGGY);
    let diags = engine().check_file(&path);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].file, path);
    assert_eq!(
        diags[0].message,
        "loop variable i captured by func literal"
    );
}

#[test]
fn clean_file_yields_nothing() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(tmp.path(), "main.go", CLEAN);
    assert!(engine().check_file(&path).is_empty());
}

#[test]
fn missing_file_is_tolerated() {
    let tmp = TempDir::new().unwrap();
    let diags = engine().check_file(&tmp.path().join("nope.go"));
    assert!(diags.is_empty());
}

#[test]
fn non_utf8_file_is_tolerated() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.go");
    fs::write(&path, [0xffu8, 0xfe, 0x00, 0x80]).unwrap();
    assert!(engine().check_file(&path).is_empty());
}

// =============================================================================
// Directory walks
// =============================================================================

#[test]
fn directory_walk_finds_nested_go_files_in_order() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "b/sub.go", BUGGY);
    write_file(tmp.path(), "a.go", BUGGY);
    write_file(tmp.path(), "notes.txt", "not go");
    write_file(tmp.path(), "c.rs", "fn main() {}");

    let code = engine().check(
        &[tmp.path().to_path_buf()],
        loopcheck::lint::OutputFormat::Text,
    );
    assert_eq!(code, loopcheck::exit_code::LINT_ISSUES);
}

#[test]
fn exclude_patterns_skip_matching_files() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "vendor/dep.go", BUGGY);
    write_file(tmp.path(), "main.go", CLEAN);

    let excluding = LintEngine::new(LintConfig {
        exclude: vec!["vendor/**".to_string()],
        ..LintConfig::default()
    });
    let code = excluding.check(
        &[tmp.path().to_path_buf()],
        loopcheck::lint::OutputFormat::Text,
    );
    assert_eq!(code, loopcheck::exit_code::CLEAN);

    // Without the pattern the vendored bug is found.
    let code = engine().check(
        &[tmp.path().to_path_buf()],
        loopcheck::lint::OutputFormat::Text,
    );
    assert_eq!(code, loopcheck::exit_code::LINT_ISSUES);
}

#[test]
fn gitignore_is_respected_inside_a_repo() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join(".git")).unwrap();
    write_file(tmp.path(), ".gitignore", "generated/\n");
    write_file(tmp.path(), "generated/gen.go", BUGGY);
    write_file(tmp.path(), "main.go", CLEAN);

    let code = engine().check(
        &[tmp.path().to_path_buf()],
        loopcheck::lint::OutputFormat::Text,
    );
    assert_eq!(code, loopcheck::exit_code::CLEAN);
}

#[test]
fn explicit_file_path_bypasses_exclusion() {
    let tmp = TempDir::new().unwrap();
    let vendored = write_file(tmp.path(), "vendor/dep.go", BUGGY);

    let excluding = LintEngine::new(LintConfig {
        exclude: vec!["vendor/**".to_string()],
        ..LintConfig::default()
    });
    // Naming the file directly still checks it.
    assert_eq!(excluding.check_file(&vendored).len(), 1);
}

#[test]
fn check_returns_clean_for_empty_directory() {
    let tmp = TempDir::new().unwrap();
    let code = engine().check(
        &[tmp.path().to_path_buf()],
        loopcheck::lint::OutputFormat::Text,
    );
    assert_eq!(code, loopcheck::exit_code::CLEAN);
}
