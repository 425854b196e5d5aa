//! `.loopcheck.toml` configuration file support.
//!
//! Provides deserialization, discovery (walk up to `.git` root), and merging
//! with CLI flags. CLI flags always take precedence over file config.
//!
//! # Example config
//!
//! ```toml
//! [rules]
//! parallel_subtests = true
//!
//! [files]
//! exclude = ["vendor/**", "testdata/**"]
//!
//! [output]
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use ignore::overrides::OverrideBuilder;
use serde::{Deserialize, Serialize};

use crate::error::{LoopcheckError, Result};

/// Top-level `.loopcheck.toml` configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LintFileConfig {
    /// Rule toggles.
    #[serde(default)]
    pub rules: RulesConfig,

    /// File exclude patterns.
    #[serde(default)]
    pub files: FilesConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Rule toggles.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Treat parallel subtests (`t.Run` + `t.Parallel()`) as escape
    /// points for GO001. Off by default.
    #[serde(default)]
    pub parallel_subtests: bool,
}

/// File exclude glob patterns, applied during directory walks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
    /// Glob patterns for files to exclude.
    /// Example: `["vendor/**", "testdata/**"]`
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Output settings (can be overridden by CLI flags).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format: "text" or "json".
    #[serde(default)]
    pub format: Option<String>,

    /// Quiet mode: suppress non-diagnostic output.
    #[serde(default)]
    pub quiet: bool,
}

impl LintFileConfig {
    /// Parse a `.loopcheck.toml` file from a string.
    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load a `.loopcheck.toml` file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| LoopcheckError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate semantic constraints that TOML schema cannot express.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref fmt) = self.output.format {
            if !["text", "json"].contains(&fmt.as_str()) {
                return Err(LoopcheckError::Config(format!(
                    "invalid output format '{}' (valid: text, json)",
                    fmt
                )));
            }
        }

        // Exclude patterns must compile the same way the engine builds them.
        let mut probe = OverrideBuilder::new(".");
        for pattern in &self.files.exclude {
            probe.add(&format!("!{}", pattern))?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config file discovery
// ---------------------------------------------------------------------------

/// Name of the config file.
pub const CONFIG_FILE_NAME: &str = ".loopcheck.toml";

/// Discover a `.loopcheck.toml` by walking up from `start_dir` to the
/// repository root (directory containing `.git`).
///
/// Returns `None` if no config file is found before reaching the filesystem
/// root or the `.git` boundary.
pub fn discover_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = if start_dir.is_file() {
        start_dir.parent()?.to_path_buf()
    } else {
        start_dir.to_path_buf()
    };

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        // Stop at .git root (the config should live at or below the repo root).
        if current.join(".git").exists() {
            return None;
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

/// Discover and load the config file, returning the parsed config and
/// its path. Returns `Ok(None)` if no config file is found.
pub fn discover_and_load_config(start_dir: &Path) -> Result<Option<(LintFileConfig, PathBuf)>> {
    match discover_config(start_dir) {
        Some(path) => {
            let config = LintFileConfig::load(&path)?;
            Ok(Some((config, path)))
        }
        None => Ok(None),
    }
}
