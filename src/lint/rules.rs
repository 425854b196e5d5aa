//! Lint rule definitions and diagnostic types.

use std::fmt;
use std::path::PathBuf;

use tree_sitter::Node;

/// Rule codes for Go linting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleCode {
    /// GO001: Loop variable captured by an escaping func literal.
    GO001,
}

impl RuleCode {
    /// Parse a rule code from string (e.g., "GO001").
    pub fn parse_code(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GO001" => Some(RuleCode::GO001),
            _ => None,
        }
    }

    /// All available rule codes.
    pub fn all() -> &'static [RuleCode] {
        &[RuleCode::GO001]
    }

    /// Short name for the rule.
    pub fn name(&self) -> &'static str {
        match self {
            RuleCode::GO001 => "loop-capture",
        }
    }

    /// Detailed description of what the rule checks.
    pub fn description(&self) -> &'static str {
        match self {
            RuleCode::GO001 => {
                "Detects references to enclosing loop variables from within nested \
                 function literals that may outlive the loop iteration.\n\
                 \n\
                 The Go statement `go`, the `defer` statement, and delegated calls such \
                 as `errgroup.Group.Go` start or schedule work that can run after the \
                 iteration advances. A func literal passed to them that reads a loop \
                 variable by reference observes whatever value the variable holds when \
                 the literal finally runs, which is rarely the iteration it was created \
                 in:\n\
                 \n\
                 \tfor i, v := range s {\n\
                 \t\tgo func() {\n\
                 \t\t\tprintln(i, v) // all goroutines may see the final i, v\n\
                 \t\t}()\n\
                 \t}\n\
                 \n\
                 Only `go` and `defer` appearing as the last statement of the loop body \
                 are flagged: an earlier position may be followed by synchronization \
                 that makes the capture safe, and proving otherwise is out of reach here. \
                 Parallel subtests (`t.Run` with `t.Parallel()`) can additionally be \
                 checked behind the `parallel_subtests` toggle."
            }
        }
    }

    /// Traversal capabilities the rule's driver must provide.
    pub fn requires(&self) -> &'static [&'static str] {
        match self {
            RuleCode::GO001 => &["inspect"],
        }
    }

    /// Return the string representation (e.g., `"GO001"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCode::GO001 => "GO001",
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Info => write!(f, "info"),
        }
    }
}

/// A text range in a file (1-indexed lines and columns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Range {
    /// Create a new range with validation.
    ///
    /// All values must be >= 1 (1-indexed). End must be >= start.
    /// When start_line == end_line, end_col must be >= start_col.
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        assert!(start_line >= 1, "start_line must be >= 1 (1-indexed), got {}", start_line);
        assert!(start_col >= 1, "start_col must be >= 1 (1-indexed), got {}", start_col);
        assert!(end_line >= 1, "end_line must be >= 1 (1-indexed), got {}", end_line);
        assert!(end_col >= 1, "end_col must be >= 1 (1-indexed), got {}", end_col);
        assert!(
            end_line >= start_line,
            "end_line ({}) must be >= start_line ({})",
            end_line, start_line
        );
        assert!(
            end_line > start_line || end_col >= start_col,
            "when start_line == end_line, end_col ({}) must be >= start_col ({})",
            end_col, start_col
        );
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Create a range for a single point.
    pub fn point(line: usize, col: usize) -> Self {
        assert!(line >= 1, "line must be >= 1 (1-indexed), got {}", line);
        assert!(col >= 1, "col must be >= 1 (1-indexed), got {}", col);
        Self {
            start_line: line,
            start_col: col,
            end_line: line,
            end_col: col,
        }
    }

    /// Range covering a tree-sitter node (converting from 0-indexed points).
    pub fn from_node(node: Node<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self::new(
            start.row + 1,
            start.column + 1,
            end.row + 1,
            end.column + 1,
        )
    }
}

/// A lint diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The rule that produced this diagnostic.
    pub rule: RuleCode,
    /// Severity level.
    pub severity: DiagnosticSeverity,
    /// File path.
    pub file: PathBuf,
    /// Location in the file.
    pub range: Range,
    /// Human-readable message.
    pub message: String,
}

/// Print all available rules in a formatted table.
pub fn print_rules() {
    println!("Available Go lint rules:\n");
    println!("{:<8} {:<16} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for code in RuleCode::all() {
        // Truncate description to first sentence for the table.
        let desc = code.description();
        let short_desc = desc.split('.').next().unwrap_or(desc);
        println!("{:<8} {:<16} {}", code, code.name(), short_desc);
    }
}
