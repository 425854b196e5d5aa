//! GO001: loop variables captured by escaping function literals.
//!
//! Checks references to enclosing loop variables from within nested
//! function literals started by `go` or `defer` statements, or handed to
//! calls known to run them asynchronously (`errgroup.Group.Go`, and
//! optionally parallel subtests via `testing.T.Run`).
//!
//! `go` and `defer` are only considered when they are the last statement
//! of the loop body: it is hard to prove an earlier `go` is not followed
//! by a wait, or an earlier `defer` by a return that runs it during the
//! same iteration.

use tree_sitter::Node;

use crate::ast::{
    child_by_field, first_named_child, named_children, statements, walk_preorder, SourceFile,
};
use crate::resolve::{BindingId, Resolver};

use super::matcher::is_method_call;
use super::rules::{Diagnostic, DiagnosticSeverity, Range, RuleCode};

const ERRGROUP_PATH: &str = "golang.org/x/sync/errgroup";
const TESTING_PATH: &str = "testing";

/// Per-run options for the rule.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Also treat `t.Run("...", func(t *testing.T) { t.Parallel(); ... })`
    /// as an escape point, at any statement position.
    pub parallel_subtests: bool,
}

/// Check one compilation unit. Diagnostics come out in visit order;
/// the rule holds no state across calls.
pub fn check(file: &SourceFile, resolver: &dyn Resolver, options: &Options) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    walk_preorder(file.root(), &mut |node| {
        if node.kind() == "for_statement" {
            check_for(file, resolver, options, node, &mut diagnostics);
        }
    });
    diagnostics
}

fn check_for(
    file: &SourceFile,
    resolver: &dyn Resolver,
    options: &Options,
    for_stmt: Node<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let vars = loop_vars(resolver, for_stmt);
    if vars.is_empty() {
        return;
    }
    let Some(body) = child_by_field(for_stmt, "body") else {
        return;
    };
    let stmts = statements(body);
    let Some(last) = stmts.len().checked_sub(1) else {
        return;
    };
    for (i, stmt) in stmts.iter().enumerate() {
        if let Some(lit) = escape_target(resolver, options, *stmt, i == last) {
            report_captures(file, resolver, &vars, lit, diagnostics);
        }
    }
}

/// The variables this loop advances between iterations.
///
/// Range loops contribute their key/value bindings. Three-clause loops
/// contribute the bare identifiers written by the post statement; targets
/// hidden behind a field or index expression contribute nothing. A loop
/// that contributes no variables is skipped entirely.
fn loop_vars(resolver: &dyn Resolver, for_stmt: Node<'_>) -> Vec<BindingId> {
    let mut vars = Vec::new();
    let mut add = |node: Node<'_>| {
        if node.kind() == "identifier" {
            if let Some(id) = resolver.binding_of(node) {
                vars.push(id);
            }
        }
    };

    for clause in named_children(for_stmt) {
        match clause.kind() {
            "range_clause" => {
                // Both `:=` and `=` headers: the identifiers resolve to
                // their (new or outer) bindings either way.
                if let Some(left) = child_by_field(clause, "left") {
                    for e in named_children(left) {
                        add(e);
                    }
                }
            }
            "for_clause" => {
                let Some(update) = child_by_field(clause, "update") else {
                    continue;
                };
                match update.kind() {
                    "inc_statement" | "dec_statement" => {
                        if let Some(operand) = first_named_child(update) {
                            add(operand);
                        }
                    }
                    "assignment_statement" => {
                        if let Some(left) = child_by_field(update, "left") {
                            for e in named_children(left) {
                                add(e);
                            }
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
    vars
}

/// The function literal escaping from `stmt`, if any.
///
/// Non-literal targets (named functions, parenthesized expressions,
/// method values) are silently dropped.
fn escape_target<'a>(
    resolver: &dyn Resolver,
    options: &Options,
    stmt: Node<'a>,
    is_last: bool,
) -> Option<Node<'a>> {
    let target = match stmt.kind() {
        "go_statement" | "defer_statement" if is_last => {
            let call = first_named_child(stmt)?;
            if call.kind() != "call_expression" {
                return None;
            }
            child_by_field(call, "function")
        }
        "expression_statement" => {
            let expr = first_named_child(stmt)?;
            if expr.kind() != "call_expression" {
                return None;
            }
            if is_last && is_method_call(resolver, expr, ERRGROUP_PATH, "Group", "Go") {
                let args = child_by_field(expr, "arguments")?;
                named_children(args).first().copied()
            } else if options.parallel_subtests {
                parallel_subtest_target(resolver, expr)
            } else {
                None
            }
        }
        _ => None,
    };
    let lit = target?;
    (lit.kind() == "func_literal").then_some(lit)
}

/// The subtest body of `t.Run("...", func(t *testing.T) { ... })` when the
/// literal's direct statements request parallel execution.
///
/// Unlike `go` and `defer`, a parallel subtest escapes the iteration no
/// matter where in the loop body it appears: the testing framework defers
/// the body past the enclosing test function.
fn parallel_subtest_target<'a>(resolver: &dyn Resolver, call: Node<'a>) -> Option<Node<'a>> {
    if !is_method_call(resolver, call, TESTING_PATH, "T", "Run") {
        return None;
    }
    let args = child_by_field(call, "arguments")?;
    let lit = named_children(args).get(1).copied()?;
    if lit.kind() != "func_literal" {
        return None;
    }
    let body = child_by_field(lit, "body")?;
    for stmt in statements(body) {
        if stmt.kind() != "expression_statement" {
            continue;
        }
        let Some(expr) = first_named_child(stmt) else {
            continue;
        };
        if expr.kind() == "call_expression"
            && is_method_call(resolver, expr, TESTING_PATH, "T", "Parallel")
        {
            return Some(lit);
        }
    }
    None
}

/// Report every reference to a loop variable inside the literal's body.
///
/// Comparison is by binding identity, so a same-named variable declared
/// inside the literal never matches. The walk covers nested literals too;
/// a capture two levels deep is just as live.
fn report_captures(
    file: &SourceFile,
    resolver: &dyn Resolver,
    vars: &[BindingId],
    lit: Node<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(body) = child_by_field(lit, "body") else {
        return;
    };
    walk_preorder(body, &mut |node| {
        if node.kind() != "identifier" {
            return;
        }
        let Some(binding) = resolver.binding_of(node) else {
            return;
        };
        if !vars.contains(&binding) {
            return;
        }
        diagnostics.push(Diagnostic {
            rule: RuleCode::GO001,
            severity: DiagnosticSeverity::Warning,
            file: file.path().to_path_buf(),
            range: Range::from_node(node),
            message: format!(
                "loop variable {} captured by func literal",
                file.text(node)
            ),
        });
    });
}
