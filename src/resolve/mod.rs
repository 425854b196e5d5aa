//! Name and callee resolution over Go syntax trees.
//!
//! The loop-capture rule never compares variables by name: two identifier
//! occurrences are "the same variable" exactly when they resolve to the
//! same declaration. This module defines the resolution boundary the rule
//! consumes ([`Resolver`]) and ships a file-local implementation
//! ([`FileResolver`]) built from a single lexical-scope pass.

mod binder;

pub use binder::FileResolver;

use tree_sitter::Node;

/// Stable, comparable handle to one declaration.
///
/// Indexes into the binder's declaration arena. Comparison is integer
/// identity, so shadowed and reused names can never be confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(pub u32);

/// What kind of declaration a binding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// A variable: `var`, `:=`, parameter, range binding, named result.
    Var,
    /// A declared function or method name.
    Func,
    /// An imported package name.
    Package,
}

/// Statically resolved callee of a method call expression.
///
/// Only produced when the receiver's declared type is syntactically
/// evident; everything else is `None` so that matchers fail closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalleeInfo {
    /// Import path of the package declaring the receiver type.
    pub package_path: String,
    /// Receiver's declared type name, after unwrapping one pointer level.
    pub type_name: String,
    /// Invoked method name.
    pub method: String,
}

/// Resolution service consumed by the lint rule.
///
/// Implementations must be pure lookups: resolving a node twice yields the
/// same answer, and resolution never fails loudly — an identifier without
/// a binding or a call without a static callee is simply `None`.
pub trait Resolver {
    /// The declaration an identifier reference resolves to, if any.
    ///
    /// Covers both declaring occurrences (which resolve to themselves) and
    /// uses. Identifiers in non-variable positions (struct field keys,
    /// selector fields, labels) have no binding.
    fn binding_of(&self, ident: Node<'_>) -> Option<BindingId>;

    /// The statically resolved callee of a call expression, if it is a
    /// method call whose receiver type and declaring package are known.
    fn callee_of(&self, call: Node<'_>) -> Option<CalleeInfo>;
}
