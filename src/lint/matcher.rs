//! Static method-call matching.

use tree_sitter::Node;

use crate::resolve::Resolver;

/// Whether `expr` is a call that statically resolves to the method
/// `<package_path>.<type_name>.<method>` (receiver may be a pointer to
/// the type).
///
/// Fails closed: any expression whose callee the resolver cannot pin down
/// is not a match.
pub fn is_method_call(
    resolver: &dyn Resolver,
    expr: Node<'_>,
    package_path: &str,
    type_name: &str,
    method: &str,
) -> bool {
    let Some(callee) = resolver.callee_of(expr) else {
        return false;
    };
    callee.package_path == package_path
        && callee.type_name == type_name
        && callee.method == method
}
