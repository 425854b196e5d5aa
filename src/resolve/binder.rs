//! File-local lexical binder.
//!
//! Builds the [`FileResolver`] in a single pass over one compilation
//! unit's tree: a scope stack maps names to declarations, every resolved
//! identifier occurrence is recorded by node id, and declared types are
//! tracked just far enough to statically resolve method receivers
//! (`var g errgroup.Group; g.Go(...)`, `t *testing.T; t.Run(...)`).
//!
//! Resolution is deliberately shallow and fail-closed: anything the binder
//! cannot see syntactically (interface dispatch, chained selectors, types
//! declared in other files) resolves to nothing, and downstream matchers
//! treat nothing as "no match".
//!
//! Known recall gap: a bare-identifier key in a composite literal is
//! always treated as a struct field name, since telling struct literals
//! from map literals needs type information. A variable used as a map key
//! (`map[int]int{i: 1}`) therefore goes unresolved.

use rustc_hash::FxHashMap;
use tree_sitter::Node;

use crate::ast::{child_by_field, first_named_child, has_token, named_children, node_text};

use super::{BindingId, BindingKind, CalleeInfo, Resolver};

/// A declared type reference: optional package qualifier plus type name,
/// with at most one pointer level already unwrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeRef {
    pkg: Option<String>,
    name: String,
}

/// One declaration record in the arena.
#[derive(Debug)]
struct BindingRecord {
    name: String,
    kind: BindingKind,
    ty: Option<TypeRef>,
}

/// Resolution service for one compilation unit.
///
/// Keys occurrences by tree-sitter node id, so a resolver must only be
/// queried with nodes from the tree it was built from.
pub struct FileResolver<'s> {
    source: &'s [u8],
    bindings: Vec<BindingRecord>,
    /// node id of an identifier occurrence -> its declaration.
    /// Declaring occurrences map to themselves.
    resolved: FxHashMap<usize, BindingId>,
    /// local package name -> import path.
    imports: FxHashMap<String, String>,
}

impl<'s> FileResolver<'s> {
    /// Build the resolver for a parsed file.
    pub fn build(root: Node<'_>, source: &'s [u8]) -> Self {
        let mut binder = Binder {
            source,
            bindings: Vec::new(),
            resolved: FxHashMap::default(),
            imports: FxHashMap::default(),
            scopes: Vec::new(),
        };
        binder.bind_file(root);
        FileResolver {
            source,
            bindings: binder.bindings,
            resolved: binder.resolved,
            imports: binder.imports,
        }
    }

    /// Name of a declaration, for diagnostics and tests.
    pub fn binding_name(&self, id: BindingId) -> &str {
        &self.bindings[id.0 as usize].name
    }
}

impl Resolver for FileResolver<'_> {
    fn binding_of(&self, ident: Node<'_>) -> Option<BindingId> {
        self.resolved.get(&ident.id()).copied()
    }

    fn callee_of(&self, call: Node<'_>) -> Option<CalleeInfo> {
        if call.kind() != "call_expression" {
            return None;
        }
        let fun = child_by_field(call, "function")?;
        if fun.kind() != "selector_expression" {
            return None;
        }
        let operand = child_by_field(fun, "operand")?;
        if operand.kind() != "identifier" {
            return None;
        }
        let method = child_by_field(fun, "field")?;

        let binding = self.binding_of(operand)?;
        let record = &self.bindings[binding.0 as usize];
        if record.kind != BindingKind::Var {
            return None;
        }
        let ty = record.ty.as_ref()?;
        let pkg_local = ty.pkg.as_deref()?;
        let package_path = self.imports.get(pkg_local)?.clone();
        Some(CalleeInfo {
            package_path,
            type_name: ty.name.clone(),
            method: node_text(self.source, method).to_string(),
        })
    }
}

/// Transient state for the binding pass.
struct Binder<'s> {
    source: &'s [u8],
    bindings: Vec<BindingRecord>,
    resolved: FxHashMap<usize, BindingId>,
    imports: FxHashMap<String, String>,
    scopes: Vec<FxHashMap<String, BindingId>>,
}

impl<'s> Binder<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        node_text(self.source, node)
    }

    fn bind_file(&mut self, root: Node<'_>) {
        self.scopes.push(FxHashMap::default());

        // Go's file scope is order independent, so top-level names are
        // hoisted before any function body is walked.
        for decl in named_children(root) {
            match decl.kind() {
                "import_declaration" => self.bind_imports(decl),
                "function_declaration" => {
                    if let Some(name) = child_by_field(decl, "name") {
                        if name.kind() == "identifier" {
                            self.declare(name, BindingKind::Func, None);
                        }
                    }
                }
                "var_declaration" | "const_declaration" => self.hoist_specs(decl),
                _ => {}
            }
        }

        for decl in named_children(root) {
            if decl.kind() != "import_declaration" {
                self.walk(decl);
            }
        }

        self.scopes.pop();
    }

    // -----------------------------------------------------------------
    // Declarations
    // -----------------------------------------------------------------

    /// Declare the identifier `node` in the innermost scope.
    ///
    /// Idempotent by node id: re-encountering a hoisted declaration
    /// returns the existing binding. The blank identifier never binds.
    fn declare(&mut self, node: Node<'_>, kind: BindingKind, ty: Option<TypeRef>) {
        let name = self.text(node);
        if name == "_" {
            return;
        }
        if self.resolved.contains_key(&node.id()) {
            return;
        }
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(BindingRecord {
            name: name.to_string(),
            kind,
            ty,
        });
        self.resolved.insert(node.id(), id);
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), id);
        }
    }

    fn lookup(&self, name: &str) -> Option<BindingId> {
        for scope in self.scopes.iter().rev() {
            if let Some(&id) = scope.get(name) {
                return Some(id);
            }
        }
        None
    }

    /// Record a resolved use of an identifier, if it has a binding.
    fn use_ident(&mut self, node: Node<'_>) {
        let name = self.text(node);
        if name == "_" {
            return;
        }
        if let Some(id) = self.lookup(name) {
            self.resolved.insert(node.id(), id);
        }
    }

    fn bind_imports(&mut self, decl: Node<'_>) {
        for child in named_children(decl) {
            match child.kind() {
                "import_spec" => self.bind_import_spec(child),
                "import_spec_list" => {
                    for spec in named_children(child) {
                        if spec.kind() == "import_spec" {
                            self.bind_import_spec(spec);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn bind_import_spec(&mut self, spec: Node<'_>) {
        let Some(path_node) = child_by_field(spec, "path") else {
            return;
        };
        let path = self
            .text(path_node)
            .trim_matches('"')
            .trim_matches('`')
            .to_string();
        if path.is_empty() {
            return;
        }
        let local = match child_by_field(spec, "name") {
            Some(name) if name.kind() == "package_identifier" => self.text(name).to_string(),
            // `import _ "p"` and `import . "p"` bind nothing resolvable.
            Some(_) => return,
            None => match path.rsplit('/').next() {
                Some(seg) if !seg.is_empty() => seg.to_string(),
                _ => return,
            },
        };
        // Package names participate in scope lookup so that selector
        // operands resolve, but they carry no receiver type.
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(BindingRecord {
            name: local.clone(),
            kind: BindingKind::Package,
            ty: None,
        });
        if let Some(scope) = self.scopes.first_mut() {
            scope.insert(local.clone(), id);
        }
        self.imports.insert(local, path);
    }

    /// Declare top-level var/const names without walking their values.
    fn hoist_specs(&mut self, decl: Node<'_>) {
        for child in named_children(decl) {
            match child.kind() {
                "var_spec" | "const_spec" => self.declare_spec_names(child),
                "var_spec_list" | "const_spec_list" => {
                    for spec in named_children(child) {
                        self.declare_spec_names(spec);
                    }
                }
                _ => {}
            }
        }
    }

    /// Declare the names of one var/const spec with their declared or
    /// inferred type.
    fn declare_spec_names(&mut self, spec: Node<'_>) {
        let declared = child_by_field(spec, "type").and_then(|t| self.type_ref(t));
        let values: Vec<Node> = child_by_field(spec, "value")
            .map(named_children)
            .unwrap_or_default();
        let names: Vec<Node> = {
            let mut cursor = spec.walk();
            spec.children_by_field_name("name", &mut cursor).collect()
        };
        for (i, name) in names.iter().enumerate() {
            if name.kind() != "identifier" {
                continue;
            }
            let ty = declared.clone().or_else(|| {
                if names.len() == values.len() {
                    values.get(i).and_then(|v| self.infer_type(*v))
                } else {
                    None
                }
            });
            self.declare(*name, BindingKind::Var, ty);
        }
    }

    /// Bind the names of a parameter list (also used for receivers and
    /// named results).
    fn bind_params(&mut self, list: Node<'_>) {
        for pd in named_children(list) {
            if pd.kind() != "parameter_declaration"
                && pd.kind() != "variadic_parameter_declaration"
            {
                continue;
            }
            let ty = child_by_field(pd, "type").and_then(|t| self.type_ref(t));
            let names: Vec<Node> = {
                let mut cursor = pd.walk();
                pd.children_by_field_name("name", &mut cursor).collect()
            };
            for name in names {
                if name.kind() == "identifier" {
                    self.declare(name, BindingKind::Var, ty.clone());
                }
            }
        }
    }

    fn bind_result(&mut self, result: Node<'_>) {
        // Named results only appear inside a parameter_list; a bare type
        // declares nothing.
        if result.kind() == "parameter_list" {
            self.bind_params(result);
        }
    }

    // -----------------------------------------------------------------
    // Type extraction
    // -----------------------------------------------------------------

    /// Declared type of a type node, unwrapping one pointer level.
    fn type_ref(&self, node: Node<'_>) -> Option<TypeRef> {
        let t = if node.kind() == "pointer_type" {
            first_named_child(node)?
        } else {
            node
        };
        match t.kind() {
            "qualified_type" => {
                let pkg = child_by_field(t, "package")?;
                let name = child_by_field(t, "name")?;
                Some(TypeRef {
                    pkg: Some(self.text(pkg).to_string()),
                    name: self.text(name).to_string(),
                })
            }
            "type_identifier" => Some(TypeRef {
                pkg: None,
                name: self.text(t).to_string(),
            }),
            "generic_type" => child_by_field(t, "type").and_then(|inner| self.type_ref(inner)),
            _ => None,
        }
    }

    /// Infer a declared type from an initializer expression.
    ///
    /// Covers the forms that syntactically name a type: composite
    /// literals, `&T{...}`, and `new(T)`.
    fn infer_type(&self, expr: Node<'_>) -> Option<TypeRef> {
        match expr.kind() {
            "composite_literal" => child_by_field(expr, "type").and_then(|t| self.type_ref(t)),
            "unary_expression" => {
                let op = child_by_field(expr, "operator")?;
                if self.text(op) != "&" {
                    return None;
                }
                self.infer_type(child_by_field(expr, "operand")?)
            }
            "call_expression" => {
                let fun = child_by_field(expr, "function")?;
                if fun.kind() != "identifier" || self.text(fun) != "new" {
                    return None;
                }
                let args = child_by_field(expr, "arguments")?;
                self.type_ref(first_named_child(args)?)
            }
            _ => None,
        }
    }

    // -----------------------------------------------------------------
    // Tree walk
    // -----------------------------------------------------------------

    fn scoped(&mut self, f: impl FnOnce(&mut Self)) {
        self.scopes.push(FxHashMap::default());
        f(self);
        self.scopes.pop();
    }

    fn walk(&mut self, node: Node<'_>) {
        match node.kind() {
            "identifier" => self.use_ident(node),

            "function_declaration" => self.scoped(|b| {
                if let Some(params) = child_by_field(node, "parameters") {
                    b.bind_params(params);
                }
                if let Some(result) = child_by_field(node, "result") {
                    b.bind_result(result);
                }
                if let Some(body) = child_by_field(node, "body") {
                    b.walk(body);
                }
            }),

            "method_declaration" => self.scoped(|b| {
                if let Some(recv) = child_by_field(node, "receiver") {
                    b.bind_params(recv);
                }
                if let Some(params) = child_by_field(node, "parameters") {
                    b.bind_params(params);
                }
                if let Some(result) = child_by_field(node, "result") {
                    b.bind_result(result);
                }
                if let Some(body) = child_by_field(node, "body") {
                    b.walk(body);
                }
            }),

            "func_literal" => self.scoped(|b| {
                if let Some(params) = child_by_field(node, "parameters") {
                    b.bind_params(params);
                }
                if let Some(result) = child_by_field(node, "result") {
                    b.bind_result(result);
                }
                if let Some(body) = child_by_field(node, "body") {
                    b.walk(body);
                }
            }),

            // Scope-opening constructs. The loop header's bindings live in
            // the for_statement scope; the body block opens its own.
            "block"
            | "for_statement"
            | "if_statement"
            | "expression_switch_statement"
            | "select_statement"
            | "communication_case"
            | "expression_case"
            | "type_case"
            | "default_case" => self.scoped(|b| {
                for child in named_children(node) {
                    b.walk(child);
                }
            }),

            // `switch v := x.(type)` declares a fresh alias scoped to the
            // switch; the value expression is resolved before the alias
            // exists, so `switch v := v.(type)` reads the outer binding.
            "type_switch_statement" => self.scoped(|b| {
                if let Some(init) = child_by_field(node, "initializer") {
                    b.walk(init);
                }
                if let Some(value) = child_by_field(node, "value") {
                    b.walk(value);
                }
                if let Some(alias) = child_by_field(node, "alias") {
                    for e in named_children(alias) {
                        if e.kind() == "identifier" {
                            b.declare(e, BindingKind::Var, None);
                        } else {
                            b.walk(e);
                        }
                    }
                }
                for case in named_children(node) {
                    if matches!(case.kind(), "type_case" | "default_case") {
                        b.walk(case);
                    }
                }
            }),

            "range_clause" => {
                if let Some(right) = child_by_field(node, "right") {
                    self.walk(right);
                }
                if let Some(left) = child_by_field(node, "left") {
                    if has_token(node, ":=") {
                        for e in named_children(left) {
                            if e.kind() == "identifier" {
                                self.declare(e, BindingKind::Var, None);
                            } else {
                                self.walk(e);
                            }
                        }
                    } else {
                        self.walk(left);
                    }
                }
            }

            // `case v := <-ch:` declares v in the enclosing case scope;
            // the `=` form is a plain assignment to an outer binding.
            "receive_statement" => {
                if let Some(right) = child_by_field(node, "right") {
                    self.walk(right);
                }
                if let Some(left) = child_by_field(node, "left") {
                    if has_token(node, ":=") {
                        for e in named_children(left) {
                            if e.kind() == "identifier" {
                                self.declare(e, BindingKind::Var, None);
                            } else {
                                self.walk(e);
                            }
                        }
                    } else {
                        self.walk(left);
                    }
                }
            }

            "short_var_declaration" => {
                let right = child_by_field(node, "right");
                if let Some(r) = right {
                    self.walk(r);
                }
                if let Some(left) = child_by_field(node, "left") {
                    let lhs = named_children(left);
                    let rhs: Vec<Node> = right.map(named_children).unwrap_or_default();
                    for (i, e) in lhs.iter().enumerate() {
                        if e.kind() == "identifier" {
                            let ty = if lhs.len() == rhs.len() {
                                rhs.get(i).and_then(|r| self.infer_type(*r))
                            } else {
                                None
                            };
                            self.declare(*e, BindingKind::Var, ty);
                        } else {
                            self.walk(*e);
                        }
                    }
                }
            }

            "var_declaration" | "const_declaration" => {
                for child in named_children(node) {
                    match child.kind() {
                        "var_spec" | "const_spec" => self.bind_spec(child),
                        "var_spec_list" | "const_spec_list" => {
                            for spec in named_children(child) {
                                self.bind_spec(spec);
                            }
                        }
                        _ => self.walk(child),
                    }
                }
            }

            // Only the operand of a selector is a variable use; the field
            // is a member name.
            "selector_expression" => {
                if let Some(operand) = child_by_field(node, "operand") {
                    self.walk(operand);
                }
            }

            // A bare-identifier key in a composite literal names a struct
            // field; resolving it as a variable would fabricate captures.
            "keyed_element" => {
                let kids = named_children(node);
                let skip_key = kids.first().is_some_and(|key| {
                    let inner = if key.kind() == "literal_element" {
                        first_named_child(*key)
                    } else {
                        Some(*key)
                    };
                    matches!(inner.map(|n| n.kind()), Some("identifier"))
                });
                for (i, child) in kids.iter().enumerate() {
                    if i == 0 && skip_key {
                        continue;
                    }
                    self.walk(*child);
                }
            }

            _ => {
                for child in named_children(node) {
                    self.walk(child);
                }
            }
        }
    }

    /// Walk one var/const spec's value, then declare its names.
    fn bind_spec(&mut self, spec: Node<'_>) {
        if let Some(value) = child_by_field(spec, "value") {
            self.walk(value);
        }
        self.declare_spec_names(spec);
    }
}
