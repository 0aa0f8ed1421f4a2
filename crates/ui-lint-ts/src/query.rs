//! Structural queries over tree-sitter nodes.
//!
//! Free functions shared by the extractor, the rules and the transformers.
//! All positions returned here are 1-indexed (line and column), matching
//! [`Location`](https://docs.rs/ui-lint-core) in the core crate.

use tree_sitter::Node;

/// Node kinds that introduce a new function scope.
pub const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "arrow_function",
    "method_definition",
];

/// Node kinds that produce a UI node.
pub const JSX_KINDS: &[&str] = &["jsx_element", "jsx_self_closing_element", "jsx_fragment"];

/// Top-level statement kinds counted as declarations.
pub const DECLARATION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "class_declaration",
    "abstract_class_declaration",
    "lexical_declaration",
    "variable_declaration",
    "interface_declaration",
    "type_alias_declaration",
    "enum_declaration",
];

/// Returns `node` and all of its descendants in document (pre-)order.
#[must_use]
pub fn descendants<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        out.push(current);
        let mut cursor = current.walk();
        let children: Vec<Node<'t>> = current.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    out
}

/// Returns every descendant of `node` (inclusive) whose kind is in `kinds`.
#[must_use]
pub fn descendants_of_kind<'t>(node: Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    descendants(node)
        .into_iter()
        .filter(|n| kinds.contains(&n.kind()))
        .collect()
}

/// Like [`descendants_of_kind`] but does not descend into nested functions
/// below `node`.
#[must_use]
pub fn descendants_in_scope<'t>(node: Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if kinds.contains(&current.kind()) {
            out.push(current);
        }
        if current.id() != node.id() && FUNCTION_KINDS.contains(&current.kind()) {
            continue;
        }
        let mut cursor = current.walk();
        let children: Vec<Node<'t>> = current.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    out
}

/// Returns the nearest strict ancestor of `node` whose kind is in `kinds`.
#[must_use]
pub fn ancestor_of_kind<'t>(node: Node<'t>, kinds: &[&str]) -> Option<Node<'t>> {
    let mut current = node.parent();
    while let Some(n) = current {
        if kinds.contains(&n.kind()) {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

/// Returns the nearest enclosing function of `node`, if any.
#[must_use]
pub fn enclosing_function(node: Node<'_>) -> Option<Node<'_>> {
    ancestor_of_kind(node, FUNCTION_KINDS)
}

/// Returns `true` if `inner` lies within the byte range of `outer`.
#[must_use]
pub fn contains(outer: Node<'_>, inner: Node<'_>) -> bool {
    outer.start_byte() <= inner.start_byte() && inner.end_byte() <= outer.end_byte()
}

/// Returns the source text covered by `node`.
#[must_use]
pub fn text<'s>(node: Node<'_>, src: &'s str) -> &'s str {
    src.get(node.byte_range()).unwrap_or("")
}

/// Returns the text of the named field `field` of `node`.
#[must_use]
pub fn field_text<'s>(node: Node<'_>, field: &str, src: &'s str) -> Option<&'s str> {
    node.child_by_field_name(field).map(|n| text(n, src))
}

/// 1-indexed line of the node's start.
#[must_use]
pub fn line(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

/// 1-indexed column of the node's start.
#[must_use]
pub fn column(node: Node<'_>) -> usize {
    node.start_position().column + 1
}

/// Returns the content of a `string` node without its quotes.
#[must_use]
pub fn string_value(node: Node<'_>, src: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let raw = text(node, src);
    if raw.len() < 2 {
        return None;
    }
    Some(raw[1..raw.len() - 1].to_string())
}

/// Returns `true` if the node has an anonymous child token of `kind`
/// (e.g. the `default` keyword of an `export_statement`).
#[must_use]
pub fn has_token(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == kind);
    found
}

/// Returns the first anonymous child token of `kind`.
#[must_use]
pub fn token<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|c| !c.is_named() && c.kind() == kind);
    found
}

/// Returns the first `ERROR` or `MISSING` node below `node`.
#[must_use]
pub fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if !node.has_error() {
        return None;
    }
    descendants(node)
        .into_iter()
        .find(|n| n.is_error() || n.is_missing())
}

/// Returns the named children of `node`, skipping comments.
#[must_use]
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect();
    children
}

/// Returns the declaration wrapped by an `export_statement`, or the node
/// itself for any other statement.
#[must_use]
pub fn unwrap_export(statement: Node<'_>) -> Node<'_> {
    if statement.kind() == "export_statement" {
        if let Some(decl) = statement.child_by_field_name("declaration") {
            return decl;
        }
    }
    statement
}

/// Returns the callee name of a `call_expression`: the identifier, or the
/// property of a member expression (`React.useState` → `useState`).
#[must_use]
pub fn callee_name<'s>(call: Node<'_>, src: &'s str) -> Option<&'s str> {
    let callee = call.child_by_field_name("function")?;
    match callee.kind() {
        "identifier" => Some(text(callee, src)),
        "member_expression" => callee
            .child_by_field_name("property")
            .map(|p| text(p, src)),
        _ => None,
    }
}
