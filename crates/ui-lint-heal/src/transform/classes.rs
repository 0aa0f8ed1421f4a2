use std::ops::Range;

use tree_sitter::Node;
use ui_lint_rules::classes::{sort_classes, tokens};
use ui_lint_ts::component::{extract_component_context, local_declaration_kind};
use ui_lint_ts::{query, ClassValue, SourceUnit};

use super::{arg, import_insert_point, Args, TransformCx, Transformer};
use crate::error::TransformError;

/// Reorders a literal class list by category.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortClasses;

/// Appends `dark:` counterparts to a literal class list.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddDarkVariant;

/// Rewrites a concatenated or interpolated class list as a merge-helper
/// call and imports the helper.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassMerge;

/// Skips parentheses around a class expression.
fn unparenthesize(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_expression" {
        match query::named_children(node).into_iter().next() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

fn expression_at<'a>(unit: &'a SourceUnit, range: &Range<usize>) -> Option<Node<'a>> {
    unit.root()
        .descendant_for_byte_range(range.start, range.end)
        .map(unparenthesize)
}

/// Content range (inside the quotes) and value of the literal class list
/// holding every token of `classes`; an exact match wins.
fn find_literal(unit: &SourceUnit, classes: &str) -> Result<(Range<usize>, String), TransformError> {
    let wanted: Vec<&str> = tokens(classes).collect();
    let mut superset = None;
    for attr in extract_component_context(unit).class_attributes {
        let ClassValue::Literal { value } = attr.value else {
            continue;
        };
        let Some(node) = expression_at(unit, &attr.value_range) else {
            continue;
        };
        let inner = node.start_byte() + 1..node.end_byte().saturating_sub(1);
        if tokens(&value).eq(wanted.iter().copied()) {
            return Ok((inner, value));
        }
        if superset.is_none() && wanted.iter().all(|w| tokens(&value).any(|t| t == *w)) {
            superset = Some((inner, value));
        }
    }
    superset.ok_or_else(|| TransformError::NotFound(format!("class list `{classes}`")))
}

impl Transformer for SortClasses {
    fn id(&self) -> &'static str {
        "sort-classes"
    }

    fn apply(&self, cx: &mut TransformCx<'_>, args: &Args) -> Result<(), TransformError> {
        let (range, value) = find_literal(cx.unit, arg(args, "classes")?)?;
        let sorted = sort_classes(&value);
        if sorted != value {
            cx.unit.replace_range(range, &sorted)?;
        }
        Ok(())
    }
}

impl Transformer for AddDarkVariant {
    fn id(&self) -> &'static str {
        "add-dark-variant"
    }

    fn apply(&self, cx: &mut TransformCx<'_>, args: &Args) -> Result<(), TransformError> {
        let (range, value) = find_literal(cx.unit, arg(args, "classes")?)?;
        let additions: Vec<&str> = tokens(arg(args, "additions")?)
            .filter(|a| !tokens(&value).any(|t| t == *a))
            .collect();
        if additions.is_empty() {
            return Ok(());
        }
        let merged = format!("{} {}", tokens(&value).collect::<Vec<_>>().join(" "), additions.join(" "));
        cx.unit.replace_range(range, merged.trim_start())?;
        Ok(())
    }
}

enum Piece {
    Text(String),
    Expr(String),
}

fn pieces(node: Node<'_>, src: &str, out: &mut Vec<Piece>) {
    let node = unparenthesize(node);
    match node.kind() {
        "binary_expression" if query::field_text(node, "operator", src) == Some("+") => {
            if let Some(left) = node.child_by_field_name("left") {
                pieces(left, src, out);
            }
            if let Some(right) = node.child_by_field_name("right") {
                pieces(right, src, out);
            }
        }
        "string" => out.push(Piece::Text(query::string_value(node, src).unwrap_or_default())),
        "template_string" => {
            let mut cursor = node.start_byte() + 1;
            for sub in query::named_children(node) {
                if sub.kind() != "template_substitution" {
                    continue;
                }
                out.push(Piece::Text(src[cursor..sub.start_byte()].to_string()));
                if let Some(expr) = query::named_children(sub).into_iter().next() {
                    out.push(Piece::Expr(query::text(expr, src).to_string()));
                }
                cursor = sub.end_byte();
            }
            let end = node.end_byte().saturating_sub(1).max(cursor);
            out.push(Piece::Text(src[cursor..end].to_string()));
        }
        _ => out.push(Piece::Expr(query::text(node, src).to_string())),
    }
}

/// Helper-call arguments for `pieces`. Fails when a dynamic part is glued
/// to static text (`btn-${size}`), which the helper cannot express.
fn merge_arguments(pieces: Vec<Piece>) -> Result<Vec<String>, TransformError> {
    let pieces: Vec<Piece> = pieces
        .into_iter()
        .filter(|p| !matches!(p, Piece::Text(t) if t.is_empty()))
        .collect();
    let glued = |i: usize| {
        Err(TransformError::Unsupported(format!(
            "class part {} is joined to a dynamic value without a space",
            i + 1
        )))
    };

    let mut args = Vec::new();
    for (i, piece) in pieces.iter().enumerate() {
        let prev = i.checked_sub(1).and_then(|p| pieces.get(p));
        let next = pieces.get(i + 1);
        match piece {
            Piece::Text(text) => {
                if matches!(prev, Some(Piece::Expr(_))) && !text.starts_with(char::is_whitespace) {
                    return glued(i);
                }
                if matches!(next, Some(Piece::Expr(_))) && !text.ends_with(char::is_whitespace) {
                    return glued(i);
                }
                let classes: Vec<&str> = tokens(text).collect();
                if !classes.is_empty() {
                    args.push(format!("\"{}\"", classes.join(" ")));
                }
            }
            Piece::Expr(expr) => {
                if matches!(prev, Some(Piece::Expr(_))) {
                    return glued(i);
                }
                args.push(expr.clone());
            }
        }
    }
    Ok(args)
}

/// Makes `helper` importable from `module`, extending an existing import
/// from the same module when there is one.
fn ensure_import(unit: &mut SourceUnit, helper: &str, module: &str) -> Result<(), TransformError> {
    if extract_component_context(unit).imported_names.contains(helper)
        || local_declaration_kind(unit, helper).is_some()
    {
        return Ok(());
    }

    let extend_at = {
        let src = unit.text();
        unit.statements()
            .into_iter()
            .filter(|s| s.kind() == "import_statement" && !query::has_token(*s, "type"))
            .filter(|s| {
                s.child_by_field_name("source")
                    .and_then(|n| query::string_value(n, src))
                    .is_some_and(|m| m == module)
            })
            .find_map(|s| {
                query::descendants_of_kind(s, &["named_imports"])
                    .into_iter()
                    .next()
                    .and_then(|named| {
                        query::named_children(named)
                            .into_iter()
                            .filter(|c| c.kind() == "import_specifier")
                            .last()
                    })
                    .map(|last| last.end_byte())
            })
    };
    if let Some(at) = extend_at {
        unit.replace_range(at..at, &format!(", {helper}"))?;
        return Ok(());
    }

    let at = import_insert_point(unit);
    let prefix = if at > 0 && !unit.text()[..at].ends_with('\n') { "\n" } else { "" };
    unit.replace_range(
        at..at,
        &format!("{prefix}import {{ {helper} }} from \"{module}\";\n"),
    )?;
    Ok(())
}

impl Transformer for ClassMerge {
    fn id(&self) -> &'static str {
        "class-merge"
    }

    fn apply(&self, cx: &mut TransformCx<'_>, args: &Args) -> Result<(), TransformError> {
        let raw = arg(args, "raw")?;
        let helper = args
            .get("helper")
            .map_or(cx.conventions.merge_helper(), String::as_str)
            .to_string();
        let module = args
            .get("import")
            .map_or(cx.conventions.merge_helper_import.as_str(), String::as_str)
            .to_string();

        let (range, call) = {
            let src = cx.unit.text();
            let attr = extract_component_context(cx.unit)
                .class_attributes
                .into_iter()
                .find(|a| match &a.value {
                    ClassValue::Template { raw: r } | ClassValue::Concatenation { raw: r } => r == raw,
                    _ => false,
                })
                .ok_or_else(|| TransformError::NotFound(format!("class expression `{raw}`")))?;
            let node = expression_at(cx.unit, &attr.value_range)
                .ok_or_else(|| TransformError::NotFound(format!("class expression `{raw}`")))?;
            let mut parts = Vec::new();
            pieces(node, src, &mut parts);
            let call = format!("{helper}({})", merge_arguments(parts)?.join(", "));
            (attr.value_range, call)
        };

        cx.unit.replace_range(range, &call)?;
        ensure_import(cx.unit, &helper, &module)
    }
}
