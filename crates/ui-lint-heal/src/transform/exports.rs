use tree_sitter::Node;
use ui_lint_ts::component::extract_component_context;
use ui_lint_ts::{query, DefaultExportShape, SourceUnit};

use super::{arg, removal_range, Args, TransformCx, Transformer};
use crate::error::TransformError;

/// Turns the default export into a named export of the same binding.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedExport;

/// The `export default ...` statement.
fn default_export_statement(unit: &SourceUnit) -> Option<Node<'_>> {
    unit.statements()
        .into_iter()
        .find(|s| s.kind() == "export_statement" && query::has_token(*s, "default"))
}

/// Top-level statement (not an export) declaring `name`.
fn local_declaration<'t>(unit: &'t SourceUnit, name: &str) -> Option<Node<'t>> {
    let src = unit.text();
    unit.statements().into_iter().find(|stmt| match stmt.kind() {
        "function_declaration" | "generator_function_declaration" | "class_declaration" => {
            query::field_text(*stmt, "name", src) == Some(name)
        }
        "lexical_declaration" | "variable_declaration" => query::named_children(*stmt)
            .into_iter()
            .any(|d| query::field_text(d, "name", src) == Some(name)),
        _ => false,
    })
}

impl Transformer for NamedExport {
    fn id(&self) -> &'static str {
        "named-export"
    }

    fn apply(&self, cx: &mut TransformCx<'_>, args: &Args) -> Result<(), TransformError> {
        let expected = arg(args, "name")?;
        let shape = extract_component_context(cx.unit)
            .exports
            .default_shape
            .ok_or_else(|| TransformError::NotFound("default export".to_string()))?;
        if shape.name() != Some(expected) {
            return Err(TransformError::NotFound(format!(
                "default export of `{expected}`"
            )));
        }

        let (stmt_range, decl_start) = {
            let stmt = default_export_statement(cx.unit)
                .ok_or_else(|| TransformError::NotFound("default export".to_string()))?;
            let decl_start = stmt
                .child_by_field_name("declaration")
                .or_else(|| stmt.child_by_field_name("value"))
                .map(|d| d.start_byte());
            (removal_range(cx.unit, stmt), decl_start)
        };

        match shape {
            DefaultExportShape::FunctionDeclaration { .. } => {
                let start = default_export_statement(cx.unit)
                    .map(|s| s.start_byte())
                    .ok_or_else(|| TransformError::NotFound("default export".to_string()))?;
                let decl_start = decl_start
                    .ok_or_else(|| TransformError::NotFound("exported declaration".to_string()))?;
                cx.unit.replace_range(start..decl_start, "export ")?;
            }
            DefaultExportShape::LocalDeclaration { name, .. } => {
                let decl_start = local_declaration(cx.unit, &name)
                    .map(|n| n.start_byte())
                    .ok_or_else(|| TransformError::NotFound(format!("declaration of `{name}`")))?;
                if decl_start < stmt_range.start {
                    cx.unit.replace_range(stmt_range, "")?;
                    cx.unit.replace_range(decl_start..decl_start, "export ")?;
                } else {
                    cx.unit.replace_range(decl_start..decl_start, "export ")?;
                    cx.unit.replace_range(stmt_range, "")?;
                }
            }
            DefaultExportShape::IdentifierAssignment { name } => {
                let range = default_export_statement(cx.unit)
                    .map(|s| s.byte_range())
                    .ok_or_else(|| TransformError::NotFound("default export".to_string()))?;
                cx.unit.replace_range(range, &format!("export {{ {name} }};"))?;
            }
            DefaultExportShape::Anonymous => {
                return Err(TransformError::Unsupported(
                    "anonymous default export has no name to export".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Appends `export default <name>;` to a unit without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddDefaultExport;

impl Transformer for AddDefaultExport {
    fn id(&self) -> &'static str {
        "add-default-export"
    }

    fn apply(&self, cx: &mut TransformCx<'_>, args: &Args) -> Result<(), TransformError> {
        let name = arg(args, "name")?;
        let context = extract_component_context(cx.unit);
        if context.exports.has_default {
            return Err(TransformError::Unsupported(
                "unit already has a default export".to_string(),
            ));
        }
        if super::find_declaration(cx.unit, name).is_none() {
            return Err(TransformError::NotFound(format!("declaration of `{name}`")));
        }
        let end = cx.unit.text().len();
        let separator = if cx.unit.text().ends_with('\n') { "\n" } else { "\n\n" };
        cx.unit
            .replace_range(end..end, &format!("{separator}export default {name};\n"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use ui_lint_core::Conventions;

    fn run(transformer: &dyn Transformer, src: &str, args: &[(&str, &str)]) -> Result<String, TransformError> {
        let mut unit = SourceUnit::parse("/p/src/components/card.tsx", src).unwrap();
        let conventions = Conventions::default();
        let mut cx = TransformCx::new(&mut unit, PathBuf::from("src/components/card.tsx"), &conventions);
        let args: Args = args.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        transformer.apply(&mut cx, &args)?;
        Ok(unit.into_text())
    }

    #[test]
    fn function_declaration_keeps_its_body() {
        let out = run(
            &NamedExport,
            "export default function Card() {\n  return <div />;\n}\n",
            &[("name", "Card")],
        )
        .unwrap();
        assert_eq!(out, "export function Card() {\n  return <div />;\n}\n");
    }

    #[test]
    fn local_declaration_moves_export_keyword() {
        let out = run(
            &NamedExport,
            "const Card = () => <div />;\n\nexport default Card;\n",
            &[("name", "Card")],
        )
        .unwrap();
        assert_eq!(out, "export const Card = () => <div />;\n\n");
    }

    #[test]
    fn imported_identifier_is_reexported() {
        let out = run(
            &NamedExport,
            "import Card from \"./base\";\nexport default Card;\n",
            &[("name", "Card")],
        )
        .unwrap();
        assert_eq!(out, "import Card from \"./base\";\nexport { Card };\n");
    }

    #[test]
    fn anonymous_default_is_rejected() {
        let err = run(&NamedExport, "export default () => <div />;\n", &[("name", "Card")]);
        assert!(err.is_err());
    }

    #[test]
    fn default_export_is_appended() {
        let out = run(
            &AddDefaultExport,
            "export function Page() {\n  return <main />;\n}\n",
            &[("name", "Page")],
        )
        .unwrap();
        assert_eq!(
            out,
            "export function Page() {\n  return <main />;\n}\n\nexport default Page;\n"
        );
    }
}
