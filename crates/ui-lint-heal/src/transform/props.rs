use tree_sitter::Node;
use ui_lint_ts::component::extract_component_context;
use ui_lint_ts::{query, SourceUnit};

use super::{arg, find_declaration, statement_insert_point, Args, TransformCx, Transformer};
use crate::error::TransformError;

/// Declares `<Name>Props` from the props a component reads and annotates
/// its parameter with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropsInterface;

/// Annotates a component's props parameter with an existing type.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotateProps;

/// Where the annotation goes: either an insertion after the pattern, or a
/// bare arrow parameter that needs parentheses.
enum Annotation {
    After(usize),
    Parenthesize(std::ops::Range<usize>),
}

fn annotation_site(function: Node<'_>) -> Result<Annotation, TransformError> {
    if let Some(bare) = function.child_by_field_name("parameter") {
        return Ok(Annotation::Parenthesize(bare.byte_range()));
    }
    let first = function
        .child_by_field_name("parameters")
        .and_then(|p| query::named_children(p).into_iter().next())
        .ok_or_else(|| TransformError::NotFound("props parameter".to_string()))?;
    if first.child_by_field_name("type").is_some() {
        return Err(TransformError::Unsupported(
            "props parameter is already typed".to_string(),
        ));
    }
    let pattern = first
        .child_by_field_name("pattern")
        .ok_or_else(|| TransformError::NotFound("props pattern".to_string()))?;
    let end = query::token(first, "?").map_or(pattern.end_byte(), |q| q.end_byte());
    Ok(Annotation::After(end))
}

fn annotate(unit: &mut SourceUnit, component: &str, interface: &str) -> Result<(), TransformError> {
    let site = {
        let (_, function) = find_declaration(unit, component)
            .ok_or_else(|| TransformError::NotFound(format!("component `{component}`")))?;
        annotation_site(function)?
    };
    match site {
        Annotation::After(at) => unit.replace_range(at..at, &format!(": {interface}"))?,
        Annotation::Parenthesize(range) => {
            let name = unit.text()[range.clone()].to_string();
            unit.replace_range(range, &format!("({name}: {interface})"))?;
        }
    }
    Ok(())
}

/// `interface <name> { ... }` with `any` members.
fn interface_text(name: &str, props: &[&str], children: bool) -> String {
    let mut members: Vec<String> = props
        .iter()
        .filter(|p| **p != "children")
        .map(|p| format!("  {p}: any;"))
        .collect();
    if children || props.contains(&"children") {
        members.push("  children?: React.ReactNode;".to_string());
    }
    if members.is_empty() {
        format!("interface {name} {{}}")
    } else {
        format!("interface {name} {{\n{}\n}}", members.join("\n"))
    }
}

impl Transformer for PropsInterface {
    fn id(&self) -> &'static str {
        "props-interface"
    }

    fn apply(&self, cx: &mut TransformCx<'_>, args: &Args) -> Result<(), TransformError> {
        let component = arg(args, "component")?;
        let interface = arg(args, "interface")?;
        let props: Vec<&str> = args
            .get("props")
            .map(|p| p.split(',').map(str::trim).filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();
        let children = args.get("children").is_some_and(|c| c == "true");

        let declared = extract_component_context(cx.unit)
            .declared_types
            .iter()
            .any(|t| t.name == interface);

        // Annotation first: it sits after the insertion point.
        annotate(cx.unit, component, interface)?;
        if declared {
            return Ok(());
        }
        let at = find_declaration(cx.unit, component)
            .map(|(stmt, _)| statement_insert_point(stmt))
            .ok_or_else(|| TransformError::NotFound(format!("component `{component}`")))?;
        let text = format!("{}\n\n", interface_text(interface, &props, children));
        cx.unit.replace_range(at..at, &text)?;
        Ok(())
    }
}

impl Transformer for AnnotateProps {
    fn id(&self) -> &'static str {
        "annotate-props"
    }

    fn apply(&self, cx: &mut TransformCx<'_>, args: &Args) -> Result<(), TransformError> {
        annotate(cx.unit, arg(args, "component")?, arg(args, "interface")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use ui_lint_core::Conventions;

    fn run(transformer: &dyn Transformer, src: &str, args: &[(&str, &str)]) -> String {
        let mut unit = SourceUnit::parse("/p/src/components/card.tsx", src).unwrap();
        let conventions = Conventions::default();
        let mut cx = TransformCx::new(&mut unit, PathBuf::from("src/components/card.tsx"), &conventions);
        let args: Args = args.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        transformer.apply(&mut cx, &args).unwrap();
        assert!(unit.syntax_error().is_none());
        unit.into_text()
    }

    #[test]
    fn declares_interface_above_doc_comment() {
        let out = run(
            &PropsInterface,
            "/** A card. */\nexport function Card({ title, children }) {\n  return <div>{title}{children}</div>;\n}\n",
            &[
                ("component", "Card"),
                ("interface", "CardProps"),
                ("props", "children,title"),
                ("children", "true"),
            ],
        );
        assert_eq!(
            out,
            "interface CardProps {\n  title: any;\n  children?: React.ReactNode;\n}\n\n/** A card. */\nexport function Card({ title, children }: CardProps) {\n  return <div>{title}{children}</div>;\n}\n"
        );
    }

    #[test]
    fn bare_arrow_parameter_gets_parentheses() {
        let out = run(
            &AnnotateProps,
            "interface BadgeProps { label: string }\nexport const Badge = props => <i>{props.label}</i>;\n",
            &[("component", "Badge"), ("interface", "BadgeProps")],
        );
        assert!(out.contains("const Badge = (props: BadgeProps) => <i>"));
    }

    #[test]
    fn optional_parameter_keeps_question_mark() {
        let out = run(
            &AnnotateProps,
            "type TagProps = { id: string };\nfunction Tag(props?) {\n  return <b />;\n}\n",
            &[("component", "Tag"), ("interface", "TagProps")],
        );
        assert!(out.contains("function Tag(props?: TagProps)"));
    }
}
