//! Rule against hand-built class strings.
//!
//! `"btn " + variant` and `` `btn ${variant}` `` drop conflict resolution
//! between utilities; a merge helper such as `cn(...)` keeps it.

use ui_lint_core::{
    AnalyzedUnit, FileContext, FixDescriptor, Location, Rule, RuleArea, Severity,
    ValidationIssue,
};
use ui_lint_ts::ClassValue;

/// Rule code for class-concatenation.
pub const CODE: &str = "UL061";

/// Rule name for class-concatenation.
pub const NAME: &str = "class-concatenation";

/// Flags class lists built by concatenation or interpolation.
#[derive(Debug, Clone, Default)]
pub struct ClassConcatenation;

impl ClassConcatenation {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ClassConcatenation {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Build conditional class lists with a merge helper"
    }

    fn area(&self) -> RuleArea {
        RuleArea::UtilityClass
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let helper = ctx.conventions.merge_helper();

        unit.component
            .class_attributes
            .iter()
            .filter_map(|attr| {
                let (raw, how) = match &attr.value {
                    ClassValue::Concatenation { raw } => (raw, "string concatenation"),
                    ClassValue::Template { raw } => (raw, "template interpolation"),
                    _ => return None,
                };
                Some(
                    ValidationIssue::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        self.area(),
                        Location::new(ctx.relative_path.to_path_buf(), attr.line, attr.column)
                            .with_span(attr.value_range.start, attr.value_range.len()),
                        format!("Class list built with {how}; use `{helper}(...)`"),
                    )
                    .with_fix(FixDescriptor::transform(
                        "class-merge",
                        [
                            ("raw", raw.as_str()),
                            ("helper", helper),
                            ("import", ctx.conventions.merge_helper_import.as_str()),
                        ],
                    )),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check;

    #[test]
    fn test_concatenation_and_template() {
        let issues = check(
            &ClassConcatenation::new(),
            "src/components/button.tsx",
            r#"export function Button({ variant, active }: ButtonProps) {
  return (
    <>
      <button className={"btn " + variant} />
      <button className={`btn ${active ? "on" : ""}`} />
      <button className={cn("btn", variant)} />
    </>
  );
}
"#,
        );
        let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Class list built with string concatenation; use `cn(...)`",
                "Class list built with template interpolation; use `cn(...)`",
            ]
        );
        let Some(FixDescriptor::NamedTransform { context, .. }) = &issues[0].fix else {
            panic!("expected class-merge");
        };
        assert_eq!(context["raw"], "\"btn \" + variant");
        assert_eq!(context["import"], "@/lib/utils");
    }
}
