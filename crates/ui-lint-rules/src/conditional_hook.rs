//! Rule forbidding hooks called conditionally.
//!
//! Hooks must run in the same order on every render. A call inside an
//! `if`, a ternary, a short-circuit, a loop, a nested callback, or after an
//! early return breaks that ordering.
//!
//! Moving the call changes behaviour, so the fix is always manual.

use ui_lint_core::{
    AnalyzedUnit, FileContext, FixDescriptor, Location, Rule, RuleArea, ValidationIssue,
};
use ui_lint_ts::HookPlacement;

/// Rule code for conditional-hook.
pub const CODE: &str = "UL010";

/// Rule name for conditional-hook.
pub const NAME: &str = "conditional-hook";

/// Flags hook calls that are not unconditional top-level calls.
#[derive(Debug, Clone, Default)]
pub struct ConditionalHook;

impl ConditionalHook {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ConditionalHook {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Hooks must be called unconditionally at the top level of a component or hook"
    }

    fn area(&self) -> RuleArea {
        RuleArea::ComponentApi
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        unit.component
            .conditional_hook_calls()
            .map(|call| {
                let (where_, step) = match call.placement {
                    HookPlacement::Loop => (
                        "inside a loop",
                        "Call the hook once and iterate over its result instead",
                    ),
                    HookPlacement::NestedFunction => (
                        "inside a nested function",
                        "Call the hook in the component body and pass the value into the callback",
                    ),
                    _ => (
                        "conditionally",
                        "Call the hook unconditionally and branch on its result",
                    ),
                };
                ValidationIssue::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    self.area(),
                    Location::new(ctx.relative_path.to_path_buf(), call.line, call.column)
                        .with_span(call.offset, call.name.len()),
                    format!("`{}` is called {where_}", call.name),
                )
                .with_fix(FixDescriptor::manual(
                    format!("Hoist `{}` to the top level", call.name),
                    [
                        step.to_string(),
                        "Check that the render output is unchanged".to_string(),
                    ],
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check;

    #[test]
    fn test_detects_hook_in_if() {
        let issues = check(
            &ConditionalHook::new(),
            "src/components/panel.tsx",
            r"export function Panel({ open }: PanelProps) {
  if (open) {
    const [x] = useState(0);
  }
  return <div />;
}
",
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, CODE);
        assert_eq!(issues[0].location.line, 3);
        assert!(!issues[0].is_fixable());
        assert!(issues[0].message.contains("conditionally"));
    }

    #[test]
    fn test_detects_loop_and_callback() {
        let issues = check(
            &ConditionalHook::new(),
            "src/components/list.tsx",
            r"export function List({ ids }: ListProps) {
  for (const id of ids) {
    useItem(id);
  }
  const onClick = () => useTracker();
  return <ul onClick={onClick} />;
}
",
        );
        let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "`useItem` is called inside a loop",
                "`useTracker` is called inside a nested function"
            ]
        );
    }

    #[test]
    fn test_top_level_hooks_pass() {
        let issues = check(
            &ConditionalHook::new(),
            "src/components/counter.tsx",
            r"export function Counter() {
  const [n, setN] = useState(0);
  useEffect(() => {}, [n]);
  return <b>{n}</b>;
}
",
        );
        assert!(issues.is_empty());
    }
}
