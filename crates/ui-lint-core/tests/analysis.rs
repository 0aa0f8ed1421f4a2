//! End-to-end analyzer runs over temporary projects.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use ui_lint_core::{
    AnalyzedUnit, Analyzer, Config, FileContext, FixDescriptor, Location, ProjectContext,
    ProjectRule, Rule, RuleArea, Severity, UnitRole, ValidationIssue,
};

/// Flags components whose props parameter carries no type.
struct UntypedProps;

impl Rule for UntypedProps {
    fn name(&self) -> &'static str {
        "untyped-props"
    }
    fn code(&self) -> &'static str {
        "X040"
    }
    fn area(&self) -> RuleArea {
        RuleArea::Typing
    }
    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let Some(props) = &unit.component.props else {
            return Vec::new();
        };
        if props.is_typed() {
            return Vec::new();
        }
        vec![ValidationIssue::new(
            self.code(),
            self.name(),
            Severity::Warning,
            self.area(),
            Location::new(ctx.relative_path.to_path_buf(), props.line, 1),
            "props are untyped",
        )
        .with_fix(FixDescriptor::transform("add-props-interface", [("name", unit.component.name().unwrap_or(""))]))]
    }
}

/// Counts components across the project.
struct ComponentCount;

impl ProjectRule for ComponentCount {
    fn name(&self) -> &'static str {
        "component-count"
    }
    fn code(&self) -> &'static str {
        "X999"
    }
    fn area(&self) -> RuleArea {
        RuleArea::Architecture
    }
    fn default_severity(&self) -> Severity {
        Severity::Suggestion
    }
    fn check_project(&self, ctx: &ProjectContext) -> Vec<ValidationIssue> {
        let count = ctx.units_with_role(UnitRole::Component).count();
        vec![ValidationIssue::new(
            self.code(),
            self.name(),
            self.default_severity(),
            self.area(),
            Location::new(PathBuf::from("."), 1, 1),
            format!("{count} components"),
        )]
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn unit_and_project_rules_run_together() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "src/components/card.tsx",
        "export function Card(props) {\n  return <div>{props.title}</div>;\n}\n",
    );
    write(
        tmp.path(),
        "src/components/badge.tsx",
        "interface BadgeProps { label: string }\nexport function Badge({ label }: BadgeProps) {\n  return <span>{label}</span>;\n}\n",
    );
    write(tmp.path(), "src/lib/math.ts", "export const add = (a: number, b: number) => a + b;\n");

    let analysis = Analyzer::builder()
        .root(tmp.path())
        .rule(UntypedProps)
        .project_rule(ComponentCount)
        .build()
        .unwrap()
        .analyze_units()
        .unwrap();

    assert_eq!(analysis.units.len(), 3);
    assert_eq!(analysis.result.files_checked, 3);

    let codes: Vec<&str> = analysis.result.issues.iter().map(|i| i.code.as_str()).collect();
    assert_eq!(codes, vec!["X999", "X040"]);

    let untyped = &analysis.result.issues[1];
    assert_eq!(untyped.location.file, PathBuf::from("src/components/card.tsx"));
    assert!(untyped.is_fixable());
    assert_eq!(analysis.result.issues[0].message, "2 components");
}

#[test]
fn config_excludes_and_rule_toggles_apply() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "src/legacy/old.tsx",
        "export function Old(props) {\n  return <div />;\n}\n",
    );
    let config = Config::parse(
        "[analyzer]\nexclude = [\"src/legacy\"]\n\n[rules.component-count]\nenabled = false\n",
    )
    .unwrap();

    let result = Analyzer::builder()
        .root(tmp.path())
        .config(config)
        .rule(UntypedProps)
        .project_rule(ComponentCount)
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(result.files_checked, 0);
    assert!(result.issues.is_empty());
}

#[test]
fn gitignored_files_are_skipped() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), ".gitignore", "scratch/\n");
    write(tmp.path(), "scratch/tmp.tsx", "export function T(props) { return <i />; }\n");
    write(tmp.path(), "src/a.tsx", "export function A(props) { return <i />; }\n");

    let analyzer = Analyzer::builder().root(tmp.path()).build().unwrap();
    assert_eq!(
        analyzer.inventory().unwrap().relative_files(),
        vec![PathBuf::from("src/a.tsx")]
    );

    let config = Config::parse("[analyzer]\nrespect_gitignore = false\n").unwrap();
    let analyzer = Analyzer::builder().root(tmp.path()).config(config).build().unwrap();
    assert_eq!(analyzer.inventory().unwrap().len(), 2);
}
