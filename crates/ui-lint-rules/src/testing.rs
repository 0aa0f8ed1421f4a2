//! Fixtures shared by rule tests.

use std::path::Path;

use ui_lint_core::{
    AnalyzedUnit, Conventions, FileContext, ProjectContext, ProjectRule, Rule, ValidationIssue,
};
use ui_lint_ts::SourceUnit;

pub(crate) const ROOT: &str = "/project";

pub(crate) fn analyzed(rel: &str, src: &str) -> AnalyzedUnit {
    let root = Path::new(ROOT);
    let unit = SourceUnit::parse(root.join(rel), src).expect("fixture should parse");
    AnalyzedUnit::new(unit, root)
}

pub(crate) fn check(rule: &impl Rule, rel: &str, src: &str) -> Vec<ValidationIssue> {
    check_with(rule, &Conventions::default(), rel, src)
}

pub(crate) fn check_with(
    rule: &impl Rule,
    conventions: &Conventions,
    rel: &str,
    src: &str,
) -> Vec<ValidationIssue> {
    let unit = analyzed(rel, src);
    let ctx = FileContext::new(&unit, conventions);
    rule.check(&ctx, &unit)
}

pub(crate) fn check_project(
    rule: &impl ProjectRule,
    conventions: &Conventions,
    files: &[(&str, &str)],
) -> Vec<ValidationIssue> {
    let units: Vec<AnalyzedUnit> = files.iter().map(|(rel, src)| analyzed(rel, src)).collect();
    let ctx = ProjectContext::new(Path::new(ROOT), conventions, &units);
    rule.check_project(&ctx)
}
