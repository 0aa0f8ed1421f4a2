//! Healing runs end to end over temporary projects.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use ui_lint_core::{
    Analysis, AnalyzedUnit, Analyzer, CheckResult, Config, FixDescriptor, Location, RuleArea,
    Severity, ValidationIssue,
};
use ui_lint_heal::transform::{Args, TransformCx};
use ui_lint_heal::{
    ExitStatus, HealOptions, Healer, OperationKind, Outcome, TransformError, TransformRegistry,
    Transformer,
};
use ui_lint_rules::Preset;
use ui_lint_ts::SourceUnit;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

fn analyze(root: &Path, preset: Preset) -> Analysis {
    let config = Config::default();
    preset
        .rules(&config)
        .apply(Analyzer::builder().root(root).config(config.clone()))
        .build()
        .unwrap()
        .analyze_units()
        .unwrap()
}

fn heal(analysis: &Analysis, options: HealOptions) -> ui_lint_heal::HealingReport {
    Healer::new(options, Config::default().conventions).heal(analysis)
}

const COUNTER: &str = "export function Counter() {\n  const [n, setN] = useState(0);\n  return <button onClick={() => setN(n + 1)}>{n}</button>;\n}\n";
const TITLE: &str = "\"use client\";\nexport const Title = () => <h1>Hi</h1>;\n";
const CARD: &str = "export default function Card({ title }) {\n  return <div>{title}</div>;\n}\n";

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "src/components/Counter.tsx", COUNTER);
    write(root, "src/components/title.tsx", TITLE);
    write(root, "src/components/card.tsx", CARD);
    dir
}

#[test]
fn missing_directive_is_inserted_at_line_one() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "src/components/foo.tsx",
        "export function Foo() {\n  const [x, setX] = useState(0);\n  return <button onClick={() => setX(x + 1)}>{x}</button>;\n}\n",
    );

    let analysis = analyze(root, Preset::Recommended);
    assert!(analysis.result.issues.iter().any(|i| i.code == "UL001"));

    let report = heal(&analysis, HealOptions::default());
    assert_eq!(report.exit_status(), ExitStatus::Healed);

    let healed = read(root, "src/components/foo.tsx");
    assert!(healed.starts_with("\"use client\";\nexport function Foo() {\n"));
    assert_eq!(healed.matches("use client").count(), 1);
}

#[test]
fn redundant_directive_is_removed() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "src/components/title.tsx", TITLE);

    let report = heal(&analyze(root, Preset::Recommended), HealOptions::default());

    assert_eq!(report.stats.applied, 1);
    assert_eq!(
        read(root, "src/components/title.tsx"),
        "export const Title = () => <h1>Hi</h1>;\n"
    );
}

#[test]
fn lowercase_component_is_renamed_at_its_declaration_only() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let panel = "import { bar } from \"./bar\";\nexport const Panel = () => <section>{bar()}</section>;\n";
    write(root, "src/components/bar.tsx", "export const bar = () => <div />;\n");
    write(root, "src/components/panel.tsx", panel);

    let report = heal(&analyze(root, Preset::Recommended), HealOptions::default());

    assert!(report.fixed.iter().any(|i| i.code == "UL020"));
    assert_eq!(
        read(root, "src/components/bar.tsx"),
        "export const Bar = () => <div />;\n"
    );
    assert_eq!(read(root, "src/components/panel.tsx"), panel);
}

#[test]
fn rename_skips_a_same_named_local_declared_earlier() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "src/components/bar.tsx",
        "function helper() {\n  const bar = 1;\n  return bar;\n}\n\nconst bar = () => <div />;\nexport { bar, helper };\n",
    );

    let report = heal(&analyze(root, Preset::Recommended), HealOptions::default());

    assert!(report.fixed.iter().any(|i| i.code == "UL020"));
    let healed = read(root, "src/components/bar.tsx");
    assert!(healed.starts_with("function helper() {\n  const bar = 1;\n  return bar;\n}\n"));
    assert!(healed.contains("\nconst Bar = () => <div />;\n"));
}

#[test]
fn healed_unit_gets_a_barrel_entry() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "src/components/title.tsx", TITLE);

    let report = heal(
        &analyze(root, Preset::Recommended),
        HealOptions::default().reconcile_barrels(true),
    );

    assert_eq!(
        read(root, "src/components/index.ts"),
        "export * from \"./title\";\n"
    );
    assert!(report
        .derived
        .iter()
        .any(|op| op.kind == OperationKind::CreateFile && op.file.ends_with("index.ts")));
}

#[test]
fn class_list_is_sorted_and_gains_dark_variant() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "src/components/hero.tsx",
        "export const Hero = () => (\n  <div className=\"p-4 m-4 text-sm font-bold flex flex-col items-center justify-center bg-white\" />\n);\n",
    );

    let analysis = analyze(root, Preset::Recommended);
    let codes: Vec<&str> = analysis.result.issues.iter().map(|i| i.code.as_str()).collect();
    assert!(codes.contains(&"UL060"), "{codes:?}");
    assert!(codes.contains(&"UL062"), "{codes:?}");

    let report = heal(&analysis, HealOptions::default());
    assert!(report.failed.is_empty(), "{:?}", report.failed);

    assert!(read(root, "src/components/hero.tsx").contains(
        "className=\"flex flex-col items-center justify-center p-4 m-4 text-sm font-bold bg-white dark:bg-gray-900\""
    ));
}

#[test]
fn fix_limit_defers_the_rest() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    for name in ["a", "b", "c", "d", "e"] {
        let upper = name.to_uppercase();
        write(
            root,
            &format!("src/components/{name}.tsx"),
            &format!("\"use client\";\nexport const {upper} = () => <h1>{upper}</h1>;\n"),
        );
    }

    let report = heal(
        &analyze(root, Preset::Recommended),
        HealOptions::default().max_fix(Some(2)),
    );

    assert_eq!(report.stats.eligible, 5);
    assert_eq!(report.stats.applied, 2);
    assert_eq!(report.stats.remaining_issues, 3);
    assert_eq!(report.stats.fix_limit, Some(2));
    assert_eq!(
        report
            .operations()
            .filter(|op| op.kind == OperationKind::Fix && op.succeeded)
            .count(),
        2
    );
    let untouched = ["a", "b", "c", "d", "e"]
        .iter()
        .filter(|n| read(root, &format!("src/components/{n}.tsx")).starts_with("\"use client\""))
        .count();
    assert_eq!(untouched, 3);
}

#[test]
fn area_filter_limits_fixes() {
    let dir = project();
    let root = dir.path();

    let report = heal(
        &analyze(root, Preset::Recommended),
        HealOptions::default().areas(vec![RuleArea::Directive]),
    );

    assert!(report.fixed.iter().all(|i| i.code.starts_with("UL00")));
    assert!(root.join("src/components/Counter.tsx").exists());
    assert_eq!(read(root, "src/components/card.tsx"), CARD);
}

#[test]
fn barrel_of_a_touched_directory_lists_untouched_siblings() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "src/components/title.tsx", TITLE);
    write(
        root,
        "src/components/widget.tsx",
        "export function Widget() {\n  return <div />;\n}\n",
    );
    write(root, "src/components/notes.ts", "const draft = 1;\n");

    heal(
        &analyze(root, Preset::Recommended),
        HealOptions::default().reconcile_barrels(true),
    );

    assert_eq!(
        read(root, "src/components/index.ts"),
        "export * from \"./title\";\nexport * from \"./widget\";\n"
    );
}

#[test]
fn healing_twice_changes_nothing_the_second_time() {
    let dir = project();
    let root = dir.path();

    let first = heal(
        &analyze(root, Preset::Recommended),
        HealOptions::default().reconcile_barrels(true),
    );
    assert_eq!(first.exit_status(), ExitStatus::Healed);
    assert!(root.join("src/components/counter.tsx").exists());
    assert!(read(root, "src/components/card.tsx").contains("export function Card({ title }: CardProps)"));

    let analysis = analyze(root, Preset::Recommended);
    let second = heal(&analysis, HealOptions::default().reconcile_barrels(true));

    assert_eq!(second.stats.eligible, 0, "{:?}", analysis.result.issues);
    assert_eq!(second.operations().count(), 0);
    assert!(second.derived.is_empty());
    assert_eq!(second.exit_status(), ExitStatus::Clean);
}

#[test]
fn directives_match_client_boundaries_after_healing() {
    let dir = project();
    let root = dir.path();
    write(
        root,
        "src/components/late.tsx",
        "import { useState } from \"react\";\n\"use client\";\nexport function Late() {\n  const [v] = useState(1);\n  return <p>{v}</p>;\n}\n",
    );

    heal(&analyze(root, Preset::Recommended), HealOptions::default());

    let analysis = analyze(root, Preset::Recommended);
    for unit in analysis
        .units
        .iter()
        .filter(|u| u.hook.is_none() || u.component.is_component())
    {
        assert_eq!(
            unit.component.uses_client_directive,
            unit.component.needs_client_boundary(),
            "{}",
            unit.relative_path.display()
        );
    }
}

#[test]
fn dry_run_leaves_the_disk_alone() {
    let dir = project();
    let root = dir.path();

    let report = heal(
        &analyze(root, Preset::Recommended),
        HealOptions::default().dry_run(true).reconcile_barrels(true),
    );

    assert!(report.dry_run);
    assert!(report.stats.files_written > 0);
    assert!(report.results.iter().any(|r| r.is_changed()));
    assert_eq!(read(root, "src/components/Counter.tsx"), COUNTER);
    assert_eq!(read(root, "src/components/title.tsx"), TITLE);
    assert_eq!(read(root, "src/components/card.tsx"), CARD);
    assert!(!root.join("src/components/index.ts").exists());
}

#[test]
fn scaffolds_tests_only_when_enabled() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "src/components/badge.tsx", "export const Badge = () => <span />;\n");

    let analysis = analyze(root, Preset::Strict);
    let skipped = heal(&analysis, HealOptions::default());
    assert!(skipped.derived.is_empty());

    let report = heal(&analysis, HealOptions::default().scaffold_tests(true));
    let created: Vec<&PathBuf> = report
        .derived
        .iter()
        .filter(|op| op.kind == OperationKind::CreateFile && op.succeeded)
        .map(|op| &op.file)
        .collect();
    assert_eq!(created.len(), 1, "{:?}", report.derived);
    let text = fs::read_to_string(root.join(created[0])).unwrap();
    assert!(text.contains("render(<Badge />)"));
    assert_eq!(read(root, "src/components/badge.tsx"), "export const Badge = () => <span />;\n");
}

/// Drops the last closing brace, leaving the unit unbalanced.
struct Truncate;

impl Transformer for Truncate {
    fn id(&self) -> &'static str {
        "truncate"
    }

    fn apply(&self, cx: &mut TransformCx<'_>, _args: &Args) -> Result<(), TransformError> {
        let at = cx
            .unit
            .text()
            .rfind('}')
            .ok_or_else(|| TransformError::NotFound("closing brace".to_string()))?;
        cx.unit.replace_range(at..at + 1, "")?;
        Ok(())
    }
}

/// Panics, as a buggy plugin transformer would.
struct Explode;

impl Transformer for Explode {
    fn id(&self) -> &'static str {
        "explode"
    }

    fn apply(&self, _cx: &mut TransformCx<'_>, _args: &Args) -> Result<(), TransformError> {
        panic!("transformer bug");
    }
}

fn issue(path: &str, area: RuleArea, fix: FixDescriptor) -> ValidationIssue {
    ValidationIssue::new(
        "X001",
        "custom",
        Severity::Warning,
        area,
        Location::new(PathBuf::from(path), 1, 1),
        "custom issue",
    )
    .with_fix(fix)
}

fn manual_analysis(root: &Path, files: &[(&str, &str)], issues: Vec<ValidationIssue>) -> Analysis {
    let units = files
        .iter()
        .map(|(rel, text)| {
            write(root, rel, text);
            AnalyzedUnit::new(SourceUnit::parse(root.join(rel), *text).unwrap(), root)
        })
        .collect();
    Analysis {
        result: CheckResult {
            issues,
            files_checked: files.len(),
            ..CheckResult::default()
        },
        units,
        root: root.to_path_buf(),
    }
}

#[test]
fn broken_output_is_rejected_and_not_written() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let panel = "export function Panel({ a }: PanelProps) {\n  return <div>{a}</div>;\n}\n";
    let analysis = manual_analysis(
        root,
        &[("src/components/panel.tsx", panel)],
        vec![issue(
            "src/components/panel.tsx",
            RuleArea::Typing,
            FixDescriptor::transform("truncate", [("k", "v")]),
        )],
    );

    let mut registry = TransformRegistry::builtin();
    registry.register(Truncate);
    let report = Healer::new(HealOptions::default(), Config::default().conventions)
        .with_registry(registry)
        .heal(&analysis);

    assert_eq!(report.rejected.len(), 1);
    assert!(report.fixed.is_empty());
    assert_eq!(report.exit_status(), ExitStatus::Failed);
    let result = report.result_for(Path::new("src/components/panel.tsx")).unwrap();
    assert_eq!(result.outcome, Outcome::Rejected);
    assert_eq!(result.transformed_text, panel);
    assert_eq!(read(root, "src/components/panel.tsx"), panel);
}

#[test]
fn panicking_transformer_fails_only_its_fix() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let analysis = manual_analysis(
        root,
        &[(
            "src/components/title.tsx",
            "\"use client\";\nexport const Title = () => <h1>Hi</h1>;\n",
        )],
        vec![
            issue(
                "src/components/title.tsx",
                RuleArea::Typing,
                FixDescriptor::transform("explode", [("k", "v")]),
            ),
            issue(
                "src/components/title.tsx",
                RuleArea::Directive,
                FixDescriptor::RemoveLine { line: 1 },
            ),
        ],
    );

    let mut registry = TransformRegistry::builtin();
    registry.register(Explode);
    let report = Healer::new(HealOptions::default(), Config::default().conventions)
        .with_registry(registry)
        .heal(&analysis);

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.stats.applied, 1);
    assert_eq!(
        read(root, "src/components/title.tsx"),
        "export const Title = () => <h1>Hi</h1>;\n"
    );
}

#[test]
fn two_units_moving_onto_one_path_conflict() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let move_to = |path: &str| {
        issue(
            path,
            RuleArea::Architecture,
            FixDescriptor::transform("move-file", [("to", "src/components/shared.tsx")]),
        )
    };
    let analysis = manual_analysis(
        root,
        &[
            ("src/components/a.tsx", "export const A = () => <i />;\n"),
            ("src/components/b.tsx", "export const B = () => <b />;\n"),
        ],
        vec![
            move_to("src/components/a.tsx"),
            move_to("src/components/b.tsx"),
        ],
    );

    let report = heal(&analysis, HealOptions::default().reconcile_barrels(true));

    assert_eq!(report.conflicts.len(), 1);
    assert!(report
        .results
        .iter()
        .all(|r| r.outcome == Outcome::Conflict));
    assert!(report.fixed.is_empty());
    assert!(root.join("src/components/a.tsx").exists());
    assert!(root.join("src/components/b.tsx").exists());
    assert!(!root.join("src/components/shared.tsx").exists());
    assert!(!root.join("src/components/index.ts").exists());
}
