//! Presets run end to end over a temporary project.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tempfile::TempDir;
use ui_lint_core::{Analyzer, CheckResult, Config};
use ui_lint_rules::{rules_by_name, Preset, RuleSet};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "src/components/Counter.tsx",
        "export function Counter() {\n  const [n, setN] = useState(0);\n  return <button onClick={() => setN(n + 1)}>{n}</button>;\n}\n",
    );
    write(
        root,
        "src/components/title.tsx",
        "\"use client\";\nexport const Title = () => <h1>Hi</h1>;\n",
    );
    write(
        root,
        "src/hooks/use-toggle.ts",
        "export function useToggle() {\n  const [on, set] = useState(false);\n  return [on, () => set(!on)];\n}\n",
    );
    dir
}

fn run(root: &Path, config: Config, rules: RuleSet) -> CheckResult {
    rules
        .apply(Analyzer::builder().root(root).config(config))
        .build()
        .unwrap()
        .analyze()
        .unwrap()
}

fn codes(result: &CheckResult) -> BTreeSet<&str> {
    result.issues.iter().map(|i| i.code.as_str()).collect()
}

#[test]
fn strict_preset_covers_every_area() {
    let dir = project();
    let config = Config::default();
    let result = run(dir.path(), config.clone(), Preset::Strict.rules(&config));

    let found = codes(&result);
    for code in ["UL001", "UL002", "UL070", "UL071", "UL080"] {
        assert!(found.contains(code), "missing {code} in {found:?}");
    }
    assert!(result.failures.is_empty());
    assert_eq!(result.files_checked, 3);
}

#[test]
fn minimal_preset_only_checks_directives_and_hooks() {
    let dir = project();
    let config = Config::default();
    let result = run(dir.path(), config.clone(), Preset::Minimal.rules(&config));

    assert_eq!(codes(&result), BTreeSet::from(["UL001", "UL002"]));
    assert!(result.has_errors());
}

#[test]
fn config_disables_a_rule() {
    let dir = project();
    let config = Config::parse("[rules.kebab-case-filename]\nenabled = false\n").unwrap();
    let result = run(dir.path(), config.clone(), Preset::Recommended.rules(&config));

    assert!(!codes(&result).contains("UL071"));
    assert!(codes(&result).contains("UL001"));
}

#[test]
fn selection_by_code() {
    let dir = project();
    let config = Config::default();
    let result = run(dir.path(), config.clone(), rules_by_name(&["UL071"], &config));

    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].rule, "kebab-case-filename");
}
