//! Runs the `ui-lint` binary against temporary projects.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn ui_lint(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ui-lint"))
        .args(args)
        .arg(root)
        .env("UI_LINT_CONFIG_DIR", root.join(".no-global"))
        .output()
        .unwrap()
}

const FOO: &str = "export function Foo() {\n  const [x, setX] = useState(0);\n  return <button onClick={() => setX(x + 1)}>{x}</button>;\n}\n";

#[test]
fn check_fails_on_errors() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/components/foo.tsx", FOO);

    let output = ui_lint(dir.path(), &["check", "--format", "json"]);

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let codes: Vec<&str> = json["issues"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|i| i["code"].as_str())
        .collect();
    assert!(codes.contains(&"UL001"));
}

#[test]
fn check_passes_when_fail_on_is_not_reached() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/components/title.tsx",
        "export const Title = () => <h1>Hi</h1>;\n",
    );

    let output = ui_lint(dir.path(), &["check", "--rules", "client-directive"]);

    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn heal_dry_run_reports_without_writing() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/components/foo.tsx", FOO);

    let output = ui_lint(dir.path(), &["heal", "--dry-run", "--format", "json"]);

    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["dry_run"], true);
    assert!(json["results"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["transformed_text"]
            .as_str()
            .is_some_and(|t| t.starts_with("\"use client\";\n"))));
    assert_eq!(
        fs::read_to_string(dir.path().join("src/components/foo.tsx")).unwrap(),
        FOO
    );
}

#[test]
fn heal_then_check_is_clean_for_directives() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/components/foo.tsx", FOO);

    let healed = ui_lint(dir.path(), &["heal"]);
    assert_eq!(healed.status.code(), Some(0));

    let output = ui_lint(dir.path(), &["check", "--rules", "client-directive"]);
    assert_eq!(output.status.code(), Some(0));
}
