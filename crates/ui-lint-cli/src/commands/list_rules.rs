//! List rules command implementation.

use ui_lint_rules::rule_catalogue;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<7} {:<28} {:<15} {:<11} Description",
        "Code", "Name", "Area", "Severity"
    );
    println!("{}", "-".repeat(100));

    for rule in rule_catalogue() {
        let scope = if rule.project { " (project)" } else { "" };
        println!(
            "{:<7} {:<28} {:<15} {:<11} {}{scope}",
            rule.code,
            rule.name,
            rule.area.as_str(),
            rule.severity.to_string(),
            rule.description
        );
    }

    println!("\nPresets:");
    println!("  recommended  - every rule except missing-component-test and nesting-depth (default)");
    println!("  strict       - every rule");
    println!("  minimal      - client-directive and conditional-hook (for gradual adoption)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  ui-lint check --rules client-directive,typed-props");
    println!("  ui-lint check --rules UL001,UL040");
}
