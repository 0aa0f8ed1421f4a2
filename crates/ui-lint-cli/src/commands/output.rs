//! Shared output formatting for check and heal results.

use anyhow::Result;
use miette::GraphicalReportHandler;
use std::path::Path;
use ui_lint_core::{CheckResult, Confidence, FixDescriptor, IssueDiagnostic, Severity};
use ui_lint_heal::{ExitStatus, HealingReport, Operation, OperationKind, Outcome};

use crate::OutputFormat;

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Print check results in the specified format.
pub fn print(result: &CheckResult, root: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Fancy => print_fancy(result, root)?,
    }
    Ok(())
}

fn print_text(result: &CheckResult) {
    for issue in &result.issues {
        let severity_indicator = match issue.severity {
            Severity::Error => format!("{RED}error{RESET}"),
            Severity::Warning => format!("{YELLOW}warning{RESET}"),
            Severity::Suggestion => format!("{BLUE}suggestion{RESET}"),
        };

        println!(
            "{} {} at {}:{}:{}",
            issue.code,
            issue.rule,
            issue.location.file.display(),
            issue.location.line,
            issue.location.column,
        );
        let heuristic = if issue.confidence == Confidence::Heuristic {
            " (heuristic)"
        } else {
            ""
        };
        println!("  {severity_indicator}: {}{heuristic}", issue.message);
        match &issue.fix {
            Some(FixDescriptor::Manual { description, steps }) => {
                println!("  = help: {description}");
                for step in steps {
                    println!("          - {step}");
                }
            }
            Some(fix) => println!("  = fix: {}", fix.summary()),
            None => {}
        }
        println!();
    }

    for failure in &result.failures {
        println!(
            "{RED}failed{RESET} {} ({}): {}",
            failure.file.display(),
            match failure.stage {
                ui_lint_core::FailureStage::Parse => "parse",
                ui_lint_core::FailureStage::Rule => "rule",
            },
            failure.message
        );
    }

    print_summary(result);
}

fn print_summary(result: &CheckResult) {
    let (errors, warnings, suggestions) = result.count_by_severity();
    let summary_color = if errors > 0 {
        RED
    } else if warnings > 0 {
        YELLOW
    } else {
        GREEN
    };

    println!(
        "{summary_color}Found {errors} error(s), {warnings} warning(s), {suggestions} suggestion(s) in {} file(s); {} auto-fixable{RESET}",
        result.files_checked,
        result.fixable_count(),
    );
}

fn print_json(result: &CheckResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &CheckResult) {
    for issue in &result.issues {
        println!("{issue}");
    }
}

fn print_fancy(result: &CheckResult, root: &Path) -> Result<()> {
    let handler = GraphicalReportHandler::new();
    for issue in &result.issues {
        let name = issue.location.file.display().to_string();
        let mut diagnostic = IssueDiagnostic::from(issue);
        if let Ok(text) = std::fs::read_to_string(root.join(&issue.location.file)) {
            diagnostic = diagnostic.with_source(&name, text);
        }
        let mut out = String::new();
        handler.render_report(&mut out, &diagnostic)?;
        println!("{out}");
    }
    print_summary(result);
    Ok(())
}

/// Print a healing report in the specified format.
pub fn print_heal(report: &HealingReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Compact => print_heal_compact(report),
        OutputFormat::Text | OutputFormat::Fancy => print_heal_text(report),
    }
    Ok(())
}

fn mark(op: &Operation) -> String {
    if op.succeeded {
        format!("{GREEN}✓{RESET}")
    } else {
        format!("{RED}✗{RESET}")
    }
}

fn describe(op: &Operation) -> String {
    let mut line = match (&op.code, &op.rule) {
        (Some(code), Some(rule)) => format!("{code} {rule}: {}", op.description),
        _ => op.description.clone(),
    };
    if let Some(error) = &op.error {
        line.push_str(&format!(" ({error})"));
    }
    line
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Applied => "applied",
        Outcome::Unchanged => "unchanged",
        Outcome::Rejected => "rejected",
        Outcome::Conflict => "conflict",
        Outcome::WriteFailed => "write failed",
    }
}

fn print_heal_text(report: &HealingReport) {
    for result in report.results.iter().filter(|r| !r.operations.is_empty()) {
        if result.is_relocated() {
            println!(
                "{} -> {} [{}]",
                result.original_path.display(),
                result.final_path.display(),
                outcome_label(result.outcome)
            );
        } else {
            println!(
                "{} [{}]",
                result.original_path.display(),
                outcome_label(result.outcome)
            );
        }
        for op in &result.operations {
            println!("  {} {}", mark(op), describe(op));
        }
    }

    if !report.derived.is_empty() {
        println!();
        for op in &report.derived {
            let verb = match op.kind {
                OperationKind::CreateFile => "create",
                OperationKind::UpdateBarrel => "update",
                OperationKind::Relocate => "move",
                OperationKind::Fix => "fix",
            };
            println!("  {} {verb} {}: {}", mark(op), op.file.display(), describe(op));
        }
    }

    for rejected in &report.rejected {
        println!();
        println!(
            "{RED}Rejected{RESET} {}: nothing written",
            rejected.file.display()
        );
        for reason in &rejected.reasons {
            println!("  - {reason}");
        }
    }

    for conflict in &report.conflicts {
        println!();
        println!(
            "{RED}Conflict{RESET} at {}: {}",
            conflict.path.display(),
            conflict.reason
        );
        for unit in &conflict.units {
            println!("  - {}", unit.display());
        }
    }

    if !report.manual.is_empty() {
        println!();
        println!("Needs manual attention ({}):", report.manual.len());
        for manual in &report.manual {
            println!(
                "  {} {}:{}: {}",
                manual.issue.code,
                manual.issue.file.display(),
                manual.issue.line,
                manual.description
            );
            for step in &manual.steps {
                println!("      - {step}");
            }
        }
    }

    for warning in &report.warnings {
        println!("{YELLOW}warning{RESET}: {warning}");
    }

    println!();
    let stats = &report.stats;
    let color = match report.exit_status() {
        ExitStatus::Failed => RED,
        ExitStatus::Healed => GREEN,
        ExitStatus::Clean => BLUE,
    };
    println!(
        "{color}Fixed {} issue(s), {} failed, {} file(s) rejected, {} file(s) {}{RESET}",
        stats.applied,
        stats.failed,
        stats.rejected_files,
        stats.files_written,
        if report.dry_run { "would be written" } else { "written" },
    );
    if stats.remaining_issues > 0 {
        let limit = stats
            .fix_limit
            .map_or_else(String::new, |n| format!(" (limit {n})"));
        println!(
            "{} fixable issue(s) deferred{limit}; run heal again to continue",
            stats.remaining_issues
        );
    }
}

fn print_heal_compact(report: &HealingReport) {
    for op in report.operations().chain(report.derived.iter()) {
        println!(
            "{}: {} {}",
            op.file.display(),
            if op.succeeded { "ok" } else { "failed" },
            describe(op)
        );
    }
}
