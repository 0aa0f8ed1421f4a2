//! Checks on transformed text before it is accepted.
//!
//! | Code  | Finding                                  | Blocking |
//! |-------|------------------------------------------|----------|
//! | PV001 | text no longer parses                    | yes      |
//! | PV002 | closing delimiter without an opener      | yes      |
//! | PV003 | opening delimiter never closed           | yes      |
//! | PV004 | new line made only of repeated closers   | no       |
//! | PV005 | fewer top-level declarations than before | yes      |

use std::fmt;

use serde::Serialize;
use ui_lint_ts::{query, SourceUnit};

/// One post-validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Finding code (`PV001`...).
    pub code: &'static str,
    /// 1-indexed line, where one applies.
    pub line: Option<usize>,
    /// What is wrong.
    pub message: String,
    /// Whether the transformed text must be discarded.
    pub blocking: bool,
}

impl Finding {
    fn blocking(code: &'static str, line: Option<usize>, message: String) -> Self {
        Self {
            code,
            line,
            message,
            blocking: true,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {line}): {}", self.code, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

/// Compares a unit before and after its fixes.
#[must_use]
pub fn post_validate(before: &SourceUnit, after: &SourceUnit) -> Vec<Finding> {
    let mut findings = Vec::new();

    if before.syntax_error().is_none() {
        if let Some((line, column)) = after.syntax_error() {
            findings.push(Finding::blocking(
                "PV001",
                Some(line),
                format!("transformed text does not parse (column {column})"),
            ));
        }
    }

    findings.extend(delimiter_balance(after));
    findings.extend(repeated_closers(before.text(), after.text()));

    let (was, now) = (
        before.top_level_declaration_count(),
        after.top_level_declaration_count(),
    );
    if now < was {
        findings.push(Finding::blocking(
            "PV005",
            None,
            format!("top-level declarations dropped from {was} to {now}"),
        ));
    }

    findings
}

fn closer_for(opener: &str) -> &'static str {
    match opener {
        "(" => ")",
        "[" => "]",
        _ => "}",
    }
}

/// Walks the delimiter tokens of the tree, ignoring tokens the parser
/// invented to recover from errors.
fn delimiter_balance(unit: &SourceUnit) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut open: Vec<(&str, usize)> = Vec::new();

    for node in query::descendants(unit.root()) {
        if node.is_named() || node.is_missing() {
            continue;
        }
        match node.kind() {
            kind @ ("(" | "[" | "{" | "${") => open.push((kind, query::line(node))),
            kind @ (")" | "]" | "}") => match open.last() {
                Some((opener, _)) if closer_for(opener) == kind => {
                    open.pop();
                }
                _ => findings.push(Finding::blocking(
                    "PV002",
                    Some(query::line(node)),
                    format!("unmatched `{kind}`"),
                )),
            },
            _ => {}
        }
    }

    findings.extend(open.into_iter().map(|(opener, line)| {
        Finding::blocking("PV003", Some(line), format!("`{opener}` is never closed"))
    }));
    findings
}

fn is_repeated_closer(line: &str) -> bool {
    let body = line.trim().trim_end_matches([';', ',']);
    let mut chars = body.chars();
    match chars.next() {
        Some(first @ ('}' | ')' | ']')) => body.len() >= 2 && chars.all(|c| c == first),
        _ => false,
    }
}

/// Lines like `}}` or `))` that the fixes added: a common symptom of a
/// rewrite that duplicated a closing delimiter the parser still accepts.
fn repeated_closers(before: &str, after: &str) -> Vec<Finding> {
    let count = |text: &str| text.lines().filter(|l| is_repeated_closer(l)).count();
    if count(after) <= count(before) {
        return Vec::new();
    }
    after
        .lines()
        .enumerate()
        .filter(|(_, l)| is_repeated_closer(l) && !before.lines().any(|b| b == *l))
        .map(|(i, l)| Finding {
            code: "PV004",
            line: Some(i + 1),
            message: format!("line `{}` repeats a closing delimiter", l.trim()),
            blocking: false,
        })
        .collect()
}
