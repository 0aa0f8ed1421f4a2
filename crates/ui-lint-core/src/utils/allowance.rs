//! Suppression comments.
//!
//! ```text
//! // ui-lint: allow(component-naming) reason="third-party API shape"
//! {/* ui-lint: allow(UL060, missing-dark-variant) */}
//! // ui-lint: allow-file(kebab-case-filename) reason="framework entry point"
//! ```
//!
//! `allow(...)` covers its own line and the line below. `allow-file(...)`
//! covers the whole unit but only counts in the leading comment block.
//! Selectors are rule names, issue codes or `all`.

const PREFIX: &str = "ui-lint:";

/// Whether an issue is suppressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Not suppressed.
    Denied,
    /// Suppressed, with the reason given in the comment.
    Allowed {
        /// Quoted `reason="..."`, if present.
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if suppressed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// The reason given, if suppressed with one.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Scope of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowScope {
    /// `allow(...)`: this line and the next.
    Line,
    /// `allow-file(...)`: the whole unit.
    File,
}

/// One parsed suppression comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowDirective {
    /// Where it applies.
    pub scope: AllowScope,
    /// Rule names or issue codes, as written.
    pub selectors: Vec<String>,
    /// Optional reason.
    pub reason: Option<String>,
}

impl AllowDirective {
    /// Whether the directive names `rule` or `code` (codes ignore case).
    #[must_use]
    pub fn covers(&self, rule: &str, code: &str) -> bool {
        self.selectors
            .iter()
            .any(|s| s == "all" || s == rule || s.eq_ignore_ascii_case(code))
    }
}

/// Suppressions of one unit, scanned once and queried per issue.
#[derive(Debug, Clone, Default)]
pub struct Suppressions {
    /// `(line, directive)` pairs, 1-indexed.
    lines: Vec<(usize, AllowDirective)>,
    file: Vec<AllowDirective>,
}

impl Suppressions {
    /// Scans `content` for directives.
    #[must_use]
    pub fn scan(content: &str) -> Self {
        let mut out = Self::default();
        let mut in_header = true;
        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            let is_comment = trimmed.starts_with("//")
                || trimmed.starts_with("/*")
                || trimmed.starts_with('*');
            if !trimmed.is_empty() && !is_comment {
                in_header = false;
            }
            let Some(directive) = parse_allow_directive(line) else {
                continue;
            };
            match directive.scope {
                AllowScope::File if in_header => out.file.push(directive),
                AllowScope::File => {}
                AllowScope::Line => out.lines.push((index + 1, directive)),
            }
        }
        out
    }

    /// Whether there are no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.file.is_empty()
    }

    /// Checks an issue of `rule`/`code` reported on `line`.
    #[must_use]
    pub fn check(&self, line: usize, rule: &str, code: &str) -> AllowCheck {
        self.lines
            .iter()
            .filter(|(at, _)| *at == line || *at + 1 == line)
            .map(|(_, d)| d)
            .chain(&self.file)
            .find(|d| d.covers(rule, code))
            .map_or(AllowCheck::Denied, |d| AllowCheck::Allowed {
                reason: d.reason.clone(),
            })
    }
}

/// Checks `content` for a directive covering `rule` on `line` or the line
/// above, or anywhere at file scope.
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, rule: &str) -> AllowCheck {
    Suppressions::scan(content).check(line, rule, "")
}

/// Parses a directive from a `//`, `/* */` or `{/* */}` comment on `line`.
/// A trailing comment after code counts.
#[must_use]
pub fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let body = comment_body(line)?;
    let rest = body.strip_prefix(PREFIX)?.trim_start();
    let (scope, rest) = if let Some(r) = rest.strip_prefix("allow-file(") {
        (AllowScope::File, r)
    } else {
        (AllowScope::Line, rest.strip_prefix("allow(")?)
    };

    let (list, tail) = rest.split_once(')')?;
    let selectors: Vec<String> = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if selectors.is_empty() {
        return None;
    }

    let reason = tail
        .trim()
        .strip_prefix("reason=")
        .and_then(|r| r.trim().strip_prefix('"'))
        .and_then(|r| r.split_once('"'))
        .map(|(reason, _)| reason.to_string());

    Some(AllowDirective {
        scope,
        selectors,
        reason,
    })
}

fn comment_body(line: &str) -> Option<&str> {
    let start = line.find("//").into_iter().chain(line.find("/*")).min()?;
    let comment = &line[start..];
    let body = match comment.strip_prefix("//") {
        Some(rest) => rest,
        None => {
            let rest = comment.strip_prefix("/*")?;
            rest.split_once("*/").map_or(rest, |(inner, _)| inner)
        }
    };
    Some(body.trim()).filter(|b| b.starts_with(PREFIX))
}
