//! Core types for validation issues, fix descriptors and results.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Improvement hint, does not fail a check by default.
    #[serde(alias = "info")]
    Suggestion,
    /// Convention drift that should be addressed.
    Warning,
    /// Violation that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Suggestion => write!(f, "suggestion"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suggestion" | "info" => Ok(Self::Suggestion),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// Convention area a rule belongs to. Drives healing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleArea {
    /// Props interfaces and parameter annotations.
    Typing,
    /// Component and hook declaration conventions.
    ComponentApi,
    /// Framework routing files.
    Routing,
    /// Directory and file layout.
    Architecture,
    /// Client boundary directive placement.
    Directive,
    /// Utility-class string hygiene.
    UtilityClass,
    /// Test presence.
    TestCoverage,
}

impl RuleArea {
    /// All areas in healing order.
    pub const ALL: [Self; 7] = [
        Self::Typing,
        Self::ComponentApi,
        Self::Routing,
        Self::Architecture,
        Self::Directive,
        Self::UtilityClass,
        Self::TestCoverage,
    ];

    /// Healing priority; lower runs first. Declarations other fixes rely on
    /// are introduced by typing fixes, so they go first.
    #[must_use]
    pub fn heal_priority(self) -> u8 {
        match self {
            Self::Typing => 0,
            Self::ComponentApi | Self::Routing | Self::Architecture => 1,
            Self::Directive => 2,
            Self::UtilityClass => 3,
            Self::TestCoverage => 4,
        }
    }

    /// Kebab-case identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::ComponentApi => "component-api",
            Self::Routing => "routing",
            Self::Architecture => "architecture",
            Self::Directive => "directive",
            Self::UtilityClass => "utility-class",
            Self::TestCoverage => "test-coverage",
        }
    }
}

impl std::fmt::Display for RuleArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RuleArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s.trim())
            .ok_or_else(|| format!("unknown rule area '{s}'"))
    }
}

/// How an issue was detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Derived from syntax-tree structure.
    #[default]
    Structural,
    /// Derived from token text (class names, comment markers).
    Heuristic,
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A labeled span for additional context in issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Location of the label.
    pub location: Location,
    /// Message for this label.
    pub message: String,
}

impl Label {
    /// Creates a new label.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// How to remediate one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FixDescriptor {
    /// Regex substitution over the unit text.
    ReplacePattern {
        /// Regular expression.
        pattern: String,
        /// Flags: `g` (all matches), `i`, `m`.
        flags: String,
        /// Replacement, `$1`-style group references allowed.
        replacement: String,
    },
    /// Insert a line before 1-indexed `line`.
    InsertLine {
        /// Target line.
        line: usize,
        /// Line text without newline.
        text: String,
    },
    /// Remove 1-indexed `line`.
    RemoveLine {
        /// Target line.
        line: usize,
    },
    /// Dispatch to a registered transformer.
    NamedTransform {
        /// Transformer identifier.
        transformer: String,
        /// Transformer arguments.
        #[serde(default)]
        context: BTreeMap<String, String>,
    },
    /// Human follow-up; never auto-applied.
    Manual {
        /// What needs to happen.
        description: String,
        /// Suggested steps.
        #[serde(default)]
        steps: Vec<String>,
    },
}

impl FixDescriptor {
    /// Creates a named transform with key/value context.
    #[must_use]
    pub fn transform<I, K, V>(transformer: impl Into<String>, context: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::NamedTransform {
            transformer: transformer.into(),
            context: context
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Creates a manual fix.
    #[must_use]
    pub fn manual<I, S>(description: impl Into<String>, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Manual {
            description: description.into(),
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the Healing Engine may apply this fix.
    #[must_use]
    pub fn is_automatic(&self) -> bool {
        !matches!(self, Self::Manual { .. })
    }

    /// Short tag for reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ReplacePattern { .. } => "replace-pattern",
            Self::InsertLine { .. } => "insert-line",
            Self::RemoveLine { .. } => "remove-line",
            Self::NamedTransform { .. } => "named-transform",
            Self::Manual { .. } => "manual",
        }
    }

    /// One-line human description.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::ReplacePattern { replacement, .. } => format!("replace with `{replacement}`"),
            Self::InsertLine { line, text } => format!("insert `{text}` at line {line}"),
            Self::RemoveLine { line } => format!("remove line {line}"),
            Self::NamedTransform { transformer, .. } => format!("apply `{transformer}`"),
            Self::Manual { description, .. } => description.clone(),
        }
    }
}

/// A convention issue found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Stable issue code (e.g., "UL001").
    pub code: String,
    /// Rule name (e.g., "client-directive").
    pub rule: String,
    /// Severity of this issue.
    pub severity: Severity,
    /// Convention area.
    pub area: RuleArea,
    /// Primary location.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Remediation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<FixDescriptor>,
    /// Additional labels for context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    /// Detection confidence.
    #[serde(default)]
    pub confidence: Confidence,
}

impl ValidationIssue {
    /// Creates a new issue without a fix.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        area: RuleArea,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            area,
            location,
            message: message.into(),
            fix: None,
            labels: Vec::new(),
            confidence: Confidence::Structural,
        }
    }

    /// Attaches a fix descriptor.
    #[must_use]
    pub fn with_fix(mut self, fix: FixDescriptor) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Marks the detection as heuristic.
    #[must_use]
    pub fn heuristic(mut self) -> Self {
        self.confidence = Confidence::Heuristic;
        self
    }

    /// Whether the Healing Engine may act on this issue.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        self.fix.as_ref().is_some_and(FixDescriptor::is_automatic)
    }

    /// Formats the issue for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        match &self.fix {
            Some(FixDescriptor::Manual { description, steps }) => {
                let _ = writeln!(output, "  = help: {description}");
                for step in steps {
                    let _ = writeln!(output, "    - {step}");
                }
            }
            Some(fix) => {
                let _ = writeln!(output, "  = fix: {}", fix.summary());
            }
            None => {}
        }
        output
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Converts a [`ValidationIssue`] to a miette diagnostic for rich display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct IssueDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
    #[source_code]
    source_code: NamedSource<String>,
}

impl IssueDiagnostic {
    /// Attaches the file text so the label can be rendered.
    #[must_use]
    pub fn with_source(mut self, name: &str, text: String) -> Self {
        if self.span.offset() + self.span.len() > text.len() {
            self.span = SourceSpan::from((0, 0));
        }
        self.source_code = NamedSource::new(name, text);
        self
    }
}

impl From<&ValidationIssue> for IssueDiagnostic {
    fn from(issue: &ValidationIssue) -> Self {
        Self {
            message: format!("[{}] {}", issue.code, issue.message),
            help: issue.fix.as_ref().map(FixDescriptor::summary),
            span: SourceSpan::from((issue.location.offset, issue.location.length)),
            label_message: issue.rule.clone(),
            source_code: NamedSource::new(issue.location.file.display().to_string(), String::new()),
        }
    }
}

/// Pipeline stage at which a unit failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    /// Reading or parsing the unit.
    Parse,
    /// A rule panicked while checking the unit.
    Rule,
}

/// A file-scoped failure that did not abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFailure {
    /// Path relative to the project root.
    pub file: PathBuf,
    /// Where it failed.
    pub stage: FailureStage,
    /// Rule name, for rule failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Error text.
    pub message: String,
}

/// Result of running a check.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CheckResult {
    /// All issues found, sorted by file and position.
    pub issues: Vec<ValidationIssue>,
    /// Units that could not be processed.
    pub failures: Vec<UnitFailure>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl CheckResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// Checks if any issues meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_issues_at(&self, severity: Severity) -> bool {
        self.issues.iter().any(|i| i.severity >= severity)
    }

    /// Returns issues filtered by area.
    #[must_use]
    pub fn by_area(&self, area: RuleArea) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.area == area).collect()
    }

    /// Number of issues the Healing Engine can act on.
    #[must_use]
    pub fn fixable_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_fixable()).count()
    }

    /// Counts issues by severity: (errors, warnings, suggestions).
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.issues.iter().filter(|i| i.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Suggestion),
        )
    }

    /// Adds issues and failures from another result.
    pub fn extend(&mut self, other: Self) {
        self.issues.extend(other.issues);
        self.failures.extend(other.failures);
        self.files_checked += other.files_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_issue(severity: Severity) -> ValidationIssue {
        ValidationIssue::new(
            "UL020",
            "component-naming",
            severity,
            RuleArea::ComponentApi,
            Location::new(PathBuf::from("src/components/bar.tsx"), 1, 7),
            "Component 'bar' should be PascalCase",
        )
    }

    #[test]
    fn severity_orders_and_parses() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Suggestion);
        assert_eq!("info".parse::<Severity>(), Ok(Severity::Suggestion));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn heal_priority_puts_typing_first_and_tests_last() {
        let mut areas = RuleArea::ALL.to_vec();
        areas.sort_by_key(|a| a.heal_priority());
        assert_eq!(areas.first(), Some(&RuleArea::Typing));
        assert_eq!(areas.last(), Some(&RuleArea::TestCoverage));
        assert!(RuleArea::Directive.heal_priority() < RuleArea::UtilityClass.heal_priority());
    }

    #[test]
    fn rule_area_round_trips_through_str() {
        for area in RuleArea::ALL {
            assert_eq!(area.as_str().parse::<RuleArea>(), Ok(area));
        }
    }

    #[test]
    fn manual_fixes_are_not_fixable() {
        let issue = make_issue(Severity::Error).with_fix(FixDescriptor::manual("Hoist it", ["a"]));
        assert!(!issue.is_fixable());

        let issue = make_issue(Severity::Error).with_fix(FixDescriptor::RemoveLine { line: 1 });
        assert!(issue.is_fixable());
        assert!(!make_issue(Severity::Error).is_fixable());
    }

    #[test]
    fn fix_descriptor_serializes_with_type_tag() {
        let fix = FixDescriptor::transform("named-export", [("name", "Hero")]);
        let value = toml::Value::try_from(&fix).expect("serializable");
        assert_eq!(value.get("type").and_then(|v| v.as_str()), Some("named-transform"));
        assert_eq!(
            value
                .get("context")
                .and_then(|c| c.get("name"))
                .and_then(|v| v.as_str()),
            Some("Hero")
        );
    }

    #[test]
    fn format_shows_fix_or_manual_steps() {
        let issue = make_issue(Severity::Error).with_fix(FixDescriptor::InsertLine {
            line: 1,
            text: "\"use client\";".into(),
        });
        assert!(issue.format().contains("= fix: insert `\"use client\";` at line 1"));

        let issue = make_issue(Severity::Error)
            .with_fix(FixDescriptor::manual("Move the hook call", ["Hoist above the branch"]));
        let text = issue.format();
        assert!(text.contains("= help: Move the hook call"));
        assert!(text.contains("- Hoist above the branch"));
    }

    #[test]
    fn display_is_compact() {
        let issue = make_issue(Severity::Warning);
        assert_eq!(
            issue.to_string(),
            "src/components/bar.tsx:1:7: warning [UL020] Component 'bar' should be PascalCase"
        );
    }

    #[test]
    fn counts_by_severity() {
        let mut result = CheckResult::new();
        result.issues.push(make_issue(Severity::Error));
        result.issues.push(make_issue(Severity::Suggestion));
        result.issues.push(make_issue(Severity::Suggestion));
        assert_eq!(result.count_by_severity(), (1, 0, 2));
        assert!(result.has_errors());
        assert!(result.has_issues_at(Severity::Warning));
        assert_eq!(result.by_area(RuleArea::ComponentApi).len(), 3);
    }
}
