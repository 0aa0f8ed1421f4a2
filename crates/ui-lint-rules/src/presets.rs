//! Rule presets and name-based rule selection.

use std::fmt;
use std::str::FromStr;

use ui_lint_core::{
    AnalyzerBuilder, Config, ProjectRuleBox, RuleArea, RuleBox, Severity,
};

use crate::{
    client_directive, typed_props, ClassConcatenation, ClientDirective,
    ClientPage, ComponentNaming, ConditionalHook, HookNaming, HookReturn, KebabCaseFilename,
    LongClassList, MisplacedHookFile, MissingComponentTest, MissingDarkVariant, NestingDepth,
    PreferDestructuredProps, PreferNamedExport, RequiredDirectories, RouteDefaultExport,
    RouteFileNaming, SharedPropsType, TypedProps,
};

/// Preset configurations for ui-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Everything except test coverage and nesting depth.
    #[default]
    Recommended,
    /// Every rule.
    Strict,
    /// Directive placement and conditional hooks, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the rules for this preset, configured from `config`.
    #[must_use]
    pub fn rules(self, config: &Config) -> RuleSet {
        match self {
            Self::Recommended => recommended_rules(config),
            Self::Strict => strict_rules(config),
            Self::Minimal => minimal_rules(config),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "minimal" => Ok(Self::Minimal),
            other => Err(format!(
                "unknown preset '{other}' (expected recommended, strict or minimal)"
            )),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        })
    }
}

/// Per-unit and project rules selected together.
#[derive(Default)]
pub struct RuleSet {
    /// Per-unit rules.
    pub rules: Vec<RuleBox>,
    /// Project-wide rules.
    pub project_rules: Vec<ProjectRuleBox>,
}

impl RuleSet {
    /// Registers every rule with `builder`.
    #[must_use]
    pub fn apply(self, mut builder: AnalyzerBuilder) -> AnalyzerBuilder {
        for rule in self.rules {
            builder = builder.rule_box(rule);
        }
        for rule in self.project_rules {
            builder = builder.project_rule_box(rule);
        }
        builder
    }

    /// Number of rules in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len() + self.project_rules.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rule names, per-unit rules first.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.rules
            .iter()
            .map(|r| r.name())
            .chain(self.project_rules.iter().map(|r| r.name()))
            .collect()
    }

    fn retain(mut self, keep: impl Fn(&str) -> bool) -> Self {
        self.rules.retain(|r| keep(r.name()));
        self.project_rules.retain(|r| keep(r.name()));
        self
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet").field("names", &self.names()).finish()
    }
}

/// Returns every available rule, configured from `config`.
#[must_use]
pub fn all_rules(config: &Config) -> RuleSet {
    RuleSet {
        rules: vec![
            Box::new(ClientDirective::new()),
            Box::new(ConditionalHook::new()),
            Box::new(HookNaming::new()),
            Box::new(HookReturn::new()),
            Box::new(PreferDestructuredProps::new()),
            Box::new(ComponentNaming::new()),
            Box::new(PreferNamedExport::new()),
            Box::new(TypedProps::new()),
            Box::new(RouteDefaultExport::new()),
            Box::new(RouteFileNaming::new()),
            Box::new(ClientPage::new()),
            Box::new(LongClassList::from_config(
                config.rule_config(crate::long_class_list::NAME),
            )),
            Box::new(ClassConcatenation::new()),
            Box::new(MissingDarkVariant::new()),
            Box::new(KebabCaseFilename::new()),
            Box::new(MisplacedHookFile::new()),
        ],
        project_rules: vec![
            Box::new(SharedPropsType::new()),
            Box::new(RequiredDirectories::new()),
            Box::new(NestingDepth::from_config(
                config.rule_config(crate::nesting_depth::NAME),
            )),
            Box::new(MissingComponentTest::new()),
        ],
    }
}

/// Returns the recommended set of rules: everything except
/// `missing-component-test` (UL080) and `nesting-depth` (UL072).
#[must_use]
pub fn recommended_rules(config: &Config) -> RuleSet {
    all_rules(config).retain(|name| {
        name != crate::missing_component_test::NAME && name != crate::nesting_depth::NAME
    })
}

/// Returns the strict set of rules (all of them).
#[must_use]
pub fn strict_rules(config: &Config) -> RuleSet {
    all_rules(config)
}

/// Returns the minimal set of rules:
/// - `client-directive` (UL001-UL003)
/// - `conditional-hook` (UL010)
#[must_use]
pub fn minimal_rules(config: &Config) -> RuleSet {
    all_rules(config).retain(|name| {
        name == client_directive::NAME || name == crate::conditional_hook::NAME
    })
}

/// Secondary codes that select the rule emitting them.
const SECONDARY_CODES: &[(&str, &str)] = &[
    (client_directive::CODE_REDUNDANT, client_directive::NAME),
    (client_directive::CODE_MISPLACED, client_directive::NAME),
    (typed_props::CODE_UNTYPED, typed_props::NAME),
];

/// Selects rules by name or code (`client-directive`, `UL001`). Unknown
/// selectors are logged and skipped.
#[must_use]
pub fn rules_by_name(selectors: &[&str], config: &Config) -> RuleSet {
    let all = all_rules(config);
    let catalogue: Vec<(&str, &str)> = all
        .rules
        .iter()
        .map(|r| (r.name(), r.code()))
        .chain(all.project_rules.iter().map(|r| (r.name(), r.code())))
        .collect();

    let mut wanted: Vec<&str> = Vec::new();
    for selector in selectors {
        let found = catalogue
            .iter()
            .find(|(name, code)| name == selector || code.eq_ignore_ascii_case(selector))
            .map(|(name, _)| *name)
            .or_else(|| {
                SECONDARY_CODES
                    .iter()
                    .find(|(code, _)| code.eq_ignore_ascii_case(selector))
                    .map(|(_, name)| *name)
            });
        match found {
            Some(name) => wanted.push(name),
            None => tracing::warn!("Unknown rule: {}", selector),
        }
    }

    all.retain(|name| wanted.contains(&name))
}

/// Catalogue entry for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInfo {
    /// Primary code.
    pub code: &'static str,
    /// Kebab-case name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Convention area.
    pub area: RuleArea,
    /// Default severity.
    pub severity: Severity,
    /// Whether the rule runs over the whole project.
    pub project: bool,
}

/// Describes every available rule, ordered by code.
#[must_use]
pub fn rule_catalogue() -> Vec<RuleInfo> {
    let all = all_rules(&Config::default());
    let mut out: Vec<RuleInfo> = all
        .rules
        .iter()
        .map(|r| RuleInfo {
            code: r.code(),
            name: r.name(),
            description: r.description(),
            area: r.area(),
            severity: r.default_severity(),
            project: false,
        })
        .chain(all.project_rules.iter().map(|r| RuleInfo {
            code: r.code(),
            name: r.name(),
            description: r.description(),
            area: r.area(),
            severity: r.default_severity(),
            project: true,
        }))
        .collect();
    out.sort_by_key(|info| info.code);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_concatenation;

    #[test]
    fn test_preset_sizes() {
        let config = Config::default();
        assert_eq!(Preset::Strict.rules(&config).len(), 20);
        assert_eq!(Preset::Recommended.rules(&config).len(), 18);
        assert_eq!(
            Preset::Minimal.rules(&config).names(),
            vec!["client-directive", "conditional-hook"]
        );
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("Strict".parse::<Preset>(), Ok(Preset::Strict));
        assert!("lenient".parse::<Preset>().is_err());
    }

    #[test]
    fn test_rules_by_name_accepts_names_and_codes() {
        let set = rules_by_name(
            &["UL003", "ul061", "nesting-depth", "no-such-rule"],
            &Config::default(),
        );
        assert_eq!(
            set.names(),
            vec!["client-directive", "class-concatenation", "nesting-depth"]
        );
    }

    #[test]
    fn test_catalogue_is_sorted_and_unique() {
        let catalogue = rule_catalogue();
        assert_eq!(catalogue.first().map(|i| i.code), Some("UL001"));
        let mut codes: Vec<&str> = catalogue.iter().map(|i| i.code).collect();
        codes.dedup();
        assert_eq!(codes.len(), catalogue.len());
        assert!(catalogue
            .iter()
            .any(|i| i.name == class_concatenation::NAME && !i.project));
    }
}
