//! Component context extraction.
//!
//! [`extract_component_context`] walks a [`SourceUnit`] once and produces
//! the semantic fingerprint every rule works from. A unit without a
//! UI-rendering declaration still yields a context (with
//! `declaration == None`); that is the common case for non-component files.

use std::collections::BTreeSet;
use std::ops::Range;
use std::path::PathBuf;

use serde::Serialize;
use tree_sitter::Node;

use crate::query::{self, named_children, text};
use crate::route::RouteKind;
use crate::syntax::{SourceUnit, CLIENT_DIRECTIVE};

/// Browser-only globals whose member access marks client code.
pub const BROWSER_GLOBALS: &[&str] = &[
    "window",
    "document",
    "localStorage",
    "sessionStorage",
    "navigator",
];

/// How a component or hook is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclarationShape {
    /// `const Foo = () => ...`, `const Foo = function () {}`, or a
    /// `memo(...)`/`forwardRef(...)` wrapper.
    ArrowVar,
    /// `function Foo() {}`
    FunctionDecl,
}

impl DeclarationShape {
    /// Stable identifier used in fix contexts.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ArrowVar => "arrow-var",
            Self::FunctionDecl => "function-decl",
        }
    }
}

/// The UI-rendering declaration of a unit. Name and shape always travel
/// together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDeclaration {
    /// Declared identifier.
    pub name: String,
    /// Declaration shape.
    pub shape: DeclarationShape,
    /// 1-indexed line of the identifier.
    pub line: usize,
    /// 1-indexed column of the identifier.
    pub column: usize,
    /// Byte range of the identifier.
    pub name_range: Range<usize>,
    /// Whether the declaration itself carries `export`.
    pub exported: bool,
}

/// How the component receives its props.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "style", content = "name")]
pub enum PropsStyle {
    /// `({ a, b }) => ...`
    Destructured,
    /// `(props) => ...`
    Identifier(String),
}

/// The first parameter of the component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropsParameter {
    /// Destructured or named.
    pub style: PropsStyle,
    /// Annotated type text (parameter annotation, or the variable's
    /// `React.FC<...>` annotation).
    pub type_text: Option<String>,
    /// 1-indexed line of the parameter.
    pub line: usize,
}

impl PropsParameter {
    /// Whether the parameter carries a type.
    #[must_use]
    pub fn is_typed(&self) -> bool {
        self.type_text.is_some()
    }
}

/// Where a hook-convention call sits relative to its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookPlacement {
    /// Unconditionally at the top of a component or hook body.
    TopLevel,
    /// Inside an `if`, ternary, `switch`, short-circuit, or after an
    /// early return.
    Conditional,
    /// Inside a loop.
    Loop,
    /// Inside a function nested below the component or hook.
    NestedFunction,
    /// Outside any function.
    Module,
}

/// One `use*` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookCall {
    /// Callee name (`useState`).
    pub name: String,
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed column.
    pub column: usize,
    /// Byte offset of the call.
    pub offset: usize,
    /// Usage context.
    pub placement: HookPlacement,
}

impl HookCall {
    /// Whether this call breaks the unconditional-call convention.
    #[must_use]
    pub fn is_conditional(&self) -> bool {
        self.placement != HookPlacement::TopLevel
    }
}

/// Category of client-only construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveKind {
    /// A `use*` hook call.
    Hook,
    /// An `on*={...}` JSX event handler.
    EventHandler,
    /// Member access on a browser global.
    BrowserGlobal,
}

/// A client-only construct found in the unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientPrimitive {
    /// Category.
    pub kind: PrimitiveKind,
    /// Identifier (`useState`, `onClick`, `window`).
    pub name: String,
    /// 1-indexed line.
    pub line: usize,
}

/// What a default-exported declaration looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "shape")]
pub enum DefaultExportShape {
    /// `export default function Foo() {}` (or `class Foo`).
    FunctionDeclaration {
        /// Declared name.
        name: String,
    },
    /// `export default Foo;` where `Foo` is declared in this unit.
    LocalDeclaration {
        /// Referenced name.
        name: String,
        /// Declaration kind of `Foo`.
        kind: LocalKind,
    },
    /// `export default Foo;` where `Foo` is not declared here (imported).
    IdentifierAssignment {
        /// Referenced name.
        name: String,
    },
    /// Anything else (`export default () => ...`, `export default memo(X)`).
    Anonymous,
}

impl DefaultExportShape {
    /// Stable discriminant used in fix contexts.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FunctionDeclaration { .. } => "function-declaration",
            Self::LocalDeclaration { .. } => "local-declaration",
            Self::IdentifierAssignment { .. } => "identifier-assignment",
            Self::Anonymous => "anonymous",
        }
    }

    /// Exported name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::FunctionDeclaration { name }
            | Self::LocalDeclaration { name, .. }
            | Self::IdentifierAssignment { name } => Some(name),
            Self::Anonymous => None,
        }
    }
}

/// Kind of a local top-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocalKind {
    /// `function Foo() {}`
    Function,
    /// `const Foo = ...`
    Variable,
    /// `class Foo {}`
    Class,
}

/// Export surface of a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Whether a default export exists.
    pub has_default: bool,
    /// Line of the default export statement.
    pub default_line: Option<usize>,
    /// Shape of the default export.
    pub default_shape: Option<DefaultExportShape>,
    /// Value names exported by name (`*` for `export * from`).
    pub named: Vec<String>,
}

impl ExportSummary {
    /// Whether any named value export exists.
    #[must_use]
    pub fn has_named(&self) -> bool {
        !self.named.is_empty()
    }
}

/// Value of a `className` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum ClassValue {
    /// Plain string (or template without substitutions).
    Literal {
        /// Class list text.
        value: String,
    },
    /// Template literal with `${...}` substitutions.
    Template {
        /// Source text.
        raw: String,
    },
    /// `"a " + b` string concatenation.
    Concatenation {
        /// Source text.
        raw: String,
    },
    /// A call such as `cn("a", b)`.
    Call {
        /// Callee name.
        callee: String,
        /// String-literal arguments.
        literals: Vec<String>,
    },
    /// Any other expression.
    Dynamic {
        /// Source text.
        raw: String,
    },
}

/// One `className`/`class` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassAttribute {
    /// 1-indexed line of the value.
    pub line: usize,
    /// 1-indexed column of the value.
    pub column: usize,
    /// Byte range of the value expression.
    pub value_range: Range<usize>,
    /// Classified value.
    pub value: ClassValue,
}

/// Kind of a top-level type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeDeclKind {
    /// `interface X {}`
    Interface,
    /// `type X = ...`
    Alias,
}

/// A top-level type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDeclaration {
    /// Declared name.
    pub name: String,
    /// Interface or alias.
    pub kind: TypeDeclKind,
    /// 1-indexed line.
    pub line: usize,
    /// Whether it is exported.
    pub exported: bool,
}

/// Semantic snapshot of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentContext {
    /// Path the unit was parsed as.
    pub path: PathBuf,
    /// The first UI-rendering declaration, if any.
    pub declaration: Option<ComponentDeclaration>,
    /// `"use client"` sits in the prologue.
    pub uses_client_directive: bool,
    /// Line of the prologue directive.
    pub directive_line: Option<usize>,
    /// Line of a `"use client"` statement outside the prologue.
    pub misplaced_directive_line: Option<usize>,
    /// Client-only constructs, by line.
    pub client_primitives: Vec<ClientPrimitive>,
    /// The component's first parameter.
    pub props: Option<PropsParameter>,
    /// Destructured names unioned with `props.x` accesses.
    pub prop_names: BTreeSet<String>,
    /// A `*Props` interface or alias is declared in this unit.
    pub has_props_interface: bool,
    /// The component takes `children`.
    pub has_children: bool,
    /// The unit is a page (either router).
    pub is_page: bool,
    /// Routing file kind.
    pub route: Option<RouteKind>,
    /// Distinct hook names called anywhere in the unit.
    pub hook_calls_present: BTreeSet<String>,
    /// Every hook call with its placement.
    pub hook_calls: Vec<HookCall>,
    /// Export surface.
    pub exports: ExportSummary,
    /// `className` attributes.
    pub class_attributes: Vec<ClassAttribute>,
    /// Top-level interfaces and aliases.
    pub declared_types: Vec<TypeDeclaration>,
    /// Names bound by import statements.
    pub imported_names: BTreeSet<String>,
    /// Count of top-level declarations.
    pub top_level_declarations: usize,
}

impl ComponentContext {
    /// Whether a UI-rendering declaration was found.
    #[must_use]
    pub fn is_component(&self) -> bool {
        self.declaration.is_some()
    }

    /// Component name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.declaration.as_ref().map(|d| d.name.as_str())
    }

    /// Whether any client-only construct exists, including a routing file
    /// that the framework requires to be a client boundary.
    #[must_use]
    pub fn needs_client_boundary(&self) -> bool {
        !self.client_primitives.is_empty() || self.route.is_some_and(RouteKind::requires_client)
    }

    /// Hook calls that are not unconditional top-level calls.
    pub fn conditional_hook_calls(&self) -> impl Iterator<Item = &HookCall> {
        self.hook_calls.iter().filter(|h| h.is_conditional())
    }
}

/// A function-valued top-level declaration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate<'t> {
    pub(crate) name_node: Node<'t>,
    pub(crate) shape: DeclarationShape,
    pub(crate) function: Node<'t>,
    pub(crate) declarator: Option<Node<'t>>,
    pub(crate) exported: bool,
}

/// Extracts the [`ComponentContext`] of `unit`.
#[must_use]
pub fn extract_component_context(unit: &SourceUnit) -> ComponentContext {
    let src = unit.text();
    let candidates = candidates(unit);
    let component = candidates.iter().find(|c| renders_ui(c.function, src));

    let declaration = component.map(|c| ComponentDeclaration {
        name: text(c.name_node, src).to_string(),
        shape: c.shape,
        line: query::line(c.name_node),
        column: query::column(c.name_node),
        name_range: c.name_node.byte_range(),
        exported: c.exported,
    });

    let mut prop_names = BTreeSet::new();
    let props = component.and_then(|c| {
        collect_prop_names(c, src, &mut prop_names);
        props_parameter(c, src)
    });

    let declared_types = declared_types(unit);
    let has_props_interface = declared_types.iter().any(|t| t.name.ends_with("Props"));
    let has_children = prop_names.contains("children")
        || props
            .as_ref()
            .and_then(|p| p.type_text.as_deref())
            .is_some_and(|t| t.contains("PropsWithChildren"));

    let directives = unit.directives();
    let prologue = directives
        .iter()
        .find(|d| d.in_prologue && d.value == CLIENT_DIRECTIVE);
    let misplaced = directives
        .iter()
        .find(|d| !d.in_prologue && d.value == CLIENT_DIRECTIVE);

    let hook_calls = collect_hook_calls(unit);
    let hook_calls_present = hook_calls.iter().map(|h| h.name.clone()).collect();
    let client_primitives = collect_client_primitives(unit, &hook_calls);
    let route = RouteKind::from_path(unit.path());

    ComponentContext {
        path: unit.path().to_path_buf(),
        declaration,
        uses_client_directive: prologue.is_some(),
        directive_line: prologue.map(|d| d.line),
        misplaced_directive_line: misplaced.map(|d| d.line),
        client_primitives,
        props,
        prop_names,
        has_props_interface,
        has_children,
        is_page: route.is_some_and(RouteKind::is_page),
        route,
        hook_calls_present,
        hook_calls,
        exports: summarize_exports(unit),
        class_attributes: collect_class_attributes(unit),
        declared_types,
        imported_names: imported_names(unit),
        top_level_declarations: unit.top_level_declaration_count(),
    }
}

/// Returns `true` for `useX` identifiers (not the bare `use`).
#[must_use]
pub fn is_hook_name(name: &str) -> bool {
    name.strip_prefix("use")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

pub(crate) fn candidates(unit: &SourceUnit) -> Vec<Candidate<'_>> {
    let src = unit.text();
    let mut out = Vec::new();

    for stmt in unit.statements() {
        let exported = stmt.kind() == "export_statement";
        let decl = query::unwrap_export(stmt);

        match decl.kind() {
            "function_declaration" | "generator_function_declaration" => {
                if let Some(name_node) = decl.child_by_field_name("name") {
                    out.push(Candidate {
                        name_node,
                        shape: DeclarationShape::FunctionDecl,
                        function: decl,
                        declarator: None,
                        exported,
                    });
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                for declarator in named_children(decl) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    let Some(name_node) = declarator.child_by_field_name("name") else {
                        continue;
                    };
                    if name_node.kind() != "identifier" {
                        continue;
                    }
                    let Some(function) = declarator
                        .child_by_field_name("value")
                        .and_then(|v| function_value(v, src))
                    else {
                        continue;
                    };
                    out.push(Candidate {
                        name_node,
                        shape: DeclarationShape::ArrowVar,
                        function,
                        declarator: Some(declarator),
                        exported,
                    });
                }
            }
            "export_statement" => {
                // `export default function Foo() {}` parsed as a value.
                let named_function = decl
                    .child_by_field_name("value")
                    .filter(|v| matches!(v.kind(), "function_expression" | "function"))
                    .and_then(|v| v.child_by_field_name("name").map(|n| (v, n)));
                if let Some((function, name_node)) = named_function {
                    out.push(Candidate {
                        name_node,
                        shape: DeclarationShape::FunctionDecl,
                        function,
                        declarator: None,
                        exported,
                    });
                }
            }
            _ => {}
        }
    }

    out
}

/// Unwraps a declarator value to the function it binds, looking through
/// `memo(...)` and `forwardRef(...)`.
fn function_value<'t>(value: Node<'t>, src: &str) -> Option<Node<'t>> {
    match value.kind() {
        "arrow_function" | "function_expression" | "function" => Some(value),
        "parenthesized_expression" => named_children(value)
            .into_iter()
            .next()
            .and_then(|inner| function_value(inner, src)),
        "call_expression" if matches!(query::callee_name(value, src), Some("memo" | "forwardRef")) => {
            let args = value.child_by_field_name("arguments")?;
            named_children(args)
                .into_iter()
                .next()
                .and_then(|first| function_value(first, src))
        }
        _ => None,
    }
}

/// Whether any reachable return expression (or the expression body)
/// produces a UI node.
pub(crate) fn renders_ui(function: Node<'_>, src: &str) -> bool {
    let Some(body) = function.child_by_field_name("body") else {
        return false;
    };
    if body.kind() == "statement_block" {
        query::descendants_in_scope(body, &["return_statement"])
            .into_iter()
            .any(|ret| produces_ui(ret, src))
    } else {
        produces_ui(body, src)
    }
}

fn produces_ui(node: Node<'_>, src: &str) -> bool {
    query::descendants(node).into_iter().any(|n| {
        query::JSX_KINDS.contains(&n.kind())
            || (n.kind() == "call_expression" && query::callee_name(n, src) == Some("createElement"))
    })
}

/// First parameter pattern and its type annotation.
fn parameter_pattern(function: Node<'_>) -> Option<(Node<'_>, Option<Node<'_>>)> {
    if let Some(bare) = function.child_by_field_name("parameter") {
        return Some((bare, None));
    }
    let params = function.child_by_field_name("parameters")?;
    let first = named_children(params).into_iter().next()?;
    match first.kind() {
        "required_parameter" | "optional_parameter" => Some((
            first.child_by_field_name("pattern")?,
            first.child_by_field_name("type"),
        )),
        _ => Some((first, None)),
    }
}

fn props_parameter(candidate: &Candidate<'_>, src: &str) -> Option<PropsParameter> {
    let (pattern, annotation) = parameter_pattern(candidate.function)?;
    let style = match pattern.kind() {
        "object_pattern" => PropsStyle::Destructured,
        "identifier" => PropsStyle::Identifier(text(pattern, src).to_string()),
        _ => return None,
    };
    let variable_annotation = candidate
        .declarator
        .and_then(|d| d.child_by_field_name("type"));
    let type_text = annotation
        .or(variable_annotation)
        .map(|t| annotation_text(t, src));
    Some(PropsParameter {
        style,
        type_text,
        line: query::line(pattern),
    })
}

fn annotation_text(annotation: Node<'_>, src: &str) -> String {
    text(annotation, src)
        .trim_start_matches(':')
        .trim()
        .to_string()
}

fn collect_prop_names(candidate: &Candidate<'_>, src: &str, out: &mut BTreeSet<String>) {
    let Some((pattern, _)) = parameter_pattern(candidate.function) else {
        return;
    };
    match pattern.kind() {
        "object_pattern" => collect_pattern_names(pattern, src, out),
        "identifier" => {
            let param = text(pattern, src);
            let Some(body) = candidate.function.child_by_field_name("body") else {
                return;
            };
            for member in query::descendants_of_kind(body, &["member_expression"]) {
                let object = member.child_by_field_name("object");
                if object.is_some_and(|o| o.kind() == "identifier" && text(o, src) == param) {
                    if let Some(prop) = member.child_by_field_name("property") {
                        out.insert(text(prop, src).to_string());
                    }
                }
            }
            for declarator in query::descendants_of_kind(body, &["variable_declarator"]) {
                let value = declarator.child_by_field_name("value");
                let name = declarator.child_by_field_name("name");
                if let (Some(value), Some(name)) = (value, name) {
                    if value.kind() == "identifier"
                        && text(value, src) == param
                        && name.kind() == "object_pattern"
                    {
                        collect_pattern_names(name, src, out);
                    }
                }
            }
        }
        _ => {}
    }
}

fn collect_pattern_names(pattern: Node<'_>, src: &str, out: &mut BTreeSet<String>) {
    for child in named_children(pattern) {
        let name = match child.kind() {
            "shorthand_property_identifier_pattern" => Some(child),
            "pair_pattern" => child.child_by_field_name("key"),
            "object_assignment_pattern" => child.child_by_field_name("left"),
            _ => None,
        };
        if let Some(name) = name {
            out.insert(text(name, src).to_string());
        }
    }
}

fn collect_hook_calls(unit: &SourceUnit) -> Vec<HookCall> {
    let src = unit.text();
    unit.descendants_of_kind(&["call_expression"])
        .into_iter()
        .filter_map(|call| {
            let name = query::callee_name(call, src)?;
            if !is_hook_name(name) {
                return None;
            }
            Some(HookCall {
                name: name.to_string(),
                line: query::line(call),
                column: query::column(call),
                offset: call.start_byte(),
                placement: hook_placement(call, src),
            })
        })
        .collect()
}

fn is_field(parent: Node<'_>, field: &str, child: Node<'_>) -> bool {
    parent
        .child_by_field_name(field)
        .is_some_and(|f| f.id() == child.id())
}

fn hook_placement(call: Node<'_>, src: &str) -> HookPlacement {
    let Some(function) = query::enclosing_function(call) else {
        return HookPlacement::Module;
    };
    if query::enclosing_function(function).is_some() {
        return HookPlacement::NestedFunction;
    }

    let mut child = call;
    let mut current = call.parent();
    while let Some(node) = current {
        if node.id() == function.id() {
            break;
        }
        match node.kind() {
            "for_statement" | "for_in_statement" | "while_statement" | "do_statement" => {
                return HookPlacement::Loop;
            }
            "if_statement" | "ternary_expression" if !is_field(node, "condition", child) => {
                return HookPlacement::Conditional;
            }
            "switch_case" | "switch_default" | "catch_clause" | "finally_clause" => {
                return HookPlacement::Conditional;
            }
            "binary_expression" if is_field(node, "right", child) => {
                let operator = query::field_text(node, "operator", src);
                if matches!(operator, Some("&&" | "||" | "??")) {
                    return HookPlacement::Conditional;
                }
            }
            _ => {}
        }
        child = node;
        current = node.parent();
    }

    if follows_early_return(function, call) {
        HookPlacement::Conditional
    } else {
        HookPlacement::TopLevel
    }
}

/// Whether a statement before `call` in `function`'s body may return.
fn follows_early_return(function: Node<'_>, call: Node<'_>) -> bool {
    let Some(body) = function.child_by_field_name("body") else {
        return false;
    };
    if body.kind() != "statement_block" {
        return false;
    }
    named_children(body)
        .into_iter()
        .take_while(|stmt| stmt.end_byte() <= call.start_byte())
        .filter(|stmt| !query::FUNCTION_KINDS.contains(&stmt.kind()))
        .any(|stmt| !query::descendants_in_scope(stmt, &["return_statement"]).is_empty())
}

fn collect_client_primitives(unit: &SourceUnit, hook_calls: &[HookCall]) -> Vec<ClientPrimitive> {
    let src = unit.text();
    let mut out: Vec<ClientPrimitive> = hook_calls
        .iter()
        .map(|h| ClientPrimitive {
            kind: PrimitiveKind::Hook,
            name: h.name.clone(),
            line: h.line,
        })
        .collect();

    for attr in unit.descendants_of_kind(&["jsx_attribute"]) {
        let children = named_children(attr);
        let (Some(name), Some(value)) = (children.first(), children.get(1)) else {
            continue;
        };
        let name = text(*name, src);
        let is_handler = name
            .strip_prefix("on")
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase());
        if is_handler && value.kind() == "jsx_expression" {
            out.push(ClientPrimitive {
                kind: PrimitiveKind::EventHandler,
                name: name.to_string(),
                line: query::line(attr),
            });
        }
    }

    for member in unit.descendants_of_kind(&["member_expression"]) {
        let Some(object) = member.child_by_field_name("object") else {
            continue;
        };
        let name = text(object, src);
        if object.kind() == "identifier" && BROWSER_GLOBALS.contains(&name) {
            out.push(ClientPrimitive {
                kind: PrimitiveKind::BrowserGlobal,
                name: name.to_string(),
                line: query::line(member),
            });
        }
    }

    out.sort_by_key(|p| p.line);
    out
}

fn summarize_exports(unit: &SourceUnit) -> ExportSummary {
    let src = unit.text();
    let mut summary = ExportSummary::default();

    for stmt in unit.statements() {
        if stmt.kind() != "export_statement" {
            continue;
        }
        if query::has_token(stmt, "default") {
            summary.has_default = true;
            summary.default_line = Some(query::line(stmt));
            summary.default_shape = Some(default_shape(unit, stmt));
            continue;
        }
        if let Some(decl) = stmt.child_by_field_name("declaration") {
            summary.named.extend(declared_value_names(decl, src));
            continue;
        }
        if query::has_token(stmt, "type") {
            continue;
        }
        if query::has_token(stmt, "*") {
            summary.named.push("*".to_string());
        }
        for clause in named_children(stmt) {
            if clause.kind() != "export_clause" {
                continue;
            }
            for spec in named_children(clause) {
                let exported_as = spec
                    .child_by_field_name("alias")
                    .or_else(|| spec.child_by_field_name("name"))
                    .map(|n| text(n, src));
                match exported_as {
                    Some("default") => {
                        summary.has_default = true;
                        summary.default_line = Some(query::line(stmt));
                        summary.default_shape = Some(DefaultExportShape::Anonymous);
                    }
                    Some(name) => summary.named.push(name.to_string()),
                    None => {}
                }
            }
        }
    }

    summary
}

fn declared_value_names(decl: Node<'_>, src: &str) -> Vec<String> {
    match decl.kind() {
        "function_declaration"
        | "generator_function_declaration"
        | "class_declaration"
        | "abstract_class_declaration"
        | "enum_declaration" => decl
            .child_by_field_name("name")
            .map(|n| vec![text(n, src).to_string()])
            .unwrap_or_default(),
        "lexical_declaration" | "variable_declaration" => named_children(decl)
            .into_iter()
            .filter(|d| d.kind() == "variable_declarator")
            .filter_map(|d| d.child_by_field_name("name"))
            .map(|n| text(n, src).to_string())
            .collect(),
        _ => Vec::new(),
    }
}

fn default_shape(unit: &SourceUnit, stmt: Node<'_>) -> DefaultExportShape {
    let src = unit.text();
    if let Some(decl) = stmt.child_by_field_name("declaration") {
        return decl
            .child_by_field_name("name")
            .map_or(DefaultExportShape::Anonymous, |n| {
                DefaultExportShape::FunctionDeclaration {
                    name: text(n, src).to_string(),
                }
            });
    }
    let Some(value) = stmt.child_by_field_name("value") else {
        return DefaultExportShape::Anonymous;
    };
    match value.kind() {
        "identifier" => {
            let name = text(value, src).to_string();
            match local_declaration_kind(unit, &name) {
                Some(kind) => DefaultExportShape::LocalDeclaration { name, kind },
                None => DefaultExportShape::IdentifierAssignment { name },
            }
        }
        "function_expression" | "function" | "class" => value
            .child_by_field_name("name")
            .map_or(DefaultExportShape::Anonymous, |n| {
                DefaultExportShape::FunctionDeclaration {
                    name: text(n, src).to_string(),
                }
            }),
        _ => DefaultExportShape::Anonymous,
    }
}

/// Kind of the unexported top-level declaration named `name`.
#[must_use]
pub fn local_declaration_kind(unit: &SourceUnit, name: &str) -> Option<LocalKind> {
    let src = unit.text();
    unit.statements().into_iter().find_map(|stmt| {
        let kind = match stmt.kind() {
            "function_declaration" | "generator_function_declaration" => LocalKind::Function,
            "class_declaration" | "abstract_class_declaration" => LocalKind::Class,
            "lexical_declaration" | "variable_declaration" => LocalKind::Variable,
            _ => return None,
        };
        declared_value_names(stmt, src)
            .iter()
            .any(|n| n == name)
            .then_some(kind)
    })
}

fn collect_class_attributes(unit: &SourceUnit) -> Vec<ClassAttribute> {
    let src = unit.text();
    let mut out = Vec::new();
    for attr in unit.descendants_of_kind(&["jsx_attribute"]) {
        let children = named_children(attr);
        let (Some(name), Some(value)) = (children.first(), children.get(1)) else {
            continue;
        };
        if !matches!(text(*name, src), "className" | "class") {
            continue;
        }
        let expr = if value.kind() == "jsx_expression" {
            match named_children(*value).into_iter().next() {
                Some(inner) => inner,
                None => continue,
            }
        } else {
            *value
        };
        out.push(ClassAttribute {
            line: query::line(expr),
            column: query::column(expr),
            value_range: expr.byte_range(),
            value: classify_class_value(expr, src),
        });
    }
    out
}

fn classify_class_value(expr: Node<'_>, src: &str) -> ClassValue {
    let raw = || text(expr, src).to_string();
    match expr.kind() {
        "string" => ClassValue::Literal {
            value: query::string_value(expr, src).unwrap_or_default(),
        },
        "template_string" => {
            if query::descendants_of_kind(expr, &["template_substitution"]).is_empty() {
                let raw = text(expr, src);
                ClassValue::Literal {
                    value: raw.trim_matches('`').to_string(),
                }
            } else {
                ClassValue::Template { raw: raw() }
            }
        }
        "binary_expression"
            if query::field_text(expr, "operator", src) == Some("+")
                && !query::descendants_of_kind(expr, &["string", "template_string"]).is_empty() =>
        {
            ClassValue::Concatenation { raw: raw() }
        }
        "call_expression" => {
            let callee = expr
                .child_by_field_name("function")
                .map(|f| text(f, src).to_string())
                .unwrap_or_default();
            let literals = expr
                .child_by_field_name("arguments")
                .map(|args| {
                    named_children(args)
                        .into_iter()
                        .filter_map(|a| query::string_value(a, src))
                        .collect()
                })
                .unwrap_or_default();
            ClassValue::Call { callee, literals }
        }
        "parenthesized_expression" => named_children(expr)
            .into_iter()
            .next()
            .map_or_else(|| ClassValue::Dynamic { raw: raw() }, |inner| {
                classify_class_value(inner, src)
            }),
        _ => ClassValue::Dynamic { raw: raw() },
    }
}

fn declared_types(unit: &SourceUnit) -> Vec<TypeDeclaration> {
    let src = unit.text();
    unit.statements()
        .into_iter()
        .filter_map(|stmt| {
            let exported = stmt.kind() == "export_statement";
            let decl = query::unwrap_export(stmt);
            let kind = match decl.kind() {
                "interface_declaration" => TypeDeclKind::Interface,
                "type_alias_declaration" => TypeDeclKind::Alias,
                _ => return None,
            };
            let name = decl.child_by_field_name("name")?;
            Some(TypeDeclaration {
                name: text(name, src).to_string(),
                kind,
                line: query::line(decl),
                exported,
            })
        })
        .collect()
}

fn imported_names(unit: &SourceUnit) -> BTreeSet<String> {
    let src = unit.text();
    unit.descendants_of_kind(&["import_clause"])
        .into_iter()
        .flat_map(|clause| query::descendants_of_kind(clause, &["identifier"]))
        .map(|n| text(n, src).to_string())
        .collect()
}
