//! Utility-class token helpers.
//!
//! Classification is by token text only, so everything here is a heuristic:
//! custom utilities and arbitrary values (`w-[37px]`) fall into "other".

/// Tailwind's named palette.
const PALETTE: &[&str] = &[
    "slate", "gray", "zinc", "neutral", "stone", "red", "orange", "amber", "yellow", "lime",
    "green", "emerald", "teal", "cyan", "sky", "blue", "indigo", "violet", "purple", "fuchsia",
    "pink", "rose",
];

/// Utilities that take a color.
const COLOR_PREFIXES: &[&str] = &[
    "bg", "text", "border", "ring", "divide", "outline", "fill", "stroke", "from", "via", "to",
    "placeholder", "decoration", "accent", "caret",
];

const LAYOUT: &[&str] = &[
    "block", "inline-block", "inline", "flex", "inline-flex", "grid", "inline-grid", "hidden",
    "contents", "table", "flow-root", "static", "fixed", "absolute", "relative", "sticky",
    "container", "visible", "invisible", "isolate",
];
const LAYOUT_PREFIXES: &[&str] = &[
    "inset-", "top-", "right-", "bottom-", "left-", "z-", "overflow-", "float-", "clear-",
    "object-", "order-",
];
const FLEX_PREFIXES: &[&str] = &[
    "flex-", "grow", "shrink", "basis-", "grid-", "col-", "row-", "gap-", "justify-", "items-",
    "content-", "self-", "place-", "space-",
];
const SPACING_PREFIXES: &[&str] = &[
    "p-", "px-", "py-", "pt-", "pr-", "pb-", "pl-", "ps-", "pe-", "m-", "mx-", "my-", "mt-",
    "mr-", "mb-", "ml-", "ms-", "me-",
];
const SIZING_PREFIXES: &[&str] = &[
    "w-", "h-", "min-w-", "min-h-", "max-w-", "max-h-", "size-", "aspect-",
];
const TYPOGRAPHY: &[&str] = &[
    "truncate", "uppercase", "lowercase", "capitalize", "italic", "underline", "line-through",
    "antialiased",
];
const TYPOGRAPHY_PREFIXES: &[&str] = &[
    "text-", "font-", "leading-", "tracking-", "whitespace-", "break-", "align-", "list-",
];
const BORDER_PREFIXES: &[&str] = &["border", "rounded", "ring", "divide", "outline"];
const EFFECT_PREFIXES: &[&str] = &[
    "shadow", "opacity-", "blur", "transition", "duration-", "ease-", "animate-", "cursor-",
    "pointer-events-", "select-", "transform", "scale-", "rotate-", "translate-",
];

/// Splits a class list on whitespace.
pub fn tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split_whitespace()
}

/// `(variants, utility)`: `md:hover:bg-white` → `("md:hover:", "bg-white")`.
#[must_use]
pub fn split_variants(token: &str) -> (&str, &str) {
    match token.rfind(':') {
        Some(i) => token.split_at(i + 1),
        None => ("", token),
    }
}

/// A parsed color utility such as `bg-blue-200` or `text-white/80`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorUtility<'a> {
    /// Utility prefix (`bg`).
    pub prefix: &'a str,
    /// Palette name, `white` or `black`.
    pub color: &'a str,
    /// Numeric shade for palette colors.
    pub shade: Option<u16>,
    /// `/opacity` suffix including the slash.
    pub opacity: &'a str,
}

/// Parses `utility` (without variants) as a color utility.
#[must_use]
pub fn parse_color(utility: &str) -> Option<ColorUtility<'_>> {
    let utility = utility.trim_start_matches('!');
    let (body, opacity) = match utility.find('/') {
        Some(i) => utility.split_at(i),
        None => (utility, ""),
    };
    COLOR_PREFIXES.iter().copied().find_map(|prefix| {
        let rest = body.strip_prefix(prefix)?.strip_prefix('-')?;
        if matches!(rest, "white" | "black") {
            return Some(ColorUtility {
                prefix,
                color: rest,
                shade: None,
                opacity,
            });
        }
        let (color, shade) = rest.rsplit_once('-')?;
        let shade: u16 = shade.parse().ok()?;
        let valid_shade =
            shade == 50 || shade == 950 || (shade % 100 == 0 && (100..=900).contains(&shade));
        (PALETTE.contains(&color) && valid_shade).then_some(ColorUtility {
            prefix,
            color,
            shade: Some(shade),
            opacity,
        })
    })
}

/// Dark-mode counterpart of a light color utility: named light colors map
/// to a fixed gray, shades up to 400 invert to 900, 500 and up to 100.
#[must_use]
pub fn dark_counterpart(color: &ColorUtility<'_>) -> String {
    let (name, shade) = match (color.color, color.shade) {
        ("white", _) => ("gray", 900),
        ("black", _) => ("gray", 100),
        (name, Some(shade)) if shade <= 400 => (name, 900),
        (name, _) => (name, 100),
    };
    format!("dark:{}-{name}-{shade}{}", color.prefix, color.opacity)
}

/// `dark:` additions for every unvariated color utility in `value` whose
/// prefix has no `dark:` counterpart yet. Deduplicated, in token order.
#[must_use]
pub fn missing_dark_variants(value: &str) -> Vec<String> {
    let dark_prefixes: Vec<&str> = tokens(value)
        .filter_map(|t| t.strip_prefix("dark:"))
        .filter_map(|u| parse_color(u).map(|c| c.prefix))
        .collect();

    let mut out: Vec<String> = Vec::new();
    for token in tokens(value) {
        let (variants, utility) = split_variants(token);
        if !variants.is_empty() {
            continue;
        }
        let Some(color) = parse_color(utility) else {
            continue;
        };
        if dark_prefixes.contains(&color.prefix) {
            continue;
        }
        let addition = dark_counterpart(&color);
        if !out.contains(&addition) {
            out.push(addition);
        }
    }
    out
}

fn starts_with_any(utility: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| utility.starts_with(p))
}

/// Sort bucket of a utility: layout, flex/grid, spacing, sizing,
/// typography, color, border, effects, other.
#[must_use]
pub fn category(utility: &str) -> u8 {
    let utility = utility.trim_start_matches(['!', '-']);
    if let Some(color) = parse_color(utility) {
        return if matches!(color.prefix, "border" | "ring" | "divide" | "outline") {
            6
        } else {
            5
        };
    }
    if LAYOUT.contains(&utility) || starts_with_any(utility, LAYOUT_PREFIXES) {
        0
    } else if starts_with_any(utility, FLEX_PREFIXES) {
        1
    } else if starts_with_any(utility, SPACING_PREFIXES) {
        2
    } else if starts_with_any(utility, SIZING_PREFIXES) {
        3
    } else if TYPOGRAPHY.contains(&utility) || starts_with_any(utility, TYPOGRAPHY_PREFIXES) {
        4
    } else if starts_with_any(utility, &["bg-", "from-", "via-", "to-"]) {
        5
    } else if starts_with_any(utility, BORDER_PREFIXES) {
        6
    } else if starts_with_any(utility, EFFECT_PREFIXES) {
        7
    } else {
        8
    }
}

/// Class list ordered by category, variant utilities last. Stable within a
/// bucket; whitespace is normalized to single spaces.
#[must_use]
pub fn sort_classes(value: &str) -> String {
    let mut keyed: Vec<(bool, u8, &str)> = tokens(value)
        .map(|t| {
            let (variants, utility) = split_variants(t);
            (!variants.is_empty(), category(utility), t)
        })
        .collect();
    keyed.sort_by_key(|(variant, category, _)| (*variant, *category));
    keyed
        .into_iter()
        .map(|(_, _, t)| t)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `value` is already in [`sort_classes`] order.
#[must_use]
pub fn is_sorted(value: &str) -> bool {
    sort_classes(value) == tokens(value).collect::<Vec<_>>().join(" ")
}
