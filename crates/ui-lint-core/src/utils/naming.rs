//! Identifier and file-name case conventions.

/// `^[A-Z][a-zA-Z0-9]*$`
#[must_use]
pub fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

/// `^[a-z0-9]+(-[a-z0-9]+)*$`
#[must_use]
pub fn is_kebab_case(name: &str) -> bool {
    !name.is_empty()
        && name
            .split('-')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()))
}

/// Splits an identifier into lowercase words at case changes and
/// separators (`_`, `-`, space, `.`).
fn words(name: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | ' ' | '.') {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        let boundary = match prev {
            Some(p) if c.is_ascii_uppercase() => {
                p.is_ascii_lowercase()
                    || p.is_ascii_digit()
                    || (p.is_ascii_uppercase()
                        && chars.get(i + 1).is_some_and(char::is_ascii_lowercase))
            }
            _ => false,
        };
        if boundary && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        current.push(c.to_ascii_lowercase());
        prev = Some(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// `user-card`, `user_card`, `userCard` → `UserCard`.
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    words(name)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + chars.as_str()
            })
        })
        .collect()
}

/// `UserCard`, `user_card`, `HTMLParser` → `user-card`, `html-parser`.
#[must_use]
pub fn to_kebab_case(name: &str) -> String {
    words(name).join("-")
}

/// Conventional hook name for `name`: `fetchUser` → `useFetchUser`.
#[must_use]
pub fn to_hook_name(name: &str) -> String {
    format!("use{}", to_pascal_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_grammar() {
        assert!(is_pascal_case("Foo"));
        assert!(is_pascal_case("UserCard2"));
        assert!(!is_pascal_case("bar"));
        assert!(!is_pascal_case("User_Card"));
        assert!(!is_pascal_case(""));
    }

    #[test]
    fn kebab_case_grammar() {
        assert!(is_kebab_case("user-card"));
        assert!(is_kebab_case("page2"));
        assert!(!is_kebab_case("UserCard"));
        assert!(!is_kebab_case("user--card"));
        assert!(!is_kebab_case("user_card"));
        assert!(!is_kebab_case("-card"));
    }

    #[test]
    fn converts_between_cases() {
        assert_eq!(to_pascal_case("bar"), "Bar");
        assert_eq!(to_pascal_case("user-card"), "UserCard");
        assert_eq!(to_pascal_case("user_card"), "UserCard");
        assert_eq!(to_kebab_case("UserCard"), "user-card");
        assert_eq!(to_kebab_case("HTMLParser"), "html-parser");
        assert_eq!(to_kebab_case("useAuth"), "use-auth");
        assert_eq!(to_kebab_case("Button2Group"), "button2-group");
    }

    #[test]
    fn hook_names() {
        assert_eq!(to_hook_name("fetchUser"), "useFetchUser");
        assert_eq!(to_hook_name("auth"), "useAuth");
    }
}
