//! Extraction of `var()` references from property values.

use nom::{
    IResult,
    bytes::complete::{tag, take_while1},
    character::complete::space0,
    combinator::recognize,
    sequence::{preceded, tuple},
};

/// Parses a custom-property name: `--` followed by at least one word
/// character or dash.
pub(crate) fn parse_custom_name(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        tag("--"),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
    )))(input)
}

/// Returns the distinct custom-property names referenced via `var(--name)`
/// or `var(--name, fallback)` in a single CSS value string, in first-seen
/// order.
///
/// Only the name is extracted; fallback arguments are ignored entirely.
/// A `var(` with no matching `)` contributes nothing and scanning continues
/// past it. Never fails.
///
/// ```rust
/// let refs = csstext::var_references("0 var(--space-2) var(--space-2) var(--space-4)");
/// assert_eq!(refs, vec!["--space-2", "--space-4"]);
/// ```
pub fn var_references(value: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = value;

    while let Some(pos) = rest.find("var(") {
        let inner = &rest[pos + 4..];
        match matching_paren(inner) {
            Some(close) => {
                if let Ok((_, name)) = preceded(space0, parse_custom_name)(&inner[..close]) {
                    if !names.iter().any(|n| n == name) {
                        names.push(name.to_string());
                    }
                }
                rest = &inner[close + 1..];
            }
            // Unbalanced: skip this occurrence, keep scanning what follows so
            // a well-formed var() later in the value is still picked up.
            None => rest = inner,
        }
    }

    names
}

/// Index of the `)` closing an already-open parenthesis, respecting nesting
/// (fallbacks like `var(--a, rgb(0, 0, 0))` contain their own parens).
fn matching_paren(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_reference() {
        assert_eq!(var_references("var(--color-primary)"), vec!["--color-primary"]);
    }

    #[test]
    fn shorthand_with_repeats_dedupes_in_first_seen_order() {
        let refs = var_references("0 var(--space-2) var(--space-2) var(--space-4)");
        assert_eq!(refs, vec!["--space-2", "--space-4"]);
    }

    #[test]
    fn fallback_argument_is_ignored() {
        let refs = var_references("var(--fg, #333)");
        assert_eq!(refs, vec!["--fg"]);
    }

    #[test]
    fn fallback_with_nested_parens() {
        let refs = var_references("var(--fg, rgb(0, 0, 0)) solid");
        assert_eq!(refs, vec!["--fg"]);
    }

    #[test]
    fn plain_value_yields_nothing() {
        assert!(var_references("16px solid red").is_empty());
    }

    #[test]
    fn malformed_var_contributes_nothing() {
        assert!(var_references("var(--broken").is_empty());
        // ...but does not stop the scan.
        let refs = var_references("var(oops var(--ok)");
        assert_eq!(refs, vec!["--ok"]);
    }

    #[test]
    fn var_without_custom_name_is_skipped() {
        assert!(var_references("var(16px)").is_empty());
    }
}
