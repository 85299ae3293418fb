//! In-place mutation of custom-property declarations.
//!
//! The mutator re-walks the source with the same brace/selector tracking as
//! [`crate::parse`], matching each line against the target declaration.
//! Matching runs over a comment-stripped shadow of the text (character
//! positions line up with the original), while untouched lines are emitted
//! from the original so comments elsewhere survive. A rewritten line keeps
//! its leading whitespace, property name and colon spacing; only the value
//! slot is replaced. Anything after the terminating `;` on that line is
//! dropped.
//!
//! None of these operations fail: a selector or variable that cannot be
//! found comes back as `changed: false` with byte-identical content, and the
//! caller decides whether that is worth reporting.

use log::debug;

use crate::comments::strip_comments;
use crate::parse::{BlockTracker, match_declaration};

/// Which declarations of the variable an update applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope<'a> {
    /// Update the first occurrence anywhere and stop scanning.
    First,
    /// Update every occurrence regardless of enclosing selector.
    All,
    /// Update occurrences whose enclosing selector equals this text exactly
    /// (string equality on the normalized selector, no specificity).
    Selector(&'a str),
}

/// Result of a mutation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// The full rewritten source (identical to the input when nothing
    /// changed).
    pub content: String,
    /// True iff at least one replacement occurred.
    pub changed: bool,
    /// Matching declarations encountered; see [`update_variable`] for the
    /// per-scope counting rules.
    pub occurrences: usize,
    /// 1-based line numbers of the lines actually rewritten, in source order.
    pub lines: Vec<usize>,
}

impl UpdateOutcome {
    fn unchanged(css: &str) -> Self {
        Self {
            content: css.to_string(),
            changed: false,
            occurrences: 0,
            lines: Vec::new(),
        }
    }
}

/// Rewrites the value of `--name` declarations in `css`.
///
/// `selector` selects the scope: `None` updates only the first occurrence
/// (and `occurrences` is 1 when found, 0 when not — the scan stops at the
/// hit), `Some("*")` updates every occurrence with `occurrences` the total
/// count, and any other `Some(s)` updates only declarations enclosed by the
/// selector `s` while still counting every occurrence in the file.
pub fn update_variable(css: &str, name: &str, new_value: &str, selector: Option<&str>) -> UpdateOutcome {
    let scope = match selector {
        None => Scope::First,
        Some("*") => Scope::All,
        Some(s) => Scope::Selector(s),
    };
    update_variable_scoped(css, name, new_value, scope)
}

/// [`update_variable`] with an explicit [`Scope`].
pub fn update_variable_scoped(css: &str, name: &str, new_value: &str, scope: Scope<'_>) -> UpdateOutcome {
    let clean = strip_comments(css);
    let mut tracker = BlockTracker::new();
    let mut occurrences = 0usize;
    let mut changed = false;
    let mut lines = Vec::new();
    let mut stop = false;

    let mut out: Vec<String> = Vec::new();
    for (idx, (orig, shadow)) in css.split('\n').zip(clean.split('\n')).enumerate() {
        let mut replacement = None;

        if !stop && tracker.depth() > 0 {
            if let Some(m) = match_declaration(shadow) {
                if m.name == name {
                    match scope {
                        Scope::First => {
                            occurrences += 1;
                            replacement = Some(rewrite_line(shadow, m.value_start, new_value));
                            stop = true;
                        }
                        Scope::All => {
                            occurrences += 1;
                            replacement = Some(rewrite_line(shadow, m.value_start, new_value));
                        }
                        Scope::Selector(wanted) => {
                            occurrences += 1;
                            if tracker.selector() == wanted {
                                replacement = Some(rewrite_line(shadow, m.value_start, new_value));
                            }
                        }
                    }
                }
            }
        }

        tracker.advance(shadow);

        match replacement {
            Some(line) => {
                changed = true;
                lines.push(idx + 1);
                out.push(line);
            }
            None => out.push(orig.to_string()),
        }
    }

    if !changed {
        debug!("update_variable: no declaration of {name} matched");
    }

    UpdateOutcome {
        content: out.join("\n"),
        changed,
        occurrences,
        lines,
    }
}

/// Leading whitespace + name + separator are kept verbatim (taken from the
/// shadow line, which is identical to the original unless a comment sat on
/// the declaration line); the value slot is replaced and re-terminated.
fn rewrite_line(line: &str, value_start: usize, new_value: &str) -> String {
    let mut rebuilt = String::with_capacity(value_start + new_value.len() + 1);
    rebuilt.push_str(&line[..value_start]);
    rebuilt.push_str(new_value);
    rebuilt.push(';');
    rebuilt
}

/// A `selector { ... }` block located in raw text.
struct Block {
    /// Offset just past the opening `{`.
    body_start: usize,
    /// Offset of the closing `}`.
    body_end: usize,
}

/// First textual occurrence of `selector` followed (modulo whitespace) by an
/// opening brace, with a body free of nested blocks. Later identically
/// selectored blocks are never considered.
fn find_block(css: &str, selector: &str) -> Option<Block> {
    if selector.is_empty() {
        return None;
    }
    let mut search = 0usize;
    while let Some(rel) = css[search..].find(selector) {
        let at = search + rel;
        let after = &css[at + selector.len()..];
        let ws = after.len() - after.trim_start().len();
        if after[ws..].starts_with('{') {
            let body_start = at + selector.len() + ws + 1;
            let close = css[body_start..].find('}')?;
            return Some(Block {
                body_start,
                body_end: body_start + close,
            });
        }
        search = at + selector.len();
    }
    None
}

/// True when `css` contains a block for `selector` as matched by the
/// mutator's single-pass scan.
pub fn contains_block(css: &str, selector: &str) -> bool {
    find_block(css, selector).is_some()
}

/// Adds a `name: value;` declaration for `selector`.
///
/// An existing block gets the declaration appended as its last line, using
/// the indentation of the block's existing declarations (two spaces when the
/// block is empty). When no block exists a new one is appended at the end of
/// the file.
pub fn insert_variable(css: &str, name: &str, value: &str, selector: &str) -> String {
    match find_block(css, selector) {
        Some(block) => {
            let body = &css[block.body_start..block.body_end];
            let indent = detect_indent(body).unwrap_or("  ");
            let close_indent = closing_indent(body);

            let mut out = String::with_capacity(css.len() + name.len() + value.len() + 8);
            out.push_str(&css[..block.body_start]);
            out.push_str(body.trim_end());
            out.push('\n');
            out.push_str(indent);
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str(";\n");
            out.push_str(close_indent);
            out.push_str(&css[block.body_end..]);
            out
        }
        None => {
            debug!("insert_variable: no block for {selector}, appending one");
            let mut out = css.to_string();
            out.push_str(&format!("\n{selector} {{\n  {name}: {value};\n}}\n"));
            out
        }
    }
}

/// Indentation of the first non-blank line in a block body.
fn detect_indent(body: &str) -> Option<&str> {
    body.split('\n')
        .find(|line| !line.trim().is_empty())
        .map(|line| &line[..line.len() - line.trim_start().len()])
}

/// Whitespace between the body's last newline and the closing brace, so the
/// `}` keeps its column.
fn closing_indent(body: &str) -> &str {
    let tail = match body.rfind('\n') {
        Some(pos) => &body[pos + 1..],
        None => return "",
    };
    if tail.trim().is_empty() { tail } else { "" }
}

/// Rewrites `property`'s value inside the `selector` block to `var(--name)`.
///
/// Only a real property position counts: the match must not be preceded by
/// an identifier character or `-` (so `color` cannot hit `background-color`
/// or the tail of a `--my-color` custom property) and must be followed by a
/// colon.
pub fn update_property_to_use_token(css: &str, selector: &str, property: &str, var_name: &str) -> UpdateOutcome {
    let Some(block) = find_block(css, selector) else {
        return UpdateOutcome::unchanged(css);
    };
    let body = &css[block.body_start..block.body_end];

    let mut search = 0usize;
    while let Some(rel) = body[search..].find(property) {
        let at = search + rel;
        let boundary_ok = match body[..at].chars().next_back() {
            None => true,
            Some(prev) => !(prev == '-' || prev == '_' || prev.is_alphanumeric()),
        };
        let after = &body[at + property.len()..];
        let ws = after.len() - after.trim_start().len();

        if boundary_ok && after[ws..].starts_with(':') {
            let after_colon = &after[ws + 1..];
            let pad = after_colon.len() - after_colon.trim_start().len();
            let value_start = at + property.len() + ws + 1 + pad;
            let Some(semi) = body[value_start..].find(';') else {
                break;
            };

            let mut new_body = String::with_capacity(body.len());
            new_body.push_str(&body[..value_start]);
            new_body.push_str(&format!("var({var_name})"));
            new_body.push_str(&body[value_start + semi..]);

            let mut content = String::with_capacity(css.len());
            content.push_str(&css[..block.body_start]);
            content.push_str(&new_body);
            content.push_str(&css[block.body_end..]);

            let line = css[..block.body_start + value_start].matches('\n').count() + 1;
            return UpdateOutcome {
                content,
                changed: true,
                occurrences: 1,
                lines: vec![line],
            };
        }
        search = at + property.len();
    }

    UpdateOutcome::unchanged(css)
}
