//! Custom-property declaration scanning.
//!
//! The scan is line-oriented. A small state machine tracks brace depth and
//! the selector text that opened the current block; declarations are only
//! recognized inside a block (a bare `--x: y;` at the top level is invalid
//! CSS and is ignored). Comments are stripped up front so their contents
//! cannot disturb either the depth tracking or the declaration matching.

use nom::{
    IResult,
    character::complete::{char, space0},
    sequence::delimited,
};

use crate::comments::strip_comments;
use crate::refs::parse_custom_name;

/// A custom-property declaration located in raw stylesheet text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedDeclaration {
    /// Property name including the leading `--`.
    pub name: String,
    /// Declared value, trimmed.
    pub value: String,
    /// 1-based line number in the original source.
    pub line: usize,
    /// Selector of the enclosing block, `:root` when the block had no
    /// capturable selector text.
    pub selector: String,
}

/// Brace-depth and selector bookkeeping for a line-by-line walk.
///
/// Call [`BlockTracker::advance`] with each line *after* inspecting it; the
/// tracker's state describes the position at the start of the line just fed,
/// which is the depth/selector a declaration on that line belongs to.
#[derive(Debug, Default)]
pub(crate) struct BlockTracker {
    depth: usize,
    pending: String,
    selector: String,
}

impl BlockTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Brace depth at the start of the next line.
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// Selector of the current block, `:root` when empty.
    pub(crate) fn selector(&self) -> &str {
        if self.selector.is_empty() {
            ":root"
        } else {
            &self.selector
        }
    }

    /// Folds one line into the tracker, character by character. A line may
    /// contain zero, one or several braces (including both the `{` and `}`
    /// of an empty rule).
    pub(crate) fn advance(&mut self, line: &str) {
        for c in line.chars() {
            match c {
                '{' => {
                    if self.depth == 0 {
                        self.selector = normalize_ws(&self.pending);
                        self.pending.clear();
                    }
                    self.depth += 1;
                }
                '}' => {
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth == 0 {
                        self.selector.clear();
                        self.pending.clear();
                    }
                }
                _ => {
                    if self.depth == 0 {
                        self.pending.push(c);
                    }
                }
            }
        }
        if self.depth == 0 {
            self.pending.push(' ');
        }
    }
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A declaration matched on a single line, with the character offsets needed
/// to rewrite the value slot in place.
#[derive(Debug)]
pub(crate) struct DeclMatch<'a> {
    pub(crate) name: &'a str,
    /// Trimmed value text.
    pub(crate) value: &'a str,
    /// Offset of the value slot (first non-whitespace char after `:`).
    pub(crate) value_start: usize,
}

fn decl_prefix(line: &str) -> IResult<&str, &str> {
    let (rest, _) = space0(line)?;
    let (rest, name) = parse_custom_name(rest)?;
    let (rest, _) = delimited(space0, char(':'), space0)(rest)?;
    Ok((rest, name))
}

/// Matches `^\s*(--[\w-]+)\s*:\s*([^;]+);` against a single line.
pub(crate) fn match_declaration(line: &str) -> Option<DeclMatch<'_>> {
    let (rest, name) = decl_prefix(line).ok()?;
    let value_start = line.len() - rest.len();
    let semi = rest.find(';')?;
    if semi == 0 {
        return None;
    }
    Some(DeclMatch {
        name,
        value: rest[..semi].trim(),
        value_start,
    })
}

/// Lists every custom-property declaration in `css`.
///
/// Declarations must be fully contained on one line, and a selector is
/// attributed from the text preceding its opening brace (multi-line selector
/// lists therefore collapse onto the `{` line). The result is recomputed on
/// every call; after mutating the source, parse again.
pub fn extract_variables(css: &str) -> Vec<ParsedDeclaration> {
    let clean = strip_comments(css);
    let mut tracker = BlockTracker::new();
    let mut out = Vec::new();

    for (idx, line) in clean.lines().enumerate() {
        if tracker.depth() > 0 {
            if let Some(m) = match_declaration(line) {
                out.push(ParsedDeclaration {
                    name: m.name.to_string(),
                    value: m.value.to_string(),
                    line: idx + 1,
                    selector: tracker.selector().to_string(),
                });
            }
        }
        tracker.advance(line);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SCOPES: &str = "\
:root {
  --color-primary: oklch(0.6 0.2 250);
}
.dark {
  --color-primary: oklch(0.4 0.15 250);
}
";

    #[test]
    fn extracts_declarations_with_selector_and_line() {
        let decls = extract_variables(TWO_SCOPES);
        assert_eq!(decls.len(), 2);

        assert_eq!(decls[0].name, "--color-primary");
        assert_eq!(decls[0].value, "oklch(0.6 0.2 250)");
        assert_eq!(decls[0].selector, ":root");
        assert_eq!(decls[0].line, 2);

        assert_eq!(decls[1].value, "oklch(0.4 0.15 250)");
        assert_eq!(decls[1].selector, ".dark");
        assert_eq!(decls[1].line, 5);
    }

    #[test]
    fn top_level_declarations_are_not_recognized() {
        let decls = extract_variables("--loose: 1;\n:root {\n  --kept: 2;\n}\n");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "--kept");
    }

    #[test]
    fn comments_do_not_produce_declarations_or_corrupt_depth() {
        let css = "\
/* .fake {
  --not-real: 1;
} */
.real {
  --real: 2; /* } */
}
";
        let decls = extract_variables(css);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "--real");
        assert_eq!(decls[0].selector, ".real");
        assert_eq!(decls[0].line, 5);
    }

    #[test]
    fn selector_lists_and_nested_blocks_keep_outer_attribution() {
        let css = "\
.a, .b {
  --x: 1;
}
@media (min-width: 600px) {
  .c {
    --y: 2;
  }
}
";
        let decls = extract_variables(css);
        assert_eq!(decls[0].selector, ".a, .b");
        // Media queries are just brace-counted; the inner block never reaches
        // depth 0, so attribution stays with the at-rule prelude.
        assert_eq!(decls[1].name, "--y");
        assert_eq!(decls[1].selector, "@media (min-width: 600px)");
    }

    #[test]
    fn empty_rule_on_one_line_is_handled() {
        let css = ".empty { }\n:root {\n  --a: 1;\n}\n";
        let decls = extract_variables(css);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].selector, ":root");
    }

    #[test]
    fn whitespace_in_selectors_is_normalized() {
        let css = ".card   >    .title {\n  --pad: 4px;\n}\n";
        assert_eq!(extract_variables(css)[0].selector, ".card > .title");
    }

    #[test]
    fn value_must_terminate_with_semicolon() {
        let css = ":root {\n  --unterminated: red\n}\n";
        assert!(extract_variables(css).is_empty());
    }
}
