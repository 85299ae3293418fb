//! Block comment stripping.
//!
//! Every scan in this crate runs over comment-stripped text so that a comment
//! containing `{`, `}` or a declaration-like string cannot corrupt brace-depth
//! tracking or produce false declarations. Comment characters are replaced
//! with spaces rather than removed: line numbers and character positions in
//! the stripped text map 1:1 onto the original source, which is what lets the
//! mutator rewrite lines in place.

/// Replaces the contents of every `/* ... */` comment with spaces.
///
/// Newlines inside comments are kept so line numbering is unaffected. An
/// unclosed comment blanks out everything to the end of the input.
pub fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut chars = css.chars().peekable();
    let mut in_comment = false;

    while let Some(c) = chars.next() {
        if in_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                out.push_str("  ");
                in_comment = false;
            } else if c == '\n' {
                out.push('\n');
            } else {
                out.push(' ');
            }
        } else if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            out.push_str("  ");
            in_comment = true;
        } else {
            out.push(c);
        }
    }

    out
}
