//! Stylesheet scanning.
//!
//! Walks every stylesheet attached to a document and yields its style rules,
//! plus the custom properties visible on the root element's computed style.
//! Stylesheets the page cannot read (cross-origin) are skipped silently; the
//! audit is best-effort and callers treat a missing token as "not found",
//! never as an error.

use log::debug;

use crate::dom::Document;

/// One style rule from a stylesheet: raw selector text and its declarations
/// in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    pub selector_text: String,
    pub declarations: Vec<(String, String)>,
}

/// A stylesheet attached to the document.
#[derive(Clone, Debug, Default)]
pub struct StyleSheetSource {
    /// Location of the sheet, when it came from a file or URL.
    pub href: Option<String>,
    /// False for sheets blocked by cross-origin restrictions; their rules
    /// are never scanned.
    pub accessible: bool,
    pub rules: Vec<StyleRule>,
}

impl StyleSheetSource {
    /// Builds an accessible sheet from raw CSS text with a line-oriented rule
    /// scan: every top-level block becomes one [`StyleRule`] holding all of
    /// its single-line `property: value;` declarations.
    pub fn from_css(href: Option<&str>, css: &str) -> Self {
        let clean = csstext::strip_comments(css);
        let mut rules = Vec::new();
        let mut selector = String::new();
        let mut pending = String::new();
        let mut declarations: Vec<(String, String)> = Vec::new();
        let mut depth = 0usize;

        for line in clean.lines() {
            if depth > 0 {
                if let Some((name, value)) = split_declaration(line) {
                    declarations.push((name, value));
                }
            }
            for c in line.chars() {
                match c {
                    '{' => {
                        if depth == 0 {
                            selector = pending.split_whitespace().collect::<Vec<_>>().join(" ");
                            pending.clear();
                            declarations.clear();
                        }
                        depth += 1;
                    }
                    '}' => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 && !selector.is_empty() {
                            rules.push(StyleRule {
                                selector_text: std::mem::take(&mut selector),
                                declarations: std::mem::take(&mut declarations),
                            });
                        }
                    }
                    _ => {
                        if depth == 0 {
                            pending.push(c);
                        }
                    }
                }
            }
            if depth == 0 {
                pending.push(' ');
            }
        }

        Self {
            href: href.map(str::to_string),
            accessible: true,
            rules,
        }
    }

    /// Marks the sheet as blocked by cross-origin restrictions.
    pub fn denied(href: Option<&str>) -> Self {
        Self {
            href: href.map(str::to_string),
            accessible: false,
            rules: Vec::new(),
        }
    }
}

/// `property: value;` on a single line; custom properties included.
fn split_declaration(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    let colon = trimmed.find(':')?;
    let name = trimmed[..colon].trim_end();
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return None;
    }
    let rest = &trimmed[colon + 1..];
    let semi = rest.find(';')?;
    let value = rest[..semi].trim();
    if value.is_empty() {
        return None;
    }
    Some((name.to_string(), value.to_string()))
}

/// Lazily yields `(rule, stylesheet index)` for every rule in every
/// accessible stylesheet, in attachment and source order.
pub fn style_rules(doc: &Document) -> impl Iterator<Item = (&StyleRule, usize)> {
    doc.stylesheets
        .iter()
        .enumerate()
        .filter(|(_, sheet)| {
            if !sheet.accessible {
                debug!("skipping inaccessible stylesheet {:?}", sheet.href);
            }
            sheet.accessible
        })
        .flat_map(|(idx, sheet)| sheet.rules.iter().map(move |rule| (rule, idx)))
}

/// A custom property enumerated from the root element's computed style; the
/// source of truth for the variable map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootCustomProperty {
    /// Name, starting with `--`.
    pub name: String,
    pub value: String,
}

/// Custom properties visible on the computed style of the document root.
pub fn root_custom_properties(doc: &Document) -> Vec<RootCustomProperty> {
    let mut props: Vec<RootCustomProperty> = doc
        .computed(doc.root())
        .custom_properties()
        .map(|(name, value)| RootCustomProperty {
            name: name.to_string(),
            value: value.to_string(),
        })
        .collect();
    // The computed map is unordered; keep scans deterministic.
    props.sort_by(|a, b| a.name.cmp(&b.name));
    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn from_css_collects_rules_and_declarations() {
        let sheet = StyleSheetSource::from_css(
            Some("app.css"),
            ".card {\n  color: var(--fg);\n  padding: 16px;\n}\n.title { font-size: 20px; }\n",
        );
        assert_eq!(sheet.rules.len(), 2);
        assert_eq!(sheet.rules[0].selector_text, ".card");
        assert_eq!(
            sheet.rules[0].declarations,
            vec![
                ("color".to_string(), "var(--fg)".to_string()),
                ("padding".to_string(), "16px".to_string()),
            ]
        );
        assert_eq!(sheet.rules[1].selector_text, ".title");
    }

    #[test]
    fn inaccessible_sheets_are_skipped_without_error() {
        let mut doc = Document::new();
        doc.add_stylesheet(StyleSheetSource::denied(Some("https://cdn.example/x.css")));
        doc.add_stylesheet(StyleSheetSource::from_css(None, ".a { color: red; }\n"));
        let scanned: Vec<_> = style_rules(&doc).collect();
        assert_eq!(scanned.len(), 1);
        assert_eq!(scanned[0].1, 1);
    }

    #[test]
    fn root_custom_properties_come_from_the_root_computed_style() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.computed_mut(root).set("--space-4", "16px");
        doc.computed_mut(root).set("color", "black");
        let props = root_custom_properties(&doc);
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].name, "--space-4");
    }
}
