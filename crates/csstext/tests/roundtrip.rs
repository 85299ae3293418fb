//! Parse, mutate, and re-parse a stylesheet, checking that the layers agree
//! on what changed and that untouched text survives byte for byte.

use csstext::{extract_variables, insert_variable, update_variable, var_references};

const THEME: &str = "\
/* palette */
:root {
  --color-primary: oklch(0.6 0.2 250);
  --space-4: 16px;
}

.dark {
  --color-primary: oklch(0.4 0.15 250);
}

.card {
  padding: var(--space-4) var(--space-4);
  color: var(--color-primary);
}
";

#[test]
fn update_then_reparse_agrees_on_the_change() {
    let before = extract_variables(THEME);
    assert_eq!(before.len(), 3);

    let out = update_variable(THEME, "--space-4", "20px", None);
    assert!(out.changed);
    assert_eq!(out.occurrences, 1);

    let after = extract_variables(&out.content);
    assert_eq!(after.len(), before.len());

    let space = after.iter().find(|d| d.name == "--space-4").unwrap();
    assert_eq!(space.value, "20px");
    assert_eq!(space.selector, ":root");
    assert_eq!(space.line, before[1].line);

    // The mutated line is the only one that differs.
    let diffs: Vec<_> = THEME
        .lines()
        .zip(out.content.lines())
        .filter(|(a, b)| a != b)
        .collect();
    assert_eq!(diffs.len(), 1);
    assert_eq!(out.lines, vec![space.line]);
}

#[test]
fn scoped_update_then_reparse_keeps_the_other_scope() {
    let out = update_variable(THEME, "--color-primary", "red", Some(".dark"));
    assert!(out.changed);
    assert_eq!(out.occurrences, 2);

    let after = extract_variables(&out.content);
    let by_selector: Vec<_> = after
        .iter()
        .filter(|d| d.name == "--color-primary")
        .map(|d| (d.selector.as_str(), d.value.as_str()))
        .collect();
    assert_eq!(
        by_selector,
        vec![(":root", "oklch(0.6 0.2 250)"), (".dark", "red")]
    );
}

#[test]
fn inserted_declaration_is_visible_to_the_parser() {
    let grown = insert_variable(THEME, "--radius-md", "8px", ":root");
    let decls = extract_variables(&grown);
    let radius = decls.iter().find(|d| d.name == "--radius-md").unwrap();
    assert_eq!(radius.selector, ":root");
    assert_eq!(radius.value, "8px");

    // References in rule bodies are unaffected by the insertion.
    assert_eq!(
        var_references("var(--radius-md) var(--space-4)"),
        vec!["--radius-md", "--space-4"]
    );
}
