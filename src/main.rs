//! Demo: inspect a small hand-built page snapshot, edit a token, and show
//! the rewritten CSS.

use tokenlens::commit::{ChangeItem, CommitOptions, CssFile, CssWorkspace, commit_changes};
use tokenlens::dom::{ComputedStyle, Document, ElementMeta};
use tokenlens::inspector::Inspector;
use tokenlens::resolve::group_by_category;
use tokenlens::scan::StyleSheetSource;

const TOKENS_CSS: &str = "\
:root {
  --color-primary: oklch(0.6 0.2 250);
  --space-4: 16px;
  --radius-md: 8px;
}

button.primary {
  color: var(--color-primary);
  padding: var(--space-4);
  border-radius: var(--radius-md);
}
";

fn demo_document() -> (Document, tokenlens::dom::ElementId) {
    let mut doc = Document::new();
    let root = doc.root();
    doc.computed_mut(root).set("--color-primary", "oklch(0.6 0.2 250)");
    doc.computed_mut(root).set("--space-4", "16px");
    doc.computed_mut(root).set("--radius-md", "8px");

    let body = doc.create_element(ElementMeta::new("body"), ComputedStyle::new(), root);

    let mut style = ComputedStyle::new();
    style.set("--color-primary", "oklch(0.6 0.2 250)");
    style.set("color", "oklch(0.6 0.2 250)");
    style.set("padding", "16px");
    style.set("border-radius", "8px");
    let button = doc.create_element(
        ElementMeta::new("button").with_class("primary"),
        style,
        body,
    );

    doc.add_stylesheet(StyleSheetSource::from_css(Some("tokens.css"), TOKENS_CSS));
    (doc, button)
}

#[tokio::main]
async fn main() {
    let (doc, button) = demo_document();

    let mut inspector = Inspector::new();
    let refs = match inspector.inspect(&doc, button).await {
        Some(refs) => refs,
        None => return,
    };

    println!("tokens on {}:", doc.path_of(button));
    for (category, group) in group_by_category(&refs) {
        println!("  {category:?}");
        for r in group {
            println!("    {} = {} (via {})", r.variable, r.current_value, r.property);
        }
    }

    let mut workspace = CssWorkspace::new(vec![CssFile {
        path: "tokens.css".into(),
        text: TOKENS_CSS.to_string(),
    }]);
    let result = commit_changes(
        &mut workspace,
        &[ChangeItem {
            variable: "--space-4".to_string(),
            value: "20px".to_string(),
        }],
        &CommitOptions::default(),
    );

    println!("\ncommit success: {}", result.success);
    for change in &result.committed {
        println!("  {} updated at {}:{}", change.variable, change.file, change.line);
    }
    println!("\n{}", workspace.files[0].text);
}
