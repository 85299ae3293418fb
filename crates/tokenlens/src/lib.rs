//! # tokenlens - Design token inspection for live pages
//!
//! Given a snapshot of a page (element tree, computed styles, stylesheets),
//! tokenlens answers "which design tokens govern this element?" and pushes
//! edited token values back into the source CSS.
//!
//! Resolution runs three strategies in order:
//!
//! 1. Direct detection: matched style rules whose declarations use `var()`.
//! 2. Variable map lookup: the element's computed values against a reverse
//!    index of the root's custom properties.
//! 3. Remote discovery: an optional async fallback asking an external
//!    service, guarded by a generation counter so stale answers never land.
//!
//! ```
//! use tokenlens::dom::{ComputedStyle, Document, ElementMeta};
//! use tokenlens::inspector::Inspector;
//! use tokenlens::scan::StyleSheetSource;
//!
//! let mut doc = Document::new();
//! doc.computed_mut(doc.root()).set("--color-primary", "#336699");
//!
//! let mut style = ComputedStyle::new();
//! style.set("color", "#336699");
//! let button = doc.create_element(ElementMeta::new("button"), style, doc.root());
//!
//! doc.add_stylesheet(StyleSheetSource::from_css(
//!     None,
//!     "button {\n  color: var(--color-primary);\n}\n",
//! ));
//!
//! let mut inspector = Inspector::new();
//! let refs = inspector.resolve_sync(&doc, button);
//! assert_eq!(refs[0].variable, "--color-primary");
//! ```

pub mod category;
pub mod commit;
pub mod discovery;
pub mod dom;
pub mod error;
pub mod generation;
pub mod inspector;
pub mod resolve;
pub mod scan;
pub mod selector;
pub mod session;
pub mod varmap;

pub use category::{Bucket, Category, category_of_property};
pub use commit::{
    ChangeItem, CommitOptions, CommitResult, CssFile, CssWorkspace, commit_changes, create_token,
};
pub use discovery::{DiscoveredToken, DiscoveryProvider, DiscoveryQuery};
pub use dom::{ComputedStyle, Document, ElementId, ElementMeta, ElementStates};
pub use error::{Result, TokenLensError};
pub use generation::RequestGeneration;
pub use inspector::Inspector;
pub use log;
pub use resolve::{VariableReference, group_by_category};
pub use scan::{RootCustomProperty, StyleRule, StyleSheetSource};
pub use session::{PendingChange, SessionChanges};
pub use varmap::{MapEntry, TokenMeta, VariableMap};
