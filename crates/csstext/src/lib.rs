//! # csstext - Line-oriented CSS source layer
//!
//! Reads and rewrites custom-property declarations in raw stylesheet text
//! while preserving the surrounding formatting. This crate deliberately does
//! *not* build a CSS syntax tree: it reconstructs just enough structure
//! (brace depth and the enclosing selector) by scanning text line by line.
//! At-rules, nested rules and anything else it does not understand are
//! treated as opaque text and copied through untouched.
//!
//! This crate provides:
//!
//! - **Parsing**: [`extract_variables`] lists every `--name: value;`
//!   declaration with its 1-based line number and enclosing selector
//! - **References**: [`var_references`] extracts the distinct custom-property
//!   names a value string pulls in via `var(--name, ...)`
//! - **Mutation**: [`update_variable`], [`insert_variable`] and
//!   [`update_property_to_use_token`] edit declarations in place
//!
//! ## Quick Start
//!
//! ```rust
//! use csstext::{extract_variables, update_variable};
//!
//! let source = r#"
//! :root {
//!   --color-primary: oklch(0.6 0.2 250);
//! }
//! "#;
//!
//! let decls = extract_variables(source);
//! assert_eq!(decls[0].selector, ":root");
//!
//! let outcome = update_variable(source, "--color-primary", "red", None);
//! assert!(outcome.changed);
//! assert!(outcome.content.contains("--color-primary: red;"));
//! ```
//!
//! ## Known Limitations
//!
//! These are contracts, not bugs: declarations and selectors must each fit on
//! a single line, selector lists spread over several lines attribute all
//! declarations to the line carrying the `{`, and trailing content after a
//! rewritten declaration's `;` is not preserved.

pub mod comments;
pub mod edit;
pub mod parse;
pub mod refs;

pub use comments::strip_comments;
pub use edit::{
    Scope, UpdateOutcome, contains_block, insert_variable, update_property_to_use_token,
    update_variable, update_variable_scoped,
};
pub use parse::{ParsedDeclaration, extract_variables};
pub use refs::var_references;
