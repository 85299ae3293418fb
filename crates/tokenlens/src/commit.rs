//! Committing edited tokens back into source CSS.
//!
//! The commit path owns the boundary types of the dev-server HTTP contract
//! and the batch orchestration over a workspace of CSS files. Batches are
//! deliberately not transactional: each change is applied independently, a
//! failure on one never rolls back earlier writes, and the aggregate result
//! separates `committed` from `errors` so a UI can report "N of M
//! succeeded".

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One `{variable, value}` pair in a commit batch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChangeItem {
    pub variable: String,
    pub value: String,
}

/// Batch-level options.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CommitOptions {
    /// Scope passed through to the mutator: `None` updates the first
    /// occurrence, `"*"` every occurrence, anything else an exact selector.
    pub selector: Option<String>,
}

/// Body of `POST /commit`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub changes: Vec<ChangeItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<CommitOptions>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedChange {
    pub variable: String,
    pub file: String,
    pub line: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitError {
    pub variable: String,
    pub error: String,
}

/// Aggregate outcome of a batch; `success` iff `errors` is empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitResult {
    pub success: bool,
    pub committed: Vec<CommittedChange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<CommitError>,
}

/// Response of `GET /status`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub connected: bool,
    pub version: String,
}

/// Body of `POST /create-token`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTokenRequest {
    pub name: String,
    pub value: String,
    /// Selector block the token is declared in (e.g. `:root`).
    pub scope: String,
    /// When set, this property in the scope block is rewritten to
    /// `var(name)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTokenResponse {
    pub success: bool,
    pub file: String,
    pub line: usize,
}

/// One CSS source file held in memory between read and write-back.
#[derive(Clone, Debug)]
pub struct CssFile {
    pub path: PathBuf,
    pub text: String,
}

/// The set of CSS files a commit batch may touch.
#[derive(Debug, Default)]
pub struct CssWorkspace {
    pub files: Vec<CssFile>,
}

impl CssWorkspace {
    pub fn new(files: Vec<CssFile>) -> Self {
        Self { files }
    }

    /// Reads every `*.css` file directly inside `dir`, in name order.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "css"))
            .collect();
        entries.sort();
        for path in entries {
            let text = std::fs::read_to_string(&path)?;
            files.push(CssFile { path, text });
        }
        Ok(Self { files })
    }

    /// Writes every file back to disk.
    pub fn write_back(&self) -> Result<()> {
        for file in &self.files {
            std::fs::write(&file.path, &file.text)?;
        }
        Ok(())
    }
}

/// Applies a batch of token edits to the workspace. Each change lands in
/// the first file where the mutator reports a replacement; a change whose
/// variable exists nowhere becomes a per-item error and the batch moves on.
pub fn commit_changes(
    workspace: &mut CssWorkspace,
    changes: &[ChangeItem],
    options: &CommitOptions,
) -> CommitResult {
    let mut committed = Vec::new();
    let mut errors = Vec::new();

    for change in changes {
        match apply_change(workspace, change, options) {
            Some(done) => committed.push(done),
            None => errors.push(CommitError {
                variable: change.variable.clone(),
                error: format!("variable {} not found in any stylesheet", change.variable),
            }),
        }
    }

    CommitResult {
        success: errors.is_empty(),
        committed,
        errors,
    }
}

fn apply_change(
    workspace: &mut CssWorkspace,
    change: &ChangeItem,
    options: &CommitOptions,
) -> Option<CommittedChange> {
    for file in &mut workspace.files {
        let outcome = csstext::update_variable(
            &file.text,
            &change.variable,
            &change.value,
            options.selector.as_deref(),
        );
        if !outcome.changed {
            continue;
        }
        let line = outcome.lines.first().copied().unwrap_or(0);
        file.text = outcome.content;
        debug!(
            "committed {} -> {} in {:?}:{line}",
            change.variable, change.value, file.path
        );
        return Some(CommittedChange {
            variable: change.variable.clone(),
            file: file.path.display().to_string(),
            line,
        });
    }
    None
}

/// Creates a brand-new token in the workspace. The declaration lands in the
/// first file already containing the scope's block, falling back to the
/// first file; an empty workspace is the only failure.
pub fn create_token(workspace: &mut CssWorkspace, request: &CreateTokenRequest) -> CreateTokenResponse {
    if workspace.files.is_empty() {
        return CreateTokenResponse {
            success: false,
            file: String::new(),
            line: 0,
        };
    }

    let idx = workspace
        .files
        .iter()
        .position(|file| csstext::contains_block(&file.text, &request.scope))
        .unwrap_or(0);
    let file = &mut workspace.files[idx];

    file.text = csstext::insert_variable(&file.text, &request.name, &request.value, &request.scope);
    if let Some(property) = &request.property {
        let outcome =
            csstext::update_property_to_use_token(&file.text, &request.scope, property, &request.name);
        if outcome.changed {
            file.text = outcome.content;
        }
    }

    CreateTokenResponse {
        success: true,
        file: file.path.display().to_string(),
        line: declaration_line(&file.text, &request.name),
    }
}

/// Declaring line of a freshly inserted variable, for reporting.
fn declaration_line(css: &str, variable: &str) -> usize {
    csstext::extract_variables(css)
        .into_iter()
        .find(|decl| decl.name == variable)
        .map(|decl| decl.line)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> CssWorkspace {
        CssWorkspace::new(vec![
            CssFile {
                path: PathBuf::from("tokens.css"),
                text: ":root {\n  --color-primary: #336699;\n  --space-4: 16px;\n}\n".to_string(),
            },
            CssFile {
                path: PathBuf::from("theme.css"),
                text: ".dark {\n  --color-primary: #88aacc;\n}\n".to_string(),
            },
        ])
    }

    fn change(variable: &str, value: &str) -> ChangeItem {
        ChangeItem {
            variable: variable.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn batch_with_one_missing_variable_partially_succeeds() {
        let mut ws = workspace();
        let result = commit_changes(
            &mut ws,
            &[
                change("--color-primary", "red"),
                change("--space-4", "20px"),
                change("--does-not-exist", "x"),
            ],
            &CommitOptions::default(),
        );

        assert!(!result.success);
        assert_eq!(result.committed.len(), 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].variable, "--does-not-exist");
        // Earlier writes are not rolled back.
        assert!(ws.files[0].text.contains("--color-primary: red;"));
        assert!(ws.files[0].text.contains("--space-4: 20px;"));
    }

    #[test]
    fn committed_changes_report_file_and_line() {
        let mut ws = workspace();
        let result = commit_changes(
            &mut ws,
            &[change("--space-4", "24px")],
            &CommitOptions::default(),
        );
        assert!(result.success);
        assert_eq!(
            result.committed[0],
            CommittedChange {
                variable: "--space-4".to_string(),
                file: "tokens.css".to_string(),
                line: 3,
            }
        );
    }

    #[test]
    fn selector_option_scopes_the_update() {
        let mut ws = workspace();
        let result = commit_changes(
            &mut ws,
            &[change("--color-primary", "red")],
            &CommitOptions {
                selector: Some(".dark".to_string()),
            },
        );
        assert!(result.success);
        assert_eq!(result.committed[0].file, "theme.css");
        // The :root declaration in tokens.css is untouched.
        assert!(ws.files[0].text.contains("#336699"));
        assert!(ws.files[1].text.contains("--color-primary: red;"));
    }

    #[test]
    fn scoped_commit_reports_the_rewritten_line_not_the_first_declaration() {
        let mut ws = CssWorkspace::new(vec![CssFile {
            path: PathBuf::from("theme.css"),
            text: ":root {\n  --color-primary: #336699;\n}\n.dark {\n  --color-primary: #88aacc;\n}\n"
                .to_string(),
        }]);
        let result = commit_changes(
            &mut ws,
            &[change("--color-primary", "red")],
            &CommitOptions {
                selector: Some(".dark".to_string()),
            },
        );
        assert!(result.success);
        assert_eq!(result.committed[0].line, 5);
        assert!(ws.files[0].text.contains("#336699"));
    }

    #[test]
    fn create_token_prefers_a_file_with_the_scope_block() {
        let mut ws = workspace();
        let response = create_token(
            &mut ws,
            &CreateTokenRequest {
                name: "--color-accent".to_string(),
                value: "#ff8800".to_string(),
                scope: ".dark".to_string(),
                property: None,
            },
        );
        assert!(response.success);
        assert_eq!(response.file, "theme.css");
        assert!(ws.files[1].text.contains("--color-accent: #ff8800;"));
        assert_eq!(response.line, 3);
    }

    #[test]
    fn create_token_can_rewrite_a_property_to_reference_it() {
        let mut ws = CssWorkspace::new(vec![CssFile {
            path: PathBuf::from("app.css"),
            text: ".card {\n  padding: 16px;\n}\n".to_string(),
        }]);
        let response = create_token(
            &mut ws,
            &CreateTokenRequest {
                name: "--card-pad".to_string(),
                value: "16px".to_string(),
                scope: ".card".to_string(),
                property: Some("padding".to_string()),
            },
        );
        assert!(response.success);
        assert!(ws.files[0].text.contains("--card-pad: 16px;"));
        assert!(ws.files[0].text.contains("padding: var(--card-pad);"));
    }

    #[test]
    fn create_token_on_empty_workspace_fails_without_panicking() {
        let mut ws = CssWorkspace::default();
        let response = create_token(
            &mut ws,
            &CreateTokenRequest {
                name: "--x".to_string(),
                value: "1".to_string(),
                scope: ":root".to_string(),
                property: None,
            },
        );
        assert!(!response.success);
    }

    #[test]
    fn boundary_types_use_the_wire_field_names() {
        let request: ChangeRequest = serde_json::from_str(
            r#"{"changes": [{"variable": "--space-4", "value": "20px"}],
                "options": {"selector": ".dark"}}"#,
        )
        .unwrap();
        assert_eq!(request.changes[0].variable, "--space-4");
        assert_eq!(request.options.unwrap().selector.as_deref(), Some(".dark"));

        let result = CommitResult {
            success: false,
            committed: vec![CommittedChange {
                variable: "--space-4".to_string(),
                file: "tokens.css".to_string(),
                line: 3,
            }],
            errors: vec![CommitError {
                variable: "--missing".to_string(),
                error: "not found".to_string(),
            }],
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&result).unwrap()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["committed"][0]["file"], "tokens.css");
        assert_eq!(json["committed"][0]["line"], 3);
        assert_eq!(json["errors"][0]["variable"], "--missing");

        let status: StatusResponse =
            serde_json::from_str(r#"{"connected": true, "version": "0.1.0"}"#).unwrap();
        assert!(status.connected);

        let create: CreateTokenRequest = serde_json::from_str(
            r#"{"name": "--card-pad", "value": "16px", "scope": ".card", "property": "padding"}"#,
        )
        .unwrap();
        assert_eq!(create.scope, ".card");
        assert_eq!(create.property.as_deref(), Some("padding"));
        // Omitted optional fields deserialize, not error.
        let bare: ChangeRequest = serde_json::from_str(r#"{"changes": []}"#).unwrap();
        assert!(bare.options.is_none());
    }

    #[test]
    fn load_dir_and_write_back_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.css"), ":root {\n  --a: 1;\n}\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not css").unwrap();

        let mut ws = CssWorkspace::load_dir(dir.path()).unwrap();
        assert_eq!(ws.files.len(), 1);

        let result = commit_changes(&mut ws, &[change("--a", "2")], &CommitOptions::default());
        assert!(result.success);
        ws.write_back().unwrap();

        let text = std::fs::read_to_string(dir.path().join("a.css")).unwrap();
        assert!(text.contains("--a: 2;"));
    }
}
