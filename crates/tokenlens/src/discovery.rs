//! Remote token discovery fallback.
//!
//! Last resort, used only when both synchronous strategies come up empty: a
//! structured query goes to an external text-generation service, one request
//! per adjustment category until one yields tokens. The transport is behind
//! [`DiscoveryProvider`] so hosts can plug in an HTTP client and tests can
//! plug in fakes. Every failure mode — transport error, bad status,
//! unparsable response — degrades to an empty result; nothing here may crash
//! the resolution pipeline. No timeout is enforced: a hung request holds
//! this path until the caller's generation counter moves on.

use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolve::VariableReference;

/// Transport-level discovery failures. All of them are caught at the call
/// site and converted to "no tokens".
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("discovery transport error: {0}")]
    Transport(String),

    #[error("discovery service returned status {0}")]
    Status(u16),
}

/// The categories a discovery pass asks about, in request order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Color,
    Spacing,
    Typography,
}

impl AdjustmentKind {
    pub const ORDER: [AdjustmentKind; 3] = [
        AdjustmentKind::Color,
        AdjustmentKind::Spacing,
        AdjustmentKind::Typography,
    ];
}

/// One structured query: where the element sits and what it looks like.
#[derive(Clone, Debug, Serialize)]
pub struct DiscoveryQuery {
    pub element_path: String,
    /// Snapshot of the element's visual computed properties.
    pub computed_style: Vec<(String, String)>,
    pub kind: AdjustmentKind,
}

/// One token suggested by the service.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DiscoveredToken {
    pub variable: String,
    #[serde(rename = "currentValue")]
    pub current_value: String,
    pub property: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub confidence: f32,
}

impl From<DiscoveredToken> for VariableReference {
    fn from(token: DiscoveredToken) -> Self {
        VariableReference {
            raw_value: format!("var({})", token.variable),
            variable: token.variable,
            property: token.property,
            current_value: token.current_value,
        }
    }
}

/// Transport seam for the external text-generation service.
#[async_trait]
pub trait DiscoveryProvider: Send + Sync {
    /// Returns the service's raw text answer for one query.
    async fn discover(&self, query: &DiscoveryQuery) -> Result<String, DiscoveryError>;
}

/// Pulls the JSON array out of a model answer that may wrap it in code
/// fences or prose. Anything that does not parse yields an empty list.
pub fn parse_discovery_response(text: &str) -> Vec<DiscoveredToken> {
    let Some(start) = text.find('[') else {
        return Vec::new();
    };
    let Some(end) = text.rfind(']') else {
        return Vec::new();
    };
    if end < start {
        return Vec::new();
    }
    match serde_json::from_str(&text[start..=end]) {
        Ok(tokens) => tokens,
        Err(err) => {
            warn!("discovery response did not parse as a token array: {err}");
            Vec::new()
        }
    }
}

/// Runs the category ladder: color, then spacing, then typography, stopping
/// at the first non-empty answer. Failures are logged and treated as empty.
pub async fn discover_tokens(
    provider: &dyn DiscoveryProvider,
    element_path: &str,
    computed_style: &[(String, String)],
) -> Vec<DiscoveredToken> {
    for kind in AdjustmentKind::ORDER {
        let query = DiscoveryQuery {
            element_path: element_path.to_string(),
            computed_style: computed_style.to_vec(),
            kind,
        };
        match provider.discover(&query).await {
            Ok(text) => {
                let tokens = parse_discovery_response(&text);
                if !tokens.is_empty() {
                    return tokens;
                }
            }
            Err(err) => warn!("token discovery ({kind:?}) failed: {err}"),
        }
    }
    Vec::new()
}
