//! The resolution pipeline, end to end.
//!
//! An [`Inspector`] owns one session's state: the lazily built variable map,
//! the request generation counter, and an optional remote discovery
//! provider. `inspect` runs the strategies in order — direct detection, map
//! lookup, then (only when both are empty and a provider is configured) the
//! remote fallback — and discards any async result that arrives after a
//! newer request has started.

use std::sync::Arc;

use log::debug;

use crate::category::Bucket;
use crate::discovery::{DiscoveryProvider, discover_tokens};
use crate::dom::{Document, ElementId};
use crate::generation::RequestGeneration;
use crate::resolve::{VariableReference, merge_references, resolve_direct, resolve_from_map};
use crate::scan::root_custom_properties;
use crate::varmap::VariableMap;

pub struct Inspector {
    map: VariableMap,
    generation: RequestGeneration,
    provider: Option<Arc<dyn DiscoveryProvider>>,
}

impl Inspector {
    pub fn new() -> Self {
        Self {
            map: VariableMap::new(),
            generation: RequestGeneration::new(),
            provider: None,
        }
    }

    pub fn with_provider(provider: Arc<dyn DiscoveryProvider>) -> Self {
        Self {
            provider: Some(provider),
            ..Self::new()
        }
    }

    /// Handle on the session's generation counter. Anything holding a clone
    /// can invalidate in-flight requests, which is also how [`cancel`] works.
    ///
    /// [`cancel`]: Inspector::cancel
    pub fn generation(&self) -> RequestGeneration {
        self.generation.clone()
    }

    /// Rebuilds the variable map from the root's current custom properties.
    /// Never called automatically after the first build; hosts that mutate
    /// `:root` at runtime call this themselves.
    pub fn rebuild_map(&mut self, doc: &Document) {
        self.map.build(root_custom_properties(doc));
    }

    /// Invalidates whatever request is currently in flight.
    pub fn cancel(&self) {
        self.generation.advance();
    }

    /// The synchronous strategies only: direct detection merged over map
    /// lookup. Builds the map on first use.
    pub fn resolve_sync(&mut self, doc: &Document, el: ElementId) -> Vec<VariableReference> {
        if !self.map.is_built() {
            self.rebuild_map(doc);
        }
        let direct = resolve_direct(doc, el);
        let cached = resolve_from_map(doc, el, &self.map);
        merge_references(direct, cached)
    }

    /// Full resolution. Returns `None` only when the result went stale: a
    /// newer request started while the remote fallback was in flight. An
    /// element with genuinely no tokens yields `Some(vec![])`.
    pub async fn inspect(&mut self, doc: &Document, el: ElementId) -> Option<Vec<VariableReference>> {
        let generation = self.generation.advance();

        let refs = self.resolve_sync(doc, el);
        if !refs.is_empty() {
            return Some(refs);
        }

        let Some(provider) = self.provider.clone() else {
            return Some(Vec::new());
        };

        let path = doc.path_of(el);
        let snapshot = style_snapshot(doc, el);
        let discovered = discover_tokens(provider.as_ref(), &path, &snapshot).await;

        if !self.generation.is_current(generation) {
            debug!("discarding stale discovery result for {path}");
            return None;
        }
        Some(discovered.into_iter().map(Into::into).collect())
    }
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

/// The element's visual computed properties, one entry per bucket the map
/// indexes, skipping properties the snapshot does not carry.
fn style_snapshot(doc: &Document, el: ElementId) -> Vec<(String, String)> {
    let computed = doc.computed(el);
    Bucket::ALL
        .iter()
        .filter_map(|bucket| {
            let property = bucket.property();
            computed
                .get(property)
                .map(|value| (property.to_string(), value.to_string()))
        })
        .collect()
}
