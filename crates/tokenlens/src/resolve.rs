//! Element-to-variable resolution.
//!
//! Two synchronous strategies run over already-retrieved document state:
//!
//! 1. **Direct detection** walks every scanned rule whose selector matches
//!    the element and emits one reference per `var()` the rule's
//!    declarations pull in. Provable, selector-backed results.
//! 2. **Map lookup** compares the element's computed visual properties
//!    against the variable map by exact string equality, bucket by bucket.
//!    Heuristic value-equality results.
//!
//! When both produce hits they are merged by variable name with direct
//! detection winning; map entries only fill in names direct detection did
//! not find.

use std::collections::BTreeMap;

use crate::category::{Bucket, Category, category_of_property};
use crate::dom::{Document, ElementId};
use crate::scan::style_rules;
use crate::selector::element_matches;
use crate::varmap::VariableMap;

/// One custom property found to govern an element's styling.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableReference {
    /// Token name, including `--`.
    pub variable: String,
    /// The CSS property the token was found on.
    pub property: String,
    /// The token's resolved value *on the element* — may differ from the
    /// root's value when an ancestor overrides the custom property.
    pub current_value: String,
    /// The declared value text the reference was extracted from.
    pub raw_value: String,
}

/// Selector-backed resolution: rules that match the element, declarations
/// that reference variables. No ordering guarantee across stylesheets, no
/// deduplication — that is the merge step's job.
pub fn resolve_direct(doc: &Document, el: ElementId) -> Vec<VariableReference> {
    let computed = doc.computed(el);
    let mut refs = Vec::new();

    for (rule, _sheet) in style_rules(doc) {
        if !element_matches(doc, el, &rule.selector_text) {
            continue;
        }
        for (property, value) in &rule.declarations {
            for variable in csstext::var_references(value) {
                let current_value = computed.get(&variable).unwrap_or_default().to_string();
                refs.push(VariableReference {
                    variable,
                    property: property.clone(),
                    current_value,
                    raw_value: value.clone(),
                });
            }
        }
    }

    refs
}

/// Value-equality resolution against the variable map. Buckets are checked
/// independently, so an ambiguous computed value can produce one hit per
/// bucket.
pub fn resolve_from_map(doc: &Document, el: ElementId, map: &VariableMap) -> Vec<VariableReference> {
    let computed = doc.computed(el);
    let mut refs = Vec::new();

    for bucket in Bucket::ALL {
        let property = bucket.property();
        let Some(value) = computed.get(property) else {
            continue;
        };
        if let Some(entry) = map.lookup(bucket, value) {
            refs.push(VariableReference {
                variable: entry.variable.clone(),
                property: property.to_string(),
                current_value: value.to_string(),
                raw_value: format!("var({})", entry.variable),
            });
        }
    }

    refs
}

/// Merges the two strategies, deduplicating by variable name in first-seen
/// order. Direct results come first, so for any name present in both the
/// selector-backed reference wins.
pub fn merge_references(
    direct: Vec<VariableReference>,
    cached: Vec<VariableReference>,
) -> Vec<VariableReference> {
    let mut merged: Vec<VariableReference> = Vec::with_capacity(direct.len() + cached.len());
    for r in direct.into_iter().chain(cached) {
        if !merged.iter().any(|m| m.variable == r.variable) {
            merged.push(r);
        }
    }
    merged
}

/// Groups references by the category of the property they were found on,
/// for display. Properties outside every category list are dropped from the
/// grouping (the flat list still carries them).
pub fn group_by_category(refs: &[VariableReference]) -> BTreeMap<Category, Vec<&VariableReference>> {
    let mut groups: BTreeMap<Category, Vec<&VariableReference>> = BTreeMap::new();
    for r in refs {
        let category = category_of_property(&r.property);
        if category == Category::Uncategorized {
            continue;
        }
        groups.entry(category).or_default().push(r);
    }
    groups
}
