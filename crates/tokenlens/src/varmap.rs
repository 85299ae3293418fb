//! Reverse index from computed values to the tokens that produce them.
//!
//! Built once per session from the root element's resolved custom
//! properties, the map answers "this element's padding is `16px` — which
//! token is that?" by exact string equality per bucket. It is an explicit
//! object, not module state: a host serving several sessions holds one map
//! each. There is no automatic invalidation; if `:root` changes at runtime
//! the map is stale until [`VariableMap::build`] runs again, and a read
//! during a rebuild may see a partial map (the cost is a missed match, not a
//! crash).

use std::collections::HashMap;

use crate::category::{Bucket, Category};
use crate::scan::RootCustomProperty;

/// Category-specific metadata derived for a token at build time.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenMeta {
    /// Lightness/chroma/hue parsed from an `oklch(...)` value.
    Oklch { l: f32, c: f32, h: f32 },
    /// Trailing scale segment of the token name (`--font-size-lg` -> `lg`).
    Scale(String),
    /// Spacing step: numeric name suffix when present, else pixels / 4.
    Step(u32),
    Plain,
}

/// One reverse-lookup hit: the token and what we derived about it.
#[derive(Clone, Debug, PartialEq)]
pub struct MapEntry {
    pub variable: String,
    pub meta: TokenMeta,
}

/// The per-session reverse index.
#[derive(Debug, Default)]
pub struct VariableMap {
    buckets: HashMap<Bucket, HashMap<String, MapEntry>>,
    built: bool,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Classifies every root custom property and indexes it by computed
    /// value. A full rebuild: previous contents are dropped. When two tokens
    /// share a computed value within a bucket, the first keeps the slot.
    pub fn build<I>(&mut self, props: I)
    where
        I: IntoIterator<Item = RootCustomProperty>,
    {
        self.buckets.clear();
        for prop in props {
            let category = classify_token(&prop.name, &prop.value);
            for bucket in buckets_for(category) {
                let meta = derive_meta(category, &prop.name, &prop.value);
                self.buckets
                    .entry(*bucket)
                    .or_default()
                    .entry(prop.value.clone())
                    .or_insert_with(|| MapEntry {
                        variable: prop.name.clone(),
                        meta,
                    });
            }
        }
        self.built = true;
    }

    /// Exact-string lookup of a computed value within one bucket.
    pub fn lookup(&self, bucket: Bucket, computed_value: &str) -> Option<&MapEntry> {
        self.buckets.get(&bucket)?.get(computed_value)
    }

    pub fn invalidate(&mut self) {
        self.buckets.clear();
        self.built = false;
    }
}

/// Buckets a token of the given category is indexed under. A color token can
/// explain any of the three color-valued properties; a spacing token any of
/// the three length-valued box properties.
fn buckets_for(category: Category) -> &'static [Bucket] {
    match category {
        Category::Color => &[Bucket::Color, Bucket::BackgroundColor, Bucket::BorderColor],
        Category::Spacing => &[Bucket::Padding, Bucket::Margin, Bucket::Gap],
        Category::Typography => &[Bucket::FontSize],
        Category::Radius => &[Bucket::BorderRadius],
        Category::Shadow => &[Bucket::BoxShadow],
        Category::Uncategorized => &[],
    }
}

/// Shape of the value first, name hints only to break ties between the
/// single-length categories.
pub(crate) fn classify_token(name: &str, value: &str) -> Category {
    if is_color_value(value) || name.contains("color") {
        return Category::Color;
    }
    if is_shadow_value(value) || name.contains("shadow") {
        return Category::Shadow;
    }
    if is_length_value(value) {
        if name.contains("radius") {
            return Category::Radius;
        }
        if name.contains("font") || name.contains("text") || name.contains("leading") {
            return Category::Typography;
        }
        return Category::Spacing;
    }
    Category::Uncategorized
}

fn derive_meta(category: Category, name: &str, value: &str) -> TokenMeta {
    match category {
        Category::Color => match parse_oklch(value) {
            Some((l, c, h)) => TokenMeta::Oklch { l, c, h },
            None => TokenMeta::Plain,
        },
        Category::Typography | Category::Radius => TokenMeta::Scale(scale_name(name)),
        Category::Spacing => TokenMeta::Step(spacing_step(name, value)),
        Category::Shadow | Category::Uncategorized => TokenMeta::Plain,
    }
}

fn is_color_value(value: &str) -> bool {
    let v = value.trim();
    v.starts_with('#')
        || v.starts_with("rgb(")
        || v.starts_with("rgba(")
        || v.starts_with("hsl(")
        || v.starts_with("hsla(")
        || v.starts_with("oklch(")
        || v.starts_with("oklab(")
        || v.starts_with("color(")
}

/// A shadow computed value has at least two length components (offset-x,
/// offset-y) next to each other.
fn is_shadow_value(value: &str) -> bool {
    let lengths = value
        .split_whitespace()
        .filter(|part| is_length_value(part))
        .count();
    lengths >= 2
}

fn is_length_value(value: &str) -> bool {
    let v = value.trim();
    for suffix in ["px", "rem", "em", "%", "vh", "vw", "ch"] {
        if let Some(num) = v.strip_suffix(suffix) {
            return !num.is_empty() && num.parse::<f32>().is_ok();
        }
    }
    v == "0"
}

/// `oklch(0.6 0.2 250)` -> (0.6, 0.2, 250). Percent lightness and `deg` hue
/// suffixes are tolerated; alpha (`/ 0.5`) is ignored.
fn parse_oklch(value: &str) -> Option<(f32, f32, f32)> {
    let inner = value.trim().strip_prefix("oklch(")?.strip_suffix(')')?;
    let inner = inner.split('/').next()?;
    let mut parts = inner.split_whitespace();

    let l_raw = parts.next()?;
    let l = match l_raw.strip_suffix('%') {
        Some(pct) => pct.parse::<f32>().ok()? / 100.0,
        None => l_raw.parse().ok()?,
    };
    let c = parts.next()?.parse().ok()?;
    let h_raw = parts.next()?;
    let h = h_raw.strip_suffix("deg").unwrap_or(h_raw).parse().ok()?;
    Some((l, c, h))
}

/// Trailing segment of the token name: `--radius-lg` -> `lg`.
fn scale_name(name: &str) -> String {
    name.trim_start_matches('-')
        .rsplit('-')
        .next()
        .unwrap_or_default()
        .to_string()
}

fn spacing_step(name: &str, value: &str) -> u32 {
    if let Ok(step) = scale_name(name).parse::<u32>() {
        return step;
    }
    pixels(value).map(|px| (px / 4.0).round() as u32).unwrap_or(0)
}

fn pixels(value: &str) -> Option<f32> {
    value.trim().strip_suffix("px")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, value: &str) -> RootCustomProperty {
        RootCustomProperty {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn color_tokens_index_all_color_buckets() {
        let mut map = VariableMap::new();
        map.build([prop("--color-primary", "oklch(0.6 0.2 250)")]);

        for bucket in [Bucket::Color, Bucket::BackgroundColor, Bucket::BorderColor] {
            let entry = map.lookup(bucket, "oklch(0.6 0.2 250)").unwrap();
            assert_eq!(entry.variable, "--color-primary");
            assert_eq!(entry.meta, TokenMeta::Oklch { l: 0.6, c: 0.2, h: 250.0 });
        }
        assert!(map.lookup(Bucket::Padding, "oklch(0.6 0.2 250)").is_none());
    }

    #[test]
    fn spacing_token_resolves_in_independent_buckets() {
        let mut map = VariableMap::new();
        map.build([prop("--space-4", "16px")]);

        assert!(map.lookup(Bucket::Padding, "16px").is_some());
        assert!(map.lookup(Bucket::Margin, "16px").is_some());
        assert!(map.lookup(Bucket::Gap, "16px").is_some());
        assert_eq!(
            map.lookup(Bucket::Padding, "16px").unwrap().meta,
            TokenMeta::Step(4)
        );
    }

    #[test]
    fn name_hints_separate_single_length_categories() {
        assert_eq!(classify_token("--radius-md", "8px"), Category::Radius);
        assert_eq!(classify_token("--font-size-lg", "18px"), Category::Typography);
        assert_eq!(classify_token("--space-2", "8px"), Category::Spacing);
    }

    #[test]
    fn font_size_meta_is_the_scale_name() {
        let mut map = VariableMap::new();
        map.build([prop("--font-size-lg", "18px")]);
        assert_eq!(
            map.lookup(Bucket::FontSize, "18px").unwrap().meta,
            TokenMeta::Scale("lg".to_string())
        );
    }

    #[test]
    fn shadow_values_are_recognized() {
        assert_eq!(
            classify_token("--elevation-1", "0 1px 2px rgb(0 0 0 / 0.1)"),
            Category::Shadow
        );
    }

    #[test]
    fn first_token_wins_a_contested_value() {
        let mut map = VariableMap::new();
        map.build([prop("--space-4", "16px"), prop("--size-gutter", "16px")]);
        assert_eq!(
            map.lookup(Bucket::Padding, "16px").unwrap().variable,
            "--space-4"
        );
    }

    #[test]
    fn rebuild_replaces_and_invalidate_clears() {
        let mut map = VariableMap::new();
        map.build([prop("--space-4", "16px")]);
        assert!(map.is_built());

        map.build([prop("--space-5", "20px")]);
        assert!(map.lookup(Bucket::Padding, "16px").is_none());
        assert!(map.lookup(Bucket::Padding, "20px").is_some());

        map.invalidate();
        assert!(!map.is_built());
        assert!(map.lookup(Bucket::Padding, "20px").is_none());
    }

    #[test]
    fn oklch_parsing_tolerates_percent_and_deg() {
        assert_eq!(parse_oklch("oklch(60% 0.2 250deg)"), Some((0.6, 0.2, 250.0)));
        assert_eq!(parse_oklch("oklch(0.6 0.2 250 / 0.5)"), Some((0.6, 0.2, 250.0)));
        assert_eq!(parse_oklch("rgb(0, 0, 0)"), None);
    }
}
