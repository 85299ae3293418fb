//! Property categories and value-index buckets.
//!
//! Categories drive how resolved tokens are grouped for display; buckets are
//! the computed-value indexes the variable map maintains. Both are closed
//! enumerations so a property that fits nowhere is `Uncategorized` rather
//! than a silent string mismatch.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Display category of a CSS property or token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Color,
    Spacing,
    Typography,
    Radius,
    Shadow,
    Uncategorized,
}

const COLOR_PROPS: &[&str] = &[
    "color",
    "background-color",
    "border-color",
    "outline-color",
    "text-decoration-color",
    "caret-color",
    "accent-color",
    "fill",
    "stroke",
];

const SPACING_PROPS: &[&str] = &[
    "padding",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "margin",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "gap",
    "row-gap",
    "column-gap",
];

const TYPOGRAPHY_PROPS: &[&str] = &[
    "font-size",
    "font-family",
    "font-weight",
    "line-height",
    "letter-spacing",
    "word-spacing",
];

const RADIUS_PROPS: &[&str] = &[
    "border-radius",
    "border-top-left-radius",
    "border-top-right-radius",
    "border-bottom-left-radius",
    "border-bottom-right-radius",
];

const SHADOW_PROPS: &[&str] = &["box-shadow", "text-shadow"];

static PROPERTY_CATEGORIES: Lazy<HashMap<&'static str, Category>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for (props, category) in [
        (COLOR_PROPS, Category::Color),
        (SPACING_PROPS, Category::Spacing),
        (TYPOGRAPHY_PROPS, Category::Typography),
        (RADIUS_PROPS, Category::Radius),
        (SHADOW_PROPS, Category::Shadow),
    ] {
        for prop in props {
            table.insert(*prop, category);
        }
    }
    table
});

/// Total classification of a CSS property name.
pub fn category_of_property(property: &str) -> Category {
    PROPERTY_CATEGORIES
        .get(property)
        .copied()
        .unwrap_or(Category::Uncategorized)
}

/// The computed-value index buckets of the variable map. Each bucket is
/// keyed by the exact computed-value string of one visual property, so an
/// ambiguous value like `16px` can resolve independently per bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bucket {
    Color,
    BackgroundColor,
    BorderColor,
    FontSize,
    Padding,
    Margin,
    Gap,
    BorderRadius,
    BoxShadow,
}

impl Bucket {
    pub const ALL: [Bucket; 9] = [
        Bucket::Color,
        Bucket::BackgroundColor,
        Bucket::BorderColor,
        Bucket::FontSize,
        Bucket::Padding,
        Bucket::Margin,
        Bucket::Gap,
        Bucket::BorderRadius,
        Bucket::BoxShadow,
    ];

    /// The computed-style property this bucket is looked up with.
    pub fn property(self) -> &'static str {
        match self {
            Bucket::Color => "color",
            Bucket::BackgroundColor => "background-color",
            Bucket::BorderColor => "border-color",
            Bucket::FontSize => "font-size",
            Bucket::Padding => "padding",
            Bucket::Margin => "margin",
            Bucket::Gap => "gap",
            Bucket::BorderRadius => "border-radius",
            Bucket::BoxShadow => "box-shadow",
        }
    }
}
