//! Document model the inspector operates on.
//!
//! The inspector does not run inside a browser here; the host feeds it a
//! snapshot of the page instead. [`Document`] is an arena tree of elements,
//! each carrying the metadata selector matching needs ([`ElementMeta`]) and
//! the element's computed style map with inheritance already applied by the
//! producer (so a custom property read off an element may legitimately differ
//! from the root's value when an ancestor overrides it).

use std::collections::HashMap;

use bitflags::bitflags;

use crate::scan::StyleSheetSource;

bitflags! {
    /// Pseudo-class states of an element, used when matching selectors like
    /// `:hover` or `:focus`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ElementStates: u16 {
        const HOVER    = 0b0000_0001;
        const FOCUS    = 0b0000_0010;
        const ACTIVE   = 0b0000_0100;
        const DISABLED = 0b0000_1000;
    }
}

/// Metadata about an element used for selector matching.
#[derive(Clone, Debug, Default)]
pub struct ElementMeta {
    /// Lowercase tag name (e.g. "div", "button").
    pub tag: String,
    /// The element's id attribute, if set.
    pub id: Option<String>,
    /// Class list in document order.
    pub classes: Vec<String>,
    /// Other attributes, for `[attr]` / `[attr=value]` selectors.
    pub attrs: HashMap<String, String>,
    /// Current pseudo-class states.
    pub states: ElementStates,
}

impl ElementMeta {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }
}

/// The computed style of one element: resolved property -> value strings,
/// custom properties included.
#[derive(Clone, Debug, Default)]
pub struct ComputedStyle {
    props: HashMap<String, String>,
}

impl ComputedStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: &str, value: &str) {
        self.props.insert(property.to_string(), value.to_string());
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.props.get(property).map(String::as_str)
    }

    /// All `--*` entries, unordered.
    pub fn custom_properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props
            .iter()
            .filter(|(name, _)| name.starts_with("--"))
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Index of an element within its [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

struct Element {
    meta: ElementMeta,
    computed: ComputedStyle,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// Arena tree of elements plus the stylesheets attached to the page.
pub struct Document {
    elements: Vec<Element>,
    pub stylesheets: Vec<StyleSheetSource>,
}

impl Document {
    /// Creates a document whose root element is `html`.
    pub fn new() -> Self {
        Self {
            elements: vec![Element {
                meta: ElementMeta::new("html"),
                computed: ComputedStyle::new(),
                parent: None,
                children: Vec::new(),
            }],
            stylesheets: Vec::new(),
        }
    }

    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    pub fn is_root(&self, id: ElementId) -> bool {
        id.0 == 0
    }

    pub fn create_element(
        &mut self,
        meta: ElementMeta,
        computed: ComputedStyle,
        parent: ElementId,
    ) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            meta,
            computed,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.elements[parent.0].children.push(id);
        id
    }

    pub fn meta(&self, id: ElementId) -> &ElementMeta {
        &self.elements[id.0].meta
    }

    pub fn computed(&self, id: ElementId) -> &ComputedStyle {
        &self.elements[id.0].computed
    }

    pub fn computed_mut(&mut self, id: ElementId) -> &mut ComputedStyle {
        &mut self.elements[id.0].computed
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements[id.0].parent
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.elements[id.0].children
    }

    /// Ancestor metadata ordered from immediate parent to root.
    pub fn ancestors(&self, id: ElementId) -> Vec<&ElementMeta> {
        let mut out = Vec::new();
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            out.push(self.meta(p));
            cur = self.parent(p);
        }
        out
    }

    pub fn add_stylesheet(&mut self, sheet: StyleSheetSource) {
        self.stylesheets.push(sheet);
    }

    /// Human-readable path from the root to `id`, used to describe the
    /// element in remote discovery queries.
    pub fn path_of(&self, id: ElementId) -> String {
        let mut chain = vec![id];
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            chain.push(p);
            cur = self.parent(p);
        }
        chain
            .iter()
            .rev()
            .map(|el| describe(self.meta(*el)))
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn describe(meta: &ElementMeta) -> String {
    let mut out = meta.tag.clone();
    if let Some(id) = &meta.id {
        out.push('#');
        out.push_str(id);
    }
    for class in &meta.classes {
        out.push('.');
        out.push_str(class);
    }
    out
}
