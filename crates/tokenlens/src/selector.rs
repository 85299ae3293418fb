//! Selector parsing and element matching.
//!
//! Supports the selector subset the resolver needs: type, class, id,
//! universal and attribute selectors, pseudo-classes, and descendant/child
//! combinators. Sibling combinators parse but never match. Anything the
//! parser cannot handle makes the whole selector non-matching; matching an
//! element never fails, it just answers `false`.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, multispace0},
    combinator::map,
    multi::many0,
    sequence::{delimited, preceded, tuple},
};

use crate::dom::{Document, ElementId, ElementMeta, ElementStates};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    Type(String),
    Class(String),
    Id(String),
    Universal,
    PseudoClass(String),
    /// `::before` and friends; never matches an element.
    PseudoElement(String),
    /// `[attr]` (value `None`) or `[attr=value]`.
    Attribute(String, Option<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompoundSelector {
    pub selectors: Vec<Selector>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    /// Relation of a part to the part on its right; the rightmost part
    /// carries `None`.
    None,
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorPart {
    pub compound: CompoundSelector,
    pub combinator: Combinator,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexSelector {
    pub parts: Vec<SelectorPart>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

fn parse_ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

fn parse_simple_selector(input: &str) -> IResult<&str, Selector> {
    alt((
        map(preceded(char('#'), parse_ident), |s| Selector::Id(s.to_string())),
        map(preceded(char('.'), parse_ident), |s| {
            Selector::Class(s.to_string())
        }),
        map(preceded(tag("::"), parse_ident), |s| {
            Selector::PseudoElement(s.to_string())
        }),
        parse_pseudo_class,
        map(char('*'), |_| Selector::Universal),
        parse_attribute_selector,
        map(parse_ident, |s| Selector::Type(s.to_ascii_lowercase())),
    ))(input)
}

/// `:name`, optionally with a functional argument (`:nth-child(2)`), which is
/// consumed but makes the pseudo-class unsupported.
fn parse_pseudo_class(input: &str) -> IResult<&str, Selector> {
    let (input, name) = preceded(char(':'), parse_ident)(input)?;
    if input.starts_with('(') {
        let (input, _) = delimited(char('('), take_until(")"), char(')'))(input)?;
        // Functional pseudo-classes are out of scope; keep the parse alive so
        // the selector is treated as non-matching rather than an error.
        return Ok((input, Selector::PseudoClass(format!("{name}()"))));
    }
    Ok((input, Selector::PseudoClass(name.to_string())))
}

fn parse_attribute_selector(input: &str) -> IResult<&str, Selector> {
    let (input, content) = delimited(char('['), take_until("]"), char(']'))(input)?;
    match content.find('=') {
        Some(idx) => Ok((
            input,
            Selector::Attribute(
                content[..idx].trim().to_string(),
                Some(content[idx + 1..].trim().trim_matches(['"', '\'']).to_string()),
            ),
        )),
        None => Ok((input, Selector::Attribute(content.trim().to_string(), None))),
    }
}

fn parse_compound_selector(input: &str) -> IResult<&str, CompoundSelector> {
    let (input, first) = parse_simple_selector(input)?;
    let (input, rest) = many0(parse_simple_selector)(input)?;
    let mut selectors = vec![first];
    selectors.extend(rest);
    Ok((input, CompoundSelector { selectors }))
}

fn parse_complex_selector(input: &str) -> IResult<&str, ComplexSelector> {
    let (mut input, mut current) = parse_compound_selector(input)?;
    let mut parts = Vec::new();

    loop {
        let (rem, ws) = multispace0(input)?;

        let combinator: IResult<&str, Combinator> = alt((
            map(char('>'), |_| Combinator::Child),
            map(char('+'), |_| Combinator::AdjacentSibling),
            map(char('~'), |_| Combinator::GeneralSibling),
        ))(rem);

        if let Ok((after_op, found)) = combinator {
            let (after_ws, _) = multispace0(after_op)?;
            match parse_compound_selector(after_ws) {
                Ok((next_input, next)) => {
                    parts.push(SelectorPart {
                        compound: current,
                        combinator: found,
                    });
                    current = next;
                    input = next_input;
                    continue;
                }
                Err(_) => break,
            }
        }

        if !ws.is_empty() {
            match parse_compound_selector(rem) {
                Ok((next_input, next)) => {
                    parts.push(SelectorPart {
                        compound: current,
                        combinator: Combinator::Descendant,
                    });
                    current = next;
                    input = next_input;
                    continue;
                }
                Err(_) => break,
            }
        }

        break;
    }

    parts.push(SelectorPart {
        compound: current,
        combinator: Combinator::None,
    });
    Ok((input, ComplexSelector { parts }))
}

fn parse_selector_list_inner(input: &str) -> IResult<&str, SelectorList> {
    let (input, _) = multispace0(input)?;
    let (input, first) = parse_complex_selector(input)?;
    let (input, rest) = many0(preceded(
        tuple((multispace0, char(','), multispace0)),
        parse_complex_selector,
    ))(input)?;

    let mut selectors = vec![first];
    selectors.extend(rest);
    Ok((input, SelectorList { selectors }))
}

/// Parses a comma-separated selector list; `None` when the text is not a
/// selector this subset understands (leftover input counts as a failure).
pub fn parse_selector_list(text: &str) -> Option<SelectorList> {
    match parse_selector_list_inner(text) {
        Ok((rest, list)) if rest.trim().is_empty() => Some(list),
        _ => None,
    }
}

fn matches_simple(meta: &ElementMeta, is_root: bool, selector: &Selector) -> bool {
    match selector {
        Selector::Type(name) => meta.tag == *name,
        Selector::Class(class) => meta.classes.contains(class),
        Selector::Id(id) => meta.id.as_deref() == Some(id.as_str()),
        Selector::Universal => true,
        Selector::PseudoClass(name) => match name.as_str() {
            "root" => is_root,
            "hover" => meta.states.contains(ElementStates::HOVER),
            "focus" => meta.states.contains(ElementStates::FOCUS),
            "active" => meta.states.contains(ElementStates::ACTIVE),
            "disabled" => meta.states.contains(ElementStates::DISABLED),
            _ => false,
        },
        Selector::PseudoElement(_) => false,
        Selector::Attribute(name, value) => match value {
            None => meta.attrs.contains_key(name),
            Some(v) => meta.attrs.get(name).map(String::as_str) == Some(v.as_str()),
        },
    }
}

fn matches_compound(doc: &Document, el: ElementId, compound: &CompoundSelector) -> bool {
    let meta = doc.meta(el);
    let is_root = doc.is_root(el);
    compound
        .selectors
        .iter()
        .all(|s| matches_simple(meta, is_root, s))
}

/// The rightmost part must match `el`; the rest walk the ancestor chain.
fn matches_parts(doc: &Document, el: ElementId, parts: &[SelectorPart]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return false;
    };
    if !matches_compound(doc, el, &last.compound) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }

    match rest[rest.len() - 1].combinator {
        Combinator::Child => doc
            .parent(el)
            .is_some_and(|p| matches_parts(doc, p, rest)),
        Combinator::Descendant => {
            let mut cur = doc.parent(el);
            while let Some(p) = cur {
                if matches_parts(doc, p, rest) {
                    return true;
                }
                cur = doc.parent(p);
            }
            false
        }
        // Sibling relations are not modelled; treated as non-matching.
        _ => false,
    }
}

/// True when any selector in `selector_text` matches the element. Invalid or
/// unsupported selector syntax simply does not match.
pub fn element_matches(doc: &Document, el: ElementId, selector_text: &str) -> bool {
    let Some(list) = parse_selector_list(selector_text) else {
        return false;
    };
    list.selectors
        .iter()
        .any(|complex| matches_parts(doc, el, &complex.parts))
}
