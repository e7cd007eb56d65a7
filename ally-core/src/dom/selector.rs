//! Simple selector language.
//!
//! Supports what the checker's ignore/root selectors actually use: compound
//! simple selectors (`tag`, `#id`, `.class`, `[attr]`, `[attr=value]`,
//! `:not(<compound>)`) joined by commas. Descendant combinators are rejected
//! at parse time.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::errors::CheckerError;

use super::node::{DocumentTree, NodeId};

/// One parsed simple-selector component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum Part {
    Tag(String),
    Id(String),
    Class(String),
    /// `[attr]` — presence; `[attr=value]` — exact value.
    Attr(String, Option<String>),
    Not(Box<Compound>),
}

/// A compound selector: every part must match the same element. Compounds
/// rarely exceed a couple of parts, so they are stored inline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
struct Compound {
    parts: SmallVec<[Part; 4]>,
}

impl Compound {
    fn matches(&self, doc: &DocumentTree, node: NodeId) -> bool {
        self.parts.iter().all(|part| match part {
            Part::Tag(tag) => doc.element_name(node) == tag,
            Part::Id(id) => doc.attr(node, "id") == Some(id.as_str()),
            Part::Class(class) => doc
                .attr(node, "class")
                .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class)),
            Part::Attr(name, None) => doc.attr(node, name).is_some(),
            Part::Attr(name, Some(value)) => doc.attr(node, name) == Some(value.as_str()),
            Part::Not(inner) => !inner.matches(doc, node),
        })
    }
}

/// A comma-separated list of compound selectors. Matches if any alternative
/// matches.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectorList {
    alternatives: Vec<Compound>,
}

impl SelectorList {
    /// An empty list matches nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Parse a selector list. Whitespace inside a compound (a descendant
    /// combinator) is a parse error.
    pub fn parse(input: &str) -> Result<Self, CheckerError> {
        let mut alternatives = Vec::new();
        for raw in input.split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            alternatives.push(parse_compound(raw).map_err(|message| {
                CheckerError::SelectorParse {
                    selector: input.to_string(),
                    message,
                }
            })?);
        }
        Ok(Self { alternatives })
    }

    /// Parse, logging and falling back to an empty list on error. Used for
    /// configured ignore-selectors, where a bad selector should degrade
    /// rather than disable the checker.
    pub fn parse_lossy(input: &str) -> Self {
        match Self::parse(input) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(selector = input, error = %e, "ignoring unparseable selector");
                Self::none()
            }
        }
    }

    /// Whether the node matches any alternative.
    pub fn matches(&self, doc: &DocumentTree, node: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, node))
    }
}

fn parse_compound(raw: &str) -> Result<Compound, String> {
    if raw.chars().any(|c| c.is_whitespace()) {
        return Err("descendant combinators are not supported".to_string());
    }

    let mut parts = SmallVec::new();
    let mut chars = raw.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            '#' | '.' => {
                let name = take_identifier(raw, &mut chars);
                if name.is_empty() {
                    return Err(format!("empty name after '{c}'"));
                }
                parts.push(if c == '#' { Part::Id(name) } else { Part::Class(name) });
            }
            '[' => {
                let close = raw[start..]
                    .find(']')
                    .ok_or_else(|| "unterminated attribute selector".to_string())?
                    + start;
                let body = &raw[start + 1..close];
                let part = match body.split_once('=') {
                    Some((name, value)) => Part::Attr(
                        name.to_string(),
                        Some(value.trim_matches('"').trim_matches('\'').to_string()),
                    ),
                    None => Part::Attr(body.to_string(), None),
                };
                if matches!(&part, Part::Attr(name, _) if name.is_empty()) {
                    return Err("empty attribute name".to_string());
                }
                parts.push(part);
                // Consume up to and including ']'.
                while let Some((i, _)) = chars.peek().copied() {
                    chars.next();
                    if i == close {
                        break;
                    }
                }
            }
            ':' => {
                let rest = &raw[start..];
                let inner = rest
                    .strip_prefix(":not(")
                    .and_then(|r| r.strip_suffix(')'))
                    .ok_or_else(|| format!("unsupported pseudo-class in {rest:?}"))?;
                parts.push(Part::Not(Box::new(parse_compound(inner)?)));
                // :not(...) must close the compound.
                return Ok(Compound { parts });
            }
            _ if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '*' => {
                let mut tag = String::from(c);
                tag.push_str(&take_identifier(raw, &mut chars));
                if tag != "*" {
                    parts.push(Part::Tag(tag.to_ascii_lowercase()));
                }
            }
            _ => return Err(format!("unexpected character {c:?}")),
        }
    }

    if parts.is_empty() && raw != "*" {
        return Err("empty selector".to_string());
    }
    Ok(Compound { parts })
}

fn take_identifier(
    raw: &str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> String {
    let mut out = String::new();
    while let Some((i, c)) = chars.peek().copied() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            out.push_str(&raw[i..i + c.len_utf8()]);
            chars.next();
        } else {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_one(tag: &str, attrs: &[(&str, &str)]) -> (DocumentTree, NodeId) {
        let mut doc = DocumentTree::new("/test");
        let node = doc.append_element(doc.root(), tag);
        for (name, value) in attrs {
            doc.set_attr(node, name, value);
        }
        (doc, node)
    }

    #[test]
    fn test_tag_and_class() {
        let (doc, node) = doc_with_one("img", &[("class", "decorative hero")]);
        assert!(SelectorList::parse("img.decorative").unwrap().matches(&doc, node));
        assert!(!SelectorList::parse("img.banner").unwrap().matches(&doc, node));
    }

    #[test]
    fn test_attr_presence_and_value() {
        let (doc, node) = doc_with_one("img", &[("alt", "x"), ("role", "presentation")]);
        assert!(SelectorList::parse("[alt]").unwrap().matches(&doc, node));
        assert!(SelectorList::parse("[role=presentation]").unwrap().matches(&doc, node));
        assert!(!SelectorList::parse("[role=img]").unwrap().matches(&doc, node));
    }

    #[test]
    fn test_not_and_comma_list() {
        let (doc, node) = doc_with_one("a", &[("href", "/x")]);
        let list = SelectorList::parse("img, a:not(.skip)").unwrap();
        assert!(list.matches(&doc, node));
    }

    #[test]
    fn test_descendant_combinator_rejected() {
        assert!(SelectorList::parse("main img").is_err());
    }

    #[test]
    fn test_lossy_parse_degrades_to_none() {
        let list = SelectorList::parse_lossy("main img");
        assert!(list.is_empty());
    }
}
