//! Image alt-text checks — the most intricate module.

use aho_corasick::AhoCorasick;
use ally_core::constants::{ALT_MAX_LEN, IMAGE_OF_PREFIX_WINDOW};
use ally_core::types::keys::image_key;
use ally_core::{CheckKind, CheckModule, DocumentTree, NodeId};
use regex::Regex;

use super::{Check, CheckContext, RuleSet};
use crate::collector::Category;
use crate::store::issue::Issue;

/// Alt phrases that carry no information, matched exactly after
/// lowercasing and whitespace collapsing.
const MEANINGLESS_ALT: &[&str] = &[
    "image",
    "img",
    "graphic",
    "photo",
    "photograph",
    "picture",
    "placeholder",
    "spacer",
    "decorative",
    "untitled",
    "screenshot",
    "logo",
    "icon",
    "*",
];

/// Openers that restate the medium; flagged when they appear within the
/// first few characters of the alt text.
const IMAGE_OF_OPENERS: &[&str] = &[
    "image of",
    "photo of",
    "picture of",
    "graphic of",
    "photograph of",
];

/// Everything the image rules need, computed once per element.
pub(crate) struct ImageFacts {
    /// Whether any alt source exists (aria-label, aria-labelledby, alt, title).
    pub has_alt_source: bool,
    pub alt: String,
    pub linked: bool,
}

pub struct ImagesCheck {
    rules: RuleSet<ImageFacts>,
}

impl ImagesCheck {
    pub fn new() -> Self {
        let url_like = Regex::new(
            r"(?i)(https?://|www\.)|\.(jpe?g|gif|png|svg|webp|avif|heic|bmp|tiff?)\b",
        )
        .unwrap();
        let openers = AhoCorasick::new(IMAGE_OF_OPENERS).unwrap();

        // Rule order is the documented tie-break priority.
        let rules = RuleSet::new()
            .rule(CheckKind::AltMissing, |f: &ImageFacts| !f.has_alt_source)
            .rule(CheckKind::AltNull, |f| {
                f.alt.trim().is_empty() && !f.linked
            })
            .rule(CheckKind::AltUrl, move |f| url_like.is_match(&f.alt))
            .rule(CheckKind::AltMeaningless, |f| {
                MEANINGLESS_ALT.contains(&normalize(&f.alt).as_str())
            })
            .rule(CheckKind::AltImageOf, move |f| {
                openers
                    .find(normalize(&f.alt).as_str())
                    .is_some_and(|m| m.start() < IMAGE_OF_PREFIX_WINDOW)
            })
            .rule(CheckKind::AltDeadspace, |f| {
                !f.alt.is_empty() && !f.alt.chars().any(char::is_alphanumeric)
            })
            .rule(CheckKind::AltLong, |f| {
                f.alt.chars().count() > ALT_MAX_LEN
            });
        Self { rules }
    }

    fn classify(&self, doc: &DocumentTree, img: NodeId) -> Option<Issue> {
        let accessible = doc.accessible_text(img);
        let link = enclosing_link(doc, img);
        let facts = ImageFacts {
            has_alt_source: accessible.is_some(),
            alt: accessible.unwrap_or_default(),
            linked: link.is_some(),
        };

        let base = self.rules.classify(&facts);
        let src = doc.attr(img, "src").unwrap_or_default();
        let key = image_key(src, &facts.alt);

        let Some(link) = link else {
            let kind = base?;
            return Some(Issue::new(img, kind, &facts.alt, Some(key)));
        };

        // Linked image. An empty alt inside a link emits nothing here; the
        // link module flags the link itself when it ends up with no text.
        match base {
            Some(kind) => {
                let kind = kind.linked_variant().unwrap_or(kind);
                Some(Issue::new(img, kind, &facts.alt, Some(key)))
            }
            None if facts.alt.trim().is_empty() => None,
            None => {
                let remainder = link_text_without_alt(doc, link, &facts.alt);
                if remainder.is_empty() {
                    // The alt IS the link text; nothing to flag.
                    None
                } else {
                    Some(Issue::new(
                        img,
                        CheckKind::AltPartOfLinkWithText,
                        &facts.alt,
                        Some(key),
                    ))
                }
            }
        }
    }
}

impl Default for ImagesCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for ImagesCheck {
    fn module(&self) -> CheckModule {
        CheckModule::Images
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        ctx.elements
            .get(Category::Image)
            .iter()
            .filter_map(|&img| self.classify(ctx.doc, img))
            .collect()
    }
}

/// Lowercase, whitespace-collapsed, trimmed of surrounding punctuation.
fn normalize(alt: &str) -> String {
    alt.trim_matches(|c: char| !c.is_alphanumeric() && c != '*')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Nearest enclosing `<a href>` ancestor.
fn enclosing_link(doc: &DocumentTree, node: NodeId) -> Option<NodeId> {
    doc.closest(node, |d, id| {
        d.element_name(id) == "a" && d.attr(id, "href").is_some()
    })
}

/// The link's accessible text with the image's alt substring removed.
fn link_text_without_alt(doc: &DocumentTree, link: NodeId, alt: &str) -> String {
    let mut text = doc.text_content(link);
    let alt = alt.trim();
    if !alt.is_empty() {
        if let Some(at) = text.find(alt) {
            text.replace_range(at..at + alt.len(), "");
        }
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    use crate::collector::ElementRegistry;

    fn run(doc: &DocumentTree, images: Vec<NodeId>) -> Vec<Issue> {
        let mut registry = ElementRegistry::default();
        registry.insert(Category::Image, images);
        let ctx = CheckContext {
            doc,
            elements: &registry,
        };
        ImagesCheck::new().check(&ctx)
    }

    fn image(doc: &mut DocumentTree, alt: Option<&str>) -> NodeId {
        let img = doc.append_element(doc.root(), "img");
        doc.set_attr(img, "src", "/files/photo.jpg");
        if let Some(alt) = alt {
            doc.set_attr(img, "alt", alt);
        }
        img
    }

    #[test]
    fn test_missing_alt_is_error() {
        let mut doc = DocumentTree::new("/t");
        let img = image(&mut doc, None);
        let issues = run(&doc, vec![img]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, CheckKind::AltMissing);
        assert!(issues[0].is_error());
        assert!(issues[0].dismissal_key.is_none());
    }

    #[test]
    fn test_empty_alt_unlinked_is_null() {
        let mut doc = DocumentTree::new("/t");
        let img = image(&mut doc, Some(""));
        let issues = run(&doc, vec![img]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, CheckKind::AltNull);
        assert!(!issues[0].is_error());
        assert!(issues[0].dismissal_key.is_some());
    }

    #[test]
    fn test_url_priority_over_image_of() {
        let mut doc = DocumentTree::new("/t");
        let img = image(&mut doc, Some("photo of image.jpg"));
        let issues = run(&doc, vec![img]);
        assert_eq!(issues[0].kind, CheckKind::AltUrl);
    }

    #[test]
    fn test_meaningless_alt() {
        let mut doc = DocumentTree::new("/t");
        let img = image(&mut doc, Some("  Photo "));
        let issues = run(&doc, vec![img]);
        assert_eq!(issues[0].kind, CheckKind::AltMeaningless);
    }

    #[test]
    fn test_image_of_opener_within_window() {
        let mut doc = DocumentTree::new("/t");
        let a = image(&mut doc, Some("A photo of a cat"));
        let b = image(&mut doc, Some("My favorite photo of a cat"));
        let issues = run(&doc, vec![a, b]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].element, a);
        assert_eq!(issues[0].kind, CheckKind::AltImageOf);
    }

    #[test]
    fn test_deadspace_alt() {
        let mut doc = DocumentTree::new("/t");
        let img = image(&mut doc, Some(" . "));
        let issues = run(&doc, vec![img]);
        assert_eq!(issues[0].kind, CheckKind::AltDeadspace);
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_alt_length_boundary() {
        let mut doc = DocumentTree::new("/t");
        let pass = image(&mut doc, Some(&"a".repeat(160)));
        let flag = image(&mut doc, Some(&"a".repeat(161)));
        let issues = run(&doc, vec![pass, flag]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].element, flag);
        assert_eq!(issues[0].kind, CheckKind::AltLong);
    }

    #[test]
    fn test_linked_variant_relabel() {
        let mut doc = DocumentTree::new("/t");
        let link = doc.append_element(doc.root(), "a");
        doc.set_attr(link, "href", "/x");
        let img = doc.append_element(link, "img");
        doc.set_attr(img, "src", "/files/photo.jpg");
        doc.set_attr(img, "alt", "placeholder");
        let issues = run(&doc, vec![img]);
        assert_eq!(issues[0].kind, CheckKind::AltMeaninglessLinked);
    }

    #[test]
    fn test_alt_part_of_link_with_text() {
        let mut doc = DocumentTree::new("/t");
        let link = doc.append_element(doc.root(), "a");
        doc.set_attr(link, "href", "/x");
        let img = doc.append_element(link, "img");
        doc.set_attr(img, "src", "/files/photo.jpg");
        doc.set_attr(img, "alt", "Annual report cover");
        doc.append_text(link, "Read the annual report");
        let issues = run(&doc, vec![img]);
        assert_eq!(issues[0].kind, CheckKind::AltPartOfLinkWithText);
    }

    #[test]
    fn test_linked_empty_alt_emits_nothing() {
        let mut doc = DocumentTree::new("/t");
        let link = doc.append_element(doc.root(), "a");
        doc.set_attr(link, "href", "/x");
        let img = doc.append_element(link, "img");
        doc.set_attr(img, "src", "/files/photo.jpg");
        doc.set_attr(img, "alt", "");
        assert!(run(&doc, vec![img]).is_empty());
    }

    #[test]
    fn test_key_stable_across_query_strings() {
        let mut doc = DocumentTree::new("/t");
        let a = doc.append_element(doc.root(), "img");
        doc.set_attr(a, "src", "/files/cat.jpg?itok=1");
        doc.set_attr(a, "alt", &"long alt ".repeat(30));
        let b = doc.append_element(doc.root(), "img");
        doc.set_attr(b, "src", "/files/cat.jpg?itok=2");
        doc.set_attr(b, "alt", &"long alt ".repeat(30));
        let issues = run(&doc, vec![a, b]);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].dismissal_key, issues[1].dismissal_key);
        let mut by_key: FxHashMap<&str, usize> = FxHashMap::default();
        for issue in &issues {
            *by_key
                .entry(issue.dismissal_key.as_deref().unwrap())
                .or_default() += 1;
        }
        assert_eq!(by_key.len(), 1);
    }
}
