//! Link text checks.

use ally_core::types::keys::{dismissal_key, strip_query};
use ally_core::{CheckKind, CheckModule, DocumentTree, NodeId};
use regex::Regex;

use super::{Check, CheckContext, RuleSet};
use crate::collector::Category;
use crate::store::issue::Issue;

/// Phrases that tell a screen-reader user nothing about the destination.
const GENERIC_LINK_TEXT: &[&str] = &[
    "click here",
    "click",
    "learn more",
    "read more",
    "more",
    "here",
    "link",
    "download",
    "details",
];

pub(crate) struct LinkFacts {
    pub text: String,
    pub href: String,
}

pub struct LinksCheck {
    rules: RuleSet<LinkFacts>,
}

impl LinksCheck {
    pub fn new() -> Self {
        let url_like =
            Regex::new(r"(?i)^(https?://|www\.)\S+$|^\S+\.(com|org|net|edu|gov|io)(/\S*)?$")
                .unwrap();
        let document_href =
            Regex::new(r"(?i)\.(pdf|docx?|pptx?|xlsx?|odt|rtf)($|\?)").unwrap();

        let rules = RuleSet::new()
            .rule(CheckKind::LinkNoText, |f: &LinkFacts| f.text.is_empty())
            .rule(CheckKind::LinkTextIsUrl, move |f| {
                url_like.is_match(&f.text)
            })
            .rule(CheckKind::LinkNonDescriptive, |f| {
                GENERIC_LINK_TEXT.contains(&normalize(&f.text).as_str())
            })
            .rule(CheckKind::LinkDocument, move |f| {
                document_href.is_match(&f.href)
            });
        Self { rules }
    }

    fn classify(&self, doc: &DocumentTree, link: NodeId) -> Option<Issue> {
        let text = link_text(doc, link);
        let href = doc.attr(link, "href").unwrap_or_default().to_string();
        let facts = LinkFacts { text, href };
        let kind = self.rules.classify(&facts)?;
        let key = dismissal_key(&[strip_query(&facts.href), &facts.text]);
        Some(Issue::new(link, kind, &facts.text, Some(key)))
    }
}

impl Default for LinksCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for LinksCheck {
    fn module(&self) -> CheckModule {
        CheckModule::Links
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        ctx.elements
            .get(Category::Link)
            .iter()
            .filter_map(|&link| self.classify(ctx.doc, link))
            .collect()
    }
}

/// A link's accessible text: aria sources win, then visible text, then any
/// contained image's alt.
fn link_text(doc: &DocumentTree, link: NodeId) -> String {
    if let Some(label) = doc.accessible_text(link) {
        let label = label.trim();
        if !label.is_empty() {
            return label.to_string();
        }
    }
    let visible = doc.text_content(link);
    if !visible.trim().is_empty() {
        return visible.trim().to_string();
    }
    for child in doc.descendants(link) {
        if doc.element_name(child) == "img" {
            if let Some(alt) = doc.accessible_text(child) {
                if !alt.trim().is_empty() {
                    return alt.trim().to_string();
                }
            }
        }
    }
    String::new()
}

fn normalize(text: &str) -> String {
    text.trim_matches(|c: char| !c.is_alphanumeric())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
