//! Prose and table checks.
//!
//! Paragraph heuristics (fake headings, fake lists, shouting case) plus the
//! table checks, which ride along in this module because both read the same
//! registries.

use ally_core::types::keys::dismissal_key;
use ally_core::{CheckKind, CheckModule, DocumentTree, NodeId};
use regex::Regex;

use super::{Check, CheckContext};
use crate::collector::Category;
use crate::store::issue::{InsertionHint, Issue};

/// Paragraphs shorter than this, fully bolded, look like intended headings.
const POSSIBLE_HEADING_MAX_LEN: usize = 120;

pub struct TextCheck {
    uppercase_run: Regex,
    list_prefix: Regex,
}

impl TextCheck {
    pub fn new() -> Self {
        Self {
            // Four or more consecutive shouted words.
            uppercase_run: Regex::new(r"(?:[A-Z']{3,}[\s,:;!?-]+){3,}[A-Z']{3,}").unwrap(),
            list_prefix: Regex::new(r"^\s*(?:[*•>-]|\d{1,2}[.)])\s").unwrap(),
        }
    }

    fn check_paragraph(&self, doc: &DocumentTree, p: NodeId) -> Option<Issue> {
        let text = doc.text_content(p);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let key = dismissal_key(&[trimmed]);

        if is_fully_bold(doc, p) && trimmed.chars().count() < POSSIBLE_HEADING_MAX_LEN {
            return Some(Issue::new(
                p,
                CheckKind::TextPossibleHeading,
                trimmed,
                Some(key),
            ));
        }
        if self.list_prefix.is_match(trimmed) && self.has_list_neighbor(doc, p) {
            return Some(Issue::new(
                p,
                CheckKind::TextPossibleList,
                trimmed,
                Some(key),
            ));
        }
        if self.uppercase_run.is_match(trimmed) {
            return Some(Issue::new(p, CheckKind::TextUppercase, trimmed, Some(key)));
        }
        None
    }

    /// A manual list needs at least two entries: the paragraph sibling on
    /// either side must carry a list prefix too.
    fn has_list_neighbor(&self, doc: &DocumentTree, p: NodeId) -> bool {
        let Some(parent) = doc.parent(p) else {
            return false;
        };
        let siblings = doc.children(parent);
        let Some(at) = siblings.iter().position(|&s| s == p) else {
            return false;
        };
        let prefixed_paragraph = |&&s: &&NodeId| {
            doc.element_name(s) == "p" && self.list_prefix.is_match(doc.text_content(s).trim())
        };
        let after = siblings[at + 1..].iter().find(|&&s| doc.is_element(s));
        let before = siblings[..at].iter().rev().find(|&&s| doc.is_element(s));
        after.is_some_and(|s| prefixed_paragraph(&s)) || before.is_some_and(|s| prefixed_paragraph(&s))
    }

    fn check_table(&self, doc: &DocumentTree, table: NodeId) -> Vec<Issue> {
        let mut issues = Vec::new();
        let mut has_header_cell = false;
        let mut content_heading = None;
        for node in doc.descendants(table) {
            if !doc.is_element(node) {
                continue;
            }
            let name = doc.element_name(node);
            if name == "th" {
                has_header_cell = true;
            }
            if content_heading.is_none() && is_heading_tag(name) {
                content_heading = Some(node);
            }
        }

        if !has_header_cell {
            issues.push(
                Issue::new(table, CheckKind::TableNoHeaderCells, "", None)
                    .with_position(InsertionHint::Inside),
            );
        }
        if let Some(heading) = content_heading {
            let text = doc.text_content(heading);
            issues.push(Issue::new(
                heading,
                CheckKind::TableContainsContentHeading,
                text.trim(),
                Some(dismissal_key(&[text.trim()])),
            ));
        }
        issues
    }
}

impl Default for TextCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for TextCheck {
    fn module(&self) -> CheckModule {
        CheckModule::Text
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        for &p in ctx.elements.get(Category::Paragraph) {
            issues.extend(self.check_paragraph(ctx.doc, p));
        }
        for &table in ctx.elements.get(Category::Table) {
            issues.extend(self.check_table(ctx.doc, table));
        }
        issues
    }
}

fn is_heading_tag(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Whether all of a paragraph's text sits inside bold/strong children.
fn is_fully_bold(doc: &DocumentTree, p: NodeId) -> bool {
    let mut saw_bold_text = false;
    for &child in doc.children(p) {
        if doc.is_element(child) {
            let name = doc.element_name(child);
            if name == "b" || name == "strong" {
                if !doc.text_content(child).trim().is_empty() {
                    saw_bold_text = true;
                }
            } else if !doc.text_content(child).trim().is_empty() {
                return false;
            }
        } else if !doc.text_content(child).trim().is_empty() {
            // Direct unbolded text.
            return false;
        }
    }
    saw_bold_text
}
