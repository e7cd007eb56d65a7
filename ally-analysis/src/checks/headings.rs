//! Heading structure checks.
//!
//! Unlike the other modules this one is stateful across the collected set:
//! skipped-level detection compares each heading to the previous one in
//! document order.

use ally_core::constants::HEADING_MAX_LEN;
use ally_core::types::keys::dismissal_key;
use ally_core::{CheckKind, CheckModule, DocumentTree, NodeId};

use super::{Check, CheckContext};
use crate::collector::Category;
use crate::store::issue::{InsertionHint, Issue};

pub struct HeadingsCheck;

impl HeadingsCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeadingsCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for HeadingsCheck {
    fn module(&self) -> CheckModule {
        CheckModule::Headings
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        let mut previous_level: Option<u8> = None;

        for &heading in ctx.elements.get(Category::Heading) {
            let Some(level) = heading_level(ctx.doc, heading) else {
                continue;
            };
            let text = ctx.doc.text_content(heading);
            let trimmed = text.trim();
            let key = dismissal_key(&[&level.to_string(), trimmed]);

            if trimmed.is_empty() {
                issues.push(
                    Issue::new(heading, CheckKind::HeadingEmpty, "", None)
                        .with_position(InsertionHint::Inside),
                );
            } else if let Some(prev) = previous_level {
                if level > prev + 1 {
                    issues.push(Issue::new(
                        heading,
                        CheckKind::HeadingSkippedLevel,
                        trimmed,
                        Some(key.clone()),
                    ));
                }
            }

            if trimmed.chars().count() > HEADING_MAX_LEN {
                issues.push(Issue::new(
                    heading,
                    CheckKind::HeadingLong,
                    trimmed,
                    Some(key),
                ));
            }
            previous_level = Some(level);
        }
        issues
    }
}

/// Heading level from the tag name (`h1`..`h6`) or `role=heading` +
/// `aria-level`. Unlevelled role headings default to 2.
fn heading_level(doc: &DocumentTree, node: NodeId) -> Option<u8> {
    let name = doc.element_name(node);
    if let Some(rest) = name.strip_prefix('h') {
        if let Ok(level @ 1..=6) = rest.parse::<u8>() {
            return Some(level);
        }
    }
    if doc.attr(node, "role") == Some("heading") {
        let level = doc
            .attr(node, "aria-level")
            .and_then(|v| v.parse::<u8>().ok())
            .filter(|l| (1..=6).contains(l))
            .unwrap_or(2);
        return Some(level);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::collector::ElementRegistry;

    fn run(doc: &DocumentTree, headings: Vec<NodeId>) -> Vec<Issue> {
        let mut registry = ElementRegistry::default();
        registry.insert(Category::Heading, headings);
        let ctx = CheckContext {
            doc,
            elements: &registry,
        };
        HeadingsCheck::new().check(&ctx)
    }

    fn heading(doc: &mut DocumentTree, tag: &str, text: &str) -> NodeId {
        let h = doc.append_element(doc.root(), tag);
        if !text.is_empty() {
            doc.append_text(h, text);
        }
        h
    }

    #[test]
    fn test_skipped_level() {
        let mut doc = DocumentTree::new("/t");
        let h1 = heading(&mut doc, "h1", "Title");
        let h3 = heading(&mut doc, "h3", "Jumped");
        let issues = run(&doc, vec![h1, h3]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, CheckKind::HeadingSkippedLevel);
        assert_eq!(issues[0].element, h3);
    }

    #[test]
    fn test_descending_levels_never_flag() {
        let mut doc = DocumentTree::new("/t");
        let h1 = heading(&mut doc, "h1", "Title");
        let h3 = heading(&mut doc, "h2", "Section");
        let back = heading(&mut doc, "h1", "Next chapter");
        assert!(run(&doc, vec![h1, h3, back]).is_empty());
    }

    #[test]
    fn test_empty_heading_is_error() {
        let mut doc = DocumentTree::new("/t");
        let h2 = heading(&mut doc, "h2", "");
        let issues = run(&doc, vec![h2]);
        assert_eq!(issues[0].kind, CheckKind::HeadingEmpty);
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_long_heading() {
        let mut doc = DocumentTree::new("/t");
        let h2 = heading(&mut doc, "h2", &"w".repeat(161));
        assert_eq!(run(&doc, vec![h2])[0].kind, CheckKind::HeadingLong);
    }

    #[test]
    fn test_role_heading_with_aria_level() {
        let mut doc = DocumentTree::new("/t");
        let h1 = heading(&mut doc, "h1", "Title");
        let div = doc.append_element(doc.root(), "div");
        doc.set_attr(div, "role", "heading");
        doc.set_attr(div, "aria-level", "4");
        doc.append_text(div, "Deep");
        let issues = run(&doc, vec![h1, div]);
        assert_eq!(issues[0].kind, CheckKind::HeadingSkippedLevel);
    }
}
