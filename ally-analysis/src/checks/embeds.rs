//! Embedded-media checks.
//!
//! Embeds can never be verified automatically; every kind here is a
//! dismissable manual-check reminder.

use aho_corasick::AhoCorasick;
use ally_core::types::keys::{dismissal_key, strip_query};
use ally_core::{CheckKind, CheckModule, DocumentTree, NodeId};

use super::{Check, CheckContext};
use crate::collector::{Category, ElementRegistry};
use crate::store::issue::{InsertionHint, Issue};

const VIDEO_PROVIDERS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "wistia.com",
    "dailymotion.com",
    "loom.com",
];

const AUDIO_PROVIDERS: &[&str] = &[
    "soundcloud.com",
    "spotify.com",
    "podbean.com",
    "buzzsprout.com",
];

const DATAVIZ_PROVIDERS: &[&str] = &[
    "datawrapper.dwcdn.net",
    "tableau.com",
    "flourish.studio",
    "infogram.com",
    "lookerstudio.google.com",
    "powerbi.com",
];

pub struct EmbedsCheck {
    video: AhoCorasick,
    audio: AhoCorasick,
    dataviz: AhoCorasick,
}

impl EmbedsCheck {
    pub fn new() -> Self {
        Self {
            video: AhoCorasick::new(VIDEO_PROVIDERS).unwrap(),
            audio: AhoCorasick::new(AUDIO_PROVIDERS).unwrap(),
            dataviz: AhoCorasick::new(DATAVIZ_PROVIDERS).unwrap(),
        }
    }

    fn classify_frame(&self, doc: &DocumentTree, frame: NodeId) -> CheckKind {
        let src = doc.attr(frame, "src").unwrap_or_default();
        if self.video.is_match(src) {
            CheckKind::EmbedVideo
        } else if self.audio.is_match(src) {
            CheckKind::EmbedAudio
        } else if self.dataviz.is_match(src) {
            CheckKind::EmbedVisualization
        } else {
            CheckKind::EmbedCustom
        }
    }
}

impl Default for EmbedsCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for EmbedsCheck {
    fn module(&self) -> CheckModule {
        CheckModule::Embeds
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        for &video in ctx.elements.get(Category::Video) {
            issues.push(embed_issue(ctx.doc, video, CheckKind::EmbedVideo));
        }
        for &audio in ctx.elements.get(Category::Audio) {
            issues.push(embed_issue(ctx.doc, audio, CheckKind::EmbedAudio));
        }
        for &frame in ctx.elements.get(Category::Iframe) {
            if already_flagged(ctx.elements, ctx.doc, frame) {
                continue;
            }
            let kind = self.classify_frame(ctx.doc, frame);
            issues.push(embed_issue(ctx.doc, frame, kind));
        }
        issues
    }
}

fn embed_issue(doc: &DocumentTree, element: NodeId, kind: CheckKind) -> Issue {
    let src = doc.attr(element, "src").unwrap_or_default();
    let title = doc.attr(element, "title").unwrap_or_default();
    let key = dismissal_key(&[strip_query(src), title]);
    Issue::new(element, kind, title, Some(key)).with_position(InsertionHint::Before)
}

/// Native audio/video elements also match the iframe category selectors on
/// some pages; skip frames that are themselves in those registries.
fn already_flagged(elements: &ElementRegistry, doc: &DocumentTree, frame: NodeId) -> bool {
    let name = doc.element_name(frame);
    (name == "video" && elements.get(Category::Video).contains(&frame))
        || (name == "audio" && elements.get(Category::Audio).contains(&frame))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        doc: &DocumentTree,
        frames: Vec<NodeId>,
        audio: Vec<NodeId>,
        video: Vec<NodeId>,
    ) -> Vec<Issue> {
        let mut registry = ElementRegistry::default();
        registry.insert(Category::Iframe, frames);
        registry.insert(Category::Audio, audio);
        registry.insert(Category::Video, video);
        let ctx = CheckContext {
            doc,
            elements: &registry,
        };
        EmbedsCheck::new().check(&ctx)
    }

    fn frame(doc: &mut DocumentTree, src: &str) -> NodeId {
        let f = doc.append_element(doc.root(), "iframe");
        doc.set_attr(f, "src", src);
        f
    }

    #[test]
    fn test_video_provider_frame() {
        let mut doc = DocumentTree::new("/t");
        let f = frame(&mut doc, "https://www.youtube.com/embed/abc123");
        let issues = run(&doc, vec![f], vec![], vec![]);
        assert_eq!(issues[0].kind, CheckKind::EmbedVideo);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_dataviz_provider_frame() {
        let mut doc = DocumentTree::new("/t");
        let f = frame(&mut doc, "https://datawrapper.dwcdn.net/xyz/1/");
        let issues = run(&doc, vec![f], vec![], vec![]);
        assert_eq!(issues[0].kind, CheckKind::EmbedVisualization);
    }

    #[test]
    fn test_unknown_frame_is_custom() {
        let mut doc = DocumentTree::new("/t");
        let f = frame(&mut doc, "https://example.com/widget");
        let issues = run(&doc, vec![f], vec![], vec![]);
        assert_eq!(issues[0].kind, CheckKind::EmbedCustom);
    }

    #[test]
    fn test_native_audio_element() {
        let mut doc = DocumentTree::new("/t");
        let a = doc.append_element(doc.root(), "audio");
        doc.set_attr(a, "src", "/media/interview.mp3");
        let issues = run(&doc, vec![], vec![a], vec![]);
        assert_eq!(issues[0].kind, CheckKind::EmbedAudio);
    }

    #[test]
    fn test_all_embed_kinds_dismissable() {
        for kind in [
            CheckKind::EmbedVideo,
            CheckKind::EmbedAudio,
            CheckKind::EmbedVisualization,
            CheckKind::EmbedCustom,
        ] {
            assert!(kind.is_dismissable());
        }
    }
}
