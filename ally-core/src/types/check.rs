//! Check kinds — the universal classification vocabulary.

use serde::{Deserialize, Serialize};

/// The five check modules, run in this fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckModule {
    Images,
    Links,
    Headings,
    Text,
    Embeds,
}

impl CheckModule {
    /// All modules in execution order.
    pub fn all() -> &'static [CheckModule] {
        &[
            Self::Images,
            Self::Links,
            Self::Headings,
            Self::Text,
            Self::Embeds,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Links => "links",
            Self::Headings => "headings",
            Self::Text => "text",
            Self::Embeds => "embeds",
        }
    }
}

/// Every defect kind the engine can emit.
///
/// Non-dismissable kinds are hard errors: they always contribute to the
/// error count, and no dismissal key is ever derived for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckKind {
    // Images
    AltMissing,
    AltMissingLinked,
    AltNull,
    AltUrl,
    AltUrlLinked,
    AltMeaningless,
    AltMeaninglessLinked,
    AltImageOf,
    AltImageOfLinked,
    AltDeadspace,
    AltDeadspaceLinked,
    AltLong,
    AltLongLinked,
    AltPartOfLinkWithText,
    // Links
    LinkNoText,
    LinkTextIsUrl,
    LinkNonDescriptive,
    LinkDocument,
    // Headings
    HeadingSkippedLevel,
    HeadingEmpty,
    HeadingLong,
    // Text (tables ride along here)
    TextPossibleHeading,
    TextPossibleList,
    TextUppercase,
    TableNoHeaderCells,
    TableContainsContentHeading,
    // Embeds
    EmbedVideo,
    EmbedAudio,
    EmbedVisualization,
    EmbedCustom,
}

impl CheckKind {
    /// Kind name as the stable string used for persistence and events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AltMissing => "altMissing",
            Self::AltMissingLinked => "altMissingLinked",
            Self::AltNull => "altNull",
            Self::AltUrl => "altUrl",
            Self::AltUrlLinked => "altUrlLinked",
            Self::AltMeaningless => "altMeaningless",
            Self::AltMeaninglessLinked => "altMeaninglessLinked",
            Self::AltImageOf => "altImageOf",
            Self::AltImageOfLinked => "altImageOfLinked",
            Self::AltDeadspace => "altDeadspace",
            Self::AltDeadspaceLinked => "altDeadspaceLinked",
            Self::AltLong => "altLong",
            Self::AltLongLinked => "altLongLinked",
            Self::AltPartOfLinkWithText => "altPartOfLinkWithText",
            Self::LinkNoText => "linkNoText",
            Self::LinkTextIsUrl => "linkTextIsUrl",
            Self::LinkNonDescriptive => "linkNonDescriptive",
            Self::LinkDocument => "linkDocument",
            Self::HeadingSkippedLevel => "headingSkippedLevel",
            Self::HeadingEmpty => "headingEmpty",
            Self::HeadingLong => "headingLong",
            Self::TextPossibleHeading => "textPossibleHeading",
            Self::TextPossibleList => "textPossibleList",
            Self::TextUppercase => "textUppercase",
            Self::TableNoHeaderCells => "tableNoHeaderCells",
            Self::TableContainsContentHeading => "tableContainsContentHeading",
            Self::EmbedVideo => "embedVideo",
            Self::EmbedAudio => "embedAudio",
            Self::EmbedVisualization => "embedVisualization",
            Self::EmbedCustom => "embedCustom",
        }
    }

    /// Parse from the stable string form.
    pub fn parse_str(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.name() == s)
    }

    /// Whether a matching dismissal record can suppress this kind.
    pub fn is_dismissable(&self) -> bool {
        !matches!(
            self,
            Self::AltMissing
                | Self::AltMissingLinked
                | Self::AltUrl
                | Self::AltUrlLinked
                | Self::AltMeaningless
                | Self::AltMeaninglessLinked
                | Self::AltDeadspace
                | Self::AltDeadspaceLinked
                | Self::LinkNoText
                | Self::HeadingEmpty
                | Self::TableNoHeaderCells
        )
    }

    /// The module this kind belongs to.
    pub fn module(&self) -> CheckModule {
        match self {
            Self::AltMissing
            | Self::AltMissingLinked
            | Self::AltNull
            | Self::AltUrl
            | Self::AltUrlLinked
            | Self::AltMeaningless
            | Self::AltMeaninglessLinked
            | Self::AltImageOf
            | Self::AltImageOfLinked
            | Self::AltDeadspace
            | Self::AltDeadspaceLinked
            | Self::AltLong
            | Self::AltLongLinked
            | Self::AltPartOfLinkWithText => CheckModule::Images,
            Self::LinkNoText
            | Self::LinkTextIsUrl
            | Self::LinkNonDescriptive
            | Self::LinkDocument => CheckModule::Links,
            Self::HeadingSkippedLevel | Self::HeadingEmpty | Self::HeadingLong => {
                CheckModule::Headings
            }
            Self::TextPossibleHeading
            | Self::TextPossibleList
            | Self::TextUppercase
            | Self::TableNoHeaderCells
            | Self::TableContainsContentHeading => CheckModule::Text,
            Self::EmbedVideo
            | Self::EmbedAudio
            | Self::EmbedVisualization
            | Self::EmbedCustom => CheckModule::Embeds,
        }
    }

    /// Every kind, in declaration order.
    pub fn all() -> &'static [CheckKind] {
        &[
            Self::AltMissing,
            Self::AltMissingLinked,
            Self::AltNull,
            Self::AltUrl,
            Self::AltUrlLinked,
            Self::AltMeaningless,
            Self::AltMeaninglessLinked,
            Self::AltImageOf,
            Self::AltImageOfLinked,
            Self::AltDeadspace,
            Self::AltDeadspaceLinked,
            Self::AltLong,
            Self::AltLongLinked,
            Self::AltPartOfLinkWithText,
            Self::LinkNoText,
            Self::LinkTextIsUrl,
            Self::LinkNonDescriptive,
            Self::LinkDocument,
            Self::HeadingSkippedLevel,
            Self::HeadingEmpty,
            Self::HeadingLong,
            Self::TextPossibleHeading,
            Self::TextPossibleList,
            Self::TextUppercase,
            Self::TableNoHeaderCells,
            Self::TableContainsContentHeading,
            Self::EmbedVideo,
            Self::EmbedAudio,
            Self::EmbedVisualization,
            Self::EmbedCustom,
        ]
    }

    /// A kind's `…Linked` variant, where one exists.
    pub fn linked_variant(&self) -> Option<Self> {
        match self {
            Self::AltMissing => Some(Self::AltMissingLinked),
            Self::AltUrl => Some(Self::AltUrlLinked),
            Self::AltMeaningless => Some(Self::AltMeaninglessLinked),
            Self::AltImageOf => Some(Self::AltImageOfLinked),
            Self::AltDeadspace => Some(Self::AltDeadspaceLinked),
            Self::AltLong => Some(Self::AltLongLinked),
            _ => None,
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A stored dismissal decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DismissalStatus {
    /// "Marked OK" — the author reviewed the flag and vouched for the content.
    Ok,
    /// "Hidden" — suppressed for this reviewer only.
    Hide,
}

impl DismissalStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Hide => "hide",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "ok" => Some(Self::Ok),
            "hide" => Some(Self::Hide),
            _ => None,
        }
    }
}

/// An action applied to a dismissal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DismissalAction {
    Ok,
    Hide,
    /// Restore: delete the record (and prune empty parents).
    Reset,
}

impl DismissalAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Hide => "hide",
            Self::Reset => "reset",
        }
    }

    /// The status this action stores, if any.
    pub fn as_status(&self) -> Option<DismissalStatus> {
        match self {
            Self::Ok => Some(DismissalStatus::Ok),
            Self::Hide => Some(DismissalStatus::Hide),
            Self::Reset => None,
        }
    }
}

/// Aggregate counts from one scan.
///
/// Invariant: `errors + warnings == total`; `dismissed` is tracked
/// independently of `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCounts {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub dismissed: usize,
}
