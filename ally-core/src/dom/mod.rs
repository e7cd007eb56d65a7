//! In-memory document model.
//!
//! The engine never touches a live rendering surface: the host feeds it a
//! `DocumentTree` (nodes, attributes, text, geometry, shadow roots) and a
//! stream of `MutationRecord`s. Everything the checker does — collection,
//! classification, layout — runs against this model, so the whole pipeline
//! is testable without a browser.

pub mod geometry;
pub mod node;
pub mod selector;

pub use geometry::Rect;
pub use node::{DocumentTree, MutationRecord, NodeData, NodeId};
pub use selector::SelectorList;
