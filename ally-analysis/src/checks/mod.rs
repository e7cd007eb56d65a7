//! The five check modules and their registry.

pub mod embeds;
pub mod headings;
pub mod images;
pub mod links;
pub mod registry;
pub mod rules;
pub mod text;

use ally_core::{CheckModule, DocumentTree};

use crate::collector::ElementRegistry;
use crate::store::issue::Issue;

pub use registry::{create_default_registry, CheckRegistry};
pub use rules::RuleSet;

/// Everything a check module reads during one scan pass.
pub struct CheckContext<'a> {
    pub doc: &'a DocumentTree,
    pub elements: &'a ElementRegistry,
}

/// One check module: a pure classifier over its collected category.
pub trait Check: Send + Sync {
    fn module(&self) -> CheckModule;

    /// Classify the module's elements and return every issue found.
    fn check(&self, ctx: &CheckContext<'_>) -> Vec<Issue>;
}
