//! CheckRegistry — fixed-order module registry with panic containment.

use ally_core::CheckModule;

use super::{Check, CheckContext};
use crate::store::issue::Issue;

/// Registry of check modules, run in registration order.
///
/// A panicking module is contained and logged; the remaining modules still
/// run, so one bad heuristic never loses a whole scan.
pub struct CheckRegistry {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    pub fn register(&mut self, check: Box<dyn Check>) {
        self.checks.push(check);
    }

    pub fn count(&self) -> usize {
        self.checks.len()
    }

    /// Run one module, with panic containment.
    pub fn run_module(&self, module: CheckModule, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        for check in &self.checks {
            if check.module() != module {
                continue;
            }
            issues.extend(run_contained(check.as_ref(), ctx));
        }
        issues
    }
}

fn run_contained(check: &dyn Check, ctx: &CheckContext<'_>) -> Vec<Issue> {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| check.check(ctx)));
    match result {
        Ok(found) => found,
        Err(_) => {
            tracing::error!(
                module = check.module().name(),
                "check module panicked during scan"
            );
            Vec::new()
        }
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with all five modules in their fixed execution order.
pub fn create_default_registry() -> CheckRegistry {
    let mut registry = CheckRegistry::new();
    registry.register(Box::new(super::images::ImagesCheck::new()));
    registry.register(Box::new(super::links::LinksCheck::new()));
    registry.register(Box::new(super::headings::HeadingsCheck::new()));
    registry.register(Box::new(super::text::TextCheck::new()));
    registry.register(Box::new(super::embeds::EmbedsCheck::new()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    use ally_core::{CheckKind, DocumentTree, NodeId};

    use crate::collector::ElementRegistry;

    #[test]
    fn test_default_registry_covers_all_modules() {
        let registry = create_default_registry();
        assert_eq!(registry.count(), CheckModule::all().len());
    }

    struct PanickingCheck;

    impl Check for PanickingCheck {
        fn module(&self) -> CheckModule {
            CheckModule::Images
        }

        fn check(&self, _ctx: &CheckContext<'_>) -> Vec<Issue> {
            panic!("boom");
        }
    }

    struct OneIssueCheck;

    impl Check for OneIssueCheck {
        fn module(&self) -> CheckModule {
            CheckModule::Images
        }

        fn check(&self, _ctx: &CheckContext<'_>) -> Vec<Issue> {
            vec![Issue::new(NodeId(1), CheckKind::AltNull, "", None)]
        }
    }

    #[test]
    fn test_panicking_module_is_contained() {
        let mut registry = CheckRegistry::new();
        registry.register(Box::new(PanickingCheck));
        registry.register(Box::new(OneIssueCheck));

        let doc = DocumentTree::new("/t");
        let elements = ElementRegistry::default();
        let ctx = CheckContext {
            doc: &doc,
            elements: &elements,
        };
        // The panic is swallowed; the sibling check of the same module
        // still reports.
        let issues = registry.run_module(CheckModule::Images, &ctx);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_other_modules_are_not_run() {
        let mut registry = CheckRegistry::new();
        registry.register(Box::new(OneIssueCheck));

        let doc = DocumentTree::new("/t");
        let elements = ElementRegistry::default();
        let ctx = CheckContext {
            doc: &doc,
            elements: &elements,
        };
        assert!(registry.run_module(CheckModule::Links, &ctx).is_empty());
    }
}
