//! Ordered classification rules.
//!
//! Each check module pre-computes a facts struct per element and runs it
//! through a `RuleSet`: an ordered list of (kind, predicate) pairs evaluated
//! until the first match. Rule order IS the tie-break priority.

use ally_core::CheckKind;

type Predicate<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

struct Rule<C> {
    kind: CheckKind,
    predicate: Predicate<C>,
}

/// An ordered, first-match-wins rule list over one facts type.
pub struct RuleSet<C> {
    rules: Vec<Rule<C>>,
}

impl<C> RuleSet<C> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Order of calls is evaluation order.
    pub fn rule(
        mut self,
        kind: CheckKind,
        predicate: impl Fn(&C) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Rule {
            kind,
            predicate: Box::new(predicate),
        });
        self
    }

    /// First matching kind, if any.
    pub fn classify(&self, facts: &C) -> Option<CheckKind> {
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(facts))
            .map(|rule| rule.kind)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<C> Default for RuleSet<C> {
    fn default() -> Self {
        Self::new()
    }
}
