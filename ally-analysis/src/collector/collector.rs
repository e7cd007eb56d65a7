//! The element collector.
//!
//! Resolves the configured root containers once, then gathers each
//! category's elements in document order, honoring the global and
//! per-category ignore selectors and recursing into open shadow roots.

use ally_core::config::CheckerConfig;
use ally_core::constants::SHADOW_HOST_MARKER_ATTR;
use ally_core::dom::SelectorList;
use ally_core::{CheckerError, DocumentTree, NodeId};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use super::categories::{Category, ElementRegistry};

/// Collects category element sets from the document.
#[derive(Debug)]
pub struct Collector {
    // One or two containers on a typical page.
    roots: SmallVec<[NodeId; 2]>,
    global_ignore: SelectorList,
    category_ignores: FxHashMap<Category, SelectorList>,
    shadow_components: SelectorList,
    detect_shadow: bool,
}

impl Collector {
    /// Resolve roots and ignore selectors from configuration.
    ///
    /// Fails with `NoRootContainer` when the root selector matches nothing;
    /// the caller disables the checker instead of propagating a panic.
    pub fn from_config(
        doc: &DocumentTree,
        config: &CheckerConfig,
    ) -> Result<Self, CheckerError> {
        let root_selector = config.effective_root_selector();
        let parsed = SelectorList::parse_lossy(root_selector);

        let mut roots = SmallVec::new();
        if parsed.matches(doc, doc.root()) {
            roots.push(doc.root());
        }
        roots.extend(doc.query(&parsed, &[doc.root()]));

        if roots.is_empty() {
            tracing::warn!(
                selector = root_selector,
                "no root container resolved; checker disabled"
            );
            return Err(CheckerError::NoRootContainer {
                selector: root_selector.to_string(),
            });
        }

        let global_ignore = config
            .ignore
            .as_deref()
            .map(SelectorList::parse_lossy)
            .unwrap_or_default();

        let mut category_ignores = FxHashMap::default();
        for category in Category::all() {
            if let Some(raw) = config.ignore_by_category.get(category.name()) {
                category_ignores.insert(*category, SelectorList::parse_lossy(raw));
            }
        }

        let shadow_components = config
            .shadow_components
            .as_deref()
            .map(SelectorList::parse_lossy)
            .unwrap_or_default();

        Ok(Self {
            roots,
            global_ignore,
            category_ignores,
            shadow_components,
            detect_shadow: config.effective_detect_shadow(),
        })
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Collect one category's elements, in document order, de-duplicated
    /// across overlapping roots.
    pub fn collect(&self, doc: &mut DocumentTree, category: Category) -> Vec<NodeId> {
        let selector = SelectorList::parse_lossy(category.selector());
        let ignore = self.category_ignores.get(&category);

        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        for i in 0..self.roots.len() {
            let root = self.roots[i];
            for child in doc.children(root).to_vec() {
                self.walk(doc, child, &selector, ignore, &mut out, &mut seen);
            }
        }
        out
    }

    /// Collect every category into a fresh registry.
    pub fn collect_all(&self, doc: &mut DocumentTree) -> ElementRegistry {
        let mut registry = ElementRegistry::default();
        for category in Category::all() {
            let elements = self.collect(doc, *category);
            registry.insert(*category, elements);
        }
        registry
    }

    fn walk(
        &self,
        doc: &mut DocumentTree,
        node: NodeId,
        selector: &SelectorList,
        ignore: Option<&SelectorList>,
        out: &mut Vec<NodeId>,
        seen: &mut FxHashSet<NodeId>,
    ) {
        if !doc.is_element(node) {
            return;
        }
        if self.global_ignore.matches(doc, node)
            || ignore.is_some_and(|list| list.matches(doc, node))
        {
            // An ignored element excludes its whole subtree.
            return;
        }

        let enter_shadow = doc.shadow_root(node).is_some()
            && (self.detect_shadow || self.shadow_components.matches(doc, node));

        if enter_shadow {
            // The host is a placeholder: its internal matches replace it.
            self.tag_shadow_host(doc, node);
            if let Some(shadow) = doc.shadow_root(node) {
                for child in doc.children(shadow).to_vec() {
                    self.walk(doc, child, selector, ignore, out, seen);
                }
            }
        } else if selector.matches(doc, node) && seen.insert(node) {
            out.push(node);
        }

        for child in doc.children(node).to_vec() {
            self.walk(doc, child, selector, ignore, out, seen);
        }
    }

    /// Mark a discovered shadow host and propagate style sheets into its
    /// scope, exactly once per host.
    fn tag_shadow_host(&self, doc: &mut DocumentTree, host: NodeId) {
        if doc.attr(host, SHADOW_HOST_MARKER_ATTR).is_none() {
            doc.set_attr(host, SHADOW_HOST_MARKER_ATTR, "");
        }
        if doc.adopt_styles_into_shadow(host) {
            tracing::debug!(?host, "propagated styles into shadow scope");
        }
    }
}

/// Whether a selector matches anything in the document (used by the
/// prevent-checking and ignore-all predicates).
pub fn selector_matches_any(doc: &DocumentTree, list: &SelectorList) -> bool {
    if list.is_empty() {
        return false;
    }
    if list.matches(doc, doc.root()) {
        return true;
    }
    !doc.query(list, &[doc.root()]).is_empty()
}
