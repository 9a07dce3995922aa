//! Element tree
//!
//! The [`Dom`] trait is the traversal surface handlers need: parent and
//! child links, tag names and attributes. Lookups such as [`Dom::closest`]
//! and [`Dom::query_selector`] are provided on top of those four reads.
//!
//! [`Document`] is an in-memory implementation used by hosts that do not
//! have a DOM of their own, and by tests.
//!
//! # Example
//!
//! ```rust
//! use cardlink_core::dom::{element, Document, Dom};
//!
//! let mut doc = Document::new();
//! let card = doc.insert(
//!     element("div")
//!         .attr("class", "card")
//!         .child(element("p"))
//!         .child(element("a").attr("href", "/x")),
//! );
//!
//! assert_eq!(doc.children(card).len(), 2);
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tracing::trace;

use crate::events::EventContext;
use crate::selection::{Selection, TextSelection};
use crate::selector::Selector;

new_key_type! {
    /// Unique identifier for an element
    pub struct NodeId;
}

/// Read access to an element tree
pub trait Dom {
    /// Parent element, `None` for a root or unknown node
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Child elements in document order
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Lowercase tag name
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    /// Raw attribute value
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Check if `node` matches `selector`
    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector.matches(self, node)
    }

    /// Nearest inclusive ancestor of `node` matching `selector`
    fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if selector.matches(self, id) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// First descendant of `root` (excluding `root`) matching `selector`, in document order
    fn query_selector(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if selector.matches(self, id) {
                return Some(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        None
    }

    /// Check if `node` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}

/// Element data stored in a [`Document`]
#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: SmallVec<[(String, String); 4]>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory element tree with a text selection
#[derive(Debug, Default)]
pub struct Document {
    nodes: SlotMap<NodeId, Element>,
    selection: TextSelection,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(Element {
            tag: tag.to_ascii_lowercase(),
            attributes: SmallVec::new(),
            parent: None,
            children: Vec::new(),
        })
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        let Some(element) = self.nodes.get_mut(node) else {
            return;
        };
        let name = name.to_ascii_lowercase();
        let value = value.into();
        match element.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => element.attributes.push((name, value)),
        }
    }

    /// Remove an attribute
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(element) = self.nodes.get_mut(node) {
            element
                .attributes
                .retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        }
    }

    /// Append `child` as the last child of `parent`, moving it if already attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child
            || !self.nodes.contains_key(parent)
            || !self.nodes.contains_key(child)
            || self.contains(child, parent)
        {
            trace!(?parent, ?child, "append_child refused: missing node or cycle");
            return;
        }

        self.detach(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }

    /// Detach `node` from its parent, keeping its subtree
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(node).and_then(|e| e.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|&c| c != node);
        }
    }

    /// Remove `node` and its whole subtree
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(element) = self.nodes.remove(id) {
                stack.extend(element.children);
            }
        }
    }

    /// Build a detached subtree from an `ElementSpec`, returning its root
    pub fn insert(&mut self, spec: ElementSpec) -> NodeId {
        let node = self.create_element(&spec.tag);
        for (name, value) in spec.attributes {
            self.set_attribute(node, &name, value);
        }
        for child in spec.children {
            let child = self.insert(child);
            self.append_child(node, child);
        }
        node
    }

    /// Build a subtree from an `ElementSpec` and append it to `parent`
    pub fn insert_into(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let node = self.insert(spec);
        self.append_child(parent, node);
        node
    }

    /// Find an element by its `id` attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, e)| e.attributes.iter().any(|(n, v)| n == "id" && v == id))
            .map(|(node, _)| node)
    }

    /// Check if a node exists in this document
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Replace the current text selection
    pub fn set_selection(&mut self, text: impl Into<String>) {
        self.selection = TextSelection::new(text);
    }

    /// Clear the current text selection
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Handler context reading this document and its selection
    pub fn context(&self) -> EventContext<'_> {
        EventContext::new(self, self)
    }
}

impl Dom for Document {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|e| e.parent)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).map(|e| e.tag.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node).and_then(|e| {
            e.attributes
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        })
    }
}

impl Selection for Document {
    fn selected_text(&self) -> &str {
        self.selection.selected_text()
    }
}

/// Declarative description of an element subtree
#[derive(Debug, Clone)]
pub struct ElementSpec {
    tag: String,
    attributes: SmallVec<[(String, String); 4]>,
    children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: SmallVec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child element
    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// Create an `ElementSpec` for `tag`
pub fn element(tag: impl Into<String>) -> ElementSpec {
    ElementSpec::new(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_fixture(doc: &mut Document) -> NodeId {
        doc.insert(
            element("div")
                .attr("class", "card")
                .child(element("h3").child(element("span").attr("id", "title")))
                .child(element("a").attr("href", "/first"))
                .child(element("p").child(element("a").attr("href", "/second"))),
        )
    }

    #[test]
    fn test_insert_builds_tree() {
        let mut doc = Document::new();
        let card = card_fixture(&mut doc);

        assert_eq!(doc.len(), 6);
        assert_eq!(doc.tag_name(card), Some("div"));
        assert_eq!(doc.children(card).len(), 3);
        assert_eq!(doc.parent(card), None);

        let title = doc.get_element_by_id("title").unwrap();
        assert!(doc.contains(card, title));
        assert!(!doc.contains(title, card));
    }

    #[test]
    fn test_tag_and_attribute_names_are_case_insensitive() {
        let mut doc = Document::new();
        let node = doc.create_element("A");
        doc.set_attribute(node, "HREF", "/x");

        assert_eq!(doc.tag_name(node), Some("a"));
        assert_eq!(doc.attribute(node, "href"), Some("/x"));
        assert_eq!(doc.attribute(node, "Href"), Some("/x"));
    }

    #[test]
    fn test_set_attribute_replaces_value() {
        let mut doc = Document::new();
        let node = doc.create_element("a");
        doc.set_attribute(node, "href", "/old");
        doc.set_attribute(node, "href", "/new");
        assert_eq!(doc.attribute(node, "href"), Some("/new"));

        doc.remove_attribute(node, "href");
        assert_eq!(doc.attribute(node, "href"), None);
    }

    #[test]
    fn test_query_selector_is_document_order() {
        let mut doc = Document::new();
        let card = card_fixture(&mut doc);
        let links = Selector::parse("a").unwrap();

        let first = doc.query_selector(card, &links).unwrap();
        assert_eq!(doc.attribute(first, "href"), Some("/first"));

        let nested = Selector::parse("p a").unwrap();
        let second = doc.query_selector(card, &nested).unwrap();
        assert_eq!(doc.attribute(second, "href"), Some("/second"));
    }

    #[test]
    fn test_query_selector_excludes_root() {
        let mut doc = Document::new();
        let link = doc.insert(element("a").attr("href", "/self"));
        let links = Selector::parse("a").unwrap();
        assert_eq!(doc.query_selector(link, &links), None);
    }

    #[test]
    fn test_closest_is_inclusive() {
        let mut doc = Document::new();
        let card = card_fixture(&mut doc);
        let title = doc.get_element_by_id("title").unwrap();

        let span = Selector::parse("span").unwrap();
        assert_eq!(doc.closest(title, &span), Some(title));

        let card_sel = Selector::parse(".card").unwrap();
        assert_eq!(doc.closest(title, &card_sel), Some(card));

        let button = Selector::parse("button").unwrap();
        assert_eq!(doc.closest(title, &button), None);
    }

    #[test]
    fn test_append_child_moves_node() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");

        doc.append_child(a, child);
        doc.append_child(b, child);

        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[child]);
        assert_eq!(doc.parent(child), Some(b));
    }

    #[test]
    fn test_append_child_rejects_cycles() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner);

        doc.append_child(inner, outer);
        assert_eq!(doc.parent(outer), None);
        assert_eq!(doc.parent(inner), Some(outer));

        doc.append_child(inner, inner);
        assert!(doc.children(inner).is_empty());

        let removed = doc.create_element("span");
        doc.remove(removed);
        doc.append_child(outer, removed);
        assert_eq!(doc.children(outer), &[inner]);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut doc = Document::new();
        let card = card_fixture(&mut doc);
        let title = doc.get_element_by_id("title").unwrap();
        let heading = doc.parent(title).unwrap();

        doc.remove(heading);
        assert!(!doc.is_alive(heading));
        assert!(!doc.is_alive(title));
        assert_eq!(doc.children(card).len(), 2);
    }

    #[test]
    fn test_document_selection() {
        let mut doc = Document::new();
        assert!(Selection::is_empty(&doc));

        doc.set_selection("selected words");
        assert_eq!(doc.selected_text(), "selected words");

        doc.clear_selection();
        assert!(Selection::is_empty(&doc));
    }
}
