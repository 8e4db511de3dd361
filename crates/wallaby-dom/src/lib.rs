//! Node tree for the wallaby markup engine.
//!
//! This crate provides an arena-based node tree loosely following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), extended with the
//! node kinds a lenient HTML/XML parser produces (doctypes and
//! XML-style declarations) and with form-control association.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow
//! checker issues. The tree owns every node; collaborators (such as the
//! tree builder's open-element stack) hold plain `NodeId`s, never a second
//! ownership claim.

use std::collections::HashMap;

pub mod attributes;
pub mod form;
pub mod tag;

pub use attributes::{Attribute, Attributes};
pub use form::{FormSubmission, KeyVal, SubmitError, SubmitMethod};
pub use tag::Tag;

/// A type-safe index into the node tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing
/// issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
///
/// This node stores indices for parent/child/sibling relationships,
/// enabling O(1) traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    /// "An object A's next sibling is the object immediately following A
    /// in the children of A's parent."
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    /// "An object A's previous sibling is the object immediately preceding A
    /// in the children of A's parent."
    pub prev_sibling: Option<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    /// The root of a parse; created once per parse session.
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    /// "Text nodes are known as text."
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    /// "Comment nodes are known as comments."
    Comment(String),
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    /// A `<!DOCTYPE ...>` node with its name and public/system identifiers.
    Doctype(DoctypeData),
    /// An XML-style declaration (`<!...>` or `<?...?>`) re-materialized
    /// from a bogus comment by dialects that parse real declarations.
    Declaration(DeclarationData),
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// - "When an element is created, its local name is always given."
/// - "An element has an associated attribute list."
///
/// Elements additionally carry the base URI that was active when the
/// element was inserted, so relative URLs in attributes can be resolved
/// after the parse.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// The element's tag descriptor (name plus capability flags).
    pub tag: Tag,
    /// The element's attribute list, in encounter order.
    pub attrs: Attributes,
    /// Base URI inherited from the parse session at insertion time.
    pub base_uri: Option<String>,
}

impl ElementData {
    /// Create element data for a tag with no attributes and no base URI.
    #[must_use]
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attrs: Attributes::new(),
            base_uri: None,
        }
    }

    /// The element's tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.tag.name()
    }

    /// Look up an attribute value by exact (case-sensitive) name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    /// Resolve an attribute holding a URL against this element's base URI.
    ///
    /// Returns `None` when the attribute is absent, or when its value is
    /// relative and no base URI was supplied at parse time.
    #[must_use]
    pub fn abs_url(&self, name: &str) -> Option<String> {
        let value = self.attr(name)?;
        if wallaby_common::url::has_scheme(value) {
            return Some(value.to_string());
        }
        self.base_uri
            .as_deref()
            .map(|base| wallaby_common::url::resolve_url(value, Some(base)))
    }
}

/// Data carried by a doctype node.
#[derive(Debug, Clone, Default)]
pub struct DoctypeData {
    /// The doctype name (`html` for `<!DOCTYPE html>`).
    pub name: String,
    /// The public identifier, empty when absent.
    pub public_identifier: String,
    /// The system identifier, empty when absent.
    pub system_identifier: String,
}

/// Data carried by a declaration node.
///
/// Declarations come in two flavors: `!`-marked (`<!ENTITY ...>`) and
/// `?`-marked (`<?xml ...?>`). The stored data has the leading marker
/// character stripped; the flavor is recorded in [`DeclarationData::bang`].
#[derive(Debug, Clone)]
pub struct DeclarationData {
    /// Declaration content with the leading `!` or `?` removed.
    pub data: String,
    /// True for the `!` flavor, false for the `?` flavor.
    pub bang: bool,
}

/// Arena-based node tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree. A tree is a finite
/// hierarchical tree structure."
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships. This provides:
/// - O(1) access to any node by `NodeId`
/// - O(1) parent/sibling traversal
/// - No borrowing issues (indices instead of references)
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
    /// Base URI supplied for the parse session, if any.
    base_uri: Option<String>,
    /// Form-control association: non-owning back-references from a form
    /// element to the controls registered against it, in insertion order.
    form_controls: HashMap<NodeId, Vec<NodeId>>,
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        };
        DomTree {
            nodes: vec![document],
            base_uri: None,
            form_controls: HashMap::new(),
        }
    }

    /// Create a new tree with the given session base URI.
    #[must_use]
    pub fn with_base_uri(base_uri: impl Into<String>) -> Self {
        let mut tree = Self::new();
        tree.base_uri = Some(base_uri.into());
        tree
    }

    /// The base URI supplied for the parse session, if any.
    #[must_use]
    pub fn base_uri(&self) -> Option<&str> {
        self.base_uri.as_deref()
    }

    /// Set the session base URI.
    pub fn set_base_uri(&mut self, base_uri: impl Into<String>) {
        self.base_uri = Some(base_uri.into());
    }

    /// Get the root document node ID.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before
    /// null."
    ///
    /// Appends `child` as the last child of `parent`, updating all
    /// relationships. Child order is insertion order and is never
    /// reordered afterwards.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        // Current last child of parent (if any) to set up sibling links.
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// "An object A is called a descendant of an object B, if either A is a
    /// child of B or A is a child of an object C that is a descendant of B."
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(descendant);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over `id` and all of its descendants in tree order
    /// (depth-first, children in insertion order).
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            pending: vec![id],
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// The concatenated text of a node and its descendants, in tree order.
    #[must_use]
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node_id in self.descendants(id) {
            if let Some(data) = self.as_text(node_id) {
                out.push_str(data);
            }
        }
        out
    }

    /// Render the subtree under `id` as an indented outline.
    ///
    /// One line per node; text is quoted with newlines escaped. Used by
    /// tests to compare tree structure and by the CLI for display.
    #[must_use]
    pub fn outline(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.outline_into(id, 0, &mut out);
        out
    }

    fn outline_into(&self, id: NodeId, indent: usize, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        for _ in 0..indent {
            out.push_str("  ");
        }
        match &node.node_type {
            NodeType::Document => out.push_str("Document"),
            NodeType::Element(data) => {
                out.push('<');
                out.push_str(data.name());
                for attr in data.attrs.iter() {
                    out.push(' ');
                    out.push_str(&attr.name);
                    if !attr.value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&attr.value);
                        out.push('"');
                    }
                }
                out.push('>');
            }
            NodeType::Text(data) => {
                out.push('"');
                out.push_str(&data.replace('\n', "\\n"));
                out.push('"');
            }
            NodeType::Comment(data) => {
                out.push_str("<!-- ");
                out.push_str(data);
                out.push_str(" -->");
            }
            NodeType::Doctype(data) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(&data.name);
                if !data.public_identifier.is_empty() {
                    out.push_str(" PUBLIC \"");
                    out.push_str(&data.public_identifier);
                    out.push('"');
                }
                if !data.system_identifier.is_empty() {
                    out.push_str(" \"");
                    out.push_str(&data.system_identifier);
                    out.push('"');
                }
                out.push('>');
            }
            NodeType::Declaration(data) => {
                out.push_str(if data.bang { "<!" } else { "<?" });
                out.push_str(&data.data);
                out.push('>');
            }
        }
        out.push('\n');
        for &child_id in self.children(id) {
            self.outline_into(child_id, indent + 1, out);
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for AncestorIterator<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Depth-first iterator over a node and its descendants in tree order.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    pending: Vec<NodeId>,
}

impl<'a> Iterator for DescendantIterator<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.pending.pop()?;
        // Children pushed in reverse so they are yielded in tree order.
        for &child in self.tree.children(id).iter().rev() {
            self.pending.push(child);
        }
        Some(id)
    }
}
