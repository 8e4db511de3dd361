//! The tree builder: token dispatch and tree construction.
//!
//! Consumes tokens one at a time from a [`TokenSource`], mutating the
//! arena tree and the stack of open elements. Malformed structure never
//! aborts a parse: stray end tags are ignored, bogus comments are
//! recovered, and whatever tree has been built so far is always
//! well-formed and inspectable — a caller may stop stepping at any point
//! and keep the partial result.
//!
//! The builder is single-owner, single-threaded state created fresh per
//! parse. Independent parses share nothing and may run on separate
//! threads without coordination.

use wallaby_common::warning::warn_once;
use wallaby_dom::{
    Attributes, DeclarationData, DoctypeData, DomTree, ElementData, NodeId, NodeType, Tag,
};

use crate::dialect::Dialect;
use crate::errors::{IssueKind, ParseErrorList, ParseIssue};
use crate::token::Token;
use crate::tokenizer::TokenSource;

mod stack;

pub use stack::OpenElementStack;

/// Stack name for the document root in dialects that keep it on the
/// stack. Never collides with a tag name (tag names cannot contain `#`).
const DOCUMENT_STACK_NAME: &str = "#document";

/// A completed document parse: the tree plus the recorded issues.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The node tree; the document is at [`NodeId::ROOT`].
    pub tree: DomTree,
    /// Recoverable anomalies observed during the parse, in order.
    pub issues: ParseErrorList,
}

/// A completed fragment parse.
///
/// The fragment's nodes accumulate under a detached root; `nodes` lists
/// them in order rather than wrapping them in a fresh document of their
/// own.
#[derive(Debug, Clone)]
pub struct FragmentResult {
    /// The tree holding the fragment's nodes.
    pub tree: DomTree,
    /// The top-level nodes of the fragment, in insertion order.
    pub nodes: Vec<NodeId>,
    /// Recoverable anomalies observed during the parse, in order.
    pub issues: ParseErrorList,
}

/// The tree construction state machine.
///
/// A builder is created fresh per parse (construction is the
/// initialization step: fresh tree, fresh stack — with the document root
/// on it for dialects that keep it there — and a fresh issue list).
/// Driving it is either one [`TreeBuilder::run`] call, or repeated
/// [`TreeBuilder::step`] calls with an early [`TreeBuilder::finish`] for
/// callers that want to stop before end-of-input.
pub struct TreeBuilder<S: TokenSource> {
    source: S,
    dialect: Dialect,
    tree: DomTree,
    stack: OpenElementStack,
    base_uri: Option<String>,
    issues: ParseErrorList,
    /// The innermost open `form` element, when the dialect associates
    /// form controls.
    form_element: Option<NodeId>,
    /// The synthetic context element of a fragment parse, if any.
    fragment_context: Option<NodeId>,
    stopped: bool,
}

impl<S: TokenSource> TreeBuilder<S> {
    /// Create a builder over a token source.
    #[must_use]
    pub fn new(source: S, dialect: Dialect) -> Self {
        let mut stack = OpenElementStack::new();
        if dialect.keeps_root_on_stack() {
            stack.push(NodeId::ROOT, DOCUMENT_STACK_NAME);
        }
        Self {
            source,
            dialect,
            tree: DomTree::new(),
            stack,
            base_uri: None,
            issues: ParseErrorList::default(),
            form_element: None,
            fragment_context: None,
            stopped: false,
        }
    }

    /// Set the base URI elements inherit at insertion time.
    #[must_use]
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        let base = base_uri.into();
        self.tree.set_base_uri(base.clone());
        self.base_uri = Some(base);
        self
    }

    /// Seed the stack with a synthetic context element for a fragment
    /// parse. Subsequent nodes accumulate under the context rather than
    /// the document root, and the same dispatch rules apply unchanged.
    #[must_use]
    pub fn with_fragment_context(mut self, name: &str) -> Self {
        let tag = Tag::resolve(&self.dialect.fold_name(name));
        let tag_name = tag.name().to_string();
        let id = self.tree.alloc(NodeType::Element(ElementData {
            tag,
            attrs: Attributes::new(),
            base_uri: self.base_uri.clone(),
        }));
        self.tree.append_child(NodeId::ROOT, id);
        self.stack.push(id, tag_name);
        self.fragment_context = Some(id);
        self
    }

    /// The synthetic context element seeded by
    /// [`TreeBuilder::with_fragment_context`], if any.
    #[must_use]
    pub fn fragment_context(&self) -> Option<NodeId> {
        self.fragment_context
    }

    /// Set how many recoverable issues are recorded (zero disables
    /// tracking).
    #[must_use]
    pub fn with_issue_capacity(mut self, capacity: usize) -> Self {
        self.issues = ParseErrorList::tracking(capacity);
        self
    }

    /// The tree built so far.
    #[must_use]
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The stack of open elements, for diagnostics.
    #[must_use]
    pub fn stack(&self) -> &OpenElementStack {
        &self.stack
    }

    /// The issues recorded so far.
    #[must_use]
    pub fn issues(&self) -> &ParseErrorList {
        &self.issues
    }

    /// Pull and process one token. Returns false once end-of-input has
    /// been observed.
    pub fn step(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        let token = self.source.next_token();
        for issue in self.source.drain_issues() {
            self.issues.push(issue);
        }
        let _ = self.process(token);
        !self.stopped
    }

    /// Pull and process tokens until end-of-input, then hand back the
    /// completed tree and issue list.
    #[must_use]
    pub fn run(mut self) -> ParseResult {
        while self.step() {}
        self.finish()
    }

    /// Hand back whatever has been built. The partial tree of an
    /// early-terminated parse is well-formed; unclosed elements simply
    /// keep their children.
    #[must_use]
    pub fn finish(self) -> ParseResult {
        ParseResult {
            tree: self.tree,
            issues: self.issues,
        }
    }

    /// Dispatch one token.
    ///
    /// Returns whether parsing should continue. Currently always true —
    /// the token union is closed, so every kind has defined handling; the
    /// signal is reserved for producers that can stop mid-stream.
    pub fn process(&mut self, token: Token) -> bool {
        match token {
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => self.insert_element(&name, attributes, self_closing),
            Token::EndTag { name } => self.close_element(&name),
            Token::Comment { data, bogus } => self.insert_comment(data, bogus),
            Token::Character { data } => self.insert_text(data),
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
            } => self.insert_doctype(name, public_identifier, system_identifier),
            Token::EndOfFile => self.stopped = true,
        }
        true
    }

    /// Append `node_type` as a child of the current insertion target.
    fn insert_node(&mut self, node_type: NodeType) -> NodeId {
        let id = self.tree.alloc(node_type);
        self.tree.append_child(self.stack.current(), id);
        id
    }

    fn insert_element(&mut self, name: &str, attributes: Attributes, self_closing: bool) {
        let mut tag = Tag::resolve(name);

        // A self-nesting-averse tag (li, p, td, option, ...) closes an
        // identical open element before inserting the new one.
        if self.dialect.implicitly_closes_siblings(&tag)
            && self.stack.current_name() == Some(tag.name())
        {
            let _ = self.stack.pop();
        }

        if self_closing {
            self.source.acknowledge_self_closing();
            if !tag.is_known() {
                // Unknown self-closing tags stay self-closing so a later
                // end tag with the same name does not misfire.
                tag.set_self_closing();
            }
        }
        // Flagged in the token, or declared void by the tag table: either
        // way the element takes no children and never goes on the stack.
        let push = !(self_closing || tag.is_self_closing());

        let tag_name = tag.name().to_string();
        let is_form = tag_name == "form";
        let form_listed = tag.is_form_listed();

        let id = self.insert_node(NodeType::Element(ElementData {
            tag,
            attrs: attributes,
            base_uri: self.base_uri.clone(),
        }));

        if self.dialect.associates_form_controls() {
            if form_listed && let Some(form) = self.form_element {
                self.tree.associate_form_control(form, id);
            }
            if is_form && push {
                self.form_element = Some(id);
            }
        }

        if push {
            self.stack.push(id, tag_name);
        }
    }

    /// Pop-to-close for an end tag. A miss is the defined recovery for
    /// stray close tags: recorded, no tree or stack mutation.
    fn close_element(&mut self, name: &str) {
        match self.stack.pop_to_close(name) {
            Some(_) => {
                if self
                    .form_element
                    .is_some_and(|form| !self.stack.snapshot().contains(&form))
                {
                    self.form_element = None;
                }
            }
            None => {
                self.report(
                    IssueKind::StrayEndTag,
                    format!("stray end tag </{name}> has no matching open element"),
                );
            }
        }
    }

    fn insert_comment(&mut self, data: String, bogus: bool) {
        // Dialects with real declarations re-materialize bogus comments
        // that carry a `!`/`?` marker; everything else stays a comment.
        let node_type = if bogus
            && self.dialect.reinterprets_bogus_comments()
            && data.len() > 1
            && (data.starts_with('!') || data.starts_with('?'))
        {
            let bang = data.starts_with('!');
            NodeType::Declaration(DeclarationData {
                data: data[1..].to_string(),
                bang,
            })
        } else {
            NodeType::Comment(data)
        };
        let _ = self.insert_node(node_type);
    }

    fn insert_text(&mut self, data: String) {
        let _ = self.insert_node(NodeType::Text(data));
    }

    fn insert_doctype(&mut self, name: String, public_identifier: String, system_identifier: String) {
        let _ = self.insert_node(NodeType::Doctype(DoctypeData {
            name,
            public_identifier,
            system_identifier,
        }));
    }

    fn report(&mut self, kind: IssueKind, message: String) {
        warn_once("TreeBuilder", &message);
        self.issues
            .push(ParseIssue::new(kind, self.source.position(), message));
    }
}
