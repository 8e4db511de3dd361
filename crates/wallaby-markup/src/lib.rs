//! Lenient markup tokenizer and tree builder for the wallaby engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** - a pragmatic, pull-based lexer producing start/end
//!   tags with attributes, comments, bogus comments, doctypes, character
//!   runs, and end-of-input
//! - **Tree Builder** - a stack-based state machine turning the token
//!   stream into a [`wallaby_dom::DomTree`], tolerating malformed input
//!   (stray end tags, implicit closes, declaration recovery) the way
//!   real-world parsers must
//! - **Dialects** - one builder parameterized by an HTML/XML policy set
//!   instead of a builder per dialect
//!
//! # Not Yet Implemented
//!
//! - Character reference (entity) decoding
//! - RCDATA / RAWTEXT / script-data tokenization
//! - CDATA sections
//! - Encoding detection (input is already-decoded `&str`)
//!
//! # Examples
//!
//! ```
//! use wallaby_markup::{parse_document, Dialect};
//!
//! let result = parse_document("<ul><li>one<li>two</ul>", None, Dialect::Html);
//! assert!(result.issues.is_empty());
//! println!("{}", result.tree.outline(result.tree.root()));
//! ```

pub mod dialect;
pub mod errors;
pub mod token;
pub mod tokenizer;
pub mod tree_builder;

pub use dialect::Dialect;
pub use errors::{DEFAULT_ISSUE_CAPACITY, IssueKind, ParseErrorList, ParseIssue};
pub use token::Token;
pub use tokenizer::{TokenSource, Tokenizer};
pub use tree_builder::{FragmentResult, OpenElementStack, ParseResult, TreeBuilder};

use wallaby_dom::NodeId;

/// Parse a full document from a string.
///
/// `base_uri`, when given, is inherited by every element and used later
/// for relative-URL resolution (form actions in particular).
#[must_use]
pub fn parse_document(input: &str, base_uri: Option<&str>, dialect: Dialect) -> ParseResult {
    builder_for(input, base_uri, dialect).run()
}

/// Parse a markup snippet as a fragment.
///
/// The snippet's nodes accumulate under a detached root and are handed
/// back directly; no fresh document is wrapped around them.
///
/// ```
/// use wallaby_markup::{parse_fragment, Dialect};
///
/// let fragment = parse_fragment("<li>one<li>two", None, Dialect::Html);
/// assert_eq!(fragment.nodes.len(), 2);
/// ```
#[must_use]
pub fn parse_fragment(input: &str, base_uri: Option<&str>, dialect: Dialect) -> FragmentResult {
    let ParseResult { tree, issues } = builder_for(input, base_uri, dialect).run();
    let nodes = tree.children(NodeId::ROOT).to_vec();
    FragmentResult {
        tree,
        nodes,
        issues,
    }
}

/// Parse a markup snippet as a fragment under a synthetic context
/// element.
///
/// The context element (say, the `ul` a list-item snippet would sit
/// inside) is seeded onto the stack before parsing; the fragment's nodes
/// are its children.
#[must_use]
pub fn parse_fragment_in(
    input: &str,
    context: &str,
    base_uri: Option<&str>,
    dialect: Dialect,
) -> FragmentResult {
    let builder = builder_for(input, base_uri, dialect).with_fragment_context(context);
    let context_id = builder.fragment_context().unwrap_or(NodeId::ROOT);
    let ParseResult { tree, issues } = builder.run();
    let nodes = tree.children(context_id).to_vec();
    FragmentResult {
        tree,
        nodes,
        issues,
    }
}

/// Wire the built-in tokenizer to a fresh builder.
fn builder_for(input: &str, base_uri: Option<&str>, dialect: Dialect) -> TreeBuilder<Tokenizer> {
    let builder = TreeBuilder::new(Tokenizer::new(input, dialect), dialect);
    match base_uri {
        Some(base) => builder.with_base_uri(base),
        None => builder,
    }
}
