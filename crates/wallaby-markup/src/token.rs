//! Token model shared by the tokenizer and the tree builder.

use wallaby_dom::Attributes;

/// One lexical unit emitted by the tokenizer.
///
/// The tokenizer emits tokens of these kinds to the tree construction
/// stage: doctype, start tag, end tag, comment, character run, and
/// end-of-input. The union is closed and the tree builder matches it
/// exhaustively, so there is no representable "unexpected token kind".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A `<!DOCTYPE ...>` token with its name and identifiers.
    Doctype {
        /// The doctype name (`html` for `<!DOCTYPE html>`).
        name: String,
        /// The public identifier, empty when absent.
        public_identifier: String,
        /// The system identifier, empty when absent.
        system_identifier: String,
    },

    /// An opening tag with its attribute list.
    StartTag {
        /// Tag name, case-folded per the tokenizer's dialect.
        name: String,
        /// Attribute container, materialized by the tokenizer and passed
        /// through to the element opaquely.
        attributes: Attributes,
        /// True when the tag carried a trailing `/` (`<br/>`). The tree
        /// builder must acknowledge this flag back to the tokenizer.
        self_closing: bool,
    },

    /// A closing tag. Attributes on end tags are discarded by the
    /// tokenizer.
    EndTag {
        /// Tag name, case-folded per the tokenizer's dialect.
        name: String,
    },

    /// A comment, or a comment-shaped recovery for malformed markup.
    Comment {
        /// Comment text. For bogus comments the data keeps the leading
        /// `!` or `?` marker so the tree builder can re-materialize a
        /// declaration in dialects that parse them.
        data: String,
        /// True when this token was manufactured from markup that only
        /// masquerades as a comment (`<!...>`, `<?...>`).
        bogus: bool,
    },

    /// A run of character data. Adjacent runs are not merged by the
    /// tokenizer or the tree builder.
    Character {
        /// The text of the run, unmodified.
        data: String,
    },

    /// End of input; terminates the tree builder's run loop.
    EndOfFile,
}
