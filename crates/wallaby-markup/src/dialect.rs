//! Dialect policy for the tree builder and tokenizer.
//!
//! HTML-flavored and XML-flavored parsing share one tree builder; the few
//! places where they genuinely differ are expressed as this capability
//! set rather than as a builder-per-dialect hierarchy.

use strum_macros::Display;

use wallaby_dom::Tag;

/// The markup dialect being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Dialect {
    /// Lenient HTML: tag and attribute names fold to ASCII lowercase,
    /// void and self-nesting tag rules apply, bogus comments stay
    /// comments.
    Html,
    /// Lenient XML: case is preserved, the document root sits on the
    /// open-element stack, and bogus comments that encode declarations
    /// are re-materialized as declaration nodes.
    Xml,
}

impl Dialect {
    /// Whether the document root is pushed onto the open-element stack at
    /// the start of a parse.
    #[must_use]
    pub const fn keeps_root_on_stack(self) -> bool {
        matches!(self, Self::Xml)
    }

    /// Whether bogus comments whose data starts with `!` or `?` are
    /// re-materialized as declaration nodes instead of literal comments.
    #[must_use]
    pub const fn reinterprets_bogus_comments(self) -> bool {
        matches!(self, Self::Xml)
    }

    /// Whether tag and attribute names fold to ASCII lowercase.
    #[must_use]
    pub const fn folds_names(self) -> bool {
        matches!(self, Self::Html)
    }

    /// Whether a start tag for `tag` implicitly closes an already-open
    /// element of the same name (`<li>one<li>two` as siblings).
    #[must_use]
    pub fn implicitly_closes_siblings(self, tag: &Tag) -> bool {
        matches!(self, Self::Html) && tag.closes_same_name()
    }

    /// Whether form-listed controls are associated with the innermost
    /// open `form` element during the parse.
    #[must_use]
    pub const fn associates_form_controls(self) -> bool {
        matches!(self, Self::Html)
    }

    /// Fold a tag or attribute name according to this dialect's case
    /// rules.
    #[must_use]
    pub fn fold_name(self, name: &str) -> String {
        if self.folds_names() {
            name.to_ascii_lowercase()
        } else {
            name.to_string()
        }
    }
}
