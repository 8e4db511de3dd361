//! Tag descriptors and the known-tag table.
//!
//! A [`Tag`] records the capability flags the tree builder and the form
//! layer dispatch on: whether the name is a known tag, whether it is void
//! (self-closing), whether it participates in form submission, and whether
//! a new start tag of the same name implicitly closes an open one.
//!
//! Lookup is by exact name; case folding is the caller's concern (the HTML
//! dialect folds tag names to ASCII lowercase before resolving, XML
//! preserves case, so `<BR/>` in XML resolves to an unknown tag).

/// Tag names the engine knows about, with their structural roles.
///
/// A trimmed-down version of the HTML element list; anything not listed
/// resolves to an unknown tag with no capabilities.
const KNOWN_TAGS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col", "colgroup",
    "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt", "em", "embed",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins", "kbd", "label",
    "legend", "li", "link", "main", "map", "mark", "menu", "meta", "meter", "nav", "noscript",
    "object", "ol", "optgroup", "option", "output", "p", "param", "picture", "pre", "progress",
    "q", "rp", "rt", "ruby", "s", "samp", "script", "section", "select", "slot", "small", "source",
    "span", "strong", "style", "sub", "summary", "sup", "table", "tbody", "td", "template",
    "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "u", "ul", "var", "video",
    "wbr",
];

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements only have a start tag; end tags must not be specified
/// for void elements."
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// [§ 4.10.2 Categories](https://html.spec.whatwg.org/multipage/forms.html#categories)
///
/// "Listed elements" - denotes elements that are associated with a form
/// element.
const FORM_LISTED_TAGS: &[&str] = &[
    "button", "fieldset", "input", "object", "output", "select", "textarea",
];

/// [§ 4.10.2 Categories](https://html.spec.whatwg.org/multipage/forms.html#categories)
///
/// "Submittable elements" - denotes elements that can be used for
/// constructing the entry list when a form element is submitted.
const FORM_SUBMITTABLE_TAGS: &[&str] = &["button", "input", "object", "select", "textarea"];

/// Tags that cannot nest inside themselves: a new start tag implicitly
/// closes an already-open element of the same name (`<li>one<li>two` is
/// two siblings, not a nested pair). Applied by the HTML dialect only.
const CLOSES_SAME_NAME_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// A tag descriptor: a name plus the capability flags the builder and the
/// form layer dispatch on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    known: bool,
    self_closing: bool,
    form_listed: bool,
    form_submittable: bool,
    closes_same_name: bool,
}

impl Tag {
    /// Resolve a tag descriptor by exact name.
    ///
    /// Known names get their table capabilities; unknown names get a
    /// descriptor with every capability off (the builder may later mark
    /// an unknown tag self-closing when the input declared it so).
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        let known = KNOWN_TAGS.contains(&name);
        Self {
            name: name.to_string(),
            known,
            self_closing: known && VOID_TAGS.contains(&name),
            form_listed: known && FORM_LISTED_TAGS.contains(&name),
            form_submittable: known && FORM_SUBMITTABLE_TAGS.contains(&name),
            closes_same_name: known && CLOSES_SAME_NAME_TAGS.contains(&name),
        }
    }

    /// The tag name, as resolved.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when the name is in the known-tag table.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.known
    }

    /// True for void tags and for unknown tags marked self-closing.
    #[must_use]
    pub fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    /// True when the element associates with an enclosing form.
    #[must_use]
    pub fn is_form_listed(&self) -> bool {
        self.form_listed
    }

    /// True when the element can contribute to a form's submission data.
    #[must_use]
    pub fn is_form_submittable(&self) -> bool {
        self.form_submittable
    }

    /// True when a new start tag of this name implicitly closes an open
    /// element of the same name.
    #[must_use]
    pub fn closes_same_name(&self) -> bool {
        self.closes_same_name
    }

    /// Mark this tag self-closing.
    ///
    /// Used for unknown tags whose start token carried the self-closing
    /// flag, so a later end tag with the same name does not misfire.
    pub fn set_self_closing(&mut self) {
        self.self_closing = true;
    }
}

#[cfg(test)]
mod tests {
    use super::Tag;

    #[test]
    fn known_void_tag() {
        let tag = Tag::resolve("br");
        assert!(tag.is_known());
        assert!(tag.is_self_closing());
        assert!(!tag.is_form_submittable());
    }

    #[test]
    fn unknown_tag_has_no_capabilities() {
        let tag = Tag::resolve("custom-widget");
        assert!(!tag.is_known());
        assert!(!tag.is_self_closing());
        assert!(!tag.is_form_listed());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(Tag::resolve("div").is_known());
        assert!(!Tag::resolve("DIV").is_known());
    }

    #[test]
    fn unknown_tag_can_be_marked_self_closing() {
        let mut tag = Tag::resolve("widget");
        assert!(!tag.is_self_closing());
        tag.set_self_closing();
        assert!(tag.is_self_closing());
    }

    #[test]
    fn submittable_implies_listed() {
        for name in ["button", "input", "object", "select", "textarea"] {
            let tag = Tag::resolve(name);
            assert!(tag.is_form_submittable());
            assert!(tag.is_form_listed());
        }
        let fieldset = Tag::resolve("fieldset");
        assert!(fieldset.is_form_listed());
        assert!(!fieldset.is_form_submittable());
    }
}
