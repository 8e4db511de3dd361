//! Form-control association and submission-data derivation.
//!
//! During an HTML-dialect parse the tree builder registers each
//! form-listed control against the innermost open `form` element. The
//! association is kept on the tree as non-owning `NodeId` back-references;
//! the controls themselves stay owned by the tree through the normal
//! parent/child links.
//!
//! [`DomTree::form_data`] is a read-only projection over that association:
//! it derives the key/value list the form would submit, reflecting the
//! attached/selected state at call time. [`DomTree::form_submission`]
//! additionally resolves the action URL and method; the HTTP request
//! itself is out of scope for this engine.

use crate::{DomTree, ElementData, NodeId};

/// One key/value pair of a form submission data set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyVal {
    /// The control's `name` attribute.
    pub name: String,
    /// The control's resolved value.
    pub value: String,
}

impl KeyVal {
    /// Create a key/value pair.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// [§ 4.10.18.6 Form submission attributes](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#attr-fs-method)
///
/// The submission method selected by the form's `method` attribute.
/// Anything other than a case-insensitive `post` selects GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMethod {
    /// HTTP GET (the default).
    Get,
    /// HTTP POST.
    Post,
}

/// A prepared form submission: absolute action URL, method, and data set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    /// Absolute action URL the form would submit to.
    pub action: String,
    /// Submission method.
    pub method: SubmitMethod,
    /// Submission data set, in tree order.
    pub data: Vec<KeyVal>,
}

/// Contract violations raised when preparing a form submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The node passed in is not a `form` element.
    #[error("node is not a form element")]
    NotAForm,
    /// No absolute action URL could be determined. The form had no usable
    /// `action` attribute and the parse was run without a base URI.
    #[error("could not determine the form action URL; set a base URI when parsing")]
    NoActionUrl,
}

impl DomTree {
    /// Register `control` as associated with `form`.
    ///
    /// Called by the tree builder at insertion time; the association is a
    /// non-owning back-reference and insertion order is tree order.
    pub fn associate_form_control(&mut self, form: NodeId, control: NodeId) {
        self.form_controls.entry(form).or_default().push(control);
    }

    /// The controls associated with `form`, in tree order.
    #[must_use]
    pub fn form_controls(&self, form: NodeId) -> &[NodeId] {
        self.form_controls
            .get(&form)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Derive the submission data set for `form`.
    ///
    /// Iterates the associated controls in tree order; skips controls that
    /// are not submittable or have no `name`; a `select` contributes one
    /// pair per currently selected `option` descendant, every other
    /// control contributes its resolved value. The projection never
    /// mutates the tree and reflects the state at call time.
    #[must_use]
    pub fn form_data(&self, form: NodeId) -> Vec<KeyVal> {
        let mut data = Vec::new();
        for &control in self.form_controls(form) {
            let Some(el) = self.as_element(control) else {
                continue;
            };
            if !el.tag.is_form_submittable() {
                continue;
            }
            let Some(name) = el.attr("name").filter(|n| !n.is_empty()) else {
                continue;
            };

            if el.name() == "select" {
                for option in self.selected_options(control) {
                    data.push(KeyVal::new(name.to_string(), self.option_value(option)));
                }
            } else {
                data.push(KeyVal::new(name.to_string(), self.control_value(control)));
            }
        }
        data
    }

    /// Prepare a submission for `form`: absolute action URL, method, and
    /// the derived data set.
    ///
    /// # Errors
    ///
    /// [`SubmitError::NotAForm`] when `form` is not a form element;
    /// [`SubmitError::NoActionUrl`] when no absolute action URL can be
    /// determined (relative or missing `action` with no base URI).
    pub fn form_submission(&self, form: NodeId) -> Result<FormSubmission, SubmitError> {
        let el = self
            .as_element(form)
            .filter(|el| el.name() == "form")
            .ok_or(SubmitError::NotAForm)?;

        let action = if el.attr("action").is_some_and(|a| !a.is_empty()) {
            el.abs_url("action")
        } else {
            el.base_uri.clone()
        };
        let action = action
            .filter(|a| !a.is_empty())
            .ok_or(SubmitError::NoActionUrl)?;

        let method = if el
            .attr("method")
            .is_some_and(|m| m.eq_ignore_ascii_case("post"))
        {
            SubmitMethod::Post
        } else {
            SubmitMethod::Get
        };

        Ok(FormSubmission {
            action,
            method,
            data: self.form_data(form),
        })
    }

    /// The currently selected `option` descendants of a `select`, in tree
    /// order. Selectedness is the presence of the `selected` attribute.
    fn selected_options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .filter(|&id| {
                self.as_element(id)
                    .is_some_and(|el| el.name() == "option" && el.attrs.contains("selected"))
            })
            .collect()
    }

    /// An option's submission value: its `value` attribute, falling back
    /// to its text content.
    fn option_value(&self, option: NodeId) -> String {
        match self.as_element(option).and_then(|el| el.attr("value")) {
            Some(value) => value.to_string(),
            None => self.text(option),
        }
    }

    /// A non-select control's resolved value: descendant text for
    /// `textarea`, otherwise the `value` attribute (empty when absent).
    fn control_value(&self, control: NodeId) -> String {
        let value_attr = |el: &ElementData| el.attr("value").unwrap_or("").to_string();
        match self.as_element(control) {
            Some(el) if el.name() == "textarea" => self.text(control),
            Some(el) => value_attr(el),
            None => String::new(),
        }
    }
}
