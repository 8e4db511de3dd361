//! The stack of open elements.
//!
//! An ordered sequence of non-owning references into the tree (the tree
//! itself owns every node), outermost first, tracking the current
//! insertion ancestry. Each entry caches the element's tag name so stack
//! scans never need the tree.

use wallaby_dom::NodeId;

/// One stack entry: a node handle plus its cached tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StackEntry {
    id: NodeId,
    name: String,
}

/// The stack of open elements.
///
/// All mutation is last-in-first-out, except [`OpenElementStack::pop_to_close`],
/// which is the one operation allowed to remove more than the top entry in
/// a single call — and performs no mutation at all when the target is not
/// found.
#[derive(Debug, Clone, Default)]
pub struct OpenElementStack {
    entries: Vec<StackEntry>,
}

impl OpenElementStack {
    /// Create an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Push an element (or, for dialects that keep it there, the document
    /// root) as the new current insertion target.
    pub fn push(&mut self, id: NodeId, name: impl Into<String>) {
        self.entries.push(StackEntry {
            id,
            name: name.into(),
        });
    }

    /// The current insertion target: the top of the stack, or the
    /// document root when the stack is empty.
    #[must_use]
    pub fn current(&self) -> NodeId {
        self.entries.last().map_or(NodeId::ROOT, |entry| entry.id)
    }

    /// Tag name of the top entry, if any.
    #[must_use]
    pub fn current_name(&self) -> Option<&str> {
        self.entries.last().map(|entry| entry.name.as_str())
    }

    /// Pop the top entry.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.entries.pop().map(|entry| entry.id)
    }

    /// Close the nearest open element with this name.
    ///
    /// Scans from the top down for the first entry whose name equals
    /// `name`; removes it and every entry above it (implicitly closing
    /// the intervening unclosed elements) and returns its id. When no
    /// entry matches, the stack is left untouched and `None` is returned.
    ///
    /// Two-phase on purpose: locate the match index first, then truncate
    /// in one operation, so no partial state is ever observable.
    pub fn pop_to_close(&mut self, name: &str) -> Option<NodeId> {
        let index = self
            .entries
            .iter()
            .rposition(|entry| entry.name == name)?;
        let matched = self.entries[index].id;
        self.entries.truncate(index);
        Some(matched)
    }

    /// True when an entry with this name is open, scanning innermost
    /// first.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().rev().any(|entry| entry.name == name)
    }

    /// A read-only copy of the stack for diagnostics, outermost first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<NodeId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    /// Number of open entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::OpenElementStack;
    use wallaby_dom::NodeId;

    #[test]
    fn current_falls_back_to_root() {
        let mut stack = OpenElementStack::new();
        assert_eq!(stack.current(), NodeId::ROOT);
        stack.push(NodeId(1), "a");
        stack.push(NodeId(2), "b");
        assert_eq!(stack.current(), NodeId(2));
        assert_eq!(stack.current_name(), Some("b"));
    }

    #[test]
    fn pop_to_close_removes_through_match() {
        let mut stack = OpenElementStack::new();
        stack.push(NodeId(1), "a");
        stack.push(NodeId(2), "b");
        stack.push(NodeId(3), "c");

        assert_eq!(stack.pop_to_close("a"), Some(NodeId(1)));
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_to_close_prefers_innermost_match() {
        let mut stack = OpenElementStack::new();
        stack.push(NodeId(1), "a");
        stack.push(NodeId(2), "a");
        stack.push(NodeId(3), "b");

        assert_eq!(stack.pop_to_close("a"), Some(NodeId(2)));
        assert_eq!(stack.snapshot(), vec![NodeId(1)]);
    }

    #[test]
    fn pop_to_close_miss_leaves_stack_untouched() {
        let mut stack = OpenElementStack::new();
        stack.push(NodeId(1), "a");
        stack.push(NodeId(2), "b");

        assert_eq!(stack.pop_to_close("nope"), None);
        assert_eq!(stack.snapshot(), vec![NodeId(1), NodeId(2)]);
        assert!(stack.contains("a"));
        assert!(!stack.contains("nope"));
    }
}
