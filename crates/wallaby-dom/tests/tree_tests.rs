//! Tests for the arena tree: insertion, traversal, and rendering.

use wallaby_dom::{DomTree, ElementData, NodeId, NodeType, Tag};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(Tag::resolve(tag))))
}

#[test]
fn test_new_tree_has_document_root() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    let root = tree.get(NodeId::ROOT).expect("root node");
    assert!(matches!(root.node_type, NodeType::Document));
    assert_eq!(tree.parent(NodeId::ROOT), None);
}

#[test]
fn test_append_child_sets_relationships() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, div);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(div, a);
    tree.append_child(div, b);

    assert_eq!(tree.children(div), &[a, b]);
    assert_eq!(tree.parent(a), Some(div));
    assert_eq!(tree.parent(b), Some(div));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.first_child(div), Some(a));
    assert_eq!(tree.last_child(div), Some(b));
}

#[test]
fn test_ancestors_walk_to_root() {
    let mut tree = DomTree::new();
    let outer = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, outer);
    let inner = alloc_element(&mut tree, "span");
    tree.append_child(outer, inner);

    let chain: Vec<NodeId> = tree.ancestors(inner).collect();
    assert_eq!(chain, vec![outer, NodeId::ROOT]);
    assert!(tree.is_descendant_of(inner, NodeId::ROOT));
    assert!(!tree.is_descendant_of(outer, inner));
}

#[test]
fn test_descendants_are_in_tree_order() {
    let mut tree = DomTree::new();
    let ul = alloc_element(&mut tree, "ul");
    tree.append_child(NodeId::ROOT, ul);
    let li1 = alloc_element(&mut tree, "li");
    let li2 = alloc_element(&mut tree, "li");
    tree.append_child(ul, li1);
    tree.append_child(ul, li2);
    let text = tree.alloc(NodeType::Text("one".to_string()));
    tree.append_child(li1, text);

    let order: Vec<NodeId> = tree.descendants(ul).collect();
    assert_eq!(order, vec![ul, li1, text, li2]);
}

#[test]
fn test_text_concatenates_descendants() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, p);
    let hello = tree.alloc(NodeType::Text("Hello ".to_string()));
    tree.append_child(p, hello);
    let em = alloc_element(&mut tree, "em");
    tree.append_child(p, em);
    let world = tree.alloc(NodeType::Text("world".to_string()));
    tree.append_child(em, world);

    assert_eq!(tree.text(p), "Hello world");
    assert_eq!(tree.as_text(hello), Some("Hello "));
    assert_eq!(tree.as_text(em), None);
}

#[test]
fn test_outline_renders_structure() {
    let mut tree = DomTree::new();
    let div = tree.alloc(NodeType::Element({
        let mut data = ElementData::new(Tag::resolve("div"));
        assert!(data.attrs.insert("id".to_string(), "main".to_string()));
        data
    }));
    tree.append_child(NodeId::ROOT, div);
    let text = tree.alloc(NodeType::Text("hi".to_string()));
    tree.append_child(div, text);

    let outline = tree.outline(NodeId::ROOT);
    assert_eq!(outline, "Document\n  <div id=\"main\">\n    \"hi\"\n");
}

#[test]
fn test_base_uri_recorded_on_tree() {
    let tree = DomTree::with_base_uri("https://example.com/dir/page.html");
    assert_eq!(tree.base_uri(), Some("https://example.com/dir/page.html"));
    assert_eq!(DomTree::new().base_uri(), None);
}

#[test]
fn test_element_abs_url_resolves_against_base() {
    let mut data = ElementData::new(Tag::resolve("a"));
    assert!(data.attrs.insert("href".to_string(), "login".to_string()));
    data.base_uri = Some("https://example.com/account/".to_string());
    assert_eq!(
        data.abs_url("href"),
        Some("https://example.com/account/login".to_string())
    );

    // Relative URL with no base cannot be resolved.
    data.base_uri = None;
    assert_eq!(data.abs_url("href"), None);
}
