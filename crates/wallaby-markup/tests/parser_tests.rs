//! Integration tests for the tree builder.

use wallaby_dom::{DomTree, NodeId, NodeType};
use wallaby_markup::{
    Dialect, IssueKind, ParseIssue, Token, TokenSource, Tokenizer, TreeBuilder, parse_document,
    parse_fragment, parse_fragment_in,
};

/// Helper to parse HTML and return the tree.
fn parse(input: &str) -> DomTree {
    parse_document(input, None, Dialect::Html).tree
}

/// Helper to get an element by tag name (first match, depth-first).
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    tree.descendants(from)
        .find(|&id| tree.as_element(id).is_some_and(|el| el.name() == tag))
}

/// Helper to list the element-children tag names of a node.
fn child_names(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.as_element(child).map(|el| el.name().to_string()))
        .collect()
}

/// A hand-rolled token source, for driving the builder without the
/// tokenizer.
struct VecSource {
    tokens: std::vec::IntoIter<Token>,
}

impl VecSource {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
        }
    }
}

impl TokenSource for VecSource {
    fn next_token(&mut self) -> Token {
        self.tokens.next().unwrap_or(Token::EndOfFile)
    }

    fn acknowledge_self_closing(&mut self) {
        // Nothing to report back to; the token list is already fixed.
    }

    fn position(&self) -> usize {
        0
    }

    fn drain_issues(&mut self) -> Vec<ParseIssue> {
        Vec::new()
    }
}

#[test]
fn test_well_formed_nesting_mirrors_tags() {
    let mut builder = TreeBuilder::new(
        Tokenizer::new("<a><b><c>text</c></b></a>", Dialect::Html),
        Dialect::Html,
    );
    while builder.step() {}

    // Every start tag was matched, so nothing is left open.
    assert!(builder.stack().is_empty());
    assert!(builder.issues().is_empty());

    let result = builder.finish();
    assert_eq!(
        result.tree.outline(result.tree.root()),
        "Document\n  <a>\n    <b>\n      <c>\n        \"text\"\n"
    );
}

#[test]
fn test_stray_end_tag_is_ignored() {
    let result = parse_document("<a><b></c></a>", None, Dialect::Html);

    // The </c> has no match: no tree mutation, no stack change; <b> stays
    // open until </a> closes it, still a child of <a>.
    assert_eq!(
        result.tree.outline(result.tree.root()),
        "Document\n  <a>\n    <b>\n"
    );
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues.as_slice()[0].kind, IssueKind::StrayEndTag);
}

#[test]
fn test_implicit_multi_close() {
    let mut builder = TreeBuilder::new(
        Tokenizer::new("<a><b><c>text</a>", Dialect::Html),
        Dialect::Html,
    );
    while builder.step() {}
    // </a> popped c and b implicitly.
    assert!(builder.stack().is_empty());

    let tree = builder.finish().tree;
    let c = find_element(&tree, NodeId::ROOT, "c").expect("c element");
    assert_eq!(tree.text(c), "text");
    // Ancestry is still root -> a -> b -> c; implicit closing never
    // detaches descendants.
    let a = find_element(&tree, NodeId::ROOT, "a").expect("a element");
    let b = find_element(&tree, NodeId::ROOT, "b").expect("b element");
    assert_eq!(tree.parent(c), Some(b));
    assert_eq!(tree.parent(b), Some(a));
    assert_eq!(tree.parent(a), Some(NodeId::ROOT));
}

#[test]
fn test_self_closing_unknown_tag_takes_no_children() {
    let tree = parse("<div><widget/><span></span></div>");
    let div = find_element(&tree, NodeId::ROOT, "div").expect("div");

    // widget is childless and span attached to div, not to widget.
    assert_eq!(child_names(&tree, div), ["widget", "span"]);
    let widget = find_element(&tree, div, "widget").expect("widget");
    assert!(tree.children(widget).is_empty());
    let widget_el = tree.as_element(widget).expect("element");
    assert!(!widget_el.tag.is_known());
    assert!(widget_el.tag.is_self_closing());
}

#[test]
fn test_void_tag_without_slash_is_not_pushed() {
    let tree = parse("<p>one<br>two</p>");
    let p = find_element(&tree, NodeId::ROOT, "p").expect("p");
    let br = find_element(&tree, p, "br").expect("br");
    assert!(tree.children(br).is_empty());
    assert_eq!(tree.text(p), "onetwo");
}

#[test]
fn test_bogus_comment_becomes_declaration_in_xml() {
    // Feed the builder directly: a comment token flagged bogus, as a
    // tokenizer emits for markup that only masquerades as a comment.
    let source = VecSource::new(vec![
        Token::Comment {
            data: "!DOCTYPE html".to_string(),
            bogus: true,
        },
        Token::EndOfFile,
    ]);
    let result = TreeBuilder::new(source, Dialect::Xml).run();

    let root_children = result.tree.children(NodeId::ROOT);
    assert_eq!(root_children.len(), 1);
    let node = result.tree.get(root_children[0]).expect("node");
    let NodeType::Declaration(decl) = &node.node_type else {
        panic!("expected declaration, got {:?}", node.node_type);
    };
    // Leading marker stripped, flavor recorded.
    assert_eq!(decl.data, "DOCTYPE html");
    assert!(decl.bang);
}

#[test]
fn test_xml_declaration_end_to_end() {
    let result = parse_document(r#"<?xml version="1.0"?><doc/>"#, None, Dialect::Xml);
    let root_children = result.tree.children(NodeId::ROOT);
    assert_eq!(root_children.len(), 2);
    let NodeType::Declaration(decl) = &result.tree.get(root_children[0]).expect("node").node_type
    else {
        panic!("expected declaration");
    };
    assert!(decl.data.starts_with("xml"));
    assert!(!decl.bang);
}

#[test]
fn test_bogus_comment_stays_comment_in_html() {
    let tree = parse_document("<div><?php echo ?></div>", None, Dialect::Html).tree;
    let div = find_element(&tree, NodeId::ROOT, "div").expect("div");
    let children = tree.children(div);
    assert_eq!(children.len(), 1);
    let NodeType::Comment(data) = &tree.get(children[0]).expect("node").node_type else {
        panic!("expected comment");
    };
    assert_eq!(data, "?php echo ?");
}

#[test]
fn test_fragment_parse_returns_sibling_nodes() {
    let fragment = parse_fragment("<li>one<li>two", None, Dialect::Html);

    // Two li elements, non-nested, each holding one text child — never a
    // full document wrapper.
    assert_eq!(fragment.nodes.len(), 2);
    for (id, expected) in fragment.nodes.iter().zip(["one", "two"]) {
        let el = fragment.tree.as_element(*id).expect("element");
        assert_eq!(el.name(), "li");
        assert_eq!(fragment.tree.children(*id).len(), 1);
        assert_eq!(fragment.tree.text(*id), expected);
    }
}

#[test]
fn test_fragment_parse_with_context_element() {
    let fragment = parse_fragment_in("<li>one<li>two", "ul", None, Dialect::Html);

    // The li elements are children of the synthetic ul context.
    assert_eq!(fragment.nodes.len(), 2);
    let first = fragment.nodes[0];
    let parent = fragment.tree.parent(first).expect("parent");
    let context = fragment.tree.as_element(parent).expect("context element");
    assert_eq!(context.name(), "ul");
}

#[test]
fn test_form_association_and_data() {
    let input = concat!(
        r#"<form action="https://example.com/order">"#,
        r#"<select name="flavor">"#,
        r#"<option value="plain">plain"#,
        r#"<option value="fancy" selected>fancy"#,
        "</select>",
        r#"<input name="x" value="1">"#,
        "</form>",
    );
    let tree = parse(input);
    let form = find_element(&tree, NodeId::ROOT, "form").expect("form");

    // select and input associated in tree order; options are reached
    // through the select, not associated directly.
    assert_eq!(tree.form_controls(form).len(), 2);

    let data = tree.form_data(form);
    assert_eq!(data.len(), 2);
    assert_eq!((data[0].name.as_str(), data[0].value.as_str()), ("flavor", "fancy"));
    assert_eq!((data[1].name.as_str(), data[1].value.as_str()), ("x", "1"));

    let submission = tree.form_submission(form).expect("submission");
    assert_eq!(submission.action, "https://example.com/order");
}

#[test]
fn test_controls_outside_forms_are_not_associated() {
    let tree = parse(r#"<div><input name="stray"></div><form id="f"></form>"#);
    let form = find_element(&tree, NodeId::ROOT, "form").expect("form");
    assert!(tree.form_controls(form).is_empty());
    assert!(tree.form_data(form).is_empty());
}

#[test]
fn test_xml_keeps_document_on_stack() {
    let mut builder = TreeBuilder::new(
        Tokenizer::new("<doc><item/></doc>", Dialect::Xml),
        Dialect::Xml,
    );
    assert_eq!(builder.stack().len(), 1);
    assert_eq!(builder.stack().snapshot(), vec![NodeId::ROOT]);
    while builder.step() {}
    // Well-formed input leaves only the root behind.
    assert_eq!(builder.stack().snapshot(), vec![NodeId::ROOT]);
}

#[test]
fn test_xml_end_tags_are_case_sensitive() {
    let result = parse_document("<Item>text</item></Item>", None, Dialect::Xml);
    // </item> matches nothing; </Item> closes the element.
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues.as_slice()[0].kind, IssueKind::StrayEndTag);
    let item = find_element(&result.tree, NodeId::ROOT, "Item").expect("Item");
    assert_eq!(result.tree.text(item), "text");
}

#[test]
fn test_doctype_lands_at_current_insertion_point() {
    let tree = parse("<!DOCTYPE html><html></html>");
    let children = tree.children(NodeId::ROOT);
    assert!(matches!(
        tree.get(children[0]).expect("node").node_type,
        NodeType::Doctype(_)
    ));
    assert_eq!(child_names(&tree, NodeId::ROOT), ["html"]);
}

#[test]
fn test_early_termination_keeps_partial_tree() {
    let mut builder = TreeBuilder::new(
        Tokenizer::new("<a><b>text</b></a><c>more", Dialect::Html),
        Dialect::Html,
    );
    // Pull only the first three tokens: <a>, <b>, "text".
    for _ in 0..3 {
        assert!(builder.step());
    }
    assert_eq!(builder.stack().len(), 2);

    let partial = builder.finish();
    let b = find_element(&partial.tree, NodeId::ROOT, "b").expect("b");
    assert_eq!(partial.tree.text(b), "text");
    assert!(find_element(&partial.tree, NodeId::ROOT, "c").is_none());
}

#[test]
fn test_reparsing_is_deterministic() {
    let input = r#"<a href=1><b></x>text<!bogus><li>one<li>two"#;
    let first = parse_document(input, Some("https://example.com/"), Dialect::Html);
    let second = parse_document(input, Some("https://example.com/"), Dialect::Html);

    assert_eq!(
        first.tree.outline(first.tree.root()),
        second.tree.outline(second.tree.root())
    );
    assert_eq!(first.issues, second.issues);
    assert!(!first.issues.is_empty());
}
