//! Thin helpers over the `markup5ever_rcdom` tree
//!
//! Parsing goes through html5ever's error-tolerant HTML5 tree builder, so any string yields a
//! tree. The tree is `Rc`-based and never leaves the call that built it.

use html5ever::serialize::{SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, serialize, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Parse a string into a DOM tree.
pub(crate) fn parse(source: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(source)
}

/// Nodes that were at the top level of the source, in source order.
///
/// The tree builder hoists leading metadata elements (`style`, `link`, `meta`, ...) into
/// `<head>`; those come first, followed by the children of `<body>`.
pub(crate) fn top_level_nodes(dom: &RcDom) -> Vec<Handle> {
    let mut nodes = Vec::new();

    for child in dom.document.children.borrow().iter() {
        if matches!(child.data, NodeData::Comment { .. }) {
            nodes.push(child.clone());
            continue;
        }
        if tag_name(child) != Some("html") {
            continue;
        }
        for section in child.children.borrow().iter() {
            match tag_name(section) {
                Some("head") | Some("body") => {
                    nodes.extend(section.children.borrow().iter().cloned());
                }
                _ => nodes.push(section.clone()),
            }
        }
    }

    nodes
}

/// Local tag name of an element, `None` for other node kinds.
pub(crate) fn tag_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

pub(crate) fn is_element(node: &Handle, tag: &str) -> bool {
    tag_name(node) == Some(tag)
}

/// Value of an attribute, if present.
pub(crate) fn attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Value of an attribute, treating an empty value as absent.
pub(crate) fn non_empty_attr(node: &Handle, name: &str) -> Option<String> {
    attr(node, name).filter(|value| !value.trim().is_empty())
}

/// Element children, skipping text and comments.
pub(crate) fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| tag_name(child).is_some())
        .cloned()
        .collect()
}

/// Element children with one of the given tag names.
pub(crate) fn children_named(node: &Handle, tags: &[&str]) -> Vec<Handle> {
    element_children(node)
        .into_iter()
        .filter(|child| tag_name(child).is_some_and(|tag| tags.contains(&tag)))
        .collect()
}

/// First descendant element with the given tag name, depth-first.
pub(crate) fn find_descendant(node: &Handle, tag: &str) -> Option<Handle> {
    find_descendant_where(node, |found| found == tag)
}

/// Whether any descendant element has one of the given tag names.
pub(crate) fn has_descendant(node: &Handle, tags: &[&str]) -> bool {
    find_descendant_where(node, |found| tags.contains(&found)).is_some()
}

// Documents nest arbitrarily deep, so tree walks keep their own stack.
fn find_descendant_where(node: &Handle, matches: impl Fn(&str) -> bool) -> Option<Handle> {
    let mut stack: Vec<Handle> = node.children.borrow().iter().rev().cloned().collect();
    while let Some(current) = stack.pop() {
        if tag_name(&current).is_some_and(&matches) {
            return Some(current);
        }
        stack.extend(current.children.borrow().iter().rev().cloned());
    }
    None
}

/// Concatenated text of all descendant text nodes.
pub(crate) fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        match &current.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            _ => stack.extend(current.children.borrow().iter().rev().cloned()),
        }
    }
    out
}

pub(crate) fn is_whitespace_text(node: &Handle) -> bool {
    match &node.data {
        NodeData::Text { contents } => contents.borrow().trim().is_empty(),
        _ => false,
    }
}

/// Serialize a node including its own tags.
pub(crate) fn outer_html(node: &Handle) -> String {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    let serializable = SerializableHandle::from(node.clone());
    if let Err(err) = serialize(&mut output, &serializable, opts) {
        log::warn!("failed to serialize node, keeping its text only: {}", err);
        return text_content(node);
    }

    String::from_utf8_lossy(&output).into_owned()
}
