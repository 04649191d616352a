//! Lenient HTML tree construction.

use scraper::node::Node;
use scraper::{ElementRef, Html};

use super::TreeBuilder;
use crate::error::Result;
use crate::tree::{Document, NodeId};

/// Builds trees from HTML using html5ever's recovery parsing: unclosed
/// tags and stray markup are repaired the way browsers repair them, so
/// construction does not fail on malformed input.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTreeBuilder;

impl TreeBuilder for HtmlTreeBuilder {
    fn build_tree(&self, input: &str) -> Result<Document> {
        let parsed = Html::parse_document(input);
        let root = parsed.root_element();

        let mut doc = Document::with_root(root.value().name(), namespace(root), attributes(root));
        let root_id = doc.root();
        copy_children(&mut doc, root_id, root);
        Ok(doc)
    }
}

fn namespace(element: ElementRef<'_>) -> Option<String> {
    let ns = &element.value().name.ns;
    if ns.is_empty() {
        None
    } else {
        Some(ns.to_string())
    }
}

fn attributes(element: ElementRef<'_>) -> Vec<(String, String)> {
    element
        .value()
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn copy_children(doc: &mut Document, parent: NodeId, element: ElementRef<'_>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let id = doc.add_element(
                parent,
                child_element.value().name(),
                namespace(child_element),
                attributes(child_element),
            );
            copy_children(doc, id, child_element);
        } else if let Node::Text(text) = child.value() {
            doc.add_text(parent, &**text);
        }
    }
}
