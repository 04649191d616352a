//! Strict XML tree construction.

use roxmltree::Node;

use super::TreeBuilder;
use crate::error::Result;
use crate::tree::{Document, NodeId};

/// Builds trees from well-formed XML. Malformed input is a hard error;
/// use the HTML builder for markup that needs recovery parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlTreeBuilder;

impl TreeBuilder for XmlTreeBuilder {
    fn build_tree(&self, input: &str) -> Result<Document> {
        let parsed = roxmltree::Document::parse(input)?;
        let root = parsed.root_element();

        let mut doc = Document::with_root(root.tag_name().name(), namespace(root), attributes(root));
        let root_id = doc.root();
        copy_children(&mut doc, root_id, root);
        Ok(doc)
    }
}

fn namespace(node: Node<'_, '_>) -> Option<String> {
    node.tag_name().namespace().map(str::to_string)
}

fn attributes(node: Node<'_, '_>) -> Vec<(String, String)> {
    node.attributes()
        .map(|attr| (attr.name().to_string(), attr.value().to_string()))
        .collect()
}

fn copy_children(doc: &mut Document, parent: NodeId, node: Node<'_, '_>) {
    for child in node.children() {
        if child.is_element() {
            let id = doc.add_element(
                parent,
                child.tag_name().name(),
                namespace(child),
                attributes(child),
            );
            copy_children(doc, id, child);
        } else if child.is_text() {
            if let Some(text) = child.text() {
                doc.add_text(parent, text);
            }
        }
    }
}
