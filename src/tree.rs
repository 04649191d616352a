//! Owned, format-neutral document tree.
//!
//! Both format front ends ([`crate::format::XmlTreeBuilder`] and
//! [`crate::format::HtmlTreeBuilder`]) convert their parser's output into
//! this arena so that query evaluation and resolution are written once,
//! independent of the originating format. The engine treats the tree as
//! opaque beyond the accessors here.

/// Handle to a node inside a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A child slot of an element: either a nested element or a run of
/// character data.
#[derive(Debug, Clone)]
enum Child {
    Element(NodeId),
    Text(String),
}

/// Element data stored in the arena.
#[derive(Debug, Clone)]
struct NodeData {
    /// Local tag name without any prefix.
    local: String,
    /// Namespace URI the element belongs to, if any.
    namespace: Option<String>,
    /// Attributes in document order.
    attributes: Vec<(String, String)>,
    /// Children in document order.
    children: Vec<Child>,
}

/// A parsed document as an arena of element nodes.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Document {
    /// Create a document containing only the root element.
    pub(crate) fn with_root(
        local: impl Into<String>,
        namespace: Option<String>,
        attributes: Vec<(String, String)>,
    ) -> Self {
        let root = NodeData {
            local: local.into(),
            namespace,
            attributes,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// Append an element child under `parent` and return its id.
    pub(crate) fn add_element(
        &mut self,
        parent: NodeId,
        local: impl Into<String>,
        namespace: Option<String>,
        attributes: Vec<(String, String)>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            local: local.into(),
            namespace,
            attributes,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(Child::Element(id));
        id
    }

    /// Append a text child under `parent`.
    pub(crate) fn add_text(&mut self, parent: NodeId, text: impl Into<String>) {
        self.nodes[parent.0].children.push(Child::Text(text.into()));
    }

    /// The root element of the document.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Local tag name of a node, without namespace prefix.
    #[must_use]
    pub fn local_name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].local
    }

    /// Namespace URI of a node, if it belongs to one.
    #[must_use]
    pub fn namespace(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].namespace.as_deref()
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0]
            .attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// Element children of a node, in document order.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0].children.iter().filter_map(|c| match c {
            Child::Element(child) => Some(*child),
            Child::Text(_) => None,
        })
    }

    /// Direct text children of a node, in document order.
    ///
    /// Mirrors a `text()` location step: only character data that is an
    /// immediate child is produced, not text nested in sub-elements.
    pub fn direct_text(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.nodes[id.0].children.iter().filter_map(|c| match c {
            Child::Text(text) => Some(text.as_str()),
            Child::Element(_) => None,
        })
    }

    /// Concatenated text of a node and all its descendants, in document
    /// order. This is the tree-to-string primitive used when a scalar
    /// field matches an element rather than a text or attribute value.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for child in &self.nodes[id.0].children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(el) => self.collect_text(*el, out),
            }
        }
    }

    /// Number of element nodes in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A document always has at least a root element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}
