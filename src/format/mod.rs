//! Format-specific tree construction.
//!
//! Each format provides a [`TreeBuilder`] strategy that turns a raw
//! document string into the shared [`Document`] arena. The resolution
//! engine is written once against that arena; the only thing that varies
//! per format is how the tree gets built. A process-wide registry maps
//! format tags to their strategy, and callers can bypass it by supplying
//! a strategy of their own to [`crate::Resolver::with_builder`].

mod html;
mod xml;

use std::collections::HashMap;
use std::sync::LazyLock;

pub use html::HtmlTreeBuilder;
pub use xml::XmlTreeBuilder;

use crate::error::{ExtractError, Result};
use crate::tree::Document;

/// Strategy for constructing a document tree from raw input.
pub trait TreeBuilder: Send + Sync {
    /// Parse the input into a document tree.
    ///
    /// # Errors
    /// Returns the format's parse error for input it cannot recover from.
    fn build_tree(&self, input: &str) -> Result<Document>;
}

/// Process-wide format registry, populated once on first use.
static REGISTRY: LazyLock<HashMap<&'static str, Box<dyn TreeBuilder>>> = LazyLock::new(|| {
    let mut map: HashMap<&'static str, Box<dyn TreeBuilder>> = HashMap::new();
    map.insert("xml", Box::new(XmlTreeBuilder));
    map.insert("html", Box::new(HtmlTreeBuilder));
    map
});

/// Look up the tree-construction strategy for a format tag.
///
/// # Errors
/// Returns `UnknownFormat` when the tag is not registered.
pub fn builder_for(format: &str) -> Result<&'static dyn TreeBuilder> {
    REGISTRY
        .get(format)
        .map(|builder| &**builder)
        .ok_or_else(|| ExtractError::UnknownFormat(format.to_string()))
}

/// Registered format tags, sorted.
#[must_use]
pub fn registered_formats() -> Vec<&'static str> {
    let mut formats: Vec<&'static str> = REGISTRY.keys().copied().collect();
    formats.sort_unstable();
    formats
}
