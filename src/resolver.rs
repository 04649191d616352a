//! The resolution engine.
//!
//! A [`Resolver`] owns a parsed [`Document`] plus an optional
//! namespace-prefix mapping and resolves descriptors against it. All
//! methods take `&self`: the same instance can resolve many models
//! against its root, or against any sub-node, as long as calls are not
//! made concurrently against it from multiple threads without external
//! synchronization.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::descriptor::{Descriptor, Field, FieldList, Model};
use crate::error::{ExtractError, Result};
use crate::format::{self, TreeBuilder};
use crate::http;
use crate::query::{Query, QueryMatch};
use crate::record::Record;
use crate::tree::{Document, NodeId};
use crate::value::Value;

/// Residual markup tags embedded in matched text.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<]+?>").expect("valid regex"));

/// Strip embedded markup tags from a matched string.
///
/// Matches are assumed to be raw text that may still contain markup
/// artifacts (escaped fragments, CDATA leftovers).
#[must_use]
pub fn sanitize(raw: &str) -> String {
    MARKUP_TAG.replace_all(raw, "").into_owned()
}

/// Resolution engine bound to one parsed document tree.
#[derive(Debug)]
pub struct Resolver {
    doc: Document,
    namespaces: Option<HashMap<String, String>>,
}

impl Resolver {
    /// Bind a resolver to an already-constructed document tree.
    #[must_use]
    pub fn from_document(doc: Document, namespaces: Option<HashMap<String, String>>) -> Self {
        Self { doc, namespaces }
    }

    /// Build a tree from a document string using the registered
    /// tree-construction strategy for `format` ("xml" or "html").
    ///
    /// # Errors
    /// Returns `UnknownFormat` for unregistered format tags, or the
    /// format's own parse error for malformed input.
    pub fn from_str(
        input: &str,
        format: &str,
        namespaces: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let builder = format::builder_for(format)?;
        Self::with_builder(input, builder, namespaces)
    }

    /// Build a tree with a caller-supplied strategy, bypassing the
    /// format registry.
    ///
    /// # Errors
    /// Returns the strategy's parse error for malformed input.
    pub fn with_builder(
        input: &str,
        builder: &dyn TreeBuilder,
        namespaces: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let doc = builder.build_tree(input)?;
        Ok(Self::from_document(doc, namespaces))
    }

    /// Download a remote document and bind a resolver to it.
    ///
    /// # Errors
    /// Returns `Http`/`RetriesExhausted` for transport failures, plus the
    /// same errors as [`Resolver::from_str`].
    pub fn from_url(
        url: &str,
        format: &str,
        namespaces: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let client = http::create_client()?;
        let body = http::download(&client, url)?;
        Self::from_str(&body, format, namespaces)
    }

    /// The bound document tree.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Root node of the bound tree.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.doc.root()
    }

    /// Resolve a whole model against the document root.
    ///
    /// # Errors
    /// Any descriptor's hard failure (type conversion, query evaluation)
    /// aborts the pass; there is no partial-result mode.
    pub fn parse(&self, model: &Model) -> Result<Record> {
        self.resolve_model(model, self.doc.root())
    }

    /// Resolve a whole model against an explicit search root.
    ///
    /// Fields resolve in declaration order into a fresh [`Record`]. A
    /// scalar field that found no match and carries no default is omitted
    /// from the record; a matched-but-empty value is stored. Collection
    /// fields are always stored, including empty collections.
    ///
    /// # Errors
    /// Propagates the first descriptor failure.
    pub fn resolve_model(&self, model: &Model, root: NodeId) -> Result<Record> {
        tracing::debug!(fields = model.len(), "Resolving model");
        let mut record = Record::new();

        for (name, descriptor) in model.iter() {
            match descriptor {
                Descriptor::Scalar(field) => {
                    if let Some(value) = self.resolve_field(field, root)? {
                        tracing::trace!(field = name, %value, "Resolved field");
                        record.insert(name, value);
                    } else {
                        tracing::trace!(field = name, "No match and no default, omitting");
                    }
                }
                Descriptor::List(list) => {
                    let records = self.resolve_list(list, root)?;
                    tracing::trace!(field = name, count = records.len(), "Resolved list");
                    record.insert(name, Value::Records(records));
                }
            }
        }

        Ok(record)
    }

    /// Resolve one scalar field against a search root.
    ///
    /// Locations are tried in declared order; the first query yielding at
    /// least one match wins and later locations are never consulted. The
    /// first matched value is sanitized and then either passed to the
    /// field's custom parse function or converted to its expected type.
    ///
    /// A match whose sanitized text is empty is still a match: only *no
    /// query match at all* falls back to the default, which is returned
    /// exactly as configured (no conversion, no sanitizing).
    ///
    /// # Errors
    /// Type conversion failures and custom parse failures propagate; a
    /// missing value is not an error.
    pub fn resolve_field(&self, field: &Field, root: NodeId) -> Result<Option<Value>> {
        for location in field.locations() {
            let query = Query::parse(location)?;
            let matches = query.evaluate(&self.doc, root, self.namespaces.as_ref())?;

            let Some(first) = matches.into_iter().next() else {
                continue;
            };

            let raw = match first {
                QueryMatch::Text(text) => text,
                QueryMatch::Node(node) => self.doc.text_content(node).trim().to_string(),
            };
            let sanitized = sanitize(&raw);

            let value = match field.parse_fn() {
                Some(parse_fn) => parse_fn(&sanitized)?,
                None => field.expected_type().convert(&sanitized)?,
            };
            return Ok(Some(value));
        }

        Ok(field.default_value().cloned())
    }

    /// Resolve one collection descriptor against a search root.
    ///
    /// Evaluates the root location and runs a full model pass rooted at
    /// each matched sub-node, in document order. Zero matches yield an
    /// empty list, not an error.
    ///
    /// # Errors
    /// Returns `QuerySyntax` when the root location selects text or
    /// attribute values instead of elements; nested resolution failures
    /// propagate.
    pub fn resolve_list(&self, list: &FieldList, root: NodeId) -> Result<Vec<Record>> {
        let query = Query::parse(list.root_location())?;
        let matches = query.evaluate(&self.doc, root, self.namespaces.as_ref())?;

        let mut records = Vec::with_capacity(matches.len());
        for matched in matches {
            let QueryMatch::Node(node) = matched else {
                return Err(ExtractError::query(
                    list.root_location(),
                    "root location must select elements, not values",
                ));
            };
            records.push(self.resolve_model(list.model(), node)?);
        }

        Ok(records)
    }
}
