//! Field descriptors and model definitions.
//!
//! A [`Model`] is an ordered list of named descriptors describing how to
//! extract one structured record from a document. Descriptors come in two
//! kinds: a [`Field`] resolves to a single scalar value, a [`FieldList`]
//! selects a set of sub-nodes and applies a nested model to each one.
//!
//! Models are registered explicitly through [`ModelBuilder`], which
//! validates every descriptor up front; a model that reaches the resolver
//! is structurally sound.

use std::fmt;
use std::sync::Arc;

use crate::error::{ExtractError, Result};
use crate::query::Query;
use crate::value::{ExpectedType, Value};

/// Custom conversion from a sanitized matched string to a final value.
/// When set on a [`Field`], it entirely supersedes the expected-type
/// conversion step.
pub type ParseFn = Arc<dyn Fn(&str) -> Result<Value> + Send + Sync>;

/// Describes one scalar field to extract.
///
/// Candidate location queries are tried in declared order; the first
/// query yielding a match wins. When no query matches, the configured
/// default is returned as-is.
///
/// # Examples
/// ```
/// use docpluck::{ExpectedType, Field};
///
/// let title = Field::new(["channel/title/text()"]);
/// let size = Field::new(["./enclosure/@length"])
///     .expect_type(ExpectedType::Int)
///     .default(0);
/// ```
#[derive(Clone)]
pub struct Field {
    locations: Vec<String>,
    default: Option<Value>,
    expected_type: ExpectedType,
    parse_fn: Option<ParseFn>,
}

impl Field {
    /// Create a field with its candidate location queries, in priority
    /// order. The model builder rejects fields with an empty location
    /// list.
    #[must_use]
    pub fn new<I, S>(locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            locations: locations.into_iter().map(Into::into).collect(),
            default: None,
            expected_type: ExpectedType::Str,
            parse_fn: None,
        }
    }

    /// Append a fallback location, tried after the existing ones.
    #[must_use]
    pub fn or(mut self, location: impl Into<String>) -> Self {
        self.locations.push(location.into());
        self
    }

    /// Set the value substituted when no location matches. The default is
    /// returned exactly as given, without conversion or sanitizing.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the conversion target applied to the sanitized matched string.
    #[must_use]
    pub fn expect_type(mut self, expected: ExpectedType) -> Self {
        self.expected_type = expected;
        self
    }

    /// Install a custom conversion function. Supersedes the expected-type
    /// conversion unconditionally.
    #[must_use]
    pub fn parse_with<F>(mut self, parse_fn: F) -> Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        self.parse_fn = Some(Arc::new(parse_fn));
        self
    }

    /// Candidate locations in priority order.
    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub(crate) fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub(crate) fn expected_type(&self) -> ExpectedType {
        self.expected_type
    }

    pub(crate) fn parse_fn(&self) -> Option<&ParseFn> {
        self.parse_fn.as_ref()
    }

    /// Validate the descriptor for use in a model.
    fn validate(&self, name: &str) -> Result<()> {
        if self.locations.is_empty() {
            return Err(ExtractError::InvalidDescriptor(format!(
                "field '{name}' has no locations"
            )));
        }
        for location in &self.locations {
            Query::parse(location).map_err(|e| {
                ExtractError::InvalidDescriptor(format!("field '{name}': {e}"))
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("locations", &self.locations)
            .field("default", &self.default)
            .field("expected_type", &self.expected_type)
            .field("parse_fn", &self.parse_fn.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.locations.join(", "))
    }
}

/// Describes a collection field: a root location selecting zero or more
/// sub-nodes, and a nested model applied independently to each of them.
///
/// Resolution always produces a sequence of records, never a scalar.
#[derive(Debug, Clone)]
pub struct FieldList {
    root_location: String,
    model: Model,
}

impl FieldList {
    /// Create a collection descriptor from a root location and the model
    /// applied to each matched sub-node.
    #[must_use]
    pub fn new(root_location: impl Into<String>, model: Model) -> Self {
        Self {
            root_location: root_location.into(),
            model,
        }
    }

    /// The query selecting the sub-nodes to iterate.
    #[must_use]
    pub fn root_location(&self) -> &str {
        &self.root_location
    }

    /// The nested model applied to each matched sub-node.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    fn validate(&self, name: &str) -> Result<()> {
        Query::parse(&self.root_location).map_err(|e| {
            ExtractError::InvalidDescriptor(format!("list '{name}': {e}"))
        })?;
        Ok(())
    }
}

/// Either kind of descriptor a model entry can hold.
#[derive(Debug, Clone)]
pub enum Descriptor {
    /// Single scalar field.
    Scalar(Field),
    /// Repeated sub-model collection.
    List(FieldList),
}

impl From<Field> for Descriptor {
    fn from(field: Field) -> Self {
        Descriptor::Scalar(field)
    }
}

impl From<FieldList> for Descriptor {
    fn from(list: FieldList) -> Self {
        Descriptor::List(list)
    }
}

/// An ordered, validated set of named descriptors.
///
/// Only [`ModelBuilder::build`] constructs a `Model`, so every model in
/// circulation has passed validation and holds at least one entry.
/// Nesting a model inside a [`FieldList`] yields arbitrarily deep
/// extraction trees.
#[derive(Debug, Clone)]
pub struct Model {
    entries: Vec<(String, Descriptor)>,
}

impl Model {
    /// Start building a model.
    #[must_use]
    pub fn builder() -> ModelBuilder {
        ModelBuilder::default()
    }

    /// Iterate over `(name, descriptor)` entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.entries.iter().map(|(name, d)| (name.as_str(), d))
    }

    /// Number of descriptor entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the model has no entries. Never true for a built model.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder collecting named descriptors for a [`Model`].
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    entries: Vec<(String, Descriptor)>,
}

impl ModelBuilder {
    /// Register a scalar field under a name.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.entries.push((name.into(), Descriptor::Scalar(field)));
        self
    }

    /// Register a repeated-model collection under a name.
    #[must_use]
    pub fn list(mut self, name: impl Into<String>, list: FieldList) -> Self {
        self.entries.push((name.into(), Descriptor::List(list)));
        self
    }

    /// Validate and finish the model.
    ///
    /// # Errors
    /// - `EmptyModel` when no descriptors were registered — a model with
    ///   zero resolvable fields is a caller mistake, not a valid
    ///   degenerate case.
    /// - `InvalidDescriptor` for duplicate names, fields without
    ///   locations, or locations that fail to parse.
    pub fn build(self) -> Result<Model> {
        if self.entries.is_empty() {
            return Err(ExtractError::EmptyModel);
        }

        for (index, (name, descriptor)) in self.entries.iter().enumerate() {
            if self.entries[..index].iter().any(|(other, _)| other == name) {
                return Err(ExtractError::InvalidDescriptor(format!(
                    "duplicate field name '{name}'"
                )));
            }
            match descriptor {
                Descriptor::Scalar(field) => field.validate(name)?,
                Descriptor::List(list) => list.validate(name)?,
            }
        }

        Ok(Model {
            entries: self.entries,
        })
    }
}
