//! Result container produced by one model resolution pass.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{ExtractError, Result};
use crate::value::Value;

/// Ordered name → value mapping produced by resolving one model
/// definition against one search root.
///
/// Fields appear in model declaration order. Two lookup modes with
/// different failure behavior are supported:
///
/// - [`Record::get_or`] substitutes an explicit default when the field
///   was never populated;
/// - [`Record::field`] fails loudly with [`ExtractError::MissingField`].
///
/// A descriptor that found no match and carries no default is omitted
/// from the record entirely, so absence is observable through these
/// lookups but never through iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: IndexMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a resolved value under a field name.
    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Look up a field, returning `None` if it was never populated.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Look up a field with an explicit fallback for absent fields.
    #[must_use]
    pub fn get_or<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
        self.values.get(name).unwrap_or(default)
    }

    /// Direct field access.
    ///
    /// # Errors
    /// Returns `MissingField` when the field was never populated. There is
    /// no silent default in this mode.
    pub fn field(&self, name: &str) -> Result<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| ExtractError::MissingField(name.to_string()))
    }

    /// Iterate over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of populated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no fields were populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
