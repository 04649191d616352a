//! Error types for the extraction engine.
//!
//! A single `ExtractError` enum covers construction-time failures
//! (descriptor validation, unknown formats) and resolution-time failures
//! (type conversion, query syntax). Tree-parse and transport errors from
//! the underlying libraries pass through unmodified.

use thiserror::Error;

/// Main error type for the docpluck library.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A descriptor was constructed with invalid parameters.
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// A model definition contains no descriptors.
    #[error("Model definition contains no descriptors")]
    EmptyModel,

    /// An unregistered format tag was requested from the registry.
    #[error("'{0}' is not a recognized document format")]
    UnknownFormat(String),

    /// A matched string could not be converted to the declared type.
    #[error("Cannot convert '{value}' to {expected}")]
    TypeConversion { value: String, expected: String },

    /// A location query could not be parsed or evaluated.
    #[error("Invalid location query '{query}': {reason}")]
    QuerySyntax { query: String, reason: String },

    /// Direct field access on a record that never stored the field.
    #[error("Record has no field named '{0}'")]
    MissingField(String),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    Xml(#[from] roxmltree::Error),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// All retry attempts for a download were exhausted.
    #[error("Download failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },
}

impl ExtractError {
    /// Build a `QuerySyntax` error for a query string.
    pub(crate) fn query(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::QuerySyntax {
            query: query.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
