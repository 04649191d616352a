//! docpluck - Declarative field extraction from XML and HTML documents.
//!
//! Describe where each output field lives in a document with small field
//! descriptors collected into a model, then resolve the whole model
//! against a parsed tree in one pass:
//!
//! ```
//! use docpluck::{Field, Model, Resolver};
//!
//! let model = Model::builder()
//!     .field("title", Field::new(["channel/title/text()"]))
//!     .field("website", Field::new(["channel/link/text()"]).default("N/A"))
//!     .build()?;
//!
//! let xml = "<channel><title>Revolutions</title></channel>";
//! let resolver = Resolver::from_str(xml, "xml", None)?;
//! let record = resolver.parse(&model)?;
//!
//! assert_eq!(record.field("title")?.to_string(), "Revolutions");
//! assert_eq!(record.field("website")?.to_string(), "N/A");
//! # Ok::<(), docpluck::ExtractError>(())
//! ```
//!
//! Repeated sub-structures are described by nesting a model inside a
//! [`FieldList`]; resolution then yields one [`Record`] per matched
//! sub-node.
//!
//! # Architecture
//!
//! - [`descriptor`]: field descriptors and model definitions
//! - [`value`]: resolved values and type conversion
//! - [`record`]: the ordered result container
//! - [`tree`]: the owned format-neutral document tree
//! - `query`: location-query parsing and evaluation (internal)
//! - [`resolver`]: the resolution engine
//! - [`format`]: XML/HTML tree construction and the format registry
//! - [`http`]: document retrieval for [`Resolver::from_url`]
//! - [`error`]: error types and Result alias

pub mod descriptor;
pub mod error;
pub mod format;
pub mod http;
mod query;
pub mod record;
pub mod resolver;
pub mod tree;
pub mod value;

// Re-export commonly used items
pub use descriptor::{Descriptor, Field, FieldList, Model, ModelBuilder, ParseFn};
pub use error::{ExtractError, Result};
pub use format::{HtmlTreeBuilder, TreeBuilder, XmlTreeBuilder};
pub use record::Record;
pub use resolver::Resolver;
pub use tree::{Document, NodeId};
pub use value::{ExpectedType, Value};
