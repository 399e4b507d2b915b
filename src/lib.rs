//! Recursive defaulting merge of JSON-shaped documents into typed values.
//!
//! A [`Parser`] owns a fully-populated default value and a schema describing
//! its shape. Each parse decodes an input document into a dynamic tree and
//! deep-fills it against the default: every field present in the document
//! overrides the default, every absent field falls back, recursively through
//! nested structs, sequences of structs, and string-keyed maps of structs.
//! Collection elements take per-type sub-defaults, and validators can be
//! attached to individual field positions by dotted path.
//!
//! ```
//! use deepfill::{Describe, FieldDecl, Parser, StructDecl, TypeDecl};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Server {
//! 	port: u16,
//! 	host: String,
//! }
//!
//! impl Describe for Server {
//! 	fn describe() -> StructDecl {
//! 		StructDecl {
//! 			name: "Server",
//! 			fields: vec![
//! 				FieldDecl::new("port", TypeDecl::U16),
//! 				FieldDecl::new("host", TypeDecl::Str),
//! 			],
//! 		}
//! 	}
//! }
//!
//! # fn main() -> deepfill::Result<()> {
//! let default = Server { port: 8080, host: "localhost".into() };
//! let mut parser = Parser::new(&default)?;
//! parser.set_validator("port", |port: &u16| *port >= 1024)?;
//!
//! let merged: Server = parser.parse_str(r#"{"host": "example.com"}"#)?;
//! assert_eq!(merged, Server { port: 8080, host: "example.com".into() });
//! # Ok(())
//! # }
//! ```

mod decl;
mod decode;
mod error;
mod merge;
mod parser;
mod path;
mod registry;
mod schema;
mod value;

/// Type declaration surface implemented per participating struct.
pub use decl::{Describe, FieldDecl, StructDecl, TypeDecl};
/// Document decoder adapter entry point.
pub use decode::decode_document;
/// Error and result aliases.
pub use error::{FillError, Result};
/// Defaulting parser façade.
pub use parser::Parser;
/// Field path parser type.
pub use path::FieldPath;
/// Built schema representation and builder.
pub use schema::{FieldKind, FieldSchema, ScalarKind, StructSchema, build_schema};
/// Dynamic value kind helper.
pub use value::kind_name;
