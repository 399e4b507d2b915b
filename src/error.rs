use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, FillError>;

/// Errors produced while building schemas, decoding documents, and merging.
#[derive(Debug, Error)]
pub enum FillError {
	/// A struct declaration nests a type already being built.
	#[error("cyclic struct nesting: {type_name} appears inside itself")]
	SchemaCycle {
		/// Declared name of the repeated struct type.
		type_name: String,
	},
	/// Two visible fields of one struct share a name.
	#[error("duplicate field {field} in struct {type_name}")]
	SchemaDuplicateField {
		/// Declared struct type name.
		type_name: String,
		/// Duplicated field name.
		field: String,
	},
	/// A default or sub-default value did not serialize to an object.
	#[error("{type_name} did not serialize to an object")]
	DefaultNotStruct {
		/// Declared struct type name.
		type_name: String,
	},
	/// Field path expression syntax is invalid.
	#[error("invalid field path: {path}")]
	InvalidFieldPath {
		/// Original user-provided path string.
		path: String,
	},
	/// Field path does not resolve to a field of the schema.
	#[error("no field at path {path} in {type_name}")]
	UnknownFieldPath {
		/// Canonical path string.
		path: String,
		/// Root struct type name the path was resolved against.
		type_name: String,
	},
	/// Validator parameter type does not match the field it was registered for.
	#[error("validator at {path} declares a parameter type incompatible with the field")]
	ValidatorType {
		/// Canonical path string.
		path: String,
	},
	/// Input document is malformed.
	#[error("malformed document: {0}")]
	Decode(#[source] serde_json::Error),
	/// Input document root is not an object.
	#[error("document root is {got}, expected object")]
	DocumentNotObject {
		/// Dynamic kind of the document root.
		got: &'static str,
	},
	/// Decoded dynamic value kind is incompatible with the target field.
	#[error("type mismatch at {type_name}.{field}: expected {expected}, got {got}")]
	TypeMismatch {
		/// Struct type name being merged.
		type_name: String,
		/// Field name being merged.
		field: String,
		/// Expected dynamic kind.
		expected: &'static str,
		/// Actual dynamic kind.
		got: &'static str,
	},
	/// Decoded number does not fit the target field width.
	#[error("number out of range at {type_name}.{field}: {value} does not fit {target}")]
	NumberOutOfRange {
		/// Struct type name being merged.
		type_name: String,
		/// Field name being merged.
		field: String,
		/// Decoded wide value.
		value: f64,
		/// Target scalar type name.
		target: &'static str,
	},
	/// A registered validator rejected a resolved field value.
	#[error("{type_name}.{field} has an invalid value of {value}")]
	Validation {
		/// Struct type name owning the rejected field.
		type_name: String,
		/// Rejected field name.
		field: String,
		/// Rendering of the rejected value.
		value: String,
	},
	/// Merged tree could not be assembled into the output type.
	#[error("output assembly failed: {0}")]
	Assemble(#[source] serde_json::Error),
}
