use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::decl::Describe;
use crate::decode::decode_document;
use crate::error::{FillError, Result};
use crate::merge::{MergeCx, fill_struct};
use crate::path::FieldPath;
use crate::registry::{SubDefaults, ValidatorSet};
use crate::schema::{StructSchema, build_schema};

/// Defaulting parser for one configuration type.
///
/// Holds the serialized default tree and the schema built once at
/// construction. Registration calls take `&mut self` and belong to the
/// construction phase; [`Parser::parse`] is `&self`, side-effect-free, and
/// safe to call concurrently once registration is done.
pub struct Parser<T> {
	schema: StructSchema,
	default_tree: Map<String, Value>,
	subs: SubDefaults,
	validators: ValidatorSet,
	marker: PhantomData<fn() -> T>,
}

impl<T> Parser<T>
where
	T: Describe + Serialize + DeserializeOwned,
{
	/// Build a parser around a default value.
	///
	/// The default is serialized once and serves as the fallback source for
	/// every absent leaf at every nesting depth for the parser's lifetime.
	pub fn new(default: &T) -> Result<Self> {
		let decl = T::describe();
		let schema = build_schema(&decl)?;
		let default_tree = serialize_struct(default, decl.name)?;

		debug!(ty = decl.name, fields = schema.fields.len(), "parser constructed");
		Ok(Self {
			schema,
			default_tree,
			subs: SubDefaults::default(),
			validators: ValidatorSet::default(),
			marker: PhantomData,
		})
	}

	/// Parse a document, merging it over the default value.
	///
	/// Present fields override the default, absent fields fall back,
	/// recursively. Returns the first decode, type-mismatch, or validation
	/// error encountered; on error no output value exists at all.
	pub fn parse(&self, data: &[u8]) -> Result<T> {
		let decoded = decode_document(data)?;

		let cx = MergeCx {
			subs: &self.subs,
			validators: &self.validators,
		};
		let mut path = Vec::new();
		let merged = fill_struct(&cx, &self.schema, &self.default_tree, Some(&decoded), &mut path)?;

		debug!(ty = %self.schema.name, bytes = data.len(), "document merged");
		serde_json::from_value(Value::Object(merged)).map_err(FillError::Assemble)
	}

	/// Parse a document from a string slice.
	pub fn parse_str(&self, data: &str) -> Result<T> {
		self.parse(data.as_bytes())
	}

	/// Register a default instance for a collection element type.
	///
	/// When a sequence-of-struct or mapping-of-struct field is merged, each
	/// element falls back to the most recently registered default whose
	/// declared type name matches the element type; with none registered,
	/// the element type's zero value is used (opaque fields zero to null,
	/// so element types carrying opaque fields should either register a
	/// sub-default or accept null there).
	pub fn set_sub_default<E>(&mut self, value: &E) -> Result<()>
	where
		E: Describe + Serialize,
	{
		let decl = E::describe();
		let tree = serialize_struct(value, decl.name)?;
		debug!(ty = decl.name, "sub-default registered");
		self.subs.prepend(decl.name, tree);
		Ok(())
	}

	/// Register a validator for one field position.
	///
	/// `path` is the dotted field path from the root of the default value;
	/// a path through a sequence-of-struct or mapping-of-struct field
	/// addresses that position in every element. The predicate fires
	/// exactly once per merge that resolves the field, whether the value
	/// came from the document or the default, and a `false` verdict aborts
	/// the parse. Registering at an occupied path replaces the prior
	/// validator.
	pub fn set_validator<V, F>(&mut self, path: &str, predicate: F) -> Result<()>
	where
		V: DeserializeOwned,
		F: Fn(&V) -> bool + Send + Sync + 'static,
	{
		let parsed = FieldPath::parse(path)?;
		let (_, crossed) = parsed.resolve(&self.schema)?;
		let canonical = parsed.canonical();

		// paths confined to nested structs have one counterpart in the
		// default tree, so the parameter type can be checked now
		if !crossed {
			let at_default = default_at(&self.default_tree, &parsed).unwrap_or(&Value::Null);
			if serde_json::from_value::<V>(at_default.clone()).is_err() {
				return Err(FillError::ValidatorType { path: canonical });
			}
		}

		debug!(path = %canonical, "validator registered");
		self.validators.insert::<V, F>(canonical, predicate);
		Ok(())
	}
}

fn serialize_struct<S: Serialize>(value: &S, type_name: &'static str) -> Result<Map<String, Value>> {
	let tree = serde_json::to_value(value).map_err(FillError::Assemble)?;
	match tree {
		Value::Object(map) => Ok(map),
		_ => Err(FillError::DefaultNotStruct {
			type_name: type_name.to_owned(),
		}),
	}
}

fn default_at<'v>(tree: &'v Map<String, Value>, path: &FieldPath) -> Option<&'v Value> {
	let mut current = tree;
	let mut found = None;
	for (step, segment) in path.segments.iter().enumerate() {
		let value = current.get(&**segment)?;
		if step + 1 == path.segments.len() {
			found = Some(value);
			break;
		}
		current = value.as_object()?;
	}
	found
}
