//! Deep-fill merge engine: a depth-first pre-order walk over corresponding
//! fields of the default tree, the decoded document, and the output under
//! construction, one struct level per call.

use serde_json::{Map, Value};

use crate::error::{FillError, Result};
use crate::registry::{SubDefaults, ValidatorSet};
use crate::schema::{FieldKind, FieldSchema, StructSchema};
use crate::value::{convert_scalar, kind_name, zero_struct};

/// Read-only context threaded through the recursion.
pub(crate) struct MergeCx<'a> {
	/// Element-type defaults for collection entries.
	pub subs: &'a SubDefaults,
	/// Validators keyed by canonical field path.
	pub validators: &'a ValidatorSet,
}

/// Merge one struct level, returning the fully resolved output object.
///
/// `decoded` is `None` when the corresponding object was absent from the
/// input; fields are matched by name, never by index. Any error aborts the
/// walk and short-circuits remaining siblings.
pub(crate) fn fill_struct<'s>(
	cx: &MergeCx<'_>,
	schema: &'s StructSchema,
	default: &Map<String, Value>,
	decoded: Option<&Map<String, Value>>,
	path: &mut Vec<&'s str>,
) -> Result<Map<String, Value>> {
	let mut out = Map::with_capacity(schema.fields.len());

	for field in &schema.fields {
		let name = &*field.name;
		let dv = default.get(name);
		// explicit null is the same as absent
		let av = decoded.and_then(|map| map.get(name)).filter(|value| !value.is_null());

		path.push(name);
		let result = fill_field(cx, schema, field, dv, av, path).and_then(|resolved| {
			if let Some(check) = cx.validators.get_joined(path) {
				if !check(&resolved)? {
					return Err(FillError::Validation {
						type_name: schema.name.to_string(),
						field: name.to_owned(),
						value: resolved.to_string(),
					});
				}
			}
			Ok(resolved)
		});
		path.pop();

		out.insert(name.to_owned(), result?);
	}

	Ok(out)
}

fn fill_field<'s>(
	cx: &MergeCx<'_>,
	owner: &StructSchema,
	field: &'s FieldSchema,
	dv: Option<&Value>,
	av: Option<&Value>,
	path: &mut Vec<&'s str>,
) -> Result<Value> {
	let mismatch = |expected: &'static str, got: &Value| FillError::TypeMismatch {
		type_name: owner.name.to_string(),
		field: field.name.to_string(),
		expected,
		got: kind_name(got),
	};

	match &field.kind {
		FieldKind::Scalar(kind) => match av {
			None => Ok(dv.cloned().unwrap_or(Value::Null)),
			Some(value) => convert_scalar(*kind, value, &owner.name, &field.name),
		},

		// a nested struct field is never absent as a whole; recurse unconditionally
		FieldKind::Struct(inner) => {
			let empty = Map::new();
			let default_obj = match dv {
				Some(Value::Object(map)) => map,
				_ => &empty,
			};
			let decoded_obj = match av {
				None => None,
				Some(Value::Object(map)) => Some(map),
				Some(other) => return Err(mismatch("object", other)),
			};
			fill_struct(cx, inner, default_obj, decoded_obj, path).map(Value::Object)
		}

		FieldKind::SeqOfStruct(inner) => match av {
			// container-level absence always yields empty, never the default entries
			None => Ok(Value::Array(Vec::new())),
			Some(Value::Array(items)) => {
				let element_default = element_default(cx, inner);
				let mut out = Vec::with_capacity(items.len());
				for item in items {
					let decoded_obj = match item {
						Value::Null => None,
						Value::Object(map) => Some(map),
						other => return Err(mismatch("object", other)),
					};
					let filled = fill_struct(cx, inner, &element_default, decoded_obj, path)?;
					out.push(Value::Object(filled));
				}
				Ok(Value::Array(out))
			}
			Some(other) => Err(mismatch("array", other)),
		},

		FieldKind::MapOfStruct(inner) => match av {
			None => Ok(Value::Object(Map::new())),
			Some(Value::Object(entries)) => {
				let element_default = element_default(cx, inner);
				let mut out = Map::with_capacity(entries.len());
				for (key, item) in entries {
					let decoded_obj = match item {
						Value::Null => None,
						Value::Object(map) => Some(map),
						other => return Err(mismatch("object", other)),
					};
					let filled = fill_struct(cx, inner, &element_default, decoded_obj, path)?;
					out.insert(key.clone(), Value::Object(filled));
				}
				Ok(Value::Object(out))
			}
			Some(other) => Err(mismatch("object", other)),
		},

		FieldKind::Opaque => match av {
			Some(value) => Ok(value.clone()),
			None => Ok(dv.cloned().unwrap_or(Value::Null)),
		},
	}
}

fn element_default(cx: &MergeCx<'_>, element: &StructSchema) -> Map<String, Value> {
	match cx.subs.lookup(&element.name) {
		Some(value) => value.clone(),
		None => zero_struct(element),
	}
}

#[cfg(test)]
mod tests {
	use serde_json::{Value, json};

	use super::{MergeCx, fill_struct};
	use crate::decl::{FieldDecl, StructDecl, TypeDecl};
	use crate::error::FillError;
	use crate::registry::{SubDefaults, ValidatorSet};
	use crate::schema::{StructSchema, build_schema};

	fn worker() -> StructDecl {
		StructDecl {
			name: "Worker",
			fields: vec![FieldDecl::new("retries", TypeDecl::U32), FieldDecl::new("name", TypeDecl::Str)],
		}
	}

	fn server() -> StructDecl {
		StructDecl {
			name: "Server",
			fields: vec![
				FieldDecl::new("port", TypeDecl::U16),
				FieldDecl::new("host", TypeDecl::Str),
				FieldDecl::new("workers", TypeDecl::seq_of(worker)),
				FieldDecl::new("tags", TypeDecl::seq(TypeDecl::Str)),
			],
		}
	}

	fn schema() -> StructSchema {
		build_schema(&server()).expect("schema builds")
	}

	fn run(default: Value, decoded: Value) -> Result<Value, FillError> {
		let subs = SubDefaults::default();
		let validators = ValidatorSet::default();
		let cx = MergeCx {
			subs: &subs,
			validators: &validators,
		};
		let schema = schema();
		let default = default.as_object().cloned().expect("default object");
		let decoded = decoded.as_object().cloned().expect("decoded object");
		let mut path = Vec::new();
		fill_struct(&cx, &schema, &default, Some(&decoded), &mut path).map(Value::Object)
	}

	fn default_doc() -> Value {
		json!({"port": 8080, "host": "localhost", "workers": [], "tags": ["a"]})
	}

	#[test]
	fn absent_scalars_fall_back_to_defaults() {
		let out = run(default_doc(), json!({"host": "example.com"})).expect("merge succeeds");
		assert_eq!(out, json!({"port": 8080, "host": "example.com", "workers": [], "tags": ["a"]}));
	}

	#[test]
	fn null_scalar_is_treated_as_absent() {
		let out = run(default_doc(), json!({"port": null})).expect("merge succeeds");
		assert_eq!(out["port"], json!(8080));
	}

	#[test]
	fn absent_struct_container_is_empty_despite_default_entries() {
		let default = json!({"port": 1, "host": "h", "workers": [{"retries": 9, "name": "keep"}], "tags": []});
		let out = run(default, json!({})).expect("merge succeeds");
		assert_eq!(out["workers"], json!([]));
	}

	#[test]
	fn present_elements_fill_from_zero_without_sub_default() {
		let out = run(default_doc(), json!({"workers": [{"retries": 2}]})).expect("merge succeeds");
		assert_eq!(out["workers"], json!([{"retries": 2, "name": ""}]));
	}

	#[test]
	fn opaque_fields_pass_through_unconverted() {
		let out = run(default_doc(), json!({"tags": ["x", "y"]})).expect("merge succeeds");
		assert_eq!(out["tags"], json!(["x", "y"]));
	}

	#[test]
	fn scalar_for_container_field_is_a_mismatch() {
		let err = run(default_doc(), json!({"workers": 3})).expect_err("array expected");
		assert!(matches!(err, FillError::TypeMismatch { expected: "array", .. }));
	}

	#[test]
	fn sub_default_supplies_element_fallbacks() {
		let mut subs = SubDefaults::default();
		subs.prepend("Worker", json!({"retries": 5, "name": "w"}).as_object().cloned().unwrap());
		let validators = ValidatorSet::default();
		let cx = MergeCx {
			subs: &subs,
			validators: &validators,
		};
		let schema = schema();
		let default = default_doc().as_object().cloned().unwrap();
		let decoded = json!({"workers": [{}]}).as_object().cloned().unwrap();
		let mut path = Vec::new();
		let out = fill_struct(&cx, &schema, &default, Some(&decoded), &mut path).expect("merge succeeds");
		assert_eq!(out["workers"], json!([{"retries": 5, "name": "w"}]));
	}

	#[test]
	fn failing_validator_aborts_with_field_identity() {
		let subs = SubDefaults::default();
		let mut validators = ValidatorSet::default();
		validators.insert::<u16, _>("port".to_owned(), |port| *port >= 1024);
		let cx = MergeCx {
			subs: &subs,
			validators: &validators,
		};
		let schema = schema();
		let default = default_doc().as_object().cloned().unwrap();
		let decoded = json!({"port": 80}).as_object().cloned().unwrap();
		let mut path = Vec::new();
		let err = fill_struct(&cx, &schema, &default, Some(&decoded), &mut path).expect_err("validator rejects");
		match err {
			FillError::Validation { type_name, field, .. } => {
				assert_eq!(type_name, "Server");
				assert_eq!(field, "port");
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn element_validator_fires_per_element() {
		let subs = SubDefaults::default();
		let mut validators = ValidatorSet::default();
		validators.insert::<u32, _>("workers.retries".to_owned(), |retries| *retries <= 10);
		let cx = MergeCx {
			subs: &subs,
			validators: &validators,
		};
		let schema = schema();
		let default = default_doc().as_object().cloned().unwrap();
		let decoded = json!({"workers": [{"retries": 1}, {"retries": 99}]}).as_object().cloned().unwrap();
		let mut path = Vec::new();
		let err = fill_struct(&cx, &schema, &default, Some(&decoded), &mut path).expect_err("second element rejected");
		assert!(matches!(err, FillError::Validation { field, .. } if field == "retries"));
	}
}
