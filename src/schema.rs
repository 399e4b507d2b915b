use std::collections::HashSet;

use crate::decl::{StructDecl, TypeDecl};
use crate::error::{FillError, Result};

/// Scalar leaf kinds; each becomes an optional slot in the decoded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
	/// Boolean leaf.
	Bool,
	/// Signed 8-bit integer leaf.
	I8,
	/// Signed 16-bit integer leaf.
	I16,
	/// Signed 32-bit integer leaf.
	I32,
	/// Signed 64-bit integer leaf.
	I64,
	/// Unsigned 8-bit integer leaf.
	U8,
	/// Unsigned 16-bit integer leaf.
	U16,
	/// Unsigned 32-bit integer leaf.
	U32,
	/// Unsigned 64-bit integer leaf.
	U64,
	/// 32-bit float leaf.
	F32,
	/// 64-bit float leaf.
	F64,
	/// String leaf.
	Str,
}

impl ScalarKind {
	/// Target type name for diagnostics.
	pub fn name(self) -> &'static str {
		match self {
			ScalarKind::Bool => "bool",
			ScalarKind::I8 => "i8",
			ScalarKind::I16 => "i16",
			ScalarKind::I32 => "i32",
			ScalarKind::I64 => "i64",
			ScalarKind::U8 => "u8",
			ScalarKind::U16 => "u16",
			ScalarKind::U32 => "u32",
			ScalarKind::U64 => "u64",
			ScalarKind::F32 => "f32",
			ScalarKind::F64 => "f64",
			ScalarKind::Str => "string",
		}
	}
}

/// Merge policy kind of one schema field.
#[derive(Debug, Clone)]
pub enum FieldKind {
	/// Leaf scalar; falls back to the default when absent.
	Scalar(ScalarKind),
	/// Nested struct; merged recursively, never absent as a whole.
	Struct(StructSchema),
	/// Sequence of structs; absent yields empty, elements merge per-element.
	SeqOfStruct(StructSchema),
	/// String-keyed mapping of structs; absent yields empty, entries merge per-entry.
	MapOfStruct(StructSchema),
	/// Atomic passthrough; decoded value or default, no recursion.
	Opaque,
}

/// One field of a built schema.
#[derive(Debug, Clone)]
pub struct FieldSchema {
	/// Field name, identical to the declaration.
	pub name: Box<str>,
	/// Merge policy kind.
	pub kind: FieldKind,
}

/// Built schema for one struct type.
///
/// Structurally isomorphic to the visible part of its [`StructDecl`]: same
/// retained field count, order, and names; only leaf representations differ.
/// Built once per parser and cached for its lifetime.
#[derive(Debug, Clone)]
pub struct StructSchema {
	/// Struct type name.
	pub name: Box<str>,
	/// Retained fields in declaration order.
	pub fields: Vec<FieldSchema>,
}

impl StructSchema {
	/// Look up a field schema by name.
	pub fn field(&self, name: &str) -> Option<&FieldSchema> {
		self.fields.iter().find(|field| &*field.name == name)
	}
}

/// Build the nilable schema for a struct declaration.
///
/// Drops invisible fields, rejects cyclic nesting and duplicate visible
/// field names, and recursively transforms nested struct, sequence-of-struct,
/// and mapping-of-struct fields. Everything else is opaque passthrough.
pub fn build_schema(decl: &StructDecl) -> Result<StructSchema> {
	let mut ancestors = Vec::new();
	build_struct(decl, &mut ancestors)
}

fn build_struct(decl: &StructDecl, ancestors: &mut Vec<&'static str>) -> Result<StructSchema> {
	if ancestors.contains(&decl.name) {
		return Err(FillError::SchemaCycle {
			type_name: decl.name.to_owned(),
		});
	}
	ancestors.push(decl.name);

	let mut seen = HashSet::new();
	let mut fields = Vec::with_capacity(decl.fields.len());
	for field in &decl.fields {
		if !field.visible {
			continue;
		}
		if !seen.insert(field.name) {
			ancestors.pop();
			return Err(FillError::SchemaDuplicateField {
				type_name: decl.name.to_owned(),
				field: field.name.to_owned(),
			});
		}

		let kind = build_field(&field.ty, ancestors)?;
		fields.push(FieldSchema {
			name: field.name.to_owned().into_boxed_str(),
			kind,
		});
	}

	ancestors.pop();
	Ok(StructSchema {
		name: decl.name.to_owned().into_boxed_str(),
		fields,
	})
}

fn build_field(ty: &TypeDecl, ancestors: &mut Vec<&'static str>) -> Result<FieldKind> {
	let kind = match ty {
		TypeDecl::Bool => FieldKind::Scalar(ScalarKind::Bool),
		TypeDecl::I8 => FieldKind::Scalar(ScalarKind::I8),
		TypeDecl::I16 => FieldKind::Scalar(ScalarKind::I16),
		TypeDecl::I32 => FieldKind::Scalar(ScalarKind::I32),
		TypeDecl::I64 => FieldKind::Scalar(ScalarKind::I64),
		TypeDecl::U8 => FieldKind::Scalar(ScalarKind::U8),
		TypeDecl::U16 => FieldKind::Scalar(ScalarKind::U16),
		TypeDecl::U32 => FieldKind::Scalar(ScalarKind::U32),
		TypeDecl::U64 => FieldKind::Scalar(ScalarKind::U64),
		TypeDecl::F32 => FieldKind::Scalar(ScalarKind::F32),
		TypeDecl::F64 => FieldKind::Scalar(ScalarKind::F64),
		TypeDecl::Str => FieldKind::Scalar(ScalarKind::Str),
		TypeDecl::Struct(element) => FieldKind::Struct(build_struct(&element(), ancestors)?),
		TypeDecl::Seq(element) => match &**element {
			TypeDecl::Struct(inner) => FieldKind::SeqOfStruct(build_struct(&inner(), ancestors)?),
			_ => FieldKind::Opaque,
		},
		TypeDecl::Map(element) => match &**element {
			TypeDecl::Struct(inner) => FieldKind::MapOfStruct(build_struct(&inner(), ancestors)?),
			_ => FieldKind::Opaque,
		},
		TypeDecl::Opaque => FieldKind::Opaque,
	};
	Ok(kind)
}

#[cfg(test)]
mod tests {
	use super::{FieldKind, ScalarKind, build_schema};
	use crate::decl::{FieldDecl, StructDecl, TypeDecl};
	use crate::error::FillError;

	fn worker() -> StructDecl {
		StructDecl {
			name: "Worker",
			fields: vec![FieldDecl::new("retries", TypeDecl::U32)],
		}
	}

	fn server() -> StructDecl {
		StructDecl {
			name: "Server",
			fields: vec![
				FieldDecl::new("port", TypeDecl::U16),
				FieldDecl::new("host", TypeDecl::Str),
				FieldDecl::new("workers", TypeDecl::seq_of(worker)),
				FieldDecl::new("pools", TypeDecl::map_of(worker)),
				FieldDecl::new("tags", TypeDecl::seq(TypeDecl::Str)),
				FieldDecl::hidden("cache", TypeDecl::Opaque),
			],
		}
	}

	#[test]
	fn schema_mirrors_visible_fields_in_order() {
		let schema = build_schema(&server()).expect("schema builds");
		let names: Vec<&str> = schema.fields.iter().map(|field| &*field.name).collect();
		assert_eq!(names, ["port", "host", "workers", "pools", "tags"]);
	}

	#[test]
	fn container_element_kinds_are_classified() {
		let schema = build_schema(&server()).expect("schema builds");
		assert!(matches!(schema.field("port").unwrap().kind, FieldKind::Scalar(ScalarKind::U16)));
		assert!(matches!(schema.field("workers").unwrap().kind, FieldKind::SeqOfStruct(_)));
		assert!(matches!(schema.field("pools").unwrap().kind, FieldKind::MapOfStruct(_)));
		assert!(matches!(schema.field("tags").unwrap().kind, FieldKind::Opaque));
	}

	#[test]
	fn self_nesting_is_rejected() {
		fn knot() -> StructDecl {
			StructDecl {
				name: "Knot",
				fields: vec![FieldDecl::new("inner", TypeDecl::Struct(knot))],
			}
		}
		let err = build_schema(&knot()).expect_err("cycle must be rejected");
		assert!(matches!(err, FillError::SchemaCycle { type_name } if type_name == "Knot"));
	}

	#[test]
	fn indirect_nesting_is_rejected() {
		fn outer() -> StructDecl {
			StructDecl {
				name: "Outer",
				fields: vec![FieldDecl::new("inner", TypeDecl::Struct(inner))],
			}
		}
		fn inner() -> StructDecl {
			StructDecl {
				name: "Inner",
				fields: vec![FieldDecl::new("outer", TypeDecl::Struct(outer))],
			}
		}
		assert!(matches!(build_schema(&outer()), Err(FillError::SchemaCycle { .. })));
	}

	#[test]
	fn duplicate_visible_fields_are_rejected() {
		let decl = StructDecl {
			name: "Dup",
			fields: vec![FieldDecl::new("x", TypeDecl::I32), FieldDecl::new("x", TypeDecl::Str)],
		};
		assert!(matches!(build_schema(&decl), Err(FillError::SchemaDuplicateField { .. })));
	}

	#[test]
	fn repeated_sibling_type_is_allowed() {
		fn pair() -> StructDecl {
			StructDecl {
				name: "Pair",
				fields: vec![
					FieldDecl::new("left", TypeDecl::Struct(worker)),
					FieldDecl::new("right", TypeDecl::Struct(worker)),
				],
			}
		}
		assert!(build_schema(&pair()).is_ok());
	}
}
