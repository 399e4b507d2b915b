use crate::error::{FillError, Result};
use crate::schema::{FieldKind, StructSchema};

/// Parsed field path expression.
///
/// A path is the structural identity of one field position: a dotted
/// sequence of field names from the root struct, e.g. `server.port`. A step
/// landing on a sequence-of-struct or mapping-of-struct field descends into
/// the element schema, so `workers.retries` addresses the `retries` position
/// of every element of `workers`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
	/// Ordered field name segments.
	pub segments: Vec<Box<str>>,
}

impl FieldPath {
	/// Parse dotted field syntax.
	pub fn parse(input: &str) -> Result<Self> {
		if input.is_empty() {
			return Err(FillError::InvalidFieldPath { path: input.to_owned() });
		}

		let bytes = input.as_bytes();
		let mut idx = 0_usize;
		let mut segments = Vec::new();

		while idx < bytes.len() {
			let start = idx;
			while idx < bytes.len() {
				let byte = bytes[idx];
				if byte.is_ascii_alphanumeric() || byte == b'_' {
					idx += 1;
				} else {
					break;
				}
			}

			if idx == start {
				return Err(FillError::InvalidFieldPath { path: input.to_owned() });
			}

			segments.push(input[start..idx].to_owned().into_boxed_str());

			if idx < bytes.len() {
				if bytes[idx] != b'.' {
					return Err(FillError::InvalidFieldPath { path: input.to_owned() });
				}
				idx += 1;
				if idx >= bytes.len() {
					return Err(FillError::InvalidFieldPath { path: input.to_owned() });
				}
			}
		}

		Ok(Self { segments })
	}

	/// Canonical dotted rendering, the registry key form.
	pub fn canonical(&self) -> String {
		self.segments.join(".")
	}

	/// Resolve this path against a schema.
	///
	/// Returns the kind of the addressed field and whether the path crossed
	/// a collection boundary on the way (in which case the addressed
	/// position has no single counterpart in the root default value).
	pub fn resolve<'s>(&self, root: &'s StructSchema) -> Result<(&'s FieldKind, bool)> {
		let mut current = root;
		let mut crossed = false;
		let mut found: Option<&FieldKind> = None;

		for (step, segment) in self.segments.iter().enumerate() {
			let field = current.field(segment).ok_or_else(|| FillError::UnknownFieldPath {
				path: self.canonical(),
				type_name: root.name.to_string(),
			})?;

			let last = step + 1 == self.segments.len();
			if last {
				found = Some(&field.kind);
				break;
			}

			current = match &field.kind {
				FieldKind::Struct(inner) => inner,
				FieldKind::SeqOfStruct(inner) | FieldKind::MapOfStruct(inner) => {
					crossed = true;
					inner
				}
				_ => {
					return Err(FillError::UnknownFieldPath {
						path: self.canonical(),
						type_name: root.name.to_string(),
					});
				}
			};
		}

		match found {
			Some(kind) => Ok((kind, crossed)),
			None => Err(FillError::UnknownFieldPath {
				path: self.canonical(),
				type_name: root.name.to_string(),
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::FieldPath;
	use crate::decl::{FieldDecl, StructDecl, TypeDecl};
	use crate::error::FillError;
	use crate::schema::{FieldKind, ScalarKind, build_schema};

	fn worker() -> StructDecl {
		StructDecl {
			name: "Worker",
			fields: vec![FieldDecl::new("retries", TypeDecl::U32)],
		}
	}

	fn root() -> StructDecl {
		StructDecl {
			name: "Root",
			fields: vec![
				FieldDecl::new("port", TypeDecl::U16),
				FieldDecl::new("workers", TypeDecl::seq_of(worker)),
			],
		}
	}

	#[test]
	fn dotted_path_parses_into_segments() {
		let path = FieldPath::parse("workers.retries").expect("path parses");
		assert_eq!(path.segments.len(), 2);
		assert_eq!(path.canonical(), "workers.retries");
	}

	#[test]
	fn empty_and_trailing_dot_are_rejected() {
		assert!(matches!(FieldPath::parse(""), Err(FillError::InvalidFieldPath { .. })));
		assert!(matches!(FieldPath::parse("a."), Err(FillError::InvalidFieldPath { .. })));
		assert!(matches!(FieldPath::parse("a..b"), Err(FillError::InvalidFieldPath { .. })));
	}

	#[test]
	fn resolve_reports_collection_crossing() {
		let schema = build_schema(&root()).expect("schema builds");

		let (kind, crossed) = FieldPath::parse("port").unwrap().resolve(&schema).expect("resolves");
		assert!(matches!(kind, FieldKind::Scalar(ScalarKind::U16)));
		assert!(!crossed);

		let (kind, crossed) = FieldPath::parse("workers.retries").unwrap().resolve(&schema).expect("resolves");
		assert!(matches!(kind, FieldKind::Scalar(ScalarKind::U32)));
		assert!(crossed);
	}

	#[test]
	fn unknown_segment_is_rejected() {
		let schema = build_schema(&root()).expect("schema builds");
		let err = FieldPath::parse("port.nested").unwrap().resolve(&schema).expect_err("scalar has no members");
		assert!(matches!(err, FillError::UnknownFieldPath { .. }));
	}
}
