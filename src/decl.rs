/// Declared type of one struct field.
///
/// Stands in for runtime reflection: every field of a participating struct
/// declares its shape through one of these variants. Nested structs are
/// referenced through their [`StructDecl`] constructor so declarations stay
/// `'static` and cycles surface at schema build time rather than here.
#[derive(Debug, Clone)]
pub enum TypeDecl {
	/// `bool` field.
	Bool,
	/// `i8` field.
	I8,
	/// `i16` field.
	I16,
	/// `i32` field.
	I32,
	/// `i64` field.
	I64,
	/// `u8` field.
	U8,
	/// `u16` field.
	U16,
	/// `u32` field.
	U32,
	/// `u64` field.
	U64,
	/// `f32` field.
	F32,
	/// `f64` field.
	F64,
	/// `String` field.
	Str,
	/// Nested struct field, declared through its constructor.
	Struct(fn() -> StructDecl),
	/// Ordered sequence; partial-merge semantics only when the element is a struct.
	Seq(Box<TypeDecl>),
	/// String-keyed mapping; partial-merge semantics only when the element is a struct.
	Map(Box<TypeDecl>),
	/// Atomic passthrough value with no partial-merge semantics.
	Opaque,
}

impl TypeDecl {
	/// Declare a sequence of the given element type.
	pub fn seq(element: TypeDecl) -> Self {
		TypeDecl::Seq(Box::new(element))
	}

	/// Declare a string-keyed mapping of the given element type.
	pub fn map(element: TypeDecl) -> Self {
		TypeDecl::Map(Box::new(element))
	}

	/// Declare a sequence of structs.
	pub fn seq_of(element: fn() -> StructDecl) -> Self {
		TypeDecl::Seq(Box::new(TypeDecl::Struct(element)))
	}

	/// Declare a string-keyed mapping of structs.
	pub fn map_of(element: fn() -> StructDecl) -> Self {
		TypeDecl::Map(Box::new(TypeDecl::Struct(element)))
	}
}

/// One declared struct field.
#[derive(Debug, Clone)]
pub struct FieldDecl {
	/// Field name as it appears in serialized form.
	pub name: &'static str,
	/// Declared field type.
	pub ty: TypeDecl,
	/// Whether the field participates in parsing.
	///
	/// Must be `false` for fields the type skips during serialization;
	/// invisible fields are dropped from the derived schema entirely.
	pub visible: bool,
}

impl FieldDecl {
	/// Declare a visible field.
	pub fn new(name: &'static str, ty: TypeDecl) -> Self {
		Self { name, ty, visible: true }
	}

	/// Declare a hidden field, dropped from the schema.
	pub fn hidden(name: &'static str, ty: TypeDecl) -> Self {
		Self { name, ty, visible: false }
	}
}

/// Declared shape of one struct type.
#[derive(Debug, Clone)]
pub struct StructDecl {
	/// Type name; the identity used for sub-default matching and cycle rejection.
	pub name: &'static str,
	/// Field declarations in source order.
	pub fields: Vec<FieldDecl>,
}

/// Supplies the declared shape of a struct type.
///
/// Implemented by every type used as a root default or as a collection
/// element with its own sub-default. The declaration must agree with the
/// type's serde representation: same field names, and `visible: false`
/// exactly where the type skips fields.
pub trait Describe {
	/// Return the declared shape of this type.
	fn describe() -> StructDecl;
}
