use serde_json::{Map, Value};

use crate::error::{FillError, Result};
use crate::schema::{FieldKind, ScalarKind, StructSchema};

/// Dynamic kind name of a decoded value, for diagnostics.
pub fn kind_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

/// Zero value for a collection element type with no registered sub-default.
pub(crate) fn zero_struct(schema: &StructSchema) -> Map<String, Value> {
	let mut out = Map::new();
	for field in &schema.fields {
		out.insert(field.name.to_string(), zero_field(&field.kind));
	}
	out
}

fn zero_field(kind: &FieldKind) -> Value {
	match kind {
		FieldKind::Scalar(ScalarKind::Bool) => Value::Bool(false),
		FieldKind::Scalar(ScalarKind::F32 | ScalarKind::F64) => Value::from(0.0_f64),
		FieldKind::Scalar(ScalarKind::Str) => Value::String(String::new()),
		FieldKind::Scalar(_) => Value::from(0_i64),
		FieldKind::Struct(inner) => Value::Object(zero_struct(inner)),
		FieldKind::SeqOfStruct(_) => Value::Array(Vec::new()),
		FieldKind::MapOfStruct(_) => Value::Object(Map::new()),
		FieldKind::Opaque => Value::Null,
	}
}

/// Convert a present decoded scalar to its target width.
///
/// The single conversion step of the engine: booleans and strings must
/// match the target kind exactly; numbers go through the wide `f64`
/// representation, truncate toward zero for integer targets, and fail on
/// out-of-range magnitudes.
pub(crate) fn convert_scalar(kind: ScalarKind, value: &Value, type_name: &str, field: &str) -> Result<Value> {
	let mismatch = |expected: &'static str| FillError::TypeMismatch {
		type_name: type_name.to_owned(),
		field: field.to_owned(),
		expected,
		got: kind_name(value),
	};

	match kind {
		ScalarKind::Bool => match value {
			Value::Bool(b) => Ok(Value::Bool(*b)),
			_ => Err(mismatch("bool")),
		},
		ScalarKind::Str => match value {
			Value::String(s) => Ok(Value::String(s.clone())),
			_ => Err(mismatch("string")),
		},
		_ => {
			let Value::Number(number) = value else {
				return Err(mismatch("number"));
			};
			// serde_json numbers always have a wide representation
			let wide = number.as_f64().ok_or_else(|| mismatch("number"))?;
			convert_number(kind, wide, type_name, field)
		}
	}
}

fn convert_number(kind: ScalarKind, wide: f64, type_name: &str, field: &str) -> Result<Value> {
	let out_of_range = || FillError::NumberOutOfRange {
		type_name: type_name.to_owned(),
		field: field.to_owned(),
		value: wide,
		target: kind.name(),
	};

	match kind {
		ScalarKind::I8 => signed(wide, i64::from(i8::MIN), i64::from(i8::MAX)).ok_or_else(out_of_range),
		ScalarKind::I16 => signed(wide, i64::from(i16::MIN), i64::from(i16::MAX)).ok_or_else(out_of_range),
		ScalarKind::I32 => signed(wide, i64::from(i32::MIN), i64::from(i32::MAX)).ok_or_else(out_of_range),
		ScalarKind::I64 => {
			let trunc = wide.trunc();
			// 2^63 itself is not representable as i64
			if trunc >= -9.223_372_036_854_776E18 && trunc < 9.223_372_036_854_776E18 {
				Ok(Value::from(trunc as i64))
			} else {
				Err(out_of_range())
			}
		}
		ScalarKind::U8 => unsigned(wide, u64::from(u8::MAX)).ok_or_else(out_of_range),
		ScalarKind::U16 => unsigned(wide, u64::from(u16::MAX)).ok_or_else(out_of_range),
		ScalarKind::U32 => unsigned(wide, u64::from(u32::MAX)).ok_or_else(out_of_range),
		ScalarKind::U64 => {
			let trunc = wide.trunc();
			if trunc >= 0.0 && trunc < 1.844_674_407_370_955_2E19 {
				Ok(Value::from(trunc as u64))
			} else {
				Err(out_of_range())
			}
		}
		ScalarKind::F32 => {
			let narrowed = wide as f32;
			if narrowed.is_finite() {
				Ok(Value::from(f64::from(narrowed)))
			} else {
				Err(out_of_range())
			}
		}
		ScalarKind::F64 => Ok(Value::from(wide)),
		ScalarKind::Bool | ScalarKind::Str => unreachable!("non-numeric kinds handled by caller"),
	}
}

fn signed(wide: f64, min: i64, max: i64) -> Option<Value> {
	let trunc = wide.trunc();
	if trunc >= min as f64 && trunc <= max as f64 {
		Some(Value::from(trunc as i64))
	} else {
		None
	}
}

fn unsigned(wide: f64, max: u64) -> Option<Value> {
	let trunc = wide.trunc();
	if trunc >= 0.0 && trunc <= max as f64 {
		Some(Value::from(trunc as u64))
	} else {
		None
	}
}
