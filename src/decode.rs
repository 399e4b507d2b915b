use serde_json::{Map, Value};

use crate::error::{FillError, Result};
use crate::value::kind_name;

/// Decode raw document bytes into a dynamic object.
///
/// The decoder adapter of the engine: it only parses the byte stream into a
/// generic value tree and checks the root is an object. Absent struct fields
/// are simply missing keys; number width conversion belongs to the merge
/// engine, not here.
pub fn decode_document(data: &[u8]) -> Result<Map<String, Value>> {
	let value: Value = serde_json::from_slice(data).map_err(FillError::Decode)?;
	match value {
		Value::Object(map) => Ok(map),
		other => Err(FillError::DocumentNotObject { got: kind_name(&other) }),
	}
}

#[cfg(test)]
mod tests {
	use super::decode_document;
	use crate::error::FillError;

	#[test]
	fn object_root_decodes() {
		let map = decode_document(br#"{"port": 80}"#).expect("document decodes");
		assert_eq!(map.len(), 1);
	}

	#[test]
	fn malformed_input_is_surfaced() {
		assert!(matches!(decode_document(b"{"), Err(FillError::Decode(_))));
	}

	#[test]
	fn non_object_root_is_rejected() {
		let err = decode_document(b"[1, 2]").expect_err("array root rejected");
		assert!(matches!(err, FillError::DocumentNotObject { got: "array" }));
	}
}
