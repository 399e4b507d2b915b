//! Construction-time registries consulted by the merge engine: sub-default
//! instances for collection element types, and typed validators keyed by
//! canonical field path.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{FillError, Result};

/// One registered element-type default.
pub(crate) struct SubDefault {
	/// Declared element type name this entry matches.
	pub type_name: Box<str>,
	/// Serialized default instance.
	pub value: Map<String, Value>,
}

/// Ordered sub-default entries; most recently registered first.
#[derive(Default)]
pub(crate) struct SubDefaults {
	entries: Vec<SubDefault>,
}

impl SubDefaults {
	/// Register an entry ahead of all existing ones.
	pub fn prepend(&mut self, type_name: &str, value: Map<String, Value>) {
		self.entries.insert(
			0,
			SubDefault {
				type_name: type_name.to_owned().into_boxed_str(),
				value,
			},
		);
	}

	/// First entry matching the element type name, scanning newest first.
	pub fn lookup(&self, type_name: &str) -> Option<&Map<String, Value>> {
		self.entries
			.iter()
			.find(|entry| &*entry.type_name == type_name)
			.map(|entry| &entry.value)
	}
}

/// Boxed predicate over the resolved dynamic field value.
pub(crate) type Check = Box<dyn Fn(&Value) -> Result<bool> + Send + Sync>;

/// Validators keyed by canonical dotted field path.
#[derive(Default)]
pub(crate) struct ValidatorSet {
	entries: HashMap<String, Check>,
}

impl ValidatorSet {
	/// Register a typed predicate at a path, replacing any prior one there.
	///
	/// The stored check deserializes the resolved value into `V` before
	/// invoking the predicate; a value the declared parameter type cannot
	/// represent fails the parse with [`FillError::ValidatorType`].
	pub fn insert<V, F>(&mut self, path: String, predicate: F)
	where
		V: DeserializeOwned,
		F: Fn(&V) -> bool + Send + Sync + 'static,
	{
		let key = path.clone();
		let check: Check = Box::new(move |value: &Value| {
			let typed: V = serde_json::from_value(value.clone()).map_err(|_| FillError::ValidatorType { path: path.clone() })?;
			Ok(predicate(&typed))
		});
		self.entries.insert(key, check);
	}

	/// Validator registered at the joined path, if any.
	pub fn get_joined(&self, segments: &[&str]) -> Option<&Check> {
		if self.entries.is_empty() {
			return None;
		}
		self.entries.get(&segments.join("."))
	}
}
