//! Serde helper that treats an explicit JSON `null` as the field's default.
//!
//! Upstream LLM extraction and stored profiles routinely carry `null` where a
//! list or object is expected. `#[serde(default)]` alone only covers absent
//! fields, so nullable fields deserialize through here instead.

use serde::{Deserialize, Deserializer};

pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
	use serde::Deserialize;

	#[derive(Debug, Default, Deserialize)]
	struct Holder {
		#[serde(default, deserialize_with = "super::or_default")]
		items: Vec<String>,
	}

	#[test]
	fn null_becomes_empty() {
		let holder: Holder = serde_json::from_str(r#"{ "items": null }"#).expect("parse failed");

		assert!(holder.items.is_empty());
	}

	#[test]
	fn absent_becomes_empty() {
		let holder: Holder = serde_json::from_str("{}").expect("parse failed");

		assert!(holder.items.is_empty());
	}

	#[test]
	fn present_is_kept() {
		let holder: Holder =
			serde_json::from_str(r#"{ "items": ["a", "b"] }"#).expect("parse failed");

		assert_eq!(holder.items, vec!["a".to_string(), "b".to_string()]);
	}
}
