pub mod books;
pub mod jobs;
pub mod llm;
pub mod movies;
pub mod web;

mod error;

pub use error::{Error, Result};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

/// Upstream descriptions get cut to this many characters before use as a
/// candidate snippet.
pub(crate) const SNIPPET_MAX_CHARS: usize = 200;

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

pub(crate) fn text_field(value: &Value, key: &str) -> String {
	value.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

pub(crate) fn truncate_snippet(text: &str) -> String {
	if text.chars().count() <= SNIPPET_MAX_CHARS {
		return text.to_string();
	}

	let mut snippet: String = text.chars().take(SNIPPET_MAX_CHARS).collect();

	snippet.push_str("...");

	snippet
}
