use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Result, text_field, truncate_snippet};
use finch_config::ConnectorConfig;
use finch_domain::{Candidate, Source};

const SOURCE_NAME: &str = "Google Books";

/// Search a Google-Books-compatible volumes endpoint.
pub async fn search(cfg: &ConnectorConfig, query: &str) -> Result<Vec<Candidate>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let json: Value = client
		.get(&cfg.api_base)
		.query(&[
			("q", query.to_string()),
			("maxResults", cfg.limit.to_string()),
			("key", cfg.api_key.clone()),
		])
		.send()
		.await?
		.error_for_status()?
		.json()
		.await?;

	Ok(parse_volumes_response(json))
}

fn parse_volumes_response(json: Value) -> Vec<Candidate> {
	let items = match json.get("items").and_then(Value::as_array) {
		Some(items) => items,
		None => return Vec::new(),
	};

	items
		.iter()
		.map(|item| {
			let info = item.get("volumeInfo").cloned().unwrap_or_default();
			let description = text_field(&info, "description");
			let mut candidate = Candidate::new(
				Source::Books,
				SOURCE_NAME,
				text_field(&info, "title"),
				text_field(&info, "infoLink"),
				truncate_snippet(&description),
			);

			candidate.authors = info
				.get("authors")
				.and_then(Value::as_array)
				.map(|authors| {
					authors.iter().filter_map(Value::as_str).map(str::to_string).collect()
				})
				.unwrap_or_default();
			candidate.published_date = info
				.get("publishedDate")
				.and_then(Value::as_str)
				.filter(|raw| !raw.is_empty())
				.map(str::to_string);

			candidate
		})
		.collect()
}
