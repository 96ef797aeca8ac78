use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result, text_field};
use finch_config::ConnectorConfig;
use finch_domain::{Candidate, Source};

const SOURCE_NAME: &str = "Google Search";

/// Fetch organic web results from a SerpAPI-compatible endpoint.
pub async fn search(cfg: &ConnectorConfig, query: &str) -> Result<Vec<Candidate>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let json: Value = client
		.get(&cfg.api_base)
		.query(&[
			("q", query.to_string()),
			("api_key", cfg.api_key.clone()),
			("engine", "google".to_string()),
			("num", cfg.limit.to_string()),
		])
		.send()
		.await?
		.error_for_status()?
		.json()
		.await?;

	parse_search_response(json)
}

fn parse_search_response(json: Value) -> Result<Vec<Candidate>> {
	if let Some(message) = json.get("error").and_then(Value::as_str) {
		return Err(Error::InvalidResponse { message: format!("Search API error: {message}") });
	}

	let results = match json.get("organic_results").and_then(Value::as_array) {
		Some(results) => results,
		None => return Ok(Vec::new()),
	};

	Ok(results
		.iter()
		.map(|result| {
			Candidate::new(
				Source::WebSearch,
				SOURCE_NAME,
				text_field(result, "title"),
				text_field(result, "link"),
				text_field(result, "snippet"),
			)
		})
		.collect())
}
