use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Result, text_field, truncate_snippet};
use finch_config::ConnectorConfig;
use finch_domain::{Candidate, Source};

const SOURCE_NAME: &str = "TMDB";
const MOVIE_LINK_BASE: &str = "https://www.themoviedb.org/movie";

/// Search a TMDB-compatible movie endpoint.
pub async fn search(cfg: &ConnectorConfig, query: &str) -> Result<Vec<Candidate>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let json: Value = client
		.get(&cfg.api_base)
		.query(&[
			("api_key", cfg.api_key.clone()),
			("query", query.to_string()),
			("page", "1".to_string()),
		])
		.send()
		.await?
		.error_for_status()?
		.json()
		.await?;

	Ok(parse_movies_response(json, cfg.limit as usize))
}

fn parse_movies_response(json: Value, limit: usize) -> Vec<Candidate> {
	let results = match json.get("results").and_then(Value::as_array) {
		Some(results) => results,
		None => return Vec::new(),
	};

	results
		.iter()
		.take(limit)
		.map(|result| {
			let link = result
				.get("id")
				.and_then(Value::as_i64)
				.map(|id| format!("{MOVIE_LINK_BASE}/{id}"))
				.unwrap_or_default();
			let overview = text_field(result, "overview");
			let mut candidate = Candidate::new(
				Source::Movies,
				SOURCE_NAME,
				text_field(result, "title"),
				link,
				truncate_snippet(&overview),
			);

			candidate.release_date = result
				.get("release_date")
				.and_then(Value::as_str)
				.filter(|raw| !raw.is_empty())
				.map(str::to_string);

			candidate
		})
		.collect()
}
