//! Job-board connectors.
//!
//! Both boards filter out listings missing the fields the scorer relies on,
//! and normalize the employment type so downstream consumers see one
//! vocabulary: Full-time, Part-time, Internship, Other.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Result, text_field};
use finch_config::{AdzunaConfig, ConnectorConfig};
use finch_domain::{Candidate, Source};

const JOOBLE_SOURCE_NAME: &str = "Jooble";
const ADZUNA_SOURCE_NAME: &str = "Adzuna";
const ACCEPTED_TYPES: [&str; 3] = ["Full-time", "Part-time", "Internship"];

/// Fetch listings from a Jooble-compatible board. The API key is a path
/// segment, not a query parameter.
pub async fn jooble(
	cfg: &ConnectorConfig,
	query: &str,
	location: Option<&str>,
) -> Result<Vec<Candidate>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}/{}", cfg.api_base.trim_end_matches('/'), cfg.api_key);
	let body = serde_json::json!({
		"keywords": query,
		"location": location.unwrap_or_default(),
		"page": 1,
		"searchMode": 1,
		"results": cfg.limit,
	});
	let json: Value =
		client.post(url).json(&body).send().await?.error_for_status()?.json().await?;

	Ok(parse_jooble_response(json))
}

fn parse_jooble_response(json: Value) -> Vec<Candidate> {
	let jobs = match json.get("jobs").and_then(Value::as_array) {
		Some(jobs) => jobs,
		None => return Vec::new(),
	};

	jobs.iter()
		.filter_map(|job| {
			let title = text_field(job, "title");
			let location = text_field(job, "location");
			let job_type = text_field(job, "type");
			let snippet = text_field(job, "snippet");
			let link = text_field(job, "link");

			if [&title, &location, &job_type, &snippet, &link].iter().any(|field| field.is_empty())
			{
				return None;
			}
			if !ACCEPTED_TYPES.contains(&job_type.as_str()) {
				return None;
			}

			let mut candidate =
				Candidate::new(Source::Jooble, JOOBLE_SOURCE_NAME, title, link, snippet);

			candidate.company = Some(text_field(job, "company")).filter(|raw| !raw.is_empty());
			candidate.location = Some(location);
			candidate.job_type = Some(job_type);
			candidate.posted_date =
				Some(text_field(job, "updated")).filter(|raw| !raw.is_empty());

			Some(candidate)
		})
		.collect()
}

/// Fetch listings from an Adzuna-compatible board.
pub async fn adzuna(
	cfg: &AdzunaConfig,
	query: &str,
	location: Option<&str>,
) -> Result<Vec<Candidate>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}/us/search/1", cfg.api_base.trim_end_matches('/'));
	let json: Value = client
		.get(url)
		.query(&[
			("app_id", cfg.app_id.clone()),
			("app_key", cfg.app_key.clone()),
			("results_per_page", cfg.limit.to_string()),
			("what", query.to_string()),
			("where", location.unwrap_or_default().to_string()),
		])
		.send()
		.await?
		.error_for_status()?
		.json()
		.await?;

	Ok(parse_adzuna_response(json))
}

fn parse_adzuna_response(json: Value) -> Vec<Candidate> {
	let results = match json.get("results").and_then(Value::as_array) {
		Some(results) => results,
		None => return Vec::new(),
	};

	results
		.iter()
		.filter_map(|job| {
			let title = text_field(job, "title");
			let description = text_field(job, "description");
			let link = text_field(job, "redirect_url");
			let location = job
				.get("location")
				.map(|value| text_field(value, "display_name"))
				.unwrap_or_default();
			let contract_time = text_field(job, "contract_time");

			if [&title, &description, &link, &location, &contract_time]
				.iter()
				.any(|field| field.is_empty())
			{
				return None;
			}

			let mut candidate =
				Candidate::new(Source::Adzuna, ADZUNA_SOURCE_NAME, title, link, description);

			candidate.company = job
				.get("company")
				.map(|value| text_field(value, "display_name"))
				.filter(|raw| !raw.is_empty());
			candidate.location = Some(location);
			candidate.job_type = Some(convert_contract_time(&contract_time).to_string());
			candidate.posted_date =
				Some(text_field(job, "created")).filter(|raw| !raw.is_empty());

			Some(candidate)
		})
		.collect()
}

fn convert_contract_time(contract_time: &str) -> &'static str {
	match contract_time {
		"full_time" => "Full-time",
		"part_time" => "Part-time",
		"intern" => "Internship",
		_ => "Other",
	}
}
