// std
use std::time::Duration;

// crates.io
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use crate::{Error, Result};
use finch_config::LlmProviderConfig;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_MS: u64 = 500;

/// Single-shot chat completion.
///
/// Transport failures (connect, timeout) and upstream 5xx responses are
/// retried up to [`MAX_ATTEMPTS`] times with a doubling backoff. A response
/// the API accepted but that carries no usable text is terminal and is never
/// retried here; callers decide what a missing completion means.
pub async fn complete(cfg: &LlmProviderConfig, prompt: &str) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let headers = crate::auth_headers(&cfg.api_key, &cfg.default_headers)?;
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": [{ "role": "user", "content": prompt }],
	});
	let mut delay = Duration::from_millis(RETRY_BASE_MS);
	let mut last_error = None;

	for attempt in 1..=MAX_ATTEMPTS {
		if attempt > 1 {
			tokio::time::sleep(delay).await;

			delay *= 2;
		}

		let response =
			match client.post(&url).headers(headers.clone()).json(&body).send().await {
				Ok(response) => response,
				Err(err) => {
					warn!(attempt, %err, "LLM request failed in transit.");

					last_error = Some(Error::Reqwest(err));

					continue;
				},
			};

		if response.status().is_server_error() {
			let status = response.status();

			warn!(attempt, %status, "LLM returned a server error.");

			last_error =
				Some(Error::InvalidResponse { message: format!("Server error: {status}.") });

			continue;
		}

		let json: Value = response.error_for_status()?.json().await?;

		return completion_text(json);
	}

	Err(last_error.unwrap_or_else(|| Error::InvalidResponse {
		message: "LLM retries exhausted.".to_string(),
	}))
}

fn completion_text(json: Value) -> Result<String> {
	json.get("choices")
		.and_then(Value::as_array)
		.and_then(|choices| choices.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|message| message.get("content"))
		.and_then(Value::as_str)
		.map(str::to_string)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion response is missing text content.".to_string(),
		})
}
