//! Turn a free-text query into a stored [`Profile`] via the LLM.

use tracing::info;

use finch_domain::Profile;

use crate::{Engine, Error, Result, extract};

const URGENCY_MARKERS: [&str; 4] = ["immediately", "right now", "urgent", "asap"];

impl Engine {
	/// Extract a profile from free text, persist it, and invalidate any
	/// cached data for that user.
	///
	/// Unlike the read path, extraction failures surface as errors; the
	/// caller asked for a write and needs to know it did not happen.
	pub async fn parse_profile(&self, text: &str) -> Result<Profile> {
		if text.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "Query text must be non-empty.".to_string(),
			});
		}

		let prompt = build_extraction_prompt(text);
		let raw = self.completer.complete(&prompt).await?;
		let profile = profile_from_response(&raw, text)?;

		self.save_profile(&profile).await?;
		info!(user_id = %profile.user_id, "Parsed and saved profile.");

		Ok(profile)
	}
}

fn build_extraction_prompt(text: &str) -> String {
	format!(
		"Extract structured information from this query: '{text}'.\n\n\
		 Return a valid JSON object that exactly follows this schema:\n\n\
		 {{\n\
		 \t\"user_id\": \"leave empty to have one generated\",\n\
		 \t\"name\": \"if mentioned, else leave empty\",\n\
		 \t\"interests\": [\"job-relevant interests such as AI, finance, gaming, healthcare, programming; ignore food, travel, and personal hobbies\"],\n\
		 \t\"preferences\": {{\n\
		 \t\t\"location\": \"if mentioned, else null\",\n\
		 \t\t\"remote\": true/false/null,\n\
		 \t\t\"hybrid\": true/false/null,\n\
		 \t\t\"sponsorship\": true/false/null,\n\
		 \t\t\"role\": \"if mentioned, else null\",\n\
		 \t\t\"posted_days_ago\": null,\n\
		 \t\t\"companies\": [\"preferred companies if mentioned, else empty list\"]\n\
		 \t}},\n\
		 \t\"demographics\": {{\n\
		 \t\t\"skills\": [\"technical skills if mentioned, else empty list\"],\n\
		 \t\t\"industries\": [\"industries if mentioned, else empty list\"]\n\
		 \t}}\n\
		 }}\n\n\
		 Strictly adhere to this format. Do not include any extra text, explanations, or other \
		 formatting. Ensure that \"remote\", \"hybrid\", and \"sponsorship\" are booleans or \
		 null. Return ONLY valid JSON."
	)
}

fn profile_from_response(raw: &str, original_query: &str) -> Result<Profile> {
	let object = extract::first_json_object(raw).ok_or_else(|| Error::Provider {
		message: "Extraction response does not contain a JSON object.".to_string(),
	})?;
	let mut profile: Profile = serde_json::from_str(object).map_err(|err| Error::Provider {
		message: format!("Extraction response is not a valid profile: {err}"),
	})?;

	profile.normalize();

	let lowered = original_query.to_lowercase();

	if URGENCY_MARKERS.iter().any(|marker| lowered.contains(marker)) {
		profile.preferences.posted_days_ago = Some(0);
	}

	Ok(profile)
}
