use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured representation of a user, produced by the LLM query parser and
/// read-only to the recommendation pipeline.
///
/// Every collection deserializes `null` to empty at this boundary so the
/// scoring and prompt-building code never sees a missing container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
	#[serde(default)]
	pub user_id: String,
	#[serde(default)]
	pub name: String,
	#[serde(default, deserialize_with = "crate::nullable::or_default")]
	pub interests: Vec<String>,
	#[serde(default, deserialize_with = "crate::nullable::or_default")]
	pub preferences: Preferences,
	#[serde(default, deserialize_with = "crate::nullable::or_default")]
	pub demographics: Demographics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
	#[serde(default)]
	pub role: Option<String>,
	#[serde(default)]
	pub location: Option<String>,
	#[serde(default)]
	pub remote: Option<bool>,
	#[serde(default)]
	pub hybrid: Option<bool>,
	#[serde(default)]
	pub sponsorship: Option<bool>,
	#[serde(default)]
	pub posted_days_ago: Option<i64>,
	#[serde(default, deserialize_with = "crate::nullable::or_default")]
	pub companies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Demographics {
	#[serde(default, deserialize_with = "crate::nullable::or_default")]
	pub skills: Vec<String>,
	#[serde(default, deserialize_with = "crate::nullable::or_default")]
	pub industries: Vec<String>,
	#[serde(default)]
	pub experience: Option<String>,
}

impl Profile {
	/// Fill generated fields and enforce cross-field rules after extraction.
	///
	/// `remote` wins over `hybrid` when the extractor sets both.
	pub fn normalize(&mut self) {
		if self.user_id.trim().is_empty() {
			self.user_id = Uuid::new_v4().simple().to_string();
		}
		if self.name.trim().is_empty() || self.name.starts_with("user_") {
			let prefix: String = self.user_id.chars().take(8).collect();

			self.name = format!("user_{prefix}");
		}
		if self.preferences.remote == Some(true) {
			self.preferences.hybrid = Some(false);
		}
	}

	/// Terms that describe the user for lexical matching: interests, skills,
	/// industries, and the preferred role.
	pub fn terms(&self) -> Vec<String> {
		let mut terms = Vec::with_capacity(
			self.interests.len()
				+ self.demographics.skills.len()
				+ self.demographics.industries.len()
				+ 1,
		);

		terms.extend(self.interests.iter().cloned());
		terms.extend(self.demographics.skills.iter().cloned());
		terms.extend(self.demographics.industries.iter().cloned());

		if let Some(role) = self.preferences.role.as_deref()
			&& !role.trim().is_empty()
		{
			terms.push(role.to_string());
		}

		terms
	}
}
