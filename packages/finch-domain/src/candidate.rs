use serde::{Deserialize, Serialize};

/// Upstream a candidate was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
	WebSearch,
	Books,
	Movies,
	Jooble,
	Adzuna,
}
impl Source {
	/// Stable key used in config tables (interest synonyms, source bias).
	pub fn key(self) -> &'static str {
		match self {
			Self::WebSearch => "web_search",
			Self::Books => "books",
			Self::Movies => "movies",
			Self::Jooble => "jooble",
			Self::Adzuna => "adzuna",
		}
	}

	pub fn is_job_board(self) -> bool {
		matches!(self, Self::Jooble | Self::Adzuna)
	}
}

/// One fetched, not-yet-ranked item normalized to a common shape.
///
/// Candidates are request-scoped accumulators: connectors create them, the
/// scorer overwrites `relevance_score`, and the re-ranker attaches
/// `explanation` and `llm_score` on its success path only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
	pub title: String,
	#[serde(default)]
	pub snippet: String,
	#[serde(default)]
	pub link: String,
	pub source: Source,
	pub source_name: String,
	#[serde(default)]
	pub relevance_score: f32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub explanation: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub llm_score: Option<f32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub company: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub job_type: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub authors: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub published_date: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub release_date: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub posted_date: Option<String>,
}
impl Candidate {
	pub fn new(
		source: Source,
		source_name: impl Into<String>,
		title: impl Into<String>,
		link: impl Into<String>,
		snippet: impl Into<String>,
	) -> Self {
		Self {
			title: title.into(),
			snippet: snippet.into(),
			link: link.into(),
			source,
			source_name: source_name.into(),
			relevance_score: 0.0,
			explanation: None,
			llm_score: None,
			company: None,
			location: None,
			job_type: None,
			authors: Vec::new(),
			published_date: None,
			release_date: None,
			posted_date: None,
		}
	}

	/// The date string the recency boost should consider, in preference
	/// order: published, then release, then posted.
	pub fn date_field(&self) -> Option<&str> {
		[self.published_date.as_deref(), self.release_date.as_deref(), self.posted_date.as_deref()]
			.into_iter()
			.flatten()
			.map(str::trim)
			.find(|raw| !raw.is_empty())
	}
}
