//! Second-pass re-ranking of the top scored candidates.
//!
//! [`LlmReranker`] asks the completion provider to select, order, and
//! explain a subset of the top candidates, then reconciles the index-based
//! answer with the original records. Every failure mode degrades to the
//! scorer's own order; the caller cannot tell the difference except for the
//! missing `explanation`/`llm_score` fields.

use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use finch_domain::{Candidate, Profile};

use crate::{BoxFuture, Completer, Reranker, extract};

/// The re-ranker never sees more than this many candidates, regardless of
/// the requested limit.
pub const RERANK_INPUT_CAP: usize = 20;

pub struct LlmReranker {
	completer: Arc<dyn Completer>,
}
impl LlmReranker {
	pub fn new(completer: Arc<dyn Completer>) -> Self {
		Self { completer }
	}
}
impl Reranker for LlmReranker {
	fn rerank<'a>(
		&'a self,
		candidates: Vec<Candidate>,
		profile: &'a Profile,
		limit: usize,
	) -> BoxFuture<'a, Vec<Candidate>> {
		Box::pin(async move {
			if candidates.is_empty() {
				return Vec::new();
			}

			let mut top = candidates;

			top.truncate(RERANK_INPUT_CAP);

			let prompt = build_rerank_prompt(&top, profile, limit);
			let raw = match self.completer.complete(&prompt).await {
				Ok(raw) => raw,
				Err(err) => {
					warn!(%err, "LLM re-rank call failed; falling back to scorer order.");

					return fallback(top, limit);
				},
			};

			match apply_ranked_response(&raw, &top, limit) {
				Some(reranked) => reranked,
				None => {
					warn!("LLM re-rank response had no usable JSON array; falling back to scorer order.");

					fallback(top, limit)
				},
			}
		})
	}
}

/// Returns the top `limit` candidates untouched. Stands in for the LLM in
/// tests and in deployments without a completion provider.
pub struct IdentityReranker;
impl Reranker for IdentityReranker {
	fn rerank<'a>(
		&'a self,
		mut candidates: Vec<Candidate>,
		_profile: &'a Profile,
		limit: usize,
	) -> BoxFuture<'a, Vec<Candidate>> {
		candidates.truncate(limit.min(RERANK_INPUT_CAP));

		Box::pin(async move { candidates })
	}
}

#[derive(Debug, Deserialize)]
struct RankedItem {
	result_index: i64,
	#[serde(default)]
	explanation: String,
	#[serde(default)]
	relevance_score: f32,
}

fn fallback(mut top: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
	top.truncate(limit);

	top
}

/// Map the LLM's 1-based indices back onto the truncated candidate list.
/// Out-of-range indices are skipped, not errors; `None` means the response
/// carried no decodable JSON array at all.
fn apply_ranked_response(raw: &str, top: &[Candidate], limit: usize) -> Option<Vec<Candidate>> {
	let array = extract::first_json_array(raw)?;
	let items: Vec<RankedItem> = serde_json::from_str(array).ok()?;
	let mut reranked = Vec::new();

	for item in items {
		if item.result_index < 1 {
			continue;
		}

		let Some(original) = top.get((item.result_index - 1) as usize) else {
			continue;
		};
		let mut chosen = original.clone();

		chosen.explanation = Some(item.explanation);
		chosen.llm_score = Some(item.relevance_score);
		reranked.push(chosen);

		if reranked.len() >= limit {
			break;
		}
	}

	Some(reranked)
}

fn build_rerank_prompt(top: &[Candidate], profile: &Profile, limit: usize) -> String {
	let mut listing = String::new();

	for (number, candidate) in top.iter().enumerate() {
		listing.push_str(&format!(
			"Result {}:\nTitle: {}\nSource: {}\nSnippet: {}\nRelevance Score: {}\n\n",
			number + 1,
			candidate.title,
			candidate.source_name,
			candidate.snippet,
			candidate.relevance_score,
		));
	}

	format!(
		"Given a user profile and a list of potential recommendations, select and rank the top \
		 {limit} recommendations that would be most valuable and relevant to this user.\n\n\
		 USER PROFILE:\n{}\n\
		 POTENTIAL RECOMMENDATIONS:\n{listing}\
		 For each selected recommendation, provide:\n\
		 1. The result number from the original list\n\
		 2. A personalized explanation of why this is relevant to the user (2-3 sentences)\n\
		 3. A relevance score from 1-100\n\n\
		 Format your response as a valid JSON array with objects containing fields: \
		 \"result_index\", \"explanation\", \"relevance_score\".",
		profile_summary(profile),
	)
}

/// Render the profile for the prompt; absent fields are omitted entirely.
fn profile_summary(profile: &Profile) -> String {
	let mut summary = String::new();

	if !profile.interests.is_empty() {
		summary.push_str(&format!("User Interests: {}\n", profile.interests.join(", ")));
	}
	if !profile.demographics.skills.is_empty() {
		summary.push_str(&format!("Skills: {}\n", profile.demographics.skills.join(", ")));
	}
	if !profile.demographics.industries.is_empty() {
		summary.push_str(&format!("Industries: {}\n", profile.demographics.industries.join(", ")));
	}
	if let Some(role) = profile.preferences.role.as_deref()
		&& !role.trim().is_empty()
	{
		summary.push_str(&format!("Role: {role}\n"));
	}
	if let Some(location) = profile.preferences.location.as_deref()
		&& !location.trim().is_empty()
	{
		summary.push_str(&format!("Location: {location}\n"));
	}
	if profile.preferences.remote == Some(true) {
		summary.push_str("Prefers remote work\n");
	} else if profile.preferences.hybrid == Some(true) {
		summary.push_str("Prefers hybrid work\n");
	}
	if summary.is_empty() {
		summary.push_str("No stated preferences.\n");
	}

	summary
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use finch_domain::Source;

	use super::*;
	use crate::{Error, Result};

	struct ScriptedCompleter {
		response: Result<String>,
		calls: AtomicUsize,
	}
	impl ScriptedCompleter {
		fn ok(response: &str) -> Self {
			Self { response: Ok(response.to_string()), calls: AtomicUsize::new(0) }
		}

		fn failing() -> Self {
			Self {
				response: Err(Error::Provider { message: "connection reset".to_string() }),
				calls: AtomicUsize::new(0),
			}
		}
	}
	impl Completer for ScriptedCompleter {
		fn complete<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String>> {
			self.calls.fetch_add(1, Ordering::SeqCst);

			let response = match &self.response {
				Ok(raw) => Ok(raw.clone()),
				Err(Error::Provider { message }) =>
					Err(Error::Provider { message: message.clone() }),
				Err(_) => Err(Error::Provider { message: "scripted".to_string() }),
			};

			Box::pin(async move { response })
		}
	}

	fn scored_candidates(count: usize) -> Vec<Candidate> {
		(0..count)
			.map(|index| {
				let mut candidate = Candidate::new(
					Source::WebSearch,
					"Google Search",
					format!("Result {index}"),
					format!("https://example.com/{index}"),
					"snippet",
				);

				candidate.relevance_score = (count - index) as f32;

				candidate
			})
			.collect()
	}

	#[tokio::test]
	async fn maps_one_based_indices_back_to_candidates() {
		let completer = Arc::new(ScriptedCompleter::ok(
			r#"Here is my ranking:
			[{"result_index": 2, "explanation": "x", "relevance_score": 80}]"#,
		));
		let reranker = LlmReranker::new(completer);
		let reranked =
			reranker.rerank(scored_candidates(3), &Profile::default(), 5).await;

		assert_eq!(reranked.len(), 1);
		assert_eq!(reranked[0].link, "https://example.com/1");
		assert_eq!(reranked[0].explanation.as_deref(), Some("x"));
		assert_eq!(reranked[0].llm_score, Some(80.0));
	}

	#[tokio::test]
	async fn out_of_range_indices_are_skipped() {
		let completer = Arc::new(ScriptedCompleter::ok(
			r#"[
				{"result_index": 99, "explanation": "bad", "relevance_score": 10},
				{"result_index": 0, "explanation": "bad", "relevance_score": 10},
				{"result_index": 1, "explanation": "good", "relevance_score": 90}
			]"#,
		));
		let reranker = LlmReranker::new(completer);
		let reranked =
			reranker.rerank(scored_candidates(3), &Profile::default(), 5).await;

		assert_eq!(reranked.len(), 1);
		assert_eq!(reranked[0].explanation.as_deref(), Some("good"));
	}

	#[tokio::test]
	async fn llm_order_is_preserved() {
		let completer = Arc::new(ScriptedCompleter::ok(
			r#"[
				{"result_index": 3, "explanation": "first pick", "relevance_score": 95},
				{"result_index": 1, "explanation": "second pick", "relevance_score": 60}
			]"#,
		));
		let reranker = LlmReranker::new(completer);
		let reranked =
			reranker.rerank(scored_candidates(3), &Profile::default(), 5).await;

		assert_eq!(reranked.len(), 2);
		assert_eq!(reranked[0].link, "https://example.com/2");
		assert_eq!(reranked[1].link, "https://example.com/0");
	}

	#[tokio::test]
	async fn never_returns_more_than_the_bound() {
		let response: Vec<String> = (1..=25)
			.map(|index| {
				format!(r#"{{"result_index": {index}, "explanation": "e", "relevance_score": 1}}"#)
			})
			.collect();
		let completer =
			Arc::new(ScriptedCompleter::ok(&format!("[{}]", response.join(","))));
		let reranker = LlmReranker::new(completer);
		let reranked =
			reranker.rerank(scored_candidates(30), &Profile::default(), 25).await;

		// Bounded by the 20-candidate prompt cap even though the response
		// references more.
		assert!(reranked.len() <= RERANK_INPUT_CAP);
	}

	#[tokio::test]
	async fn failed_call_falls_back_to_scorer_order() {
		let reranker = LlmReranker::new(Arc::new(ScriptedCompleter::failing()));
		let reranked =
			reranker.rerank(scored_candidates(5), &Profile::default(), 3).await;

		assert_eq!(reranked.len(), 3);
		assert_eq!(reranked[0].link, "https://example.com/0");
		assert!(reranked.iter().all(|candidate| candidate.explanation.is_none()));
		assert!(reranked.iter().all(|candidate| candidate.llm_score.is_none()));
	}

	#[tokio::test]
	async fn missing_json_array_falls_back() {
		let completer = Arc::new(ScriptedCompleter::ok("I could not rank these, sorry."));
		let reranker = LlmReranker::new(completer);
		let reranked =
			reranker.rerank(scored_candidates(4), &Profile::default(), 2).await;

		assert_eq!(reranked.len(), 2);
		assert!(reranked[0].explanation.is_none());
	}

	#[tokio::test]
	async fn empty_input_makes_no_call() {
		let completer = Arc::new(ScriptedCompleter::ok("[]"));
		let reranker = LlmReranker::new(completer.clone());
		let reranked = reranker.rerank(Vec::new(), &Profile::default(), 5).await;

		assert!(reranked.is_empty());
		assert_eq!(completer.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn identity_reranker_truncates_only() {
		let reranked =
			IdentityReranker.rerank(scored_candidates(5), &Profile::default(), 2).await;

		assert_eq!(reranked.len(), 2);
		assert_eq!(reranked[0].link, "https://example.com/0");
		assert!(reranked[0].explanation.is_none());
	}

	#[test]
	fn prompt_numbers_candidates_and_omits_absent_profile_fields() {
		let top = scored_candidates(2);
		let prompt = build_rerank_prompt(&top, &Profile::default(), 5);

		assert!(prompt.contains("Result 1:"));
		assert!(prompt.contains("Result 2:"));
		assert!(prompt.contains("No stated preferences."));
		assert!(!prompt.contains("User Interests:"));
	}

	#[test]
	fn prompt_includes_stated_profile_fields() {
		let mut profile = Profile::default();

		profile.interests = vec!["AI".to_string()];
		profile.preferences.role = Some("Data Scientist".to_string());
		profile.preferences.remote = Some(true);

		let prompt = build_rerank_prompt(&scored_candidates(1), &profile, 5);

		assert!(prompt.contains("User Interests: AI"));
		assert!(prompt.contains("Role: Data Scientist"));
		assert!(prompt.contains("Prefers remote work"));
	}
}
