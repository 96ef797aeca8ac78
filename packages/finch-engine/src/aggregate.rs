//! Fan a query out to the active connectors and merge the results.
//!
//! Connectors run concurrently under a bounded semaphore. A connector that
//! fails contributes nothing and never aborts the others. Merging
//! deduplicates by link with last-writer-wins in connector registration
//! order, so the completion order of the concurrent fetches cannot change
//! the outcome.

use std::{collections::HashMap, sync::Arc};

use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, warn};

use finch_config::Recommend;
use finch_domain::{Candidate, Profile};

use crate::Connector;

/// Whether one of the user's interests names this source in the synonym
/// table. Sources without a table entry never match.
pub fn interest_match(
	source_key: &str,
	interests: &[String],
	synonyms: &HashMap<String, Vec<String>>,
) -> bool {
	synonyms.get(source_key).is_some_and(|entries| {
		entries
			.iter()
			.any(|synonym| interests.iter().any(|interest| interest.eq_ignore_ascii_case(synonym)))
	})
}

/// Whether a connector should run for this profile. Sources absent from the
/// synonym table are base connectors and always run.
pub fn connector_active(
	source_key: &str,
	interests: &[String],
	synonyms: &HashMap<String, Vec<String>>,
) -> bool {
	!synonyms.contains_key(source_key) || interest_match(source_key, interests, synonyms)
}

pub async fn aggregate(
	connectors: &[Arc<dyn Connector>],
	recommend: &Recommend,
	synonyms: &HashMap<String, Vec<String>>,
	query: &str,
	location: Option<&str>,
	profile: &Profile,
) -> Vec<Candidate> {
	let selected: Vec<Arc<dyn Connector>> = connectors
		.iter()
		.filter(|connector| {
			connector_active(connector.source().key(), &profile.interests, synonyms)
		})
		.cloned()
		.collect();
	let semaphore = Arc::new(Semaphore::new(recommend.connector_concurrency as usize));
	let mut tasks = JoinSet::new();

	for (index, connector) in selected.iter().enumerate() {
		let connector = connector.clone();
		let semaphore = semaphore.clone();
		let query = query.to_string();
		let location = location.map(str::to_string);

		tasks.spawn(async move {
			let _permit = semaphore.acquire_owned().await.ok();
			let label = connector.label().to_string();
			let fetched = connector.fetch(&query, location.as_deref()).await;

			(index, label, fetched)
		});
	}

	let mut batches: Vec<Vec<Candidate>> = vec![Vec::new(); selected.len()];

	while let Some(joined) = tasks.join_next().await {
		match joined {
			Ok((index, label, Ok(candidates))) => {
				debug!(connector = %label, count = candidates.len(), "Connector returned candidates.");

				batches[index] = candidates;
			},
			Ok((_, label, Err(err))) => {
				warn!(connector = %label, %err, "Connector fetch failed; continuing without it.");
			},
			Err(err) => {
				warn!(%err, "Connector task failed to join.");
			},
		}
	}

	merge(batches)
}

fn merge(batches: Vec<Vec<Candidate>>) -> Vec<Candidate> {
	let mut by_link: HashMap<String, Candidate> = HashMap::new();

	for batch in batches {
		for candidate in batch {
			by_link.insert(candidate.link.clone(), candidate);
		}
	}

	by_link.into_values().collect()
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use finch_domain::Source;

	use super::*;
	use crate::{BoxFuture, Error, Result};

	struct FixedConnector {
		source: Source,
		label: String,
		candidates: Vec<Candidate>,
		calls: AtomicUsize,
	}
	impl FixedConnector {
		fn new(source: Source, label: &str, candidates: Vec<Candidate>) -> Self {
			Self {
				source,
				label: label.to_string(),
				candidates,
				calls: AtomicUsize::new(0),
			}
		}
	}
	impl Connector for FixedConnector {
		fn source(&self) -> Source {
			self.source
		}

		fn label(&self) -> &str {
			&self.label
		}

		fn fetch<'a>(
			&'a self,
			_query: &'a str,
			_location: Option<&'a str>,
		) -> BoxFuture<'a, Result<Vec<Candidate>>> {
			self.calls.fetch_add(1, Ordering::SeqCst);

			let candidates = self.candidates.clone();

			Box::pin(async move { Ok(candidates) })
		}
	}

	struct BrokenConnector;
	impl Connector for BrokenConnector {
		fn source(&self) -> Source {
			Source::WebSearch
		}

		fn label(&self) -> &str {
			"broken"
		}

		fn fetch<'a>(
			&'a self,
			_query: &'a str,
			_location: Option<&'a str>,
		) -> BoxFuture<'a, Result<Vec<Candidate>>> {
			Box::pin(async move {
				Err(Error::Provider { message: "upstream exploded".to_string() })
			})
		}
	}

	fn candidate(source: Source, link: &str, title: &str) -> Candidate {
		Candidate::new(source, "Test", title, link, "snippet")
	}

	fn book_synonyms() -> HashMap<String, Vec<String>> {
		HashMap::from([("books".to_string(), vec!["books".to_string(), "reading".to_string()])])
	}

	#[test]
	fn interest_match_requires_table_entry() {
		let synonyms = book_synonyms();
		let interests = vec!["Reading".to_string()];

		assert!(interest_match("books", &interests, &synonyms));
		assert!(!interest_match("web_search", &interests, &synonyms));
		assert!(!interest_match("books", &[], &synonyms));
	}

	#[test]
	fn ungated_sources_are_always_active() {
		let synonyms = book_synonyms();

		assert!(connector_active("web_search", &[], &synonyms));
		assert!(!connector_active("books", &[], &synonyms));
		assert!(connector_active("books", &["books".to_string()], &synonyms));
	}

	#[tokio::test]
	async fn gated_connector_skipped_without_interest() {
		let web = Arc::new(FixedConnector::new(
			Source::WebSearch,
			"web",
			vec![candidate(Source::WebSearch, "https://a", "A")],
		));
		let books = Arc::new(FixedConnector::new(
			Source::Books,
			"books",
			vec![candidate(Source::Books, "https://b", "B")],
		));
		let connectors: Vec<Arc<dyn Connector>> = vec![web.clone(), books.clone()];
		let profile = Profile::default();
		let merged = aggregate(
			&connectors,
			&Recommend::default(),
			&book_synonyms(),
			"query",
			None,
			&profile,
		)
		.await;

		assert_eq!(merged.len(), 1);
		assert_eq!(web.calls.load(Ordering::SeqCst), 1);
		assert_eq!(books.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn duplicate_links_keep_the_later_connector() {
		let mut early = candidate(Source::WebSearch, "https://shared", "Early");
		let mut late = candidate(Source::Books, "https://shared", "Late");

		early.snippet = "from web".to_string();
		late.snippet = "from books".to_string();

		let connectors: Vec<Arc<dyn Connector>> = vec![
			Arc::new(FixedConnector::new(Source::WebSearch, "web", vec![early])),
			Arc::new(FixedConnector::new(Source::Books, "books", vec![late])),
		];
		let mut profile = Profile::default();

		profile.interests = vec!["books".to_string()];

		let merged = aggregate(
			&connectors,
			&Recommend::default(),
			&book_synonyms(),
			"query",
			None,
			&profile,
		)
		.await;

		assert_eq!(merged.len(), 1);
		assert_eq!(merged[0].title, "Late");
		assert_eq!(merged[0].snippet, "from books");
	}

	#[tokio::test]
	async fn failing_connector_does_not_abort_the_rest() {
		let connectors: Vec<Arc<dyn Connector>> = vec![
			Arc::new(BrokenConnector),
			Arc::new(FixedConnector::new(
				Source::Jooble,
				"jooble",
				vec![candidate(Source::Jooble, "https://job", "Job")],
			)),
		];
		let profile = Profile::default();
		let merged = aggregate(
			&connectors,
			&Recommend::default(),
			&HashMap::new(),
			"query",
			None,
			&profile,
		)
		.await;

		assert_eq!(merged.len(), 1);
		assert_eq!(merged[0].title, "Job");
	}
}
