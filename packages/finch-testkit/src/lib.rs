//! Shared fakes and fixtures for engine and API tests: a canned config, a
//! counting connector, a scripted completer, and a counting re-ranker.
//! Counters are `Arc<AtomicUsize>` so tests can keep a handle after the
//! fake moves into the engine.

use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};

use finch_config::{
	AdzunaConfig, Config, ConnectorConfig, LlmProviderConfig, Providers, Ranking, Recommend,
	Service, Sources,
};
use finch_domain::{Candidate, Profile, Source};
use finch_engine::{
	BoxFuture, Completer, Connector, Error, IdentityReranker, Reranker, Result,
};

pub fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		providers: Providers {
			llm: LlmProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:0".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "test-model".to_string(),
				temperature: 0.0,
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
			web_search: test_connector_config(),
			books: test_connector_config(),
			movies: test_connector_config(),
			jooble: test_connector_config(),
			adzuna: AdzunaConfig {
				enabled: true,
				api_base: "http://127.0.0.1:0".to_string(),
				app_id: "test-id".to_string(),
				app_key: "test-key".to_string(),
				timeout_ms: 1_000,
				limit: 5,
			},
		},
		recommend: Recommend::default(),
		ranking: Ranking::default(),
		sources: Sources::default(),
	}
}

fn test_connector_config() -> ConnectorConfig {
	ConnectorConfig {
		enabled: true,
		api_base: "http://127.0.0.1:0".to_string(),
		api_key: "test-key".to_string(),
		timeout_ms: 1_000,
		limit: 5,
	}
}

pub fn sample_profile(user_id: &str) -> Profile {
	let mut profile = Profile {
		user_id: user_id.to_string(),
		name: "Test User".to_string(),
		..Profile::default()
	};

	profile.interests = vec!["AI".to_string()];
	profile.demographics.skills = vec!["Python".to_string()];

	profile
}

pub fn candidate(source: Source, title: &str, link: &str, snippet: &str) -> Candidate {
	Candidate::new(source, "Test Source", title, link, snippet)
}

/// Connector returning a fixed batch and counting invocations.
pub struct StaticConnector {
	source: Source,
	label: String,
	candidates: Vec<Candidate>,
	calls: Arc<AtomicUsize>,
}
impl StaticConnector {
	pub fn new(source: Source, label: &str, candidates: Vec<Candidate>) -> Self {
		Self {
			source,
			label: label.to_string(),
			candidates,
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn calls(&self) -> Arc<AtomicUsize> {
		self.calls.clone()
	}
}
impl Connector for StaticConnector {
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

/// Connector that always fails, for failure-isolation tests.
pub struct FailingConnector {
	source: Source,
	label: String,
}
impl FailingConnector {
	pub fn new(source: Source, label: &str) -> Self {
		Self { source, label: label.to_string() }
	}
}
impl Connector for FailingConnector {
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
		Box::pin(async move {
			Err(Error::Provider { message: "connector unavailable".to_string() })
		})
	}
}

/// Completer that replays queued responses in order and counts calls. An
/// exhausted script fails the call, which exercises fallback paths.
pub struct ScriptedCompleter {
	responses: Mutex<Vec<String>>,
	calls: Arc<AtomicUsize>,
}
impl ScriptedCompleter {
	pub fn new(responses: Vec<&str>) -> Self {
		let mut queued: Vec<String> = responses.into_iter().map(str::to_string).collect();

		queued.reverse();

		Self { responses: Mutex::new(queued), calls: Arc::new(AtomicUsize::new(0)) }
	}

	pub fn calls(&self) -> Arc<AtomicUsize> {
		self.calls.clone()
	}
}
impl Completer for ScriptedCompleter {
	fn complete<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let next = self
			.responses
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.pop()
			.ok_or_else(|| Error::Provider { message: "completer script exhausted".to_string() });

		Box::pin(async move { next })
	}
}

/// Identity re-ranking plus a call counter, for cache-hit assertions.
pub struct CountingReranker {
	inner: IdentityReranker,
	calls: Arc<AtomicUsize>,
}
impl CountingReranker {
	pub fn new() -> Self {
		Self { inner: IdentityReranker, calls: Arc::new(AtomicUsize::new(0)) }
	}

	pub fn calls(&self) -> Arc<AtomicUsize> {
		self.calls.clone()
	}
}
impl Default for CountingReranker {
	fn default() -> Self {
		Self::new()
	}
}
impl Reranker for CountingReranker {
	fn rerank<'a>(
		&'a self,
		candidates: Vec<Candidate>,
		profile: &'a Profile,
		limit: usize,
	) -> BoxFuture<'a, Vec<Candidate>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		self.inner.rerank(candidates, profile, limit)
	}
}
