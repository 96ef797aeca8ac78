//! The recommendation core: candidate aggregation, relevance scoring, LLM
//! re-ranking, and the orchestration/caching around them.
//!
//! Everything external is a port: profile persistence ([`ProfileStore`]),
//! candidate sources ([`Connector`]), and the LLM ([`Completer`], wrapped by
//! a [`Reranker`] strategy). The engine never lets a collaborator failure
//! escape its read path; callers see an empty list, not an error.

pub mod aggregate;
pub mod cache;
pub mod parse;
pub mod profiles;
pub mod query;
pub mod rank;
pub mod recommend;
pub mod rerank;
pub mod store;

mod error;
mod extract;

pub use error::{Error, Result};
pub use recommend::RecommendRequest;
pub use rerank::{IdentityReranker, LlmReranker, RERANK_INPUT_CAP};
pub use store::MemoryProfileStore;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use finch_config::Config;
use finch_domain::{Candidate, Profile, Source};

use crate::cache::TtlCache;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Profile persistence, keyed by user id.
pub trait ProfileStore
where
	Self: Send + Sync,
{
	fn get<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Option<Profile>>>;

	fn save<'a>(&'a self, profile: &'a Profile) -> BoxFuture<'a, Result<()>>;

	fn delete<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<bool>>;
}

/// One candidate source. Implementations own their configured fetch limit
/// and must map upstream failures into [`Error`] rather than panicking.
pub trait Connector
where
	Self: Send + Sync,
{
	fn source(&self) -> Source;

	fn label(&self) -> &str;

	fn fetch<'a>(
		&'a self,
		query: &'a str,
		location: Option<&'a str>,
	) -> BoxFuture<'a, Result<Vec<Candidate>>>;
}

/// Single-shot text completion against the LLM.
pub trait Completer
where
	Self: Send + Sync,
{
	fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>>;
}

/// Second-pass re-ranking strategy. Infallible by contract: implementations
/// degrade to the scorer's own order instead of surfacing errors.
pub trait Reranker
where
	Self: Send + Sync,
{
	fn rerank<'a>(
		&'a self,
		candidates: Vec<Candidate>,
		profile: &'a Profile,
		limit: usize,
	) -> BoxFuture<'a, Vec<Candidate>>;
}

pub struct Engine {
	cfg: Config,
	profiles: Arc<dyn ProfileStore>,
	connectors: Vec<Arc<dyn Connector>>,
	completer: Arc<dyn Completer>,
	reranker: Arc<dyn Reranker>,
	profile_cache: TtlCache<Profile>,
	recommendation_cache: TtlCache<Vec<Candidate>>,
}
impl Engine {
	pub fn new(
		cfg: Config,
		profiles: Arc<dyn ProfileStore>,
		connectors: Vec<Arc<dyn Connector>>,
		completer: Arc<dyn Completer>,
		reranker: Arc<dyn Reranker>,
	) -> Self {
		let ttl = Duration::from_secs(cfg.recommend.cache_ttl_secs);

		Self {
			cfg,
			profiles,
			connectors,
			completer,
			reranker,
			profile_cache: TtlCache::new(ttl),
			recommendation_cache: TtlCache::new(ttl),
		}
	}

	pub fn config(&self) -> &Config {
		&self.cfg
	}
}
