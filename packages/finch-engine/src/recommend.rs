//! The recommendation orchestrator: profile lookup → query build →
//! aggregate → score → re-rank → cache and return.

use time::OffsetDateTime;
use tracing::{debug, info};

use finch_domain::Candidate;

use crate::{Engine, aggregate, cache, query, rank};

#[derive(Debug, Clone, Default)]
pub struct RecommendRequest {
	pub user_id: String,
	/// Falls back to `recommend.default_limit` from config.
	pub limit: Option<usize>,
	/// Overrides the profile-derived search query.
	pub query: Option<String>,
	/// Overrides the profile's preferred location.
	pub location: Option<String>,
}
impl RecommendRequest {
	pub fn for_user(user_id: impl Into<String>) -> Self {
		Self { user_id: user_id.into(), ..Self::default() }
	}
}

impl Engine {
	/// Generate recommendations for a user.
	///
	/// "Nothing to recommend" — unknown user, store failure, every connector
	/// down — is an empty list, never an error. A cache hit short-circuits
	/// the whole pipeline and returns the stored list verbatim.
	pub async fn recommend(&self, request: &RecommendRequest) -> Vec<Candidate> {
		let limit = request.limit.unwrap_or(self.cfg.recommend.default_limit as usize);
		let key = cache::recommendation_cache_key(
			&request.user_id,
			limit,
			request.query.as_deref(),
			request.location.as_deref(),
		);

		if let Some(cached) = self.recommendation_cache.get(&key) {
			debug!(user_id = %request.user_id, "Recommendation cache hit.");

			return cached;
		}

		let Some(profile) = self.profile(&request.user_id).await else {
			info!(user_id = %request.user_id, "No profile found; nothing to recommend.");

			return Vec::new();
		};
		let search_query =
			request.query.clone().unwrap_or_else(|| query::generate_query(&profile));
		let location = request.location.clone().or_else(|| profile.preferences.location.clone());
		let candidates = aggregate::aggregate(
			&self.connectors,
			&self.cfg.recommend,
			&self.cfg.sources.synonyms,
			&search_query,
			location.as_deref(),
			&profile,
		)
		.await;

		debug!(user_id = %request.user_id, count = candidates.len(), "Aggregated candidates.");

		let scored = rank::score_candidates(
			candidates,
			&profile,
			&self.cfg.ranking,
			&self.cfg.sources.synonyms,
			OffsetDateTime::now_utc(),
		);
		let recommendations = self.reranker.rerank(scored, &profile, limit).await;

		info!(
			user_id = %request.user_id,
			count = recommendations.len(),
			"Returning recommendations.",
		);
		self.recommendation_cache.insert(key, recommendations.clone());

		recommendations
	}
}
