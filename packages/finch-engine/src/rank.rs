//! The relevance scorer: TF-IDF cosine similarity against the profile,
//! scaled to 0-100, adjusted by the boost rules, stably sorted descending.

pub mod boost;
pub mod text;

use std::{cmp::Ordering, collections::HashMap};

use time::OffsetDateTime;

use finch_config::Ranking;
use finch_domain::{Candidate, Profile};

use crate::rank::boost::BoostContext;

/// Score every candidate against the profile and sort descending.
///
/// Every returned record carries a numeric `relevance_score`; a profile with
/// no usable terms zeroes all scores and leaves the input order untouched.
/// Records are never added or dropped.
pub fn score_candidates(
	mut candidates: Vec<Candidate>,
	profile: &Profile,
	ranking: &Ranking,
	synonyms: &HashMap<String, Vec<String>>,
	now: OffsetDateTime,
) -> Vec<Candidate> {
	if candidates.is_empty() {
		return candidates;
	}

	let profile_tokens = text::tokenize(&profile.terms().join(" "));

	if profile_tokens.is_empty() {
		for candidate in &mut candidates {
			candidate.relevance_score = 0.0;
		}

		return candidates;
	}

	let mut documents: Vec<Vec<String>> =
		candidates.iter().map(|candidate| text::tokenize(&text::candidate_document(candidate))).collect();

	documents.push(profile_tokens);

	let vectors = text::tfidf_vectors(&documents);
	let Some((profile_vector, candidate_vectors)) = vectors.split_last() else {
		return candidates;
	};
	let ctx = BoostContext { profile, ranking, synonyms, now };

	for (candidate, vector) in candidates.iter_mut().zip(candidate_vectors) {
		let base = text::cosine(profile_vector, vector) * 100.0;
		let boosted = boost::apply(candidate, &ctx, base);

		candidate.relevance_score = round2(boosted);
	}

	candidates.sort_by(|a, b| {
		b.relevance_score.partial_cmp(&a.relevance_score).unwrap_or(Ordering::Equal)
	});

	candidates
}

fn round2(score: f32) -> f32 {
	(score * 100.0).round() / 100.0
}
