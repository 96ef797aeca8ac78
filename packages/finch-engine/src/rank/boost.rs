//! Rule-based score adjustments applied after the lexical base score.
//!
//! Each rule is a pure `(candidate, context, score) -> score` function and
//! [`RULES`] fixes the application order; reordering changes final scores.
//! The interest rule multiplies, everything else adds `ln(1 + score * w)` or
//! a flat bias, so a zero base score stays zero through the log rules.

use std::collections::HashMap;

use time::OffsetDateTime;

use finch_config::Ranking;
use finch_domain::{Candidate, Profile, dates};

use crate::aggregate;

pub struct BoostContext<'a> {
	pub profile: &'a Profile,
	pub ranking: &'a Ranking,
	pub synonyms: &'a HashMap<String, Vec<String>>,
	pub now: OffsetDateTime,
}

pub type BoostRule = fn(&Candidate, &BoostContext<'_>, f32) -> f32;

pub const RULES: &[(&str, BoostRule)] = &[
	("interest", interest),
	("recency", recency),
	("location", location),
	("work_mode", work_mode),
	("company", company),
	("source_bias", source_bias),
];

pub fn apply(candidate: &Candidate, ctx: &BoostContext<'_>, base: f32) -> f32 {
	RULES.iter().fold(base, |score, (_, rule)| rule(candidate, ctx, score))
}

fn log_boost(score: f32, factor: f32) -> f32 {
	(score * factor).ln_1p()
}

/// Multiply when the candidate's source is one the user's interests point
/// at (same synonym table that gates connectors).
pub fn interest(candidate: &Candidate, ctx: &BoostContext<'_>, score: f32) -> f32 {
	if aggregate::interest_match(candidate.source.key(), &ctx.profile.interests, ctx.synonyms) {
		score * ctx.ranking.interest_boost
	} else {
		score
	}
}

/// Additive freshness boost, tiered by age. Unparsable dates are ignored.
pub fn recency(candidate: &Candidate, ctx: &BoostContext<'_>, score: f32) -> f32 {
	let Some(raw) = candidate.date_field() else { return score };
	let Some(age) = dates::age_days(raw, ctx.now) else { return score };

	if age < ctx.ranking.fresh_age_days {
		score + log_boost(score, ctx.ranking.fresh_factor)
	} else if age < ctx.ranking.recent_age_days {
		score + log_boost(score, ctx.ranking.recent_factor)
	} else {
		score
	}
}

/// Job boards only: preferred location as a case-insensitive substring of
/// the listing's location.
pub fn location(candidate: &Candidate, ctx: &BoostContext<'_>, score: f32) -> f32 {
	if !candidate.source.is_job_board() {
		return score;
	}

	let Some(preferred) = ctx.profile.preferences.location.as_deref() else { return score };
	let preferred = preferred.trim().to_lowercase();

	if preferred.is_empty() {
		return score;
	}

	let Some(listing_location) = candidate.location.as_deref() else { return score };

	if listing_location.to_lowercase().contains(&preferred) {
		score + log_boost(score, ctx.ranking.location_factor)
	} else {
		score
	}
}

/// Remote/hybrid preference against the listing's location text. The remote
/// preference takes precedence when both flags are set.
pub fn work_mode(candidate: &Candidate, ctx: &BoostContext<'_>, score: f32) -> f32 {
	let Some(listing_location) = candidate.location.as_deref() else { return score };
	let lowered = listing_location.to_lowercase();

	if ctx.profile.preferences.remote == Some(true) {
		if lowered.contains("remote") {
			return score + log_boost(score, ctx.ranking.remote_factor);
		}

		return score;
	}
	if ctx.profile.preferences.hybrid == Some(true) && lowered.contains("hybrid") {
		return score + log_boost(score, ctx.ranking.hybrid_factor);
	}

	score
}

/// Any preferred company appearing in the listing's company name.
pub fn company(candidate: &Candidate, ctx: &BoostContext<'_>, score: f32) -> f32 {
	if ctx.profile.preferences.companies.is_empty() {
		return score;
	}

	let Some(listing_company) = candidate.company.as_deref() else { return score };
	let lowered = listing_company.to_lowercase();
	let matched = ctx.profile.preferences.companies.iter().any(|preferred| {
		let preferred = preferred.trim().to_lowercase();

		!preferred.is_empty() && lowered.contains(&preferred)
	});

	if matched { score + log_boost(score, ctx.ranking.company_factor) } else { score }
}

/// Flat configured bias per job-board source.
pub fn source_bias(candidate: &Candidate, ctx: &BoostContext<'_>, score: f32) -> f32 {
	if !candidate.source.is_job_board() {
		return score;
	}

	match ctx.ranking.source_bias.get(candidate.source.key()) {
		Some(bias) => score + bias,
		None => score,
	}
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use finch_domain::Source;

	use super::*;

	fn test_context<'a>(
		profile: &'a Profile,
		ranking: &'a Ranking,
		synonyms: &'a HashMap<String, Vec<String>>,
	) -> BoostContext<'a> {
		BoostContext { profile, ranking, synonyms, now: datetime!(2024-03-10 00:00:00 UTC) }
	}

	fn book_synonyms() -> HashMap<String, Vec<String>> {
		HashMap::from([(
			"books".to_string(),
			vec!["books".to_string(), "reading".to_string()],
		)])
	}

	#[test]
	fn interest_multiplies_matching_sources() {
		let mut profile = Profile::default();

		profile.interests = vec!["Reading".to_string()];

		let ranking = Ranking::default();
		let synonyms = book_synonyms();
		let ctx = test_context(&profile, &ranking, &synonyms);
		let book = Candidate::new(Source::Books, "Books", "t", "l", "s");
		let web = Candidate::new(Source::WebSearch, "Web", "t", "l", "s");

		assert_eq!(interest(&book, &ctx, 10.0), 15.0);
		assert_eq!(interest(&web, &ctx, 10.0), 10.0);
	}

	#[test]
	fn recency_tiers_by_age() {
		let profile = Profile::default();
		let ranking = Ranking::default();
		let synonyms = HashMap::new();
		let ctx = test_context(&profile, &ranking, &synonyms);
		let mut fresh = Candidate::new(Source::Books, "Books", "t", "l", "s");
		let mut recent = fresh.clone();
		let mut stale = fresh.clone();

		fresh.published_date = Some("2024-03-08".to_string());
		recent.published_date = Some("2024-02-20".to_string());
		stale.published_date = Some("2023-01-01".to_string());

		let fresh_score = recency(&fresh, &ctx, 10.0);
		let recent_score = recency(&recent, &ctx, 10.0);

		assert!((fresh_score - (10.0 + 4.0_f32.ln())).abs() < 1e-4);
		assert!((recent_score - (10.0 + 2.5_f32.ln())).abs() < 1e-4);
		assert_eq!(recency(&stale, &ctx, 10.0), 10.0);
	}

	#[test]
	fn recency_ignores_unparsable_dates() {
		let profile = Profile::default();
		let ranking = Ranking::default();
		let synonyms = HashMap::new();
		let ctx = test_context(&profile, &ranking, &synonyms);
		let mut candidate = Candidate::new(Source::Books, "Books", "t", "l", "s");

		candidate.published_date = Some("sometime last week".to_string());

		assert_eq!(recency(&candidate, &ctx, 10.0), 10.0);
	}

	#[test]
	fn location_matches_substring_on_job_boards_only() {
		let mut profile = Profile::default();

		profile.preferences.location = Some("berlin".to_string());

		let ranking = Ranking::default();
		let synonyms = HashMap::new();
		let ctx = test_context(&profile, &ranking, &synonyms);
		let mut job = Candidate::new(Source::Jooble, "Jooble", "t", "l", "s");

		job.location = Some("Berlin, Germany".to_string());

		let mut web = Candidate::new(Source::WebSearch, "Web", "t", "l", "s");

		web.location = Some("Berlin, Germany".to_string());

		assert!(location(&job, &ctx, 10.0) > 10.0);
		assert_eq!(location(&web, &ctx, 10.0), 10.0);
	}

	#[test]
	fn remote_takes_precedence_over_hybrid() {
		let mut profile = Profile::default();

		profile.preferences.remote = Some(true);
		profile.preferences.hybrid = Some(true);

		let ranking = Ranking::default();
		let synonyms = HashMap::new();
		let ctx = test_context(&profile, &ranking, &synonyms);
		let mut hybrid_listing = Candidate::new(Source::Jooble, "Jooble", "t", "l", "s");

		hybrid_listing.location = Some("Hybrid - Munich".to_string());

		// Remote preference is checked first and does not match, so the
		// hybrid flag is never consulted.
		assert_eq!(work_mode(&hybrid_listing, &ctx, 10.0), 10.0);

		let mut remote_listing = Candidate::new(Source::Jooble, "Jooble", "t", "l", "s");

		remote_listing.location = Some("Remote (EU)".to_string());

		assert!(work_mode(&remote_listing, &ctx, 10.0) > 10.0);
	}

	#[test]
	fn company_matches_any_preferred_substring() {
		let mut profile = Profile::default();

		profile.preferences.companies = vec!["acme".to_string(), "initech".to_string()];

		let ranking = Ranking::default();
		let synonyms = HashMap::new();
		let ctx = test_context(&profile, &ranking, &synonyms);
		let mut job = Candidate::new(Source::Adzuna, "Adzuna", "t", "l", "s");

		job.company = Some("Initech GmbH".to_string());

		assert!(company(&job, &ctx, 10.0) > 10.0);

		job.company = Some("Globex".to_string());

		assert_eq!(company(&job, &ctx, 10.0), 10.0);
	}

	#[test]
	fn source_bias_reads_config_table() {
		let profile = Profile::default();
		let mut ranking = Ranking::default();

		ranking.source_bias = HashMap::from([("jooble".to_string(), 2.0)]);

		let synonyms = HashMap::new();
		let ctx = test_context(&profile, &ranking, &synonyms);
		let jooble = Candidate::new(Source::Jooble, "Jooble", "t", "l", "s");
		let adzuna = Candidate::new(Source::Adzuna, "Adzuna", "t", "l", "s");
		let web = Candidate::new(Source::WebSearch, "Web", "t", "l", "s");

		assert_eq!(source_bias(&jooble, &ctx, 10.0), 12.0);
		assert_eq!(source_bias(&adzuna, &ctx, 10.0), 10.0);
		assert_eq!(source_bias(&web, &ctx, 10.0), 10.0);
	}

	#[test]
	fn log_rules_leave_zero_scores_at_zero() {
		let mut profile = Profile::default();

		profile.preferences.remote = Some(true);
		profile.preferences.location = Some("berlin".to_string());

		let ranking = Ranking::default();
		let synonyms = HashMap::new();
		let ctx = test_context(&profile, &ranking, &synonyms);
		let mut job = Candidate::new(Source::Jooble, "Jooble", "t", "l", "s");

		job.location = Some("Remote - Berlin".to_string());

		assert_eq!(apply(&job, &ctx, 0.0), 0.0);
	}
}
