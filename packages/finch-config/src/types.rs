use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	#[serde(default)]
	pub recommend: Recommend,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub sources: Sources,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub llm: LlmProviderConfig,
	pub web_search: ConnectorConfig,
	pub books: ConnectorConfig,
	pub movies: ConnectorConfig,
	pub jooble: ConnectorConfig,
	pub adzuna: AdzunaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorConfig {
	#[serde(default = "default_true")]
	pub enabled: bool,
	pub api_base: String,
	pub api_key: String,
	pub timeout_ms: u64,
	pub limit: u32,
}

/// Adzuna authenticates with an application id/key pair instead of a single
/// key.
#[derive(Debug, Clone, Deserialize)]
pub struct AdzunaConfig {
	#[serde(default = "default_true")]
	pub enabled: bool,
	pub api_base: String,
	pub app_id: String,
	pub app_key: String,
	pub timeout_ms: u64,
	pub limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recommend {
	#[serde(default = "default_limit")]
	pub default_limit: u32,
	#[serde(default = "default_cache_ttl_secs")]
	pub cache_ttl_secs: u64,
	#[serde(default = "default_connector_concurrency")]
	pub connector_concurrency: u32,
}
impl Default for Recommend {
	fn default() -> Self {
		Self {
			default_limit: default_limit(),
			cache_ttl_secs: default_cache_ttl_secs(),
			connector_concurrency: default_connector_concurrency(),
		}
	}
}

/// Weights for the boost rules applied after the lexical base score.
///
/// `interest_boost` is multiplicative; the remaining factors feed additive
/// `ln(1 + score * factor)` adjustments. `source_bias` is a flat additive
/// bias per job-board source key.
#[derive(Debug, Clone, Deserialize)]
pub struct Ranking {
	#[serde(default = "default_interest_boost")]
	pub interest_boost: f32,
	#[serde(default = "default_fresh_age_days")]
	pub fresh_age_days: i64,
	#[serde(default = "default_fresh_factor")]
	pub fresh_factor: f32,
	#[serde(default = "default_recent_age_days")]
	pub recent_age_days: i64,
	#[serde(default = "default_recent_factor")]
	pub recent_factor: f32,
	#[serde(default = "default_location_factor")]
	pub location_factor: f32,
	#[serde(default = "default_remote_factor")]
	pub remote_factor: f32,
	#[serde(default = "default_hybrid_factor")]
	pub hybrid_factor: f32,
	#[serde(default = "default_company_factor")]
	pub company_factor: f32,
	#[serde(default)]
	pub source_bias: HashMap<String, f32>,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			interest_boost: default_interest_boost(),
			fresh_age_days: default_fresh_age_days(),
			fresh_factor: default_fresh_factor(),
			recent_age_days: default_recent_age_days(),
			recent_factor: default_recent_factor(),
			location_factor: default_location_factor(),
			remote_factor: default_remote_factor(),
			hybrid_factor: default_hybrid_factor(),
			company_factor: default_company_factor(),
			source_bias: HashMap::new(),
		}
	}
}

/// Interest gating. A connector whose source key appears here only runs when
/// one of the user's interests matches a synonym; sources without an entry
/// always run.
#[derive(Debug, Clone, Deserialize)]
pub struct Sources {
	#[serde(default = "default_synonyms")]
	pub synonyms: HashMap<String, Vec<String>>,
}
impl Default for Sources {
	fn default() -> Self {
		Self { synonyms: default_synonyms() }
	}
}

fn default_true() -> bool {
	true
}

fn default_limit() -> u32 {
	10
}

fn default_cache_ttl_secs() -> u64 {
	300
}

fn default_connector_concurrency() -> u32 {
	5
}

fn default_interest_boost() -> f32 {
	1.5
}

fn default_fresh_age_days() -> i64 {
	7
}

fn default_fresh_factor() -> f32 {
	0.3
}

fn default_recent_age_days() -> i64 {
	30
}

fn default_recent_factor() -> f32 {
	0.15
}

fn default_location_factor() -> f32 {
	0.3
}

fn default_remote_factor() -> f32 {
	0.4
}

fn default_hybrid_factor() -> f32 {
	0.3
}

fn default_company_factor() -> f32 {
	0.5
}

fn default_synonyms() -> HashMap<String, Vec<String>> {
	HashMap::from([
		(
			"books".to_string(),
			vec!["books".to_string(), "reading".to_string(), "literature".to_string()],
		),
		(
			"movies".to_string(),
			vec!["movies".to_string(), "films".to_string(), "cinema".to_string()],
		),
	])
}
