mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	AdzunaConfig, Config, ConnectorConfig, LlmProviderConfig, Providers, Ranking, Recommend,
	Service, Sources,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.providers.llm.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.llm.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.providers.llm.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.llm.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.providers.llm.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.llm.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.providers.llm.temperature.is_finite() || cfg.providers.llm.temperature < 0.0 {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be a finite non-negative number.".to_string(),
		});
	}

	for (label, connector) in [
		("web_search", &cfg.providers.web_search),
		("books", &cfg.providers.books),
		("movies", &cfg.providers.movies),
		("jooble", &cfg.providers.jooble),
	] {
		if !connector.enabled {
			continue;
		}
		if connector.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("providers.{label}.api_base must be non-empty."),
			});
		}
		if connector.timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("providers.{label}.timeout_ms must be greater than zero."),
			});
		}
		if connector.limit == 0 {
			return Err(Error::Validation {
				message: format!("providers.{label}.limit must be greater than zero."),
			});
		}
	}

	if cfg.providers.adzuna.enabled {
		if cfg.providers.adzuna.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: "providers.adzuna.api_base must be non-empty.".to_string(),
			});
		}
		if cfg.providers.adzuna.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "providers.adzuna.timeout_ms must be greater than zero.".to_string(),
			});
		}
		if cfg.providers.adzuna.limit == 0 {
			return Err(Error::Validation {
				message: "providers.adzuna.limit must be greater than zero.".to_string(),
			});
		}
	}

	if cfg.recommend.default_limit == 0 {
		return Err(Error::Validation {
			message: "recommend.default_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.recommend.cache_ttl_secs == 0 {
		return Err(Error::Validation {
			message: "recommend.cache_ttl_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.recommend.connector_concurrency == 0 {
		return Err(Error::Validation {
			message: "recommend.connector_concurrency must be greater than zero.".to_string(),
		});
	}

	if !cfg.ranking.interest_boost.is_finite() || cfg.ranking.interest_boost <= 0.0 {
		return Err(Error::Validation {
			message: "ranking.interest_boost must be a finite positive number.".to_string(),
		});
	}
	if cfg.ranking.fresh_age_days <= 0 || cfg.ranking.recent_age_days <= 0 {
		return Err(Error::Validation {
			message: "ranking age thresholds must be greater than zero.".to_string(),
		});
	}
	if cfg.ranking.fresh_age_days >= cfg.ranking.recent_age_days {
		return Err(Error::Validation {
			message: "ranking.fresh_age_days must be less than ranking.recent_age_days."
				.to_string(),
		});
	}

	for (label, factor) in [
		("fresh_factor", cfg.ranking.fresh_factor),
		("recent_factor", cfg.ranking.recent_factor),
		("location_factor", cfg.ranking.location_factor),
		("remote_factor", cfg.ranking.remote_factor),
		("hybrid_factor", cfg.ranking.hybrid_factor),
		("company_factor", cfg.ranking.company_factor),
	] {
		if !factor.is_finite() || factor < 0.0 {
			return Err(Error::Validation {
				message: format!("ranking.{label} must be a finite non-negative number."),
			});
		}
	}

	for (source, bias) in &cfg.ranking.source_bias {
		if !bias.is_finite() {
			return Err(Error::Validation {
				message: format!("ranking.source_bias.{source} must be a finite number."),
			});
		}
	}

	for (source, synonyms) in &cfg.sources.synonyms {
		if synonyms.is_empty() {
			return Err(Error::Validation {
				message: format!("sources.synonyms.{source} must be non-empty."),
			});
		}
	}

	Ok(())
}

/// Lowercase the synonym table once so interest matching never re-folds it.
fn normalize(cfg: &mut Config) {
	for synonyms in cfg.sources.synonyms.values_mut() {
		for synonym in synonyms.iter_mut() {
			*synonym = synonym.to_lowercase();
		}
	}
}
