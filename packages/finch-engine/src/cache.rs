//! Process-wide TTL caches for profiles and finished recommendation lists.
//!
//! Entries are swept lazily: reads skip expired values, writes drop them.
//! Recommendation keys are prefixed with the user id so a profile update can
//! invalidate every limit/query/location variant in one pass.

use std::{collections::HashMap, time::Duration};

use parking_lot::RwLock;
use time::OffsetDateTime;

const RECOMMENDATION_CACHE_SCHEMA_VERSION: i32 = 1;

pub struct TtlCache<V> {
	ttl: Duration,
	entries: RwLock<HashMap<String, Entry<V>>>,
}

struct Entry<V> {
	value: V,
	expires_at: OffsetDateTime,
}

impl<V> TtlCache<V>
where
	V: Clone,
{
	pub fn new(ttl: Duration) -> Self {
		Self { ttl, entries: RwLock::new(HashMap::new()) }
	}

	pub fn get(&self, key: &str) -> Option<V> {
		let now = OffsetDateTime::now_utc();
		let entries = self.entries.read();

		entries.get(key).filter(|entry| entry.expires_at > now).map(|entry| entry.value.clone())
	}

	pub fn insert(&self, key: impl Into<String>, value: V) {
		let now = OffsetDateTime::now_utc();
		let mut entries = self.entries.write();

		entries.retain(|_, entry| entry.expires_at > now);
		entries.insert(key.into(), Entry { value, expires_at: now + self.ttl });
	}

	pub fn remove(&self, key: &str) {
		self.entries.write().remove(key);
	}

	pub fn remove_prefix(&self, prefix: &str) {
		self.entries.write().retain(|key, _| !key.starts_with(prefix));
	}
}

pub fn recommendation_cache_key(
	user_id: &str,
	limit: usize,
	query: Option<&str>,
	location: Option<&str>,
) -> String {
	let payload = serde_json::json!({
		"kind": "recommendations",
		"schema_version": RECOMMENDATION_CACHE_SCHEMA_VERSION,
		"user_id": user_id,
		"limit": limit,
		"query": query,
		"location": location,
	});

	format!("{user_id}:{}", blake3::hash(payload.to_string().as_bytes()).to_hex())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stores_and_reads_within_ttl() {
		let cache = TtlCache::new(Duration::from_secs(60));

		cache.insert("k", 7_i32);

		assert_eq!(cache.get("k"), Some(7));
		assert_eq!(cache.get("missing"), None);
	}

	#[test]
	fn zero_ttl_expires_immediately() {
		let cache = TtlCache::new(Duration::ZERO);

		cache.insert("k", 7_i32);

		assert_eq!(cache.get("k"), None);
	}

	#[test]
	fn remove_prefix_clears_user_entries() {
		let cache = TtlCache::new(Duration::from_secs(60));

		cache.insert("u1:a", 1_i32);
		cache.insert("u1:b", 2_i32);
		cache.insert("u2:a", 3_i32);
		cache.remove_prefix("u1:");

		assert_eq!(cache.get("u1:a"), None);
		assert_eq!(cache.get("u1:b"), None);
		assert_eq!(cache.get("u2:a"), Some(3));
	}

	#[test]
	fn cache_key_varies_with_parameters() {
		let base = recommendation_cache_key("u1", 5, None, None);

		assert!(base.starts_with("u1:"));
		assert_eq!(base, recommendation_cache_key("u1", 5, None, None));
		assert_ne!(base, recommendation_cache_key("u1", 6, None, None));
		assert_ne!(base, recommendation_cache_key("u1", 5, Some("rust"), None));
		assert_ne!(base, recommendation_cache_key("u1", 5, None, Some("Berlin")));
	}
}
