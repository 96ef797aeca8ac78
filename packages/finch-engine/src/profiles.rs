//! Profile access with caching and eager invalidation.

use tracing::warn;

use finch_domain::Profile;

use crate::{Engine, Error, Result};

impl Engine {
	/// Cached profile lookup. Store failures are logged and read as "no
	/// profile": the read path never raises.
	pub async fn profile(&self, user_id: &str) -> Option<Profile> {
		if let Some(profile) = self.profile_cache.get(user_id) {
			return Some(profile);
		}

		match self.profiles.get(user_id).await {
			Ok(Some(profile)) => {
				self.profile_cache.insert(user_id, profile.clone());

				Some(profile)
			},
			Ok(None) => None,
			Err(err) => {
				warn!(%user_id, %err, "Profile lookup failed.");

				None
			},
		}
	}

	/// Persist a profile and eagerly drop every cache entry for that user.
	/// Stale recommendations after a profile edit are not acceptable.
	pub async fn save_profile(&self, profile: &Profile) -> Result<()> {
		if profile.user_id.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "Profile user_id must be non-empty.".to_string(),
			});
		}

		self.profiles.save(profile).await?;
		self.invalidate_user(&profile.user_id);

		Ok(())
	}

	pub async fn delete_profile(&self, user_id: &str) -> Result<bool> {
		let deleted = self.profiles.delete(user_id).await?;

		self.invalidate_user(user_id);

		Ok(deleted)
	}

	/// Drop the cached profile and every recommendation variant
	/// (limit/query/location) for this user.
	pub fn invalidate_user(&self, user_id: &str) {
		self.profile_cache.remove(user_id);
		self.recommendation_cache.remove_prefix(&format!("{user_id}:"));
	}
}
