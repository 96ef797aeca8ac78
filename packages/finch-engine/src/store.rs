//! In-memory profile store, the default [`ProfileStore`] backing.

use std::collections::HashMap;

use parking_lot::RwLock;

use finch_domain::Profile;

use crate::{BoxFuture, ProfileStore, Result};

#[derive(Default)]
pub struct MemoryProfileStore {
	profiles: RwLock<HashMap<String, Profile>>,
}
impl MemoryProfileStore {
	pub fn new() -> Self {
		Self::default()
	}
}
impl ProfileStore for MemoryProfileStore {
	fn get<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Option<Profile>>> {
		let profile = self.profiles.read().get(user_id).cloned();

		Box::pin(async move { Ok(profile) })
	}

	fn save<'a>(&'a self, profile: &'a Profile) -> BoxFuture<'a, Result<()>> {
		self.profiles.write().insert(profile.user_id.clone(), profile.clone());

		Box::pin(async move { Ok(()) })
	}

	fn delete<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<bool>> {
		let deleted = self.profiles.write().remove(user_id).is_some();

		Box::pin(async move { Ok(deleted) })
	}
}
