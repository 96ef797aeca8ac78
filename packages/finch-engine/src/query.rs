//! Build a search string from a profile.

use finch_domain::Profile;

/// Interests are OR-joined for search engines; everything else is appended
/// as plain terms. A profile with nothing usable yields an empty string.
pub fn generate_query(profile: &Profile) -> String {
	let mut parts = Vec::new();

	if !profile.interests.is_empty() {
		parts.push(profile.interests.join(" OR "));
	}
	if let Some(role) = profile.preferences.role.as_deref()
		&& !role.trim().is_empty()
	{
		parts.push(role.to_string());
	}
	if let Some(location) = profile.preferences.location.as_deref()
		&& !location.trim().is_empty()
	{
		parts.push(location.to_string());
	}
	if profile.preferences.remote == Some(true) {
		parts.push("remote work".to_string());
	} else if profile.preferences.hybrid == Some(true) {
		parts.push("hybrid work".to_string());
	}
	if !profile.demographics.skills.is_empty() {
		parts.push(profile.demographics.skills.join(" "));
	}
	if !profile.demographics.industries.is_empty() {
		parts.push(profile.demographics.industries.join(" "));
	}

	parts.join(" ")
}
