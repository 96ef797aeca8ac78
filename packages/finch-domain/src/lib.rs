pub mod candidate;
pub mod dates;
pub mod nullable;
pub mod profile;

pub use candidate::{Candidate, Source};
pub use profile::{Demographics, Preferences, Profile};
