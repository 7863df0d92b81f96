//! In-process user-session store written by the gateway's auth bindings.

// self
use crate::{_prelude::*, api::UserProfile};

/// Signed-in user snapshot held by the [`SessionStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInUser {
	/// Profile returned by the login endpoint.
	pub profile: UserProfile,
	/// Instant the session store observed the sign-in.
	#[serde(with = "time::serde::rfc3339")]
	pub signed_in_at: OffsetDateTime,
}

/// Thread-safe store for the current user session.
///
/// The gateway writes it from [`login`](crate::gateway::Gateway::login) and
/// [`logout`](crate::gateway::Gateway::logout); host applications read it to drive
/// route guards and the account header. It is never persisted.
#[derive(Debug, Default)]
pub struct SessionStore(RwLock<Option<SignedInUser>>);
impl SessionStore {
	/// Replaces the current session with `profile`, timestamped now.
	pub fn sign_in(&self, profile: UserProfile) {
		*self.0.write() =
			Some(SignedInUser { profile, signed_in_at: OffsetDateTime::now_utc() });
	}

	/// Clears the current session.
	pub fn clear(&self) {
		*self.0.write() = None;
	}

	/// Returns a snapshot of the current session, if any.
	pub fn current(&self) -> Option<SignedInUser> {
		self.0.read().clone()
	}

	/// True when a user is signed in.
	pub fn is_authenticated(&self) -> bool {
		self.0.read().is_some()
	}
}
