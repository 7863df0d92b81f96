//! Navigation seam for the gateway's single UI-facing side effect.
//!
//! When a credential refresh fails the gateway sends the client back to the login page.
//! In a browser shell that means rewriting the location; in tests it means recording the
//! path. The [`Navigator`] trait keeps that decision out of the HTTP layer.

// self
use crate::_prelude::*;

/// Receives redirect requests issued by the gateway.
///
/// The gateway calls [`redirect`](Navigator::redirect) at most once per failed refresh
/// cycle, from the task that led the refresh; implementations need not deduplicate.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Sends the client's navigation context to `path`.
	fn redirect(&self, path: &str);
}

/// Navigator that drops every redirect; the default for headless hosts.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNavigator;
impl Navigator for NoopNavigator {
	fn redirect(&self, _path: &str) {}
}

/// Navigator that records every redirect for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNavigator(Mutex<Vec<String>>);
impl RecordingNavigator {
	/// Returns every path redirected to so far, in order.
	pub fn redirects(&self) -> Vec<String> {
		self.0.lock().clone()
	}

	/// Returns the number of redirects issued.
	pub fn count(&self) -> usize {
		self.0.lock().len()
	}
}
impl Navigator for RecordingNavigator {
	fn redirect(&self, path: &str) {
		self.0.lock().push(path.to_owned());
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_navigator_preserves_order() {
		let navigator = RecordingNavigator::default();

		navigator.redirect("/login");
		navigator.redirect("/login");

		assert_eq!(navigator.count(), 2);
		assert_eq!(navigator.redirects(), vec!["/login".to_owned(), "/login".to_owned()]);
	}
}
