//! CSRF `state` parameter modeling for authorization redirects.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{_prelude::*, error::AuthorizationError};

const GENERATED_STATE_LEN: usize = 32;

/// Opaque CSRF-protection token round-tripped through the authorization redirect.
///
/// Lifecycle: created before initiating a grant, embedded in the authorization URI, compared
/// once against the redirect response, then discarded. The comparison happens before any
/// other redirect parameter is inspected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfState(String);
impl CsrfState {
	/// Wraps a caller-supplied state value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Generates a fresh random alphanumeric state value.
	pub fn generate() -> Self {
		let value: String =
			rand::rng().sample_iter(Alphanumeric).take(GENERATED_STATE_LEN).map(char::from).collect();

		Self(value)
	}

	/// Returns the raw state value.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Compares the state echoed by the authorization server against this one.
	pub fn verify(&self, returned: Option<&str>) -> Result<(), AuthorizationError> {
		match returned {
			None => Err(AuthorizationError::MissingState),
			Some(value) if value != self.0 => Err(AuthorizationError::StateMismatch),
			Some(_) => Ok(()),
		}
	}
}
impl Display for CsrfState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
