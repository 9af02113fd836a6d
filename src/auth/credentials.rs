//! Credential value types: redacted secrets, client passwords, and grant artifacts.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::_prelude::*;

/// Redacted string wrapper keeping credential material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret(String);
impl Secret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Secret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Secret").field(&"<redacted>").finish()
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// OAuth 2.0 client identifier/secret pair registered with the authorization server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPassword {
	/// Public client identifier.
	pub client_id: String,
	/// Confidential client secret; never logged in clear form.
	pub client_secret: Secret,
}
impl ClientPassword {
	/// Creates a new client password pair.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), client_secret: Secret::new(client_secret) }
	}

	/// Returns the full `Basic` authorization header value derived from the pair.
	pub fn basic_header(&self) -> String {
		let credential =
			STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret.expose()));

		format!("Basic {credential}")
	}
}
impl Debug for ClientPassword {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientPassword")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.finish()
	}
}

/// Short-lived, single-use code produced by parsing an authorization redirect.
///
/// The single-use contract is enforced server-side; the courier only carries the value from
/// the redirect into exactly one token-exchange request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationCode(String);
impl AuthorizationCode {
	/// Wraps a code extracted from a redirect response.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw code value.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for AuthorizationCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Long-lived refresh token owned by the caller and used to mint new access-token signers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken(Secret);
impl RefreshToken {
	/// Wraps a refresh token value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(Secret::new(value))
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.0.expose()
	}
}
impl Display for RefreshToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.0, f)
	}
}
