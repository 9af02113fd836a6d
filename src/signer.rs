//! Signer variants that turn an unsigned request into a signed one.

pub mod oauth1;

pub use oauth1::*;

// crates.io
use http::{HeaderValue, header::AUTHORIZATION};
// self
use crate::{
	auth::{AccessTokenSigner, ClientPassword, NonRefreshableTokenSigner},
	error::ConfigError,
	http::HttpRequest,
};

/// Authorization strategy applied to outgoing requests.
///
/// Exactly one signer is active per client or pipeline instance. Signing is a pure
/// transformation of the request value; no variant touches shared state, so the same signer
/// can serve concurrent invocations without locking.
#[derive(Clone, Debug)]
pub enum Signer {
	/// Identity transform for unauthenticated calls.
	Disabled,
	/// OAuth 1.0a HMAC-SHA1 request signature (RFC 5849).
	BasicSignature(BasicSignature),
	/// `Basic` client-password authentication; used only for token-exchange requests.
	ClientPassword(ClientPassword),
	/// `Bearer` authorization with a refreshable access token.
	AccessToken(AccessTokenSigner),
	/// `Bearer` authorization with a non-refreshable access token.
	NonRefreshableToken(NonRefreshableTokenSigner),
}
impl Signer {
	/// Transforms the unsigned request into a signed one.
	pub fn sign(&self, request: HttpRequest) -> Result<HttpRequest, ConfigError> {
		match self {
			Self::Disabled => Ok(request),
			Self::BasicSignature(signature) => signature.sign(request),
			Self::ClientPassword(password) => apply_authorization(request, password.basic_header()),
			Self::AccessToken(signer) =>
				apply_authorization(request, bearer_header(signer.access_token.expose())),
			Self::NonRefreshableToken(signer) =>
				apply_authorization(request, bearer_header(signer.access_token.expose())),
		}
	}
}

fn bearer_header(access_token: &str) -> String {
	format!("Bearer {access_token}")
}

pub(crate) fn apply_authorization(
	mut request: HttpRequest,
	value: String,
) -> Result<HttpRequest, ConfigError> {
	let mut header = HeaderValue::from_str(&value).map_err(http::Error::from)?;

	header.set_sensitive(true);
	request.headers_mut().insert(AUTHORIZATION, header);

	Ok(request)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::OffsetDateTime;
	// self
	use super::*;
	use crate::auth::ScopeSet;

	fn request() -> HttpRequest {
		http::Request::builder()
			.method(http::Method::GET)
			.uri("https://api.example.com/me")
			.body(Vec::new())
			.expect("Request fixture should build successfully.")
	}

	fn authorization(request: &HttpRequest) -> Option<&str> {
		request.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok())
	}

	#[test]
	fn disabled_signer_is_identity() {
		let signed = Signer::Disabled.sign(request()).expect("Disabled signing should succeed.");

		assert!(authorization(&signed).is_none());
	}

	#[test]
	fn client_password_applies_basic_header() {
		let signer = Signer::ClientPassword(ClientPassword::new("abc", "xyz"));
		let signed = signer.sign(request()).expect("Basic signing should succeed.");

		assert_eq!(authorization(&signed), Some("Basic YWJjOnh5eg=="));
	}

	#[test]
	fn token_signers_apply_bearer_header() {
		let signer = Signer::NonRefreshableToken(NonRefreshableTokenSigner::new(
			"tok123",
			"bearer",
			3600,
			ScopeSet::default(),
			OffsetDateTime::now_utc(),
		));
		let signed = signer.sign(request()).expect("Bearer signing should succeed.");

		assert_eq!(authorization(&signed), Some("Bearer tok123"));
		assert!(
			signed.headers().get(AUTHORIZATION).map(HeaderValue::is_sensitive).unwrap_or_default(),
			"Bearer header should be flagged sensitive.",
		);
	}
}
