//! RFC 6749 grant-flow builders and redirect parsers.
//!
//! Every operation here is a pure request/response transformer: authorization URIs and
//! token-exchange requests are values, redirect parsing holds no state between calls, and
//! each invocation is independently retryable (authorization codes stay single-use by
//! server-side contract, not local enforcement).

pub mod authorization_code;
pub mod client_credentials;
pub mod implicit;

pub use authorization_code::*;
pub use client_credentials::*;
pub use implicit::*;

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{ClientPassword, CsrfState, ScopeSet},
	error::{AuthorizationError, ConfigError},
	http::HttpRequest,
	signer::Signer,
};

const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// Parameters of an authorization request awaiting its redirect response.
///
/// Built once per handshake and kept by the caller so the redirect can be validated against
/// what was actually sent. Shared by the Authorization Code and Implicit grants, which differ
/// only in `response_type` and in how the redirect is parsed.
#[derive(Clone, Debug)]
pub struct AuthorizationRequest {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Redirect URI registered with the authorization server; the server validates the
	/// match, not this crate.
	pub redirect_uri: Url,
	/// CSRF state sent with the request, if any.
	pub state: Option<CsrfState>,
	/// Requested scopes, space-joined when rendered into the authorization URI.
	pub scope: ScopeSet,
}
impl AuthorizationRequest {
	/// Creates a request with no state and no scopes.
	pub fn new(client_id: impl Into<String>, redirect_uri: Url) -> Self {
		Self {
			client_id: client_id.into(),
			redirect_uri,
			state: None,
			scope: ScopeSet::default(),
		}
	}

	/// Attaches a CSRF state value.
	pub fn with_state(mut self, state: CsrfState) -> Self {
		self.state = Some(state);

		self
	}

	/// Attaches the requested scope set.
	pub fn with_scope(mut self, scope: ScopeSet) -> Self {
		self.scope = scope;

		self
	}
}

/// Joins normalized scopes with the grant-specific delimiter when building requests.
///
/// Authorization and implicit URIs use a space delimiter while refresh requests use a comma;
/// both renderings are part of the wire contract and are kept distinct on purpose.
pub(crate) fn format_scope(scope: &ScopeSet, delimiter: char) -> Option<String> {
	if scope.is_empty() {
		return None;
	}
	if delimiter == ' ' {
		return Some(scope.normalized());
	}

	let mut buf = String::new();

	for (idx, value) in scope.iter().enumerate() {
		if idx > 0 {
			buf.push(delimiter);
		}

		buf.push_str(value);
	}

	Some(buf)
}

/// Builds the user-facing authorization URI for the given response type.
pub(crate) fn authorization_uri(
	authorize_endpoint: &Url,
	request: &AuthorizationRequest,
	response_type: &str,
) -> Url {
	let mut url = authorize_endpoint.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("client_id", &request.client_id);
	pairs.append_pair("response_type", response_type);
	pairs.append_pair("redirect_uri", request.redirect_uri.as_str());

	if let Some(state) = &request.state {
		pairs.append_pair("state", state.as_str());
	}
	if let Some(scope_value) = format_scope(&request.scope, ' ') {
		pairs.append_pair("scope", &scope_value);
	}

	drop(pairs);

	url
}

/// Collects redirect parameters from both the query and the fragment.
///
/// The Authorization Code grant delivers parameters in the query while the Implicit grant
/// uses the fragment; servers guarantee no parameter ordering, so lookups scan the whole
/// list instead of assuming positions.
pub(crate) fn redirect_params(redirect: &Url) -> Vec<(String, String)> {
	let mut pairs: Vec<(String, String)> =
		redirect.query_pairs().map(|(key, value)| (key.into_owned(), value.into_owned())).collect();

	if let Some(fragment) = redirect.fragment() {
		pairs.extend(
			form_urlencoded::parse(fragment.as_bytes())
				.map(|(key, value)| (key.into_owned(), value.into_owned())),
		);
	}

	pairs
}

/// Looks up the first occurrence of a redirect parameter.
pub(crate) fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
	pairs.iter().find(|(candidate, _)| candidate == key).map(|(_, value)| value.as_str())
}

/// Validates the echoed `state` before any other redirect parameter is inspected.
pub(crate) fn verify_state(
	sent: Option<&CsrfState>,
	pairs: &[(String, String)],
) -> Result<(), AuthorizationError> {
	let Some(expected) = sent else {
		return Ok(());
	};

	expected.verify(param(pairs, "state"))
}

/// Builds a token-exchange POST carrying the client-password `Basic` header and a
/// form-encoded body.
pub(crate) fn token_request(
	token_endpoint: &Url,
	client_password: &ClientPassword,
	form: &[(&str, &str)],
) -> Result<HttpRequest, ConfigError> {
	let mut serializer = form_urlencoded::Serializer::new(String::new());

	for (key, value) in form {
		serializer.append_pair(key, value);
	}

	let body = serializer.finish().into_bytes();
	let request = http::Request::builder()
		.method(http::Method::POST)
		.uri(token_endpoint.as_str())
		.header(http::header::CONTENT_TYPE, FORM_MEDIA_TYPE)
		.header(http::header::ACCEPT, "application/json")
		.body(body)?;

	Signer::ClientPassword(client_password.clone()).sign(request)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scope_formatting_handles_both_delimiters() {
		let scope = ScopeSet::new(["email", "profile"]).expect("Failed to build test scope.");

		assert_eq!(format_scope(&scope, ' '), Some("email profile".into()));
		assert_eq!(format_scope(&scope, ','), Some("email,profile".into()));
		assert_eq!(format_scope(&ScopeSet::default(), ' '), None);
	}

	#[test]
	fn redirect_params_cover_query_and_fragment() {
		let redirect = Url::parse("https://example.com/cb?code=abc#access_token=tok&state=s")
			.expect("Redirect URL fixture should parse successfully.");
		let pairs = redirect_params(&redirect);

		assert_eq!(param(&pairs, "code"), Some("abc"));
		assert_eq!(param(&pairs, "access_token"), Some("tok"));
		assert_eq!(param(&pairs, "state"), Some("s"));
		assert_eq!(param(&pairs, "missing"), None);
	}
}
