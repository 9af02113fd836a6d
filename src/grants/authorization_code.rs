//! Authorization Code grant: URI construction, redirect parsing, and token exchanges.

// self
use crate::{
	_prelude::*,
	auth::{AuthorizationCode, ClientPassword, RefreshToken, ScopeSet},
	error::{AuthorizationError, ConfigError},
	grants::{self, AuthorizationRequest},
	http::HttpRequest,
};

/// Stateless helpers implementing the Authorization Code grant (RFC 6749 section 4.1).
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthorizationCodeGrant;
impl AuthorizationCodeGrant {
	/// Builds the authorization URI the resource owner should be redirected to.
	///
	/// Query parameters: `client_id`, `response_type=code`, `redirect_uri`, optional `state`,
	/// optional space-joined `scope`.
	pub fn authorization_uri(authorize_endpoint: &Url, request: &AuthorizationRequest) -> Url {
		grants::authorization_uri(authorize_endpoint, request, "code")
	}

	/// Parses the authorization server's redirect response.
	///
	/// State validation runs first: when the original request carried a `state`, a redirect
	/// without one fails with `missing_required_state_parameter` and a differing one with
	/// `state_parameter_mismatch`, before `code` or `error` is even inspected. After that,
	/// `code` wins over `error`; a redirect carrying neither fails with
	/// `missing_required_query_parameters`.
	pub fn parse_redirect(
		request: &AuthorizationRequest,
		redirect: &Url,
	) -> Result<AuthorizationCode, AuthorizationError> {
		let pairs = grants::redirect_params(redirect);

		grants::verify_state(request.state.as_ref(), &pairs)?;

		if let Some(code) = grants::param(&pairs, "code") {
			return Ok(AuthorizationCode::new(code));
		}
		if let Some(error) = grants::param(&pairs, "error") {
			return Err(AuthorizationError::Server(error.to_owned()));
		}

		Err(AuthorizationError::MissingQueryParameters)
	}

	/// Builds the token-exchange request consuming an authorization code.
	///
	/// POST with a client-password `Basic` header and form body
	/// `grant_type=authorization_code&code=..[&redirect_uri=..]`; the response body decodes
	/// to an [`AccessTokenSigner`](crate::auth::AccessTokenSigner).
	pub fn access_token_request(
		token_endpoint: &Url,
		code: &AuthorizationCode,
		redirect_uri: Option<&Url>,
		client_password: &ClientPassword,
	) -> Result<HttpRequest, ConfigError> {
		let mut form: Vec<(&str, &str)> =
			vec![("grant_type", "authorization_code"), ("code", code.as_str())];

		if let Some(redirect) = redirect_uri {
			form.push(("redirect_uri", redirect.as_str()));
		}

		grants::token_request(token_endpoint, client_password, &form)
	}

	/// Builds the refresh request minting a new access token.
	///
	/// Form body `grant_type=refresh_token&refresh_token=..[&scope=..]` with comma-joined
	/// scopes — unlike the space-joined authorization URI. Both renderings are load-bearing
	/// for existing integrations.
	pub fn refresh_token_request(
		token_endpoint: &Url,
		refresh_token: &RefreshToken,
		scope: &ScopeSet,
		client_password: &ClientPassword,
	) -> Result<HttpRequest, ConfigError> {
		let scope_value = grants::format_scope(scope, ',');
		let mut form: Vec<(&str, &str)> =
			vec![("grant_type", "refresh_token"), ("refresh_token", refresh_token.expose())];

		if let Some(value) = scope_value.as_deref() {
			form.push(("scope", value));
		}

		grants::token_request(token_endpoint, client_password, &form)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::header::{AUTHORIZATION, CONTENT_TYPE};
	// self
	use super::*;
	use crate::auth::CsrfState;

	fn authorize_endpoint() -> Url {
		Url::parse("https://provider.example.com/oauth/authorize")
			.expect("Authorize endpoint fixture should parse successfully.")
	}

	fn token_endpoint() -> Url {
		Url::parse("https://provider.example.com/oauth/token")
			.expect("Token endpoint fixture should parse successfully.")
	}

	fn redirect_uri() -> Url {
		Url::parse("https://app.example.com/callback")
			.expect("Redirect URI fixture should parse successfully.")
	}

	fn request_with_state(state: &str) -> AuthorizationRequest {
		AuthorizationRequest::new("client-id", redirect_uri()).with_state(CsrfState::new(state))
	}

	fn redirect(query: &str) -> Url {
		Url::parse(&format!("https://app.example.com/callback?{query}"))
			.expect("Redirect fixture should parse successfully.")
	}

	#[test]
	fn authorization_uri_carries_expected_parameters() {
		let request = request_with_state("st4te").with_scope(
			ScopeSet::new(["user-read", "user-write"]).expect("Scope fixture should be valid."),
		);
		let uri = AuthorizationCodeGrant::authorization_uri(&authorize_endpoint(), &request);
		let pairs: Vec<(String, String)> =
			uri.query_pairs().map(|(key, value)| (key.into_owned(), value.into_owned())).collect();

		assert!(pairs.contains(&("client_id".into(), "client-id".into())));
		assert!(pairs.contains(&("response_type".into(), "code".into())));
		assert!(pairs.contains(&("redirect_uri".into(), redirect_uri().to_string())));
		assert!(pairs.contains(&("state".into(), "st4te".into())));
		assert!(pairs.contains(&("scope".into(), "user-read user-write".into())));
	}

	#[test]
	fn redirect_round_trip_returns_the_code() {
		let request = request_with_state("st4te");
		let code =
			AuthorizationCodeGrant::parse_redirect(&request, &redirect("code=c0de&state=st4te"))
				.expect("Matching state and code should parse successfully.");

		assert_eq!(code.as_str(), "c0de");
	}

	#[test]
	fn state_is_checked_before_other_parameters() {
		let request = request_with_state("st4te");

		assert_eq!(
			AuthorizationCodeGrant::parse_redirect(&request, &redirect("code=c0de&state=other")),
			Err(AuthorizationError::StateMismatch),
		);
		assert_eq!(
			AuthorizationCodeGrant::parse_redirect(&request, &redirect("error=denied&state=other")),
			Err(AuthorizationError::StateMismatch),
		);
		assert_eq!(
			AuthorizationCodeGrant::parse_redirect(&request, &redirect("code=c0de")),
			Err(AuthorizationError::MissingState),
		);
	}

	#[test]
	fn server_error_codes_surface_verbatim() {
		let request = AuthorizationRequest::new("client-id", redirect_uri());

		assert_eq!(
			AuthorizationCodeGrant::parse_redirect(&request, &redirect("error=access_denied")),
			Err(AuthorizationError::Server("access_denied".into())),
		);
	}

	#[test]
	fn missing_code_and_error_fail_with_fixed_code() {
		let request = AuthorizationRequest::new("client-id", redirect_uri());

		assert_eq!(
			AuthorizationCodeGrant::parse_redirect(&request, &redirect("unrelated=1")),
			Err(AuthorizationError::MissingQueryParameters),
		);
	}

	#[test]
	fn access_token_request_is_form_encoded() {
		let password = ClientPassword::new("abc", "xyz");
		let request = AuthorizationCodeGrant::access_token_request(
			&token_endpoint(),
			&AuthorizationCode::new("c0de"),
			Some(&redirect_uri()),
			&password,
		)
		.expect("Token-exchange request should build successfully.");

		assert_eq!(request.method(), http::Method::POST);
		assert_eq!(
			request.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok()),
			Some("application/x-www-form-urlencoded"),
		);
		assert_eq!(
			request.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok()),
			Some("Basic YWJjOnh5eg=="),
		);
		assert_eq!(
			request.body().as_slice(),
			b"grant_type=authorization_code&code=c0de&redirect_uri=https%3A%2F%2Fapp.example.com%2Fcallback",
		);
	}

	#[test]
	fn refresh_request_joins_scopes_with_commas() {
		let password = ClientPassword::new("abc", "xyz");
		let scope = ScopeSet::new(["read", "write"]).expect("Scope fixture should be valid.");
		let request = AuthorizationCodeGrant::refresh_token_request(
			&token_endpoint(),
			&RefreshToken::new("r3fresh"),
			&scope,
			&password,
		)
		.expect("Refresh request should build successfully.");

		assert_eq!(
			request.body().as_slice(),
			b"grant_type=refresh_token&refresh_token=r3fresh&scope=read%2Cwrite",
		);
	}
}
