//! Implicit grant: authorization URI and in-redirect token extraction.

// self
use crate::{
	_prelude::*,
	auth::{NonRefreshableTokenSigner, ScopeSet},
	error::{AuthorizationError, TokenParseError},
	grants::{self, AuthorizationRequest},
};

/// Stateless helpers implementing the Implicit grant (RFC 6749 section 4.2).
///
/// The access token arrives embedded in the redirect itself; there is no token-exchange
/// round trip.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImplicitGrant;
impl ImplicitGrant {
	/// Builds the authorization URI, identical to the Authorization Code grant except for
	/// `response_type=token`.
	pub fn authorization_uri(authorize_endpoint: &Url, request: &AuthorizationRequest) -> Url {
		grants::authorization_uri(authorize_endpoint, request, "token")
	}

	/// Parses the redirect response into a token signer stamped with the current instant.
	///
	/// State validation takes the same precedence as in the Authorization Code grant. On
	/// success the signer is assembled from `access_token`, `token_type`, `expires_in`
	/// (integer parse failure yields `invalid_expires_in`), and an optional space-split
	/// `scope`, all read from the redirect's fragment or query.
	pub fn parse_redirect(
		request: &AuthorizationRequest,
		redirect: &Url,
	) -> Result<NonRefreshableTokenSigner> {
		let pairs = grants::redirect_params(redirect);

		grants::verify_state(request.state.as_ref(), &pairs)?;

		let Some(access_token) = grants::param(&pairs, "access_token") else {
			if let Some(error) = grants::param(&pairs, "error") {
				return Err(AuthorizationError::Server(error.to_owned()).into());
			}

			return Err(AuthorizationError::MissingQueryParameters.into());
		};
		let token_type = grants::param(&pairs, "token_type")
			.ok_or(TokenParseError::MissingField { field: "token_type" })?;
		let expires_in: i64 = grants::param(&pairs, "expires_in")
			.ok_or(TokenParseError::MissingField { field: "expires_in" })?
			.parse()
			.map_err(|_| TokenParseError::InvalidExpiresIn)?;
		let scope = match grants::param(&pairs, "scope") {
			Some(raw) => ScopeSet::from_str(raw).map_err(TokenParseError::from)?,
			None => ScopeSet::default(),
		};

		Ok(NonRefreshableTokenSigner::new(
			access_token,
			token_type,
			expires_in,
			scope,
			OffsetDateTime::now_utc(),
		))
	}
}
