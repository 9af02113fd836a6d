//! Client Credentials grant: app-only token requests.

// self
use crate::{_prelude::*, auth::ClientPassword, error::ConfigError, http::HttpRequest};

/// Stateless helpers implementing the Client Credentials grant (RFC 6749 section 4.4).
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientCredentialsGrant;
impl ClientCredentialsGrant {
	/// Builds the token request for an app-only token.
	///
	/// POST with a client-password `Basic` header and the body exactly
	/// `grant_type=client_credentials`; the response decodes to a
	/// [`NonRefreshableTokenSigner`](crate::auth::NonRefreshableTokenSigner).
	pub fn access_token_request(
		token_endpoint: &Url,
		client_password: &ClientPassword,
	) -> Result<HttpRequest, ConfigError> {
		crate::grants::token_request(
			token_endpoint,
			client_password,
			&[("grant_type", "client_credentials")],
		)
	}
}
