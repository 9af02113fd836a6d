//! High-level client wiring that pairs grant flows with the execution pipeline.

// self
use crate::{
	_prelude::*,
	auth::{
		AccessTokenSigner, AuthorizationCode, ClientPassword, NonRefreshableTokenSigner,
		RefreshToken, ScopeSet,
	},
	codec::JsonDecoder,
	error::ConfigError,
	grants::{AuthorizationCodeGrant, ClientCredentialsGrant},
	http::{HttpRequest, HttpTransport},
	pipeline::RequestPipeline,
	signer::Signer,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Coordinates token exchanges against a single token endpoint.
///
/// The client owns the transport, the token endpoint, and the registered client password so
/// callers can run grant handshakes without assembling requests by hand. It holds no token
/// state: every exchange returns a fresh signer value owned by the caller, and expired
/// signers are replaced only when the caller explicitly invokes [`refresh`](Self::refresh).
#[derive(Clone)]
pub struct OAuthClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every token-exchange request.
	pub transport: Arc<T>,
	/// Token endpoint all exchanges are POSTed to.
	pub token_endpoint: Url,
	/// Registered client credentials applied as `Basic` authentication.
	pub client_password: ClientPassword,
}
impl<T> OAuthClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client around the provided transport, endpoint, and credentials.
	pub fn new(
		transport: impl Into<Arc<T>>,
		token_endpoint: Url,
		client_password: ClientPassword,
	) -> Self {
		Self { transport: transport.into(), token_endpoint, client_password }
	}

	/// Parses the token endpoint from a string form.
	pub fn with_endpoint_str(
		transport: impl Into<Arc<T>>,
		token_endpoint: &str,
		client_password: ClientPassword,
	) -> Result<Self, ConfigError> {
		let token_endpoint = Url::parse(token_endpoint)
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Ok(Self::new(transport, token_endpoint, client_password))
	}

	/// Builds a pipeline that signs application requests with the provided signer.
	pub fn request_pipeline(&self, signer: Signer) -> RequestPipeline<T> {
		RequestPipeline::new(self.transport.clone(), signer)
	}

	/// Exchanges an authorization code for a refreshable access-token signer.
	pub fn exchange_authorization_code<'a>(
		&'a self,
		code: &AuthorizationCode,
		redirect_uri: Option<&Url>,
	) -> ClientFuture<'a, AccessTokenSigner> {
		let request = AuthorizationCodeGrant::access_token_request(
			&self.token_endpoint,
			code,
			redirect_uri,
			&self.client_password,
		);

		Box::pin(async move { self.fetch_token(request?).await })
	}

	/// Mints a new access-token signer from a refresh token.
	pub fn refresh<'a>(
		&'a self,
		refresh_token: &RefreshToken,
		scope: &ScopeSet,
	) -> ClientFuture<'a, AccessTokenSigner> {
		let request = AuthorizationCodeGrant::refresh_token_request(
			&self.token_endpoint,
			refresh_token,
			scope,
			&self.client_password,
		);

		Box::pin(async move { self.fetch_token(request?).await })
	}

	/// Performs the Client Credentials grant for an app-only token.
	pub fn client_credentials(&self) -> ClientFuture<'_, NonRefreshableTokenSigner> {
		let request = ClientCredentialsGrant::access_token_request(
			&self.token_endpoint,
			&self.client_password,
		);

		Box::pin(async move { self.fetch_token(request?).await })
	}

	// Token-exchange requests already carry their Basic header, so the pipeline signer
	// stays disabled.
	async fn fetch_token<R>(&self, request: HttpRequest) -> Result<R>
	where
		R: serde::de::DeserializeOwned,
	{
		let pipeline: RequestPipeline<T> =
			RequestPipeline::new(self.transport.clone(), Signer::Disabled);
		let decoder = JsonDecoder::<R>::new();
		let response = pipeline.execute(request, &decoder).await?;

		Ok(response.body)
	}
}
#[cfg(feature = "reqwest")]
impl OAuthClient<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport.
	pub fn with_reqwest(token_endpoint: Url, client_password: ClientPassword) -> Self {
		Self::new(ReqwestTransport::default(), token_endpoint, client_password)
	}
}
impl<T> Debug for OAuthClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClient")
			.field("token_endpoint", &self.token_endpoint.as_str())
			.field("client_password", &self.client_password)
			.finish()
	}
}
