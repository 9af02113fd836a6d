// crates.io
use httpmock::prelude::*;
// self
use oauth_courier::{
	auth::{AuthorizationCode, ClientPassword, RefreshToken, ScopeSet},
	client::OAuthClient,
	http::ReqwestTransport,
	url::Url,
};

const CLIENT_ID: &str = "abc";
const CLIENT_SECRET: &str = "xyz";
const BASIC_HEADER: &str = "Basic YWJjOnh5eg==";
const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

fn build_client(server: &MockServer) -> OAuthClient<ReqwestTransport> {
	let endpoint = Url::parse(&server.url("/oauth/token"))
		.expect("Mock token endpoint should parse successfully.");

	OAuthClient::with_reqwest(endpoint, ClientPassword::new(CLIENT_ID, CLIENT_SECRET))
}

#[tokio::test]
async fn client_credentials_mints_an_app_only_token() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.header("authorization", BASIC_HEADER)
				.header("content-type", FORM_MEDIA_TYPE)
				.body("grant_type=client_credentials");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"app-token\",\"token_type\":\"bearer\",\"expires_in\":7200}",
			);
		})
		.await;
	let signer = client
		.client_credentials()
		.await
		.expect("Client Credentials exchange should succeed.");

	assert_eq!(signer.access_token.expose(), "app-token");
	assert_eq!(signer.token_type, "bearer");
	assert!(!signer.is_expired());
	assert!(signer.scope.is_empty());

	mock.assert_async().await;
}

#[tokio::test]
async fn authorization_code_exchange_returns_a_refreshable_signer() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let redirect_uri = Url::parse("https://app.example.com/callback")
		.expect("Redirect URI fixture should parse successfully.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.header("authorization", BASIC_HEADER)
				.body(
					"grant_type=authorization_code&code=c0de&redirect_uri=https%3A%2F%2Fapp.example.com%2Fcallback",
				);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"user-token\",\"token_type\":\"bearer\",\"expires_in\":3600,\
				\"refresh_token\":\"r3fresh\",\"scope\":\"read write\"}",
			);
		})
		.await;
	let signer = client
		.exchange_authorization_code(&AuthorizationCode::new("c0de"), Some(&redirect_uri))
		.await
		.expect("Authorization Code exchange should succeed.");

	assert_eq!(signer.access_token.expose(), "user-token");
	assert_eq!(signer.refresh_token.as_ref().map(RefreshToken::expose), Some("r3fresh"));
	assert!(signer.scope.contains("read"));
	assert!(signer.scope.contains("write"));

	mock.assert_async().await;
}

#[tokio::test]
async fn refresh_joins_scopes_with_commas_on_the_wire() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let scope = ScopeSet::new(["read", "write"]).expect("Scope fixture should be valid.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.header("authorization", BASIC_HEADER)
				.body("grant_type=refresh_token&refresh_token=r3fresh&scope=read%2Cwrite");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"rotated-token\",\"token_type\":\"bearer\",\"expires_in\":3600,\
				\"refresh_token\":\"r3fresh-2\",\"scope\":\"read write\"}",
			);
		})
		.await;
	let signer = client
		.refresh(&RefreshToken::new("r3fresh"), &scope)
		.await
		.expect("Refresh exchange should succeed.");

	assert_eq!(signer.access_token.expose(), "rotated-token");
	assert_eq!(signer.refresh_token.as_ref().map(RefreshToken::expose), Some("r3fresh-2"));

	mock.assert_async().await;
}

#[tokio::test]
async fn token_endpoint_error_payloads_surface_their_message() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\"}");
		})
		.await;
	let err = client
		.client_credentials()
		.await
		.expect_err("Rejected exchange should surface to the caller.");

	assert_eq!(err.to_string(), "invalid_grant");
	assert_eq!(err.status(), Some(400));

	mock.assert_async().await;
}
