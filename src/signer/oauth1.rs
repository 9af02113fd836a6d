//! OAuth 1.0a request signing (RFC 5849 section 3.4, HMAC-SHA1).

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use http::Uri;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;
use url::form_urlencoded;
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError, http::HttpRequest, signer};

/// Percent-encoding set from RFC 5849 section 3.6: everything except
/// ALPHA / DIGIT / `-` / `.` / `_` / `~`.
const RFC5849_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');
const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const NONCE_LEN: usize = 32;
const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

type HmacSha1 = Hmac<Sha1>;

/// OAuth 1.0a consumer key/secret pair registered with the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Consumer {
	/// Public consumer key.
	pub key: String,
	/// Consumer secret used to derive the signing key; never logged in clear form.
	pub secret: Secret,
}
impl Consumer {
	/// Creates a new consumer pair.
	pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { key: key.into(), secret: Secret::new(secret) }
	}
}

/// Request or access token issued during the OAuth 1.0a handshake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuth1Token {
	/// Public token value.
	pub value: String,
	/// Token secret used to derive the signing key; never logged in clear form.
	pub secret: Secret,
}
impl OAuth1Token {
	/// Creates a new token pair.
	pub fn new(value: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { value: value.into(), secret: Secret::new(secret) }
	}
}

/// HMAC-SHA1 signature configuration: a consumer and an optional request/access token.
///
/// Signing canonicalizes the request's query and form-body parameters together with the
/// `oauth_*` protocol parameters, computes the RFC 5849 signature base string, and writes the
/// result into an `Authorization: OAuth ...` header. Given its inputs (including nonce and
/// timestamp) the transformation is referentially transparent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicSignature {
	consumer: Consumer,
	token: Option<OAuth1Token>,
}
impl BasicSignature {
	/// Creates a signature configuration without a token (temporary-credential requests).
	pub fn new(consumer: Consumer) -> Self {
		Self { consumer, token: None }
	}

	/// Attaches the request or access token obtained during the handshake.
	pub fn with_token(mut self, token: OAuth1Token) -> Self {
		self.token = Some(token);

		self
	}

	/// Signs the request with a fresh nonce and the current timestamp.
	pub fn sign(&self, request: HttpRequest) -> Result<HttpRequest, ConfigError> {
		let nonce: String =
			rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect();
		let timestamp = OffsetDateTime::now_utc().unix_timestamp();

		self.sign_at(request, &nonce, timestamp)
	}

	pub(crate) fn sign_at(
		&self,
		request: HttpRequest,
		nonce: &str,
		timestamp: i64,
	) -> Result<HttpRequest, ConfigError> {
		let method = request.method().as_str().to_ascii_uppercase();
		let base_uri = base_uri(request.uri());
		let mut params = Vec::new();

		if let Some(query) = request.uri().query() {
			collect_form_params(query.as_bytes(), &mut params);
		}
		if has_form_body(&request) {
			collect_form_params(request.body(), &mut params);
		}

		let mut protocol = vec![
			("oauth_consumer_key".to_owned(), self.consumer.key.clone()),
			("oauth_nonce".to_owned(), nonce.to_owned()),
			("oauth_signature_method".to_owned(), SIGNATURE_METHOD.to_owned()),
			("oauth_timestamp".to_owned(), timestamp.to_string()),
		];

		if let Some(token) = &self.token {
			protocol.push(("oauth_token".to_owned(), token.value.clone()));
		}

		protocol.push(("oauth_version".to_owned(), "1.0".to_owned()));
		params.extend(protocol.iter().cloned());

		let base_string = signature_base_string(&method, &base_uri, &params);
		let signature = self.compute_signature(&base_string);

		protocol.push(("oauth_signature".to_owned(), signature));
		protocol.sort();

		signer::apply_authorization(request, authorization_header(&protocol))
	}

	fn compute_signature(&self, base_string: &str) -> String {
		let token_secret = self.token.as_ref().map(|token| token.secret.expose()).unwrap_or("");
		let key = format!("{}&{}", encode(self.consumer.secret.expose()), encode(token_secret));
		let mut mac = HmacSha1::new_from_slice(key.as_bytes())
			.expect("HMAC-SHA1 accepts keys of any length");

		mac.update(base_string.as_bytes());

		STANDARD.encode(mac.finalize().into_bytes())
	}
}

fn encode(value: &str) -> String {
	utf8_percent_encode(value, RFC5849_ENCODE_SET).to_string()
}

/// Base string URI per RFC 5849 section 3.4.1.2: lowercase scheme and host, default ports
/// elided, query stripped.
fn base_uri(uri: &Uri) -> String {
	let scheme = uri.scheme_str().unwrap_or("https").to_ascii_lowercase();
	let host = uri.host().unwrap_or_default().to_ascii_lowercase();
	let port = uri
		.port_u16()
		.filter(|port| !matches!((scheme.as_str(), port), ("http", 80) | ("https", 443)));
	let path = uri.path();

	match port {
		Some(port) => format!("{scheme}://{host}:{port}{path}"),
		None => format!("{scheme}://{host}{path}"),
	}
}

fn has_form_body(request: &HttpRequest) -> bool {
	if request.body().is_empty() {
		return false;
	}

	request
		.headers()
		.get(http::header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.map(|value| value.starts_with(FORM_MEDIA_TYPE))
		.unwrap_or_default()
}

fn collect_form_params(raw: &[u8], params: &mut Vec<(String, String)>) {
	params.extend(
		form_urlencoded::parse(raw).map(|(key, value)| (key.into_owned(), value.into_owned())),
	);
}

fn signature_base_string(method: &str, base_uri: &str, params: &[(String, String)]) -> String {
	let mut encoded: Vec<(String, String)> =
		params.iter().map(|(key, value)| (encode(key), encode(value))).collect();

	encoded.sort();

	let parameter_string = encoded
		.iter()
		.map(|(key, value)| format!("{key}={value}"))
		.collect::<Vec<_>>()
		.join("&");

	format!("{method}&{}&{}", encode(base_uri), encode(&parameter_string))
}

fn authorization_header(protocol_params: &[(String, String)]) -> String {
	let rendered = protocol_params
		.iter()
		.map(|(key, value)| format!("{}=\"{}\"", encode(key), encode(value)))
		.collect::<Vec<_>>()
		.join(", ");

	format!("OAuth {rendered}")
}
