//! Access-token signer values decoded from token-endpoint responses.

// crates.io
use serde::{Deserializer, de::Error as DeError};
// self
use crate::{
	_prelude::*,
	auth::{RefreshToken, ScopeSet, Secret},
	error::TokenParseError,
};

/// Raw token-endpoint payload shared by both signer shapes.
///
/// Mirrors the wire contract `{access_token, token_type, expires_in, refresh_token?, scope?}`
/// where `scope` arrives as a space-joined string.
#[derive(Clone, Debug, Deserialize)]
struct TokenPayload {
	access_token: String,
	token_type: String,
	expires_in: i64,
	#[serde(default)]
	refresh_token: Option<String>,
	#[serde(default)]
	scope: Option<String>,
}
impl TokenPayload {
	fn scope_set(&self) -> Result<ScopeSet, TokenParseError> {
		match self.scope.as_deref() {
			Some(raw) => ScopeSet::from_str(raw).map_err(TokenParseError::from),
			None => Ok(ScopeSet::default()),
		}
	}
}

/// Refreshable access-token signer issued by a token endpoint.
///
/// Expiry is `generated_at + expires_in`; the courier never refreshes automatically. Callers
/// detect expiry via [`is_expired`](Self::is_expired) and mint a replacement through the
/// refresh-token request explicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessTokenSigner {
	/// Bearer token secret; callers must avoid logging it.
	pub access_token: Secret,
	/// Token type reported by the server (typically `bearer`).
	pub token_type: String,
	/// Lifetime relative to `generated_at`.
	pub expires_in: Duration,
	/// Scopes granted to this token.
	pub scope: ScopeSet,
	/// Refresh token, when the server issued one.
	pub refresh_token: Option<RefreshToken>,
	/// Instant this signer was decoded, used as the expiry anchor.
	pub generated_at: OffsetDateTime,
}
impl AccessTokenSigner {
	/// Instant at which the access token stops being valid.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.generated_at + self.expires_in
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at()
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	fn from_payload(payload: TokenPayload, generated_at: OffsetDateTime) -> Result<Self, TokenParseError> {
		let scope = payload.scope_set()?;

		Ok(Self {
			access_token: Secret::new(payload.access_token),
			token_type: payload.token_type,
			expires_in: Duration::seconds(payload.expires_in),
			scope,
			refresh_token: payload.refresh_token.map(RefreshToken::new),
			generated_at,
		})
	}
}
impl<'de> Deserialize<'de> for AccessTokenSigner {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let payload = TokenPayload::deserialize(deserializer)?;

		Self::from_payload(payload, OffsetDateTime::now_utc()).map_err(DeError::custom)
	}
}

/// Access-token signer with no refresh token; expiry requires a fresh grant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NonRefreshableTokenSigner {
	/// Bearer token secret; callers must avoid logging it.
	pub access_token: Secret,
	/// Token type reported by the server (typically `bearer`).
	pub token_type: String,
	/// Lifetime relative to `generated_at`.
	pub expires_in: Duration,
	/// Scopes granted to this token.
	pub scope: ScopeSet,
	/// Instant this signer was decoded, used as the expiry anchor.
	pub generated_at: OffsetDateTime,
}
impl NonRefreshableTokenSigner {
	/// Assembles a signer from already-extracted redirect or payload fields.
	pub fn new(
		access_token: impl Into<String>,
		token_type: impl Into<String>,
		expires_in_seconds: i64,
		scope: ScopeSet,
		generated_at: OffsetDateTime,
	) -> Self {
		Self {
			access_token: Secret::new(access_token),
			token_type: token_type.into(),
			expires_in: Duration::seconds(expires_in_seconds),
			scope,
			generated_at,
		}
	}

	/// Instant at which the access token stops being valid.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.generated_at + self.expires_in
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at()
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl<'de> Deserialize<'de> for NonRefreshableTokenSigner {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let payload = TokenPayload::deserialize(deserializer)?;
		let scope = payload.scope_set().map_err(DeError::custom)?;

		Ok(Self::new(
			payload.access_token,
			payload.token_type,
			payload.expires_in,
			scope,
			OffsetDateTime::now_utc(),
		))
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn refreshable_signer_decodes_full_payload() {
		let signer: AccessTokenSigner = serde_json::from_str(
			"{\"access_token\":\"tok\",\"token_type\":\"bearer\",\"expires_in\":3600,\
			\"refresh_token\":\"ref\",\"scope\":\"email profile\"}",
		)
		.expect("Full token payload should decode successfully.");

		assert_eq!(signer.access_token.expose(), "tok");
		assert_eq!(signer.token_type, "bearer");
		assert_eq!(signer.expires_in, Duration::seconds(3600));
		assert_eq!(
			signer.refresh_token.as_ref().map(RefreshToken::expose),
			Some("ref"),
		);
		assert!(signer.scope.contains("email"));
	}

	#[test]
	fn refreshable_signer_tolerates_optional_fields() {
		let signer: AccessTokenSigner = serde_json::from_str(
			"{\"access_token\":\"tok\",\"token_type\":\"bearer\",\"expires_in\":60}",
		)
		.expect("Minimal token payload should decode successfully.");

		assert!(signer.refresh_token.is_none());
		assert!(signer.scope.is_empty());
	}

	#[test]
	fn missing_required_fields_fail_decoding() {
		let result: Result<AccessTokenSigner, _> =
			serde_json::from_str("{\"access_token\":\"tok\",\"token_type\":\"bearer\"}");

		assert!(result.is_err(), "Payload without expires_in must be rejected.");
	}

	#[test]
	fn expiry_is_anchored_to_generated_at() {
		let generated_at = macros::datetime!(2025-01-01 00:00 UTC);
		let signer = NonRefreshableTokenSigner::new(
			"tok123",
			"bearer",
			3600,
			ScopeSet::default(),
			generated_at,
		);

		assert_eq!(signer.expires_at(), macros::datetime!(2025-01-01 01:00 UTC));
		assert!(!signer.is_expired_at(macros::datetime!(2025-01-01 00:59 UTC)));
		assert!(signer.is_expired_at(macros::datetime!(2025-01-01 01:00 UTC)));
	}
}
