//! Error taxonomy shared across signing, grant flows, and the execution pipeline.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical courier error exposed by public APIs.
///
/// Every failure in this crate is a value returned to the caller; nothing is fatal to the
/// process. Pipeline failures carry the originating HTTP status where one was observed so
/// callers can branch on it via [`Error::status`].
#[derive(Debug, ThisError)]
pub enum Error {
	/// Grant handshake failure raised while parsing an authorization redirect.
	#[error(transparent)]
	Authorization(#[from] AuthorizationError),
	/// Token payload failed validation or parsing.
	#[error(transparent)]
	TokenParse(#[from] TokenParseError),
	/// Response-layer failure raised by the execution pipeline.
	#[error(transparent)]
	Response(#[from] ResponseError),
	/// Local request-construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// HTTP status attached to the failure, when one was observed.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Response(inner) => inner.status(),
			_ => None,
		}
	}
}

/// Authorization-redirect failures surfaced during a grant handshake.
///
/// Server-reported error codes are carried verbatim; the courier never wraps them in
/// additional prose so integrators can match on the literal OAuth error strings.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum AuthorizationError {
	/// The redirect carried a `state` that differs from the one sent.
	#[error("state_parameter_mismatch")]
	StateMismatch,
	/// A `state` was sent but the redirect omitted it entirely.
	#[error("missing_required_state_parameter")]
	MissingState,
	/// The redirect carried neither the expected grant parameters nor an `error` code.
	#[error("missing_required_query_parameters")]
	MissingQueryParameters,
	/// Error code reported by the authorization server, verbatim.
	#[error("{0}")]
	Server(String),
}

/// Failures raised while turning a token payload into a signer value.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TokenParseError {
	/// The `expires_in` value could not be parsed as an integer.
	#[error("invalid_expires_in")]
	InvalidExpiresIn,
	/// A required token field was absent from the payload.
	#[error("Token payload is missing the `{field}` field.")]
	MissingField {
		/// Name of the absent field.
		field: &'static str,
	},
	/// The `scope` value could not be normalized.
	#[error("Token payload carries an invalid scope.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// Endpoint URL cannot be parsed.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Response-layer failures raised while classifying a raw HTTP response.
///
/// The caller-visible messages are deliberately fixed strings; decode detail is logged
/// internally instead of leaking parser internals into returned values.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// The response omitted the `Content-Type` header.
	#[error("Content-Type not provided")]
	MissingContentType {
		/// HTTP status of the offending response.
		status: u16,
	},
	/// The `Content-Type` is not accepted by the configured decoder.
	#[error("{body}")]
	UnsupportedContentType {
		/// HTTP status of the offending response.
		status: u16,
		/// Media type reported by the server.
		media_type: String,
		/// Body content, truncated to a bounded length.
		body: String,
	},
	/// A success-status body did not match the expected shape.
	#[error("There was a problem decoding or parsing this response, please check the error logs")]
	Decoding {
		/// HTTP status of the offending response.
		status: u16,
	},
	/// A non-success response arrived with an empty body.
	#[error("Response was empty. Please check request logs")]
	EmptyBody {
		/// HTTP status of the offending response.
		status: u16,
	},
	/// A non-success response carried a decodable error payload.
	#[error("{message}")]
	Status {
		/// HTTP status of the offending response.
		status: u16,
		/// Message extracted from the error payload.
		message: String,
	},
	/// No response was received (timeout, connection error, cancellation).
	#[error("There was a problem with the response. Please check error logs")]
	Transport {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
}
impl ResponseError {
	/// Wraps a transport-specific failure.
	pub fn transport(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// HTTP status attached to the failure, when one was observed.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::MissingContentType { status }
			| Self::UnsupportedContentType { status, .. }
			| Self::Decoding { status }
			| Self::EmptyBody { status }
			| Self::Status { status, .. } => Some(*status),
			Self::Transport { .. } => None,
		}
	}
}
