//! Body decoding capability consumed by the execution pipeline.
//!
//! Decoders are explicit values passed at the call site rather than ambient lookups: a call
//! that executes a request supplies the decoder for its expected body shape, and the
//! classifier consults [`ResponseDecoder::accepts`] to negotiate the response `Content-Type`
//! before any bytes are parsed.

// std
use std::marker::PhantomData;
// self
use crate::_prelude::*;

/// Decoder capability turning raw body bytes into a typed value.
pub trait ResponseDecoder<T>
where
	Self: Send + Sync,
{
	/// Returns true when the decoder accepts the given media type (parameters stripped).
	fn accepts(&self, media_type: &str) -> bool;

	/// Decodes the body bytes into the target type.
	fn decode(&self, body: &[u8]) -> Result<T, DecodeError>;
}

/// Structured decode failure.
///
/// The pipeline logs this detail internally and surfaces only a fixed message to callers, so
/// parser internals never leak into returned error values.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not the expected JSON shape.
	#[error("Body did not match the expected JSON shape.")]
	Json(#[from] serde_path_to_error::Error<serde_json::Error>),
	/// Body is not valid UTF-8.
	#[error("Body is not valid UTF-8.")]
	Utf8(#[from] std::str::Utf8Error),
	/// Decoder-specific failure.
	#[error("{0}")]
	Other(String),
}

/// JSON decoder for any [`DeserializeOwned`] target.
///
/// Accepts `application/json` plus `+json` suffixed media types and reports structured
/// failure paths via `serde_path_to_error`.
pub struct JsonDecoder<T> {
	_marker: PhantomData<fn() -> T>,
}
impl<T> JsonDecoder<T> {
	/// Creates a new JSON decoder.
	pub fn new() -> Self {
		Self { _marker: PhantomData }
	}
}
impl<T> Default for JsonDecoder<T> {
	fn default() -> Self {
		Self::new()
	}
}
impl<T> ResponseDecoder<T> for JsonDecoder<T>
where
	T: serde::de::DeserializeOwned,
{
	fn accepts(&self, media_type: &str) -> bool {
		media_type == "application/json" || media_type.ends_with("+json")
	}

	fn decode(&self, body: &[u8]) -> Result<T, DecodeError> {
		let mut deserializer = serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(DecodeError::from)
	}
}

/// Secondary decoder for error payloads, which rarely share the success body's shape.
///
/// Pulls a human-readable message out of the common JSON error keys and otherwise returns
/// the body as text; accepts any media type so a misbehaving server still yields a usable
/// message.
#[derive(Clone, Copy, Debug, Default)]
pub struct ErrorMessageDecoder;
impl ResponseDecoder<String> for ErrorMessageDecoder {
	fn accepts(&self, _media_type: &str) -> bool {
		true
	}

	fn decode(&self, body: &[u8]) -> Result<String, DecodeError> {
		if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
			for key in ["message", "error_description", "error"] {
				if let Some(message) = value.get(key).and_then(serde_json::Value::as_str) {
					return Ok(message.to_owned());
				}
			}

			return Ok(value.to_string());
		}

		Ok(String::from_utf8_lossy(body).into_owned())
	}
}

/// Plain-text decoder producing the body verbatim.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextDecoder;
impl ResponseDecoder<String> for TextDecoder {
	fn accepts(&self, media_type: &str) -> bool {
		media_type.starts_with("text/")
	}

	fn decode(&self, body: &[u8]) -> Result<String, DecodeError> {
		Ok(std::str::from_utf8(body)?.to_owned())
	}
}
