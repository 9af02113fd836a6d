//! Request execution pipeline and response classification.
//!
//! [`RequestPipeline::execute`] is the only network-touching operation: it signs the request
//! with the active [`Signer`], hands it to the transport, and classifies the raw result via
//! [`classify`]. Classification itself is a synchronous pure function, so the same logic
//! runs unchanged under any executor the caller picks. The pipeline performs no retries and
//! keeps exactly one request in flight per invocation; callers wanting concurrency launch
//! independent invocations, which share nothing mutable.

// crates.io
use http::{HeaderMap, StatusCode, header::CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	codec::{ErrorMessageDecoder, ResponseDecoder},
	error::ResponseError,
	http::{HttpRequest, HttpResponse, HttpTransport},
	obs,
	signer::Signer,
};

const MAX_ERROR_BODY_LEN: usize = 1024;
static DEFAULT_ERROR_DECODER: ErrorMessageDecoder = ErrorMessageDecoder;

/// Boxed future returned by pipeline executions.
pub type PipelineFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<TypedResponse<T>>> + 'a + Send>>;

/// Classified success outcome carrying the decoded body plus response metadata.
#[derive(Clone, Debug)]
pub struct TypedResponse<T> {
	/// HTTP status of the response.
	pub status: StatusCode,
	/// Response headers, untouched.
	pub headers: HeaderMap,
	/// Decoded body value.
	pub body: T,
}

/// Executes signed requests against a transport and classifies the results.
#[derive(Clone)]
pub struct RequestPipeline<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	signer: Signer,
}
impl<T> RequestPipeline<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a pipeline around the provided transport and signer.
	pub fn new(transport: impl Into<Arc<T>>, signer: Signer) -> Self {
		Self { transport: transport.into(), signer }
	}

	/// The active signer.
	pub fn signer(&self) -> &Signer {
		&self.signer
	}

	/// Replaces the active signer, e.g. after a refresh minted a new token.
	pub fn with_signer(mut self, signer: Signer) -> Self {
		self.signer = signer;

		self
	}

	/// Executes the request with the default error-payload decoder.
	pub fn execute<'a, R>(
		&'a self,
		request: HttpRequest,
		decoder: &'a dyn ResponseDecoder<R>,
	) -> PipelineFuture<'a, R> {
		self.execute_with(request, decoder, &DEFAULT_ERROR_DECODER)
	}

	/// Executes the request, decoding non-success bodies with the supplied secondary decoder.
	pub fn execute_with<'a, R>(
		&'a self,
		request: HttpRequest,
		decoder: &'a dyn ResponseDecoder<R>,
		error_decoder: &'a dyn ResponseDecoder<String>,
	) -> PipelineFuture<'a, R> {
		let span = obs::ExecutionSpan::new(request.method(), request.uri());

		Box::pin(span.instrument(async move {
			let signed = self.signer.sign(request)?;
			let response = self.transport.send(signed).await?;

			classify(response, decoder, error_decoder)
		}))
	}
}
impl<T> Debug for RequestPipeline<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestPipeline").field("signer", &self.signer).finish()
	}
}

/// Pure classification of a raw response into a typed outcome.
///
/// Non-success statuses are classified from the error payload: an empty body yields the
/// fixed empty-response message, anything else flows through the secondary decoder. Success
/// statuses negotiate the `Content-Type` against the success decoder first — a missing
/// header or an unaccepted media type fails before any decoding — and a body that then
/// fails to decode surfaces only a fixed message while the detail is logged.
///
/// Classifying the same (status, headers, body) triple twice yields identical outcomes.
pub fn classify<R>(
	response: HttpResponse,
	decoder: &dyn ResponseDecoder<R>,
	error_decoder: &dyn ResponseDecoder<String>,
) -> Result<TypedResponse<R>> {
	let (parts, body) = response.into_parts();
	let status = parts.status;

	if !status.is_success() {
		if body.is_empty() {
			return Err(ResponseError::EmptyBody { status: status.as_u16() }.into());
		}

		let message =
			error_decoder.decode(&body).unwrap_or_else(|_| truncate_body(&body));

		return Err(ResponseError::Status { status: status.as_u16(), message }.into());
	}

	let Some(media_type) = media_type(&parts.headers) else {
		return Err(ResponseError::MissingContentType { status: status.as_u16() }.into());
	};

	if !decoder.accepts(&media_type) {
		return Err(ResponseError::UnsupportedContentType {
			status: status.as_u16(),
			media_type,
			body: truncate_body(&body),
		}
		.into());
	}

	match decoder.decode(&body) {
		Ok(value) => Ok(TypedResponse { status, headers: parts.headers, body: value }),
		Err(detail) => {
			obs::record_decode_failure(status.as_u16(), &detail);

			Err(ResponseError::Decoding { status: status.as_u16() }.into())
		},
	}
}

/// Media type from the `Content-Type` header with any parameters stripped.
fn media_type(headers: &HeaderMap) -> Option<String> {
	let value = headers.get(CONTENT_TYPE)?.to_str().ok()?;

	Some(value.split(';').next().unwrap_or(value).trim().to_ascii_lowercase())
}

fn truncate_body(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.len() <= MAX_ERROR_BODY_LEN {
		return text.into_owned();
	}

	let mut end = MAX_ERROR_BODY_LEN;

	while !text.is_char_boundary(end) {
		end -= 1;
	}

	text[..end].to_owned()
}
