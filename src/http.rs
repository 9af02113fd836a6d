//! Transport capability consumed by the execution pipeline.
//!
//! The courier owns no connection management: implementations of [`HttpTransport`] bring
//! their own pooling, TLS, timeouts, and socket-level retry policy. The pipeline hands a
//! fully signed request to [`HttpTransport::send`] and expects either a raw response or a
//! [`ResponseError::Transport`] value — any reason for not receiving a response (timeout,
//! connection error, caller-initiated cancellation) is surfaced uniformly through that
//! variant.

// self
use crate::{_prelude::*, error::ResponseError};

/// Request value handed to the transport: method, URI, headers, and a buffered body.
pub type HttpRequest = http::Request<Vec<u8>>;
/// Raw response value produced by the transport: status, headers, and a buffered body.
pub type HttpResponse = http::Response<Vec<u8>>;
/// Boxed future returned by transport implementations.
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, ResponseError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing signed requests.
///
/// Implementations must be shareable across concurrent invocations (`Send + Sync`); the
/// pipeline never serializes access to them. Each returned future owns its request value
/// exclusively, so transports need no interior locking on the request path.
pub trait HttpTransport
where
	Self: Send + Sync,
{
	/// Sends a signed request and resolves with the raw response.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] implementing [`HttpTransport`].
///
/// Timeouts and redirect policy belong to the wrapped client; configure them there before
/// handing the transport to a pipeline.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let request =
				reqwest::Request::try_from(request).map_err(ResponseError::transport)?;
			let response = client.execute(request).await.map_err(ResponseError::transport)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body =
				response.bytes().await.map_err(ResponseError::transport)?.to_vec();
			let mut raw = HttpResponse::new(body);

			*raw.status_mut() = status;
			*raw.headers_mut() = headers;

			Ok(raw)
		})
	}
}
