//! Optional observability helpers for the execution pipeline.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth_courier.execute` with the
//!   `method` and `path` fields, and to log decode-failure detail that the pipeline keeps out
//!   of caller-visible error values.

// self
use crate::_prelude::*;

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedExecution<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedExecution<F> = F;

/// A span builder wrapping one pipeline execution.
#[derive(Clone, Debug)]
pub struct ExecutionSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl ExecutionSpan {
	/// Creates a new span tagged with the request method and path.
	pub fn new(method: &http::Method, uri: &http::Uri) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("oauth_courier.execute", method = %method, path = uri.path());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, uri);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedExecution<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Records the detail of a success-status decode failure.
///
/// Callers only ever see a fixed message; the parser detail lands here.
pub(crate) fn record_decode_failure(status: u16, detail: &dyn Display) {
	#[cfg(feature = "tracing")]
	tracing::error!(status, detail = %detail, "Failed to decode a success response body.");
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (status, detail);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let method = http::Method::GET;
		let uri: http::Uri = "https://example.com/me".parse().expect("URI fixture should parse.");
		let span = ExecutionSpan::new(&method, &uri);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
