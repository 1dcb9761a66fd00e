// self
use crate::{_prelude::*, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by engine operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the operation kind + carrier.
	pub fn new(kind: OperationKind, carrier: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("carrier_integration.op", operation = kind.as_str(), carrier);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, carrier);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
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

	/// Emits a `warn` event describing a failed operation inside this span.
	pub fn record_failure(&self, err: &Error) {
		#[cfg(feature = "tracing")]
		{
			tracing::warn!(
				parent: &self.span,
				kind = err.kind.as_str(),
				http_status = err.http_status,
				request_id = err.request_id.as_deref(),
				"{}",
				err.message
			);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = err;
		}
	}
}
