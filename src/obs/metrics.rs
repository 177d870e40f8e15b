// self
use crate::{
	auth::GateRejection,
	obs::{OperationKind, OperationOutcome},
};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauthdb_client_operation_total",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a verification-gate rejection.
pub fn record_gate_rejection(reason: GateRejection) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauthdb_client_gate_rejection_total", "reason" => reason.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = reason;
	}
}

/// Counts a remote error by errno (`none` when the body carried no errno).
pub fn count_remote_error(errno: Option<u32>) {
	#[cfg(feature = "metrics")]
	{
		let label = errno.map_or_else(|| "none".to_owned(), |value| value.to_string());

		metrics::counter!("oauthdb_client_remote_error_total", "errno" => label).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = errno;
	}
}
