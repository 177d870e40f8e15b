//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauthdb_client.operation` with the
//!   `operation` and `stage` fields, plus a `warn` event for every remote error.
//! - Enable `metrics` to increment the `oauthdb_client_operation_total` counter for every
//!   attempt/success/failure (labeled by `operation` + `outcome`), the
//!   `oauthdb_client_gate_rejection_total` counter (labeled by `reason`), and the
//!   `oauthdb_client_remote_error_total` counter (labeled by `errno`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations exposed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Client metadata lookup.
	ClientInfo,
	/// Scoped key data request.
	ScopedKeyData,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::ClientInfo => "client_info",
			OperationKind::ScopedKeyData => "scoped_key_data",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records a translated remote error as a log event and a metric.
pub fn record_remote_error(status: u16, errno: Option<u32>) {
	log_remote_error(status, errno);
	count_remote_error(errno);
}
