//! Client-level error taxonomy shared by every operation.
//!
//! Each variant is a stable kind callers can match on. Validation failures and verification-gate
//! rejections are always raised before any network call; everything the remote service reports
//! goes through [`remote::translate`](crate::remote::translate).

// self
use crate::{_prelude::*, config::ConfigError, schema::ValidationError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Malformed input parameter or malformed remote response body.
	///
	/// Always local and programmer-facing; never a remote-service error.
	#[error(transparent)]
	InternalValidation(#[from] ValidationError),
	/// The OAuth service does not know the requested client.
	#[error("Unknown OAuth client: {}.", display_or_unspecified(.client_id))]
	UnknownClientId {
		/// Client identifier echoed by the remote service.
		client_id: Option<String>,
	},
	/// The account's last authentication is too old for the requested operation.
	#[error("Stale authentication time: {}.", display_or_unspecified(.auth_at))]
	StaleAuthAt {
		/// Authentication timestamp echoed by the remote service.
		auth_at: Option<u64>,
	},
	/// The account's primary email address has not been verified.
	#[error("Account is not verified.")]
	AccountUnverified,
	/// The session must be verified before key data can be released.
	#[error("Session is not verified.")]
	SessionUnverified,
	/// Unmapped remote error, transport failure, or a local encoding/signing failure.
	#[error(transparent)]
	BackendServiceFailure(#[from] BackendFailure),
	/// Client configuration is invalid.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// Returns the upstream errno when the error originated from a remote error payload.
	pub fn errno(&self) -> Option<u32> {
		match self {
			Self::UnknownClientId { .. } => Some(crate::remote::errno::UNKNOWN_CLIENT),
			Self::StaleAuthAt { .. } => Some(crate::remote::errno::STALE_AUTH_AT),
			Self::BackendServiceFailure(BackendFailure::Remote { errno, .. }) => *errno,
			_ => None,
		}
	}

	/// Returns true when the OAuth service (rather than this client) produced the error.
	pub fn is_remote(&self) -> bool {
		matches!(
			self,
			Self::UnknownClientId { .. }
				| Self::StaleAuthAt { .. }
				| Self::BackendServiceFailure(BackendFailure::Remote { .. })
		)
	}
}

/// Details carried by [`Error::BackendServiceFailure`].
#[derive(Debug, ThisError)]
pub enum BackendFailure {
	/// The service answered with an error this client has no dedicated kind for.
	#[error("OAuth service returned an error (code {code}, errno {}): {message}.", display_or_unspecified(.errno))]
	Remote {
		/// HTTP status of the response.
		status: u16,
		/// `code` field of the error body, or the HTTP status when absent.
		code: u16,
		/// `errno` field of the error body, when present.
		errno: Option<u32>,
		/// `message` field of the error body, or a preview of a non-JSON body.
		message: String,
		/// Remaining fields of the error body, kept for diagnostics.
		metadata: BTreeMap<String, serde_json::Value>,
	},
	/// No HTTP response was received at all (DNS, TCP, TLS).
	#[error("Transport error occurred while calling the OAuth service.")]
	Transport {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// The request body could not be encoded.
	#[error("Failed to encode the request body.")]
	Encoding {
		/// Underlying JSON encoding failure.
		#[source]
		source: serde_json::Error,
	},
	/// The account assertion could not be encoded.
	#[error("Failed to sign the account assertion.")]
	Signing {
		/// Underlying JWT encoding failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}
impl BackendFailure {
	/// Wraps a transport-specific failure.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}
}
impl From<serde_json::Error> for BackendFailure {
	fn from(e: serde_json::Error) -> Self {
		Self::Encoding { source: e }
	}
}
impl From<jsonwebtoken::errors::Error> for BackendFailure {
	fn from(e: jsonwebtoken::errors::Error) -> Self {
		Self::Signing { source: e }
	}
}

fn display_or_unspecified<T>(value: &Option<T>) -> String
where
	T: Display,
{
	value.as_ref().map_or_else(|| "<unspecified>".into(), |v| v.to_string())
}
