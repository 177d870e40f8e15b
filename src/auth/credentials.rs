//! Account/session state consumed by key-data requests, plus the local verification gate.

// self
use crate::_prelude::*;

/// Capability of reporting the account's last-authentication timestamp on demand.
///
/// The value is read every time an assertion is signed, never cached by this crate.
pub trait LastAuthAt
where
	Self: Send + Sync,
{
	/// Seconds since the Unix epoch of the most recent authentication.
	fn last_auth_at(&self) -> u64;
}
impl<F> LastAuthAt for F
where
	F: Fn() -> u64 + Send + Sync,
{
	fn last_auth_at(&self) -> u64 {
		self()
	}
}

/// Read-only snapshot of an account and its session, supplied by the caller.
#[derive(Clone)]
pub struct AccountCredentials {
	/// Account identifier.
	pub uid: String,
	/// Time the account's password verifier was last set (key generation).
	pub verifier_set_at: u64,
	/// Primary email address.
	pub email: String,
	/// Source of the last-authentication timestamp.
	pub last_auth_at: Arc<dyn LastAuthAt>,
	/// Whether the primary email address is verified.
	pub email_verified: bool,
	/// Whether the session token is verified.
	pub token_verified: bool,
	/// Whether the session must be verified before sensitive operations; `None` means not
	/// required.
	pub must_verify: Option<bool>,
	/// Authentication methods used for the session (`pwd`, `email`, `otp`, ...), in the order
	/// they are asserted.
	pub authentication_methods: Vec<String>,
	/// Authenticator assurance level.
	pub authenticator_assurance_level: u8,
}
impl AccountCredentials {
	/// Invokes the last-authentication capability.
	pub fn last_auth_at(&self) -> u64 {
		self.last_auth_at.last_auth_at()
	}

	/// Runs [`verification_gate`] against these credentials.
	pub fn ensure_verified(&self) -> Result<(), GateRejection> {
		verification_gate(self)
	}
}
impl Debug for AccountCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccountCredentials")
			.field("uid", &self.uid)
			.field("verifier_set_at", &self.verifier_set_at)
			.field("email_verified", &self.email_verified)
			.field("token_verified", &self.token_verified)
			.field("must_verify", &self.must_verify)
			.field("authentication_methods", &self.authentication_methods)
			.field("authenticator_assurance_level", &self.authenticator_assurance_level)
			.finish_non_exhaustive()
	}
}

/// Reason the verification gate refused to release key data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateRejection {
	/// Primary email is unverified.
	AccountUnverified,
	/// Session must be verified and is not.
	SessionUnverified,
}
impl GateRejection {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			GateRejection::AccountUnverified => "account_unverified",
			GateRejection::SessionUnverified => "session_unverified",
		}
	}
}
impl Display for GateRejection {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<GateRejection> for Error {
	fn from(value: GateRejection) -> Self {
		match value {
			GateRejection::AccountUnverified => Error::AccountUnverified,
			GateRejection::SessionUnverified => Error::SessionUnverified,
		}
	}
}

/// Decides whether key data may be requested for these credentials.
///
/// Pure decision table: an unverified email always rejects; otherwise a session that must be
/// verified rejects until its token is verified.
pub fn verification_gate(credentials: &AccountCredentials) -> Result<(), GateRejection> {
	if !credentials.email_verified {
		return Err(GateRejection::AccountUnverified);
	}
	if credentials.must_verify == Some(true) && !credentials.token_verified {
		return Err(GateRejection::SessionUnverified);
	}

	Ok(())
}
