//! OAuth client identifiers validated before they reach a request path or body.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Number of hexadecimal characters in a client identifier (8 raw bytes).
pub const CLIENT_ID_LEN: usize = 16;

/// Error returned when client identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier does not have exactly [`CLIENT_ID_LEN`] characters.
	#[error("Client identifier must be {expected} hexadecimal characters, got {actual}.")]
	InvalidLength {
		/// Required character count.
		expected: usize,
		/// Observed character count.
		actual: usize,
	},
	/// The identifier contains a non-hexadecimal character.
	#[error("Client identifier contains a non-hexadecimal character at index {index}.")]
	NotHex {
		/// Character index of the first offending character.
		index: usize,
	},
}

/// Identifier of an OAuth client registered with the OAuth service.
///
/// Always [`CLIENT_ID_LEN`] ASCII hex digits. Letter case is preserved exactly as supplied, so a
/// validated id round-trips to the wire unchanged.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);
impl ClientId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Returns the identifier as supplied.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Deref for ClientId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ClientId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<ClientId> for String {
	fn from(value: ClientId) -> Self {
		value.0
	}
}
impl TryFrom<String> for ClientId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for ClientId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ClientId({})", self.0)
	}
}
impl Display for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ClientId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if let Some(index) = view.chars().position(|ch| !ch.is_ascii_hexdigit()) {
		return Err(IdentifierError::NotHex { index });
	}
	if view.len() != CLIENT_ID_LEN {
		return Err(IdentifierError::InvalidLength { expected: CLIENT_ID_LEN, actual: view.len() });
	}

	Ok(())
}
