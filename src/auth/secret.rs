//! Pre-shared signing key wrapper that redacts sensitive material.

// self
use crate::_prelude::*;

/// Symmetric key shared with the OAuth service for assertion signing.
///
/// Accepts raw bytes or a UTF-8 string. Formatters never print the key.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct SigningSecret(Vec<u8>);
impl SigningSecret {
	/// Wraps raw key bytes.
	pub fn new(value: impl Into<Vec<u8>>) -> Self {
		Self(value.into())
	}

	/// Returns the key bytes. Callers must avoid logging them.
	pub fn expose(&self) -> &[u8] {
		&self.0
	}

	/// Length of the key in bytes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if the key is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl From<String> for SigningSecret {
	fn from(value: String) -> Self {
		Self(value.into_bytes())
	}
}
impl From<&str> for SigningSecret {
	fn from(value: &str) -> Self {
		Self(value.as_bytes().to_vec())
	}
}
impl Debug for SigningSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SigningSecret").field(&"<redacted>").finish()
	}
}
impl Display for SigningSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
