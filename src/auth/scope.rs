//! Scope strings sent to the key-data endpoint.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

/// Maximum length of a scope string, in bytes.
pub const SCOPE_MAX_LEN: usize = 256;

/// Errors emitted when validating scope strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// The scope string is empty.
	#[error("Scope string cannot be empty.")]
	Empty,
	/// The scope string exceeded [`SCOPE_MAX_LEN`].
	#[error("Scope string exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted length.
		max: usize,
	},
	/// Two separators are adjacent, or the string starts or ends with a separator.
	#[error("Scope string contains an empty token.")]
	EmptyToken,
	/// A token contains a character outside the permitted set.
	#[error("Scope token `{token}` contains the reserved character {character:?}.")]
	InvalidCharacter {
		/// The offending token.
		token: String,
		/// The first offending character.
		character: char,
	},
}

/// Space-delimited list of scope tokens, kept verbatim for the wire.
///
/// Tokens are drawn from `A-Z a-z 0-9 . _ : / -`, which covers both short names (`profile`)
/// and URL-shaped scopes (`https://identity.mozilla.com/apps/oldsync`). Reserved punctuation
/// such as `!` or `#` is rejected locally, before any request is built.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScopeString(String);
impl ScopeString {
	/// Validates and wraps a scope string.
	pub fn new(value: impl Into<String>) -> Result<Self, ScopeValidationError> {
		let owned = value.into();

		validate(&owned)?;

		Ok(Self(owned))
	}

	/// Iterator over the individual scope tokens, in request order.
	pub fn tokens(&self) -> impl Iterator<Item = &str> {
		self.0.split(' ')
	}

	/// Returns true when `scope` is one of the tokens.
	pub fn contains(&self, scope: &str) -> bool {
		self.tokens().any(|token| token == scope)
	}

	/// Returns the raw scope string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Deref for ScopeString {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ScopeString {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<ScopeString> for String {
	fn from(value: ScopeString) -> Self {
		value.0
	}
}
impl TryFrom<String> for ScopeString {
	type Error = ScopeValidationError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl FromStr for ScopeString {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for ScopeString {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeString").field(&self.0).finish()
	}
}
impl Display for ScopeString {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn validate(value: &str) -> Result<(), ScopeValidationError> {
	if value.is_empty() {
		return Err(ScopeValidationError::Empty);
	}
	if value.len() > SCOPE_MAX_LEN {
		return Err(ScopeValidationError::TooLong { max: SCOPE_MAX_LEN });
	}

	for token in value.split(' ') {
		if token.is_empty() {
			return Err(ScopeValidationError::EmptyToken);
		}
		if let Some(character) = token.chars().find(|ch| !is_scope_char(*ch)) {
			return Err(ScopeValidationError::InvalidCharacter { token: token.to_owned(), character });
		}
	}

	Ok(())
}

fn is_scope_char(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | ':' | '/' | '-')
}
