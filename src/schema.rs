//! Shape validation for outbound parameters and inbound response bodies.
//!
//! Outbound values are checked before a request is built; inbound bodies are deserialized into
//! strongly typed models with [`serde_path_to_error`], so any mismatch reports the exact field
//! path that failed. A [`ValidationError`] is always local and never describes a remote failure.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeString},
};

/// Number of hexadecimal characters in a key-rotation secret (32 raw bytes).
pub const KEY_ROTATION_SECRET_LEN: usize = 64;

/// Schemas enforced by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
	/// Outbound client identifier.
	ClientId,
	/// Outbound scope string.
	Scope,
	/// Inbound client metadata.
	ClientInfo,
	/// Inbound scoped key data.
	ScopedKeyData,
}
impl SchemaKind {
	/// Returns a stable label suitable for error messages and span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SchemaKind::ClientId => "client_id",
			SchemaKind::Scope => "scope",
			SchemaKind::ClientInfo => "client_info",
			SchemaKind::ScopedKeyData => "scoped_key_data",
		}
	}
}
impl Display for SchemaKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Shape mismatch in an outbound parameter or an inbound body.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Invalid {schema} at `{path}`: {reason}")]
pub struct ValidationError {
	/// Schema that rejected the value.
	pub schema: SchemaKind,
	/// Dotted path of the failing field (`.` for the value itself).
	pub path: String,
	/// Human-readable description of the mismatch.
	pub reason: String,
}
impl ValidationError {
	/// Creates a validation error for `path` under `schema`.
	pub fn new(schema: SchemaKind, path: impl Into<String>, reason: impl Display) -> Self {
		Self { schema, path: path.into(), reason: reason.to_string() }
	}
}

/// Client metadata returned by `GET /v1/client/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
	/// Client identifier.
	pub id: ClientId,
	/// Display name.
	pub name: String,
	/// Whether the client is a first-party (trusted) application.
	pub trusted: bool,
	/// Registered redirect URI; always absolute.
	pub redirect_uri: Url,
}

/// Hex-encoded key-rotation secret: exactly [`KEY_ROTATION_SECRET_LEN`] lowercase hex digits.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyRotationSecret(String);
impl KeyRotationSecret {
	/// Validates and wraps a hex secret.
	pub fn new(value: impl Into<String>) -> Result<Self, KeyRotationSecretError> {
		let owned = value.into();

		if owned.len() != KEY_ROTATION_SECRET_LEN {
			return Err(KeyRotationSecretError::InvalidLength {
				expected: KEY_ROTATION_SECRET_LEN,
				actual: owned.len(),
			});
		}
		if let Some(index) = owned.chars().position(|ch| !matches!(ch, '0'..='9' | 'a'..='f')) {
			return Err(KeyRotationSecretError::NotLowercaseHex { index });
		}

		Ok(Self(owned))
	}

	/// Returns the hex string. Callers must avoid logging it.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl TryFrom<String> for KeyRotationSecret {
	type Error = KeyRotationSecretError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl From<KeyRotationSecret> for String {
	fn from(value: KeyRotationSecret) -> Self {
		value.0
	}
}
impl Debug for KeyRotationSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("KeyRotationSecret").field(&"<redacted>").finish()
	}
}

/// Error returned when a key-rotation secret is malformed.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum KeyRotationSecretError {
	/// Wrong number of characters.
	#[error("key rotation secret must be {expected} hex characters, got {actual}")]
	InvalidLength {
		/// Required character count.
		expected: usize,
		/// Observed character count.
		actual: usize,
	},
	/// A character is not a lowercase hex digit.
	#[error("key rotation secret has a non-lowercase-hex character at index {index}")]
	NotLowercaseHex {
		/// Character index of the first offending character.
		index: usize,
	},
}

/// Key-rotation record for one scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRotationRecord {
	/// Scope identifier the key belongs to.
	pub identifier: String,
	/// Secret used to derive scoped keys.
	pub key_rotation_secret: KeyRotationSecret,
	/// Time of the last key rotation.
	pub key_rotation_timestamp: u64,
}

/// Key data returned by `POST /v1/key-data`, keyed by scope identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopedKeyData(pub BTreeMap<String, KeyRotationRecord>);
impl ScopedKeyData {
	/// Returns the record for `scope`, if present.
	pub fn get(&self, scope: &str) -> Option<&KeyRotationRecord> {
		self.0.get(scope)
	}

	/// Iterator over `(scope, record)` pairs, ordered by scope.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyRotationRecord)> {
		self.0.iter().map(|(scope, record)| (scope.as_str(), record))
	}

	/// Number of scopes with key data.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if the service returned no key data.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Validates an outbound client identifier.
pub fn validate_client_id(raw: &str) -> Result<ClientId, ValidationError> {
	ClientId::new(raw).map_err(|err| ValidationError::new(SchemaKind::ClientId, "client_id", err))
}

/// Validates an outbound scope string.
pub fn validate_scope(raw: &str) -> Result<ScopeString, ValidationError> {
	ScopeString::new(raw).map_err(|err| ValidationError::new(SchemaKind::Scope, "scope", err))
}

/// Deserializes and validates an inbound JSON body against `schema`.
pub fn validate_response<T>(schema: SchemaKind, body: &[u8]) -> Result<T, ValidationError>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(body);
	let value = serde_path_to_error::deserialize(&mut de)
		.map_err(|err| ValidationError::new(schema, err.path().to_string(), err.inner()))?;

	de.end().map_err(|err| ValidationError::new(schema, ".", err))?;

	Ok(value)
}
