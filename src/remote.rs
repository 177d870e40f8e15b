//! Translation of the OAuth service's error payloads into the local [`Error`] taxonomy.
//!
//! Error bodies look like `{"code": 400, "errno": 101, "message": "...", ...}`. A fixed errno
//! table picks the local kind and carries forward the metadata callers need; everything else is
//! wrapped as [`BackendFailure::Remote`] with the original payload kept for diagnostics.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, error::BackendFailure, obs};

/// Remote errno values with a dedicated local error kind.
pub mod errno {
	/// The requested client id is not registered.
	pub const UNKNOWN_CLIENT: u32 = 101;
	/// The account authenticated too long ago.
	pub const STALE_AUTH_AT: u32 = 119;
}

const BODY_PREVIEW_LIMIT: usize = 256;

type JsonObject = serde_json::Map<String, Value>;

/// Structured error payload returned by the OAuth service.
///
/// Parsing is field-by-field: `errno`, `code`, and `message` are lifted out only when they have
/// the expected type, and anything else stays in `metadata`. A single off-shape field therefore
/// never hides the errno.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "JsonObject")]
pub struct RemoteError {
	/// HTTP-style status code echoed in the body.
	pub code: Option<u16>,
	/// Service-specific error number.
	pub errno: Option<u32>,
	/// Human-readable description.
	pub message: Option<String>,
	/// Remaining domain-specific fields (`clientId`, `authAt`, ...).
	#[serde(flatten)]
	pub metadata: BTreeMap<String, Value>,
}
impl RemoteError {
	/// Parses an error body, returning `None` when it is not a JSON object.
	pub fn from_body(body: &[u8]) -> Option<Self> {
		serde_json::from_slice(body).ok()
	}

	fn take_string(&mut self, key: &str) -> Option<String> {
		take_field(&mut self.metadata, key, |value| value.as_str().map(ToOwned::to_owned))
	}

	fn take_u64(&mut self, key: &str) -> Option<u64> {
		take_field(&mut self.metadata, key, Value::as_u64)
	}
}
impl From<JsonObject> for RemoteError {
	fn from(object: JsonObject) -> Self {
		let mut metadata = object.into_iter().collect::<BTreeMap<_, _>>();
		let errno = take_field(&mut metadata, "errno", |value| {
			value.as_u64().and_then(|number| u32::try_from(number).ok())
		});
		let code = take_field(&mut metadata, "code", |value| {
			value.as_u64().and_then(|number| u16::try_from(number).ok())
		});
		let message =
			take_field(&mut metadata, "message", |value| value.as_str().map(ToOwned::to_owned));

		Self { code, errno, message, metadata }
	}
}

/// Maps a remote error payload received with HTTP `status` to a local error.
pub fn translate(status: u16, mut remote: RemoteError) -> Error {
	obs::record_remote_error(status, remote.errno);

	match remote.errno {
		Some(errno::UNKNOWN_CLIENT) =>
			Error::UnknownClientId { client_id: remote.take_string("clientId") },
		Some(errno::STALE_AUTH_AT) =>
			Error::StaleAuthAt { auth_at: remote.take_u64("authAt") },
		_ => BackendFailure::Remote {
			status,
			code: remote.code.unwrap_or(status),
			errno: remote.errno,
			message: remote.message.unwrap_or_default(),
			metadata: remote.metadata,
		}
		.into(),
	}
}

/// Translates a non-success response body, tolerating bodies that are not JSON.
///
/// When the body carries no usable `message`, a preview of the raw body takes its place.
pub fn translate_body(status: u16, body: &[u8]) -> Error {
	match RemoteError::from_body(body) {
		Some(mut remote) => {
			remote.message.get_or_insert_with(|| body_preview(body));

			translate(status, remote)
		},
		None => {
			obs::record_remote_error(status, None);

			BackendFailure::Remote {
				status,
				code: status,
				errno: None,
				message: body_preview(body),
				metadata: BTreeMap::new(),
			}
			.into()
		},
	}
}

/// Removes `key` when `parse` accepts its value; otherwise leaves the entry in place.
fn take_field<T>(
	metadata: &mut BTreeMap<String, Value>,
	key: &str,
	parse: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
	let parsed = parse(metadata.get(key)?)?;

	metadata.remove(key);

	Some(parsed)
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return text.into_owned();
	}

	let mut buf = text.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}
