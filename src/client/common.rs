//! Shared request lifecycle for client operations (endpoint building, send, response handling).

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	client::OAuthClient,
	config::ConfigError,
	error::BackendFailure,
	http::{HttpRequest, OAuthHttpClient},
	remote,
	schema::{self, SchemaKind},
};

/// Raw key-data parameters supplied by the caller; validated before use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDataParams {
	/// Requesting OAuth client identifier.
	pub client_id: String,
	/// Space-delimited scopes to fetch key data for.
	pub scope: String,
}
impl KeyDataParams {
	/// Creates parameters from raw strings.
	pub fn new(client_id: impl Into<String>, scope: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), scope: scope.into() }
	}
}

/// Appends `segments` to `base`, keeping any path prefix `base` carries.
///
/// Each segment is percent-encoded, so caller-derived values cannot alter the path structure.
pub(crate) fn endpoint<I>(base: &Url, segments: I) -> Result<Url>
where
	I: IntoIterator,
	I::Item: AsRef<str>,
{
	let mut url = base.clone();

	url.path_segments_mut()
		.map_err(|_| ConfigError::NotABaseUrl { url: base.to_string() })?
		.pop_if_empty()
		.extend(segments);

	Ok(url)
}

/// Sends `request` and turns the response into a validated `T` or a translated error.
pub(crate) async fn send<C, T>(
	client: &OAuthClient<C>,
	schema: SchemaKind,
	request: HttpRequest,
) -> Result<T>
where
	C: ?Sized + OAuthHttpClient,
	T: DeserializeOwned,
{
	let response = client.http_client.execute(request).await.map_err(BackendFailure::transport)?;

	if !response.is_success() {
		return Err(remote::translate_body(response.status, &response.body));
	}

	Ok(schema::validate_response(schema, &response.body)?)
}
