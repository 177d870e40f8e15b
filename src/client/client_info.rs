//! Client metadata lookup.
//!
//! [`OAuthClient::client_info`] validates the identifier locally, issues
//! `GET {oauth_url}/v1/client/{client_id}`, and validates the returned metadata before handing
//! it back. A malformed identifier never reaches the network.

// self
use crate::{
	_prelude::*,
	client::{OAuthClient, common},
	http::{HttpRequest, OAuthHttpClient},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	schema::{self, ClientInfo, SchemaKind},
};

impl<C> OAuthClient<C>
where
	C: ?Sized + OAuthHttpClient,
{
	/// Fetches public metadata for a registered OAuth client.
	pub async fn client_info(&self, client_id: &str) -> Result<ClientInfo> {
		const KIND: OperationKind = OperationKind::ClientInfo;

		let span = OperationSpan::new(KIND, "client_info");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let client_id = schema::validate_client_id(client_id)?;
				let url = common::endpoint(
					self.config().oauth_url(),
					["v1", "client", client_id.as_str()],
				)?;

				common::send(self, SchemaKind::ClientInfo, HttpRequest::get(url)).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_operation_outcome(KIND, OperationOutcome::Success),
			Err(_) => obs::record_operation_outcome(KIND, OperationOutcome::Failure),
		}

		result
	}
}
