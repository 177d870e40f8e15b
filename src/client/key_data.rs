//! Scoped key-data retrieval on behalf of an authenticated account.
//!
//! [`OAuthClient::scoped_key_data`] runs every local check before the network is touched:
//! parameter validation, then the verification gate, then assertion signing. Only then is
//! `POST {oauth_url}/v1/key-data` issued with the client id, scope, and signed assertion.

// self
use crate::{
	_prelude::*,
	auth::{AccountCredentials, ClientId, ScopeString, SignedAssertion},
	client::{KeyDataParams, OAuthClient, common},
	error::BackendFailure,
	http::{HttpRequest, OAuthHttpClient},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	schema::{self, SchemaKind, ScopedKeyData},
};

#[derive(Serialize)]
struct KeyDataRequest<'a> {
	client_id: &'a ClientId,
	scope: &'a ScopeString,
	assertion: &'a SignedAssertion,
}

impl<C> OAuthClient<C>
where
	C: ?Sized + OAuthHttpClient,
{
	/// Retrieves key-rotation data for each requested scope.
	///
	/// Fails with [`Error::AccountUnverified`] or [`Error::SessionUnverified`] when the
	/// credentials do not pass the verification gate; in that case no assertion is signed and
	/// no request is sent.
	pub async fn scoped_key_data(
		&self,
		credentials: &AccountCredentials,
		params: &KeyDataParams,
	) -> Result<ScopedKeyData> {
		const KIND: OperationKind = OperationKind::ScopedKeyData;

		let span = OperationSpan::new(KIND, "scoped_key_data");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let client_id = schema::validate_client_id(&params.client_id)?;
				let scope = schema::validate_scope(&params.scope)?;

				credentials.ensure_verified().inspect_err(|reason| {
					obs::record_gate_rejection(*reason);
				})?;

				let assertion = self.signer.sign(credentials)?;
				let url = common::endpoint(self.config().oauth_url(), ["v1", "key-data"])?;
				let request = HttpRequest::post_json(
					url,
					&KeyDataRequest { client_id: &client_id, scope: &scope, assertion: &assertion },
				)
				.map_err(BackendFailure::from)?;

				common::send(self, SchemaKind::ScopedKeyData, request).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_operation_outcome(KIND, OperationOutcome::Success),
			Err(_) => obs::record_operation_outcome(KIND, OperationOutcome::Failure),
		}

		result
	}
}
