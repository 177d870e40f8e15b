//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::{collections::VecDeque, sync::Arc};
// crates.io
use parking_lot::Mutex;
use time::{OffsetDateTime, macros::datetime};
// self
use oauthdb_client::{
	auth::AccountCredentials,
	client::OAuthClient,
	clock::FixedClock,
	config::ClientConfig,
	http::{HttpFuture, HttpRequest, HttpResponse, OAuthHttpClient, ReqwestHttpClient},
	url::Url,
};

pub const ISSUER: &str = "accounts.example.com";
pub const SECRET: &str = "integration-signing-secret";
pub const CLIENT_ID: &str = "0123456789abcdef";
pub const OLDSYNC: &str = "https://identity.mozilla.com/apps/oldsync";
pub const KEY_ROTATION_SECRET: &str =
	"0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
pub const LAST_AUTH_AT: u64 = 1_510_011_454;
pub const NOW: OffsetDateTime = datetime!(2024-05-01 12:00:00 UTC);

/// Builds a validated configuration pointing at `oauth_url`.
pub fn config(oauth_url: &str) -> ClientConfig {
	ClientConfig::builder()
		.oauth_url(Url::parse(oauth_url).expect("Fixture OAuth URL should parse."))
		.issuer(ISSUER)
		.secret(SECRET)
		.build()
		.expect("Fixture config should build.")
}

/// Builds a reqwest-backed client with a fixed clock.
pub fn reqwest_client(oauth_url: &str) -> OAuthClient<ReqwestHttpClient> {
	OAuthClient::new(config(oauth_url)).with_clock(Arc::new(FixedClock(NOW)))
}

/// Builds a stub-backed client with a fixed clock, returning the stub for inspection.
pub fn stub_client(oauth_url: &str) -> (OAuthClient<StubHttpClient>, Arc<StubHttpClient>) {
	let stub = Arc::new(StubHttpClient::default());
	let client = OAuthClient::with_http_client(config(oauth_url), stub.clone())
		.with_clock(Arc::new(FixedClock(NOW)));

	(client, stub)
}

/// Credentials for a fully verified account and session.
pub fn verified_credentials() -> AccountCredentials {
	AccountCredentials {
		uid: "f9916686c226415abd06ae550f073cec".into(),
		verifier_set_at: 1_500_000_000,
		email: "user@example.com".into(),
		last_auth_at: Arc::new(|| LAST_AUTH_AT),
		email_verified: true,
		token_verified: true,
		must_verify: None,
		authentication_methods: vec!["pwd".to_owned(), "email".to_owned()],
		authenticator_assurance_level: 1,
	}
}

/// In-memory transport that records requests and replays queued responses.
#[derive(Debug, Default)]
pub struct StubHttpClient {
	requests: Mutex<Vec<HttpRequest>>,
	responses: Mutex<VecDeque<Result<HttpResponse, StubTransportError>>>,
}
impl StubHttpClient {
	/// Queues a JSON response.
	pub fn respond(&self, status: u16, body: serde_json::Value) {
		self.responses.lock().push_back(Ok(HttpResponse::new(status, body.to_string())));
	}

	/// Queues a raw response body.
	pub fn respond_raw(&self, status: u16, body: &str) {
		self.responses.lock().push_back(Ok(HttpResponse::new(status, body)));
	}

	/// Queues a transport failure.
	pub fn fail(&self, message: &str) {
		self.responses.lock().push_back(Err(StubTransportError(message.to_owned())));
	}

	/// Requests observed so far.
	pub fn requests(&self) -> Vec<HttpRequest> {
		self.requests.lock().clone()
	}

	/// Number of requests observed so far.
	pub fn calls(&self) -> usize {
		self.requests.lock().len()
	}
}
impl OAuthHttpClient for StubHttpClient {
	type TransportError = StubTransportError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		self.requests.lock().push(request);

		let next = self
			.responses
			.lock()
			.pop_front()
			.unwrap_or_else(|| Err(StubTransportError("No response queued.".into())));

		Box::pin(async move { next })
	}
}

/// Transport failure produced by [`StubHttpClient`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("Stub transport failure: {0}")]
pub struct StubTransportError(pub String);
