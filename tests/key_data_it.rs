mod support;

// crates.io
use httpmock::prelude::*;
use jsonwebtoken::{DecodingKey, Validation};
use serde_json::json;
// self
use oauthdb_client::{
	auth::{ASSERTION_ALGORITHM, ASSERTION_LIFETIME_SECS, AccountCredentials, AssertionClaims},
	client::KeyDataParams,
	error::{BackendFailure, Error},
	http::HttpMethod,
	schema::SchemaKind,
};
use support::*;

fn params() -> KeyDataParams {
	KeyDataParams::new(CLIENT_ID, format!("profile {OLDSYNC}"))
}

fn key_data_body() -> serde_json::Value {
	json!({
		OLDSYNC: {
			"identifier": OLDSYNC,
			"keyRotationSecret": KEY_ROTATION_SECRET,
			"keyRotationTimestamp": 1_506_970_363_512_u64
		}
	})
}

fn decode_assertion(token: &str, audience: &str) -> AssertionClaims {
	let mut validation = Validation::new(ASSERTION_ALGORITHM);

	validation.validate_exp = false;
	validation.set_audience(&[audience]);
	validation.set_issuer(&[ISSUER]);

	jsonwebtoken::decode::<AssertionClaims>(
		token,
		&DecodingKey::from_secret(SECRET.as_bytes()),
		&validation,
	)
	.expect("Assertion should decode with the shared secret.")
	.claims
}

#[tokio::test]
async fn scoped_key_data_posts_signed_assertion() {
	let server = MockServer::start_async().await;
	let client = reqwest_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/key-data")
				.header("content-type", "application/json");
			then.status(200)
				.header("content-type", "application/json")
				.body(key_data_body().to_string());
		})
		.await;
	let data = client
		.scoped_key_data(&verified_credentials(), &params())
		.await
		.expect("Key data request should succeed.");

	mock.assert_calls_async(1).await;

	assert_eq!(data.len(), 1);
	assert_eq!(
		serde_json::to_value(&data).expect("Key data should serialize."),
		key_data_body(),
		"Key data should round-trip unchanged."
	);

	let record = data.get(OLDSYNC).expect("Requested scope should be present.");

	assert_eq!(record.identifier, OLDSYNC);
	assert_eq!(record.key_rotation_secret.expose(), KEY_ROTATION_SECRET);
	assert_eq!(record.key_rotation_timestamp, 1_506_970_363_512);
}

#[tokio::test]
async fn assertion_describes_account_state() {
	let (client, stub) = stub_client("https://oauth.example.com/");
	let credentials = AccountCredentials { must_verify: Some(true), ..verified_credentials() };

	stub.respond(200, key_data_body());
	client
		.scoped_key_data(&credentials, &params())
		.await
		.expect("Key data request should succeed.");

	let requests = stub.requests();

	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].method, HttpMethod::Post);
	assert_eq!(requests[0].url.as_str(), "https://oauth.example.com/v1/key-data");

	let body: serde_json::Value = serde_json::from_slice(
		requests[0].body.as_deref().expect("Key data request should carry a body."),
	)
	.expect("Request body should be JSON.");

	assert_eq!(body["client_id"], CLIENT_ID);
	assert_eq!(body["scope"], format!("profile {OLDSYNC}"));

	let token = body["assertion"].as_str().expect("Assertion should be a string.");
	let claims = decode_assertion(token, "https://oauth.example.com/");

	assert_eq!(claims.iss, ISSUER);
	assert_eq!(claims.aud, "https://oauth.example.com/");
	assert_eq!(claims.sub, credentials.uid);
	assert_eq!(claims.generation, credentials.verifier_set_at);
	assert_eq!(claims.last_auth_at, LAST_AUTH_AT);
	assert_eq!(claims.verified_email, credentials.email);
	assert!(claims.token_verified);
	assert_eq!(claims.amr, credentials.authentication_methods);
	assert_eq!(claims.aal, 1);
	assert_eq!(claims.iat, NOW.unix_timestamp());
	assert_eq!(claims.exp, claims.iat + ASSERTION_LIFETIME_SECS);
}

#[tokio::test]
async fn verification_gate_blocks_before_network() {
	let (client, stub) = stub_client("https://oauth.example.com/");
	let unverified_account =
		AccountCredentials { email_verified: false, ..verified_credentials() };
	let unverified_session = AccountCredentials {
		token_verified: false,
		must_verify: Some(true),
		..verified_credentials()
	};

	assert!(matches!(
		client.scoped_key_data(&unverified_account, &params()).await,
		Err(Error::AccountUnverified)
	));
	assert!(matches!(
		client.scoped_key_data(&unverified_session, &params()).await,
		Err(Error::SessionUnverified)
	));
	assert_eq!(stub.calls(), 0, "Gate rejections must not reach the network.");
}

#[tokio::test]
async fn unverified_token_passes_when_verification_not_required() {
	let (client, stub) = stub_client("https://oauth.example.com/");

	stub.respond(200, key_data_body());
	stub.respond(200, key_data_body());

	for must_verify in [None, Some(false)] {
		let credentials =
			AccountCredentials { token_verified: false, must_verify, ..verified_credentials() };

		client
			.scoped_key_data(&credentials, &params())
			.await
			.expect("Sessions without a verification requirement should pass the gate.");
	}

	assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn malformed_params_fail_before_gate_and_network() {
	let (client, stub) = stub_client("https://oauth.example.com/");
	// Unverified on purpose: validation must win over the gate.
	let credentials = AccountCredentials { email_verified: false, ..verified_credentials() };
	let cases = [
		(KeyDataParams::new("not-a-client-id!", "profile"), SchemaKind::ClientId),
		(KeyDataParams::new(CLIENT_ID, "profile!"), SchemaKind::Scope),
		(KeyDataParams::new(CLIENT_ID, "profile#write"), SchemaKind::Scope),
		(KeyDataParams::new(CLIENT_ID, ""), SchemaKind::Scope),
		(KeyDataParams::new(CLIENT_ID, "profile  openid"), SchemaKind::Scope),
	];

	for (params, schema) in cases {
		match client.scoped_key_data(&credentials, &params).await {
			Err(Error::InternalValidation(validation)) => assert_eq!(validation.schema, schema),
			other => panic!("Unexpected result for {params:?}: {other:?}."),
		}
	}

	assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn malformed_key_rotation_secret_is_a_validation_error() {
	let (client, stub) = stub_client("https://oauth.example.com/");

	stub.respond(
		200,
		json!({
			OLDSYNC: {
				"identifier": OLDSYNC,
				"keyRotationSecret": "not-hex",
				"keyRotationTimestamp": 1_506_970_363_512_u64
			}
		}),
	);

	match client.scoped_key_data(&verified_credentials(), &params()).await {
		Err(Error::InternalValidation(validation)) => {
			assert_eq!(validation.schema, SchemaKind::ScopedKeyData);
			assert!(
				validation.path.ends_with("keyRotationSecret"),
				"Unexpected path: {}.",
				validation.path
			);
		},
		other => panic!("Unexpected result: {other:?}."),
	}
}

#[tokio::test]
async fn stale_auth_at_is_translated() {
	let server = MockServer::start_async().await;
	let client = reqwest_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/key-data");
			then.status(400).header("content-type", "application/json").body(json!({
				"code": 400,
				"errno": 119,
				"error": "Bad Request",
				"message": "Stale authentication timestamp",
				"authAt": LAST_AUTH_AT
			}).to_string());
		})
		.await;
	let err = client
		.scoped_key_data(&verified_credentials(), &params())
		.await
		.expect_err("Stale authentication should fail.");

	mock.assert_calls_async(1).await;

	match err {
		Error::StaleAuthAt { auth_at } => assert_eq!(auth_at, Some(LAST_AUTH_AT)),
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn unmapped_remote_errors_keep_payload() {
	let (client, stub) = stub_client("https://oauth.example.com/");

	stub.respond(
		400,
		json!({
			"code": 400,
			"errno": 114,
			"message": "Invalid scopes",
			"invalidScopes": ["profile:write"]
		}),
	);

	match client.scoped_key_data(&verified_credentials(), &params()).await {
		Err(Error::BackendServiceFailure(BackendFailure::Remote {
			status,
			code,
			errno,
			message,
			metadata,
		})) => {
			assert_eq!((status, code, errno), (400, 400, Some(114)));
			assert_eq!(message, "Invalid scopes");
			assert_eq!(metadata.get("invalidScopes"), Some(&json!(["profile:write"])));
		},
		other => panic!("Unexpected result: {other:?}."),
	}
}

#[tokio::test]
async fn transport_failures_are_backend_failures() {
	let (client, stub) = stub_client("https://oauth.example.com/");

	stub.fail("connection reset");

	let err = client
		.scoped_key_data(&verified_credentials(), &params())
		.await
		.expect_err("Transport failure should surface.");

	assert!(matches!(err, Error::BackendServiceFailure(BackendFailure::Transport { .. })));
	assert!(!err.is_remote());
	assert_eq!(err.errno(), None);
	assert_eq!(stub.calls(), 1, "Transport failures must not be retried.");
}

#[tokio::test]
async fn last_auth_at_is_read_per_request() {
	use std::sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	};

	let (client, stub) = stub_client("https://oauth.example.com/");
	let counter = Arc::new(AtomicU64::new(LAST_AUTH_AT));
	let source = counter.clone();
	let credentials = AccountCredentials {
		last_auth_at: Arc::new(move || source.fetch_add(1, Ordering::SeqCst)),
		..verified_credentials()
	};

	stub.respond(200, key_data_body());
	stub.respond(200, key_data_body());

	for _ in 0..2 {
		client
			.scoped_key_data(&credentials, &params())
			.await
			.expect("Key data request should succeed.");
	}

	let stamps = stub
		.requests()
		.iter()
		.map(|request| {
			let body: serde_json::Value = serde_json::from_slice(
				request.body.as_deref().expect("Key data request should carry a body."),
			)
			.expect("Request body should be JSON.");

			decode_assertion(
				body["assertion"].as_str().expect("Assertion should be a string."),
				"https://oauth.example.com/",
			)
			.last_auth_at
		})
		.collect::<Vec<_>>();

	assert_eq!(stamps, vec![LAST_AUTH_AT, LAST_AUTH_AT + 1]);
	assert_eq!(counter.load(Ordering::SeqCst), LAST_AUTH_AT + 2);
}
