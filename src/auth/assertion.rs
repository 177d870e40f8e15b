//! Signed, time-bounded account assertions attached to key-data requests.
//!
//! Every request gets a fresh HS256 JWT whose claims describe the account's verification state.
//! The token lives only as long as the request that carries it; nothing here caches or logs it.

// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{
	_prelude::*,
	auth::{AccountCredentials, SigningSecret},
	clock::Clock,
	error::BackendFailure,
};

/// Validity window of every assertion, in seconds.
pub const ASSERTION_LIFETIME_SECS: i64 = 60;
/// Algorithm used to sign assertions.
pub const ASSERTION_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claim set encoded into a [`SignedAssertion`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
	/// Identity provider domain.
	pub iss: String,
	/// OAuth service base URL.
	pub aud: String,
	/// Account identifier.
	pub sub: String,
	/// Key generation (`verifierSetAt`).
	#[serde(rename = "fxa-generation")]
	pub generation: u64,
	/// Last authentication time, read at signing time.
	#[serde(rename = "fxa-lastAuthAt")]
	pub last_auth_at: u64,
	/// Primary email address.
	#[serde(rename = "fxa-verifiedEmail")]
	pub verified_email: String,
	/// Whether the session token is verified.
	#[serde(rename = "fxa-tokenVerified")]
	pub token_verified: bool,
	/// Authentication methods, in the order the caller supplied them.
	#[serde(rename = "fxa-amr")]
	pub amr: Vec<String>,
	/// Authenticator assurance level.
	#[serde(rename = "fxa-aal")]
	pub aal: u8,
	/// Issued-at, in seconds since the Unix epoch.
	pub iat: i64,
	/// Expiry, always `iat + 60`.
	pub exp: i64,
}
impl AssertionClaims {
	/// Builds the claim set for `credentials` issued at `iat`.
	pub fn new(
		credentials: &AccountCredentials,
		audience: &Url,
		issuer: &str,
		iat: OffsetDateTime,
	) -> Self {
		let iat = iat.unix_timestamp();

		Self {
			iss: issuer.to_owned(),
			aud: audience.as_str().to_owned(),
			sub: credentials.uid.clone(),
			generation: credentials.verifier_set_at,
			last_auth_at: credentials.last_auth_at(),
			verified_email: credentials.email.clone(),
			token_verified: credentials.token_verified,
			amr: credentials.authentication_methods.clone(),
			aal: credentials.authenticator_assurance_level,
			iat,
			exp: iat + ASSERTION_LIFETIME_SECS,
		}
	}
}

/// Compact JWT proving account/session state to the OAuth service.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SignedAssertion(String);
impl SignedAssertion {
	/// Returns the encoded token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for SignedAssertion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SignedAssertion").field(&"<redacted>").finish()
	}
}
impl Display for SignedAssertion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Signs account assertions with a single pre-shared key.
#[derive(Clone)]
pub struct AssertionSigner {
	audience: Url,
	issuer: String,
	key: EncodingKey,
	clock: Arc<dyn Clock>,
}
impl AssertionSigner {
	/// Creates a signer bound to the OAuth service audience and the identity provider issuer.
	pub fn new(
		audience: Url,
		issuer: impl Into<String>,
		secret: &SigningSecret,
		clock: Arc<dyn Clock>,
	) -> Self {
		Self {
			audience,
			issuer: issuer.into(),
			key: EncodingKey::from_secret(secret.expose()),
			clock,
		}
	}

	/// Audience claim written into every assertion.
	pub fn audience(&self) -> &Url {
		&self.audience
	}

	/// Issuer claim written into every assertion.
	pub fn issuer(&self) -> &str {
		&self.issuer
	}

	/// Builds and signs a fresh assertion for `credentials`.
	pub fn sign(&self, credentials: &AccountCredentials) -> Result<SignedAssertion> {
		let claims =
			AssertionClaims::new(credentials, &self.audience, &self.issuer, self.clock.now());
		let token = jsonwebtoken::encode(&Header::new(ASSERTION_ALGORITHM), &claims, &self.key)
			.map_err(BackendFailure::from)?;

		Ok(SignedAssertion(token))
	}
}
impl Debug for AssertionSigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AssertionSigner")
			.field("audience", &self.audience.as_str())
			.field("issuer", &self.issuer)
			.finish_non_exhaustive()
	}
}
