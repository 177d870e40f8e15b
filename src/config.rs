//! Immutable client configuration: OAuth service URL, issuer domain, and signing key.

// self
use crate::{_prelude::*, auth::SigningSecret};

/// Minimum accepted signing key length, in bytes.
pub const MIN_SECRET_LEN: usize = 16;

/// Errors raised while constructing or validating a [`ClientConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// The OAuth service URL is required.
	#[error("Missing OAuth service URL.")]
	MissingOAuthUrl,
	/// The assertion issuer is required.
	#[error("Missing assertion issuer.")]
	MissingIssuer,
	/// The signing secret is required.
	#[error("Missing assertion signing secret.")]
	MissingSecret,
	/// The issuer is empty or whitespace.
	#[error("Assertion issuer cannot be blank.")]
	BlankIssuer,
	/// The signing secret is too short for HS256.
	#[error("Assertion signing secret must be at least {min} bytes.")]
	SecretTooShort {
		/// Minimum accepted length.
		min: usize,
	},
	/// The OAuth service URL must use HTTPS (loopback hosts excepted).
	#[error("The OAuth service URL must use HTTPS: {url}.")]
	InsecureUrl {
		/// URL that failed validation.
		url: String,
	},
	/// The OAuth service URL cannot carry request paths.
	#[error("The OAuth service URL cannot be used as a base URL: {url}.")]
	NotABaseUrl {
		/// URL that failed validation.
		url: String,
	},
	/// The OAuth service URL carries a query string or fragment.
	#[error("The OAuth service URL must not include a query or fragment: {url}.")]
	UnexpectedQueryOrFragment {
		/// URL that failed validation.
		url: String,
	},
}

/// Validated configuration injected into [`OAuthClient`](crate::client::OAuthClient).
///
/// `oauth_url` doubles as the request base URL and the assertion audience. The value is
/// immutable once built; deserializing runs the same validation as the builder.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawClientConfig")]
pub struct ClientConfig {
	oauth_url: Url,
	issuer: String,
	secret: SigningSecret,
}
impl ClientConfig {
	/// Creates a new builder.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// OAuth service base URL and assertion audience.
	pub fn oauth_url(&self) -> &Url {
		&self.oauth_url
	}

	/// Assertion issuer (the identity provider's domain).
	pub fn issuer(&self) -> &str {
		&self.issuer
	}

	/// Pre-shared signing key.
	pub fn secret(&self) -> &SigningSecret {
		&self.secret
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.issuer.trim().is_empty() {
			return Err(ConfigError::BlankIssuer);
		}
		if self.secret.len() < MIN_SECRET_LEN {
			return Err(ConfigError::SecretTooShort { min: MIN_SECRET_LEN });
		}

		validate_oauth_url(&self.oauth_url)
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
	/// OAuth service base URL.
	pub oauth_url: Option<Url>,
	/// Assertion issuer.
	pub issuer: Option<String>,
	/// Assertion signing key.
	pub secret: Option<SigningSecret>,
}
impl ClientConfigBuilder {
	/// Sets the OAuth service base URL (also the assertion audience).
	pub fn oauth_url(mut self, url: Url) -> Self {
		self.oauth_url = Some(url);

		self
	}

	/// Sets the assertion issuer.
	pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
		self.issuer = Some(issuer.into());

		self
	}

	/// Sets the assertion signing key.
	pub fn secret(mut self, secret: impl Into<SigningSecret>) -> Self {
		self.secret = Some(secret.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let config = ClientConfig {
			oauth_url: self.oauth_url.ok_or(ConfigError::MissingOAuthUrl)?,
			issuer: self.issuer.ok_or(ConfigError::MissingIssuer)?,
			secret: self.secret.ok_or(ConfigError::MissingSecret)?,
		};

		config.validate()?;

		Ok(config)
	}
}

#[derive(Deserialize)]
struct RawClientConfig {
	oauth_url: Url,
	issuer: String,
	secret: SigningSecret,
}
impl TryFrom<RawClientConfig> for ClientConfig {
	type Error = ConfigError;

	fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
		ClientConfig::builder()
			.oauth_url(raw.oauth_url)
			.issuer(raw.issuer)
			.secret(raw.secret)
			.build()
	}
}

fn validate_oauth_url(url: &Url) -> Result<(), ConfigError> {
	if url.cannot_be_a_base() {
		return Err(ConfigError::NotABaseUrl { url: url.to_string() });
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ConfigError::UnexpectedQueryOrFragment { url: url.to_string() });
	}

	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ConfigError::InsecureUrl { url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(addr)) => addr.is_loopback(),
		Some(url::Host::Ipv6(addr)) => addr.is_loopback(),
		None => false,
	}
}
