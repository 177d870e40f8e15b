//! OAuth service client orchestrating validation, gating, signing, and transport.

pub mod common;

mod client_info;
mod key_data;

pub use common::*;

// self
use crate::{
	_prelude::*,
	auth::AssertionSigner,
	clock::{Clock, SystemClock},
	config::ClientConfig,
	http::OAuthHttpClient,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestOAuthClient = OAuthClient<ReqwestHttpClient>;

/// Mediates between account/session logic and the OAuth service.
///
/// The client owns an immutable configuration, the assertion signer derived from it, and a shared
/// transport handle. It keeps no mutable state, so one instance can serve any number of
/// concurrent operations. Each operation validates its inputs, and for key data checks the
/// verification gate, before anything is sent over the network.
pub struct OAuthClient<C>
where
	C: ?Sized + OAuthHttpClient,
{
	/// HTTP client used for every outbound request.
	pub http_client: Arc<C>,
	config: Arc<ClientConfig>,
	signer: AssertionSigner,
}
impl<C> OAuthClient<C>
where
	C: ?Sized + OAuthHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		let signer = signer_for(&config, Arc::new(SystemClock));

		Self { http_client: http_client.into(), config: Arc::new(config), signer }
	}

	/// Replaces the clock used for assertion timestamps.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.signer = signer_for(&self.config, clock);

		self
	}

	/// Configuration the client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}
}
#[cfg(feature = "reqwest")]
impl OAuthClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for OAuthClient<C>
where
	C: ?Sized + OAuthHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			config: self.config.clone(),
			signer: self.signer.clone(),
		}
	}
}
impl<C> Debug for OAuthClient<C>
where
	C: ?Sized + OAuthHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClient")
			.field("oauth_url", &self.config.oauth_url().as_str())
			.field("issuer", &self.config.issuer())
			.finish_non_exhaustive()
	}
}

fn signer_for(config: &ClientConfig, clock: Arc<dyn Clock>) -> AssertionSigner {
	AssertionSigner::new(config.oauth_url().clone(), config.issuer(), config.secret(), clock)
}
