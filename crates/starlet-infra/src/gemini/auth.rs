//! Bearer tokens for Vertex AI.
//!
//! Vertex requests ask an [`AccessTokenSource`] for a token every time, so a
//! long-running service keeps working after the first token expires:
//!
//! - [`StaticToken`]: a fixed `GOOGLE_CLOUD_ACCESS_TOKEN`, used as an override.
//! - [`AdcTokenSource`]: Application Default Credentials through `gcp_auth`,
//!   which caches tokens and refreshes them before they expire.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::OnceCell;

use starlet_types::error::{ConfigError, EngineError};

/// OAuth scope covering Vertex AI.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<SecretString, EngineError>> + Send + 'a>>;

/// Supplies the bearer token for one request.
pub trait AccessTokenSource: Send + Sync {
    /// Short label for logs.
    fn kind(&self) -> &'static str;

    /// A currently valid token. Implementations refresh as needed.
    fn access_token(&self) -> TokenFuture<'_>;
}

/// A token fixed at startup. It is never refreshed.
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

impl AccessTokenSource for StaticToken {
    fn kind(&self) -> &'static str {
        "static"
    }

    fn access_token(&self) -> TokenFuture<'_> {
        let token = SecretString::from(self.0.expose_secret().to_string());
        Box::pin(async move { Ok(token) })
    }
}

/// Application Default Credentials (service account key, metadata server,
/// or `gcloud` user credentials).
///
/// Discovery happens on the first request; a failed discovery is retried on
/// the next one.
#[derive(Default)]
pub struct AdcTokenSource {
    provider: OnceCell<Arc<dyn gcp_auth::TokenProvider>>,
}

impl AdcTokenSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn fetch(&self) -> Result<SecretString, EngineError> {
        let provider = self
            .provider
            .get_or_try_init(gcp_auth::provider)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "No Application Default Credentials found");
                EngineError::Config(ConfigError::MissingCredentials(
                    "GOOGLE_CLOUD_ACCESS_TOKEN or Application Default Credentials".to_string(),
                ))
            })?;

        let token = provider
            .token(&[CLOUD_PLATFORM_SCOPE])
            .await
            .map_err(|e| EngineError::Provider {
                message: format!("failed to obtain access token: {e}"),
            })?;
        Ok(SecretString::from(token.as_str().to_string()))
    }
}

impl AccessTokenSource for AdcTokenSource {
    fn kind(&self) -> &'static str {
        "adc"
    }

    fn access_token(&self) -> TokenFuture<'_> {
        Box::pin(self.fetch())
    }
}
