//! GeminiClient -- HTTP client for the Gemini `generateContent` endpoint.
//!
//! Two backends share the same request and response bodies and differ only
//! in URL layout and authentication:
//!
//! - Gemini API (AI Studio): `x-goog-api-key` header.
//! - Vertex AI: project/region scoped URL with an OAuth bearer token taken
//!   from an [`AccessTokenSource`] on every request.
//!
//! Credentials are wrapped in [`SecretString`] and only exposed when the
//! request headers are built.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use starlet_observe::genai_attrs::{SYSTEM_GEMINI, SYSTEM_VERTEX_AI};
use starlet_types::config::ServiceConfig;
use starlet_types::error::{ConfigError, EngineError};

use super::auth::{AccessTokenSource, AdcTokenSource, StaticToken};
use super::types::{GenerateContentRequest, GenerateContentResponse};

const AI_STUDIO_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Where requests go and how they are authenticated.
pub enum GeminiBackend {
    AiStudio {
        api_key: SecretString,
    },
    Vertex {
        project: String,
        region: String,
        tokens: Arc<dyn AccessTokenSource>,
    },
}

impl GeminiBackend {
    /// Pick a backend from configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingCredentials`] when the chosen backend lacks the
    /// values it needs. Vertex uses `access_token` when set and Application
    /// Default Credentials otherwise, so only the project is required.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ConfigError> {
        if config.use_vertex {
            let project = config.effective_project().ok_or_else(|| {
                ConfigError::MissingCredentials("GOOGLE_CLOUD_PROJECT or CLOUD_PROJECT_ID".to_string())
            })?;
            let tokens: Arc<dyn AccessTokenSource> =
                match config.access_token.clone().filter(|t| !t.is_empty()) {
                    Some(token) => Arc::new(StaticToken::new(token)),
                    None => Arc::new(AdcTokenSource::new()),
                };
            debug!(project, region = %config.region, auth = tokens.kind(), "Using Vertex AI backend");
            Ok(GeminiBackend::Vertex {
                project: project.to_string(),
                region: config.region.clone(),
                tokens,
            })
        } else {
            let api_key = config
                .api_key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| ConfigError::MissingCredentials("GOOGLE_API_KEY".to_string()))?;
            Ok(GeminiBackend::AiStudio {
                api_key: SecretString::from(api_key),
            })
        }
    }

    fn default_base_url(&self) -> String {
        match self {
            GeminiBackend::AiStudio { .. } => AI_STUDIO_BASE_URL.to_string(),
            GeminiBackend::Vertex { region, .. } => format!("https://{region}-aiplatform.googleapis.com"),
        }
    }

    /// Label used in logs and spans.
    pub fn label(&self) -> &'static str {
        match self {
            GeminiBackend::AiStudio { .. } => SYSTEM_GEMINI,
            GeminiBackend::Vertex { .. } => SYSTEM_VERTEX_AI,
        }
    }
}

/// Client for `generateContent`.
///
/// Does not derive Debug; the backend holds credentials.
pub struct GeminiClient {
    http: reqwest::Client,
    backend: GeminiBackend,
    base_url: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Fails only if the underlying HTTP client cannot be built.
    pub fn new(backend: GeminiBackend) -> Result<Self, EngineError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| EngineError::Provider {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        let base_url = backend.default_base_url();

        Ok(Self {
            http,
            backend,
            base_url,
        })
    }

    /// Override the scheme and host (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn backend(&self) -> &GeminiBackend {
        &self.backend
    }

    /// Full `generateContent` URL for `model`.
    pub fn endpoint(&self, model: &str) -> String {
        match &self.backend {
            GeminiBackend::AiStudio { .. } => {
                format!("{}/v1beta/models/{model}:generateContent", self.base_url)
            }
            GeminiBackend::Vertex { project, region, .. } => format!(
                "{}/v1/projects/{project}/locations/{region}/publishers/google/models/{model}:generateContent",
                self.base_url
            ),
        }
    }

    /// Send one non-streaming `generateContent` request.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, EngineError> {
        let url = self.endpoint(model);
        debug!(%url, contents = request.contents.len(), tools = request.tools.len(), "generateContent");

        let builder = self.http.post(&url).json(request);
        let builder = match &self.backend {
            GeminiBackend::AiStudio { api_key } => builder.header("x-goog-api-key", api_key.expose_secret()),
            GeminiBackend::Vertex { tokens, .. } => {
                let token = tokens.access_token().await?;
                builder.bearer_auth(token.expose_secret())
            }
        };

        let response = builder.send().await.map_err(|e| EngineError::Provider {
            message: format!("HTTP request failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => EngineError::AuthenticationFailed,
                429 => EngineError::RateLimited,
                _ => EngineError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| EngineError::Deserialization(format!("failed to parse response: {e}")))
    }
}
