//! Service configuration types.
//!
//! `ServiceConfig` is assembled from defaults, an optional `starlet.toml`,
//! and environment variables. Every field has a default, so an empty
//! environment still yields a usable (if credential-less) configuration.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::persona::DEFAULT_MODEL;
use crate::tool::AspectRatioMode;

/// Default Google Cloud region.
pub const DEFAULT_REGION: &str = "us-central1";

/// Default image generation model.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// User id applied when a request names none.
pub const DEFAULT_USER_ID: &str = "default_user";

/// Top-level configuration for a Starlet service.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Model for personas that do not pin one.
    #[serde(default = "default_model")]
    pub model: String,

    /// Google Cloud project (`GOOGLE_CLOUD_PROJECT`).
    #[serde(default)]
    pub project_id: String,

    /// Alternative project setting (`CLOUD_PROJECT_ID`), used when `project_id` is empty.
    #[serde(default)]
    pub cloud_project_id: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Route model calls through Vertex AI instead of the Gemini API.
    #[serde(default)]
    pub use_vertex: bool,

    /// Gemini API key. Never serialized.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Fixed OAuth access token for Vertex AI. Without it, Application
    /// Default Credentials are used. Never serialized.
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Directory generated images are written to.
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    #[serde(default)]
    pub aspect_ratio: AspectRatioMode,

    #[serde(default = "default_user_id")]
    pub default_user_id: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

fn default_image_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

impl ServiceConfig {
    /// The project to bill: `project_id`, falling back to `cloud_project_id`.
    pub fn effective_project(&self) -> Option<&str> {
        [self.project_id.as_str(), self.cloud_project_id.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|p| !p.is_empty())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            project_id: String::new(),
            cloud_project_id: String::new(),
            region: default_region(),
            use_vertex: false,
            api_key: None,
            access_token: None,
            image_model: default_image_model(),
            image_dir: default_image_dir(),
            aspect_ratio: AspectRatioMode::default(),
            default_user_id: default_user_id(),
        }
    }
}

// Manual Debug so credentials never reach logs.
impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ServiceConfig")
            .field("model", &self.model)
            .field("project_id", &self.project_id)
            .field("cloud_project_id", &self.cloud_project_id)
            .field("region", &self.region)
            .field("use_vertex", &self.use_vertex)
            .field("api_key", &redact(&self.api_key))
            .field("access_token", &redact(&self.access_token))
            .field("image_model", &self.image_model)
            .field("image_dir", &self.image_dir)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("default_user_id", &self.default_user_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_config_default_values() {
        let config = ServiceConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash-lite");
        assert_eq!(config.region, "us-central1");
        assert_eq!(config.image_model, "gemini-2.5-flash-image");
        assert_eq!(config.default_user_id, "default_user");
        assert_eq!(config.aspect_ratio, AspectRatioMode::FromInput);
        assert!(config.effective_project().is_none());
    }

    #[test]
    fn test_service_config_deserialize_with_defaults() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(!config.use_vertex);
    }

    #[test]
    fn test_service_config_deserialize_with_values() {
        let toml_str = r#"
model = "gemini-2.5-pro"
cloud_project_id = "demo-project"
region = "europe-west4"
use_vertex = true
aspect_ratio = "16:9"
image_dir = "/tmp/images"
"#;
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.effective_project(), Some("demo-project"));
        assert_eq!(config.region, "europe-west4");
        assert!(config.use_vertex);
        assert_eq!(config.aspect_ratio, AspectRatioMode::Fixed("16:9".to_string()));
        assert_eq!(config.image_dir, PathBuf::from("/tmp/images"));
    }

    #[test]
    fn test_project_id_wins_over_cloud_project_id() {
        let config = ServiceConfig {
            project_id: "primary".to_string(),
            cloud_project_id: "secondary".to_string(),
            ..Default::default()
        };
        assert_eq!(config.effective_project(), Some("primary"));
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = ServiceConfig {
            api_key: Some("super-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_credentials_are_not_serialized() {
        let config = ServiceConfig {
            api_key: Some("super-secret".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
    }
}
