//! Service configuration loader for Starlet.
//!
//! Layers, lowest to highest: built-in defaults, an optional TOML file
//! (`$STARLET_CONFIG`, default `./starlet.toml`), then environment variables.
//! Nothing here is fatal: unreadable files and unparsable values are logged
//! and skipped.

use std::path::{Path, PathBuf};

use starlet_types::config::ServiceConfig;
use starlet_types::error::ConfigError;
use starlet_types::tool::AspectRatioMode;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "STARLET_CONFIG";

/// Config file used when `STARLET_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "starlet.toml";

/// Load configuration from the file named by `STARLET_CONFIG` and the process
/// environment.
pub async fn load_service_config() -> ServiceConfig {
    let path = std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut config = load_config_file(&path).await;
    apply_env(&mut config, |key| std::env::var(key).ok());
    config
}

/// Read `path` as TOML.
///
/// - Missing file: [`ServiceConfig::default()`].
/// - Unreadable or malformed file: logs a warning and returns the default.
pub async fn load_config_file(path: &Path) -> ServiceConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return ServiceConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ServiceConfig::default();
        }
    };

    match toml::from_str::<ServiceConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ServiceConfig::default()
        }
    }
}

/// Overlay environment variables onto `config`.
///
/// `lookup` is `std::env::var` in production; tests pass a map. Empty values
/// count as unset.
pub fn apply_env(config: &mut ServiceConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(model) = get("MODEL") {
        config.model = model;
    }
    if let Some(project) = get("GOOGLE_CLOUD_PROJECT") {
        config.project_id = project;
    }
    if let Some(project) = get("CLOUD_PROJECT_ID") {
        config.cloud_project_id = project;
    }
    if let Some(region) = get("CLOUD_PROJECT_REGION") {
        config.region = region;
    }
    if let Some(key) = get("GOOGLE_API_KEY") {
        config.api_key = Some(key);
    }
    if let Some(token) = get("GOOGLE_CLOUD_ACCESS_TOKEN") {
        config.access_token = Some(token);
    }
    if let Some(flag) = get("GOOGLE_GENAI_USE_VERTEXAI") {
        config.use_vertex = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
    }
    if let Some(model) = get("STARLET_IMAGE_MODEL") {
        config.image_model = model;
    }
    if let Some(dir) = get("STARLET_IMAGE_DIR") {
        config.image_dir = PathBuf::from(dir);
    }
    if let Some(ratio) = get("STARLET_ASPECT_RATIO") {
        match parse_aspect_ratio("STARLET_ASPECT_RATIO", &ratio) {
            Ok(mode) => config.aspect_ratio = mode,
            Err(err) => tracing::warn!("Ignoring {err}"),
        }
    }
}

/// Parse an aspect ratio setting, naming `key` in the error.
pub fn parse_aspect_ratio(key: &str, value: &str) -> Result<AspectRatioMode, ConfigError> {
    value.parse().map_err(|message| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    })
}
