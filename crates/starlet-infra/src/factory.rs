//! Assembly of engines and runners from configuration.

use std::sync::Arc;

use tracing::info;

use starlet_core::engine::BoxAgentEngine;
use starlet_core::runner::ConversationRunner;
use starlet_core::session::SessionRegistry;
use starlet_core::tool::image::ImageTool;
use starlet_core::tool::{BoxTool, ToolSet};
use starlet_types::config::ServiceConfig;
use starlet_types::error::EngineError;
use starlet_types::persona::{GENERATE_IMAGE_TOOL, Persona, PersonaKind};

use crate::crypto::hash::Sha256PromptHasher;
use crate::engine::GeminiAgentEngine;
use crate::filesystem::LocalArtifactStore;
use crate::gemini::{GeminiBackend, GeminiClient, GeminiImageGenerator};

/// The image tool as wired in production.
pub type GeminiImageTool = ImageTool<GeminiImageGenerator, LocalArtifactStore, Sha256PromptHasher>;

/// Build a Gemini client for the backend `config` selects.
///
/// # Errors
///
/// `EngineError::Config` when credentials for that backend are missing.
pub fn build_client(config: &ServiceConfig) -> Result<Arc<GeminiClient>, EngineError> {
    let backend = GeminiBackend::from_config(config)?;
    Ok(Arc::new(GeminiClient::new(backend)?))
}

/// Image tool writing into `config.image_dir`.
pub fn build_image_tool(client: Arc<GeminiClient>, config: &ServiceConfig) -> GeminiImageTool {
    ImageTool::new(
        GeminiImageGenerator::new(client, config.image_model.clone()),
        LocalArtifactStore::new(config.image_dir.clone()),
        Sha256PromptHasher::new(),
        config.aspect_ratio.clone(),
    )
}

fn build_tools(persona: &Persona, client: &Arc<GeminiClient>, config: &ServiceConfig) -> ToolSet {
    let mut tools = Vec::new();
    if persona.has_tool(GENERATE_IMAGE_TOOL) {
        tools.push(BoxTool::new(build_image_tool(Arc::clone(client), config)));
    }
    ToolSet::new(tools)
}

/// Engine speaking as `kind`, with that persona's tools registered.
pub fn build_engine(kind: PersonaKind, config: &ServiceConfig) -> Result<BoxAgentEngine, EngineError> {
    let client = build_client(config)?;
    let persona = kind.persona(&config.model);
    let tools = build_tools(&persona, &client, config);

    info!(
        persona = %persona.name,
        model = %persona.model,
        backend = client.backend().label(),
        tools = persona.tools.len(),
        "Built agent engine"
    );
    Ok(BoxAgentEngine::new(GeminiAgentEngine::new(client, persona, tools)))
}

/// Conversation runner for `kind`: engine, registry under the persona's app
/// name, and the configured default user.
pub fn build_runner(kind: PersonaKind, config: &ServiceConfig) -> Result<ConversationRunner, EngineError> {
    let engine = build_engine(kind, config)?;
    let registry = SessionRegistry::new(kind.app_name(), Arc::new(engine));
    Ok(ConversationRunner::new(Arc::new(registry), config.default_user_id.clone()))
}
