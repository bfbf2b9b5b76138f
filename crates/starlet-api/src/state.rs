//! Application state shared by the HTTP handlers.

use std::sync::Arc;

use starlet_core::runner::ConversationRunner;
use starlet_infra::factory::build_runner;
use starlet_types::config::ServiceConfig;
use starlet_types::persona::PersonaKind;

use crate::http::error::AppError;

/// Shared application state for one persona service.
#[derive(Clone)]
pub struct AppState {
    pub persona: PersonaKind,
    /// `None` when startup could not build a runner; chat and session
    /// endpoints then answer 503.
    pub runner: Option<Arc<ConversationRunner>>,
}

impl AppState {
    pub fn new(persona: PersonaKind, runner: Option<Arc<ConversationRunner>>) -> Self {
        Self { persona, runner }
    }

    /// Build the runner for `persona`. A failure is logged and leaves the
    /// service up without a runner.
    pub fn init(persona: PersonaKind, config: &ServiceConfig) -> Self {
        let runner = match build_runner(persona, config) {
            Ok(runner) => {
                tracing::info!(persona = %persona, "Agent runner initialized");
                Some(Arc::new(runner))
            }
            Err(e) => {
                tracing::error!(persona = %persona, error = %e, "Failed to initialize agent runner");
                None
            }
        };
        Self::new(persona, runner)
    }

    pub fn runner(&self) -> Result<&Arc<ConversationRunner>, AppError> {
        self.runner.as_ref().ok_or(AppError::NotInitialized)
    }
}
