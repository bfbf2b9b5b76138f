//! GeminiAgentEngine -- concrete [`AgentEngine`] on top of `generateContent`.
//!
//! A turn appends the user's message to the session history and calls the
//! model. Function calls in the reply are executed through the engine's
//! [`ToolSet`], their responses are fed back, and the model is called again
//! until it answers without calls or the per-turn call limit is hit.
//!
//! The turn's contents are committed to history only when the turn ends
//! with a final answer; failed or escalated turns leave history untouched.

pub mod memory;

pub use memory::{InMemorySessionService, StoredSession};

use std::sync::Arc;

use tracing::{Instrument, field, info, info_span, warn};

use starlet_core::engine::{AgentEngine, EventStream};
use starlet_core::tool::ToolSet;
use starlet_observe::genai_attrs::{
    GEN_AI_RESPONSE_FINISH_REASONS, GEN_AI_USAGE_INPUT_TOKENS, GEN_AI_USAGE_OUTPUT_TOKENS, OP_CHAT,
};
use starlet_types::content::{AgentEvent, Content, Part, Role};
use starlet_types::error::EngineError;
use starlet_types::persona::Persona;
use starlet_types::session::{SessionHandle, SessionKey};

use crate::gemini::GeminiClient;
use crate::gemini::types::{
    FunctionDeclaration, GeminiContent, GeminiTool, GenerateContentRequest, GenerateContentResponse,
};

/// Upper bound on model calls within a single turn.
pub const MAX_MODEL_CALLS_PER_TURN: usize = 8;

/// Gemini-backed agent engine for one persona.
pub struct GeminiAgentEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    client: Arc<GeminiClient>,
    persona: Persona,
    tools: ToolSet,
    sessions: InMemorySessionService,
}

impl GeminiAgentEngine {
    pub fn new(client: Arc<GeminiClient>, persona: Persona, tools: ToolSet) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                client,
                persona,
                tools,
                sessions: InMemorySessionService::new(),
            }),
        }
    }

    pub fn sessions(&self) -> &InMemorySessionService {
        &self.inner.sessions
    }
}

impl EngineInner {
    fn request(&self, history: &[Content], turn: &[Content]) -> GenerateContentRequest {
        let tools = if self.tools.is_empty() {
            Vec::new()
        } else {
            vec![GeminiTool {
                function_declarations: self
                    .tools
                    .declarations()
                    .iter()
                    .map(FunctionDeclaration::from)
                    .collect(),
            }]
        };

        GenerateContentRequest {
            contents: history.iter().chain(turn).map(GeminiContent::from).collect(),
            system_instruction: Some(GeminiContent::system(self.persona.system_instruction())),
            tools,
            generation_config: None,
        }
    }

    async fn call_model(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse, EngineError> {
        let span = info_span!(
            "gen_ai.chat",
            gen_ai.operation.name = OP_CHAT,
            gen_ai.system = self.client.backend().label(),
            gen_ai.request.model = %self.persona.model,
            gen_ai.usage.input_tokens = field::Empty,
            gen_ai.usage.output_tokens = field::Empty,
            gen_ai.response.finish_reasons = field::Empty,
        );

        let response = self
            .client
            .generate_content(&self.persona.model, request)
            .instrument(span.clone())
            .await?;

        if let Some(usage) = &response.usage_metadata {
            span.record(GEN_AI_USAGE_INPUT_TOKENS, usage.prompt_token_count);
            span.record(GEN_AI_USAGE_OUTPUT_TOKENS, usage.candidates_token_count);
        }
        if let Some(reason) = response.candidates.first().and_then(|c| c.finish_reason.as_deref()) {
            span.record(GEN_AI_RESPONSE_FINISH_REASONS, reason);
        }

        Ok(response)
    }

    /// Execute every function call in `content`, in order.
    async fn run_tools(&self, content: &Content) -> Content {
        let mut parts = Vec::new();
        for (name, args) in content.function_calls() {
            info!(tool = name, "Executing tool call");
            let response = self.tools.call(name, args.clone()).await;
            parts.push(Part::FunctionResponse {
                name: name.to_string(),
                response,
            });
        }
        Content {
            role: Role::Function,
            parts,
        }
    }
}

impl AgentEngine for GeminiAgentEngine {
    fn name(&self) -> &str {
        self.inner.client.backend().label()
    }

    fn persona(&self) -> &Persona {
        &self.inner.persona
    }

    async fn create_session(&self, app_name: &str, key: &SessionKey) -> Result<SessionHandle, EngineError> {
        let handle = self.inner.sessions.create(app_name, key)?;
        info!(app_name, session = %key, "Created engine session");
        Ok(handle)
    }

    async fn release_session(&self, handle: &SessionHandle) -> Result<(), EngineError> {
        self.inner.sessions.remove(&handle.key)?;
        info!(session = %handle.key, "Released engine session");
        Ok(())
    }

    fn run(&self, handle: &SessionHandle, message: Content) -> EventStream {
        let inner = Arc::clone(&self.inner);
        let key = handle.key.clone();

        Box::pin(async_stream::stream! {
            let session = match inner.sessions.get(&key) {
                Ok(session) => session,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            // Held for the whole turn: one turn per session at a time.
            let mut stored = session.lock().await;
            let author = inner.persona.name.clone();
            let mut turn = vec![message];

            for _ in 0..MAX_MODEL_CALLS_PER_TURN {
                let request = inner.request(stored.history(), &turn);
                let response = match inner.call_model(&request).await {
                    Ok(response) => response,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                let Some(raw) = response.first_content() else {
                    let reason = response.empty_reason();
                    warn!(session = %key, %reason, "Model returned no content");
                    yield Ok(AgentEvent::escalation(
                        author,
                        Some(format!("model returned no content (reason: {reason})")),
                    ));
                    return;
                };
                let content = match Content::try_from(raw) {
                    Ok(content) => content,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };
                turn.push(content.clone());

                if !content.has_function_calls() {
                    stored.commit(turn);
                    yield Ok(AgentEvent::content(author, content));
                    return;
                }

                yield Ok(AgentEvent::content(author.clone(), content.clone()));
                let responses = inner.run_tools(&content).await;
                turn.push(responses.clone());
                yield Ok(AgentEvent::content(author.clone(), responses));
            }

            warn!(session = %key, limit = MAX_MODEL_CALLS_PER_TURN, "Turn hit the model call limit");
            yield Ok(AgentEvent::escalation(
                author,
                Some(format!("exceeded {MAX_MODEL_CALLS_PER_TURN} model calls in one turn")),
            ));
        })
    }
}
