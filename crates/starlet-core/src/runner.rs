//! Conversation runner.
//!
//! Submits one user turn to the engine behind a session's binding, drains the
//! event stream, and reduces it to the reply text. Engine failures never
//! escape: they become an apologetic reply string.

use std::sync::Arc;

use futures_util::StreamExt;
use tracing::{Instrument, error, info, info_span};

use starlet_types::content::Content;
use starlet_types::error::SessionError;

use crate::session::{RunnerBinding, SessionRegistry};

/// Reply when the event stream ends without a final event.
pub const NO_FINAL_RESPONSE: &str = "Agent did not produce a final response.";

/// Prefix of the reply for an escalated turn.
pub const ESCALATION_PREFIX: &str = "Agent escalated: ";

/// Used when an escalation carries no message.
pub const DEFAULT_ESCALATION_MESSAGE: &str = "No specific message.";

/// Prefix of the reply when the engine fails.
pub const ERROR_PREFIX: &str = "Sorry, I encountered an error: ";

/// Outcome of [`ConversationRunner::run_agent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    /// The session the turn ran in (synthesised if the caller gave none).
    pub session_id: String,
    pub response: String,
}

/// Runs turns against sessions held by a [`SessionRegistry`].
pub struct ConversationRunner {
    registry: Arc<SessionRegistry>,
    default_user_id: String,
}

impl ConversationRunner {
    pub fn new(registry: Arc<SessionRegistry>, default_user_id: impl Into<String>) -> Self {
        Self {
            registry,
            default_user_id: default_user_id.into(),
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn default_user_id(&self) -> &str {
        &self.default_user_id
    }

    /// Resolve (or create) the session, then run one turn in it.
    ///
    /// # Errors
    ///
    /// Only session creation/lookup errors. Engine failures are folded into
    /// the reply text by [`run_turn`](Self::run_turn).
    pub async fn run_agent(
        &self,
        prompt: &str,
        user_id: Option<&str>,
        session_id: Option<&str>,
    ) -> Result<TurnReply, SessionError> {
        let user_id = user_id.unwrap_or(&self.default_user_id);
        let session_id = self.registry.ensure_session(user_id, session_id).await?;
        let binding = self.registry.get_binding(user_id, &session_id).await?;

        let response = self.run_turn(&binding, prompt).await;
        Ok(TurnReply {
            session_id,
            response,
        })
    }

    /// Run one turn and reduce the event stream to reply text.
    ///
    /// The first final event decides the reply: its first text part, or an
    /// escalation notice. A stream that ends without one yields
    /// [`NO_FINAL_RESPONSE`].
    pub async fn run_turn(&self, binding: &RunnerBinding, prompt: &str) -> String {
        let engine = binding.engine();
        let span = info_span!(
            "gen_ai.invoke_agent",
            gen_ai.operation.name = "invoke_agent",
            gen_ai.system = engine.name(),
            gen_ai.agent.name = %engine.persona().name,
            gen_ai.request.model = %engine.persona().model,
            session.id = %binding.key(),
        );

        async move {
            info!(prompt, "User query");

            let mut events = binding.run(Content::user_text(prompt));
            let mut reply = NO_FINAL_RESPONSE.to_string();

            while let Some(item) = events.next().await {
                let event = match item {
                    Ok(event) => event,
                    Err(e) => {
                        error!(user_id = binding.key().user_id.as_str(), error = %e, "Error running agent");
                        return format!("{ERROR_PREFIX}{e}");
                    }
                };

                if !event.is_final_response() {
                    continue;
                }

                if let Some(content) = event.content.as_ref().filter(|c| !c.parts.is_empty()) {
                    reply = content.first_text().unwrap_or_default().to_string();
                } else if event.actions.escalate {
                    let message = event
                        .error_message
                        .as_deref()
                        .unwrap_or(DEFAULT_ESCALATION_MESSAGE);
                    reply = format!("{ESCALATION_PREFIX}{message}");
                }
                break;
            }

            info!(response = %reply, "Agent response");
            reply
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BoxAgentEngine;
    use crate::testing::{ScriptedEngine, Step};
    use serde_json::json;
    use starlet_types::content::{AgentEvent, Part, Role};

    fn runner_with(engine: ScriptedEngine) -> (ConversationRunner, Arc<crate::testing::Calls>) {
        let calls = Arc::clone(&engine.calls);
        let registry = SessionRegistry::new("testApp", Arc::new(BoxAgentEngine::new(engine)));
        (
            ConversationRunner::new(Arc::new(registry), "default_user"),
            calls,
        )
    }

    async fn turn(engine: ScriptedEngine) -> String {
        let (runner, _) = runner_with(engine);
        runner.run_agent("hello", Some("u1"), Some("s1")).await.unwrap().response
    }

    fn text_event(text: &str) -> Step {
        Step::Event(AgentEvent::content("BradAgent", Content::model_text(text)))
    }

    #[tokio::test]
    async fn test_final_text_is_returned() {
        assert_eq!(turn(ScriptedEngine::replying("hi")).await, "hi");
    }

    #[tokio::test]
    async fn test_prompt_is_wrapped_as_single_user_message() {
        let (runner, calls) = runner_with(ScriptedEngine::replying("hi"));
        runner.run_agent("hello there", None, Some("s1")).await.unwrap();

        let message = calls.last_message.lock().unwrap().clone().unwrap();
        assert_eq!(message, Content::user_text("hello there"));
    }

    #[tokio::test]
    async fn test_first_final_event_wins() {
        let engine = ScriptedEngine::new(vec![
            Step::Event(AgentEvent::content("BradAgent", Content::model_text("par")).into_partial()),
            text_event("first"),
            text_event("second"),
        ]);
        assert_eq!(turn(engine).await, "first");
    }

    #[tokio::test]
    async fn test_tool_traffic_is_skipped() {
        let call = Content {
            role: Role::Model,
            parts: vec![Part::FunctionCall {
                name: "generate_image".to_string(),
                args: json!({"prompt": "a cat"}),
            }],
        };
        let engine = ScriptedEngine::new(vec![
            Step::Event(AgentEvent::content("AngelinaAgent", call)),
            text_event("I painted it"),
        ]);
        assert_eq!(turn(engine).await, "I painted it");
    }

    #[tokio::test]
    async fn test_escalation_with_message() {
        let engine = ScriptedEngine::new(vec![Step::Event(AgentEvent::escalation(
            "BradAgent",
            Some("blocked by safety filter".to_string()),
        ))]);
        assert_eq!(turn(engine).await, "Agent escalated: blocked by safety filter");
    }

    #[tokio::test]
    async fn test_escalation_without_message() {
        let engine = ScriptedEngine::new(vec![Step::Event(AgentEvent::escalation("BradAgent", None))]);
        assert_eq!(turn(engine).await, "Agent escalated: No specific message.");
    }

    #[tokio::test]
    async fn test_no_final_event_returns_fallback() {
        let engine = ScriptedEngine::new(vec![Step::Event(
            AgentEvent::content("BradAgent", Content::model_text("par")).into_partial(),
        )]);
        assert_eq!(turn(engine).await, NO_FINAL_RESPONSE);

        assert_eq!(turn(ScriptedEngine::new(Vec::new())).await, NO_FINAL_RESPONSE);
    }

    #[tokio::test]
    async fn test_engine_failure_becomes_apology() {
        let engine = ScriptedEngine::new(vec![Step::Fail("quota exhausted".to_string())]);
        let reply = turn(engine).await;
        assert!(reply.starts_with("Sorry, I encountered an error:"));
        assert!(reply.contains("quota exhausted"));
    }

    #[tokio::test]
    async fn test_failure_after_final_event_is_never_seen() {
        let engine = ScriptedEngine::new(vec![text_event("done"), Step::Fail("late".to_string())]);
        assert_eq!(turn(engine).await, "done");
    }

    #[tokio::test]
    async fn test_final_event_without_text_part_yields_empty_reply() {
        let content = Content {
            role: Role::Model,
            parts: vec![Part::InlineData {
                mime_type: "image/png".to_string(),
                data: vec![1, 2, 3],
            }],
        };
        let engine = ScriptedEngine::new(vec![Step::Event(AgentEvent::content("BradAgent", content))]);
        assert_eq!(turn(engine).await, "");
    }

    #[tokio::test]
    async fn test_run_agent_defaults_user_and_reports_session() {
        let (runner, _) = runner_with(ScriptedEngine::replying("hi"));

        let reply = runner.run_agent("hello", None, None).await.unwrap();

        assert_eq!(reply.session_id, "session_default_user_1");
        assert_eq!(reply.response, "hi");
        assert_eq!(
            runner.registry().list_sessions("default_user").await,
            vec!["session_default_user_1"]
        );
    }

    #[tokio::test]
    async fn test_run_agent_reuses_session() {
        let (runner, calls) = runner_with(ScriptedEngine::replying("hi"));

        runner.run_agent("one", Some("u1"), Some("s1")).await.unwrap();
        runner.run_agent("two", Some("u1"), Some("s1")).await.unwrap();

        assert_eq!(calls.created(), 1);
        assert_eq!(calls.runs(), 2);
    }

    #[tokio::test]
    async fn test_run_agent_propagates_creation_failure() {
        let (runner, _) = runner_with(ScriptedEngine::failing_create());
        let err = runner.run_agent("hello", Some("u1"), None).await.unwrap_err();
        assert!(matches!(err, SessionError::CreationFailed { .. }));
    }
}
