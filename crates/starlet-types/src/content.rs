//! Conversation content and agent events.
//!
//! These types model what flows between the conversation runner and the
//! agent engine: turn messages made of parts, and the events an engine emits
//! while it works on a turn.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Author role of a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    Function,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
            Role::Function => write!(f, "function"),
        }
    }
}

/// One segment of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Text {
        text: String,
    },
    FunctionCall {
        name: String,
        args: serde_json::Value,
    },
    FunctionResponse {
        name: String,
        response: serde_json::Value,
    },
    InlineData {
        mime_type: String,
        data: Vec<u8>,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// A message: a role plus an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    /// Single-part user message.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
        }
    }

    /// Text of the first part, if the first part is text.
    pub fn first_text(&self) -> Option<&str> {
        self.parts.first().and_then(Part::as_text)
    }

    /// `(name, args)` of every function call in this content.
    pub fn function_calls(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.parts.iter().filter_map(|p| match p {
            Part::FunctionCall { name, args } => Some((name.as_str(), args)),
            _ => None,
        })
    }

    pub fn has_function_calls(&self) -> bool {
        self.function_calls().next().is_some()
    }

    pub fn has_function_responses(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, Part::FunctionResponse { .. }))
    }
}

/// Side-effect requests attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventActions {
    /// The engine gave up on the turn.
    #[serde(default)]
    pub escalate: bool,
}

/// An incremental event emitted by an agent engine during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    pub id: Uuid,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default)]
    pub actions: EventActions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub partial: bool,
}

impl AgentEvent {
    /// Event carrying model or tool content.
    pub fn content(author: impl Into<String>, content: Content) -> Self {
        Self {
            id: Uuid::now_v7(),
            author: author.into(),
            content: Some(content),
            actions: EventActions::default(),
            error_message: None,
            partial: false,
        }
    }

    /// Terminal event signalling the engine could not answer.
    pub fn escalation(author: impl Into<String>, error_message: Option<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            author: author.into(),
            content: None,
            actions: EventActions { escalate: true },
            error_message,
            partial: false,
        }
    }

    /// Mark the event as a streaming fragment.
    pub fn into_partial(mut self) -> Self {
        self.partial = true;
        self
    }

    /// Whether this event ends the turn.
    ///
    /// Partial fragments and tool traffic (function calls and responses) are
    /// never final. Escalations always are.
    pub fn is_final_response(&self) -> bool {
        if self.actions.escalate {
            return true;
        }
        if self.partial {
            return false;
        }
        match &self.content {
            Some(content) => !content.has_function_calls() && !content.has_function_responses(),
            None => true,
        }
    }
}
