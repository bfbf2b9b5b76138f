//! Agent engine abstractions.
//!
//! - `AgentEngine`: RPITIT trait for concrete engine implementations
//! - `BoxAgentEngine`: object-safe wrapper for dynamic dispatch

pub mod box_engine;

use std::pin::Pin;

use futures_util::Stream;

use starlet_types::content::{AgentEvent, Content};
use starlet_types::error::EngineError;
use starlet_types::persona::Persona;
use starlet_types::session::{SessionHandle, SessionKey};

pub use box_engine::BoxAgentEngine;

/// Events produced by an engine for a single turn.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<AgentEvent, EngineError>> + Send + 'static>>;

/// Trait for agent execution backends.
///
/// An engine owns per-session conversation state. Callers create a session
/// once, then submit turns against the returned handle. Implementations live
/// in starlet-infra (e.g., `GeminiAgentEngine`).
pub trait AgentEngine: Send + Sync {
    /// Human-readable engine name (e.g., "gemini").
    fn name(&self) -> &str;

    /// The persona this engine speaks as.
    fn persona(&self) -> &Persona;

    /// Allocate conversation state for `key` under `app_name`.
    fn create_session(
        &self,
        app_name: &str,
        key: &SessionKey,
    ) -> impl std::future::Future<Output = Result<SessionHandle, EngineError>> + Send;

    /// Free the conversation state behind `handle`.
    fn release_session(
        &self,
        handle: &SessionHandle,
    ) -> impl std::future::Future<Output = Result<(), EngineError>> + Send;

    /// Submit one user message and stream the resulting events.
    ///
    /// The stream is finite. Submission failures arrive as its first item
    /// rather than as a separate error, so callers have one place to handle
    /// them.
    fn run(&self, handle: &SessionHandle, message: Content) -> EventStream;
}
