//! BoxAgentEngine -- object-safe dynamic dispatch wrapper for AgentEngine.
//!
//! 1. Define an object-safe `AgentEngineDyn` trait with boxed futures
//! 2. Blanket-impl `AgentEngineDyn` for all `T: AgentEngine`
//! 3. `BoxAgentEngine` wraps `Box<dyn AgentEngineDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use starlet_types::content::Content;
use starlet_types::error::EngineError;
use starlet_types::persona::Persona;
use starlet_types::session::{SessionHandle, SessionKey};

use super::{AgentEngine, EventStream};

/// Object-safe version of [`AgentEngine`] with boxed futures.
pub trait AgentEngineDyn: Send + Sync {
    fn name(&self) -> &str;

    fn persona(&self) -> &Persona;

    fn create_session_boxed<'a>(
        &'a self,
        app_name: &'a str,
        key: &'a SessionKey,
    ) -> Pin<Box<dyn Future<Output = Result<SessionHandle, EngineError>> + Send + 'a>>;

    fn release_session_boxed<'a>(
        &'a self,
        handle: &'a SessionHandle,
    ) -> Pin<Box<dyn Future<Output = Result<(), EngineError>> + Send + 'a>>;

    fn run_boxed(&self, handle: &SessionHandle, message: Content) -> EventStream;
}

impl<T: AgentEngine> AgentEngineDyn for T {
    fn name(&self) -> &str {
        AgentEngine::name(self)
    }

    fn persona(&self) -> &Persona {
        AgentEngine::persona(self)
    }

    fn create_session_boxed<'a>(
        &'a self,
        app_name: &'a str,
        key: &'a SessionKey,
    ) -> Pin<Box<dyn Future<Output = Result<SessionHandle, EngineError>> + Send + 'a>> {
        Box::pin(self.create_session(app_name, key))
    }

    fn release_session_boxed<'a>(
        &'a self,
        handle: &'a SessionHandle,
    ) -> Pin<Box<dyn Future<Output = Result<(), EngineError>> + Send + 'a>> {
        Box::pin(self.release_session(handle))
    }

    fn run_boxed(&self, handle: &SessionHandle, message: Content) -> EventStream {
        self.run(handle, message)
    }
}

/// Type-erased agent engine.
///
/// Lets the session registry hold any engine (Gemini in production, scripted
/// mocks in tests) without becoming generic.
pub struct BoxAgentEngine {
    inner: Box<dyn AgentEngineDyn + Send + Sync>,
}

impl BoxAgentEngine {
    /// Wrap a concrete `AgentEngine` in a type-erased box.
    pub fn new<T: AgentEngine + 'static>(engine: T) -> Self {
        Self {
            inner: Box::new(engine),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn persona(&self) -> &Persona {
        self.inner.persona()
    }

    pub async fn create_session(
        &self,
        app_name: &str,
        key: &SessionKey,
    ) -> Result<SessionHandle, EngineError> {
        self.inner.create_session_boxed(app_name, key).await
    }

    pub async fn release_session(&self, handle: &SessionHandle) -> Result<(), EngineError> {
        self.inner.release_session_boxed(handle).await
    }

    pub fn run(&self, handle: &SessionHandle, message: Content) -> EventStream {
        self.inner.run_boxed(handle, message)
    }
}
