//! Scripted engine used by the unit tests in this crate.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

use starlet_types::content::{AgentEvent, Content};
use starlet_types::error::EngineError;
use starlet_types::persona::{Persona, PersonaKind};
use starlet_types::session::{SessionHandle, SessionKey};

use crate::engine::{AgentEngine, EventStream};

/// One scripted stream item.
#[derive(Clone)]
pub enum Step {
    Event(AgentEvent),
    Fail(String),
}

/// Counters shared between a mock engine and the test that owns it.
#[derive(Default)]
pub struct Calls {
    pub create_started: AtomicUsize,
    pub created: AtomicUsize,
    pub released: AtomicUsize,
    pub runs: AtomicUsize,
    pub last_message: Mutex<Option<Content>>,
}

impl Calls {
    pub fn create_started(&self) -> usize {
        self.create_started.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

pub struct ScriptedEngine {
    persona: Persona,
    script: Vec<Step>,
    fail_create: bool,
    create_gate: Option<Arc<Notify>>,
    pub calls: Arc<Calls>,
}

impl ScriptedEngine {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            persona: PersonaKind::Brad.persona("mock-model"),
            script,
            fail_create: false,
            create_gate: None,
            calls: Arc::new(Calls::default()),
        }
    }

    /// Engine whose only event is a final text answer.
    pub fn replying(text: &str) -> Self {
        Self::new(vec![Step::Event(AgentEvent::content(
            "BradAgent",
            Content::model_text(text),
        ))])
    }

    pub fn failing_create() -> Self {
        let mut engine = Self::new(Vec::new());
        engine.fail_create = true;
        engine
    }

    /// Engine whose session creation waits until `gate` is notified.
    pub fn gated(gate: Arc<Notify>) -> Self {
        let mut engine = Self::replying("hi");
        engine.create_gate = Some(gate);
        engine
    }
}

impl AgentEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn persona(&self) -> &Persona {
        &self.persona
    }

    async fn create_session(
        &self,
        app_name: &str,
        key: &SessionKey,
    ) -> Result<SessionHandle, EngineError> {
        self.calls.create_started.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
        // Yield once so concurrent callers actually interleave.
        tokio::task::yield_now().await;
        if self.fail_create {
            return Err(EngineError::Provider {
                message: "session service unavailable".to_string(),
            });
        }
        self.calls.created.fetch_add(1, Ordering::SeqCst);
        Ok(SessionHandle::new(app_name, key.clone()))
    }

    async fn release_session(&self, _handle: &SessionHandle) -> Result<(), EngineError> {
        self.calls.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn run(&self, _handle: &SessionHandle, message: Content) -> EventStream {
        self.calls.runs.fetch_add(1, Ordering::SeqCst);
        *self.calls.last_message.lock().unwrap() = Some(message);
        let script = self.script.clone();
        Box::pin(async_stream::stream! {
            for step in script {
                match step {
                    Step::Event(event) => yield Ok(event),
                    Step::Fail(message) => yield Err(EngineError::Provider { message }),
                }
            }
        })
    }
}
