//! Runner binding: the executor tied 1:1 to a live session.

use std::sync::Arc;

use starlet_types::content::Content;
use starlet_types::session::{SessionHandle, SessionKey};

use crate::engine::{BoxAgentEngine, EventStream};

/// Drives turns for exactly one session.
///
/// Only the [`SessionRegistry`](super::SessionRegistry) creates bindings, one
/// per session it stores. Handlers receive them behind an `Arc` so a turn can
/// run without holding the registry lock.
pub struct RunnerBinding {
    handle: SessionHandle,
    engine: Arc<BoxAgentEngine>,
}

impl RunnerBinding {
    pub(crate) fn new(handle: SessionHandle, engine: Arc<BoxAgentEngine>) -> Self {
        Self { handle, engine }
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn key(&self) -> &SessionKey {
        &self.handle.key
    }

    pub fn engine(&self) -> &BoxAgentEngine {
        &self.engine
    }

    /// Submit a message for this session.
    pub fn run(&self, message: Content) -> EventStream {
        self.engine.run(&self.handle, message)
    }
}
