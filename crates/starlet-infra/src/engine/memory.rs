//! In-memory session service.
//!
//! Holds each session's conversation history in a [`DashMap`]. Every entry
//! sits behind its own async mutex, so turns within one session run one at
//! a time while different sessions proceed in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::Mutex;

use starlet_types::content::Content;
use starlet_types::error::EngineError;
use starlet_types::session::{SessionHandle, SessionKey};

/// State kept for one session.
#[derive(Debug)]
pub struct StoredSession {
    handle: SessionHandle,
    history: Vec<Content>,
}

impl StoredSession {
    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Append a completed turn.
    pub fn commit(&mut self, turn: Vec<Content>) {
        self.history.extend(turn);
    }
}

/// Session storage for one engine. Nothing survives a restart.
#[derive(Default)]
pub struct InMemorySessionService {
    sessions: DashMap<SessionKey, Arc<Mutex<StoredSession>>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh, empty session.
    pub fn create(&self, app_name: &str, key: &SessionKey) -> Result<SessionHandle, EngineError> {
        match self.sessions.entry(key.clone()) {
            Entry::Occupied(_) => Err(EngineError::SessionExists(key.to_string())),
            Entry::Vacant(slot) => {
                let handle = SessionHandle::new(app_name, key.clone());
                slot.insert(Arc::new(Mutex::new(StoredSession {
                    handle: handle.clone(),
                    history: Vec::new(),
                })));
                Ok(handle)
            }
        }
    }

    pub fn get(&self, key: &SessionKey) -> Result<Arc<Mutex<StoredSession>>, EngineError> {
        self.sessions
            .get(key)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| EngineError::SessionNotFound(key.to_string()))
    }

    pub fn remove(&self, key: &SessionKey) -> Result<(), EngineError> {
        self.sessions
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| EngineError::SessionNotFound(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
