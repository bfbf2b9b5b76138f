//! Session registry.
//!
//! Maps `(user_id, session_id)` to a live engine session and its runner
//! binding. The registry is an ordinary value owned by the application state
//! and passed to handlers, so tests get a fresh one each.

pub mod binding;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};
use tracing::{error, info, warn};

use starlet_types::error::SessionError;
use starlet_types::session::{SessionInfo, SessionKey};

use crate::engine::BoxAgentEngine;

pub use binding::RunnerBinding;

/// A session slot. Empty while the engine is still creating the session.
type Slot = Arc<OnceCell<Arc<RunnerBinding>>>;

/// In-process registry of live sessions.
///
/// The map lock is only held for bookkeeping. Engine session creation runs
/// inside the key's [`OnceCell`], so concurrent first calls for one key
/// create exactly one binding while other keys and readers are not held up
/// by a slow engine. Slots still being created are invisible to lookups,
/// listings and deletion.
pub struct SessionRegistry {
    app_name: String,
    engine: Arc<BoxAgentEngine>,
    entries: Mutex<HashMap<SessionKey, Slot>>,
}

impl SessionRegistry {
    pub fn new(app_name: impl Into<String>, engine: Arc<BoxAgentEngine>) -> Self {
        Self {
            app_name: app_name.into(),
            engine,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn engine(&self) -> &BoxAgentEngine {
        &self.engine
    }

    /// Return the id of a live session for `user_id`, creating it if needed.
    ///
    /// Without a `session_id`, one is synthesised as
    /// `session_<user>_<n>` where `n` is the number of sessions across *all*
    /// users (including ones still being created) plus one. If that id is
    /// already taken for the user, the existing session is reused.
    ///
    /// # Errors
    ///
    /// [`SessionError::CreationFailed`] if the engine rejects the session.
    /// The slot is dropped again in that case.
    pub async fn ensure_session(
        &self,
        user_id: &str,
        session_id: Option<&str>,
    ) -> Result<String, SessionError> {
        let (key, slot) = {
            let mut entries = self.entries.lock().await;
            let session_id = match session_id {
                Some(id) => id.to_string(),
                None => SessionKey::synthesize_id(user_id, entries.len() + 1),
            };
            let key = SessionKey::new(user_id, session_id);
            let slot = Arc::clone(entries.entry(key.clone()).or_default());
            (key, slot)
        };

        if slot.initialized() {
            info!(session = %key, "Using existing session");
            return Ok(key.session_id);
        }

        match slot.get_or_try_init(|| self.create_binding(&key)).await {
            Ok(_) => Ok(key.session_id),
            Err(e) => {
                self.discard_failed(&key, &slot).await;
                Err(e)
            }
        }
    }

    async fn create_binding(&self, key: &SessionKey) -> Result<Arc<RunnerBinding>, SessionError> {
        let handle = self
            .engine
            .create_session(&self.app_name, key)
            .await
            .map_err(|source| {
                error!(session = %key, error = %source, "Failed to create session");
                SessionError::CreationFailed {
                    user_id: key.user_id.clone(),
                    session_id: key.session_id.clone(),
                    source,
                }
            })?;

        info!(app = %self.app_name, session = %key, "Session created");
        Ok(Arc::new(RunnerBinding::new(handle, Arc::clone(&self.engine))))
    }

    /// Drop an empty slot after a failed creation, unless other callers are
    /// still waiting on it and will retry.
    async fn discard_failed(&self, key: &SessionKey, slot: &Slot) {
        let mut entries = self.entries.lock().await;
        let ours = entries
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && !current.initialized());
        // One reference in the map, one held by this caller.
        if ours && Arc::strong_count(slot) <= 2 {
            entries.remove(key);
        }
    }

    /// Look up the binding of an existing session.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFound`] if `ensure_session` has not completed for the pair.
    pub async fn get_binding(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Arc<RunnerBinding>, SessionError> {
        let key = SessionKey::new(user_id, session_id);
        self.entries
            .lock()
            .await
            .get(&key)
            .and_then(|slot| slot.get().cloned())
            .ok_or_else(|| SessionError::NotFound {
                user_id: user_id.to_string(),
                session_id: session_id.to_string(),
            })
    }

    /// Ids of every live session owned by `user_id`, sorted.
    pub async fn list_sessions(&self, user_id: &str) -> Vec<String> {
        let entries = self.entries.lock().await;
        let mut ids: Vec<String> = entries
            .iter()
            .filter(|(k, slot)| k.user_id == user_id && slot.initialized())
            .map(|(k, _)| k.session_id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub async fn session_info(&self, user_id: &str) -> SessionInfo {
        SessionInfo::new(user_id, self.list_sessions(user_id).await)
    }

    /// Remove a session and release its engine-side state.
    ///
    /// The entry is gone once this returns, even if the engine fails to
    /// release; that failure is only logged.
    pub async fn delete_session(&self, user_id: &str, session_id: &str) -> Result<(), SessionError> {
        let key = SessionKey::new(user_id, session_id);
        let binding = {
            let mut entries = self.entries.lock().await;
            match entries.get(&key).and_then(|slot| slot.get().cloned()) {
                Some(binding) => {
                    entries.remove(&key);
                    binding
                }
                None => {
                    return Err(SessionError::NotFound {
                        user_id: user_id.to_string(),
                        session_id: session_id.to_string(),
                    });
                }
            }
        };

        if let Err(e) = self.engine.release_session(binding.handle()).await {
            warn!(session = %key, error = %e, "Engine failed to release session state");
        }

        info!(session = %key, "Session deleted");
        Ok(())
    }

    /// Total number of live sessions across all users.
    pub async fn len(&self) -> usize {
        self.entries
            .lock()
            .await
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
