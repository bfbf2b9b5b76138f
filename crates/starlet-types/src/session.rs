//! Session identity types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite key identifying one conversation: `(user_id, session_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionKey {
    pub user_id: String,
    pub session_id: String,
}

impl SessionKey {
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }

    /// Id synthesised for a user that did not name a session.
    ///
    /// `ordinal` is the registry-wide entry count plus one.
    pub fn synthesize_id(user_id: &str, ordinal: usize) -> String {
        format!("session_{user_id}_{ordinal}")
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.user_id, self.session_id)
    }
}

/// Engine-owned conversation state reference returned by session creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHandle {
    pub app_name: String,
    pub key: SessionKey,
    pub created_at: DateTime<Utc>,
}

impl SessionHandle {
    pub fn new(app_name: impl Into<String>, key: SessionKey) -> Self {
        Self {
            app_name: app_name.into(),
            key,
            created_at: Utc::now(),
        }
    }
}

/// Summary of a user's live sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub user_id: String,
    pub active_sessions: Vec<String>,
    pub total_sessions: usize,
}

impl SessionInfo {
    pub fn new(user_id: impl Into<String>, mut active_sessions: Vec<String>) -> Self {
        active_sessions.sort();
        Self {
            user_id: user_id.into(),
            total_sessions: active_sessions.len(),
            active_sessions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_display() {
        let key = SessionKey::new("u1", "s1");
        assert_eq!(key.to_string(), "u1_s1");
    }

    #[test]
    fn test_synthesize_id() {
        assert_eq!(SessionKey::synthesize_id("u1", 1), "session_u1_1");
        assert_eq!(SessionKey::synthesize_id("alice", 12), "session_alice_12");
    }

    #[test]
    fn test_session_info_counts_and_sorts() {
        let info = SessionInfo::new("u1", vec!["b".to_string(), "a".to_string()]);
        assert_eq!(info.total_sessions, 2);
        assert_eq!(info.active_sessions, vec!["a", "b"]);

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["total_sessions"], 2);
    }
}
