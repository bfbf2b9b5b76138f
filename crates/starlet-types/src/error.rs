use thiserror::Error;

/// Errors from the session registry.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to create session '{session_id}' for user '{user_id}': {source}")]
    CreationFailed {
        user_id: String,
        session_id: String,
        #[source]
        source: EngineError,
    },

    #[error("session '{session_id}' not found for user '{user_id}'")]
    NotFound { user_id: String, session_id: String },
}

/// Errors raised by an agent engine while creating sessions or running turns.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("session already exists: {0}")]
    SessionExists(String),

    #[error("unknown session: {0}")]
    SessionNotFound(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from tool backends. Tools convert these into an error outcome.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Invocation(String),

    #[error("invalid image data: {0}")]
    Decode(String),

    #[error("failed to store artifact: {0}")]
    Storage(#[from] std::io::Error),
}

impl From<EngineError> for ToolError {
    fn from(e: EngineError) -> Self {
        ToolError::Invocation(e.to_string())
    }
}

/// Configuration problems that only surface when a backend is needed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credentials: set {0}")]
    MissingCredentials(String),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_not_found_display() {
        let err = SessionError::NotFound {
            user_id: "u1".to_string(),
            session_id: "s1".to_string(),
        };
        assert_eq!(err.to_string(), "session 's1' not found for user 'u1'");
    }

    #[test]
    fn test_creation_failed_includes_cause() {
        let err = SessionError::CreationFailed {
            user_id: "u1".to_string(),
            session_id: "s1".to_string(),
            source: EngineError::Provider {
                message: "down".to_string(),
            },
        };
        assert!(err.to_string().contains("provider error: down"));
    }

    #[test]
    fn test_tool_error_from_engine_error() {
        let err: ToolError = EngineError::RateLimited.into();
        assert_eq!(err.to_string(), "rate limited");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingCredentials("GOOGLE_API_KEY".to_string());
        assert_eq!(err.to_string(), "missing credentials: set GOOGLE_API_KEY");
    }
}
