//! Tool declarations and invocation outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aspect ratio used when the caller does not supply one.
pub const DEFAULT_ASPECT_RATIO: &str = "1:1";

/// What the model is told about a callable tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: serde_json::Value,
}

/// Result of one tool invocation, handed back to the model verbatim.
///
/// Serializes as `{"status": "success", "filename": ..., "message": ...}` or
/// `{"status": "error", "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolOutcome {
    Success { filename: String, message: String },
    Error { message: String },
}

impl ToolOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        ToolOutcome::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            ToolOutcome::Success { message, .. } | ToolOutcome::Error { message } => message,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "status": "error", "message": e.to_string() })
        })
    }
}

/// How the image tool picks the aspect ratio it sends to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AspectRatioMode {
    /// Forward the `size` argument the model supplied.
    FromInput,
    /// Always use this ratio, ignoring the argument.
    Fixed(String),
}

impl AspectRatioMode {
    /// Resolve the ratio to request for one call.
    pub fn resolve<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match self {
            AspectRatioMode::FromInput => requested
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_ASPECT_RATIO),
            AspectRatioMode::Fixed(ratio) => ratio,
        }
    }
}

impl Default for AspectRatioMode {
    fn default() -> Self {
        AspectRatioMode::FromInput
    }
}

impl fmt::Display for AspectRatioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectRatioMode::FromInput => write!(f, "from_input"),
            AspectRatioMode::Fixed(ratio) => write!(f, "{ratio}"),
        }
    }
}

impl FromStr for AspectRatioMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "from_input" | "input" => Ok(AspectRatioMode::FromInput),
            "" => Err("aspect ratio must not be empty".to_string()),
            _ if s.split_once(':').is_some_and(|(w, h)| {
                !w.is_empty()
                    && !h.is_empty()
                    && w.chars().all(|c| c.is_ascii_digit())
                    && h.chars().all(|c| c.is_ascii_digit())
            }) =>
            {
                Ok(AspectRatioMode::Fixed(s.to_string()))
            }
            other => Err(format!("invalid aspect ratio: '{other}'")),
        }
    }
}

impl TryFrom<String> for AspectRatioMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatioMode> for String {
    fn from(mode: AspectRatioMode) -> Self {
        mode.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_outcome_shape() {
        let outcome = ToolOutcome::Success {
            filename: "generated_image_1_2.png".to_string(),
            message: "done".to_string(),
        };
        assert_eq!(
            outcome.to_json(),
            json!({"status": "success", "filename": "generated_image_1_2.png", "message": "done"})
        );
    }

    #[test]
    fn test_error_outcome_shape() {
        let outcome = ToolOutcome::error("boom");
        assert!(!outcome.is_success());
        assert_eq!(outcome.to_json(), json!({"status": "error", "message": "boom"}));
    }

    #[test]
    fn test_from_input_forwards_or_defaults() {
        let mode = AspectRatioMode::FromInput;
        assert_eq!(mode.resolve(Some("16:9")), "16:9");
        assert_eq!(mode.resolve(Some("  ")), DEFAULT_ASPECT_RATIO);
        assert_eq!(mode.resolve(None), DEFAULT_ASPECT_RATIO);
    }

    #[test]
    fn test_fixed_ignores_input() {
        let mode = AspectRatioMode::Fixed("4:3".to_string());
        assert_eq!(mode.resolve(Some("16:9")), "4:3");
    }

    #[test]
    fn test_aspect_ratio_mode_parse() {
        assert_eq!("input".parse::<AspectRatioMode>().unwrap(), AspectRatioMode::FromInput);
        assert_eq!(
            "16:9".parse::<AspectRatioMode>().unwrap(),
            AspectRatioMode::Fixed("16:9".to_string())
        );
        assert!("1024x1024".parse::<AspectRatioMode>().is_err());
        assert!("".parse::<AspectRatioMode>().is_err());
    }
}
