//! Gemini `generateContent` wire types.
//!
//! These mirror the camelCase JSON of the Gemini REST API. They are NOT the
//! conversation types from starlet-types; conversions between the two live
//! at the bottom of this file.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use starlet_types::content::{Content, Part, Role};
use starlet_types::error::EngineError;
use starlet_types::tool::ToolDeclaration;

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<GeminiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One turn of content. `role` is `user` or `model`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    /// System instructions carry no role.
    pub fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![GeminiPart {
                text: Some(text.to_string()),
                ..Default::default()
            }],
        }
    }
}

/// A content part. Exactly one field is set on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<GeminiFunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<GeminiFunctionResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<GeminiBlob>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiFunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiFunctionResponse {
    pub name: String,
    pub response: serde_json::Value,
}

/// Base64-encoded binary payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiBlob {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiTool {
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl From<&ToolDeclaration> for FunctionDeclaration {
    fn from(decl: &ToolDeclaration) -> Self {
        Self {
            name: decl.name.clone(),
            description: decl.description.clone(),
            parameters: decl.parameters.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<GeminiContent>,
    pub finish_reason: Option<String>,
}

/// Present when the prompt itself was blocked.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

impl GenerateContentResponse {
    /// Content of the first candidate, if it has any parts.
    pub fn first_content(&self) -> Option<&GeminiContent> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .filter(|c| !c.parts.is_empty())
    }

    /// Why there is nothing to show: the prompt block reason or the first
    /// candidate's finish reason.
    pub fn empty_reason(&self) -> String {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
            .or_else(|| self.candidates.first().and_then(|c| c.finish_reason.clone()))
            .unwrap_or_else(|| "UNSPECIFIED".to_string())
    }

    /// The first inline blob in the first candidate.
    pub fn first_inline_data(&self) -> Option<&GeminiBlob> {
        self.first_content()?
            .parts
            .iter()
            .find_map(|p| p.inline_data.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<&Content> for GeminiContent {
    fn from(content: &Content) -> Self {
        // generateContent only knows `user` and `model`; function responses
        // travel as user turns.
        let role = match content.role {
            Role::Model => "model",
            Role::User | Role::Function => "user",
        };
        Self {
            role: Some(role.to_string()),
            parts: content.parts.iter().map(GeminiPart::from).collect(),
        }
    }
}

impl From<&Part> for GeminiPart {
    fn from(part: &Part) -> Self {
        match part {
            Part::Text { text } => GeminiPart {
                text: Some(text.clone()),
                ..Default::default()
            },
            Part::FunctionCall { name, args } => GeminiPart {
                function_call: Some(GeminiFunctionCall {
                    name: name.clone(),
                    args: args.clone(),
                }),
                ..Default::default()
            },
            Part::FunctionResponse { name, response } => GeminiPart {
                function_response: Some(GeminiFunctionResponse {
                    name: name.clone(),
                    response: response.clone(),
                }),
                ..Default::default()
            },
            Part::InlineData { mime_type, data } => GeminiPart {
                inline_data: Some(GeminiBlob {
                    mime_type: mime_type.clone(),
                    data: BASE64.encode(data),
                }),
                ..Default::default()
            },
        }
    }
}

impl TryFrom<&GeminiContent> for Content {
    type Error = EngineError;

    /// Parts with no field we understand (e.g. thought signatures) are dropped.
    fn try_from(content: &GeminiContent) -> Result<Self, Self::Error> {
        let role = match content.role.as_deref() {
            Some("user") => Role::User,
            _ => Role::Model,
        };

        let mut parts = Vec::with_capacity(content.parts.len());
        for part in &content.parts {
            if let Some(call) = &part.function_call {
                parts.push(Part::FunctionCall {
                    name: call.name.clone(),
                    args: call.args.clone(),
                });
            } else if let Some(resp) = &part.function_response {
                parts.push(Part::FunctionResponse {
                    name: resp.name.clone(),
                    response: resp.response.clone(),
                });
            } else if let Some(blob) = &part.inline_data {
                parts.push(Part::InlineData {
                    mime_type: blob.mime_type.clone(),
                    data: decode_base64(&blob.data)?,
                });
            } else if let Some(text) = &part.text {
                parts.push(Part::text(text.clone()));
            }
        }

        Ok(Content { role, parts })
    }
}

/// Decode a base64 payload from the wire.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, EngineError> {
    BASE64
        .decode(data)
        .map_err(|e| EngineError::Deserialization(format!("invalid base64 inline data: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![GeminiContent::from(&Content::user_text("hi"))],
            system_instruction: Some(GeminiContent::system("be brief")),
            tools: vec![GeminiTool {
                function_declarations: vec![FunctionDeclaration {
                    name: "generate_image".to_string(),
                    description: "draw".to_string(),
                    parameters: json!({"type": "object"}),
                }],
            }],
            generation_config: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["tools"][0]["functionDeclarations"][0]["name"], "generate_image");
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn test_image_generation_config() {
        let config = GenerationConfig {
            response_modalities: Some(vec!["IMAGE".to_string()]),
            image_config: Some(ImageConfig {
                aspect_ratio: "16:9".to_string(),
            }),
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value, json!({"responseModalities": ["IMAGE"], "imageConfig": {"aspectRatio": "16:9"}}));
    }

    #[test]
    fn test_function_response_travels_as_user() {
        let content = Content {
            role: Role::Function,
            parts: vec![Part::FunctionResponse {
                name: "generate_image".to_string(),
                response: json!({"status": "success"}),
            }],
        };
        let value = serde_json::to_value(GeminiContent::from(&content)).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["parts"][0]["functionResponse"]["name"], "generate_image");
    }

    #[test]
    fn test_response_with_function_call_parses() {
        let body = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Let me paint that."},
                        {"functionCall": {"name": "generate_image", "args": {"prompt": "a cat"}}}
                    ]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5, "totalTokenCount": 17}
        });
        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let content = Content::try_from(response.first_content().unwrap()).unwrap();

        assert_eq!(content.role, Role::Model);
        assert_eq!(content.first_text(), Some("Let me paint that."));
        assert!(content.has_function_calls());
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 17);
    }

    #[test]
    fn test_inline_data_is_decoded() {
        let body = json!({
            "candidates": [{
                "content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "AQID"}}]}
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let blob = response.first_inline_data().unwrap();
        assert_eq!(blob.mime_type, "image/png");
        assert_eq!(decode_base64(&blob.data).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_invalid_base64_is_deserialization_error() {
        let content = GeminiContent {
            role: Some("model".to_string()),
            parts: vec![GeminiPart {
                inline_data: Some(GeminiBlob {
                    mime_type: "image/png".to_string(),
                    data: "!!not base64!!".to_string(),
                }),
                ..Default::default()
            }],
        };
        assert!(matches!(
            Content::try_from(&content),
            Err(EngineError::Deserialization(_))
        ));
    }

    #[test]
    fn test_empty_reason_prefers_block_reason() {
        let blocked: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(blocked.first_content().is_none());
        assert_eq!(blocked.empty_reason(), "SAFETY");

        let stopped: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "MAX_TOKENS"}]})).unwrap();
        assert_eq!(stopped.empty_reason(), "MAX_TOKENS");

        assert_eq!(GenerateContentResponse::default().empty_reason(), "UNSPECIFIED");
    }
}
