//! GeminiImageGenerator -- [`ImageGenerator`] backed by a Gemini image model.

use std::sync::Arc;

use starlet_core::tool::image::ImageGenerator;
use starlet_types::content::Content;
use starlet_types::error::ToolError;

use super::client::GeminiClient;
use super::types::{GeminiContent, GenerateContentRequest, GenerationConfig, ImageConfig, decode_base64};

/// Calls `generateContent` on an image model and returns the first inline image.
pub struct GeminiImageGenerator {
    client: Arc<GeminiClient>,
    model: String,
}

impl GeminiImageGenerator {
    pub fn new(client: Arc<GeminiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn request(prompt: &str, aspect_ratio: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![GeminiContent::from(&Content::user_text(prompt))],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string()]),
                image_config: Some(ImageConfig {
                    aspect_ratio: aspect_ratio.to_string(),
                }),
            }),
            ..Default::default()
        }
    }
}

impl ImageGenerator for GeminiImageGenerator {
    async fn generate(&self, prompt: &str, aspect_ratio: &str) -> Result<Option<Vec<u8>>, ToolError> {
        let request = Self::request(prompt, aspect_ratio);
        let response = self.client.generate_content(&self.model, &request).await?;

        let Some(blob) = response.first_inline_data() else {
            tracing::debug!(reason = %response.empty_reason(), "No inline data in image response");
            return Ok(None);
        };
        decode_base64(&blob.data)
            .map(Some)
            .map_err(|e| ToolError::Decode(e.to_string()))
    }
}
