//! Image generation tool.
//!
//! Turns a text prompt into a PNG on local storage through an
//! [`ImageGenerator`] backend, and reports the result as a [`ToolOutcome`].
//! Every failure mode becomes an error outcome; nothing propagates.

use serde_json::json;
use tracing::{info, warn};

use starlet_types::error::ToolError;
use starlet_types::persona::GENERATE_IMAGE_TOOL;
use starlet_types::tool::{AspectRatioMode, ToolDeclaration, ToolOutcome};

use super::Tool;
use super::hash::PromptHasher;
use super::store::ArtifactStore;

/// Number of distinct hash suffixes in generated file names.
pub const FILENAME_HASH_BUCKETS: u64 = 1000;

/// Backend that renders an image from a prompt.
pub trait ImageGenerator: Send + Sync {
    /// Returns the raw image bytes, or `Ok(None)` when the model answered
    /// without any image data.
    fn generate(
        &self,
        prompt: &str,
        aspect_ratio: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>, ToolError>> + Send;
}

/// The `generate_image` tool.
pub struct ImageTool<G, S, H> {
    generator: G,
    store: S,
    hasher: H,
    mode: AspectRatioMode,
    process_id: u32,
}

impl<G, S, H> ImageTool<G, S, H>
where
    G: ImageGenerator,
    S: ArtifactStore,
    H: PromptHasher,
{
    pub fn new(generator: G, store: S, hasher: H, mode: AspectRatioMode) -> Self {
        Self {
            generator,
            store,
            hasher,
            mode,
            process_id: std::process::id(),
        }
    }

    /// Override the process id baked into file names.
    pub fn with_process_id(mut self, process_id: u32) -> Self {
        self.process_id = process_id;
        self
    }

    /// `generated_image_<pid>_<hash % 1000>.png`.
    ///
    /// Two prompts landing in the same bucket overwrite each other's file.
    pub fn file_name_for(&self, prompt: &str) -> String {
        format!(
            "generated_image_{}_{}.png",
            self.process_id,
            self.hasher.hash_prompt(prompt) % FILENAME_HASH_BUCKETS
        )
    }

    /// Generate an image for `prompt` and save it.
    pub async fn generate_image(&self, prompt: &str, size: Option<&str>) -> ToolOutcome {
        let aspect_ratio = self.mode.resolve(size);
        let preview: String = prompt.chars().take(50).collect();
        info!(prompt = %preview, aspect_ratio, "Calling image generator");

        match self.try_generate(prompt, aspect_ratio).await {
            Ok(Some(filename)) => {
                info!(filename = %filename, "Image saved");
                ToolOutcome::Success {
                    message: format!("Image generated and saved as {filename}. Inform the user."),
                    filename,
                }
            }
            Ok(None) => {
                warn!("Image generator returned no image data");
                ToolOutcome::error("Image generation failed: no image data returned.")
            }
            Err(e) => {
                warn!(error = %e, "Image generation failed");
                ToolOutcome::error(format!(
                    "An internal error occurred during image generation: {e}"
                ))
            }
        }
    }

    async fn try_generate(&self, prompt: &str, aspect_ratio: &str) -> Result<Option<String>, ToolError> {
        let Some(bytes) = self.generator.generate(prompt, aspect_ratio).await? else {
            return Ok(None);
        };
        if bytes.is_empty() {
            return Ok(None);
        }

        let filename = self.file_name_for(prompt);
        self.store.write_bytes(&filename, &bytes).await?;
        Ok(Some(filename))
    }
}

impl<G, S, H> Tool for ImageTool<G, S, H>
where
    G: ImageGenerator,
    S: ArtifactStore,
    H: PromptHasher,
{
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: GENERATE_IMAGE_TOOL.to_string(),
            description: "Generates an image from a detailed text prompt. The image is saved \
                locally and its filename is returned. The size parameter is an aspect ratio \
                such as '1:1' or '16:9'."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "Detailed description of the image to create."
                    },
                    "size": {
                        "type": "string",
                        "description": "Aspect ratio, e.g. '1:1'."
                    }
                },
                "required": ["prompt"]
            }),
        }
    }

    async fn call(&self, args: serde_json::Value) -> serde_json::Value {
        let Some(prompt) = args.get("prompt").and_then(|v| v.as_str()) else {
            return ToolOutcome::error("missing required argument 'prompt'").to_json();
        };
        let size = args.get("size").and_then(|v| v.as_str());
        self.generate_image(prompt, size).await.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Clone)]
    enum Reply {
        Bytes(Vec<u8>),
        Nothing,
        Fail(String),
    }

    struct MockGenerator {
        reply: Reply,
        seen_ratio: Mutex<Option<String>>,
    }

    impl MockGenerator {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                seen_ratio: Mutex::new(None),
            }
        }
    }

    impl ImageGenerator for MockGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            aspect_ratio: &str,
        ) -> Result<Option<Vec<u8>>, ToolError> {
            *self.seen_ratio.lock().unwrap() = Some(aspect_ratio.to_string());
            match self.reply.clone() {
                Reply::Bytes(b) => Ok(Some(b)),
                Reply::Nothing => Ok(None),
                Reply::Fail(m) => Err(ToolError::Invocation(m)),
            }
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        files: Mutex<Vec<(String, Vec<u8>)>>,
        fail: bool,
    }

    impl ArtifactStore for MemoryStore {
        async fn write_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, std::io::Error> {
            if self.fail {
                return Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"));
            }
            self.files
                .lock()
                .unwrap()
                .push((file_name.to_string(), bytes.to_vec()));
            Ok(PathBuf::from(file_name))
        }
    }

    struct FixedHasher(u64);

    impl PromptHasher for FixedHasher {
        fn hash_prompt(&self, _prompt: &str) -> u64 {
            self.0
        }
    }

    fn tool(reply: Reply, mode: AspectRatioMode) -> ImageTool<MockGenerator, MemoryStore, FixedHasher> {
        ImageTool::new(MockGenerator::new(reply), MemoryStore::default(), FixedHasher(123_456), mode)
            .with_process_id(42)
    }

    #[test]
    fn test_file_name_uses_pid_and_hash_bucket() {
        let t = tool(Reply::Nothing, AspectRatioMode::FromInput);
        assert_eq!(t.file_name_for("anything"), "generated_image_42_456.png");
    }

    #[tokio::test]
    async fn test_success_writes_file() {
        let t = tool(Reply::Bytes(vec![0x89, b'P', b'N', b'G']), AspectRatioMode::FromInput);

        let outcome = t.generate_image("a cat eating a banana", Some("16:9")).await;

        assert_eq!(
            outcome,
            ToolOutcome::Success {
                filename: "generated_image_42_456.png".to_string(),
                message: "Image generated and saved as generated_image_42_456.png. Inform the user."
                    .to_string(),
            }
        );
        let files = t.store.files.lock().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].1, vec![0x89, b'P', b'N', b'G']);
        assert_eq!(t.generator.seen_ratio.lock().unwrap().as_deref(), Some("16:9"));
    }

    #[tokio::test]
    async fn test_no_image_data_is_error_and_writes_nothing() {
        let t = tool(Reply::Nothing, AspectRatioMode::FromInput);
        let outcome = t.generate_image("a cat", None).await;

        assert!(!outcome.is_success());
        assert!(outcome.message().contains("no image data returned"));
        assert!(t.store.files.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_bytes_count_as_no_data() {
        let t = tool(Reply::Bytes(Vec::new()), AspectRatioMode::FromInput);
        let outcome = t.generate_image("a cat", None).await;
        assert!(outcome.message().contains("no image data returned"));
        assert!(t.store.files.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generator_failure_is_error_outcome() {
        let t = tool(Reply::Fail("quota exceeded".to_string()), AspectRatioMode::FromInput);
        let outcome = t.generate_image("a cat", None).await;
        assert_eq!(
            outcome,
            ToolOutcome::error("An internal error occurred during image generation: quota exceeded")
        );
    }

    #[tokio::test]
    async fn test_storage_failure_is_error_outcome() {
        let t = ImageTool::new(
            MockGenerator::new(Reply::Bytes(vec![1])),
            MemoryStore {
                fail: true,
                ..Default::default()
            },
            FixedHasher(1),
            AspectRatioMode::FromInput,
        );
        let outcome = t.generate_image("a cat", None).await;
        assert!(outcome.message().contains("read-only"));
    }

    #[tokio::test]
    async fn test_fixed_mode_ignores_size() {
        let t = tool(Reply::Bytes(vec![1]), AspectRatioMode::Fixed("4:3".to_string()));
        t.generate_image("a cat", Some("16:9")).await;
        assert_eq!(t.generator.seen_ratio.lock().unwrap().as_deref(), Some("4:3"));
    }

    #[tokio::test]
    async fn test_from_input_without_size_uses_default_ratio() {
        let t = tool(Reply::Bytes(vec![1]), AspectRatioMode::FromInput);
        t.generate_image("a cat", None).await;
        assert_eq!(t.generator.seen_ratio.lock().unwrap().as_deref(), Some("1:1"));
    }

    #[tokio::test]
    async fn test_tool_call_parses_arguments() {
        let t = tool(Reply::Bytes(vec![1]), AspectRatioMode::FromInput);

        let result = Tool::call(&t, json!({"prompt": "a cat", "size": "9:16"})).await;
        assert_eq!(result["status"], "success");
        assert_eq!(result["filename"], "generated_image_42_456.png");

        let missing = Tool::call(&t, json!({"size": "1:1"})).await;
        assert_eq!(missing["status"], "error");
    }

    #[test]
    fn test_declaration_requires_prompt() {
        let t = tool(Reply::Nothing, AspectRatioMode::FromInput);
        let decl = Tool::declaration(&t);
        assert_eq!(decl.name, "generate_image");
        assert_eq!(decl.parameters["required"], json!(["prompt"]));
    }
}
