//! OpenTelemetry GenAI semantic convention names.
//!
//! `tracing` span macros need literal field names, so these constants are
//! used with `Span::record` and as field values. Span declarations spell the
//! same names out literally.

/// Prompt tokens reported by the model.
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

/// Candidate tokens reported by the model.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

// --- Operation name values ---

/// One `generateContent` call.
pub const OP_CHAT: &str = "chat";

// --- System values ---

/// Gemini API (AI Studio).
pub const SYSTEM_GEMINI: &str = "gemini";

pub const SYSTEM_VERTEX_AI: &str = "vertex_ai";
