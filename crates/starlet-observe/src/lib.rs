//! Observability for Starlet: subscriber setup and GenAI span attributes.

pub mod genai_attrs;
pub mod tracing_setup;
