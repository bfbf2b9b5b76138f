//! Google Gemini REST integration.
//!
//! [`GeminiClient`] talks to `generateContent` on either the Gemini API
//! (API key) or Vertex AI (bearer token from [`auth`]). The engine and the
//! image generator are both built on it.

pub mod auth;
pub mod client;
pub mod image;
pub mod types;

pub use client::{GeminiBackend, GeminiClient};
pub use image::GeminiImageGenerator;
