//! Infrastructure layer for Starlet.
//!
//! Contains implementations of the ports defined in `starlet-core`: the
//! Gemini REST client and agent engine, the Gemini image generator, local
//! artifact storage, SHA-256 prompt hashing, and configuration loading.

pub mod config;
pub mod crypto;
pub mod engine;
pub mod factory;
pub mod filesystem;
pub mod gemini;
