//! Shared domain types for Starlet.
//!
//! This crate contains the core domain types used across the Starlet services:
//! personas, session keys, conversation content, agent events, tool outcomes,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod content;
pub mod error;
pub mod persona;
pub mod session;
pub mod tool;
