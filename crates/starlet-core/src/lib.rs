//! Business logic and port definitions for Starlet.
//!
//! This crate defines the "ports" (engine, tool, storage traits) that the
//! infrastructure layer implements, plus the session registry and the
//! conversation runner built on top of them. It depends only on
//! `starlet-types` -- never on `starlet-infra` or any HTTP/IO crate.

pub mod engine;
pub mod runner;
pub mod session;
pub mod tool;

#[cfg(test)]
pub(crate) mod testing;
