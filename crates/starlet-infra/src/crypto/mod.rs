//! Hashing adapters for Starlet.

pub mod hash;
