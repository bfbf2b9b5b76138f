//! SHA-256 prompt hashing for artifact file names.
//!
//! Implements the `PromptHasher` trait from `starlet-core` using the `sha2`
//! crate (RustCrypto ecosystem).

use sha2::{Digest, Sha256};

use starlet_core::tool::hash::PromptHasher;

/// First eight bytes (big-endian) of the prompt's SHA-256 digest.
///
/// Stable across processes and platforms.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256PromptHasher;

impl Sha256PromptHasher {
    pub fn new() -> Self {
        Self
    }
}

impl PromptHasher for Sha256PromptHasher {
    fn hash_prompt(&self, prompt: &str) -> u64 {
        let digest = Sha256::digest(prompt.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(prefix)
    }
}
