//! PromptHasher trait for deriving artifact names from prompts.
//!
//! The `Sha256PromptHasher` adapter lives in starlet-infra.

/// Maps a prompt to a stable number.
///
/// Only the low digits end up in file names, so different prompts may
/// collide. Implementations must be deterministic across processes.
pub trait PromptHasher: Send + Sync {
    fn hash_prompt(&self, prompt: &str) -> u64;
}
