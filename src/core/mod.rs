//! # Core Module
//!
//! The host-agnostic hashing engine.
//!
//! ## Modules
//! - `hasher` - Decodes, resamples, transforms and encodes images into pHashes

pub mod hasher;

// Re-export commonly used types
pub use hasher::{
    compute_hash, compute_hash_with_policy, DcPolicy, HashResult, HasherConfig, PerceptualHash,
};
