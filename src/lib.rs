//! # Image Hasher Node
//!
//! A workflow node that fingerprints images with a perceptual hash (pHash).
//!
//! ## Architecture
//! The library is split into a pure hashing engine and the glue around it:
//! - `core` - The DCT perceptual hashing engine (no I/O, no shared state)
//! - `node` - Workflow-node description, items, execution and registry
//! - `events` - Per-item progress reporting
//! - `error` - Typed error taxonomy
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;
pub mod node;

// Re-export commonly used types at the crate root
pub use crate::core::{compute_hash, HashResult};
pub use error::{HashError, ImageHasherError, NodeError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or host adapter).
/// Verbosity follows `RUST_LOG`.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
