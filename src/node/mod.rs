//! # Node Module
//!
//! Workflow-node glue around the hashing engine.
//!
//! A host hands a node its input items through an [`ExecutionContext`];
//! the node reads each item's image from a named binary property, hashes
//! it, and returns one JSON record per item:
//!
//! ```json
//! { "hash": "f0e1...", "algorithm": "phash", "size": 16, "totalBits": 256,
//!   "createdAt": "2026-01-01T00:00:00.000Z" }
//! ```
//!
//! With continue-on-fail enabled a failing item yields `{ "error": "..." }`
//! instead of aborting the whole execution.

mod context;
mod description;
mod image_hasher;
mod item;
pub mod registry;
mod traits;

pub use context::{ExecutionContext, StaticContext};
pub use description::{NodeDefaults, NodeDescription, NodeProperty, PropertyOption, PropertyType};
pub use image_hasher::{
    ImageHasherNode, ALGORITHM, NODE_NAME, PARAM_BINARY_PROPERTY, PARAM_HASH_SIZE,
    PARAM_INCLUDE_DC,
};
pub use item::{mime_type_for_path, BinaryData, NodeItem};
pub use traits::NodeType;
