//! # Error Module
//!
//! Typed errors for the hashing engine and the workflow node.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - item index, property name, what went wrong
//! - **Terminal per call** - nothing here is retried; the caller decides
//!   whether a failed item aborts the batch

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ImageHasherError {
    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by the perceptual hashing engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HashError {
    /// Bad hash size or malformed matrix dimensions
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The bytes could not be decoded as a supported image format
    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    /// Unexpected numeric failure, e.g. NaN from a degenerate image
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Errors raised while executing a workflow node
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("No binary data found in property \"{property}\"")]
    MissingBinary { property: String, item_index: usize },

    #[error("Invalid value for parameter \"{name}\": {reason}")]
    InvalidParameter {
        name: String,
        item_index: usize,
        reason: String,
    },

    #[error("Binary property \"{property}\" is not valid base64: {reason}")]
    InvalidBinaryData {
        property: String,
        item_index: usize,
        reason: String,
    },

    #[error("{source}")]
    Hash {
        item_index: usize,
        #[source]
        source: HashError,
    },

    #[error("Unknown node type: {name}")]
    UnknownNodeType { name: String },
}

impl NodeError {
    /// Index of the input item that produced the error, if any
    pub fn item_index(&self) -> Option<usize> {
        match self {
            NodeError::MissingBinary { item_index, .. }
            | NodeError::InvalidParameter { item_index, .. }
            | NodeError::InvalidBinaryData { item_index, .. }
            | NodeError::Hash { item_index, .. } => Some(*item_index),
            NodeError::UnknownNodeType { .. } => None,
        }
    }
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ImageHasherError>;
