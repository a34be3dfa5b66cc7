//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};

/// All events emitted while a node executes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Node execution events
    Node(NodeEvent),
}

/// Events during node execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeEvent {
    /// Execution has started
    Started { total_items: usize },
    /// An item was hashed
    ItemHashed { item_index: usize, hash: String },
    /// An item failed; whether execution continues depends on the node
    ItemFailed { item_index: usize, message: String },
    /// Execution finished (also sent when continue-on-fail absorbed errors)
    Completed(ExecutionSummary),
}

/// Summary of one node execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    /// Items that produced a hash
    pub succeeded: usize,
    /// Items that produced an error record
    pub failed: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}
