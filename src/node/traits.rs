//! Trait implemented by every node type.

use super::context::ExecutionContext;
use super::description::NodeDescription;
use super::item::NodeItem;
use crate::error::NodeError;
use crate::events::EventSender;

/// A unit of work a workflow host can run
pub trait NodeType: Send + Sync {
    /// Static metadata (name, parameters, defaults)
    fn description(&self) -> &NodeDescription;

    /// Process every input item, returning the main output.
    ///
    /// Output items are in input order.
    fn execute(
        &self,
        context: &dyn ExecutionContext,
        events: &EventSender,
    ) -> Result<Vec<NodeItem>, NodeError>;
}
