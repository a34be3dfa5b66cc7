//! The host seam a node executes against.

use super::item::NodeItem;
use serde_json::{Map, Value};

/// What a host provides to a running node
pub trait ExecutionContext: Send + Sync {
    /// Items arriving on the node's main input
    fn input_items(&self) -> &[NodeItem];

    /// Value of parameter `name` as resolved for item `item_index`.
    ///
    /// `None` means the user left it unset; nodes fall back to the
    /// property default.
    fn parameter(&self, name: &str, item_index: usize) -> Option<Value>;

    /// Record failed items as `{ "error": ... }` instead of aborting
    fn continue_on_fail(&self) -> bool;
}

/// In-memory context with fixed parameters, optionally overridden per item
#[derive(Debug, Clone, Default)]
pub struct StaticContext {
    items: Vec<NodeItem>,
    parameters: Map<String, Value>,
    item_overrides: Vec<(usize, String, Value)>,
    continue_on_fail: bool,
}

impl StaticContext {
    pub fn new(items: Vec<NodeItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Set a parameter for every item
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Set a parameter for a single item, taking precedence over `with_parameter`
    pub fn with_item_parameter(
        mut self,
        item_index: usize,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.item_overrides
            .push((item_index, name.into(), value.into()));
        self
    }

    pub fn with_continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }
}

impl ExecutionContext for StaticContext {
    fn input_items(&self) -> &[NodeItem] {
        &self.items
    }

    fn parameter(&self, name: &str, item_index: usize) -> Option<Value> {
        self.item_overrides
            .iter()
            .rev()
            .find(|(index, key, _)| *index == item_index && key == name)
            .map(|(_, _, value)| value.clone())
            .or_else(|| self.parameters.get(name).cloned())
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }
}
