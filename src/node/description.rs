//! Static metadata a host shows for a node type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything a host needs to list and configure a node type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: String,
    /// Registry key
    pub name: String,
    pub group: Vec<String>,
    pub version: u32,
    pub description: String,
    pub defaults: NodeDefaults,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub icon: String,
    pub properties: Vec<NodeProperty>,
}

impl NodeDescription {
    /// Look up a property by its parameter name
    pub fn property(&self, name: &str) -> Option<&NodeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefaults {
    pub name: String,
}

/// Kind of editor a host renders for a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Options,
}

/// One configurable parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub display_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub default: Value,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
}

/// A selectable value for an `options` property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyOption {
    pub name: String,
    pub value: Value,
}

impl PropertyOption {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_serializes_type_and_skips_empty_fields() {
        let property = NodeProperty {
            display_name: "Binary Property".to_string(),
            name: "binaryProperty".to_string(),
            kind: PropertyType::String,
            default: json!("data"),
            required: false,
            description: "where the image lives".to_string(),
            options: Vec::new(),
        };

        let value = serde_json::to_value(&property).unwrap();
        assert_eq!(value["type"], "string");
        assert_eq!(value["displayName"], "Binary Property");
        assert!(value.get("required").is_none());
        assert!(value.get("options").is_none());
    }

    #[test]
    fn option_values_keep_their_json_type() {
        let option = PropertyOption::new("8 bits (64 bits total)", 8);
        assert_eq!(serde_json::to_value(&option).unwrap()["value"], json!(8));
    }
}
