//! The "Image Hasher" node: one pHash record per input image.

use super::context::ExecutionContext;
use super::description::{NodeDefaults, NodeDescription, NodeProperty, PropertyOption, PropertyType};
use super::item::NodeItem;
use super::traits::NodeType;
use crate::core::hasher::{compute_hash_with_policy, DcPolicy, HashResult};
use crate::error::NodeError;
use crate::events::{Event, EventSender, ExecutionSummary, NodeEvent};
use chrono::{SecondsFormat, Utc};
use rayon::prelude::*;
use serde_json::{json, Map, Value};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Registry key of this node type
pub const NODE_NAME: &str = "imageHasher";

/// Value of the `algorithm` field in every output record
pub const ALGORITHM: &str = "phash";

pub const PARAM_BINARY_PROPERTY: &str = "binaryProperty";
pub const PARAM_HASH_SIZE: &str = "hashSize";
pub const PARAM_INCLUDE_DC: &str = "includeDc";

const DEFAULT_BINARY_PROPERTY: &str = "data";
const DEFAULT_HASH_SIZE: i64 = 16;

/// Hashes the image found in a binary property of every item
pub struct ImageHasherNode {
    description: NodeDescription,
}

impl ImageHasherNode {
    pub fn new() -> Self {
        Self {
            description: describe(),
        }
    }

    /// Resolve parameters for one item and hash its image
    fn hash_item(
        &self,
        context: &dyn ExecutionContext,
        item_index: usize,
    ) -> Result<HashResult, NodeError> {
        let property = string_parameter(context, PARAM_BINARY_PROPERTY, item_index)?
            .unwrap_or_else(|| DEFAULT_BINARY_PROPERTY.to_string());
        let hash_size = integer_parameter(context, PARAM_HASH_SIZE, item_index)?
            .unwrap_or(DEFAULT_HASH_SIZE);
        let dc_policy = match bool_parameter(context, PARAM_INCLUDE_DC, item_index)? {
            Some(true) => DcPolicy::Include,
            _ => DcPolicy::Exclude,
        };

        let binary = context
            .input_items()
            .get(item_index)
            .and_then(|item| item.binary.get(&property))
            .ok_or_else(|| NodeError::MissingBinary {
                property: property.clone(),
                item_index,
            })?;

        let bytes = binary.to_bytes().map_err(|e| NodeError::InvalidBinaryData {
            property: property.clone(),
            item_index,
            reason: e.to_string(),
        })?;

        compute_hash_with_policy(&bytes, hash_size, dc_policy)
            .map_err(|source| NodeError::Hash { item_index, source })
    }
}

impl Default for ImageHasherNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeType for ImageHasherNode {
    fn description(&self) -> &NodeDescription {
        &self.description
    }

    fn execute(
        &self,
        context: &dyn ExecutionContext,
        events: &EventSender,
    ) -> Result<Vec<NodeItem>, NodeError> {
        let start = Instant::now();
        let total_items = context.input_items().len();

        events.send(Event::Node(NodeEvent::Started { total_items }));

        // Items are independent; collect keeps input order
        let outcomes: Vec<Result<HashResult, NodeError>> = (0..total_items)
            .into_par_iter()
            .map(|item_index| {
                let outcome = self.hash_item(context, item_index);
                match &outcome {
                    Ok(result) => events.send(Event::Node(NodeEvent::ItemHashed {
                        item_index,
                        hash: result.hex_hash.clone(),
                    })),
                    Err(e) => events.send(Event::Node(NodeEvent::ItemFailed {
                        item_index,
                        message: e.to_string(),
                    })),
                }
                outcome
            })
            .collect();

        let mut output = Vec::with_capacity(total_items);
        let mut failed = 0;

        for (item_index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(result) => {
                    debug!(item_index, hash = %result.hex_hash, "item hashed");
                    output.push(NodeItem::from_json(output_record(&result)));
                }
                Err(e) if context.continue_on_fail() => {
                    warn!(item_index, error = %e, "item failed, continuing");
                    failed += 1;
                    output.push(NodeItem::from_json(error_record(&e)));
                }
                Err(e) => {
                    warn!(item_index, error = %e, "item failed, aborting execution");
                    return Err(e);
                }
            }
        }

        let summary = ExecutionSummary {
            succeeded: total_items - failed,
            failed,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            node = NODE_NAME,
            succeeded = summary.succeeded,
            failed = summary.failed,
            duration_ms = summary.duration_ms,
            "node execution finished"
        );

        events.send(Event::Node(NodeEvent::Completed(summary)));

        Ok(output)
    }
}

/// `{ hash, algorithm, size, totalBits, createdAt }`
fn output_record(result: &HashResult) -> Map<String, Value> {
    let record = json!({
        "hash": result.hex_hash,
        "algorithm": ALGORITHM,
        "size": result.hash_size,
        "totalBits": result.bit_length,
        "createdAt": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    });
    into_map(record)
}

fn error_record(error: &NodeError) -> Map<String, Value> {
    into_map(json!({ "error": error.to_string() }))
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn invalid_parameter(name: &str, item_index: usize, reason: &str) -> NodeError {
    NodeError::InvalidParameter {
        name: name.to_string(),
        item_index,
        reason: reason.to_string(),
    }
}

fn string_parameter(
    context: &dyn ExecutionContext,
    name: &str,
    item_index: usize,
) -> Result<Option<String>, NodeError> {
    match context.parameter(name, item_index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if !s.is_empty() => Ok(Some(s)),
        Some(Value::String(_)) => Err(invalid_parameter(name, item_index, "must not be empty")),
        Some(_) => Err(invalid_parameter(name, item_index, "expected a string")),
    }
}

fn integer_parameter(
    context: &dyn ExecutionContext,
    name: &str,
    item_index: usize,
) -> Result<Option<i64>, NodeError> {
    match context.parameter(name, item_index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| invalid_parameter(name, item_index, "expected an integer")),
        Some(_) => Err(invalid_parameter(name, item_index, "expected an integer")),
    }
}

fn bool_parameter(
    context: &dyn ExecutionContext,
    name: &str,
    item_index: usize,
) -> Result<Option<bool>, NodeError> {
    match context.parameter(name, item_index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(_) => Err(invalid_parameter(name, item_index, "expected a boolean")),
    }
}

fn describe() -> NodeDescription {
    NodeDescription {
        display_name: "Image Hasher".to_string(),
        name: NODE_NAME.to_string(),
        group: vec!["transform".to_string()],
        version: 1,
        description: "Generate perceptual hash (pHash) for images".to_string(),
        defaults: NodeDefaults {
            name: "Image Hasher".to_string(),
        },
        inputs: vec!["main".to_string()],
        outputs: vec!["main".to_string()],
        icon: "file:imageHash.svg".to_string(),
        properties: vec![
            NodeProperty {
                display_name: "Binary Property".to_string(),
                name: PARAM_BINARY_PROPERTY.to_string(),
                kind: PropertyType::String,
                default: json!(DEFAULT_BINARY_PROPERTY),
                required: true,
                description: "The name of the binary property containing the image".to_string(),
                options: Vec::new(),
            },
            NodeProperty {
                display_name: "Hash Size".to_string(),
                name: PARAM_HASH_SIZE.to_string(),
                kind: PropertyType::Options,
                default: json!(DEFAULT_HASH_SIZE),
                required: false,
                description: "Size of the hash - higher values capture more detail".to_string(),
                options: [4, 8, 16, 32]
                    .into_iter()
                    .map(|size| {
                        PropertyOption::new(
                            format!("{} bits ({} bits total)", size, size * size),
                            size,
                        )
                    })
                    .collect(),
            },
            NodeProperty {
                display_name: "Include DC Coefficient".to_string(),
                name: PARAM_INCLUDE_DC.to_string(),
                kind: PropertyType::Boolean,
                default: json!(false),
                required: false,
                description: "Use the overall-brightness (DC) coefficient as one of the hash bits"
                    .to_string(),
                options: Vec::new(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{null_sender, EventChannel};
    use crate::node::context::StaticContext;
    use crate::node::item::BinaryData;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Luma};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| Luma([f(x, y)]));
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn image_item(property: &str, bytes: &[u8]) -> NodeItem {
        NodeItem::default().with_binary(
            property,
            BinaryData::from_bytes(bytes, Some("image/png".to_string())),
        )
    }

    #[test]
    fn description_matches_registry_name() {
        let node = ImageHasherNode::new();
        let description = node.description();

        assert_eq!(description.name, NODE_NAME);
        assert_eq!(description.display_name, "Image Hasher");
        let hash_size = description.property(PARAM_HASH_SIZE).unwrap();
        assert_eq!(hash_size.default, json!(16));
        assert_eq!(hash_size.options.len(), 4);
        assert_eq!(hash_size.options[1].name, "8 bits (64 bits total)");
    }

    #[test]
    fn hashes_item_with_default_parameters() {
        let bytes = png_bytes(64, 64, |x, _| (x * 4) as u8);
        let context = StaticContext::new(vec![image_item("data", &bytes)]);

        let output = ImageHasherNode::new()
            .execute(&context, &null_sender())
            .unwrap();

        assert_eq!(output.len(), 1);
        let record = &output[0].json;
        assert_eq!(record["algorithm"], "phash");
        assert_eq!(record["size"], 16);
        assert_eq!(record["totalBits"], 256);
        assert_eq!(record["hash"].as_str().unwrap().len(), 64);
        assert!(record["createdAt"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn custom_binary_property_and_size() {
        let bytes = png_bytes(32, 32, |x, y| ((x ^ y) * 8) as u8);
        let context = StaticContext::new(vec![image_item("photo", &bytes)])
            .with_parameter(PARAM_BINARY_PROPERTY, "photo")
            .with_parameter(PARAM_HASH_SIZE, 8);

        let output = ImageHasherNode::new()
            .execute(&context, &null_sender())
            .unwrap();

        assert_eq!(output[0].json["totalBits"], 64);
        assert_eq!(output[0].json["hash"].as_str().unwrap().len(), 16);
    }

    #[test]
    fn missing_binary_aborts_without_continue_on_fail() {
        let context = StaticContext::new(vec![NodeItem::default()]);

        let error = ImageHasherNode::new()
            .execute(&context, &null_sender())
            .unwrap_err();

        assert_eq!(error.to_string(), "No binary data found in property \"data\"");
        assert_eq!(error.item_index(), Some(0));
    }

    #[test]
    fn continue_on_fail_records_error_and_keeps_order() {
        let good = png_bytes(16, 16, |x, _| (x * 16) as u8);
        let context = StaticContext::new(vec![
            image_item("data", &good),
            image_item("data", b"not an image"),
            image_item("data", &good),
        ])
        .with_parameter(PARAM_HASH_SIZE, 4)
        .with_continue_on_fail(true);

        let output = ImageHasherNode::new()
            .execute(&context, &null_sender())
            .unwrap();

        assert_eq!(output.len(), 3);
        assert!(output[0].json.contains_key("hash"));
        assert!(output[1].json["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to decode image"));
        assert_eq!(output[2].json["hash"], output[0].json["hash"]);
    }

    #[test]
    fn first_failure_in_input_order_is_reported() {
        let good = png_bytes(16, 16, |_, y| (y * 16) as u8);
        let context = StaticContext::new(vec![
            image_item("data", &good),
            NodeItem::default(),
            image_item("data", b""),
        ])
        .with_parameter(PARAM_HASH_SIZE, 4);

        let error = ImageHasherNode::new()
            .execute(&context, &null_sender())
            .unwrap_err();

        assert_eq!(error.item_index(), Some(1));
    }

    #[test]
    fn invalid_hash_size_parameter_is_reported() {
        let bytes = png_bytes(8, 8, |_, _| 0);
        let context = StaticContext::new(vec![image_item("data", &bytes)])
            .with_parameter(PARAM_HASH_SIZE, "big")
            .with_continue_on_fail(true);

        let output = ImageHasherNode::new()
            .execute(&context, &null_sender())
            .unwrap();

        assert!(output[0].json["error"]
            .as_str()
            .unwrap()
            .contains("hashSize"));
    }

    #[test]
    fn zero_hash_size_is_invalid_input() {
        let bytes = png_bytes(8, 8, |_, _| 0);
        let context = StaticContext::new(vec![image_item("data", &bytes)])
            .with_parameter(PARAM_HASH_SIZE, 0);

        let error = ImageHasherNode::new()
            .execute(&context, &null_sender())
            .unwrap_err();

        assert!(matches!(
            error,
            NodeError::Hash {
                source: crate::error::HashError::InvalidInput(_),
                ..
            }
        ));
    }

    #[test]
    fn include_dc_parameter_must_be_boolean() {
        let bytes = png_bytes(8, 8, |_, _| 0);
        let context = StaticContext::new(vec![image_item("data", &bytes)])
            .with_parameter(PARAM_INCLUDE_DC, "yes");

        let error = ImageHasherNode::new()
            .execute(&context, &null_sender())
            .unwrap_err();
        assert!(error.to_string().contains(PARAM_INCLUDE_DC));
    }

    #[test]
    fn include_dc_parameter_changes_the_hash() {
        let bytes = png_bytes(64, 64, |x, y| ((x * 3 + y * 5) % 256) as u8);
        let hash_with = |include_dc: bool| {
            let context = StaticContext::new(vec![image_item("data", &bytes)])
                .with_parameter(PARAM_INCLUDE_DC, include_dc);
            let output = ImageHasherNode::new()
                .execute(&context, &null_sender())
                .unwrap();
            output[0].json["hash"].clone()
        };

        let excluded = hash_with(false);
        let included = hash_with(true);

        assert_ne!(excluded, included);
        assert_eq!(
            included,
            json!(compute_hash_with_policy(&bytes, 16, DcPolicy::Include).unwrap().hex_hash)
        );
        assert_eq!(
            excluded,
            json!(compute_hash_with_policy(&bytes, 16, DcPolicy::Exclude).unwrap().hex_hash)
        );
    }

    #[test]
    fn emits_progress_events() {
        let good = png_bytes(16, 16, |x, y| ((x + y) * 8) as u8);
        let context = StaticContext::new(vec![image_item("data", &good), NodeItem::default()])
            .with_parameter(PARAM_HASH_SIZE, 4)
            .with_continue_on_fail(true);
        let (sender, receiver) = EventChannel::new();

        ImageHasherNode::new().execute(&context, &sender).unwrap();
        drop(sender);

        let events: Vec<Event> = receiver.iter().collect();
        assert!(matches!(
            events.first(),
            Some(Event::Node(NodeEvent::Started { total_items: 2 }))
        ));
        assert!(events.iter().any(|e| matches!(
            e,
            Event::Node(NodeEvent::ItemHashed { item_index: 0, .. })
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            Event::Node(NodeEvent::ItemFailed { item_index: 1, .. })
        )));
        match events.last() {
            Some(Event::Node(NodeEvent::Completed(summary))) => {
                assert_eq!(summary.succeeded, 1);
                assert_eq!(summary.failed, 1);
            }
            other => panic!("Wrong final event: {:?}", other),
        }
    }
}
