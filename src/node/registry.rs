//! Build-time table of the node types this package provides.

use super::image_hasher::{ImageHasherNode, NODE_NAME as IMAGE_HASHER};
use super::traits::NodeType;
use crate::error::NodeError;

type NodeFactory = fn() -> Box<dyn NodeType>;

static NODE_TYPES: &[(&str, NodeFactory)] = &[(IMAGE_HASHER, image_hasher)];

fn image_hasher() -> Box<dyn NodeType> {
    Box::new(ImageHasherNode::new())
}

/// Names of every registered node type
pub fn node_type_names() -> impl Iterator<Item = &'static str> {
    NODE_TYPES.iter().map(|(name, _)| *name)
}

/// Instantiate the node type registered under `name`
pub fn lookup(name: &str) -> Result<Box<dyn NodeType>, NodeError> {
    NODE_TYPES
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, factory)| factory())
        .ok_or_else(|| NodeError::UnknownNodeType {
            name: name.to_string(),
        })
}

/// Instantiate every registered node type
pub fn all() -> Vec<Box<dyn NodeType>> {
    NODE_TYPES.iter().map(|(_, factory)| factory()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_hasher_is_registered() {
        let node = lookup("imageHasher").unwrap();
        assert_eq!(node.description().name, "imageHasher");
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            lookup("imageResizer"),
            Err(NodeError::UnknownNodeType { .. })
        ));
    }

    #[test]
    fn registered_names_match_descriptions() {
        let names: Vec<_> = node_type_names().collect();
        let described: Vec<_> = all()
            .iter()
            .map(|node| node.description().name.clone())
            .collect();
        assert_eq!(names, described);
    }
}
