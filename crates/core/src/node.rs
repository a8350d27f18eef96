//! Composition tree node model.
//!
//! A composition tree is delivered as generic nodes discriminated by
//! `layoutType`: `"component"` marks a leaf bound to one content item,
//! anything else is a structural node that only contains other nodes.

use crate::error::EngineError;
use crate::reference::{ContentMetadata, ContentReference};
use serde::Deserialize;
use serde_json::Value;

/// Key/value display setting attached to a composition node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    /// Setting name.
    pub key: String,
    /// Setting value.
    pub value: String,
}

/// A node in the composition tree, discriminated by `layoutType`.
///
/// The two shapes never mix: a node's identity for lookup purposes is fully
/// determined by its variant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawNode")]
pub enum CompositionNode {
    /// A container node that lays out other nodes.
    Structural(StructuralNode),
    /// A node bound directly to one content item.
    Leaf(LeafNode),
}

impl CompositionNode {
    /// Parses a raw composition node, mapping any shape violation to
    /// [`EngineError::MalformedNode`].
    pub fn from_value(value: Value) -> Result<Self, EngineError> {
        serde_json::from_value(value).map_err(|err| EngineError::MalformedNode(err.to_string()))
    }
}

/// A container node: experience, section, row, column.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralNode {
    /// Display name from the authoring tool.
    pub name: Option<String>,
    /// Layout kind, never `"component"`.
    pub layout_type: Option<String>,
    /// Optional node type refinement.
    pub node_type: Option<String>,
    /// Node identity within the composition.
    pub key: String,
    /// Optional display template name.
    pub template: Option<String>,
    /// Display settings, in authoring order.
    pub settings: Vec<Setting>,
    /// Child nodes, in authoring order.
    pub nodes: Vec<CompositionNode>,
}

/// A leaf node bound to one content item.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    /// Display name from the authoring tool.
    pub name: Option<String>,
    /// Node identity within the composition.
    pub key: String,
    /// Optional display template name.
    pub template: Option<String>,
    /// Display settings, in authoring order.
    pub settings: Vec<Setting>,
    /// The bound content payload, including its `_metadata` envelope.
    pub component: Value,
}

impl LeafNode {
    /// Parses the bound content's `_metadata` envelope.
    pub fn metadata(&self) -> ContentMetadata {
        ContentMetadata::from_payload(&self.component).unwrap_or_default()
    }

    /// Builds the content reference for the bound content.
    pub fn reference(&self) -> ContentReference {
        self.metadata().reference()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    name: Option<String>,
    layout_type: Option<String>,
    #[serde(rename = "type")]
    node_type: Option<String>,
    key: Option<String>,
    template: Option<String>,
    #[serde(default)]
    settings: Vec<Setting>,
    #[serde(default)]
    nodes: Vec<CompositionNode>,
    component: Option<Value>,
}

impl TryFrom<RawNode> for CompositionNode {
    type Error = String;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let key = raw
            .key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| "composition node without a key".to_string())?;

        let is_leaf = raw.layout_type.as_deref() == Some("component")
            || (raw.layout_type.is_none() && raw.component.is_some());

        if is_leaf {
            let component = raw
                .component
                .ok_or_else(|| format!("component node {key} without a bound payload"))?;
            if !raw.nodes.is_empty() {
                return Err(format!("component node {key} must not contain child nodes"));
            }
            Ok(CompositionNode::Leaf(LeafNode {
                name: raw.name,
                key,
                template: raw.template,
                settings: raw.settings,
                component,
            }))
        } else {
            if raw.component.is_some() {
                return Err(format!("structural node {key} must not bind a component"));
            }
            Ok(CompositionNode::Structural(StructuralNode {
                name: raw.name,
                layout_type: raw.layout_type,
                node_type: raw.node_type,
                key,
                template: raw.template,
                settings: raw.settings,
                nodes: raw.nodes,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_structural_tree() {
        let node: CompositionNode = serde_json::from_value(json!({
            "name": "Body",
            "layoutType": "section",
            "type": "banner",
            "key": "sec-1",
            "template": "Hero",
            "settings": [{"key": "align", "value": "center"}],
            "nodes": [
                {
                    "layoutType": "component",
                    "key": "cmp-1",
                    "component": {"_metadata": {"key": "abc", "types": ["Article", "Content"]}}
                }
            ]
        }))
        .unwrap();

        let CompositionNode::Structural(section) = node else {
            panic!("expected structural node");
        };
        assert_eq!(section.layout_type.as_deref(), Some("section"));
        assert_eq!(section.template.as_deref(), Some("Hero"));
        assert_eq!(section.settings.len(), 1);
        assert_eq!(section.nodes.len(), 1);
        let CompositionNode::Leaf(leaf) = &section.nodes[0] else {
            panic!("expected leaf child");
        };
        assert_eq!(leaf.reference().usable_key(), Some("abc"));
    }

    #[test]
    fn test_node_without_key_is_rejected() {
        let result: Result<CompositionNode, _> =
            serde_json::from_value(json!({"layoutType": "section"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_value_maps_shape_violations_to_malformed_node() {
        let result = CompositionNode::from_value(json!({"layoutType": "section"}));
        let Err(EngineError::MalformedNode(message)) = result else {
            panic!("expected malformed-node error");
        };
        assert!(message.contains("without a key"));

        let result = CompositionNode::from_value(json!({
            "layoutType": "section",
            "key": "sec-1",
            "component": {"title": "x"}
        }));
        assert!(matches!(result, Err(EngineError::MalformedNode(_))));

        assert!(
            CompositionNode::from_value(json!({
                "layoutType": "component",
                "key": "cmp-1",
                "component": {"title": "x"}
            }))
            .is_ok()
        );
    }

    #[test]
    fn test_component_node_with_children_is_rejected() {
        let result: Result<CompositionNode, _> = serde_json::from_value(json!({
            "layoutType": "component",
            "key": "cmp-1",
            "component": {},
            "nodes": [{"layoutType": "section", "key": "sec-1"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_leaf_without_metadata_is_inline() {
        let node: CompositionNode = serde_json::from_value(json!({
            "layoutType": "component",
            "key": "cmp-1",
            "component": {"title": "x"}
        }))
        .unwrap();
        let CompositionNode::Leaf(leaf) = node else {
            panic!("expected leaf node");
        };
        assert!(leaf.reference().is_inline);
    }
}
