//! Content-area item model: flat, ordered lists of content items.

use crate::reference::ContentMetadata;
use serde_json::Value;

/// One entry of a flat content-area list.
///
/// Items are not tree nodes: they carry their payload directly, plus a
/// `_metadata` envelope and optional display hints.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentAreaItem {
    /// The parsed `_metadata` envelope.
    pub metadata: ContentMetadata,
    /// Optional display option, used as a renderer variant hint.
    pub display_option: Option<String>,
    /// Optional authoring tag.
    pub tag: Option<String>,
    /// The full original payload, `_metadata` included.
    pub payload: Value,
}

impl ContentAreaItem {
    /// Parses a raw list entry. Returns `None` when the value carries no
    /// usable `_metadata`; such entries never reach the reference resolver.
    pub fn from_value(value: &Value) -> Option<Self> {
        let metadata = ContentMetadata::from_payload(value)?;
        let string_field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };
        Some(Self {
            metadata,
            display_option: string_field("displayOption"),
            tag: string_field("tag"),
            payload: value.clone(),
        })
    }

    /// Filters a raw list down to items with usable metadata, preserving order.
    pub fn filter_items(values: &[Value]) -> Vec<Self> {
        values.iter().filter_map(Self::from_value).collect()
    }
}
