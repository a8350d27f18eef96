//! Content references and the `_metadata` envelope carried by payloads.

use crate::error::EngineError;
use crate::types::{DispatchKey, TypePath};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload field names that belong to the reference itself rather than to
/// the content's own data.
const REFERENCE_FIELDS: &[&str] = &[
    "_metadata",
    "key",
    "version",
    "locale",
    "variation",
    "changeset",
    "isInline",
    "types",
];

/// Identifies one content item for data loading.
///
/// A non-inline reference must carry a non-empty key. An inline reference is
/// never addressable by a fetch; its data must be supplied by the parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentReference {
    /// Opaque content id. Required unless the reference is inline.
    pub key: Option<String>,
    /// Optional version constraint, as delivered by the upstream.
    pub version: Option<String>,
    /// Optional locale override for this reference.
    pub locale: Option<String>,
    /// Optional variation selector.
    pub variation: Option<String>,
    /// Optional changeset selector.
    pub changeset: Option<String>,
    /// Whether this content has no stable addressable key.
    pub is_inline: bool,
}

impl ContentReference {
    /// Creates an addressable reference for the given key.
    pub fn by_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Creates an inline reference, optionally carrying a synthetic key for
    /// diagnostics.
    pub fn inline(key: Option<String>) -> Self {
        Self {
            key,
            is_inline: true,
            ..Self::default()
        }
    }

    /// Returns the key when it is present and non-empty.
    pub fn usable_key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }

    /// Checks the reference invariant: non-inline references need a key.
    ///
    /// An opt-in check for embedders constructing references by hand.
    /// References built from `_metadata` satisfy it by construction, and the
    /// data resolver deliberately degrades a keyless reference to an empty
    /// payload instead of rejecting it.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.is_inline && self.usable_key().is_none() {
            return Err(EngineError::InvalidReference(
                "non-inline reference without a key".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses the version as a positive number. Non-positive or unparsable
    /// versions mean "no version constraint", never an error.
    pub fn version_number(&self) -> Option<i64> {
        self.version
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)
    }

    /// Returns true when `name` is a reference metadata field rather than
    /// content data.
    pub fn is_metadata_field(name: &str) -> bool {
        REFERENCE_FIELDS.contains(&name)
    }
}

/// Returns true when `payload` carries content data beyond reference
/// metadata. Non-object payloads count as data when non-null.
pub fn payload_has_own_fields(payload: &Value) -> bool {
    match payload {
        Value::Null => false,
        Value::Object(map) => map
            .keys()
            .any(|name| !ContentReference::is_metadata_field(name)),
        _ => true,
    }
}

/// The `_metadata` envelope carried by content payloads and area items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentMetadata {
    /// Opaque content id.
    pub key: Option<String>,
    /// Version of the content item.
    pub version: Option<String>,
    /// Locale of the content item.
    pub locale: Option<String>,
    /// Variation selector.
    pub variation: Option<String>,
    /// Changeset selector.
    pub changeset: Option<String>,
    /// Declared content types, most specific first as delivered upstream.
    pub types: Option<TypePath>,
}

impl ContentMetadata {
    /// Parses the `_metadata` field of a payload, if present and well formed.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let raw = payload.get("_metadata")?;
        serde_json::from_value(raw.clone()).ok()
    }

    /// Builds the content reference for this metadata. Items without a
    /// usable key are treated as inline.
    pub fn reference(&self) -> ContentReference {
        let key = self.key.clone().filter(|k| !k.is_empty());
        ContentReference {
            is_inline: key.is_none(),
            key,
            version: self.version.clone(),
            locale: self.locale.clone(),
            variation: self.variation.clone(),
            changeset: self.changeset.clone(),
        }
    }

    /// Builds the dispatch key for this metadata.
    ///
    /// Upstream type lists are most-specific-first; dispatch keys are
    /// least-specific-first, so the list is reversed before normalization.
    pub fn dispatch_key(&self) -> DispatchKey {
        match &self.types {
            Some(types) => {
                let mut segments = types.raw_segments();
                segments.reverse();
                DispatchKey::from_types(Some(&TypePath::Segments(segments)))
            }
            None => DispatchKey::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_inline_requires_key() {
        let reference = ContentReference::default();
        assert!(reference.validate().is_err());
        assert!(ContentReference::by_key("abc").validate().is_ok());
        assert!(ContentReference::inline(None).validate().is_ok());
    }

    #[test]
    fn test_blank_key_is_not_usable() {
        let reference = ContentReference::by_key("");
        assert_eq!(reference.usable_key(), None);
        assert!(reference.validate().is_err());
    }

    #[test]
    fn test_version_number_rejects_non_positive_and_garbage() {
        let mut reference = ContentReference::by_key("abc");
        reference.version = Some("7".to_string());
        assert_eq!(reference.version_number(), Some(7));
        reference.version = Some("0".to_string());
        assert_eq!(reference.version_number(), None);
        reference.version = Some("-3".to_string());
        assert_eq!(reference.version_number(), None);
        reference.version = Some("draft".to_string());
        assert_eq!(reference.version_number(), None);
        reference.version = None;
        assert_eq!(reference.version_number(), None);
    }

    #[test]
    fn test_payload_has_own_fields() {
        assert!(!payload_has_own_fields(&json!(null)));
        assert!(!payload_has_own_fields(&json!({})));
        assert!(!payload_has_own_fields(
            &json!({"_metadata": {"key": "a"}, "key": "a"})
        ));
        assert!(payload_has_own_fields(
            &json!({"_metadata": {"key": "a"}, "title": "x"})
        ));
        assert!(payload_has_own_fields(&json!("scalar")));
    }

    #[test]
    fn test_metadata_reference_inline_when_keyless() {
        let metadata = ContentMetadata::default();
        assert!(metadata.reference().is_inline);

        let metadata = ContentMetadata {
            key: Some("abc".to_string()),
            ..Default::default()
        };
        let reference = metadata.reference();
        assert!(!reference.is_inline);
        assert_eq!(reference.usable_key(), Some("abc"));
    }

    #[test]
    fn test_metadata_dispatch_key_reverses_types() {
        let metadata = ContentMetadata {
            types: Some(TypePath::from(["Article", "Page", "Content"])),
            ..Default::default()
        };
        assert_eq!(metadata.dispatch_key().joined(), "Page/Article");
    }

    #[test]
    fn test_metadata_from_payload() {
        let payload = json!({
            "_metadata": {"key": "abc", "version": "2", "types": ["Article", "Content"]},
            "title": "x"
        });
        let metadata = ContentMetadata::from_payload(&payload).unwrap();
        assert_eq!(metadata.key.as_deref(), Some("abc"));
        assert_eq!(metadata.dispatch_key().joined(), "Article");
        assert!(ContentMetadata::from_payload(&json!({"title": "x"})).is_none());
    }
}
