//! Fetch-client boundary: query documents, fragment shells, variables, and
//! result-envelope normalization.
//!
//! The engine never speaks a wire protocol itself. It builds document text
//! and a variables object, hands both to the [`FetchClient`], and normalizes
//! whatever envelope comes back. Two upstream schema generations are
//! supported; the active one is selected on the resolution context.

use async_trait::async_trait;
use serde_json::{Map, Value};
use weft_core::{ContentReference, FetchError};

/// Which upstream schema generation the engine is talking to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaGeneration {
    /// Pre-rewrite backend: `Content` root field, integer versions.
    Legacy,
    /// Current backend: `_Content` root field, string versions.
    #[default]
    Current,
}

impl SchemaGeneration {
    fn root_field(self) -> &'static str {
        match self {
            SchemaGeneration::Legacy => "Content",
            SchemaGeneration::Current => "_Content",
        }
    }

    fn version_type(self) -> &'static str {
        match self {
            SchemaGeneration::Legacy => "Int",
            SchemaGeneration::Current => "String",
        }
    }

    /// Converts a parsed version number to the generation's native
    /// representation.
    pub fn version_value(self, version: i64) -> Value {
        match self {
            SchemaGeneration::Legacy => Value::from(version),
            SchemaGeneration::Current => Value::from(version.to_string()),
        }
    }
}

/// A declarative, named, parameterized request owned by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDocument {
    /// Document name, for diagnostics.
    pub name: String,
    /// Raw document text executed by the fetch client.
    pub body: String,
}

impl QueryDocument {
    /// Creates a query document.
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// A named, reusable data shape fetched by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentDocument {
    /// Fragment name, spliced into the synthetic query shell.
    pub name: String,
    /// Raw fragment definition text.
    pub body: String,
}

impl FragmentDocument {
    /// Creates a fragment document.
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// Executes query documents against the content backend.
#[async_trait]
pub trait FetchClient: Send + Sync {
    /// Executes `document` with `variables`, returning the raw structured
    /// result.
    async fn request(&self, document: &str, variables: Value) -> Result<Value, FetchError>;
}

/// Builds the synthetic single-item query shell wrapping a fragment
/// definition. The fragment's raw body is concatenated after the shell.
pub fn fragment_query(fragment: &FragmentDocument, generation: SchemaGeneration) -> String {
    format!(
        "query Load{name}($key: String!, $version: {version_type}, $locale: [Locales], \
$variation: String, $changeset: String) {{\n  \
result: {root}(\n    \
where: {{ key: {{ eq: $key }}, version: {{ eq: $version }}, changeset: {{ eq: $changeset }} }}\n    \
locale: $locale\n    variation: $variation\n  ) {{\n    \
items {{\n      ...{name}\n    }}\n    total\n  }}\n}}\n{body}",
        name = fragment.name,
        version_type = generation.version_type(),
        root = generation.root_field(),
        body = fragment.body,
    )
}

/// Builds fetch variables from a reference. The reference's locale wins over
/// the context's; the version converts to the generation's native form, and
/// a non-positive or unparsable version means no constraint at all.
pub fn reference_variables(
    reference: &ContentReference,
    context_locale: Option<&str>,
    generation: SchemaGeneration,
) -> Value {
    let mut variables = Map::new();
    if let Some(key) = reference.usable_key() {
        variables.insert("key".to_string(), Value::from(key));
    }
    if let Some(version) = reference.version_number() {
        variables.insert("version".to_string(), generation.version_value(version));
    }
    if let Some(locale) = reference.locale.as_deref().or(context_locale) {
        variables.insert("locale".to_string(), Value::from(locale));
    }
    if let Some(variation) = reference.variation.as_deref() {
        variables.insert("variation".to_string(), Value::from(variation));
    }
    if let Some(changeset) = reference.changeset.as_deref() {
        variables.insert("changeset".to_string(), Value::from(changeset));
    }
    Value::Object(variables)
}

/// Extracts the item list from a raw fetch result.
///
/// Tolerates the envelope shapes both generations produce:
/// `{data:{result:{items}}}`, `{result:{items}}`, `{items}`, or a bare array.
pub fn extract_items(result: &Value) -> Vec<Value> {
    if let Value::Array(items) = result {
        return items.clone();
    }
    let envelope = result.get("data").unwrap_or(result);
    let collection = envelope.get("result").unwrap_or(envelope);
    match collection.get("items") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fragment_query_concatenates_shell_and_body() {
        let fragment = FragmentDocument::new("ArticleData", "fragment ArticleData on Article { title }");
        let document = fragment_query(&fragment, SchemaGeneration::Current);
        assert!(document.starts_with("query LoadArticleData("));
        assert!(document.contains("...ArticleData"));
        assert!(document.ends_with("fragment ArticleData on Article { title }"));
        assert!(document.contains("_Content("));
        assert!(document.contains("$version: String"));
    }

    #[test]
    fn test_fragment_query_legacy_shape() {
        let fragment = FragmentDocument::new("ArticleData", "fragment ArticleData on Article { title }");
        let document = fragment_query(&fragment, SchemaGeneration::Legacy);
        assert!(document.contains("result: Content("));
        assert!(document.contains("$version: Int"));
    }

    #[test]
    fn test_reference_variables_version_conversion() {
        let mut reference = ContentReference::by_key("abc");
        reference.version = Some("5".to_string());

        let legacy = reference_variables(&reference, None, SchemaGeneration::Legacy);
        assert_eq!(legacy["version"], json!(5));

        let current = reference_variables(&reference, None, SchemaGeneration::Current);
        assert_eq!(current["version"], json!("5"));
    }

    #[test]
    fn test_reference_variables_drop_unusable_version() {
        let mut reference = ContentReference::by_key("abc");
        reference.version = Some("draft".to_string());
        let variables = reference_variables(&reference, None, SchemaGeneration::Current);
        assert!(variables.get("version").is_none());
    }

    #[test]
    fn test_reference_locale_wins_over_context() {
        let mut reference = ContentReference::by_key("abc");
        reference.locale = Some("sv".to_string());
        let variables = reference_variables(&reference, Some("en"), SchemaGeneration::Current);
        assert_eq!(variables["locale"], json!("sv"));

        reference.locale = None;
        let variables = reference_variables(&reference, Some("en"), SchemaGeneration::Current);
        assert_eq!(variables["locale"], json!("en"));
    }

    #[test]
    fn test_extract_items_tolerates_envelopes() {
        let items = json!([{"a": 1}]);
        assert_eq!(extract_items(&items).len(), 1);
        assert_eq!(extract_items(&json!({"items": [{"a": 1}]})).len(), 1);
        assert_eq!(
            extract_items(&json!({"result": {"items": [{"a": 1}, {"a": 2}]}})).len(),
            2
        );
        assert_eq!(
            extract_items(&json!({"data": {"result": {"items": [{"a": 1}]}}})).len(),
            1
        );
        assert!(extract_items(&json!({"data": {}})).is_empty());
        assert!(extract_items(&json!(null)).is_empty());
    }
}
