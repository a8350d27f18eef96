//! Rendered output model.
//!
//! Output is a host-agnostic tree the embedding layer turns into its own UI
//! representation. Variants serialize with a `type` tag so the tree can cross
//! a process or language boundary unchanged.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Props attached to a rendered element, in stable key order.
pub type Props = BTreeMap<String, Value>;

/// Rendered output produced by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Output {
    /// An element with a tag or component name, props, and children.
    Element {
        /// Element or component name.
        name: String,
        /// Element props.
        props: Props,
        /// Rendered children, in input order.
        children: Vec<Output>,
    },
    /// Plain text content.
    Text {
        /// The text.
        content: String,
    },
    /// A sequence of outputs with no wrapper of its own.
    Fragment {
        /// Rendered children, in input order.
        children: Vec<Output>,
    },
    /// Content deferred behind a suspend boundary.
    Suspense {
        /// Output shown until the deferred content is ready.
        fallback: Option<Box<Output>>,
        /// The deferred content.
        children: Box<Output>,
    },
    /// Diagnostic placeholder for a missing leaf renderer (debug/edit mode).
    MissingComponent {
        /// The dispatch key that found no renderer.
        dispatch_key: String,
        /// Key of the unresolved content, when known.
        content_key: Option<String>,
        /// Version of the unresolved content, when known.
        version: Option<String>,
        /// Pass-through children.
        children: Vec<Output>,
    },
    /// Nothing.
    #[default]
    Empty,
}

impl Output {
    /// Creates an element output.
    pub fn element(name: impl Into<String>, props: Props, children: Vec<Output>) -> Self {
        Output::Element {
            name: name.into(),
            props,
            children,
        }
    }

    /// Creates a text output.
    pub fn text(content: impl Into<String>) -> Self {
        Output::Text {
            content: content.into(),
        }
    }

    /// Creates a fragment output.
    pub fn fragment(children: Vec<Output>) -> Self {
        Output::Fragment { children }
    }

    /// Returns true for [`Output::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Output::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_with_type_tag() {
        let output = Output::element("div", Props::new(), vec![Output::text("hi")]);
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["type"], json!("element"));
        assert_eq!(value["children"][0]["type"], json!("text"));
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Output::default().is_empty());
    }
}
