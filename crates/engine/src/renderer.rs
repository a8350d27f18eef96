//! Renderer contract: how a renderer declares its data needs and turns a
//! resolved node into output.
//!
//! The data-loading contract is a closed set decided once at registration,
//! not probed per resolution: a renderer is query-bound, fragment-bound, or
//! unbound, and the resolver switches over that.

use crate::fetch::{FragmentDocument, QueryDocument};
use crate::output::{Output, Props};
use serde_json::Value;
use std::sync::Arc;
use weft_core::reference::payload_has_own_fields;
use weft_core::{ContentReference, Setting};

/// Declares how a renderer's data is loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DataContract {
    /// The renderer needs no fetched data.
    #[default]
    Unbound,
    /// The renderer owns a full parameterized query document.
    Query(QueryDocument),
    /// The renderer declares a named, reusable data shape fetched by reference.
    Fragment(FragmentDocument),
}

/// Layout metadata passed through from the composition node to the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutProps {
    /// Display template name, when the node declares one.
    pub template: Option<String>,
    /// Layout kind of the node.
    pub layout_type: Option<String>,
    /// Display option carried by a content-area item.
    pub display_option: Option<String>,
    /// Display settings, in authoring order.
    pub settings: Vec<Setting>,
}

/// Everything a renderer receives for one node.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    /// Resolved content data. An empty object when nothing was needed.
    pub data: Value,
    /// The reference the data was resolved for.
    pub reference: ContentReference,
    /// Layout metadata from the composition node.
    pub layout: LayoutProps,
    /// Already-rendered children, in input order.
    pub children: Vec<Output>,
}

/// A renderer turns one resolved node into output.
pub trait Render: Send + Sync {
    /// Renders the node.
    fn render(&self, request: RenderRequest) -> Output;

    /// The data-loading contract. Defaults to [`DataContract::Unbound`].
    fn data_contract(&self) -> DataContract {
        DataContract::Unbound
    }

    /// Validates provided data against the renderer's expected shape.
    ///
    /// `None` means the renderer declares no validator; `Some(false)` makes
    /// the resolver discard the provided data and fetch instead.
    fn validate_data(&self, _data: &Value) -> Option<bool> {
        None
    }
}

/// Minimal built-in renderer: a fixed element wrapping the children.
///
/// Settings and the template name become props; resolved data is attached
/// under a `data` prop when it carries any content fields.
pub struct ElementRenderer {
    name: String,
}

impl ElementRenderer {
    /// Creates a renderer emitting elements named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Convenience constructor for registry entries.
    pub fn shared(name: impl Into<String>) -> Arc<dyn Render> {
        Arc::new(Self::new(name))
    }
}

impl Render for ElementRenderer {
    fn render(&self, request: RenderRequest) -> Output {
        let mut props = Props::new();
        for setting in &request.layout.settings {
            props.insert(setting.key.clone(), Value::String(setting.value.clone()));
        }
        if let Some(template) = &request.layout.template {
            props.insert("template".to_string(), Value::String(template.clone()));
        }
        if let Some(display_option) = &request.layout.display_option {
            props.insert(
                "displayOption".to_string(),
                Value::String(display_option.clone()),
            );
        }
        if payload_has_own_fields(&request.data) {
            props.insert("data".to_string(), request.data.clone());
        }
        Output::Element {
            name: self.name.clone(),
            props,
            children: request.children,
        }
    }
}
