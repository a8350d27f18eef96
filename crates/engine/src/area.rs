//! Content-area list resolution.
//!
//! A content area is a flat, ordered list of content items, not a tree.
//! Each surviving item resolves exactly like a leaf node; the caller
//! controls per-item and per-list wrapping and optional per-item deferral.

use crate::context::ResolutionContext;
use crate::output::{Output, Props};
use crate::renderer::LayoutProps;
use crate::walker::render_component;
use futures::future::{join_all, try_join_all};
use serde_json::Value;
use weft_core::{ContentAreaItem, EngineError};

/// Wrapper configuration for list or item output.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Wrapper {
    /// Emit the output directly, with no wrapper of its own.
    #[default]
    None,
    /// Wrap in an element with the given name and props.
    Element {
        /// Wrapper element name.
        name: String,
        /// Wrapper props.
        props: Props,
    },
}

impl Wrapper {
    /// Creates an element wrapper with no props.
    pub fn element(name: impl Into<String>) -> Self {
        Wrapper::Element {
            name: name.into(),
            props: Props::new(),
        }
    }

    /// Creates an element wrapper with props.
    pub fn element_with_props(name: impl Into<String>, props: Props) -> Self {
        Wrapper::Element {
            name: name.into(),
            props,
        }
    }
}

/// Options controlling content-area resolution.
#[derive(Clone, Default)]
pub struct AreaOptions {
    /// Wrapper applied around each rendered item.
    pub item_wrapper: Wrapper,
    /// Wrapper applied once around the whole list.
    pub list_wrapper: Wrapper,
    /// Defer each item independently behind a suspend boundary.
    pub use_suspense: bool,
    /// Shared fallback shown while a deferred item loads (and emitted for
    /// items that fail when deferral is on).
    pub suspense_fallback: Option<Output>,
}

/// Resolves a flat content-area list to output.
///
/// Entries without usable `_metadata` are filtered out up front and never
/// reach the reference resolver. Without suspense the list is fail-fast like
/// the tree walker; with suspense each item fails independently.
pub async fn resolve_list(
    values: &[Value],
    ctx: &ResolutionContext,
    options: &AreaOptions,
) -> Result<Output, EngineError> {
    let items = ContentAreaItem::filter_items(values);
    let futures = items.iter().map(|item| resolve_item(item, ctx, options));

    let rendered: Vec<Output> = if options.use_suspense {
        join_all(futures)
            .await
            .into_iter()
            .map(|result| match result {
                Ok(output) => Output::Suspense {
                    fallback: options.suspense_fallback.clone().map(Box::new),
                    children: Box::new(output),
                },
                Err(error) => {
                    log::warn!("content-area item failed to resolve: {error}");
                    options.suspense_fallback.clone().unwrap_or_default()
                }
            })
            .collect()
    } else {
        try_join_all(futures).await?
    };

    Ok(wrap_list(&options.list_wrapper, rendered))
}

async fn resolve_item(
    item: &ContentAreaItem,
    ctx: &ResolutionContext,
    options: &AreaOptions,
) -> Result<Output, EngineError> {
    let reference = item.metadata.reference();
    let dispatch_key = item.metadata.dispatch_key();
    let layout = LayoutProps {
        display_option: item.display_option.clone(),
        ..Default::default()
    };
    let output = render_component(
        ctx,
        &dispatch_key,
        item.display_option.as_deref(),
        &reference,
        Some(item.payload.clone()),
        layout,
    )
    .await?;
    Ok(wrap_item(item, &options.item_wrapper, output))
}

fn wrap_item(item: &ContentAreaItem, wrapper: &Wrapper, output: Output) -> Output {
    match wrapper {
        Wrapper::None => output,
        Wrapper::Element { name, props } => {
            let mut props = props.clone();
            if let Some(tag) = &item.tag {
                props.insert("tag".to_string(), Value::String(tag.clone()));
            }
            if let Some(display_option) = &item.display_option {
                props.insert(
                    "displayOption".to_string(),
                    Value::String(display_option.clone()),
                );
            }
            Output::Element {
                name: name.clone(),
                props,
                children: vec![output],
            }
        }
    }
}

fn wrap_list(wrapper: &Wrapper, children: Vec<Output>) -> Output {
    match wrapper {
        Wrapper::None => Output::Fragment { children },
        Wrapper::Element { name, props } => Output::Element {
            name: name.clone(),
            props: props.clone(),
            children,
        },
    }
}
