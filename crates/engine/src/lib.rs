#![deny(missing_docs)]
//! weft engine: renderer registry, reference resolution, and composition walking.
//!
//! The engine resolves CMS-authored content into rendered output. An entry
//! point receives either a composition tree root ([`resolve_node`]) or a flat
//! content-area list ([`resolve_list`]), plus a [`ResolutionContext`]. Nodes
//! and items are matched to renderers through the [`RendererRegistry`] by
//! dispatch key; missing data is loaded through the [`FetchClient`] boundary.

/// Content-area list resolution.
pub mod area;
/// Per-request resolution context.
pub mod context;
/// Fallback policy for missing renderers.
pub mod diagnostics;
/// Fetch-client boundary: documents, variables, schema generations.
pub mod fetch;
/// Rendered output model.
pub mod output;
/// Renderer registry.
pub mod registry;
/// Renderer contract and built-in renderers.
pub mod renderer;
/// Content-reference data loading.
pub mod resolver;
/// Composition tree walker.
pub mod walker;

pub use area::{AreaOptions, Wrapper, resolve_list};
pub use context::{ContextBuilder, ResolutionContext};
pub use fetch::{FetchClient, FragmentDocument, QueryDocument, SchemaGeneration};
pub use output::{Output, Props};
pub use registry::{Registration, RendererDescriptor, RendererRegistry};
pub use renderer::{DataContract, ElementRenderer, LayoutProps, Render, RenderRequest};
pub use resolver::resolve_data;
pub use walker::{resolve_node, structural_candidates};
