#![deny(missing_docs)]
//! weft core: dispatch keys, content references, and the composition node model.

/// Engine error taxonomy.
pub mod error;
/// Content-area item model.
pub mod item;
/// Composition tree node model.
pub mod node;
/// Content references and `_metadata` envelopes.
pub mod reference;
/// Type-path normalization and dispatch keys.
pub mod types;

pub use error::{EngineError, FetchError};
pub use item::ContentAreaItem;
pub use node::{CompositionNode, LeafNode, Setting, StructuralNode};
pub use reference::{ContentMetadata, ContentReference};
pub use types::{
    BASE_TYPE, DispatchKey, EMPTY_KEY, KEY_SEPARATOR, TypePath, normalize, normalize_and_prefix,
};
