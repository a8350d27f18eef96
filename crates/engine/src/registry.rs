//! Renderer registry: the mutable lookup table from dispatch key (plus
//! optional variant) to renderer descriptor.
//!
//! Registrations happen at startup or composition time; during a walk the
//! registry is read-only. Registering the same key again replaces the prior
//! entry.

use crate::output::Output;
use crate::renderer::{DataContract, Render, RenderRequest};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use weft_core::{DispatchKey, TypePath};

/// Input consumed by [`RendererRegistry::register`].
pub struct Registration {
    /// Raw type declaration; normalized into the dispatch key.
    pub types: TypePath,
    /// The renderer to register.
    pub renderer: Arc<dyn Render>,
    /// Whether to defer rendering behind a suspend boundary.
    pub use_suspense: bool,
    /// Placeholder renderer shown while deferred content loads.
    pub placeholder: Option<Arc<dyn Render>>,
    /// Optional variant discriminator.
    pub variant: Option<String>,
}

impl Registration {
    /// Creates a plain registration for `types`.
    pub fn new(types: impl Into<TypePath>, renderer: Arc<dyn Render>) -> Self {
        Self {
            types: types.into(),
            renderer,
            use_suspense: false,
            placeholder: None,
            variant: None,
        }
    }

    /// Defers rendering behind a suspend boundary.
    pub fn with_suspense(mut self) -> Self {
        self.use_suspense = true;
        self
    }

    /// Sets the placeholder shown while deferred content loads.
    pub fn with_placeholder(mut self, placeholder: Arc<dyn Render>) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Sets the variant discriminator.
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }
}

/// A stored registration.
#[derive(Clone)]
pub struct RendererDescriptor {
    /// Normalized dispatch key.
    pub dispatch_key: DispatchKey,
    /// Variant discriminator, when registered with one.
    pub variant: Option<String>,
    /// The registered renderer.
    pub renderer: Arc<dyn Render>,
    /// Whether rendering defers behind a suspend boundary.
    pub use_suspense: bool,
    /// Placeholder renderer for deferred rendering.
    pub placeholder: Option<Arc<dyn Render>>,
}

impl fmt::Debug for RendererDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererDescriptor")
            .field("dispatch_key", &self.dispatch_key)
            .field("variant", &self.variant)
            .field("use_suspense", &self.use_suspense)
            .field("has_placeholder", &self.placeholder.is_some())
            .finish_non_exhaustive()
    }
}

fn table_key(key: &DispatchKey, variant: Option<&str>) -> String {
    match variant {
        Some(variant) => format!("{}#{variant}", key.joined()),
        None => key.joined(),
    }
}

/// Lookup table from `(dispatch key, variant)` to renderer descriptor.
#[derive(Debug, Default)]
pub struct RendererRegistry {
    table: HashMap<String, RendererDescriptor>,
}

impl RendererRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a registration. Registering the same
    /// `(dispatch key, variant)` pair again overwrites the prior entry.
    pub fn register(&mut self, registration: Registration) {
        let dispatch_key = DispatchKey::from_types(Some(&registration.types));
        let key = table_key(&dispatch_key, registration.variant.as_deref());
        log::debug!("registering renderer for {key}");
        self.table.insert(
            key,
            RendererDescriptor {
                dispatch_key,
                variant: registration.variant,
                renderer: registration.renderer,
                use_suspense: registration.use_suspense,
                placeholder: registration.placeholder,
            },
        );
    }

    /// Registers a list of entries in order.
    pub fn register_all(&mut self, registrations: Vec<Registration>) {
        for registration in registrations {
            self.register(registration);
        }
    }

    /// Returns true when a renderer is registered for the key.
    pub fn has(&self, key: &DispatchKey, variant: Option<&str>) -> bool {
        self.table.contains_key(&table_key(key, variant))
    }

    /// Returns the stored descriptor for the key.
    pub fn descriptor(&self, key: &DispatchKey, variant: Option<&str>) -> Option<&RendererDescriptor> {
        self.table.get(&table_key(key, variant))
    }

    /// Resolves the renderer for the key. Descriptors registered with
    /// suspense come back wrapped in the suspend decorator.
    pub fn resolve(&self, key: &DispatchKey, variant: Option<&str>) -> Option<Arc<dyn Render>> {
        let descriptor = self.descriptor(key, variant)?;
        if descriptor.use_suspense {
            Some(Arc::new(SuspenseRenderer {
                inner: descriptor.renderer.clone(),
                placeholder: descriptor.placeholder.clone(),
            }))
        } else {
            Some(descriptor.renderer.clone())
        }
    }

    /// Removes a registration. Returns true whether the entry existed or
    /// not; deletion from the table cannot fail.
    pub fn remove(&mut self, key: &DispatchKey, variant: Option<&str>) -> bool {
        self.table.remove(&table_key(key, variant));
        true
    }

    /// Returns all stored descriptors, for merging registries.
    pub fn extract(&self) -> Vec<RendererDescriptor> {
        self.table.values().cloned().collect()
    }

    /// Number of stored descriptors.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Decorator deferring to the inner renderer behind a suspend boundary.
///
/// The data contract and validator delegate to the inner renderer so the
/// resolver sees the same data needs either way.
struct SuspenseRenderer {
    inner: Arc<dyn Render>,
    placeholder: Option<Arc<dyn Render>>,
}

impl Render for SuspenseRenderer {
    fn render(&self, request: RenderRequest) -> Output {
        let fallback = self
            .placeholder
            .as_ref()
            .map(|placeholder| Box::new(placeholder.render(RenderRequest::default())));
        Output::Suspense {
            fallback,
            children: Box::new(self.inner.render(request)),
        }
    }

    fn data_contract(&self) -> DataContract {
        self.inner.data_contract()
    }

    fn validate_data(&self, data: &Value) -> Option<bool> {
        self.inner.validate_data(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::ElementRenderer;

    fn key(path: &str) -> DispatchKey {
        DispatchKey::from_types(Some(&TypePath::from(path)))
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = RendererRegistry::new();
        registry.register(Registration::new("Page/Article", ElementRenderer::shared("article")));

        assert!(registry.has(&key("Page/Article"), None));
        assert!(registry.resolve(&key("Page/Article"), None).is_some());
        assert!(registry.resolve(&key("Unknown"), None).is_none());
    }

    #[test]
    fn test_repeat_registration_is_idempotent() {
        let mut registry = RendererRegistry::new();
        registry.register(Registration::new("Article", ElementRenderer::shared("a")));
        registry.register(Registration::new("Article", ElementRenderer::shared("b")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.extract().len(), 1);
    }

    #[test]
    fn test_variant_is_a_distinct_entry() {
        let mut registry = RendererRegistry::new();
        registry.register(Registration::new("Article", ElementRenderer::shared("article")));
        registry.register(
            Registration::new("Article", ElementRenderer::shared("wide-article"))
                .with_variant("wide"),
        );

        assert_eq!(registry.len(), 2);
        assert!(registry.has(&key("Article"), Some("wide")));
        assert!(!registry.has(&key("Article"), Some("narrow")));
    }

    #[test]
    fn test_blank_types_map_to_sentinel() {
        let mut registry = RendererRegistry::new();
        registry.register(Registration::new("", ElementRenderer::shared("fallback")));
        assert!(registry.has(&DispatchKey::empty(), None));
    }

    #[test]
    fn test_remove_is_true_even_when_absent() {
        let mut registry = RendererRegistry::new();
        registry.register(Registration::new("Article", ElementRenderer::shared("article")));
        assert!(registry.remove(&key("Article"), None));
        assert!(registry.remove(&key("Article"), None));
        assert!(!registry.has(&key("Article"), None));
    }

    #[test]
    fn test_suspense_resolution_wraps_output() {
        let mut registry = RendererRegistry::new();
        registry.register(
            Registration::new("Article", ElementRenderer::shared("article"))
                .with_suspense()
                .with_placeholder(ElementRenderer::shared("skeleton")),
        );

        let renderer = registry.resolve(&key("Article"), None).unwrap();
        let output = renderer.render(RenderRequest::default());
        let Output::Suspense { fallback, children } = output else {
            panic!("expected suspense output");
        };
        assert!(matches!(*children, Output::Element { ref name, .. } if name == "article"));
        assert!(matches!(
            fallback.as_deref(),
            Some(Output::Element { name, .. }) if name == "skeleton"
        ));
    }

    #[test]
    fn test_extract_supports_merging() {
        let mut source = RendererRegistry::new();
        source.register(Registration::new("Article", ElementRenderer::shared("article")));
        source.register(Registration::new("Hero", ElementRenderer::shared("hero")));

        let mut target = RendererRegistry::new();
        for descriptor in source.extract() {
            let mut registration = Registration::new(
                TypePath::Segments(descriptor.dispatch_key.segments().to_vec()),
                descriptor.renderer,
            );
            registration.use_suspense = descriptor.use_suspense;
            registration.placeholder = descriptor.placeholder;
            registration.variant = descriptor.variant;
            target.register(registration);
        }
        assert_eq!(target.len(), 2);
    }
}
