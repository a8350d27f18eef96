//! Per-request resolution context.
//!
//! Created once per incoming render request and passed by reference through
//! the whole walk. Read-only during a walk, except for the locale, which may
//! be established lazily once; the first write wins and redundant writes by
//! concurrent siblings are harmless.

use crate::fetch::{FetchClient, SchemaGeneration};
use crate::registry::RendererRegistry;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use weft_core::EngineError;

/// Process/request-scoped state for one resolution pass.
pub struct ResolutionContext {
    registry: Arc<RendererRegistry>,
    client: Option<Arc<dyn FetchClient>>,
    debug: bool,
    edit_mode: bool,
    schema_generation: SchemaGeneration,
    locale: OnceCell<String>,
}

impl ResolutionContext {
    /// Starts building a context.
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// The active renderer registry.
    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    /// The fetch client, when one is configured.
    pub fn client(&self) -> Option<&dyn FetchClient> {
        self.client.as_deref()
    }

    /// Whether developer diagnostics are requested.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Whether the request renders inside the authoring tool.
    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// The active upstream schema generation.
    pub fn schema_generation(&self) -> SchemaGeneration {
        self.schema_generation
    }

    /// The established locale, if any.
    pub fn locale(&self) -> Option<&str> {
        self.locale.get().map(String::as_str)
    }

    /// Establishes the locale once. Later calls keep the first value.
    pub fn set_locale(&self, locale: impl Into<String>) {
        let _ = self.locale.set(locale.into());
    }

    /// True when missing-renderer diagnostics should be user-visible.
    pub fn show_diagnostics(&self) -> bool {
        self.debug || self.edit_mode
    }
}

/// Builder for [`ResolutionContext`]. The registry is mandatory: nothing can
/// render without one.
#[derive(Default)]
pub struct ContextBuilder {
    registry: Option<Arc<RendererRegistry>>,
    client: Option<Arc<dyn FetchClient>>,
    debug: bool,
    edit_mode: bool,
    schema_generation: SchemaGeneration,
    locale: Option<String>,
}

impl ContextBuilder {
    /// Sets the renderer registry.
    pub fn registry(mut self, registry: Arc<RendererRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the fetch client.
    pub fn client(mut self, client: Arc<dyn FetchClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Enables developer diagnostics.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Marks the request as coming from the authoring tool.
    pub fn edit_mode(mut self, edit_mode: bool) -> Self {
        self.edit_mode = edit_mode;
        self
    }

    /// Selects the upstream schema generation.
    pub fn schema_generation(mut self, generation: SchemaGeneration) -> Self {
        self.schema_generation = generation;
        self
    }

    /// Establishes the locale up front.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Builds the context. Fails with [`EngineError::MissingRegistry`] when
    /// no registry was supplied.
    pub fn build(self) -> Result<ResolutionContext, EngineError> {
        let registry = self.registry.ok_or(EngineError::MissingRegistry)?;
        let locale = OnceCell::new();
        if let Some(value) = self.locale {
            let _ = locale.set(value);
        }
        Ok(ResolutionContext {
            registry,
            client: self.client,
            debug: self.debug,
            edit_mode: self.edit_mode,
            schema_generation: self.schema_generation,
            locale,
        })
    }
}
