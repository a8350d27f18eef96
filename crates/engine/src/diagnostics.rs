//! Fallback policy for missing leaf renderers.
//!
//! Leaves are the one place a missing renderer is recovered locally. In
//! debug or edit mode the operator gets an explicit placeholder carrying the
//! unresolved dispatch key; in production the children pass through and the
//! miss is only logged. Structural nodes never come here: their miss is
//! always fatal, because the already-resolved children would be lost.

use crate::context::ResolutionContext;
use crate::output::Output;
use weft_core::{ContentReference, DispatchKey};

/// Renders the policy-driven fallback for a leaf whose dispatch key found no
/// renderer.
pub fn missing_leaf_renderer(
    ctx: &ResolutionContext,
    dispatch_key: &DispatchKey,
    reference: &ContentReference,
    children: Vec<Output>,
) -> Output {
    if ctx.show_diagnostics() {
        log::warn!("no renderer registered for {dispatch_key}");
        Output::MissingComponent {
            dispatch_key: dispatch_key.joined(),
            content_key: reference.key.clone(),
            version: reference.version.clone(),
            children,
        }
    } else {
        log::debug!("no renderer registered for {dispatch_key}, rendering children only");
        if children.is_empty() {
            Output::Empty
        } else {
            Output::Fragment { children }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RendererRegistry;
    use std::sync::Arc;

    fn ctx(debug: bool, edit_mode: bool) -> ResolutionContext {
        ResolutionContext::builder()
            .registry(Arc::new(RendererRegistry::new()))
            .debug(debug)
            .edit_mode(edit_mode)
            .build()
            .unwrap()
    }

    #[test]
    fn test_debug_mode_emits_placeholder() {
        let mut reference = ContentReference::by_key("abc");
        reference.version = Some("2".to_string());
        let output = missing_leaf_renderer(
            &ctx(true, false),
            &DispatchKey::new(vec!["Unknown".to_string()]),
            &reference,
            vec![Output::text("child")],
        );

        let Output::MissingComponent {
            dispatch_key,
            content_key,
            version,
            children,
        } = output
        else {
            panic!("expected diagnostic placeholder");
        };
        assert_eq!(dispatch_key, "Unknown");
        assert_eq!(content_key.as_deref(), Some("abc"));
        assert_eq!(version.as_deref(), Some("2"));
        assert_eq!(children.len(), 1);
    }

    #[test]
    fn test_edit_mode_emits_placeholder() {
        let output = missing_leaf_renderer(
            &ctx(false, true),
            &DispatchKey::new(vec!["Unknown".to_string()]),
            &ContentReference::by_key("abc"),
            Vec::new(),
        );
        assert!(matches!(output, Output::MissingComponent { .. }));
    }

    #[test]
    fn test_production_mode_passes_children_through() {
        let output = missing_leaf_renderer(
            &ctx(false, false),
            &DispatchKey::new(vec!["Unknown".to_string()]),
            &ContentReference::by_key("abc"),
            vec![Output::text("child")],
        );
        assert_eq!(
            output,
            Output::Fragment {
                children: vec![Output::text("child")]
            }
        );
    }

    #[test]
    fn test_production_mode_without_children_is_empty() {
        let output = missing_leaf_renderer(
            &ctx(false, false),
            &DispatchKey::new(vec!["Unknown".to_string()]),
            &ContentReference::by_key("abc"),
            Vec::new(),
        );
        assert!(output.is_empty());
    }
}
