//! Composition tree walker.
//!
//! Resolves a composition tree bottom-up in three passes over an explicit
//! worklist, keeping iteration depth and concurrency fan-out independent of
//! the host call stack:
//!
//! 1. flatten the tree into tagged entries with parent links;
//! 2. fan out every leaf resolution as a future and join them, so
//!    independent fetches overlap while results keep input order;
//! 3. assemble bottom-up, rendering each structural node over its
//!    already-resolved children.
//!
//! Any failure short-circuits the whole walk; a partially resolved tree is
//! never emitted.

use crate::context::ResolutionContext;
use crate::diagnostics::missing_leaf_renderer;
use crate::output::Output;
use crate::renderer::{LayoutProps, RenderRequest};
use crate::resolver::resolve_data;
use futures::future::try_join_all;
use serde_json::{Map, Value, json};
use weft_core::{CompositionNode, ContentReference, DispatchKey, EngineError, LeafNode, StructuralNode};

/// Resolves a whole composition tree to output.
pub async fn resolve_node(
    root: &CompositionNode,
    ctx: &ResolutionContext,
) -> Result<Output, EngineError> {
    // Pass 1: flatten. Children are pushed in reverse so siblings come off
    // the stack in authoring order; descendants always follow their parent
    // in `entries`.
    let mut entries: Vec<Entry> = Vec::new();
    let mut stack: Vec<(&CompositionNode, Option<usize>)> = vec![(root, None)];
    while let Some((node, parent)) = stack.pop() {
        let index = entries.len();
        match node {
            CompositionNode::Structural(structural) => {
                entries.push(Entry::Structural {
                    node: structural,
                    parent,
                });
                for child in structural.nodes.iter().rev() {
                    stack.push((child, Some(index)));
                }
            }
            CompositionNode::Leaf(leaf) => entries.push(Entry::Leaf { node: leaf, parent }),
        }
    }

    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];
    for (index, entry) in entries.iter().enumerate() {
        if let Some(parent) = entry.parent() {
            children_of[parent].push(index);
        }
    }

    // Pass 2: leaf fan-out, then join. Results stay positional and the
    // first failure aborts the walk.
    let mut leaf_indices = Vec::new();
    let mut leaf_futures = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        if let Entry::Leaf { node, .. } = entry {
            leaf_indices.push(index);
            leaf_futures.push(resolve_leaf(node, ctx));
        }
    }
    let rendered_leaves = try_join_all(leaf_futures).await?;

    let mut slots: Vec<Option<Output>> = entries.iter().map(|_| None).collect();
    for (index, output) in leaf_indices.into_iter().zip(rendered_leaves) {
        slots[index] = Some(output);
    }

    // Pass 3: assemble. A reverse scan sees children before parents.
    for index in (0..entries.len()).rev() {
        if let Entry::Structural { node, .. } = entries[index] {
            let children: Vec<Output> = children_of[index]
                .iter()
                .map(|&child| slots[child].take().unwrap_or_default())
                .collect();
            slots[index] = Some(render_structural(node, children, ctx)?);
        }
    }

    Ok(slots.first_mut().and_then(Option::take).unwrap_or_default())
}

#[derive(Clone, Copy)]
enum Entry<'a> {
    Structural {
        node: &'a StructuralNode,
        parent: Option<usize>,
    },
    Leaf {
        node: &'a LeafNode,
        parent: Option<usize>,
    },
}

impl Entry<'_> {
    fn parent(&self) -> Option<usize> {
        match self {
            Entry::Structural { parent, .. } | Entry::Leaf { parent, .. } => *parent,
        }
    }
}

async fn resolve_leaf(leaf: &LeafNode, ctx: &ResolutionContext) -> Result<Output, EngineError> {
    let metadata = leaf.metadata();
    let reference = metadata.reference();
    let dispatch_key = metadata.dispatch_key();
    let layout = LayoutProps {
        template: leaf.template.clone(),
        layout_type: Some("component".to_string()),
        settings: leaf.settings.clone(),
        ..Default::default()
    };
    render_component(
        ctx,
        &dispatch_key,
        None,
        &reference,
        Some(leaf.component.clone()),
        layout,
    )
    .await
}

/// Resolves one content-bound component: renderer lookup, data loading,
/// rendering. Shared by the tree walker and the content-area resolver.
pub(crate) async fn render_component(
    ctx: &ResolutionContext,
    dispatch_key: &DispatchKey,
    variant: Option<&str>,
    reference: &ContentReference,
    provided: Option<Value>,
    layout: LayoutProps,
) -> Result<Output, EngineError> {
    let renderer = variant
        .and_then(|variant| ctx.registry().resolve(dispatch_key, Some(variant)))
        .or_else(|| ctx.registry().resolve(dispatch_key, None));
    let Some(renderer) = renderer else {
        return Ok(missing_leaf_renderer(ctx, dispatch_key, reference, Vec::new()));
    };

    let data = resolve_data(ctx, reference, renderer.as_ref(), provided, false).await?;
    Ok(renderer.render(RenderRequest {
        data,
        reference: reference.clone(),
        layout,
        children: Vec::new(),
    }))
}

fn render_structural(
    node: &StructuralNode,
    children: Vec<Output>,
    ctx: &ResolutionContext,
) -> Result<Output, EngineError> {
    let candidates = structural_candidates(node);
    let Some(dispatch_key) = candidates.iter().find(|key| ctx.registry().has(key, None)) else {
        return Err(EngineError::NoStructuralRenderer {
            name: node.name.clone(),
            tried: candidates.iter().map(|key| key.joined()).collect(),
        });
    };
    log::debug!("structural node {} dispatches to {dispatch_key}", node.key);

    let renderer = ctx
        .registry()
        .resolve(dispatch_key, None)
        .ok_or_else(|| EngineError::NoStructuralRenderer {
            name: node.name.clone(),
            tried: vec![dispatch_key.joined()],
        })?;

    // Structural data is the node's own metadata; it is never fetched.
    let settings: Map<String, Value> = node
        .settings
        .iter()
        .map(|setting| (setting.key.clone(), Value::String(setting.value.clone())))
        .collect();
    let data = json!({
        "name": node.name,
        "key": node.key,
        "settings": settings,
    });

    Ok(renderer.render(RenderRequest {
        data,
        reference: ContentReference::inline(Some(node.key.clone())),
        layout: LayoutProps {
            template: node.template.clone(),
            layout_type: node.layout_type.clone(),
            settings: node.settings.clone(),
            ..Default::default()
        },
        children,
    }))
}

/// Ordered candidate dispatch keys for a structural node, most specific
/// first: template/type/layout combinations, then the untyped sentinel,
/// then the generic `Node` and `Component` fallbacks.
///
/// The first candidate the registry answers for wins.
pub fn structural_candidates(node: &StructuralNode) -> Vec<DispatchKey> {
    // Blank declarations would produce unmatchable empty segments.
    let template = node.template.as_deref().filter(|s| !s.is_empty()).map(capitalize);
    let node_type = node.node_type.as_deref().filter(|s| !s.is_empty()).map(capitalize);
    let layout = node.layout_type.as_deref().filter(|s| !s.is_empty()).map(capitalize);

    let mut candidates: Vec<DispatchKey> = Vec::new();
    if let (Some(layout), Some(node_type), Some(template)) = (&layout, &node_type, &template) {
        push_unique(&mut candidates, &[layout, node_type, template]);
    }
    if let (Some(node_type), Some(template)) = (&node_type, &template) {
        push_unique(&mut candidates, &[node_type, template]);
    }
    if let (Some(layout), Some(template)) = (&layout, &template) {
        push_unique(&mut candidates, &[layout, template]);
    }
    if let Some(template) = &template {
        push_unique(&mut candidates, &[template]);
    }
    if let Some(node_type) = &node_type {
        push_unique(&mut candidates, &[node_type]);
    }
    if let Some(layout) = &layout {
        push_unique(&mut candidates, &[layout]);
    }
    candidates.push(DispatchKey::empty());
    push_unique(&mut candidates, &["Node"]);
    push_unique(&mut candidates, &["Component"]);
    candidates
}

fn push_unique(candidates: &mut Vec<DispatchKey>, segments: &[&str]) {
    let key = DispatchKey::new(segments.iter().map(|s| s.to_string()).collect());
    if !candidates.contains(&key) {
        candidates.push(key);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
