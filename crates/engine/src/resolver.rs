//! Content-reference data loading.
//!
//! The decision procedure that determines, for one reference and one
//! renderer, whether data is already available, must be fetched via the
//! renderer's fragment or query, or is not needed at all.

use crate::context::ResolutionContext;
use crate::fetch::{extract_items, fragment_query, reference_variables};
use crate::renderer::{DataContract, Render};
use serde_json::{Map, Value};
use weft_core::reference::payload_has_own_fields;
use weft_core::{ContentReference, EngineError};

fn empty_payload() -> Value {
    Value::Object(Map::new())
}

/// Resolves the data `renderer` needs for `reference`.
///
/// In order: provided data wins when it carries content fields and passes
/// the renderer's validator (a failed validation logs a warning and falls
/// through to fetching); inline references without satisfied data are fatal;
/// `skip_fetch` and keyless references yield an empty payload; past that a
/// fetch client is mandatory, and the renderer's contract decides between a
/// single-item fragment fetch, a raw query, or no data at all.
pub async fn resolve_data(
    ctx: &ResolutionContext,
    reference: &ContentReference,
    renderer: &dyn Render,
    provided: Option<Value>,
    skip_fetch: bool,
) -> Result<Value, EngineError> {
    if let Some(data) = provided {
        if payload_has_own_fields(&data) {
            match renderer.validate_data(&data) {
                Some(false) => {
                    log::warn!(
                        "provided data for {:?} failed validation, falling back to fetch",
                        reference.key
                    );
                }
                _ => return Ok(data),
            }
        }
    }

    // Inline content is never addressable by a fetch.
    if reference.is_inline {
        return Err(EngineError::InlineContentWithoutData {
            key: reference.key.clone(),
        });
    }

    if skip_fetch {
        return Ok(empty_payload());
    }

    let Some(key) = reference.usable_key() else {
        return Ok(empty_payload());
    };

    let Some(client) = ctx.client() else {
        return Err(EngineError::MissingFetchClient {
            key: key.to_string(),
        });
    };

    let generation = ctx.schema_generation();
    match renderer.data_contract() {
        DataContract::Fragment(fragment) => {
            let document = fragment_query(&fragment, generation);
            let variables = reference_variables(reference, ctx.locale(), generation);
            let result = client.request(&document, variables).await?;
            let mut items = extract_items(&result);
            match items.len() {
                0 => Err(EngineError::not_found(
                    key,
                    reference.version.clone(),
                    reference.locale.clone(),
                )),
                1 => Ok(items.remove(0)),
                count => {
                    // Tie-break on fetch order; upstream ordering carries no
                    // stability guarantee.
                    log::warn!(
                        "fragment {} for content {key} returned {count} items, using the first",
                        fragment.name
                    );
                    Ok(items.remove(0))
                }
            }
        }
        DataContract::Query(query) => {
            let variables = reference_variables(reference, ctx.locale(), generation);
            Ok(client.request(&query.body, variables).await?)
        }
        DataContract::Unbound => Ok(empty_payload()),
    }
}
