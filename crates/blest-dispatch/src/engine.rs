//! Batch validation and execution.
//!
//! [`dispatch`] is the engine's single entry point. The batch is validated in
//! full before any route code runs: a malformed batch or any malformed item
//! fails the whole call with a 400 error envelope and no item is processed.
//! Valid items then execute with bounded concurrency, and the response array
//! preserves the request's item order.

use crate::options::DispatchOptions;
use crate::reducer::run_item;
use blest_core::{BlestError, Context, ErrorObject, RequestEnvelope, ResponseEnvelope};
use blest_router::Router;
use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Dispatches a batch with default options.
///
/// See [`dispatch_with_options`].
pub async fn dispatch(
    router: &Router,
    batch: &Value,
    ctx: &Context,
) -> Result<Vec<ResponseEnvelope>, ErrorObject> {
    dispatch_with_options(router, batch, ctx, &DispatchOptions::default()).await
}

/// Dispatches a batch of `[id, route, params?, selector?]` items.
///
/// Returns one `[id, route, result, error]` envelope per item, in request
/// order, with exactly one of `result`/`error` set. Item failures are
/// isolated; the outer `Err` is returned only for batch-level validation
/// failures, before any route code has run.
///
/// The base `ctx` is cloned per item, so one item's context mutations are
/// never visible to a sibling.
pub async fn dispatch_with_options(
    router: &Router,
    batch: &Value,
    ctx: &Context,
    options: &DispatchOptions,
) -> Result<Vec<ResponseEnvelope>, ErrorObject> {
    let envelopes = validate_batch(batch)?;
    debug!(items = envelopes.len(), "dispatching batch");

    let responses = stream::iter(
        envelopes
            .into_iter()
            .map(|envelope| run_item(router, envelope, ctx, options)),
    )
    .buffered(options.concurrency.max(1))
    .collect()
    .await;

    Ok(responses)
}

/// Parses and validates every batch item before any execution.
fn validate_batch(batch: &Value) -> Result<Vec<RequestEnvelope>, ErrorObject> {
    let Value::Array(items) = batch else {
        return Err(invalid("Request body should be a JSON array"));
    };
    if items.is_empty() {
        return Err(invalid("Request body should be a JSON array"));
    }

    let mut envelopes = Vec::with_capacity(items.len());
    for item in items {
        envelopes.push(RequestEnvelope::from_value(item).map_err(|error| error.to_object(false))?);
    }

    let mut seen = HashSet::with_capacity(envelopes.len());
    if !envelopes
        .iter()
        .all(|envelope| seen.insert(envelope.id.as_str()))
    {
        return Err(invalid("Request items should have unique IDs"));
    }

    Ok(envelopes)
}

fn invalid(message: &str) -> ErrorObject {
    BlestError::bad_request(message).to_object(false)
}
