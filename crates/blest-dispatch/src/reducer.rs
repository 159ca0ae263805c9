//! Single-item pipeline execution.
//!
//! [`run_item`] drives one batch item through its route's stage chain and
//! assembles the correlated response envelope. The control rule is a single
//! pass over the chain with one error slot:
//!
//! - middleware and the handler run only while no error has been captured;
//! - afterware always runs, receiving the captured error if any;
//! - a failing afterware becomes the item's error only when none was
//!   captured earlier.
//!
//! A route with a timeout has its whole chain raced against a deadline; on
//! expiry the chain future is dropped and the item fails with a 500.

use crate::options::DispatchOptions;
use blest_core::{BlestError, Context, Object, RequestEnvelope, ResponseEnvelope};
use blest_router::{Route, Router, Stage};
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Executes one batch item against the registry and returns its response.
pub(crate) async fn run_item(
    router: &Router,
    envelope: RequestEnvelope,
    base: &Context,
    options: &DispatchOptions,
) -> ResponseEnvelope {
    let Some(route) = router.resolve(&envelope.route) else {
        debug!(route = %envelope.route, id = %envelope.id, "route not found");
        return ResponseEnvelope::failure(
            envelope.id,
            envelope.route,
            BlestError::RouteNotFound.to_object(options.include_stack),
        );
    };

    let mut ctx = base.derive(&envelope);
    let params = envelope.params.clone().unwrap_or_default();
    let (result, error) = run_route(route, &envelope, &params, &mut ctx).await;

    if let Some(error) = error {
        return ResponseEnvelope::failure(
            envelope.id,
            envelope.route,
            error.to_object(options.include_stack),
        );
    }

    match result {
        Some(Value::Object(map)) => {
            let projected = match &envelope.selector {
                Some(selector) => selector.project(&map),
                None => map,
            };
            ResponseEnvelope::success(envelope.id, envelope.route, projected)
        }
        _ => {
            warn!(route = %envelope.route, id = %envelope.id, "handler returned a non-object result");
            ResponseEnvelope::failure(
                envelope.id,
                envelope.route,
                BlestError::ResultShape.to_object(options.include_stack),
            )
        }
    }
}

/// Runs the route's chain, applying the route's deadline if it has one.
async fn run_route(
    route: &Route,
    envelope: &RequestEnvelope,
    params: &Object,
    ctx: &mut Context,
) -> (Option<Value>, Option<BlestError>) {
    let chain = run_chain(&envelope.route, route.stages(), params, ctx);
    match route.timeout() {
        Some(limit) => match timeout(limit, chain).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    route = %envelope.route,
                    id = %envelope.id,
                    timeout_ms = limit.as_millis() as u64,
                    "route exceeded its timeout"
                );
                (None, Some(BlestError::Timeout))
            }
        },
        None => chain.await,
    }
}

/// A single pass over the stage chain with one error slot.
async fn run_chain(
    route: &str,
    stages: &[Stage],
    params: &Object,
    ctx: &mut Context,
) -> (Option<Value>, Option<BlestError>) {
    let mut result: Option<Value> = None;
    let mut error: Option<BlestError> = None;

    for stage in stages {
        match stage {
            Stage::Middleware(middleware) if error.is_none() => {
                if let Err(failure) = middleware.call(params, ctx).await {
                    warn!(route, stage = "middleware", %failure, "stage failed");
                    error = Some(failure);
                }
            }
            Stage::Handler(handler) if error.is_none() => {
                match handler.call(params, ctx).await {
                    Ok(value) => result = Some(value),
                    Err(failure) => {
                        warn!(route, stage = "handler", %failure, "stage failed");
                        error = Some(failure);
                    }
                }
            }
            Stage::Afterware(afterware) => {
                let outcome = afterware.call(params, ctx, error.as_ref()).await;
                if let Err(failure) = outcome {
                    warn!(route, stage = "afterware", %failure, "stage failed");
                    if error.is_none() {
                        error = Some(failure);
                    }
                }
            }
            // middleware and handler stages downstream of a captured error
            Stage::Middleware(_) | Stage::Handler(_) => {}
        }
    }

    (result, error)
}
