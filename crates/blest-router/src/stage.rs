//! The pipeline stage model.
//!
//! A route's pipeline is an ordered chain of three stage kinds:
//!
//! - **Middleware** runs before the handler, may mutate the context, and
//!   produces no result - the type system enforces this.
//! - **Handler** (exactly one per route) produces the result. It returns a
//!   raw [`Value`] rather than an object so the engine can report a
//!   non-object result as a runtime error instead of silently erasing it.
//! - **Afterware** runs after the handler or after a failure, receiving the
//!   captured error; it is the hook by which logging and metrics observe
//!   failed requests.
//!
//! The stage kind is declared explicitly via the [`Stage`] constructors;
//! nothing is inferred from a function's shape.

use blest_core::{BlestError, BlestResult, Context, Object};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future, the return type of object-safe stage invocations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A stage that runs before the handler and may mutate the context.
pub trait Middleware: Send + Sync + 'static {
    /// Invokes the middleware with the item's params and mutable context.
    fn call<'a>(
        &'a self,
        params: &'a Object,
        ctx: &'a mut Context,
    ) -> BoxFuture<'a, BlestResult<()>>;
}

impl<F> Middleware for F
where
    F: for<'a> Fn(&'a Object, &'a mut Context) -> BoxFuture<'a, BlestResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        params: &'a Object,
        ctx: &'a mut Context,
    ) -> BoxFuture<'a, BlestResult<()>> {
        (self)(params, ctx)
    }
}

/// The stage that produces the route's result.
pub trait Handler: Send + Sync + 'static {
    /// Invokes the handler. The returned value must be a JSON object; the
    /// engine converts anything else into a 500 error.
    fn call<'a>(
        &'a self,
        params: &'a Object,
        ctx: &'a mut Context,
    ) -> BoxFuture<'a, BlestResult<Value>>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(&'a Object, &'a mut Context) -> BoxFuture<'a, BlestResult<Value>>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        params: &'a Object,
        ctx: &'a mut Context,
    ) -> BoxFuture<'a, BlestResult<Value>> {
        (self)(params, ctx)
    }
}

/// A stage that runs after the handler, or after a failure.
///
/// Afterware is never skipped by an upstream failure; on failure it receives
/// the captured error.
pub trait Afterware: Send + Sync + 'static {
    /// Invokes the afterware with the captured error, if any.
    fn call<'a>(
        &'a self,
        params: &'a Object,
        ctx: &'a mut Context,
        error: Option<&'a BlestError>,
    ) -> BoxFuture<'a, BlestResult<()>>;
}

impl<F> Afterware for F
where
    F: for<'a> Fn(&'a Object, &'a mut Context, Option<&'a BlestError>) -> BoxFuture<'a, BlestResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        params: &'a Object,
        ctx: &'a mut Context,
        error: Option<&'a BlestError>,
    ) -> BoxFuture<'a, BlestResult<()>> {
        (self)(params, ctx, error)
    }
}

/// One unit of a route's pipeline, tagged with its kind.
#[derive(Clone)]
pub enum Stage {
    /// Runs before the handler; may mutate the context.
    Middleware(Arc<dyn Middleware>),
    /// Produces the result; exactly one per route.
    Handler(Arc<dyn Handler>),
    /// Runs after the handler or after an error; side effects only.
    Afterware(Arc<dyn Afterware>),
}

impl Stage {
    /// Wraps a middleware implementation as a stage.
    #[must_use]
    pub fn middleware(middleware: impl Middleware) -> Self {
        Self::Middleware(Arc::new(middleware))
    }

    /// Wraps a handler implementation as a stage.
    #[must_use]
    pub fn handler(handler: impl Handler) -> Self {
        Self::Handler(Arc::new(handler))
    }

    /// Wraps an afterware implementation as a stage.
    #[must_use]
    pub fn afterware(afterware: impl Afterware) -> Self {
        Self::Afterware(Arc::new(afterware))
    }

    /// Returns this stage's kind.
    #[must_use]
    pub const fn kind(&self) -> StageKind {
        match self {
            Self::Middleware(_) => StageKind::Middleware,
            Self::Handler(_) => StageKind::Handler,
            Self::Afterware(_) => StageKind::Afterware,
        }
    }

    /// Returns `true` if this is the handler stage.
    #[must_use]
    pub const fn is_handler(&self) -> bool {
        matches!(self, Self::Handler(_))
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind().name())
    }
}

/// The three stage kinds, for logging and registration checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Pre-handler stage.
    Middleware,
    /// Result-producing stage.
    Handler,
    /// Post-handler / post-error stage.
    Afterware,
}

impl StageKind {
    /// Returns the kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Middleware => "middleware",
            Self::Handler => "handler",
            Self::Afterware => "afterware",
        }
    }
}
