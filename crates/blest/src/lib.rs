//! # BLEST
//!
//! **Batch-oriented request dispatch for Rust**
//!
//! BLEST answers a batch of requests in one call. A batch is a JSON array of
//! `[id, route, params?, selector?]` items; the response is an array of
//! `[id, route, result, error]` items correlated by id, in request order.
//!
//! - **Explicit pipelines** - each route is an ordered chain of middleware,
//!   exactly one handler, and afterware, fixed at registration time
//! - **Isolated items** - every batch item runs on its own derived context;
//!   failures never leak into sibling items
//! - **Projection** - a per-item selector trims the result to the fields the
//!   client asked for
//! - **Deadlines** - a per-route timeout turns a runaway handler into a 500
//!   without disturbing the rest of the batch
//!
//! ## Quick Start
//!
//! ```
//! use blest::prelude::*;
//! use serde_json::{json, Value};
//!
//! fn greet<'a>(params: &'a Object, _ctx: &'a mut Context) -> BoxFuture<'a, BlestResult<Value>> {
//!     Box::pin(async move {
//!         let name = params.get("name").and_then(Value::as_str).unwrap_or("world");
//!         Ok(json!({ "greeting": format!("Hello, {name}!") }))
//!     })
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut router = Router::new();
//! router.route("greet", [Stage::handler(greet)]).unwrap();
//!
//! let batch = json!([["req-1", "greet", { "name": "Ada" }]]);
//! let responses = dispatch(&router, &batch, &Context::new()).await.unwrap();
//! assert!(responses[0].result.is_some());
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/blest/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use blest_core as core;

// Re-export registry types
pub use blest_router as router;

// Re-export the dispatch engine
pub use blest_dispatch as dispatch;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use blest::prelude::*;
/// ```
pub mod prelude {
    pub use blest_core::{
        BlestError, BlestResult, Context, ErrorObject, Object, RequestEnvelope, ResponseEnvelope,
        Selector,
    };

    pub use blest_router::{
        Afterware, BoxFuture, ConfigError, Handler, Middleware, Route, RouteConfig, Router,
        RouterOptions, Stage, StageKind,
    };

    pub use blest_dispatch::{dispatch, dispatch_with_options, DispatchOptions};
}
