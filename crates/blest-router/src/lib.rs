//! # BLEST Router
//!
//! Route registry and pipeline stage model for the BLEST batch dispatch
//! engine.
//!
//! A [`Router`] owns named routes. Each route carries an ordered chain of
//! [`Stage`]s - default middleware, the route's declared stages, default
//! afterware - fixed at registration time. Registries compose via
//! [`Router::merge`] and [`Router::namespace`].
//!
//! Stage kinds are stated explicitly at registration through the [`Stage`]
//! sum type; there is no inference from function shape. Middleware cannot
//! produce a result by construction - its future resolves to `()`.
//!
//! ## Example
//!
//! ```
//! use blest_core::{BlestResult, Context, Object};
//! use blest_router::{BoxFuture, Router, Stage};
//! use serde_json::{json, Value};
//!
//! fn greet<'a>(params: &'a Object, _ctx: &'a mut Context) -> BoxFuture<'a, BlestResult<Value>> {
//!     Box::pin(async move {
//!         let name = params.get("name").and_then(Value::as_str).unwrap_or("world");
//!         Ok(json!({ "greeting": format!("Hello, {name}!") }))
//!     })
//! }
//!
//! let mut router = Router::new();
//! router.route("greet", [Stage::handler(greet)]).unwrap();
//! assert!(router.resolve("greet").is_some());
//! ```

#![doc(html_root_url = "https://docs.rs/blest-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod router;
mod stage;
mod validate;

pub use error::ConfigError;
pub use router::{Route, RouteConfig, Router, RouterOptions};
pub use stage::{Afterware, BoxFuture, Handler, Middleware, Stage, StageKind};
pub use validate::{validate_route_name, validate_system_route_name, RouteNameError};
