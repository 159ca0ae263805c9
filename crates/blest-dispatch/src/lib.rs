//! # BLEST Dispatch
//!
//! The batch dispatch engine: validates an inbound batch, executes each item
//! through its route's stage chain with bounded concurrency, and assembles
//! the correlated response array.
//!
//! ## Example
//!
//! ```
//! use blest_core::{BlestResult, Context, Object};
//! use blest_dispatch::dispatch;
//! use blest_router::{BoxFuture, Router, Stage};
//! use serde_json::{json, Value};
//!
//! fn ping<'a>(_params: &'a Object, _ctx: &'a mut Context) -> BoxFuture<'a, BlestResult<Value>> {
//!     Box::pin(async { Ok(json!({ "pong": true })) })
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut router = Router::new();
//! router.route("ping", [Stage::handler(ping)]).unwrap();
//!
//! let batch = json!([["req-1", "ping"]]);
//! let responses = dispatch(&router, &batch, &Context::new()).await.unwrap();
//! assert_eq!(responses[0].result, serde_json::from_value(json!({ "pong": true })).ok());
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/blest-dispatch/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod options;
mod reducer;

pub use engine::{dispatch, dispatch_with_options};
pub use options::DispatchOptions;
