//! The JSON object model used throughout the engine.

use serde_json::Value;

/// An order-preserving string-keyed JSON object.
///
/// Params, handler results, and context entries are all `Object`-shaped.
/// `serde_json` is built with the `preserve_order` feature so keys round-trip
/// in insertion order, which matters for selector projection output and for
/// wire-level test fixtures.
pub type Object = serde_json::Map<String, Value>;
