//! Per-request context.
//!
//! The [`Context`] is the only mutable state a pipeline sees. The dispatch
//! engine derives a fresh copy from the caller-supplied base context for every
//! batch item, so mutations by one item's middleware are never visible to a
//! sibling item, even within the same batch call.

use crate::envelope::RequestEnvelope;
use crate::value::Object;
use serde_json::Value;

/// A mutable, order-preserving map of per-request state.
///
/// The transport collaborator seeds the base context (typically inbound
/// headers); the engine adds the `request` envelope echo and an arrival
/// `time` when deriving the per-item copy.
///
/// # Example
///
/// ```
/// use blest_core::Context;
/// use serde_json::json;
///
/// let mut ctx = Context::new();
/// ctx.set("user", json!({ "name": "Alice" }));
/// assert_eq!(ctx.get("user"), Some(&json!({ "name": "Alice" })));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: Object,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context from existing entries.
    #[must_use]
    pub fn from_object(entries: Object) -> Self {
        Self { entries }
    }

    /// Returns the value for `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Returns `true` if `key` is set.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the underlying entries.
    #[must_use]
    pub fn entries(&self) -> &Object {
        &self.entries
    }

    /// Derives the per-item context for one batch item.
    ///
    /// Clones the base entries and seeds the `request` envelope echo and the
    /// arrival `time` (Unix seconds). The clone is what isolates sibling
    /// items from each other's mutations.
    #[must_use]
    pub fn derive(&self, envelope: &RequestEnvelope) -> Self {
        let mut derived = self.clone();
        derived.set("request", envelope.echo());
        derived.set("time", Value::from(chrono::Utc::now().timestamp()));
        derived
    }
}
