//! Engine tuning knobs.

/// Options controlling how a batch is executed.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Maximum number of batch items executed concurrently. Clamped to at
    /// least one.
    pub concurrency: usize,
    /// Whether stage-error backtraces are attached to error envelopes.
    /// Defaults to on in debug builds only.
    pub include_stack: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            concurrency: 16,
            include_stack: cfg!(debug_assertions),
        }
    }
}
