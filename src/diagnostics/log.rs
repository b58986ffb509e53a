//! # LogWriter: default diagnostics sink
//!
//! Forwards diagnostics to `tracing`. Installed when no other sink is configured.
//!
//! ## Example output (with a fmt subscriber)
//! ```text
//! WARN eventvisor: possible event emitter leak detected. 11 listeners added. ... event="tick" count=11 max=10
//! ERROR eventvisor: deferred handler failed: error: boom event=tick label="handler_failed"
//! ```

use crate::diagnostics::{Diagnostics, LeakWarning};

/// Diagnostics sink writing through `tracing`.
#[derive(Debug, Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Diagnostics for LogWriter {
    fn on_leak(&self, warning: &LeakWarning) {
        tracing::warn!(
            event = %warning.event,
            count = warning.count,
            max = warning.max,
            "{}",
            warning.message()
        );
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
