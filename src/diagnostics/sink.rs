//! # Diagnostics sink trait.
//!
//! Provides [`Diagnostics`] an extension point receiving advisory reports from the
//! emitter. Nothing reported here interrupts control flow.
//!
//! Reports:
//! - **Leak warnings**: a registration pushed one pattern past the listener limit.
//! - **Detached failures**: a deferred handler started by `emit` failed after `emit`
//!   returned, so there is no caller left to receive the error.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventvisor::{Diagnostics, LeakWarning};
//!
//! #[derive(Default)]
//! struct CountLeaks(AtomicUsize);
//!
//! impl Diagnostics for CountLeaks {
//!     fn on_leak(&self, _warning: &LeakWarning) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//!
//!     fn name(&self) -> &'static str { "count-leaks" }
//! }
//! ```

use crate::diagnostics::leak::LeakWarning;
use crate::error::HandlerError;
use crate::events::EventName;

/// Receiver of advisory reports.
///
/// ### Implementation requirements
/// - Called synchronously from the emitter; keep it cheap.
/// - Must not call back into the emitter that reported.
pub trait Diagnostics: Send + Sync + 'static {
    /// A registration exceeded the per-event listener limit.
    fn on_leak(&self, warning: &LeakWarning);

    /// A detached deferred handler failed.
    ///
    /// Default: logs through `tracing` at error level.
    fn on_detached_failure(&self, event: &EventName, error: &HandlerError) {
        tracing::error!(
            sink = self.name(),
            %event,
            label = error.as_label(),
            "deferred handler failed: {}",
            error.as_message()
        );
    }

    /// Returns the sink name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
