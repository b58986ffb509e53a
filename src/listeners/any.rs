//! # Global listeners that observe every emission.
//!
//! [`AnyHandler`] receives `(event, args)` for every `emit`/`emit_async`, before
//! any event-specific handler runs. Useful for tracing, auditing and bridging.

use std::fmt;
use std::sync::Arc;

use crate::error::HandlerError;
use crate::events::EventName;

type AnyFn<A> = dyn Fn(&EventName, &A) -> Result<(), HandlerError> + Send + Sync;

/// Callback invoked for every emitted event.
///
/// ## Example
/// ```rust
/// use eventvisor::{AnyHandler, Emitter, EmitterConfig};
///
/// let emitter: Emitter<u32> = Emitter::new(EmitterConfig::default());
/// emitter.on_any(AnyHandler::new(|event, n: &u32| {
///     println!("{event} -> {n}");
///     Ok(())
/// }));
/// ```
pub struct AnyHandler<A> {
    f: Arc<AnyFn<A>>,
}

impl<A> AnyHandler<A> {
    /// Wraps a closure.
    pub fn new(
        f: impl Fn(&EventName, &A) -> Result<(), HandlerError> + Send + Sync + 'static,
    ) -> Self {
        Self { f: Arc::new(f) }
    }

    /// True if both handles point to the same callback.
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }

    pub(crate) fn call(&self, event: &EventName, args: &A) -> Result<(), HandlerError> {
        (self.f)(event, args)
    }
}

impl<A> Clone for AnyHandler<A> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<A> fmt::Debug for AnyHandler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyHandler")
            .field("ptr", &Arc::as_ptr(&self.f).cast::<()>())
            .finish()
    }
}
