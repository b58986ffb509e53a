use std::fmt;
use std::sync::Weak;

use crate::core::emitter::Inner;
use crate::events::EventName;
use crate::listeners::{Handler, ListenerId};

/// Handle to the registrations made by one `on_with` / `once_with` /
/// `limited_times_with` call.
///
/// Holds a weak reference: it never keeps the emitter alive, and removing through a
/// handle whose emitter is gone is a no-op.
///
/// ## Example
/// ```rust
/// use eventvisor::{Emitter, EmitterConfig, Handler, ListenOptions};
///
/// let emitter: Emitter<u32> = Emitter::new(EmitterConfig::default());
/// let sub = emitter
///     .on_with(["a", "b"], Handler::new(|_| Ok(())), ListenOptions::default())
///     .unwrap();
///
/// assert_eq!(sub.events().len(), 2);
/// assert_eq!(sub.remove(), 2);
/// assert!(!emitter.has_listeners("a"));
/// ```
pub struct Subscription<A, R = ()> {
    inner: Weak<Inner<A, R>>,
    entries: Vec<(EventName, ListenerId)>,
    handler: Handler<A, R>,
}

impl<A, R> Subscription<A, R> {
    pub(crate) fn new(
        inner: Weak<Inner<A, R>>,
        entries: Vec<(EventName, ListenerId)>,
        handler: Handler<A, R>,
    ) -> Self {
        Self {
            inner,
            entries,
            handler,
        }
    }

    /// Names (patterns) this subscription registered under, in registration order.
    pub fn events(&self) -> Vec<EventName> {
        self.entries.iter().map(|(event, _)| event.clone()).collect()
    }

    /// Ids of the individual registrations.
    pub fn ids(&self) -> Vec<ListenerId> {
        self.entries.iter().map(|(_, id)| *id).collect()
    }

    /// The registered handler.
    pub fn handler(&self) -> &Handler<A, R> {
        &self.handler
    }

    /// Removes this subscription's registrations, leaving other registrations of
    /// the same handler in place.
    ///
    /// Returns how many were still registered (`0` once spent, removed or if the
    /// emitter was dropped).
    pub fn remove(&self) -> usize {
        let Some(inner) = self.inner.upgrade() else {
            return 0;
        };
        self.entries
            .iter()
            .map(|(event, id)| inner.remove_by_id(event, *id))
            .sum()
    }
}

impl<A, R> fmt::Debug for Subscription<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("entries", &self.entries)
            .field("handler", &self.handler)
            .finish()
    }
}
