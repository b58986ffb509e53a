//! # Internal notifications about listener bookkeeping.
//!
//! The emitter announces two kinds of changes on a channel separate from user events:
//! - [`InternalEvent::ListenerAdded`] right before a listener is stored;
//! - [`InternalEvent::ListenerRemoved`] right after a listener is removed.
//!
//! Each notice carries the event pattern and the original [`Handler`].
//! Notices are delivered only when enabled in [`EmitterConfig`](crate::EmitterConfig).

use std::fmt;
use std::sync::Arc;

use crate::events::EventName;
use crate::events::name::{NEW_LISTENER, REMOVE_LISTENER};
use crate::listeners::Handler;

/// Classification of internal notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InternalEvent {
    /// A listener is about to be registered.
    ListenerAdded,
    /// A listener was removed (explicitly or after its last invocation).
    ListenerRemoved,
}

impl InternalEvent {
    /// Reserved event name for this notification.
    pub fn as_str(&self) -> &'static str {
        match self {
            InternalEvent::ListenerAdded => NEW_LISTENER,
            InternalEvent::ListenerRemoved => REMOVE_LISTENER,
        }
    }

    /// Maps a reserved event name back to its kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            NEW_LISTENER => Some(InternalEvent::ListenerAdded),
            REMOVE_LISTENER => Some(InternalEvent::ListenerRemoved),
            _ => None,
        }
    }
}

/// Payload of an internal notification.
pub struct ListenerNotice<A, R = ()> {
    /// What happened.
    pub kind: InternalEvent,
    /// Event pattern the listener is (or was) registered under.
    pub event: EventName,
    /// Original handler supplied by the caller.
    pub handler: Handler<A, R>,
}

impl<A, R> fmt::Debug for ListenerNotice<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerNotice")
            .field("kind", &self.kind)
            .field("event", &self.event)
            .field("handler", &self.handler)
            .finish()
    }
}

type NoticeFn<A, R> = dyn Fn(&ListenerNotice<A, R>) + Send + Sync;

/// Plain callback registered on the internal channel.
///
/// Identity is the allocation: clones compare equal, separately built handlers don't.
pub struct NoticeHandler<A, R = ()> {
    f: Arc<NoticeFn<A, R>>,
}

impl<A, R> NoticeHandler<A, R> {
    /// Wraps a closure.
    pub fn new(f: impl Fn(&ListenerNotice<A, R>) + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }

    /// True if both handles point to the same callback.
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }

    pub(crate) fn call(&self, notice: &ListenerNotice<A, R>) {
        (self.f)(notice)
    }
}

impl<A, R> Clone for NoticeHandler<A, R> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<A, R> fmt::Debug for NoticeHandler<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoticeHandler")
            .field("ptr", &Arc::as_ptr(&self.f).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrips_through_reserved_name() {
        for kind in [InternalEvent::ListenerAdded, InternalEvent::ListenerRemoved] {
            assert_eq!(InternalEvent::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(InternalEvent::from_name("error"), None);
    }

    #[test]
    fn test_notice_handler_identity() {
        let a: NoticeHandler<()> = NoticeHandler::new(|_| {});
        let b: NoticeHandler<()> = NoticeHandler::new(|_| {});
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
    }
}
