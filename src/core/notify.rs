//! # Notifier - internal listener-bookkeeping channel.
//!
//! Holds the callbacks registered through `Emitter::on_internal` and delivers
//! [`ListenerNotice`]s to them. Always flat: names are never wildcard-matched and
//! registrations here are not subject to the leak check.
//!
//! ## Rules
//! - Delivery order is registration order.
//! - Callbacks run on a snapshot; the lock is released before any of them runs,
//!   so a callback may register or remove listeners.

use parking_lot::Mutex;

use crate::events::{EventName, InternalEvent, ListenerNotice, NoticeHandler};
use crate::listeners::Handler;

/// Internal handler table.
pub(crate) struct Notifier<A, R> {
    added: Mutex<Vec<NoticeHandler<A, R>>>,
    removed: Mutex<Vec<NoticeHandler<A, R>>>,
}

impl<A, R> Default for Notifier<A, R> {
    fn default() -> Self {
        Self {
            added: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
        }
    }
}

impl<A, R> Notifier<A, R> {
    fn table(&self, kind: InternalEvent) -> &Mutex<Vec<NoticeHandler<A, R>>> {
        match kind {
            InternalEvent::ListenerAdded => &self.added,
            InternalEvent::ListenerRemoved => &self.removed,
        }
    }

    pub fn subscribe(&self, kind: InternalEvent, handler: NoticeHandler<A, R>) {
        self.table(kind).lock().push(handler);
    }

    /// Removes the first registration of `handler`; returns whether one was found.
    pub fn unsubscribe(&self, kind: InternalEvent, handler: &NoticeHandler<A, R>) -> bool {
        let mut table = self.table(kind).lock();
        match table.iter().position(|h| h.same(handler)) {
            Some(pos) => {
                table.remove(pos);
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn len(&self, kind: InternalEvent) -> usize {
        self.table(kind).lock().len()
    }

    /// Delivers one notice to every callback registered for `kind`.
    pub fn notify(&self, kind: InternalEvent, event: &EventName, handler: &Handler<A, R>) {
        let snapshot = self.table(kind).lock().clone();
        if snapshot.is_empty() {
            return;
        }
        let notice = ListenerNotice {
            kind,
            event: event.clone(),
            handler: handler.clone(),
        };
        for callback in &snapshot {
            callback.call(&notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_notify_reaches_only_matching_kind() {
        let notifier: Notifier<u32, ()> = Notifier::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        notifier.subscribe(
            InternalEvent::ListenerAdded,
            NoticeHandler::new(move |n| sink.lock().push((n.kind, n.event.to_string()))),
        );

        let h: Handler<u32> = Handler::new(|_| Ok(()));
        notifier.notify(InternalEvent::ListenerAdded, &EventName::from("a"), &h);
        notifier.notify(InternalEvent::ListenerRemoved, &EventName::from("b"), &h);

        assert_eq!(
            *seen.lock(),
            vec![(InternalEvent::ListenerAdded, "a".to_string())]
        );
    }

    #[test]
    fn test_unsubscribe_by_identity() {
        let notifier: Notifier<u32, ()> = Notifier::default();
        let cb = NoticeHandler::new(|_| {});
        notifier.subscribe(InternalEvent::ListenerRemoved, cb.clone());
        assert_eq!(notifier.len(InternalEvent::ListenerRemoved), 1);
        assert!(!notifier.unsubscribe(InternalEvent::ListenerRemoved, &NoticeHandler::new(|_| {})));
        assert!(notifier.unsubscribe(InternalEvent::ListenerRemoved, &cb));
        assert_eq!(notifier.len(InternalEvent::ListenerRemoved), 0);
    }
}
