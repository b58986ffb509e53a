//! # Listener: a registered, possibly counted, handler.
//!
//! [`Listener`] is what the registry and the pattern tree store. It wraps the
//! caller's [`Handler`] with:
//! - a unique, monotonically increasing [`ListenerId`] (registration order);
//! - the event pattern it was registered under;
//! - [`ListenOptions`] (defer policy, promisify);
//! - an optional [`Budget`] (`once` / `limited_times`).
//!
//! ## Counting
//! ```text
//! admit() ─► remaining = None      → Admission::Fire
//!         ├► remaining 3 → 2       → Admission::Fire
//!         ├► remaining 1 → 0       → Admission::FireLast   (caller unregisters, then invokes)
//!         └► remaining 0           → Admission::Exhausted  (already spent, skip)
//! ```
//! The decrement is a single atomic update, so a listener captured by several
//! in-flight emissions still fires at most `times` times in total.
//!
//! One counted registration over several names produces one listener per name,
//! all sharing a single [`Budget`]. The budget records every member so the last
//! invocation can unregister all of them.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::core::Identity;
use crate::events::EventName;
use crate::listeners::handler::{Handler, Invocation};
use crate::policies::ListenOptions;

/// Global sequence counter for listener ids.
static LISTENER_SEQ: AtomicU64 = AtomicU64::new(1);

/// Unique id of one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(LISTENER_SEQ.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw sequence value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Decision taken before each invocation of a counted listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// Invoke; more invocations remain (or the listener is unlimited).
    Fire,
    /// Invoke; this was the last one, unregister first.
    FireLast,
    /// Do not invoke; the budget is already spent.
    Exhausted,
}

/// Invocation budget shared by the listeners of one counted registration.
pub(crate) struct Budget {
    remaining: AtomicUsize,
    members: Mutex<Vec<(EventName, ListenerId)>>,
}

impl Budget {
    pub(crate) fn new(times: NonZeroUsize) -> Arc<Self> {
        Arc::new(Self {
            remaining: AtomicUsize::new(times.get()),
            members: Mutex::new(Vec::new()),
        })
    }

    fn enroll(&self, event: &EventName, id: ListenerId) {
        self.members.lock().push((event.clone(), id));
    }

    fn admit(&self) -> Admission {
        match self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        {
            Ok(1) => Admission::FireLast,
            Ok(_) => Admission::Fire,
            Err(_) => Admission::Exhausted,
        }
    }
}

/// Registered handler plus its registration metadata.
pub(crate) struct Listener<A, R> {
    id: ListenerId,
    event: EventName,
    handler: Handler<A, R>,
    options: ListenOptions,
    budget: Option<Arc<Budget>>,
}

impl<A, R> Listener<A, R> {
    /// Wraps a handler. `budget = None` means unlimited; a budget enrolls the
    /// new listener as one of its members.
    pub(crate) fn new(
        event: EventName,
        handler: Handler<A, R>,
        options: ListenOptions,
        budget: Option<Arc<Budget>>,
    ) -> Arc<Self> {
        let id = ListenerId::next();
        if let Some(budget) = &budget {
            budget.enroll(&event, id);
        }
        Arc::new(Self {
            id,
            event,
            handler,
            options,
            budget,
        })
    }

    pub(crate) fn id(&self) -> ListenerId {
        self.id
    }

    pub(crate) fn event(&self) -> &EventName {
        &self.event
    }

    pub(crate) fn handler(&self) -> &Handler<A, R> {
        &self.handler
    }

    /// True if this listener wraps `handler` (identity of the original).
    pub(crate) fn wraps(&self, handler: &Handler<A, R>) -> bool {
        self.handler.same(handler)
    }

    /// True if an invocation can only complete on a tokio runtime.
    ///
    /// A promisified synchronous handler still runs inline, so it does not count.
    pub(crate) fn needs_runtime(&self) -> bool {
        self.handler.is_async() || self.options.defer.is_deferred()
    }

    /// Consumes one invocation from the (possibly shared) budget.
    pub(crate) fn admit(&self) -> Admission {
        match &self.budget {
            Some(budget) => budget.admit(),
            None => Admission::Fire,
        }
    }

    /// Remaining invocations, `None` for unlimited listeners.
    pub(crate) fn remaining(&self) -> Option<usize> {
        self.budget
            .as_ref()
            .map(|b| b.remaining.load(Ordering::Acquire))
    }

    /// Every registration sharing this listener's budget, itself included.
    pub(crate) fn members(&self) -> Vec<(EventName, ListenerId)> {
        match &self.budget {
            Some(budget) => budget.members.lock().clone(),
            None => vec![(self.event.clone(), self.id)],
        }
    }
}

impl<A, R> Listener<A, R>
where
    A: Clone + Send + Sync + 'static,
    R: Send + 'static,
{
    pub(crate) fn invoke(&self, args: &A) -> Invocation<R> {
        self.handler.invoke(args, self.options)
    }
}

impl<A, R> Identity for Arc<Listener<A, R>> {
    fn identity(&self) -> u64 {
        self.id.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listener(times: Option<usize>) -> Arc<Listener<(), ()>> {
        Listener::new(
            EventName::from("a"),
            Handler::new(|_| Ok(())),
            ListenOptions::default(),
            times.and_then(NonZeroUsize::new).map(Budget::new),
        )
    }

    #[test]
    fn test_unlimited_always_fires() {
        let l = listener(None);
        for _ in 0..100 {
            assert_eq!(l.admit(), Admission::Fire);
        }
        assert_eq!(l.remaining(), None);
    }

    #[test]
    fn test_limited_fires_exactly_times() {
        let l = listener(Some(3));
        assert_eq!(l.admit(), Admission::Fire);
        assert_eq!(l.admit(), Admission::Fire);
        assert_eq!(l.admit(), Admission::FireLast);
        assert_eq!(l.admit(), Admission::Exhausted);
        assert_eq!(l.remaining(), Some(0));
    }

    #[test]
    fn test_shared_budget_spans_every_member() {
        let budget = Budget::new(NonZeroUsize::new(2).unwrap());
        let h: Handler<()> = Handler::new(|_| Ok(()));
        let a = Listener::new(
            EventName::from("a"),
            h.clone(),
            ListenOptions::default(),
            Some(Arc::clone(&budget)),
        );
        let b = Listener::new(EventName::from("b"), h, ListenOptions::default(), Some(budget));

        assert_eq!(a.admit(), Admission::Fire);
        assert_eq!(b.remaining(), Some(1));
        assert_eq!(b.admit(), Admission::FireLast);
        assert_eq!(a.admit(), Admission::Exhausted);

        let members = a.members();
        assert_eq!(members, b.members());
        assert_eq!(
            members,
            vec![(EventName::from("a"), a.id()), (EventName::from("b"), b.id())]
        );
    }

    #[test]
    fn test_unlimited_listener_is_its_only_member() {
        let l = listener(None);
        assert_eq!(l.members(), vec![(EventName::from("a"), l.id())]);
    }

    #[test]
    fn test_needs_runtime_only_for_async_or_deferred() {
        let h: Handler<()> = Handler::new(|_| Ok(()));
        let promisified = Listener::new(
            EventName::from("a"),
            h.clone(),
            ListenOptions::default().with_promisify(true),
            None,
        );
        assert!(!promisified.needs_runtime());

        let deferred = Listener::new(
            EventName::from("a"),
            h,
            ListenOptions::default().with_defer(crate::policies::DeferPolicy::NextTick),
            None,
        );
        assert!(deferred.needs_runtime());

        let async_body: Handler<(), ()> =
            Handler::from_async(|_| async { Ok::<_, crate::HandlerError>(()) });
        let l = Listener::new(EventName::from("a"), async_body, ListenOptions::default(), None);
        assert!(l.needs_runtime());
    }

    #[test]
    fn test_ids_increase_with_registration_order() {
        let first = listener(None);
        let second = listener(None);
        assert!(first.id() < second.id());
        assert!(first.identity() < second.identity());
    }

    #[test]
    fn test_wraps_checks_original_identity() {
        let h: Handler<()> = Handler::new(|_| Ok(()));
        let l = Listener::new(EventName::from("a"), h.clone(), ListenOptions::default(), None);
        assert!(l.wraps(&h));
        assert!(!l.wraps(&Handler::new(|_| Ok(()))));
        assert_eq!(l.event().as_str(), "a");
        assert!(l.handler().same(&h));
    }
}
