//! # Emitter: registration and dispatch.
//!
//! [`Emitter`] owns the listener storage (flat [`Registry`] or wildcard
//! [`PatternTree`]), the global listeners, the internal notification channel and the
//! diagnostics sink. Handles are cheap clones of one shared state.
//!
//! ## Architecture
//! ```text
//! on / once / limited_times ──► validate ──► ListenerAdded notice ──► Store::insert ──► leak check
//!                                                                                         │
//!                                                                            Diagnostics::on_leak
//!
//! emit(event, args)
//!   1. AnyHandler(event, &args)            (every emission)
//!   2. catch-all Handler(&args)            (every emission)
//!   3. Store::resolve(event)               (registry lookup or tree match)
//!   4. nothing at all + "error"            → Uncaught / UnspecifiedError (unless suppressed)
//!   5. for each listener: admit → invoke
//!        Ready(Err)  → EmitterError::Handler
//!        Pending(f)  → tokio::spawn(f), failure → Diagnostics::on_detached_failure
//!
//! emit_async(event, args)
//!   same steps, every outcome collected → try_join_all → Vec<R>
//! ```
//!
//! ## Rules
//! - No lock is held while user code runs: handler sets are snapshots, so handlers
//!   may call `on`/`off`/`emit` on the same emitter.
//! - A resolved set is fully invoked; removals during dispatch only affect later emissions.
//! - A counted listener whose budget runs out is unregistered before its last invocation.

use std::any::Any;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use parking_lot::Mutex;
use tokio::runtime::Handle;

use crate::core::builder::EmitterBuilder;
use crate::core::config::{EmitterConfig, threshold};
use crate::core::notify::Notifier;
use crate::core::registry::Registry;
use crate::core::subscription::Subscription;
use crate::core::tree::PatternTree;
use crate::diagnostics::{Diagnostics, LeakWarning};
use crate::error::{EmitterError, HandlerError};
use crate::events::{DEEP_WILDCARD, EventName, InternalEvent, NoticeHandler, Targets};
use crate::listeners::{Admission, AnyHandler, Budget, Handler, Invocation, Listener, ListenerId};
use crate::policies::ListenOptions;

type Entry<A, R> = Arc<Listener<A, R>>;

/// Listener storage, chosen once from `EmitterConfig::wildcard`.
enum Store<A, R> {
    Flat(Registry<Entry<A, R>>),
    Tree(PatternTree<Entry<A, R>>),
}

impl<A, R> Store<A, R> {
    fn insert(&mut self, listener: Entry<A, R>, delimiter: &str) -> usize {
        let event = listener.event().clone();
        match self {
            Store::Flat(registry) => registry.insert(&event, listener),
            Store::Tree(tree) => tree.insert(&event.segments(delimiter), listener),
        }
    }

    fn remove_where(
        &mut self,
        pattern: &EventName,
        delimiter: &str,
        pred: impl FnMut(&Entry<A, R>) -> bool,
    ) -> Vec<Entry<A, R>> {
        match self {
            Store::Flat(registry) => registry.remove_where(pattern, pred),
            Store::Tree(tree) => tree.remove_where(&pattern.segments(delimiter), pred),
        }
    }

    fn resolve(&self, event: &EventName, delimiter: &str) -> Vec<Entry<A, R>> {
        match self {
            Store::Flat(registry) => registry.get(event),
            Store::Tree(tree) => tree.matches(&event.segments(delimiter)),
        }
    }

    /// Everything stored under `pattern` (every bag it matches in wildcard mode).
    fn clear(&mut self, pattern: &EventName, delimiter: &str) -> Vec<Entry<A, R>> {
        match self {
            Store::Flat(registry) => registry.clear(pattern),
            Store::Tree(tree) => tree.remove_where(&pattern.segments(delimiter), |_| true),
        }
    }

    fn clear_all(&mut self) -> Vec<Entry<A, R>> {
        match self {
            Store::Flat(registry) => registry.clear_all(),
            Store::Tree(tree) => tree.clear(),
        }
    }

    fn names(&self) -> Vec<EventName> {
        match self {
            Store::Flat(registry) => registry.names(),
            Store::Tree(tree) => {
                let mut names: Vec<EventName> =
                    tree.items().iter().map(|l| l.event().clone()).collect();
                names.sort();
                names.dedup();
                names
            }
        }
    }
}

/// Rejects empty target lists, empty names and reserved names.
fn validate(targets: &Targets) -> Result<(), EmitterError> {
    if targets.is_empty() {
        return Err(EmitterError::InvalidEvent {
            event: String::new(),
        });
    }
    for name in targets {
        if name.as_str().is_empty() {
            return Err(EmitterError::InvalidEvent {
                event: name.to_string(),
            });
        }
        if name.is_reserved() {
            return Err(EmitterError::ReservedEvent {
                event: name.to_string(),
            });
        }
    }
    Ok(())
}

/// State shared by every clone of an [`Emitter`].
pub(crate) struct Inner<A, R> {
    cfg: EmitterConfig,
    max_listeners: AtomicUsize,
    store: Mutex<Store<A, R>>,
    any: Mutex<Vec<AnyHandler<A>>>,
    catch_all: Mutex<Vec<Entry<A, R>>>,
    notifier: Notifier<A, R>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<A, R> Inner<A, R> {
    fn register(
        &self,
        targets: &Targets,
        handler: &Handler<A, R>,
        options: ListenOptions,
        times: Option<NonZeroUsize>,
    ) -> Result<Vec<(EventName, ListenerId)>, EmitterError> {
        validate(targets)?;

        // Every member joins the budget before any of them becomes reachable.
        let budget = times.map(Budget::new);
        let listeners: Vec<_> = targets
            .into_iter()
            .map(|name| Listener::new(name.clone(), handler.clone(), options, budget.clone()))
            .collect();

        let mut entries = Vec::with_capacity(listeners.len());
        for listener in listeners {
            let name = listener.event().clone();
            if self.cfg.notify_new_listener {
                self.notifier
                    .notify(InternalEvent::ListenerAdded, &name, handler);
            }

            let id = listener.id();
            let count = self.store.lock().insert(listener, &self.cfg.delimiter);
            tracing::debug!(event = %name, listener = id.get(), count, "listener registered");

            self.check_leak(&name, count);
            entries.push((name, id));
        }
        Ok(entries)
    }

    fn check_leak(&self, event: &EventName, count: usize) {
        match threshold(self.max_listeners.load(Ordering::Relaxed)) {
            Some(max) if count > max => self.diagnostics.on_leak(&LeakWarning {
                event: event.clone(),
                count,
                max,
                detailed: self.cfg.detailed_leak_warnings,
            }),
            _ => {}
        }
    }

    fn resolve(&self, event: &EventName) -> Vec<Entry<A, R>> {
        self.store.lock().resolve(event, &self.cfg.delimiter)
    }

    /// Removes matching listeners under `pattern` and announces each removal.
    fn remove_where(
        &self,
        pattern: &EventName,
        pred: impl FnMut(&Entry<A, R>) -> bool,
    ) -> usize {
        let removed = self
            .store
            .lock()
            .remove_where(pattern, &self.cfg.delimiter, pred);
        if self.cfg.notify_remove_listener {
            for listener in &removed {
                self.notifier.notify(
                    InternalEvent::ListenerRemoved,
                    listener.event(),
                    listener.handler(),
                );
            }
        }
        removed.len()
    }

    /// Removes the single registration `id` made under `pattern`.
    pub(crate) fn remove_by_id(&self, pattern: &EventName, id: ListenerId) -> usize {
        let removed = self.remove_where(pattern, |l| l.id() == id);
        if removed > 0 {
            tracing::debug!(event = %pattern, listener = id.get(), "listener removed");
        }
        removed
    }

    /// Failure for an `error` event nobody listens to.
    fn check_unhandled(&self, event: &EventName, args: &A) -> Result<(), EmitterError>
    where
        A: 'static,
    {
        if !event.is_error() || self.cfg.suppress_errors {
            return Ok(());
        }
        match (args as &dyn Any).downcast_ref::<HandlerError>() {
            Some(error) => Err(EmitterError::Uncaught {
                error: error.clone(),
            }),
            None => Err(EmitterError::UnspecifiedError),
        }
    }
}

impl<A, R> Inner<A, R>
where
    A: Clone + Send + Sync + 'static,
    R: Send + 'static,
{
    /// Admits and invokes one listener; `None` if its budget is already spent.
    fn fire(&self, listener: &Entry<A, R>, args: &A) -> Option<Invocation<R>> {
        match listener.admit() {
            Admission::Exhausted => None,
            Admission::Fire => {
                if let Some(remaining) = listener.remaining() {
                    tracing::debug!(
                        event = %listener.event(),
                        listener = listener.id().get(),
                        remaining,
                        "counted listener fired"
                    );
                }
                Some(listener.invoke(args))
            }
            Admission::FireLast => {
                for (event, id) in listener.members() {
                    self.remove_by_id(&event, id);
                }
                Some(listener.invoke(args))
            }
        }
    }

    /// Runs a pending invocation in the background on the ambient runtime.
    fn detach(
        &self,
        event: &EventName,
        fut: BoxFuture<'static, Result<R, HandlerError>>,
    ) -> Result<(), EmitterError> {
        let runtime = Handle::try_current().map_err(|_| EmitterError::NoRuntime {
            event: event.clone(),
        })?;
        let diagnostics = Arc::clone(&self.diagnostics);
        let event = event.clone();
        runtime.spawn(async move {
            if let Err(error) = fut.await {
                diagnostics.on_detached_failure(&event, &error);
            }
        });
        Ok(())
    }

    /// Fire-and-forget dispatch of one listener; `Ok(true)` if it ran.
    fn dispatch(
        &self,
        event: &EventName,
        listener: &Entry<A, R>,
        args: &A,
    ) -> Result<bool, EmitterError> {
        let runtime_bound = listener.needs_runtime();
        if runtime_bound && Handle::try_current().is_err() {
            return Err(EmitterError::NoRuntime {
                event: event.clone(),
            });
        }
        let Some(invocation) = self.fire(listener, args) else {
            return Ok(false);
        };
        match invocation {
            Invocation::Ready(Ok(_)) => {}
            Invocation::Ready(Err(error)) => {
                return Err(EmitterError::Handler {
                    event: event.clone(),
                    error,
                });
            }
            // Promisified sync handler: it already ran, only the outcome is wrapped.
            Invocation::Pending(mut fut) if !runtime_bound => match (&mut fut).now_or_never() {
                Some(Ok(_)) => {}
                Some(Err(error)) => self.diagnostics.on_detached_failure(event, &error),
                None => self.detach(event, fut)?,
            },
            Invocation::Pending(fut) => self.detach(event, fut)?,
        }
        Ok(true)
    }
}

/// Typed in-process event emitter.
///
/// `A` is the argument payload delivered to handlers, `R` what handlers return
/// (collected by [`Emitter::emit_async`]).
///
/// ## Example
/// ```rust
/// use eventvisor::{Emitter, EmitterConfig, Handler};
///
/// let emitter: Emitter<String> = Emitter::new(EmitterConfig::wildcard());
/// emitter
///     .on("orders.*", Handler::new(|id: &String| {
///         println!("order event for {id}");
///         Ok(())
///     }))
///     .unwrap();
///
/// assert!(emitter.emit("orders.created", "o-1".to_string()).unwrap());
/// assert!(!emitter.emit("orders.created.late", "o-2".to_string()).unwrap());
/// ```
pub struct Emitter<A, R = ()> {
    inner: Arc<Inner<A, R>>,
}

impl<A, R> Emitter<A, R> {
    /// Creates an emitter with the default diagnostics sink.
    ///
    /// Use [`EmitterBuilder`] to inject a custom [`Diagnostics`] implementation.
    pub fn new(cfg: EmitterConfig) -> Self {
        EmitterBuilder::new(cfg).build()
    }

    pub(crate) fn with_parts(cfg: EmitterConfig, diagnostics: Arc<dyn Diagnostics>) -> Self {
        let store = if cfg.wildcard {
            Store::Tree(PatternTree::default())
        } else {
            Store::Flat(Registry::default())
        };
        Self {
            inner: Arc::new(Inner {
                max_listeners: AtomicUsize::new(cfg.max_listeners),
                cfg,
                store: Mutex::new(store),
                any: Mutex::new(Vec::new()),
                catch_all: Mutex::new(Vec::new()),
                notifier: Notifier::default(),
                diagnostics,
            }),
        }
    }

    /// Configuration this emitter was built with.
    pub fn config(&self) -> &EmitterConfig {
        &self.inner.cfg
    }

    /// Current leak-warning threshold (`0` = disabled).
    pub fn max_listeners(&self) -> usize {
        self.inner.max_listeners.load(Ordering::Relaxed)
    }

    /// Changes the leak-warning threshold for subsequent registrations.
    pub fn set_max_listeners(&self, max: usize) -> &Self {
        self.inner.max_listeners.store(max, Ordering::Relaxed);
        self
    }

    /// Registers an internal bookkeeping callback.
    ///
    /// Notices are only delivered when the matching `notify_*` flag is set in
    /// [`EmitterConfig`].
    pub fn on_internal(&self, kind: InternalEvent, handler: NoticeHandler<A, R>) -> &Self {
        self.inner.notifier.subscribe(kind, handler);
        self
    }

    /// Removes an internal bookkeeping callback; returns whether it was registered.
    pub fn off_internal(&self, kind: InternalEvent, handler: &NoticeHandler<A, R>) -> bool {
        self.inner.notifier.unsubscribe(kind, handler)
    }

    /// Adds a listener that observes every emission with `(event, args)`.
    pub fn on_any(&self, handler: AnyHandler<A>) -> &Self {
        self.inner.any.lock().push(handler);
        self
    }

    /// Removes every registration of an any-listener.
    pub fn off_any(&self, handler: &AnyHandler<A>) -> bool {
        let mut any = self.inner.any.lock();
        let before = any.len();
        any.retain(|h| !h.same(handler));
        any.len() != before
    }

    /// Adds a handler invoked with the arguments of every emission.
    pub fn on_catch_all(&self, handler: Handler<A, R>) -> &Self {
        let listener = Listener::new(
            EventName::from(DEEP_WILDCARD),
            handler,
            ListenOptions::default(),
            None,
        );
        self.inner.catch_all.lock().push(listener);
        self
    }

    /// Removes every catch-all registration of `handler`.
    pub fn off_catch_all(&self, handler: &Handler<A, R>) -> bool {
        let mut catch_all = self.inner.catch_all.lock();
        let before = catch_all.len();
        catch_all.retain(|l| !l.wraps(handler));
        catch_all.len() != before
    }

    /// Removes every listener stored under `event` without sending notifications.
    ///
    /// In wildcard mode this clears every bag the pattern matches. Returns the
    /// number of removed listeners.
    pub fn remove_listeners(&self, event: impl Into<EventName>) -> usize {
        let event = event.into();
        let inner = &self.inner;
        let removed = inner
            .store
            .lock()
            .clear(&event, &inner.cfg.delimiter)
            .len();
        tracing::debug!(event = %event, removed, "listeners cleared");
        removed
    }

    /// Removes every listener, catch-all and any-listener without sending
    /// notifications. Internal callbacks stay.
    ///
    /// Returns the number of removed event and catch-all listeners.
    pub fn remove_all_listeners(&self) -> usize {
        let inner = &self.inner;
        let stored = inner.store.lock().clear_all().len();
        inner.any.lock().clear();
        let global = std::mem::take(&mut *inner.catch_all.lock()).len();
        let removed = stored + global;
        tracing::debug!(removed, "all listeners cleared");
        removed
    }

    /// Handlers that an emission of `event` would reach, in invocation order.
    pub fn listeners(&self, event: impl Into<EventName>) -> Vec<Handler<A, R>> {
        self.inner
            .resolve(&event.into())
            .iter()
            .map(|l| l.handler().clone())
            .collect()
    }

    /// Number of listeners an emission of `event` would reach.
    pub fn listener_count(&self, event: impl Into<EventName>) -> usize {
        self.inner.resolve(&event.into()).len()
    }

    /// True if an emission of `event` would reach at least one listener.
    pub fn has_listeners(&self, event: impl Into<EventName>) -> bool {
        self.listener_count(event) > 0
    }

    /// Registered names (patterns in wildcard mode), sorted.
    pub fn event_names(&self) -> Vec<EventName> {
        self.inner.store.lock().names()
    }
}

impl<A, R> Emitter<A, R>
where
    A: Clone + Send + Sync + 'static,
    R: Send + 'static,
{
    fn subscribe(
        &self,
        targets: Targets,
        handler: Handler<A, R>,
        options: ListenOptions,
        times: Option<NonZeroUsize>,
    ) -> Result<Subscription<A, R>, EmitterError> {
        let entries = self.inner.register(&targets, &handler, options, times)?;
        Ok(Subscription::new(Arc::downgrade(&self.inner), entries, handler))
    }

    /// Registers `handler` for every name in `targets`.
    ///
    /// # Errors
    /// - [`EmitterError::InvalidEvent`] for an empty name or empty target list
    /// - [`EmitterError::ReservedEvent`] for `newListener` / `removeListener`
    pub fn on(
        &self,
        targets: impl Into<Targets>,
        handler: Handler<A, R>,
    ) -> Result<&Self, EmitterError> {
        self.subscribe(targets.into(), handler, ListenOptions::default(), None)?;
        Ok(self)
    }

    /// Registers `handler` with options and returns a [`Subscription`] for it.
    pub fn on_with(
        &self,
        targets: impl Into<Targets>,
        handler: Handler<A, R>,
        options: ListenOptions,
    ) -> Result<Subscription<A, R>, EmitterError> {
        self.subscribe(targets.into(), handler, options, None)
    }

    /// Registers `handler` for a single invocation.
    pub fn once(
        &self,
        targets: impl Into<Targets>,
        handler: Handler<A, R>,
    ) -> Result<&Self, EmitterError> {
        self.limited_times(targets, 1, handler)
    }

    /// [`Emitter::once`] with options, returning a [`Subscription`].
    pub fn once_with(
        &self,
        targets: impl Into<Targets>,
        handler: Handler<A, R>,
        options: ListenOptions,
    ) -> Result<Subscription<A, R>, EmitterError> {
        self.limited_times_with(targets, 1, handler, options)
    }

    /// Registers `handler` for at most `times` invocations per target.
    ///
    /// # Errors
    /// [`EmitterError::InvalidTimes`] if `times == 0`, plus the errors of [`Emitter::on`].
    pub fn limited_times(
        &self,
        targets: impl Into<Targets>,
        times: usize,
        handler: Handler<A, R>,
    ) -> Result<&Self, EmitterError> {
        self.limited_times_with(targets, times, handler, ListenOptions::default())?;
        Ok(self)
    }

    /// [`Emitter::limited_times`] with options, returning a [`Subscription`].
    pub fn limited_times_with(
        &self,
        targets: impl Into<Targets>,
        times: usize,
        handler: Handler<A, R>,
        options: ListenOptions,
    ) -> Result<Subscription<A, R>, EmitterError> {
        let times = NonZeroUsize::new(times).ok_or(EmitterError::InvalidTimes)?;
        self.subscribe(targets.into(), handler, options, Some(times))
    }

    /// Removes every registration of `handler` under each pattern in `targets`.
    ///
    /// Returns the number of removed listeners.
    pub fn off(
        &self,
        targets: impl Into<Targets>,
        handler: &Handler<A, R>,
    ) -> Result<usize, EmitterError> {
        let targets = targets.into();
        validate(&targets)?;

        let mut total = 0;
        for name in &targets {
            let removed = self.inner.remove_where(name, |l| l.wraps(handler));
            tracing::debug!(event = %name, removed, "handler removed");
            total += removed;
        }
        Ok(total)
    }

    /// Dispatches `args` to every listener of `event`.
    ///
    /// Synchronous handlers run inline; deferred and async ones are spawned on the
    /// current tokio runtime. A promisified synchronous handler still runs inline.
    /// Failures of spawned and promisified handlers go to the diagnostics sink.
    ///
    /// Returns whether any listener ran.
    ///
    /// # Errors
    /// - [`EmitterError::Handler`] if a synchronous handler fails (dispatch stops)
    /// - [`EmitterError::Uncaught`] / [`EmitterError::UnspecifiedError`] for an
    ///   unhandled `error` event
    /// - [`EmitterError::NoRuntime`] if a handler must be spawned outside a runtime
    pub fn emit(&self, event: impl Into<EventName>, args: A) -> Result<bool, EmitterError> {
        let event = event.into();
        let inner = &self.inner;

        let any = inner.any.lock().clone();
        for handler in &any {
            handler
                .call(&event, &args)
                .map_err(|error| EmitterError::Handler {
                    event: event.clone(),
                    error,
                })?;
        }
        let mut fired = !any.is_empty();

        let catch_all = inner.catch_all.lock().clone();
        for listener in &catch_all {
            fired |= inner.dispatch(&event, listener, &args)?;
        }

        let listeners = inner.resolve(&event);
        if listeners.is_empty() && any.is_empty() && catch_all.is_empty() {
            inner.check_unhandled(&event, &args)?;
            tracing::debug!(event = %event, "no listeners");
            return Ok(false);
        }

        tracing::debug!(event = %event, listeners = listeners.len(), "dispatching");
        for listener in &listeners {
            fired |= inner.dispatch(&event, listener, &args)?;
        }
        Ok(fired)
    }

    /// Dispatches `args` and collects every handler's result.
    ///
    /// All handlers are invoked before this returns; the future resolves once every
    /// outcome settled, with catch-all results first and then event handlers in
    /// invocation order. The first failure rejects the whole future.
    pub fn emit_async(
        &self,
        event: impl Into<EventName>,
        args: A,
    ) -> BoxFuture<'static, Result<Vec<R>, EmitterError>> {
        let event = event.into();
        let inner = &self.inner;

        let any = inner.any.lock().clone();
        let observed: Vec<_> = any
            .iter()
            .map(|handler| future::ready(handler.call(&event, &args)))
            .collect();

        let catch_all = inner.catch_all.lock().clone();
        let mut pending: Vec<BoxFuture<'static, Result<R, HandlerError>>> = catch_all
            .iter()
            .filter_map(|l| inner.fire(l, &args))
            .map(Invocation::into_future)
            .collect();

        let listeners = inner.resolve(&event);
        if listeners.is_empty() && any.is_empty() && catch_all.is_empty() {
            if let Err(err) = inner.check_unhandled(&event, &args) {
                return future::ready(Err(err)).boxed();
            }
        }
        pending.extend(
            listeners
                .iter()
                .filter_map(|l| inner.fire(l, &args))
                .map(Invocation::into_future),
        );
        tracing::debug!(event = %event, pending = pending.len(), "dispatching async");

        async move {
            let (_, results) =
                future::try_join(future::try_join_all(observed), future::try_join_all(pending))
                    .await
                    .map_err(|error| EmitterError::Handler { event, error })?;
            Ok(results)
        }
        .boxed()
    }
}

impl<A, R> Clone for Emitter<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, R> Default for Emitter<A, R> {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl<A, R> fmt::Debug for Emitter<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("cfg", &self.inner.cfg)
            .field("max_listeners", &self.max_listeners())
            .field("diagnostics", &self.inner.diagnostics.name())
            .finish()
    }
}
