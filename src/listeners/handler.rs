//! # Handler: the callable registered against an event.
//!
//! A [`Handler`] is a shared, identity-comparable callable. Its capability is fixed
//! when it is built:
//! - [`Handler::new`] synchronous body `Fn(&A) -> Result<R, HandlerError>`;
//! - [`Handler::from_async`] / [`Handler::from_listener`] asynchronous body.
//!
//! Identity is the allocation: clones of one handler are "the same handler" for
//! `off`, two handlers built from identical closures are not.
//!
//! ## Invocation shapes
//! ```text
//! sync  + Immediate + !promisify ──► Invocation::Ready(result)      (ran inside emit)
//! sync  + Immediate +  promisify ──► Invocation::Pending(ready(..)) (ran inside emit)
//! sync  + NextTick | Scheduler   ──► Invocation::Pending(wait → run)
//! async + any policy             ──► Invocation::Pending(wait → run.await)
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};

use crate::error::HandlerError;
use crate::listeners::listen::AsyncListener;
use crate::listeners::listen_fn::AsyncFn;
use crate::policies::ListenOptions;

type SyncFn<A, R> = dyn Fn(&A) -> Result<R, HandlerError> + Send + Sync;

enum Body<A, R> {
    Sync(Box<SyncFn<A, R>>),
    Async(Arc<dyn AsyncListener<A, R>>),
}

/// Outcome of invoking a handler once.
pub(crate) enum Invocation<R> {
    /// The handler ran to completion inside the call.
    Ready(Result<R, HandlerError>),
    /// The outcome is available once the future settles.
    Pending(BoxFuture<'static, Result<R, HandlerError>>),
}

impl<R: Send + 'static> Invocation<R> {
    /// Converts either shape into an awaitable.
    pub(crate) fn into_future(self) -> BoxFuture<'static, Result<R, HandlerError>> {
        match self {
            Invocation::Ready(outcome) => future::ready(outcome).boxed(),
            Invocation::Pending(fut) => fut,
        }
    }
}

/// Callable registered against one or more events.
///
/// ## Example
/// ```rust
/// use eventvisor::{Handler, HandlerError};
///
/// let h: Handler<u32, u32> = Handler::new(|n: &u32| Ok(n + 1));
/// let a: Handler<u32, u32> = Handler::from_async(|n: u32| async move {
///     Ok::<_, HandlerError>(n + 1)
/// });
///
/// assert!(!h.is_async());
/// assert!(a.is_async());
/// assert!(h.same(&h.clone()));
/// assert!(!h.same(&a));
/// ```
pub struct Handler<A, R = ()> {
    body: Arc<Body<A, R>>,
}

impl<A, R> Handler<A, R> {
    /// Creates a synchronous handler.
    pub fn new(f: impl Fn(&A) -> Result<R, HandlerError> + Send + Sync + 'static) -> Self {
        Self {
            body: Arc::new(Body::Sync(Box::new(f))),
        }
    }

    /// Creates an asynchronous handler from an [`AsyncListener`] implementation.
    pub fn from_listener(listener: Arc<dyn AsyncListener<A, R>>) -> Self {
        Self {
            body: Arc::new(Body::Async(listener)),
        }
    }

    /// True if the handler body is asynchronous.
    pub fn is_async(&self) -> bool {
        matches!(*self.body, Body::Async(_))
    }

    /// True if both handles refer to the same handler.
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl<A, R> Handler<A, R>
where
    A: Send + 'static,
    R: Send + 'static,
{
    /// Creates an asynchronous handler from a closure returning a future.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, HandlerError>> + Send + 'static,
    {
        Self::from_listener(AsyncFn::arc(f))
    }
}

impl<A, R> Handler<A, R>
where
    A: Clone + Send + Sync + 'static,
    R: Send + 'static,
{
    /// Invokes the handler once according to `options`.
    pub(crate) fn invoke(&self, args: &A, options: ListenOptions) -> Invocation<R> {
        if !options.defer.is_deferred() {
            if let Body::Sync(f) = &*self.body {
                let outcome = f(args);
                return if options.promisify {
                    Invocation::Pending(future::ready(outcome).boxed())
                } else {
                    Invocation::Ready(outcome)
                };
            }
        }

        let body = Arc::clone(&self.body);
        let args = args.clone();
        let defer = options.defer;
        Invocation::Pending(
            async move {
                defer.wait().await;
                match &*body {
                    Body::Sync(f) => f(&args),
                    Body::Async(listener) => listener.call(args).await,
                }
            }
            .boxed(),
        )
    }
}

impl<A, R> Clone for Handler<A, R> {
    fn clone(&self) -> Self {
        Self {
            body: Arc::clone(&self.body),
        }
    }
}

impl<A, R> fmt::Debug for Handler<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("async", &self.is_async())
            .field("ptr", &Arc::as_ptr(&self.body).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::DeferPolicy;

    fn ready<R>(inv: Invocation<R>) -> Result<R, HandlerError> {
        match inv {
            Invocation::Ready(outcome) => outcome,
            Invocation::Pending(_) => panic!("expected a ready invocation"),
        }
    }

    #[test]
    fn test_sync_immediate_runs_inline() {
        let h: Handler<u32, u32> = Handler::new(|n| Ok(n * 10));
        let out = ready(h.invoke(&4, ListenOptions::default()));
        assert_eq!(out.unwrap(), 40);
    }

    #[test]
    fn test_sync_failure_is_returned_unchanged() {
        let h: Handler<u32, u32> = Handler::new(|_| Err("nope".into()));
        let out = ready(h.invoke(&1, ListenOptions::default()));
        assert!(matches!(out, Err(HandlerError::Fail { error }) if error == "nope"));
    }

    #[tokio::test]
    async fn test_promisify_turns_failure_into_rejection() {
        let h: Handler<u32, u32> = Handler::new(|_| Err("nope".into()));
        let inv = h.invoke(&1, ListenOptions::default().with_promisify(true));
        assert!(matches!(inv, Invocation::Pending(_)));
        assert!(inv.into_future().await.is_err());
    }

    #[tokio::test]
    async fn test_deferred_sync_runs_only_when_polled() {
        let hits = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let h: Handler<u32> = Handler::new(move |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        });

        let inv = h.invoke(&1, ListenOptions::default().with_defer(DeferPolicy::NextTick));
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 0);
        inv.into_future().await.unwrap();
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_async_handler_receives_owned_args() {
        let h: Handler<String, usize> =
            Handler::from_async(|s: String| async move { Ok(s.len()) });
        let inv = h.invoke(&"hello".to_string(), ListenOptions::default());
        assert_eq!(inv.into_future().await.unwrap(), 5);
    }
}
