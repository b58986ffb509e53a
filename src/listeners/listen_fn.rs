//! # Function-backed async listener (`AsyncFn`)
//!
//! [`AsyncFn`] wraps a closure `F: Fn(A) -> Fut`, producing a fresh future per
//! emission. No state is shared between invocations unless the closure captures
//! an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{AsyncFn, AsyncListener, HandlerError};
//!
//! let l: Arc<dyn AsyncListener<u32, u32>> = AsyncFn::arc(|n: u32| async move {
//!     Ok::<_, HandlerError>(n * 2)
//! });
//! # let _ = l;
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::listeners::listen::AsyncListener;

/// Function-backed async listener.
pub struct AsyncFn<F> {
    f: F,
}

impl<F> AsyncFn<F> {
    /// Wraps a closure that *creates* a new future per emission.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Wraps the closure and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F> fmt::Debug for AsyncFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncFn").finish_non_exhaustive()
    }
}

#[async_trait]
impl<A, R, F, Fut> AsyncListener<A, R> for AsyncFn<F>
where
    A: Send + 'static,
    R: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<R, HandlerError>> + Send + 'static,
{
    async fn call(&self, args: A) -> Result<R, HandlerError> {
        (self.f)(args).await
    }
}
