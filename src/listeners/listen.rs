//! # Asynchronous listener abstraction.
//!
//! This module defines the [`AsyncListener`] trait (async, owns its arguments).
//! Use it when a handler needs to await; plain callbacks go through
//! [`Handler::new`](crate::Handler::new) instead.

use async_trait::async_trait;

use crate::error::HandlerError;

/// # Asynchronous handler body.
///
/// Receives an owned copy of the emitted arguments so the returned future is `'static`.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use eventvisor::{AsyncListener, HandlerError};
///
/// struct Audit;
///
/// #[async_trait]
/// impl AsyncListener<String, usize> for Audit {
///     async fn call(&self, line: String) -> Result<usize, HandlerError> {
///         // write somewhere...
///         Ok(line.len())
///     }
/// }
/// ```
#[async_trait]
pub trait AsyncListener<A, R = ()>: Send + Sync + 'static {
    /// Handles one emission.
    async fn call(&self, args: A) -> Result<R, HandlerError>;
}
