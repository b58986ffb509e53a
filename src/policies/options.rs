//! # Per-registration listener options.
//!
//! [`ListenOptions`] bundles how a single registration behaves:
//! - [`DeferPolicy`] when the handler body runs;
//! - `promisify` whether a synchronous handler's outcome becomes an awaitable.
//!
//! ## Example
//! ```rust
//! use eventvisor::{DeferPolicy, ListenOptions};
//!
//! let opts = ListenOptions::default().with_defer(DeferPolicy::NextTick);
//! assert!(opts.is_awaitable(false));
//!
//! let plain = ListenOptions::default();
//! assert!(!plain.is_awaitable(false));
//! assert!(plain.is_awaitable(true)); // async handlers are always awaitable
//! ```

use crate::policies::DeferPolicy;

/// Options applied to one registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenOptions {
    /// When the handler body runs.
    pub defer: DeferPolicy,
    /// Surface the outcome as an awaitable even for synchronous handlers.
    pub promisify: bool,
}

impl ListenOptions {
    /// Returns options with an updated defer policy.
    pub fn with_defer(mut self, defer: DeferPolicy) -> Self {
        self.defer = defer;
        self
    }

    /// Returns options with an updated promisify flag.
    pub fn with_promisify(mut self, promisify: bool) -> Self {
        self.promisify = promisify;
        self
    }

    /// True if an invocation produces an awaitable rather than an immediate result.
    ///
    /// `handler_is_async` is the handler's static capability.
    pub fn is_awaitable(&self, handler_is_async: bool) -> bool {
        handler_is_async || self.promisify || self.defer.is_deferred()
    }
}
