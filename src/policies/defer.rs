//! # Defer policies for handler invocation.
//!
//! [`DeferPolicy`] determines *when* a handler body runs relative to the `emit` call.
//!
//! - [`DeferPolicy::Immediate`] the handler runs inside `emit` (default).
//! - [`DeferPolicy::NextTick`] the handler runs after yielding once to the scheduler.
//! - [`DeferPolicy::Scheduler`] the handler runs after a zero-length timer fires.
//!
//! ## Choosing the right policy
//!
//! **Plain callbacks** (cheap, must observe the emit synchronously):
//! ```text
//! DeferPolicy::Immediate   → runs before emit() returns; errors propagate to the caller
//! ```
//!
//! **Work that must not run on the emitter's call stack**:
//! ```text
//! DeferPolicy::NextTick    → tokio::task::yield_now(), then run (earliest deferred slot)
//! DeferPolicy::Scheduler   → tokio::time::sleep(0), then run (timer-based fallback)
//! ```
//!
//! Deferred invocations always produce an awaitable; `emit` detaches it onto the
//! ambient runtime while `emit_async` awaits it.

use std::time::Duration;

/// Policy controlling when a handler runs relative to the emission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeferPolicy {
    /// Run synchronously within the emission (default).
    #[default]
    Immediate,
    /// Run after yielding once to the cooperative scheduler.
    NextTick,
    /// Run after a zero-length timer.
    Scheduler,
}

impl DeferPolicy {
    /// True unless the policy is [`DeferPolicy::Immediate`].
    pub fn is_deferred(&self) -> bool {
        !matches!(self, DeferPolicy::Immediate)
    }

    /// Suspends according to the policy. Returns immediately for `Immediate`.
    pub(crate) async fn wait(self) {
        match self {
            DeferPolicy::Immediate => {}
            DeferPolicy::NextTick => tokio::task::yield_now().await,
            DeferPolicy::Scheduler => tokio::time::sleep(Duration::ZERO).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_immediate() {
        assert_eq!(DeferPolicy::default(), DeferPolicy::Immediate);
        assert!(!DeferPolicy::Immediate.is_deferred());
        assert!(DeferPolicy::NextTick.is_deferred());
        assert!(DeferPolicy::Scheduler.is_deferred());
    }

    #[tokio::test]
    async fn test_wait_completes_for_every_policy() {
        for policy in [
            DeferPolicy::Immediate,
            DeferPolicy::NextTick,
            DeferPolicy::Scheduler,
        ] {
            policy.wait().await;
        }
    }
}
