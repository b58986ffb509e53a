//! Invocation policies.
//!
//! This module groups the knobs that control **when** a handler body runs and
//! **how** its outcome is surfaced.
//!
//! ## Contents
//! - [`DeferPolicy`] when to run a handler (immediate / next tick / scheduler)
//! - [`ListenOptions`] per-registration bundle (defer policy + promisify flag)
//!
//! ## Quick wiring
//! ```text
//! emitter.on_with(event, handler, ListenOptions { defer, promisify })
//!      └─► listeners::Listener keeps:
//!           - defer to decide run-now vs. run-later
//!           - promisify to turn failures into rejected awaitables
//! ```
//!
//! ## Defaults
//! - `DeferPolicy::Immediate`.
//! - `promisify = false` (asynchronous handlers are always awaitable anyway).

mod defer;
mod options;

pub use defer::DeferPolicy;
pub use options::ListenOptions;
