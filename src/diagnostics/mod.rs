//! # Diagnostics for the emitter.
//!
//! This module provides the [`Diagnostics`] trait and the built-in [`LogWriter`]
//! sink. The emitter never writes to a global channel directly; every advisory
//! report goes through the sink injected at construction.
//!
//! ## Architecture
//! ```text
//! Emitter::on(..)  ── count > max ──► Diagnostics::on_leak(&LeakWarning)
//! Emitter::emit(..) ── detached deferred handler failed ──► Diagnostics::on_detached_failure
//!                                                              │
//!                                          ┌───────────────────┼─────────────┐
//!                                          ▼                   ▼             ▼
//!                                      LogWriter          test recorder    custom
//!                                     (tracing)
//! ```

mod leak;
mod log;
mod sink;

pub use leak::LeakWarning;
pub use log::LogWriter;
pub use sink::Diagnostics;
