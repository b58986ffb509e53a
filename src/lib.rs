//! # eventvisor
//!
//! **Eventvisor** is a typed, in-process event emitter for Rust.
//!
//! Handlers register against event names (optionally namespaced patterns with
//! `*` / `**` wildcards) and receive the arguments of every matching emission.
//! Handlers can be synchronous closures or async bodies, fire forever or a limited
//! number of times, and run inline or deferred onto the tokio runtime.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Handler    │   │   Handler    │   │ AsyncListener│
//!     │ (sync fn #1) │   │ (once / k×)  │   │ (async body) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ on               ▼ once             ▼ on_with(options)
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Emitter (shared state, cheap to clone)                           │
//! │  - Registry      (flat mode: name → Slot)                         │
//! │  - PatternTree   (wildcard mode: segment trie, `*` / `**`)        │
//! │  - AnyHandler / catch-all handlers (every emission)               │
//! │  - Notifier      (ListenerAdded / ListenerRemoved notices)        │
//! │  - Diagnostics   (leak warnings, detached failures)               │
//! └──────┬──────────────────────────────────────────────┬─────────────┘
//!        ▼ emit(event, args)                            ▼ emit_async(event, args)
//!   Listener::admit → Handler::invoke              Listener::admit → Handler::invoke
//!        │                                              │
//!        ├─ Ready(Ok)   ─► continue                     └─► try_join_all ─► Vec<R>
//!        ├─ Ready(Err)  ─► EmitterError::Handler
//!        └─ Pending(f)  ─► tokio::spawn(f) ─► Diagnostics::on_detached_failure
//! ```
//!
//! ### Wildcard matching
//! ```text
//! pattern        event            match
//! ns.*           ns.a             yes   (`*` = exactly one segment)
//! ns.*           ns.a.b           no
//! ns.**          ns.a.b.c         yes   (`**` = zero or more segments)
//! ns.*.c.**      ns.x.c           yes
//! ns.*.c.**      ns.x.d.c         no
//! ```
//!
//! ## Features
//! | Area              | Description                                                      | Key types / traits                      |
//! |-------------------|------------------------------------------------------------------|-----------------------------------------|
//! | **Emitter**       | Register, remove and dispatch; flat or wildcard storage.         | [`Emitter`], [`EmitterBuilder`]         |
//! | **Handlers**      | Sync closures, async bodies, global observers.                   | [`Handler`], [`AsyncListener`], [`AsyncFn`], [`AnyHandler`] |
//! | **Policies**      | Deferred execution and promisified outcomes per registration.    | [`DeferPolicy`], [`ListenOptions`]      |
//! | **Notifications** | Internal listener-added / listener-removed channel.              | [`InternalEvent`], [`NoticeHandler`]    |
//! | **Diagnostics**   | Injected sink for leak warnings and detached failures.           | [`Diagnostics`], [`LogWriter`]          |
//! | **Errors**        | Typed errors for registration, dispatch and handlers.            | [`EmitterError`], [`HandlerError`]      |
//! | **Configuration** | Centralize emitter settings.                                     | [`EmitterConfig`]                       |
//!
//! ## Example
//! ```rust
//! use eventvisor::{DeferPolicy, Emitter, EmitterConfig, Handler, HandlerError, ListenOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let emitter: Emitter<u32, u32> = Emitter::new(EmitterConfig::wildcard());
//!
//!     // Synchronous handler, runs inside emit.
//!     emitter.on("jobs.*.done", Handler::new(|id: &u32| Ok(*id)))?;
//!
//!     // Fires once, on the next scheduler tick.
//!     emitter.once_with(
//!         "jobs.**",
//!         Handler::new(|id: &u32| Ok(id * 100)),
//!         ListenOptions::default().with_defer(DeferPolicy::NextTick),
//!     )?;
//!
//!     // Async body.
//!     emitter.on(
//!         "jobs.*.done",
//!         Handler::from_async(|id: u32| async move { Ok::<_, HandlerError>(id + 1) }),
//!     )?;
//!
//!     let results = emitter.emit_async("jobs.build.done", 7).await?;
//!     assert_eq!(results, vec![7, 700, 8]);
//!
//!     // The `once` registration is gone now.
//!     assert_eq!(emitter.listener_count("jobs.build.done"), 2);
//!     Ok(())
//! }
//! ```
mod core;
mod diagnostics;
mod error;
mod events;
mod listeners;
mod policies;

// ---- Public re-exports ----

pub use crate::core::{Emitter, EmitterBuilder, EmitterConfig, Subscription};
pub use diagnostics::{Diagnostics, LeakWarning, LogWriter};
pub use error::{EmitterError, HandlerError};
pub use events::{
    DEEP_WILDCARD, ERROR_EVENT, EventName, InternalEvent, ListenerNotice, NEW_LISTENER,
    NoticeHandler, REMOVE_LISTENER, SINGLE_WILDCARD, Targets,
};
pub use listeners::{AnyHandler, AsyncFn, AsyncListener, Handler, ListenerId};
pub use policies::{DeferPolicy, ListenOptions};
