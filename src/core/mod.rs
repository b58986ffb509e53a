//! Runtime core: storage and dispatch.
//!
//! This module contains the emitter itself. The public API from this module is
//! [`Emitter`], its [`EmitterBuilder`] / [`EmitterConfig`], and the [`Subscription`]
//! handle returned by the `*_with` registration methods.
//!
//! Internal modules:
//! - `emitter`: registration, removal, `emit` / `emit_async`;
//! - `registry`: flat name → listeners storage;
//! - `tree`: namespaced pattern trie with `*` / `**` matching;
//! - `slot`: zero/one/many listener bag shared by both stores;
//! - `notify`: internal `ListenerAdded` / `ListenerRemoved` channel;
//! - `subscription`: weak removal handle.

mod builder;
mod config;
mod emitter;
mod notify;
mod registry;
mod slot;
mod subscription;
mod tree;

pub use builder::EmitterBuilder;
pub use config::EmitterConfig;
pub use emitter::Emitter;
pub use subscription::Subscription;

pub(crate) use slot::Identity;
