//! Handlers and the listeners that wrap them.
//!
//! - [`Handler`] what callers register: a synchronous closure or an async body.
//! - [`AsyncListener`] / [`AsyncFn`] the async capability (trait + closure adapter).
//! - [`AnyHandler`] global observer receiving `(event, args)`.
//! - `Listener` (internal) a stored registration: id, pattern, options, budget.

mod any;
mod handler;
mod listen;
mod listen_fn;
mod listener;

pub use any::AnyHandler;
pub use handler::Handler;
pub use listen::AsyncListener;
pub use listen_fn::AsyncFn;
pub use listener::ListenerId;

pub(crate) use handler::Invocation;
pub(crate) use listener::{Admission, Budget, Listener};
