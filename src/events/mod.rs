//! Event naming and internal notifications.
//!
//! This module groups the **naming model** used to register and emit events and
//! the **notice** types delivered on the internal listener-bookkeeping channel.
//!
//! ## Contents
//! - [`EventName`], [`Targets`] event names and one-or-many registration targets
//! - [`InternalEvent`], [`ListenerNotice`], [`NoticeHandler`] internal notifications
//!
//! ## Quick reference
//! - **Reserved names**: `"newListener"`, `"removeListener"` (internal channel only).
//! - **Error event**: `"error"` fails loudly when nobody listens.
//! - **Wildcards**: `*` (one segment) and `**` (zero or more segments).

mod name;
mod notice;

pub use name::{
    DEEP_WILDCARD, ERROR_EVENT, EventName, NEW_LISTENER, REMOVE_LISTENER, SINGLE_WILDCARD, Targets,
};
pub use notice::{InternalEvent, ListenerNotice, NoticeHandler};
