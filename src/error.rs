//! Error types used by the emitter and by handlers.
//!
//! This module defines two main error enums:
//!
//! - [`EmitterError`] errors raised by the emitter itself (registration and dispatch).
//! - [`HandlerError`] errors raised by individual handler invocations.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

use crate::events::EventName;

/// # Errors produced by the emitter.
///
/// Registration errors are returned synchronously from `on`/`once`/`limited_times`.
/// Dispatch errors come out of `emit` (or the future returned by `emit_async`).
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum EmitterError {
    /// The event name is empty.
    #[error("invalid event name {event:?}")]
    InvalidEvent {
        /// The rejected name.
        event: String,
    },

    /// The event name is reserved for internal notifications.
    #[error("event {event:?} is reserved; use `on_internal` instead")]
    ReservedEvent {
        /// The reserved name.
        event: String,
    },

    /// `limited_times` was called with a zero count.
    #[error("listener invocation count must be at least 1")]
    InvalidTimes,

    /// A handler failed during dispatch.
    #[error("handler for {event} failed: {error}")]
    Handler {
        /// Event being dispatched.
        event: EventName,
        /// The handler failure.
        #[source]
        error: HandlerError,
    },

    /// The reserved `error` event had no listeners; the payload was an error value.
    #[error("uncaught error event: {error}")]
    Uncaught {
        /// The error carried by the event.
        #[source]
        error: HandlerError,
    },

    /// The reserved `error` event had no listeners and carried no error value.
    #[error("uncaught, unspecified 'error' event")]
    UnspecifiedError,

    /// A deferred invocation was requested outside of a tokio runtime.
    #[error("deferred handler for {event} needs a tokio runtime")]
    NoRuntime {
        /// Event being dispatched.
        event: EventName,
    },
}

impl EmitterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventvisor::EmitterError;
    ///
    /// assert_eq!(EmitterError::InvalidTimes.as_label(), "emitter_invalid_times");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitterError::InvalidEvent { .. } => "emitter_invalid_event",
            EmitterError::ReservedEvent { .. } => "emitter_reserved_event",
            EmitterError::InvalidTimes => "emitter_invalid_times",
            EmitterError::Handler { .. } => "emitter_handler_failed",
            EmitterError::Uncaught { .. } => "emitter_uncaught_error",
            EmitterError::UnspecifiedError => "emitter_unspecified_error",
            EmitterError::NoRuntime { .. } => "emitter_no_runtime",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EmitterError::InvalidEvent { event } => format!("invalid event: {event:?}"),
            EmitterError::ReservedEvent { event } => format!("reserved event: {event}"),
            EmitterError::InvalidTimes => "times must be >= 1".to_string(),
            EmitterError::Handler { event, error } => {
                format!("event={event} {}", error.as_message())
            }
            EmitterError::Uncaught { error } => format!("uncaught: {}", error.as_message()),
            EmitterError::UnspecifiedError => "uncaught, unspecified 'error' event".to_string(),
            EmitterError::NoRuntime { event } => format!("no runtime for event={event}"),
        }
    }

    /// Returns the handler failure behind this error, if any.
    pub fn handler_error(&self) -> Option<&HandlerError> {
        match self {
            EmitterError::Handler { error, .. } | EmitterError::Uncaught { error } => Some(error),
            _ => None,
        }
    }
}

/// # Errors produced by handlers.
///
/// Cheap to clone so the same failure can be carried as an `error` event payload
/// and reported through diagnostics.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum HandlerError {
    /// Handler failed with a message.
    #[error("handler failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Handler failed with an underlying error value.
    #[error("handler failed: {source}")]
    Source {
        /// The underlying error.
        #[source]
        source: Arc<dyn StdError + Send + Sync>,
    },
}

impl HandlerError {
    /// Creates a message-only failure.
    pub fn fail(error: impl Into<String>) -> Self {
        HandlerError::Fail {
            error: error.into(),
        }
    }

    /// Wraps an arbitrary error value.
    pub fn from_error(source: impl StdError + Send + Sync + 'static) -> Self {
        HandlerError::Source {
            source: Arc::new(source),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventvisor::HandlerError;
    ///
    /// assert_eq!(HandlerError::fail("boom").as_label(), "handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Fail { .. } => "handler_failed",
            HandlerError::Source { .. } => "handler_source",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Fail { error } => format!("error: {error}"),
            HandlerError::Source { source } => format!("error: {source}"),
        }
    }
}

impl From<&str> for HandlerError {
    fn from(error: &str) -> Self {
        HandlerError::fail(error)
    }
}

impl From<String> for HandlerError {
    fn from(error: String) -> Self {
        HandlerError::Fail { error }
    }
}

/// Lets handlers that call back into an emitter use `?`.
impl From<EmitterError> for HandlerError {
    fn from(error: EmitterError) -> Self {
        HandlerError::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_from_io() {
        let io = std::io::Error::other("disk gone");
        let err = HandlerError::from_error(io);
        assert_eq!(err.as_label(), "handler_source");
        assert!(err.as_message().contains("disk gone"));
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_emitter_error_exposes_handler_error() {
        let err = EmitterError::Handler {
            event: EventName::from("a.b"),
            error: "boom".into(),
        };
        assert_eq!(err.as_label(), "emitter_handler_failed");
        assert!(matches!(
            err.handler_error(),
            Some(HandlerError::Fail { error }) if error == "boom"
        ));
        assert!(EmitterError::InvalidTimes.handler_error().is_none());
    }
}
