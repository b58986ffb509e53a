//! # Leak warning payload.
//!
//! A [`LeakWarning`] is produced for every registration that leaves a pattern with
//! more listeners than the configured limit. Each extra listener yields its own
//! warning; nothing is deduplicated.

use crate::events::EventName;

/// Advisory report: too many listeners for one event pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeakWarning {
    /// Pattern that exceeded the limit.
    pub event: EventName,
    /// Listener count after the offending registration.
    pub count: usize,
    /// Configured limit.
    pub max: usize,
    /// Whether the detailed text was requested.
    pub detailed: bool,
}

impl LeakWarning {
    /// One-line diagnostic text (longer when `detailed` is set).
    ///
    /// ```rust
    /// use eventvisor::{EventName, LeakWarning};
    ///
    /// let w = LeakWarning { event: EventName::from("tick"), count: 11, max: 10, detailed: false };
    /// assert!(w.message().starts_with("possible event emitter leak detected"));
    /// ```
    pub fn message(&self) -> String {
        if self.detailed {
            format!(
                "possible event emitter leak detected. {} listeners added for event '{}' (limit {}). \
                 Use set_max_listeners() to increase the limit.",
                self.count, self.event, self.max
            )
        } else {
            format!(
                "possible event emitter leak detected. {} listeners added. \
                 Use set_max_listeners() to increase the limit.",
                self.count
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detailed_message_names_event_and_limit() {
        let w = LeakWarning {
            event: EventName::from("orders.created"),
            count: 3,
            max: 2,
            detailed: true,
        };
        let msg = w.message();
        assert!(msg.contains("'orders.created'"));
        assert!(msg.contains("limit 2"));
    }

    #[test]
    fn test_short_message_omits_event() {
        let w = LeakWarning {
            event: EventName::from("orders.created"),
            count: 3,
            max: 2,
            detailed: false,
        };
        assert!(!w.message().contains("orders.created"));
    }
}
