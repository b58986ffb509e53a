//! # Event names and registration targets.
//!
//! [`EventName`] is a cheap-to-clone text token. In wildcard mode it is read as a
//! sequence of segments separated by the configured delimiter:
//!
//! ```text
//! "orders.*.created.**"  ──split(".")──►  ["orders", "*", "created", "**"]
//!                                             │       │       │         │
//!                                           exact   single  exact     deep
//! ```
//!
//! [`Targets`] is what `on`/`off` accept: one name or a list of names.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Segment matching exactly one arbitrary segment.
pub const SINGLE_WILDCARD: &str = "*";

/// Segment matching zero or more arbitrary trailing segments.
pub const DEEP_WILDCARD: &str = "**";

/// Reserved event delivered when a listener is added.
pub const NEW_LISTENER: &str = "newListener";

/// Reserved event delivered when a listener is removed.
pub const REMOVE_LISTENER: &str = "removeListener";

/// Event whose absence of listeners is a failure (unless suppressed).
pub const ERROR_EVENT: &str = "error";

/// Name of an event (or an event pattern, in wildcard mode).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventName(Arc<str>);

impl EventName {
    /// Creates a new event name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Returns the name as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the name into namespace segments.
    pub fn segments<'a>(&'a self, delimiter: &str) -> Vec<&'a str> {
        if delimiter.is_empty() {
            return vec![self.as_str()];
        }
        self.0.split(delimiter).collect()
    }

    /// True for the reserved `error` event.
    pub fn is_error(&self) -> bool {
        self.as_str() == ERROR_EVENT
    }

    /// True for the two internal notification names.
    pub fn is_reserved(&self) -> bool {
        matches!(self.as_str(), NEW_LISTENER | REMOVE_LISTENER)
    }
}

impl fmt::Debug for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for EventName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for EventName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for EventName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EventName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&String> for EventName {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl From<&EventName> for EventName {
    fn from(name: &EventName) -> Self {
        name.clone()
    }
}

/// One or more event names used as a registration/removal target.
///
/// ```rust
/// use eventvisor::Targets;
///
/// let one = Targets::from("a.b");
/// let many = Targets::from(["a", "b", "c"]);
/// assert_eq!(one.len(), 1);
/// assert_eq!(many.len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Targets(Vec<EventName>);

impl Targets {
    /// Returns the names in the order given.
    pub fn names(&self) -> &[EventName] {
        &self.0
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no names were given.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Targets {
    type Item = EventName;
    type IntoIter = std::vec::IntoIter<EventName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Targets {
    type Item = &'a EventName;
    type IntoIter = std::slice::Iter<'a, EventName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<EventName> for Targets {
    fn from(name: EventName) -> Self {
        Self(vec![name])
    }
}

impl From<&EventName> for Targets {
    fn from(name: &EventName) -> Self {
        Self(vec![name.clone()])
    }
}

impl From<&str> for Targets {
    fn from(name: &str) -> Self {
        Self(vec![EventName::from(name)])
    }
}

impl From<String> for Targets {
    fn from(name: String) -> Self {
        Self(vec![EventName::from(name)])
    }
}

impl<T: Into<EventName>> From<Vec<T>> for Targets {
    fn from(names: Vec<T>) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<EventName>, const N: usize> From<[T; N]> for Targets {
    fn from(names: [T; N]) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl From<&[&str]> for Targets {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().copied().map(EventName::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_default_delimiter() {
        let name = EventName::from("ns.*.c.**");
        assert_eq!(name.segments("."), vec!["ns", "*", "c", "**"]);
    }

    #[test]
    fn test_segments_custom_delimiter() {
        let name = EventName::from("ns::a.b");
        assert_eq!(name.segments("::"), vec!["ns", "a.b"]);
        assert_eq!(name.segments(""), vec!["ns::a.b"]);
    }

    #[test]
    fn test_reserved_and_error_names() {
        assert!(EventName::from(NEW_LISTENER).is_reserved());
        assert!(EventName::from(REMOVE_LISTENER).is_reserved());
        assert!(!EventName::from("error").is_reserved());
        assert!(EventName::from("error").is_error());
    }

    #[test]
    fn test_targets_from_list_keeps_order() {
        let targets = Targets::from(vec!["b", "a"]);
        let names: Vec<&str> = targets.names().iter().map(EventName::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
