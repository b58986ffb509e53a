//! # Emitter configuration.
//!
//! Provides [`EmitterConfig`] centralized settings for one emitter instance.
//!
//! Config is used in two ways:
//! 1. **Emitter creation**: `Emitter::new(config)` or `EmitterBuilder::new(config)`
//! 2. **Dispatch decisions**: storage mode, notifications, leak threshold, error policy
//!
//! ## Sentinel values
//! - `max_listeners = 0` → leak check disabled
//! - `delimiter = ""` → names are never split (one segment per name)

/// Configuration for one emitter.
///
/// Defines:
/// - **Storage mode**: flat registry or wildcard pattern tree
/// - **Notifications**: internal added/removed notices
/// - **Leak check**: per-pattern listener limit and warning verbosity
/// - **Error policy**: whether an unhandled `error` event fails
///
/// ## Field semantics
/// - `wildcard`: Interpret names as `delimiter`-separated patterns with `*` / `**`
/// - `delimiter`: Segment separator (default `"."`)
/// - `notify_new_listener`: Deliver `ListenerAdded` notices before storing a listener
/// - `notify_remove_listener`: Deliver `ListenerRemoved` notices after removing one
/// - `max_listeners`: Leak-warning threshold per pattern (`0` = disabled)
/// - `detailed_leak_warnings`: Longer leak warning text
/// - `suppress_errors`: Treat an unhandled `error` event as "no listeners"
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitterConfig {
    /// Enables namespaced wildcard matching.
    pub wildcard: bool,

    /// Namespace delimiter used when `wildcard` is enabled.
    pub delimiter: String,

    /// Deliver internal `ListenerAdded` notices.
    pub notify_new_listener: bool,

    /// Deliver internal `ListenerRemoved` notices.
    pub notify_remove_listener: bool,

    /// Listener count per pattern above which a leak warning is reported.
    ///
    /// - `0` = no check
    /// - `n > 0` = every registration leaving more than `n` listeners warns once
    ///
    /// Adjustable at runtime with `Emitter::set_max_listeners`.
    pub max_listeners: usize,

    /// Use the long form of the leak warning.
    pub detailed_leak_warnings: bool,

    /// Do not fail when `error` is emitted with no listeners.
    pub suppress_errors: bool,
}

impl EmitterConfig {
    /// Returns the leak threshold as an `Option`.
    ///
    /// - `None` → check disabled
    /// - `Some(n)` → warn above `n`
    #[inline]
    pub fn leak_threshold(&self) -> Option<usize> {
        threshold(self.max_listeners)
    }

    /// Returns a config with wildcard matching enabled.
    pub fn wildcard() -> Self {
        Self {
            wildcard: true,
            ..Self::default()
        }
    }
}

/// `0` disables the leak check.
#[inline]
pub(crate) fn threshold(max_listeners: usize) -> Option<usize> {
    if max_listeners == 0 {
        None
    } else {
        Some(max_listeners)
    }
}

impl Default for EmitterConfig {
    /// Default configuration:
    ///
    /// - `wildcard = false` (flat registry)
    /// - `delimiter = "."`
    /// - `notify_new_listener = false`, `notify_remove_listener = false`
    /// - `max_listeners = 10`
    /// - `detailed_leak_warnings = false`
    /// - `suppress_errors = false`
    fn default() -> Self {
        Self {
            wildcard: false,
            delimiter: ".".to_string(),
            notify_new_listener: false,
            notify_remove_listener: false,
            max_listeners: 10,
            detailed_leak_warnings: false,
            suppress_errors: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EmitterConfig::default();
        assert!(!cfg.wildcard);
        assert_eq!(cfg.delimiter, ".");
        assert_eq!(cfg.leak_threshold(), Some(10));
        assert!(!cfg.suppress_errors);
    }

    #[test]
    fn test_zero_disables_leak_check() {
        let cfg = EmitterConfig {
            max_listeners: 0,
            ..EmitterConfig::default()
        };
        assert_eq!(cfg.leak_threshold(), None);
    }

    #[test]
    fn test_wildcard_shorthand() {
        let cfg = EmitterConfig::wildcard();
        assert!(cfg.wildcard);
        assert_eq!(cfg.max_listeners, 10);
    }
}
