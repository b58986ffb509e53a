//! # Registry - flat per-event handler storage.
//!
//! Used when wildcard matching is disabled. Each event name maps to a [`Slot`]:
//!
//! ```text
//! "ready"   ─► Single(L1)
//! "tick"    ─► Multiple([L2, L3, L4])
//! "gone"    ─► (no key)            ← removed when its last listener goes away
//! ```
//!
//! ## Rules
//! - Insertion order is preserved per name and is the dispatch order.
//! - An emptied slot is deleted so "no listeners" and "absent" are the same state.
//! - The registry holds no lock; the emitter serializes access.

use std::collections::HashMap;

use crate::core::slot::Slot;
use crate::events::EventName;

/// Flat name → listeners map.
#[derive(Debug)]
pub(crate) struct Registry<T> {
    slots: HashMap<EventName, Slot<T>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<T> Registry<T> {
    /// Appends a listener to `name`; returns the per-name count after insertion.
    pub fn insert(&mut self, name: &EventName, item: T) -> usize {
        match self.slots.get_mut(name) {
            Some(slot) => slot.push(item),
            None => {
                self.slots.insert(name.clone(), Slot::Single(item));
                1
            }
        }
    }

    /// Removes listeners of `name` matching `pred`.
    pub fn remove_where(&mut self, name: &EventName, pred: impl FnMut(&T) -> bool) -> Vec<T> {
        let Some(slot) = self.slots.get_mut(name) else {
            return Vec::new();
        };
        let removed = slot.remove_where(pred);
        if slot.is_empty() {
            self.slots.remove(name);
        }
        removed
    }

    /// Removes every listener of `name`.
    pub fn clear(&mut self, name: &EventName) -> Vec<T> {
        self.slots
            .remove(name)
            .map(|mut slot| slot.drain())
            .unwrap_or_default()
    }

    /// Removes every listener.
    pub fn clear_all(&mut self) -> Vec<T> {
        self.slots.drain().flat_map(|(_, mut slot)| slot.drain()).collect()
    }

    /// Number of listeners for `name`.
    #[cfg(test)]
    pub fn len(&self, name: &EventName) -> usize {
        self.slots.get(name).map_or(0, Slot::len)
    }

    /// Returns sorted list of names with at least one listener.
    pub fn names(&self) -> Vec<EventName> {
        let mut names: Vec<EventName> = self.slots.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

impl<T: Clone> Registry<T> {
    /// Listeners of `name` in insertion order (empty if absent).
    pub fn get(&self, name: &EventName) -> Vec<T> {
        self.slots.get(name).map(Slot::to_vec).unwrap_or_default()
    }

    /// Every stored listener.
    #[cfg(test)]
    pub fn items(&self) -> Vec<T> {
        self.slots.values().flat_map(Slot::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> EventName {
        EventName::from(s)
    }

    #[test]
    fn test_insert_counts_per_name() {
        let mut reg = Registry::default();
        assert_eq!(reg.insert(&name("a"), 1), 1);
        assert_eq!(reg.insert(&name("a"), 2), 2);
        assert_eq!(reg.insert(&name("b"), 3), 1);
        assert_eq!(reg.get(&name("a")), vec![1, 2]);
        assert_eq!(reg.len(&name("b")), 1);
    }

    #[test]
    fn test_emptied_slot_deletes_key() {
        let mut reg = Registry::default();
        reg.insert(&name("a"), 1);
        reg.insert(&name("a"), 2);
        assert_eq!(reg.remove_where(&name("a"), |v| *v == 1), vec![1]);
        assert_eq!(reg.names(), vec![name("a")]);
        assert_eq!(reg.remove_where(&name("a"), |v| *v == 2), vec![2]);
        assert!(reg.names().is_empty());
        assert!(reg.get(&name("a")).is_empty());
    }

    #[test]
    fn test_remove_on_unknown_name_is_noop() {
        let mut reg: Registry<u32> = Registry::default();
        assert!(reg.remove_where(&name("nope"), |_| true).is_empty());
    }

    #[test]
    fn test_names_are_sorted() {
        let mut reg = Registry::default();
        reg.insert(&name("zeta"), 1);
        reg.insert(&name("alpha"), 2);
        assert_eq!(reg.names(), vec![name("alpha"), name("zeta")]);
    }

    #[test]
    fn test_clear_and_clear_all() {
        let mut reg = Registry::default();
        reg.insert(&name("a"), 1);
        reg.insert(&name("b"), 2);
        reg.insert(&name("b"), 3);
        assert_eq!(reg.clear(&name("a")), vec![1]);
        let mut rest = reg.clear_all();
        rest.sort_unstable();
        assert_eq!(rest, vec![2, 3]);
        assert!(reg.items().is_empty());
    }
}
