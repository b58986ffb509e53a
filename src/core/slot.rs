//! Tagged "one or many" storage shared by the registry and the pattern tree.
//!
//! Absence is represented by the owner (map key or tree node) having no slot at all,
//! so a present [`Slot`] is never observed empty by readers.

/// Identity used for deduplication and removal.
pub(crate) trait Identity {
    /// Stable identity of the stored value.
    fn identity(&self) -> u64;
}

/// Entries attached to one event name or one tree node.
#[derive(Debug, Clone)]
pub(crate) enum Slot<T> {
    /// Exactly one entry.
    Single(T),
    /// Several entries in insertion order (promoted on second insertion).
    Multiple(Vec<T>),
}

impl<T> Slot<T> {
    /// Appends an entry, promoting `Single` to `Multiple`. Returns the new length.
    pub fn push(&mut self, item: T) -> usize {
        *self = match std::mem::replace(self, Slot::Multiple(Vec::new())) {
            Slot::Single(first) => Slot::Multiple(vec![first, item]),
            Slot::Multiple(mut items) => {
                items.push(item);
                Slot::Multiple(items)
            }
        };
        self.len()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Slot::Single(_) => 1,
            Slot::Multiple(items) => items.len(),
        }
    }

    /// True when the last entry was removed; the owner must drop the slot.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Slot::Single(item) => std::slice::from_ref(item).iter(),
            Slot::Multiple(items) => items.iter(),
        }
    }

    /// Removes every entry matching `pred`, returning them in insertion order.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
        match std::mem::replace(self, Slot::Multiple(Vec::new())) {
            Slot::Single(item) => {
                if pred(&item) {
                    vec![item]
                } else {
                    *self = Slot::Single(item);
                    Vec::new()
                }
            }
            Slot::Multiple(items) => {
                let (removed, kept): (Vec<T>, Vec<T>) = items.into_iter().partition(|i| pred(i));
                *self = Slot::Multiple(kept);
                removed
            }
        }
    }

    /// Takes every entry out, leaving the slot empty.
    pub fn drain(&mut self) -> Vec<T> {
        match std::mem::replace(self, Slot::Multiple(Vec::new())) {
            Slot::Single(item) => vec![item],
            Slot::Multiple(items) => items,
        }
    }
}

impl<T: Clone> Slot<T> {
    /// Copies the entries out (zero, one or many, uniformly).
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_promotes_single_to_multiple() {
        let mut slot = Slot::Single(1);
        assert_eq!(slot.push(2), 2);
        assert!(matches!(slot, Slot::Multiple(ref v) if v == &[1, 2]));
        assert_eq!(slot.push(3), 3);
        assert_eq!(slot.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_remove_single_leaves_empty() {
        let mut slot = Slot::Single(7);
        assert!(slot.remove_where(|v| *v == 8).is_empty());
        assert_eq!(slot.len(), 1);
        assert_eq!(slot.remove_where(|v| *v == 7), vec![7]);
        assert!(slot.is_empty());
    }

    #[test]
    fn test_remove_where_keeps_order_of_survivors() {
        let mut slot = Slot::Multiple(vec![1, 2, 3, 2, 4]);
        assert_eq!(slot.remove_where(|v| *v == 2), vec![2, 2]);
        assert_eq!(slot.to_vec(), vec![1, 3, 4]);
    }

    #[test]
    fn test_drain_empties() {
        let mut slot = Slot::Multiple(vec![1, 2]);
        assert_eq!(slot.drain(), vec![1, 2]);
        assert!(slot.is_empty());
    }
}
