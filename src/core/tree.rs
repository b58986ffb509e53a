//! # Pattern tree - namespaced wildcard storage.
//!
//! A trie keyed by segment. Listeners live in a bag (a [`Slot`]) on the node where
//! their pattern's last segment ends.
//!
//! ```text
//! on("ns.*")        on("ns.**")        on("ns.*.c.**")
//!
//! root
//!  └─ "ns"
//!      ├─ "*"   [bag: ns.*]
//!      │   └─ "c"
//!      │       └─ "**"  [bag: ns.*.c.**]
//!      └─ "**"  [bag: ns.**]
//! ```
//!
//! ## Matching an emitted event `s0.s1…sn`
//! At every node, for the current segment `si`, all of the following are explored:
//! - the literal child `si` (consumes one segment);
//! - the `*` child (consumes exactly one segment);
//! - the `**` child, entered after consuming `k ∈ 0..=rest` segments.
//!
//! When no segments remain the node's bag is collected. A listener may be reached
//! through several paths; results are deduplicated by identity and ordered by
//! registration sequence.

use std::collections::{HashMap, HashSet};

use crate::core::slot::{Identity, Slot};
use crate::events::{DEEP_WILDCARD, SINGLE_WILDCARD};

#[derive(Debug)]
struct Node<T> {
    children: HashMap<String, Node<T>>,
    bag: Option<Slot<T>>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            bag: None,
        }
    }
}

impl<T> Node<T> {
    fn is_vacant(&self) -> bool {
        self.bag.is_none() && self.children.is_empty()
    }

    /// Visits every node reached by matching `segs[i..]`.
    fn visit<'a>(&'a self, segs: &[&str], i: usize, f: &mut dyn FnMut(&'a Node<T>)) {
        if i == segs.len() {
            f(self);
        } else {
            let seg = segs[i];
            if !is_wildcard(seg) {
                if let Some(child) = self.children.get(seg) {
                    child.visit(segs, i + 1, f);
                }
            }
            if seg != DEEP_WILDCARD {
                if let Some(child) = self.children.get(SINGLE_WILDCARD) {
                    child.visit(segs, i + 1, f);
                }
            }
        }
        if let Some(deep) = self.children.get(DEEP_WILDCARD) {
            for j in i..=segs.len() {
                deep.visit(segs, j, f);
            }
        }
    }

    /// Mutable twin of [`Node::visit`]. Children left vacant along the visited
    /// paths are dropped on the way back up.
    fn sweep(&mut self, segs: &[&str], i: usize, f: &mut dyn FnMut(&mut Node<T>)) {
        if i == segs.len() {
            f(self);
            if self.bag.as_ref().is_some_and(Slot::is_empty) {
                self.bag = None;
            }
        } else {
            let seg = segs[i];
            if !is_wildcard(seg) {
                self.sweep_child(seg, segs, i + 1, f);
            }
            if seg != DEEP_WILDCARD {
                self.sweep_child(SINGLE_WILDCARD, segs, i + 1, f);
            }
        }
        if let Some(deep) = self.children.get_mut(DEEP_WILDCARD) {
            for j in i..=segs.len() {
                deep.sweep(segs, j, f);
            }
            if deep.is_vacant() {
                self.children.remove(DEEP_WILDCARD);
            }
        }
    }

    fn sweep_child(&mut self, key: &str, segs: &[&str], i: usize, f: &mut dyn FnMut(&mut Node<T>)) {
        if let Some(child) = self.children.get_mut(key) {
            child.sweep(segs, i, f);
            if child.is_vacant() {
                self.children.remove(key);
            }
        }
    }

    #[cfg(test)]
    fn node_count(&self) -> usize {
        self.children.values().map(|c| 1 + c.node_count()).sum()
    }

    fn collect_all<'a>(&'a self, out: &mut Vec<&'a T>) {
        if let Some(bag) = &self.bag {
            out.extend(bag.iter());
        }
        for child in self.children.values() {
            child.collect_all(out);
        }
    }
}

/// A `*` segment consumes one segment, a `**` segment any number of them.
fn is_wildcard(seg: &str) -> bool {
    seg == SINGLE_WILDCARD || seg == DEEP_WILDCARD
}

/// Namespaced listener storage with `*` / `**` matching.
#[derive(Debug)]
pub(crate) struct PatternTree<T> {
    root: Node<T>,
}

impl<T> Default for PatternTree<T> {
    fn default() -> Self {
        Self {
            root: Node::default(),
        }
    }
}

impl<T> PatternTree<T> {
    /// Stores `item` at the node addressed by `pattern`; returns that bag's length.
    pub fn insert(&mut self, pattern: &[&str], item: T) -> usize {
        let mut node = &mut self.root;
        for seg in pattern {
            node = node.children.entry((*seg).to_string()).or_default();
        }
        match &mut node.bag {
            Some(bag) => bag.push(item),
            None => {
                node.bag = Some(Slot::Single(item));
                1
            }
        }
    }

    /// Removes items matching `pred` from every bag reached by `pattern`.
    ///
    /// The pattern is matched like an emitted event, so wildcard listeners covering
    /// it are visited too. Bags and nodes emptied on the visited paths are pruned.
    pub fn remove_where(&mut self, pattern: &[&str], mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
        let mut removed = Vec::new();
        self.root.sweep(pattern, 0, &mut |node| {
            if let Some(bag) = node.bag.as_mut() {
                removed.extend(bag.remove_where(&mut pred));
            }
        });
        removed
    }

    /// Number of listeners stored exactly at `pattern` (no wildcard expansion).
    #[cfg(test)]
    pub fn len_at(&self, pattern: &[&str]) -> usize {
        let mut node = &self.root;
        for seg in pattern {
            match node.children.get(*seg) {
                Some(child) => node = child,
                None => return 0,
            }
        }
        node.bag.as_ref().map_or(0, Slot::len)
    }

    #[cfg(test)]
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// True if nothing is stored.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.root.is_vacant()
    }

    /// Drops everything.
    pub fn clear(&mut self) -> Vec<T> {
        let mut out = Vec::new();
        let mut stack = vec![std::mem::take(&mut self.root)];
        while let Some(mut node) = stack.pop() {
            if let Some(mut bag) = node.bag.take() {
                out.extend(bag.drain());
            }
            stack.extend(node.children.into_values());
        }
        out
    }
}

impl<T: Clone + Identity> PatternTree<T> {
    /// Every item reachable for `event`, deduplicated, in registration order.
    pub fn matches(&self, event: &[&str]) -> Vec<T> {
        let mut seen: HashSet<u64> = HashSet::new();
        let mut out: Vec<T> = Vec::new();
        self.root.visit(event, 0, &mut |node| {
            if let Some(bag) = &node.bag {
                for item in bag.iter() {
                    if seen.insert(item.identity()) {
                        out.push(item.clone());
                    }
                }
            }
        });
        out.sort_by_key(Identity::identity);
        out
    }

    /// Every stored item, in registration order.
    pub fn items(&self) -> Vec<T> {
        let mut refs = Vec::new();
        self.root.collect_all(&mut refs);
        let mut out: Vec<T> = refs.into_iter().cloned().collect();
        out.sort_by_key(Identity::identity);
        out
    }
}
