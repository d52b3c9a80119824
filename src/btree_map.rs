//! A unique-key map facade over the duplicate-tolerant core tree.

use std::fmt::Debug;

use crate::{
    btree_base::{btree::BTree, btree_traits::KeyComparator, DefaultKeyComparator},
    error::Result,
};

/// Map semantics on top of [`BTree`]: `put` replaces the value of an
/// existing key instead of adding a coexisting entry.
pub struct BTreeMap<K, V, C = DefaultKeyComparator<K>> {
    _tree: BTree<K, V, C>,
}

impl<K, V, C> BTreeMap<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    pub fn new(min_degree: usize) -> Result<Self> {
        Ok(Self {
            _tree: BTree::new(min_degree)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self._tree.empty()
    }

    pub fn len(&self) -> usize {
        self._tree.size()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self._tree.exists(key)
    }

    pub fn put(&mut self, key: K, value: V) {
        if self._tree.exists(&key) {
            self._tree.remove(&key);
        }
        self._tree.insert(key, value);
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let it = self._tree.search(key);
        if it == self._tree.end() {
            None
        } else {
            let entry = unsafe { &(&(*it.curr_node).entries)[it.curr_slot] };
            Some(&entry.value)
        }
    }

    /// Removes the key if present; returns the number of entries
    /// removed (0 or 1).
    pub fn remove(&mut self, key: &K) -> usize {
        self._tree.remove(key)
    }
}
