use std::fmt::Debug;

use super::{btree_traits::Entry, node::Node};

/// A bidirectional cursor over tree entries.
///
/// A cursor stays valid only until the next structural mutation of the
/// tree it came from; no invalidation detection is performed.
pub trait TreeIterator<K, V>: Clone + Debug {
    fn key(&self) -> &K;
    fn value(&self) -> &V;
    fn forward(&mut self) -> &mut Self;
    fn backward(&mut self) -> &mut Self;
    fn equals(&self, other: &Self) -> bool;
}

/// In-order cursor: a node plus a slot index within it. The end
/// sentinel is the right-most leaf with a slot equal to its entry
/// count (or a null node for the empty tree).
pub struct BTreeIterator<K, V> {
    pub curr_node: *mut Node<K, V>,
    pub curr_slot: usize,
}

impl<K, V> BTreeIterator<K, V> {
    pub fn new(node: *mut Node<K, V>, slot: usize) -> Self {
        Self {
            curr_node: node,
            curr_slot: slot,
        }
    }

    /// The entry under the cursor. Must not be called on a sentinel.
    pub fn entry(&self) -> &Entry<K, V> {
        unsafe { &(&(*self.curr_node).entries)[self.curr_slot] }
    }

    /// In-place mutable access to the value under the cursor. The key
    /// is deliberately not reachable this way: rewriting it would break
    /// the ordering invariant.
    pub fn value_mut(&mut self) -> &mut V {
        unsafe { &mut (&mut (*self.curr_node).entries)[self.curr_slot].value }
    }
}

impl<K, V> Clone for BTreeIterator<K, V> {
    fn clone(&self) -> Self {
        Self {
            curr_node: self.curr_node,
            curr_slot: self.curr_slot,
        }
    }
}

impl<K, V> PartialEq for BTreeIterator<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.curr_node == other.curr_node && self.curr_slot == other.curr_slot
    }
}

impl<K, V> Eq for BTreeIterator<K, V> {}

impl<K, V> Debug for BTreeIterator<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BTreeIterator({:p}, {})", self.curr_node, self.curr_slot)
    }
}

impl<K, V> TreeIterator<K, V> for BTreeIterator<K, V> {
    #[inline]
    fn key(&self) -> &K {
        unsafe { &(&(*self.curr_node).entries)[self.curr_slot].key }
    }

    #[inline]
    fn value(&self) -> &V {
        unsafe { &(&(*self.curr_node).entries)[self.curr_slot].value }
    }

    /// Advances to the in-order successor: down to the left-most leaf
    /// of the subtree following the current slot, or up along parent
    /// links until a boundary entry lies to this subtree's right.
    /// Exhausting the climb at the root restores the end sentinel.
    fn forward(&mut self) -> &mut Self {
        if self.curr_node.is_null() {
            return self;
        }

        unsafe {
            if self.curr_slot == (*self.curr_node).entries.len() {
                return self;
            }

            if !(*self.curr_node).is_leaf {
                let child = (&(*self.curr_node).children)[self.curr_slot + 1];
                self.curr_node = (*child).leftmost_leaf();
                self.curr_slot = 0;
                return self;
            }

            let leaf = self.curr_node;
            self.curr_slot += 1;

            while !(*self.curr_node).parent.is_null()
                && self.curr_slot == (*self.curr_node).entries.len()
            {
                let parent = (*self.curr_node).parent;
                self.curr_slot = (*parent)
                    .child_index(self.curr_node)
                    .expect("parent link out of sync");
                self.curr_node = parent;
            }

            if self.curr_slot == (*self.curr_node).entries.len() {
                // climbed past the root: this leaf was the right-most one
                self.curr_node = leaf;
                self.curr_slot = (*leaf).entries.len();
            }
        }

        self
    }

    /// Retreats to the in-order predecessor: down to the right-most
    /// leaf of the subtree preceding the current slot, a plain
    /// decrement within a leaf, or up along parent links while this
    /// node is its parent's left-most child. Stays put on the first
    /// entry of the tree.
    fn backward(&mut self) -> &mut Self {
        if self.curr_node.is_null() {
            return self;
        }

        unsafe {
            if !(*self.curr_node).is_leaf {
                let child = (&(*self.curr_node).children)[self.curr_slot];
                self.curr_node = (*child).rightmost_leaf();
                self.curr_slot = (*self.curr_node).entries.len() - 1;
                return self;
            }

            if self.curr_slot > 0 {
                self.curr_slot -= 1;
                return self;
            }

            let mut node = self.curr_node;
            loop {
                let parent = (*node).parent;
                if parent.is_null() {
                    // every ancestor was entered leftmost: this is the
                    // first entry, stay put
                    break;
                }
                let ind = (*parent)
                    .child_index(node)
                    .expect("parent link out of sync");
                if ind != 0 {
                    self.curr_node = parent;
                    self.curr_slot = ind - 1;
                    break;
                }
                node = parent;
            }
        }

        self
    }

    fn equals(&self, other: &Self) -> bool {
        self == other
    }
}

/// Reverse in-order cursor. Holds a forward cursor positioned one past
/// the entry it refers to, so `rbegin` wraps `end()` and `rend` wraps
/// `begin()`; stepping forward retreats the base.
pub struct BTreeReverseIterator<K, V> {
    pub base: BTreeIterator<K, V>,
}

impl<K, V> BTreeReverseIterator<K, V> {
    pub fn new(base: BTreeIterator<K, V>) -> Self {
        Self { base }
    }
}

impl<K, V> Clone for BTreeReverseIterator<K, V> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
        }
    }
}

impl<K, V> PartialEq for BTreeReverseIterator<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<K, V> Eq for BTreeReverseIterator<K, V> {}

impl<K, V> Debug for BTreeReverseIterator<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BTreeReverseIterator({:?})", self.base)
    }
}

impl<K, V> BTreeReverseIterator<K, V> {
    fn referenced(&self) -> BTreeIterator<K, V> {
        let mut pos = self.base.clone();
        pos.backward();
        pos
    }
}

impl<K, V> TreeIterator<K, V> for BTreeReverseIterator<K, V> {
    fn key(&self) -> &K {
        let pos = self.referenced();
        unsafe { &(&(*pos.curr_node).entries)[pos.curr_slot].key }
    }

    fn value(&self) -> &V {
        let pos = self.referenced();
        unsafe { &(&(*pos.curr_node).entries)[pos.curr_slot].value }
    }

    fn forward(&mut self) -> &mut Self {
        self.base.backward();
        self
    }

    fn backward(&mut self) -> &mut Self {
        self.base.forward();
        self
    }

    fn equals(&self, other: &Self) -> bool {
        self == other
    }
}
