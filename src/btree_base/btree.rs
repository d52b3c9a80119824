use std::{fmt::Debug, ptr::null_mut};

use super::{
    btree_traits::{Entry, KeyComparator},
    deletion::RemoveFlags,
    iter::{BTreeIterator, BTreeReverseIterator},
    node::Node,
    tree_stats::TreeStats,
    DefaultKeyComparator,
};
use crate::error::{BTreeError, Result};

/// Smallest minimum degree the tree accepts.
pub const MIN_DEGREE: usize = 3;

/// An ordered key/value container over a B-tree with a runtime-fixed
/// minimum degree `t`. Every non-root node holds between `t - 1` and
/// `2t - 1` entries and all leaves sit at the same depth.
///
/// Inserting an already present key adds a second coexisting entry;
/// the relative order among duplicates is unspecified and `search`
/// returns an unspecified one of the matches.
///
/// The tree owns its nodes exclusively through raw pointers and is
/// therefore neither `Send` nor `Sync`; all access must come from a
/// single thread.
pub struct BTree<K, V, C = DefaultKeyComparator<K>> {
    root_: *mut Node<K, V>,
    min_degree_: usize,
    stats_: TreeStats,
    key_less: C,
}

/// Convenient key comparison functions generated from key_less
impl<K, V, C> BTree<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    pub fn key_comp(&self) -> &C {
        &self.key_less
    }

    fn key_less(&self, a: &K, b: &K) -> bool {
        self.key_less.less(a, b)
    }

    fn key_lessequal(&self, a: &K, b: &K) -> bool {
        !self.key_less.less(b, a)
    }
}

impl<K, V, C> Drop for BTree<K, V, C> {
    fn drop(&mut self) {
        if !self.root_.is_null() {
            Self::clear_recursive(self.root_);
            Self::free_node(self.root_);

            self.root_ = null_mut();
            self.stats_ = TreeStats::new();
        }
    }
}

/// Node deallocation: children are torn down strictly before their
/// parent, and every node is freed exactly once.
impl<K, V, C> BTree<K, V, C> {
    fn free_node(node: *mut Node<K, V>) {
        drop(unsafe { Box::from_raw(node) });
    }

    fn clear_recursive(node: *mut Node<K, V>) {
        let n = unsafe { &*node };
        if !n.is_leaf {
            for &child in &n.children {
                Self::clear_recursive(child);
                Self::free_node(child);
            }
        }
    }
}

/// Access functions to the item count
impl<K, V, C> BTree<K, V, C> {
    pub fn size(&self) -> usize {
        self.stats_.size
    }

    pub fn empty(&self) -> bool {
        self.size() == 0
    }

    pub fn min_degree(&self) -> usize {
        self.min_degree_
    }

    pub fn get_stats(&self) -> &TreeStats {
        &self.stats_
    }
}

/// Construction and queries descending from the root
impl<K, V, C> BTree<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    /// Creates an empty tree with the given minimum degree. Degrees
    /// below [`MIN_DEGREE`] are rejected and no tree is produced.
    pub fn new(min_degree: usize) -> Result<Self> {
        if min_degree < MIN_DEGREE {
            return Err(BTreeError::InvalidMinDegree(min_degree));
        }

        Ok(Self {
            root_: null_mut(),
            min_degree_: min_degree,
            stats_: TreeStats::new(),
            key_less: C::new(),
        })
    }

    /// Whether at least one entry with this key is present. The same
    /// as `search(k) != end()`.
    pub fn exists(&self, key: &K) -> bool {
        !self.root_.is_null() && unsafe { &*self.root_ }.search(key, &self.key_less).is_some()
    }

    /// Locates a key and returns an iterator on the matching entry,
    /// or `end()` if it is absent.
    pub fn search(&self, key: &K) -> BTreeIterator<K, V> {
        if self.root_.is_null() {
            return self.end();
        }

        match unsafe { &*self.root_ }.search(key, &self.key_less) {
            Some((node, slot)) => BTreeIterator::new(node, slot),
            None => self.end(),
        }
    }

    /// Iterator on the first entry in key order. Equals `end()` for an
    /// empty tree.
    pub fn begin(&self) -> BTreeIterator<K, V> {
        if self.root_.is_null() {
            return BTreeIterator::new(null_mut(), 0);
        }

        BTreeIterator::new(unsafe { &*self.root_ }.leftmost_leaf(), 0)
    }

    /// The end sentinel: the right-most leaf paired with a slot equal
    /// to its entry count.
    pub fn end(&self) -> BTreeIterator<K, V> {
        if self.root_.is_null() {
            return BTreeIterator::new(null_mut(), 0);
        }

        let leaf = unsafe { &*self.root_ }.rightmost_leaf();
        BTreeIterator::new(leaf, unsafe { &*leaf }.entries.len())
    }

    /// Reverse iterator on the last entry in key order.
    pub fn rbegin(&self) -> BTreeReverseIterator<K, V> {
        BTreeReverseIterator::new(self.end())
    }

    /// The reverse end sentinel.
    pub fn rend(&self) -> BTreeReverseIterator<K, V> {
        BTreeReverseIterator::new(self.begin())
    }

    /// The full in-order sequence, cloned out for external reporting.
    pub fn traverse(&self) -> Vec<Entry<K, V>> {
        let mut out = Vec::with_capacity(self.size());
        if !self.root_.is_null() {
            Self::traverse_node(self.root_, &mut out);
        }
        out
    }

    fn traverse_node(node: *mut Node<K, V>, out: &mut Vec<Entry<K, V>>) {
        let n = unsafe { &*node };
        for (i, entry) in n.entries.iter().enumerate() {
            if !n.is_leaf {
                Self::traverse_node(n.children[i], out);
            }
            out.push(entry.clone());
        }
        if !n.is_leaf {
            Self::traverse_node(n.children[n.entries.len()], out);
        }
    }
}

/// Insertion
impl<K, V, C> BTree<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    /// Inserts a key/value pair. Never fails and never overwrites: an
    /// equal key already in the tree keeps its own entry.
    pub fn insert(&mut self, key: K, value: V) {
        self.stats_.size += 1;
        let entry = Entry::new(key, value);

        if self.root_.is_null() {
            let root = Node::new(self.min_degree_, null_mut(), true);
            unsafe { (*root).entries.push(entry) };
            self.root_ = root;
            self.stats_.height = 1;
            return;
        }

        if unsafe { &*self.root_ }.is_full() {
            self.grow_root(entry);
            return;
        }

        unsafe { &mut *self.root_ }.insert_non_full(entry, &self.key_less);
    }

    /// Handles the one insertion case only the root requires: a full
    /// root gets a fresh empty parent, is split once, and the entry
    /// descends into whichever half it belongs.
    fn grow_root(&mut self, entry: Entry<K, V>) {
        log::debug!(
            "BTree::grow_root on {:p}, height {} -> {}",
            self.root_,
            self.stats_.height,
            self.stats_.height + 1
        );

        let new_root = Node::new(self.min_degree_, null_mut(), false);
        unsafe {
            (*new_root).children.push(self.root_);
            (*self.root_).parent = new_root;
            (*new_root).split_child(0);

            let half = if self.key_lessequal(&entry.key, &(&(*new_root).entries)[0].key) {
                0
            } else {
                1
            };
            (*(&mut (*new_root).children)[half]).insert_non_full(entry, &self.key_less);
        }

        self.root_ = new_root;
        self.stats_.height += 1;
    }
}

/// Removal
impl<K, V, C> BTree<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    /// Removes one entry matching `key`. Returns the number of entries
    /// removed (0 or 1); an absent key is a normal outcome, not an
    /// error.
    pub fn remove(&mut self, key: &K) -> usize {
        log::debug!("BTree::remove({:?}) on tree of size {}", key, self.size());

        if self.root_.is_null() {
            return 0;
        }

        let result = unsafe { &mut *self.root_ }.remove(key, &self.key_less);
        let removed = if result.has(RemoveFlags::NotFound) { 0 } else { 1 };
        self.stats_.size -= removed;

        if unsafe { &*self.root_ }.entries.is_empty() {
            self.shrink_root();
        }

        removed
    }

    /// Handles the one removal case only the root requires: an emptied
    /// internal root is replaced by its sole remaining child, an
    /// emptied leaf root leaves the tree empty.
    fn shrink_root(&mut self) {
        let old_root = self.root_;
        unsafe {
            if (*old_root).is_leaf {
                self.root_ = null_mut();
            } else {
                self.root_ = (&(*old_root).children)[0];
                (*self.root_).parent = null_mut();
            }
            // detach before freeing so the surviving child is not torn down
            (*old_root).children.clear();
        }
        Self::free_node(old_root);
        self.stats_.height -= 1;

        log::debug!("BTree::shrink_root, height now {}", self.stats_.height);
    }
}

/// Deep copy: every node is duplicated and every parent link rebuilt
/// to point into the clone, whose lifetime is wholly independent of
/// the source's.
impl<K, V, C> Clone for BTree<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    fn clone(&self) -> Self {
        let root = if self.root_.is_null() {
            null_mut()
        } else {
            unsafe { &*self.root_ }.clone_subtree(null_mut())
        };

        Self {
            root_: root,
            min_degree_: self.min_degree_,
            stats_: self.stats_.clone(),
            key_less: self.key_less.clone(),
        }
    }
}

/// Structural self-checks
impl<K, V, C> BTree<K, V, C>
where
    K: Clone + Debug,
    V: Clone + Debug,
    C: KeyComparator<K>,
{
    /// Walks the whole tree and asserts every structural invariant:
    /// uniform leaf depth, fanout bounds, ascending entry order, key
    /// separation around parent entries, consistent parent links and
    /// a size counter matching the actual entry count. A debugging and
    /// test aid; panics on the first violation.
    pub fn verify(&self) {
        if self.root_.is_null() {
            assert_eq!(self.stats_.size, 0, "empty tree must report size 0");
            assert_eq!(self.stats_.height, 0, "empty tree must report height 0");
            return;
        }

        let counted = self.verify_node(self.root_, null_mut(), 1);
        assert_eq!(
            counted, self.stats_.size,
            "entry count must match the size counter"
        );
    }

    fn verify_node(
        &self,
        node: *mut Node<K, V>,
        expected_parent: *mut Node<K, V>,
        depth: usize,
    ) -> usize {
        let n = unsafe { &*node };
        let max_entries = 2 * self.min_degree_ - 1;

        assert_eq!(n.parent, expected_parent, "parent link out of sync");
        assert!(n.entries.len() <= max_entries, "node above capacity");
        assert_eq!(n.min_degree, self.min_degree_, "node degree mismatch");
        if !std::ptr::eq(node, self.root_) {
            assert!(
                n.entries.len() >= self.min_degree_ - 1,
                "non-root node below minimum fill"
            );
        } else {
            assert!(!n.entries.is_empty(), "non-null root must hold an entry");
        }

        for pair in n.entries.windows(2) {
            assert!(
                !self.key_less(&pair[1].key, &pair[0].key),
                "entries must be ascending"
            );
        }

        if n.is_leaf {
            assert!(n.children.is_empty(), "leaf must not have children");
            assert_eq!(
                depth, self.stats_.height,
                "every leaf must sit at the same depth"
            );
            return n.entries.len();
        }

        assert_eq!(
            n.children.len(),
            n.entries.len() + 1,
            "internal node must have one more child than entries"
        );

        let mut count = n.entries.len();
        for (i, &child) in n.children.iter().enumerate() {
            count += self.verify_node(child, node, depth + 1);

            let c = unsafe { &*child };
            if i < n.entries.len() {
                let child_max = c.max_entry_in_subtree();
                assert!(
                    self.key_lessequal(&child_max.key, &n.entries[i].key),
                    "left subtree keys must not exceed the separator"
                );
            }
            if i > 0 {
                let child_min = c.min_entry_in_subtree();
                assert!(
                    self.key_lessequal(&n.entries[i - 1].key, &child_min.key),
                    "right subtree keys must not precede the separator"
                );
            }
        }

        count
    }
}

/// Debug
impl<K: Debug, V: Debug, C> BTree<K, V, C> {
    fn print_node(
        f: &mut std::fmt::Formatter<'_>,
        node: *mut Node<K, V>,
        depth: usize,
    ) -> std::fmt::Result {
        let n = unsafe { &*node };

        for _ in 0..depth {
            write!(f, "  ")?;
        }
        writeln!(
            f,
            "node {:p} leaf {} entries {}",
            n,
            n.is_leaf,
            n.entries.len()
        )?;

        for _ in 0..depth {
            write!(f, "  ")?;
        }
        for entry in &n.entries {
            write!(f, " {:?}", entry.key)?;
        }
        writeln!(f)?;

        if !n.is_leaf {
            for &child in &n.children {
                Self::print_node(f, child, depth + 1)?;
            }
        }

        Ok(())
    }
}

impl<K: Debug, V: Debug, C> Debug for BTree<K, V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.root_.is_null() {
            Self::print_node(f, self.root_, 0)?;
        }
        Ok(())
    }
}
