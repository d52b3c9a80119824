use std::fmt::Debug;

use super::{
    btree_traits::{Entry, KeyComparator},
    deletion::RemoveFlags,
};

/// A single tree node: a sorted run of entries plus, for internal
/// nodes, one more child than entries.
///
/// Nodes own their children exclusively; the `parent` pointer is a
/// non-owning lookup link that every structural change (split, merge,
/// borrow, root replacement) keeps in sync with the true containment
/// graph. Nodes are allocated with `Box::into_raw` and released
/// exactly once with `Box::from_raw`.
#[derive(Debug)]
pub struct Node<K, V> {
    pub entries: Vec<Entry<K, V>>,
    pub children: Vec<*mut Node<K, V>>,
    pub parent: *mut Node<K, V>,
    pub min_degree: usize,
    pub is_leaf: bool,
}

impl<K, V> Node<K, V> {
    pub fn new(min_degree: usize, parent: *mut Node<K, V>, is_leaf: bool) -> *mut Self {
        Box::into_raw(Box::new(Node {
            entries: Vec::with_capacity(2 * min_degree - 1),
            children: if is_leaf {
                Vec::new()
            } else {
                Vec::with_capacity(2 * min_degree)
            },
            parent,
            min_degree,
            is_leaf,
        }))
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() == 2 * self.min_degree - 1
    }

    /// A sibling with at least `t` entries can lend one away.
    #[inline]
    pub fn has_spare(&self) -> bool {
        self.entries.len() >= self.min_degree
    }

    /// A node at `t - 1` entries must be topped up before the removal
    /// descent may enter it.
    #[inline]
    pub fn is_deficient(&self) -> bool {
        self.entries.len() < self.min_degree
    }

    /// Index of `child` within this node's child list.
    pub fn child_index(&self, child: *const Node<K, V>) -> Option<usize> {
        self.children
            .iter()
            .position(|&c| c as *const Node<K, V> == child)
    }

    /// Follows left-most children down to a leaf.
    pub fn leftmost_leaf(&self) -> *mut Node<K, V> {
        let mut n = self as *const Node<K, V> as *mut Node<K, V>;
        unsafe {
            while !(*n).is_leaf {
                n = (&(*n).children)[0];
            }
        }
        n
    }

    /// Follows right-most children down to a leaf.
    pub fn rightmost_leaf(&self) -> *mut Node<K, V> {
        let mut n = self as *const Node<K, V> as *mut Node<K, V>;
        unsafe {
            while !(*n).is_leaf {
                n = *(*n)
                    .children
                    .last()
                    .expect("internal node always has children");
            }
        }
        n
    }
}

impl<K, V> Node<K, V>
where
    K: Clone + Debug,
    V: Clone + Debug,
{
    /// First slot whose entry key is greater than or equal to `key`.
    pub fn find_upper_bound(&self, key: &K, cmp: &impl KeyComparator<K>) -> usize {
        let mut lo = 0;
        let mut hi = self.entries.len();
        while lo < hi {
            let mid = (lo + hi) >> 1;
            if cmp.less(&self.entries[mid].key, key) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Whether the boundary slot returned by [`Self::find_upper_bound`]
    /// holds an exact match for `key`.
    fn entry_matches(&self, ind: usize, key: &K, cmp: &impl KeyComparator<K>) -> bool {
        // entries[ind].key >= key already holds, so equality is !(key < entries[ind].key)
        ind < self.entries.len() && !cmp.less(key, &self.entries[ind].key)
    }

    /// Locates `key` in the subtree rooted here. Returns the holding
    /// node and slot, or `None` if the key is absent.
    pub fn search(&self, key: &K, cmp: &impl KeyComparator<K>) -> Option<(*mut Node<K, V>, usize)> {
        let ind = self.find_upper_bound(key, cmp);

        if self.entry_matches(ind, key, cmp) {
            return Some((self as *const Node<K, V> as *mut Node<K, V>, ind));
        }

        if self.is_leaf {
            return None;
        }

        unsafe { &*self.children[ind] }.search(key, cmp)
    }

    /// Inserts `entry` into the subtree rooted here. The node must not
    /// be at capacity; full children on the descent path are split
    /// proactively so the recursion never revisits a node.
    pub fn insert_non_full(&mut self, entry: Entry<K, V>, cmp: &impl KeyComparator<K>) {
        debug_assert!(!self.is_full());

        let mut ind = self.entries.len();
        while ind > 0 && cmp.less(&entry.key, &self.entries[ind - 1].key) {
            ind -= 1;
        }

        if self.is_leaf {
            self.entries.insert(ind, entry);
            return;
        }

        if unsafe { &*self.children[ind] }.is_full() {
            self.split_child(ind);

            // the promoted median may push the new entry into the
            // freshly created right sibling
            if cmp.less(&self.entries[ind].key, &entry.key) {
                ind += 1;
            }
        }

        unsafe { &mut *self.children[ind] }.insert_non_full(entry, cmp);
    }

    /// Splits the full child at `ind` into two half-filled siblings,
    /// promoting its median entry into this node.
    pub fn split_child(&mut self, ind: usize) {
        let this: *mut Node<K, V> = self;
        let t = self.min_degree;
        let child = unsafe { &mut *self.children[ind] };
        debug_assert!(child.is_full());

        log::debug!(
            "Node::split_child on {:p} at child slot {}",
            this,
            ind
        );

        let sibling = Node::new(t, this, child.is_leaf);

        let upper = child.entries.split_off(t);
        let median = child
            .entries
            .pop()
            .expect("full child always holds a median entry");

        unsafe {
            (*sibling).entries.extend(upper);
            if !child.is_leaf {
                for grand in child.children.split_off(t) {
                    (*grand).parent = sibling;
                    (*sibling).children.push(grand);
                }
            }
        }

        self.entries.insert(ind, median);
        self.children.insert(ind + 1, sibling);
    }

    /// Removes one entry matching `key` from the subtree rooted here.
    /// Children on the descent path are topped up to at least `t`
    /// entries before the recursion enters them.
    pub fn remove(&mut self, key: &K, cmp: &impl KeyComparator<K>) -> RemoveFlags {
        let mut ind = self.find_upper_bound(key, cmp);

        if self.entry_matches(ind, key, cmp) {
            if self.is_leaf {
                self.entries.remove(ind);
            } else {
                self.remove_from_internal(ind, cmp);
            }
            return RemoveFlags::Ok;
        }

        if self.is_leaf {
            log::debug!("could not find key {:?} to remove", key);
            return RemoveFlags::NotFound;
        }

        if unsafe { &*self.children[ind] }.is_deficient() {
            let fix = self.fill_to_min_degree(ind);
            if fix.has(RemoveFlags::MergedIntoLeft) {
                // the last child was folded into its left neighbor
                ind -= 1;
            }
        }

        unsafe { &mut *self.children[ind] }.remove(key, cmp)
    }

    /// Removes the entry at slot `ind` of this internal node, replacing
    /// it with its in-order predecessor or successor when an adjacent
    /// child has entries to spare, or collapsing both children around
    /// it otherwise.
    fn remove_from_internal(&mut self, ind: usize, cmp: &impl KeyComparator<K>) {
        if unsafe { &*self.children[ind] }.has_spare() {
            let pred = unsafe { &*self.children[ind] }.max_entry_in_subtree();
            let pred_key = pred.key.clone();
            self.entries[ind] = pred;
            unsafe { &mut *self.children[ind] }.remove(&pred_key, cmp);
            return;
        }

        if unsafe { &*self.children[ind + 1] }.has_spare() {
            let succ = unsafe { &*self.children[ind + 1] }.min_entry_in_subtree();
            let succ_key = succ.key.clone();
            self.entries[ind] = succ;
            unsafe { &mut *self.children[ind + 1] }.remove(&succ_key, cmp);
            return;
        }

        let key = self.entries[ind].key.clone();
        self.merge_children(ind);
        unsafe { &mut *self.children[ind] }.remove(&key, cmp);
    }

    /// Brings the child at `ind` up to `t` entries by borrowing from a
    /// sibling with surplus, or by merging with a neighbor when both
    /// siblings sit at the minimum.
    fn fill_to_min_degree(&mut self, ind: usize) -> RemoveFlags {
        if ind != 0 && unsafe { &*self.children[ind - 1] }.has_spare() {
            self.borrow_from_prev(ind);
            return RemoveFlags::Ok;
        }

        if ind != self.entries.len() && unsafe { &*self.children[ind + 1] }.has_spare() {
            self.borrow_from_next(ind);
            return RemoveFlags::Ok;
        }

        if ind != self.entries.len() {
            self.merge_children(ind);
            return RemoveFlags::Ok;
        }

        self.merge_children(ind - 1);
        RemoveFlags::MergedIntoLeft
    }

    /// Rotates one entry from the left sibling through the separating
    /// parent entry into the child at `ind`.
    fn borrow_from_prev(&mut self, ind: usize) {
        let child_ptr = self.children[ind];
        let left_ptr = self.children[ind - 1];

        log::debug!(
            "Node::borrow_from_prev: {:p} takes from {:p} through parent {:p}",
            child_ptr,
            left_ptr,
            self as *const Node<K, V>
        );

        let child = unsafe { &mut *child_ptr };
        let left = unsafe { &mut *left_ptr };

        let stolen = left
            .entries
            .pop()
            .expect("surplus sibling has an entry to spare");
        let separator = std::mem::replace(&mut self.entries[ind - 1], stolen);
        child.entries.insert(0, separator);

        if !child.is_leaf {
            let moved = left
                .children
                .pop()
                .expect("internal sibling has a child to spare");
            unsafe { (*moved).parent = child_ptr };
            child.children.insert(0, moved);
        }
    }

    /// Rotates one entry from the right sibling through the separating
    /// parent entry into the child at `ind`.
    fn borrow_from_next(&mut self, ind: usize) {
        let child_ptr = self.children[ind];
        let right_ptr = self.children[ind + 1];

        log::debug!(
            "Node::borrow_from_next: {:p} takes from {:p} through parent {:p}",
            child_ptr,
            right_ptr,
            self as *const Node<K, V>
        );

        let child = unsafe { &mut *child_ptr };
        let right = unsafe { &mut *right_ptr };

        let stolen = right.entries.remove(0);
        let separator = std::mem::replace(&mut self.entries[ind], stolen);
        child.entries.push(separator);

        if !child.is_leaf {
            let moved = right.children.remove(0);
            unsafe { (*moved).parent = child_ptr };
            child.children.push(moved);
        }
    }

    /// Folds the separating entry at `ind` and the child at `ind + 1`
    /// into the child at `ind`; the absorbed sibling is released.
    fn merge_children(&mut self, ind: usize) {
        let child_ptr = self.children[ind];
        let sibling_ptr = self.children.remove(ind + 1);
        let separator = self.entries.remove(ind);

        log::debug!(
            "Node::merge_children: {:p} absorbs {:p} under parent {:p}",
            child_ptr,
            sibling_ptr,
            self as *const Node<K, V>
        );

        let child = unsafe { &mut *child_ptr };
        let mut sibling = unsafe { Box::from_raw(sibling_ptr) };

        child.entries.push(separator);
        child.entries.append(&mut sibling.entries);

        if !child.is_leaf {
            for grand in sibling.children.drain(..) {
                unsafe { (*grand).parent = child_ptr };
                child.children.push(grand);
            }
        }
        // the sibling box drops here with its entries and children moved out
    }

    /// Last entry of the right-most leaf below this node.
    pub fn max_entry_in_subtree(&self) -> Entry<K, V> {
        let leaf = unsafe { &*self.rightmost_leaf() };
        leaf.entries
            .last()
            .expect("leaves on a search path are never empty")
            .clone()
    }

    /// First entry of the left-most leaf below this node.
    pub fn min_entry_in_subtree(&self) -> Entry<K, V> {
        let leaf = unsafe { &*self.leftmost_leaf() };
        leaf.entries
            .first()
            .expect("leaves on a search path are never empty")
            .clone()
    }

    /// Recursively duplicates this subtree. Children are cloned with
    /// the new node as their parent, so a dangling parent link is never
    /// observable in the copy.
    pub fn clone_subtree(&self, parent: *mut Node<K, V>) -> *mut Node<K, V> {
        let node = Node::new(self.min_degree, parent, self.is_leaf);
        unsafe {
            (*node).entries.extend(self.entries.iter().cloned());
            for &child in &self.children {
                let cloned = (*child).clone_subtree(node);
                (*node).children.push(cloned);
            }
        }
        node
    }
}
