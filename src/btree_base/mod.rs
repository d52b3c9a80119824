pub mod btree;
pub mod btree_traits;
mod deletion;
pub mod iter;
mod node;
mod tree_stats;

use self::{btree::BTree, btree_traits::KeyComparator};
use std::{fmt::Debug, marker::PhantomData};

#[derive(Clone, Debug)]
pub struct DefaultKeyComparator<T> {
    _t: PhantomData<T>,
}
impl<T> KeyComparator<T> for DefaultKeyComparator<T>
where
    T: Ord + Clone + Debug,
{
    fn new() -> Self {
        Self { _t: PhantomData }
    }
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        lhs < rhs
    }
}

pub type DefaultBTree<K, V> = BTree<K, V, DefaultKeyComparator<K>>;
