//! An in-memory ordered associative container backed by a B-tree with a
//! runtime-fixed minimum degree.
//!
//! The core lives in [`btree_base`]: [`btree_base::btree::BTree`] stores
//! key/value entries in sorted order and hands out bidirectional cursors
//! over them. [`btree_map`] layers a unique-key map facade on top.
//!
//! The tree is single-threaded by design; nodes are wired together with
//! raw pointers, so the container is neither `Send` nor `Sync`.

pub mod btree_base;
pub mod btree_map;
pub mod error;

pub use btree_base::{btree::BTree, btree_traits::Entry, iter::TreeIterator, DefaultBTree};
pub use btree_map::BTreeMap;
pub use error::{BTreeError, Result};
