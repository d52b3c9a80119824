use std::fmt::Debug;

// Traits bound
pub trait KeyComparator<T>: Clone + Debug {
    fn new() -> Self;
    fn less(&self, lhs: &T, rhs: &T) -> bool;
}

/// A key together with its associated value. Ordering and equality are
/// defined solely by the key; two entries with equal keys compare equal
/// no matter what their values are.
#[derive(Clone, Debug)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<K: Ord, V> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Ord, V> Eq for Entry<K, V> {}

impl<K: Ord, V> PartialOrd for Entry<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> Ord for Entry<K, V> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

#[cfg(test)]
#[test]
fn test_entry_ordering_ignores_value() {
    let a = Entry::new(1, "x");
    let b = Entry::new(1, "y");
    let c = Entry::new(2, "x");
    assert_eq!(a, b);
    assert!(a < c);
    assert!(c > b);
}
