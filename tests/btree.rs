use std::fmt::Debug;

use ordered_btree::{BTreeError, DefaultBTree, TreeIterator};
use rand::{seq::SliceRandom, thread_rng};

fn forward_keys<K, V>(tree: &DefaultBTree<K, V>) -> Vec<K>
where
    K: Ord + Clone + Debug,
    V: Clone + Debug,
{
    let mut out = Vec::new();
    let mut it = tree.begin();
    while !it.equals(&tree.end()) {
        out.push(it.key().clone());
        it.forward();
    }
    out
}

fn reverse_keys<K, V>(tree: &DefaultBTree<K, V>) -> Vec<K>
where
    K: Ord + Clone + Debug,
    V: Clone + Debug,
{
    let mut out = Vec::new();
    let mut it = tree.rbegin();
    while !it.equals(&tree.rend()) {
        out.push(it.key().clone());
        it.forward();
    }
    out
}

#[test]
fn insert_yields_sorted_traversal() {
    // degree 3, keys 1..=8 inserted out of order
    let mut tree = DefaultBTree::<i32, char>::new(3).unwrap();
    for (key, value) in [
        (3, 'c'),
        (1, 'a'),
        (2, 'b'),
        (5, 'e'),
        (4, 'd'),
        (8, 'h'),
        (7, 'g'),
        (6, 'f'),
    ] {
        tree.insert(key, value);
    }

    assert_eq!(tree.size(), 8);
    assert_eq!(forward_keys(&tree), vec![1, 2, 3, 4, 5, 6, 7, 8]);

    let entries = tree.traverse();
    assert_eq!(entries.len(), 8);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.key, i as i32 + 1);
        assert_eq!(entry.value, (b'a' + i as u8) as char);
    }

    tree.verify();
}

#[test]
fn remove_leaves_other_keys_intact() {
    let keys = [1, 3, 7, 10, 11, 13, 14, 15, 16, 18, 19, 24, 25, 26];
    let mut tree = DefaultBTree::<i32, i32>::new(3).unwrap();
    for &key in &keys {
        tree.insert(key, key * 10);
    }

    assert!(tree.search(&14) != tree.end());
    assert_eq!(tree.remove(&14), 1);
    assert!(tree.search(&14) == tree.end());

    for &key in keys.iter().filter(|&&k| k != 14) {
        let it = tree.search(&key);
        assert!(it != tree.end(), "key {key} must survive the removal");
        assert_eq!(*it.value(), key * 10);
    }

    assert_eq!(tree.size(), keys.len() - 1);
    tree.verify();
}

#[test]
fn reverse_traversal_mirrors_forward() {
    // degree 4, string keys
    let mut tree = DefaultBTree::<String, i32>::new(4).unwrap();
    for (key, value) in [
        ("aaa", 3),
        ("ba", 9),
        ("bb", 10),
        ("aac", 5),
        ("aab", 4),
        ("ad", 8),
        ("ac", 7),
        ("ab", 6),
        ("bc", 11),
        ("d", 12),
    ] {
        tree.insert(key.to_string(), value);
    }

    let forward = forward_keys(&tree);
    assert_eq!(forward.len(), 10);

    let mut expected = forward.clone();
    expected.reverse();
    assert_eq!(reverse_keys(&tree), expected);

    tree.verify();
}

#[test]
fn degree_below_three_is_rejected() {
    for degree in [0, 1, 2] {
        match DefaultBTree::<i32, i32>::new(degree) {
            Err(BTreeError::InvalidMinDegree(got)) => assert_eq!(got, degree),
            other => panic!("degree {degree} must be rejected, got {other:?}"),
        }
    }
    assert!(DefaultBTree::<i32, i32>::new(3).is_ok());
}

#[test]
fn duplicate_keys_coexist() {
    let mut tree = DefaultBTree::<i32, &str>::new(3).unwrap();
    tree.insert(5, "first");
    tree.insert(5, "second");
    tree.insert(1, "one");

    assert_eq!(tree.size(), 3);
    assert_eq!(forward_keys(&tree), vec![1, 5, 5]);
    tree.verify();

    assert_eq!(tree.remove(&5), 1);
    assert_eq!(tree.size(), 2);
    assert_eq!(forward_keys(&tree), vec![1, 5]);

    assert_eq!(tree.remove(&5), 1);
    assert_eq!(tree.remove(&5), 0);
    assert_eq!(tree.size(), 1);
    tree.verify();
}

#[test]
fn removing_absent_keys_is_a_no_op() {
    let mut tree = DefaultBTree::<i32, i32>::new(3).unwrap();
    assert_eq!(tree.remove(&7), 0);

    for key in 0..50 {
        tree.insert(key, key);
    }
    assert_eq!(tree.remove(&999), 0);
    assert_eq!(tree.remove(&-1), 0);
    assert_eq!(tree.size(), 50);
    assert_eq!(forward_keys(&tree), (0..50).collect::<Vec<_>>());
    tree.verify();
}

#[test]
fn size_tracks_inserts_and_successful_removes() {
    let mut tree = DefaultBTree::<i32, i32>::new(3).unwrap();
    let mut expected = 0usize;

    for key in 0..100 {
        tree.insert(key, key);
        expected += 1;
        assert_eq!(tree.size(), expected);
    }

    for key in (0..120).step_by(3) {
        expected -= tree.remove(&key);
        assert_eq!(tree.size(), expected);
    }

    tree.verify();
}

#[test]
fn deep_copy_is_independent() {
    let mut tree = DefaultBTree::<i32, i32>::new(3).unwrap();
    for key in 0..64 {
        tree.insert(key, key * 2);
    }

    let mut copy = tree.clone();
    assert_eq!(forward_keys(&tree), forward_keys(&copy));
    assert_eq!(copy.size(), tree.size());
    copy.verify();

    // mutating the copy must not leak into the original
    for key in 0..32 {
        assert_eq!(copy.remove(&key), 1);
    }
    copy.insert(1000, 0);
    assert_eq!(tree.size(), 64);
    assert_eq!(forward_keys(&tree), (0..64).collect::<Vec<_>>());

    // and vice versa
    for key in 32..64 {
        assert_eq!(tree.remove(&key), 1);
    }
    let mut copied_keys: Vec<i32> = (32..64).collect();
    copied_keys.push(1000);
    assert_eq!(forward_keys(&copy), copied_keys);

    tree.verify();
    copy.verify();
}

#[test]
fn tree_drains_to_empty_and_recovers() {
    let mut tree = DefaultBTree::<i32, i32>::new(3).unwrap();
    for key in 0..40 {
        tree.insert(key, key);
    }
    assert!(tree.get_stats().height > 1);

    let mut keys: Vec<i32> = (0..40).collect();
    keys.shuffle(&mut thread_rng());
    for key in keys {
        assert_eq!(tree.remove(&key), 1);
        tree.verify();
    }

    assert_eq!(tree.size(), 0);
    assert_eq!(tree.get_stats().height, 0);
    assert!(tree.begin() == tree.end());
    assert!(tree.rbegin() == tree.rend());
    assert!(tree.traverse().is_empty());

    tree.insert(7, 70);
    assert_eq!(tree.size(), 1);
    assert_eq!(forward_keys(&tree), vec![7]);
    tree.verify();
}

#[test]
fn invariants_hold_under_random_workloads() {
    for degree in [3, 4, 6] {
        let mut tree = DefaultBTree::<i32, i32>::new(degree).unwrap();
        let mut rng = thread_rng();

        let mut keys: Vec<i32> = (0..400).collect();
        keys.shuffle(&mut rng);
        for &key in &keys {
            tree.insert(key, key + 1);
        }
        tree.verify();
        assert_eq!(forward_keys(&tree), (0..400).collect::<Vec<_>>());

        keys.shuffle(&mut rng);
        let removed = keys.split_off(200);
        for &key in &removed {
            assert_eq!(tree.remove(&key), 1, "degree {degree}: key {key}");
            tree.verify();
        }

        for &key in &removed {
            assert!(tree.search(&key) == tree.end());
        }
        for &key in &keys {
            let it = tree.search(&key);
            assert!(it != tree.end());
            assert_eq!(*it.value(), key + 1);
        }

        let mut remaining = keys.clone();
        remaining.sort_unstable();
        assert_eq!(forward_keys(&tree), remaining);

        let mut backward = reverse_keys(&tree);
        backward.reverse();
        assert_eq!(backward, remaining);
    }
}

#[test]
fn cursor_walks_both_directions() {
    let mut tree = DefaultBTree::<i32, i32>::new(3).unwrap();
    for key in 0..25 {
        tree.insert(key, key);
    }

    // forward pass over internal and leaf positions alike
    let forward = forward_keys(&tree);
    assert_eq!(forward, (0..25).collect::<Vec<_>>());

    // walking back from the end sentinel revisits every entry
    let mut it = tree.end();
    let mut backward = Vec::new();
    for _ in 0..25 {
        it.backward();
        backward.push(*it.key());
    }
    backward.reverse();
    assert_eq!(backward, forward);

    // retreating from the first entry stays put
    let mut first = tree.begin();
    first.backward();
    assert!(first == tree.begin());

    // advancing the end sentinel stays put
    let mut sentinel = tree.end();
    sentinel.forward();
    assert!(sentinel == tree.end());
}

#[test]
fn values_can_be_mutated_through_the_cursor() {
    let mut tree = DefaultBTree::<i32, String>::new(3).unwrap();
    for key in 0..10 {
        tree.insert(key, format!("v{key}"));
    }

    let mut it = tree.search(&4);
    assert!(it != tree.end());
    *it.value_mut() = "patched".to_string();

    let found = tree.search(&4);
    assert_eq!(found.value(), "patched");
    assert_eq!(tree.size(), 10);
    tree.verify();
}

#[test]
fn search_positions_support_iteration() {
    let mut tree = DefaultBTree::<i32, i32>::new(3).unwrap();
    for key in 0..50 {
        tree.insert(key, key);
    }

    // a hit may land on an internal node; stepping from it must still
    // produce the in-order successor and predecessor
    for key in 1..49 {
        let mut fwd = tree.search(&key);
        fwd.forward();
        assert_eq!(*fwd.key(), key + 1);

        let mut back = tree.search(&key);
        back.backward();
        assert_eq!(*back.key(), key - 1);
    }
}
