//! Demonstration driver: exercises the tree on a fixed key set and
//! dumps traversals after each mutation. Run with RUST_LOG=debug to
//! watch the split/merge/borrow tracing.

use ordered_btree::{DefaultBTree, TreeIterator};

fn print_in_order(tree: &DefaultBTree<i32, String>) {
    for entry in tree.traverse() {
        print!(" ({}, {})", entry.key, entry.value);
    }
    println!();
}

fn main() {
    env_logger::init();

    let mut tree =
        DefaultBTree::<i32, String>::new(3).expect("degree 3 is a valid configuration");

    let keys = [
        (1, "a"), (3, "b"), (7, "c"), (10, "d"), (11, "e"), (13, "f"),
        (14, "g"), (15, "h"), (18, "i"), (16, "j"), (19, "k"), (24, "l"),
        (25, "m"), (26, "n"), (21, "o"), (4, "p"), (5, "q"), (20, "r"),
        (22, "s"), (2, "t"), (17, "u"), (12, "v"), (6, "w"),
    ];
    for (key, value) in keys {
        tree.insert(key, value.to_string());
    }

    println!("Traversal of tree");
    print_in_order(&tree);

    println!("6 in tree: {}", tree.search(&6) != tree.end());

    for key in [6, 13, 7, 2] {
        tree.remove(&key);
        println!("Traversal of tree after removing {key}");
        print_in_order(&tree);
    }

    println!("16 in tree: {}", tree.search(&16) != tree.end());
    tree.remove(&16);
    println!("Traversal of tree after removing 16");
    print_in_order(&tree);
    println!(
        "16 not present in tree: {}",
        tree.search(&16) == tree.end()
    );

    println!("Reverse traversal");
    let mut it = tree.rbegin();
    while !it.equals(&tree.rend()) {
        print!(" ({}, {})", it.key(), it.value());
        it.forward();
    }
    println!();
}
