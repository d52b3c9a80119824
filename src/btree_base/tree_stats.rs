/// Bookkeeping the tree maintains alongside the node structure.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    /// Number of entries currently stored
    pub size: usize,
    /// Number of node levels; 0 for the empty tree, 1 for a lone leaf root
    pub height: usize,
}

impl TreeStats {
    pub fn new() -> Self {
        Self { size: 0, height: 0 }
    }
}
