use bitmask_enum::bitmask;

/// Outcome flags for the removal descent.
///
/// `NotFound` propagates "key absent" back to the tree without touching
/// the structure. `MergedIntoLeft` is reported by the rebalancing step
/// when the descent child was merged into its left neighbor, so the
/// caller has to shift its descent index left by one to keep tracking
/// the surviving node.
#[bitmask(u8)]
pub enum RemoveFlags {
    Ok = 0,
    NotFound = 1,
    MergedIntoLeft = 2,
}

impl RemoveFlags {
    pub fn has(&self, flag: RemoveFlags) -> bool {
        self.contains(flag)
    }
}
