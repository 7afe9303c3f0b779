use core::fmt;
use core::num::NonZeroU32;

use crate::error::{SfError, SfResult};

/// 1-based index of a link or node inside a loaded solver network.
///
/// The external solver numbers elements from 1; result arrays are 0-based.
/// Keeping the two apart in the type system avoids off-by-one reads.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementIndex(NonZeroU32);

impl ElementIndex {
    /// Wrap a 1-based solver index.
    pub fn new(one_based: usize) -> SfResult<Self> {
        u32::try_from(one_based)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(SfError::ZeroIndex { index: one_based })
    }

    /// Build from a 0-based position (e.g. enumerate over the solver's name list).
    pub fn from_position(position: usize) -> SfResult<Self> {
        Self::new(position + 1)
    }

    /// The solver's 1-based index.
    pub fn get(self) -> usize {
        self.0.get() as usize
    }

    /// Column in a 0-based result array.
    pub fn column(self) -> usize {
        self.get() - 1
    }
}

impl fmt::Debug for ElementIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementIndex({})", self.get())
    }
}

impl fmt::Display for ElementIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Index of a link (pipe, pump, valve).
pub type LinkIndex = ElementIndex;
/// Index of a node (junction, reservoir).
pub type NodeIndex = ElementIndex;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_and_column_round_trip() {
        for p in [0_usize, 1, 2, 41, 10_000] {
            let idx = ElementIndex::from_position(p).unwrap();
            assert_eq!(idx.get(), p + 1);
            assert_eq!(idx.column(), p);
        }
    }

    #[test]
    fn zero_is_rejected() {
        assert_eq!(
            ElementIndex::new(0).unwrap_err(),
            SfError::ZeroIndex { index: 0 }
        );
    }

    #[test]
    fn option_index_is_small() {
        assert_eq!(
            core::mem::size_of::<ElementIndex>(),
            core::mem::size_of::<Option<ElementIndex>>()
        );
    }
}
