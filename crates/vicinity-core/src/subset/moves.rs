//! Subset moves.

use std::any::Any;

use smallvec::SmallVec;

use crate::error::Result;
use crate::neigh::Move;

use super::SubsetSolution;

/// Inline storage for the ID lists of a multi-swap.
type IdList = SmallVec<[u32; 4]>;

/// A move on a [`SubsetSolution`]: a set of IDs to select and a set of IDs
/// to deselect.
///
/// All variants dispatch through a single [`Move`] implementation. A move is
/// applicable when every added ID is currently unselected and every deleted
/// ID is currently selected; applying it otherwise fails with a
/// [`SolutionModification`](crate::error::VicinityError::SolutionModification)
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubsetMove {
    /// Selects a single currently unselected ID.
    Addition { id: u32 },
    /// Deselects a single currently selected ID.
    Deletion { id: u32 },
    /// Replaces a selected ID with an unselected one.
    Swap { add: u32, delete: u32 },
    /// Simultaneously swaps k disjoint added IDs against k deleted IDs.
    DisjointMultiSwap { add: IdList, delete: IdList },
}

impl SubsetMove {
    /// Creates an addition move.
    pub fn addition(id: u32) -> Self {
        SubsetMove::Addition { id }
    }

    /// Creates a deletion move.
    pub fn deletion(id: u32) -> Self {
        SubsetMove::Deletion { id }
    }

    /// Creates a swap move.
    ///
    /// # Panics
    ///
    /// Panics if both IDs are equal.
    pub fn swap(add: u32, delete: u32) -> Self {
        assert!(add != delete, "cannot swap ID {add} with itself");
        SubsetMove::Swap { add, delete }
    }

    /// Creates a multi-swap move of k added against k deleted IDs.
    ///
    /// # Panics
    ///
    /// Panics if the lists are empty, of unequal length, not disjoint, or
    /// contain duplicates.
    pub fn disjoint_multi_swap(
        add: impl IntoIterator<Item = u32>,
        delete: impl IntoIterator<Item = u32>,
    ) -> Self {
        let add: IdList = add.into_iter().collect();
        let delete: IdList = delete.into_iter().collect();
        assert!(!add.is_empty(), "a multi-swap requires at least one swapped pair");
        assert_eq!(
            add.len(),
            delete.len(),
            "a multi-swap requires as many added as deleted IDs"
        );
        let mut seen: IdList = add.clone();
        seen.extend(delete.iter().copied());
        seen.sort_unstable();
        let unique = seen.windows(2).all(|w| w[0] != w[1]);
        assert!(unique, "added and deleted IDs must be disjoint and free of duplicates");
        SubsetMove::DisjointMultiSwap { add, delete }
    }

    /// The IDs this move selects.
    pub fn added_ids(&self) -> IdList {
        match self {
            SubsetMove::Addition { id } => IdList::from_slice(&[*id]),
            SubsetMove::Deletion { .. } => IdList::new(),
            SubsetMove::Swap { add, .. } => IdList::from_slice(&[*add]),
            SubsetMove::DisjointMultiSwap { add, .. } => add.clone(),
        }
    }

    /// The IDs this move deselects.
    pub fn deleted_ids(&self) -> IdList {
        match self {
            SubsetMove::Addition { .. } => IdList::new(),
            SubsetMove::Deletion { id } => IdList::from_slice(&[*id]),
            SubsetMove::Swap { delete, .. } => IdList::from_slice(&[*delete]),
            SubsetMove::DisjointMultiSwap { delete, .. } => delete.clone(),
        }
    }

    /// The number of IDs this move selects.
    pub fn num_added(&self) -> usize {
        match self {
            SubsetMove::Addition { .. } | SubsetMove::Swap { .. } => 1,
            SubsetMove::Deletion { .. } => 0,
            SubsetMove::DisjointMultiSwap { add, .. } => add.len(),
        }
    }

    /// The number of IDs this move deselects.
    pub fn num_deleted(&self) -> usize {
        match self {
            SubsetMove::Deletion { .. } | SubsetMove::Swap { .. } => 1,
            SubsetMove::Addition { .. } => 0,
            SubsetMove::DisjointMultiSwap { delete, .. } => delete.len(),
        }
    }
}

impl Move<SubsetSolution> for SubsetMove {
    fn apply(&self, solution: &mut SubsetSolution) -> Result<()> {
        match self {
            SubsetMove::Addition { id } => solution.select(*id),
            SubsetMove::Deletion { id } => solution.deselect(*id),
            SubsetMove::Swap { add, delete } => {
                solution.deselect(*delete)?;
                solution.select(*add)
            }
            SubsetMove::DisjointMultiSwap { add, delete } => {
                for id in delete {
                    solution.deselect(*id)?;
                }
                for id in add {
                    solution.select(*id)?;
                }
                Ok(())
            }
        }
    }

    fn undo(&self, solution: &mut SubsetSolution) -> Result<()> {
        match self {
            SubsetMove::Addition { id } => solution.deselect(*id),
            SubsetMove::Deletion { id } => solution.select(*id),
            SubsetMove::Swap { add, delete } => {
                solution.deselect(*add)?;
                solution.select(*delete)
            }
            SubsetMove::DisjointMultiSwap { add, delete } => {
                for id in add {
                    solution.deselect(*id)?;
                }
                for id in delete {
                    solution.select(*id)?;
                }
                Ok(())
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution() -> SubsetSolution {
        SubsetSolution::with_selection(0..10, [0, 1, 2]).unwrap()
    }

    fn assert_round_trip(mv: &SubsetMove) {
        let original = solution();
        let mut modified = original.clone();
        mv.apply(&mut modified).unwrap();
        assert_ne!(original, modified);
        mv.undo(&mut modified).unwrap();
        assert_eq!(original, modified);
    }

    #[test]
    fn test_round_trip_all_variants() {
        assert_round_trip(&SubsetMove::addition(5));
        assert_round_trip(&SubsetMove::deletion(1));
        assert_round_trip(&SubsetMove::swap(5, 1));
        assert_round_trip(&SubsetMove::disjoint_multi_swap([5, 6], [0, 2]));
    }

    #[test]
    fn test_apply_changes_selection() {
        let mut sol = solution();
        SubsetMove::swap(7, 0).apply(&mut sol).unwrap();
        assert!(sol.is_selected(7));
        assert!(!sol.is_selected(0));
        assert_eq!(sol.num_selected(), 3);
    }

    #[test]
    fn test_apply_fails_on_inapplicable_move() {
        let mut sol = solution();
        // 0 is already selected
        assert!(SubsetMove::addition(0).apply(&mut sol).is_err());
        // 5 is not selected
        assert!(SubsetMove::deletion(5).apply(&mut sol).is_err());
    }

    #[test]
    fn test_added_and_deleted_ids() {
        let mv = SubsetMove::disjoint_multi_swap([5, 6], [0, 2]);
        assert_eq!(mv.added_ids().as_slice(), [5, 6]);
        assert_eq!(mv.deleted_ids().as_slice(), [0, 2]);
        assert_eq!(mv.num_added(), 2);
        assert_eq!(mv.num_deleted(), 2);

        let mv = SubsetMove::addition(3);
        assert_eq!(mv.added_ids().as_slice(), [3]);
        assert!(mv.deleted_ids().is_empty());
    }

    #[test]
    #[should_panic(expected = "disjoint")]
    fn test_overlapping_multi_swap_panics() {
        SubsetMove::disjoint_multi_swap([5, 6], [6, 2]);
    }

    #[test]
    #[should_panic(expected = "as many added as deleted")]
    fn test_unbalanced_multi_swap_panics() {
        SubsetMove::disjoint_multi_swap([5], [0, 2]);
    }

    #[test]
    #[should_panic(expected = "with itself")]
    fn test_self_swap_panics() {
        SubsetMove::swap(3, 3);
    }
}
