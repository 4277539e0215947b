//! Subset solution: a bipartition of a fixed ID universe.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, VicinityError};

/// A solution selecting a subset of a fixed universe of integer IDs.
///
/// Invariant: the selected and unselected sets are disjoint and their union
/// is the universe. The universe itself is immutable and shared between
/// clones; the partition is owned, so clones are independent.
#[derive(Clone)]
pub struct SubsetSolution {
    universe: Arc<BTreeSet<u32>>,
    selected: BTreeSet<u32>,
    unselected: BTreeSet<u32>,
}

impl SubsetSolution {
    /// Creates a solution over the given universe with an empty selection.
    ///
    /// # Panics
    ///
    /// Panics if the universe is empty.
    pub fn new(ids: impl IntoIterator<Item = u32>) -> Self {
        let universe: BTreeSet<u32> = ids.into_iter().collect();
        assert!(
            !universe.is_empty(),
            "a subset solution requires a non-empty ID universe"
        );
        SubsetSolution {
            unselected: universe.clone(),
            universe: Arc::new(universe),
            selected: BTreeSet::new(),
        }
    }

    /// Creates a solution over the given universe with the given IDs
    /// selected.
    pub fn with_selection(
        ids: impl IntoIterator<Item = u32>,
        selected: impl IntoIterator<Item = u32>,
    ) -> Result<Self> {
        let mut solution = SubsetSolution::new(ids);
        solution.select_all(selected)?;
        Ok(solution)
    }

    /// All IDs in the universe.
    pub fn all_ids(&self) -> &BTreeSet<u32> {
        &self.universe
    }

    /// The currently selected IDs.
    pub fn selected_ids(&self) -> &BTreeSet<u32> {
        &self.selected
    }

    /// The currently unselected IDs.
    pub fn unselected_ids(&self) -> &BTreeSet<u32> {
        &self.unselected
    }

    /// The size of the universe.
    pub fn total_size(&self) -> usize {
        self.universe.len()
    }

    /// The number of selected IDs.
    pub fn num_selected(&self) -> usize {
        self.selected.len()
    }

    /// The number of unselected IDs.
    pub fn num_unselected(&self) -> usize {
        self.unselected.len()
    }

    /// Whether the given ID is currently selected.
    pub fn is_selected(&self, id: u32) -> bool {
        self.selected.contains(&id)
    }

    /// Selects the given ID.
    pub fn select(&mut self, id: u32) -> Result<()> {
        if !self.universe.contains(&id) {
            return Err(self.modification_error(format_args!(
                "cannot select {id}: not part of the universe"
            )));
        }
        if !self.unselected.remove(&id) {
            return Err(
                self.modification_error(format_args!("cannot select {id}: already selected"))
            );
        }
        self.selected.insert(id);
        Ok(())
    }

    /// Deselects the given ID.
    pub fn deselect(&mut self, id: u32) -> Result<()> {
        if !self.universe.contains(&id) {
            return Err(self.modification_error(format_args!(
                "cannot deselect {id}: not part of the universe"
            )));
        }
        if !self.selected.remove(&id) {
            return Err(
                self.modification_error(format_args!("cannot deselect {id}: not selected"))
            );
        }
        self.unselected.insert(id);
        Ok(())
    }

    /// Selects all given IDs, stopping at the first illegal one.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = u32>) -> Result<()> {
        for id in ids {
            self.select(id)?;
        }
        Ok(())
    }

    /// Deselects all given IDs, stopping at the first illegal one.
    pub fn deselect_all(&mut self, ids: impl IntoIterator<Item = u32>) -> Result<()> {
        for id in ids {
            self.deselect(id)?;
        }
        Ok(())
    }

    fn modification_error(&self, message: fmt::Arguments<'_>) -> VicinityError {
        VicinityError::SolutionModification(format!("{} (solution: {:?})", message, self))
    }
}

impl PartialEq for SubsetSolution {
    fn eq(&self, other: &Self) -> bool {
        self.universe == other.universe && self.selected == other.selected
    }
}

impl Eq for SubsetSolution {}

impl fmt::Debug for SubsetSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SubsetSolution({}/{} selected: {:?})",
            self.num_selected(),
            self.total_size(),
            self.selected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition_holds(solution: &SubsetSolution) -> bool {
        solution.selected_ids().is_disjoint(solution.unselected_ids())
            && solution
                .selected_ids()
                .union(solution.unselected_ids())
                .copied()
                .collect::<BTreeSet<u32>>()
                == *solution.all_ids()
    }

    #[test]
    fn test_new_starts_unselected() {
        let solution = SubsetSolution::new(0..5);
        assert_eq!(solution.num_selected(), 0);
        assert_eq!(solution.num_unselected(), 5);
        assert!(partition_holds(&solution));
    }

    #[test]
    fn test_select_and_deselect_maintain_partition() {
        let mut solution = SubsetSolution::new(0..5);
        solution.select(2).unwrap();
        solution.select(4).unwrap();
        assert!(solution.is_selected(2));
        assert_eq!(solution.num_selected(), 2);
        assert!(partition_holds(&solution));

        solution.deselect(2).unwrap();
        assert!(!solution.is_selected(2));
        assert!(partition_holds(&solution));
    }

    #[test]
    fn test_illegal_operations_fail() {
        let mut solution = SubsetSolution::new(0..5);
        assert!(matches!(
            solution.select(7),
            Err(VicinityError::SolutionModification(_))
        ));
        solution.select(1).unwrap();
        assert!(matches!(
            solution.select(1),
            Err(VicinityError::SolutionModification(_))
        ));
        assert!(matches!(
            solution.deselect(2),
            Err(VicinityError::SolutionModification(_))
        ));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = SubsetSolution::with_selection(0..5, [0, 1]).unwrap();
        let copy = original.clone();
        original.select(3).unwrap();
        original.deselect(0).unwrap();
        assert_eq!(copy.selected_ids().iter().copied().collect::<Vec<_>>(), [0, 1]);
        assert_ne!(original, copy);
    }

    #[test]
    fn test_equality_is_by_selection() {
        let a = SubsetSolution::with_selection(0..5, [1, 2]).unwrap();
        let b = SubsetSolution::with_selection(0..5, [2, 1]).unwrap();
        let c = SubsetSolution::with_selection(0..5, [1, 3]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    #[should_panic(expected = "non-empty ID universe")]
    fn test_empty_universe_panics() {
        SubsetSolution::new(std::iter::empty());
    }
}
