//! Subset neighborhoods.
//!
//! All neighborhoods in this module are stateless and thread-safe: they can
//! be shared by searches running concurrently. Each can be configured with a
//! set of fixed IDs that are never added to or removed from the selection.

use std::collections::BTreeSet;

use rand::seq::IndexedRandom;
use rand::RngCore;

use crate::neigh::{Move, Neighborhood};

use super::{SubsetMove, SubsetSolution};

/// Candidate filtering shared by the subset neighborhoods.
#[derive(Debug, Clone, Default)]
struct FixedIds {
    ids: BTreeSet<u32>,
}

impl FixedIds {
    fn new(ids: impl IntoIterator<Item = u32>) -> Self {
        FixedIds {
            ids: ids.into_iter().collect(),
        }
    }

    /// Unselected IDs that may be added.
    fn add_candidates(&self, solution: &SubsetSolution) -> Vec<u32> {
        debug_assert!(
            self.ids.is_subset(solution.all_ids()),
            "fixed IDs must be part of the solution's universe"
        );
        solution
            .unselected_ids()
            .iter()
            .copied()
            .filter(|id| !self.ids.contains(id))
            .collect()
    }

    /// Selected IDs that may be removed.
    fn remove_candidates(&self, solution: &SubsetSolution) -> Vec<u32> {
        debug_assert!(
            self.ids.is_subset(solution.all_ids()),
            "fixed IDs must be part of the solution's universe"
        );
        solution
            .selected_ids()
            .iter()
            .copied()
            .filter(|id| !self.ids.contains(id))
            .collect()
    }
}

fn boxed(mv: SubsetMove) -> Box<dyn Move<SubsetSolution>> {
    Box::new(mv)
}

/// Generates moves that select one additional ID.
///
/// An optional maximum subset size caps the selection: once the current
/// solution has reached it, no moves are generated.
#[derive(Debug, Clone, Default)]
pub struct SingleAdditionNeighborhood {
    fixed: FixedIds,
    max_subset_size: Option<usize>,
}

impl SingleAdditionNeighborhood {
    /// Creates a basic addition neighborhood.
    pub fn new() -> Self {
        SingleAdditionNeighborhood::default()
    }

    /// Restricts the neighborhood to never touch the given IDs.
    pub fn with_fixed_ids(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.fixed = FixedIds::new(ids);
        self
    }

    /// Stops generating moves once the selection has the given size.
    pub fn with_max_subset_size(mut self, size: usize) -> Self {
        assert!(size >= 1, "maximum subset size must be at least 1");
        self.max_subset_size = Some(size);
        self
    }

    fn size_capped(&self, solution: &SubsetSolution) -> bool {
        self.max_subset_size
            .is_some_and(|max| solution.num_selected() >= max)
    }
}

impl Neighborhood<SubsetSolution> for SingleAdditionNeighborhood {
    fn random_move(
        &self,
        solution: &SubsetSolution,
        rng: &mut dyn RngCore,
    ) -> Option<Box<dyn Move<SubsetSolution>>> {
        if self.size_capped(solution) {
            return None;
        }
        let candidates = self.fixed.add_candidates(solution);
        candidates
            .choose(rng)
            .map(|&id| boxed(SubsetMove::addition(id)))
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<Box<dyn Move<SubsetSolution>>> {
        if self.size_capped(solution) {
            return Vec::new();
        }
        self.fixed
            .add_candidates(solution)
            .into_iter()
            .map(|id| boxed(SubsetMove::addition(id)))
            .collect()
    }
}

/// Generates moves that deselect one ID.
///
/// An optional minimum subset size protects the selection: once the current
/// solution has shrunk to it, no moves are generated.
#[derive(Debug, Clone, Default)]
pub struct SingleDeletionNeighborhood {
    fixed: FixedIds,
    min_subset_size: Option<usize>,
}

impl SingleDeletionNeighborhood {
    /// Creates a basic deletion neighborhood.
    pub fn new() -> Self {
        SingleDeletionNeighborhood::default()
    }

    /// Restricts the neighborhood to never touch the given IDs.
    pub fn with_fixed_ids(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.fixed = FixedIds::new(ids);
        self
    }

    /// Stops generating moves once the selection has shrunk to the given
    /// size.
    pub fn with_min_subset_size(mut self, size: usize) -> Self {
        self.min_subset_size = Some(size);
        self
    }

    fn size_capped(&self, solution: &SubsetSolution) -> bool {
        self.min_subset_size
            .is_some_and(|min| solution.num_selected() <= min)
    }
}

impl Neighborhood<SubsetSolution> for SingleDeletionNeighborhood {
    fn random_move(
        &self,
        solution: &SubsetSolution,
        rng: &mut dyn RngCore,
    ) -> Option<Box<dyn Move<SubsetSolution>>> {
        if self.size_capped(solution) {
            return None;
        }
        let candidates = self.fixed.remove_candidates(solution);
        candidates
            .choose(rng)
            .map(|&id| boxed(SubsetMove::deletion(id)))
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<Box<dyn Move<SubsetSolution>>> {
        if self.size_capped(solution) {
            return Vec::new();
        }
        self.fixed
            .remove_candidates(solution)
            .into_iter()
            .map(|id| boxed(SubsetMove::deletion(id)))
            .collect()
    }
}

/// Generates moves that swap one selected ID against one unselected ID,
/// keeping the selection size constant. Suited for fixed-size subset
/// selection.
#[derive(Debug, Clone, Default)]
pub struct SingleSwapNeighborhood {
    fixed: FixedIds,
}

impl SingleSwapNeighborhood {
    /// Creates a basic swap neighborhood.
    pub fn new() -> Self {
        SingleSwapNeighborhood::default()
    }

    /// Restricts the neighborhood to never swap the given IDs.
    pub fn with_fixed_ids(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.fixed = FixedIds::new(ids);
        self
    }
}

impl Neighborhood<SubsetSolution> for SingleSwapNeighborhood {
    fn random_move(
        &self,
        solution: &SubsetSolution,
        rng: &mut dyn RngCore,
    ) -> Option<Box<dyn Move<SubsetSolution>>> {
        let remove = self.fixed.remove_candidates(solution);
        let add = self.fixed.add_candidates(solution);
        match (add.choose(rng), remove.choose(rng)) {
            (Some(&add), Some(&delete)) => Some(boxed(SubsetMove::swap(add, delete))),
            _ => None,
        }
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<Box<dyn Move<SubsetSolution>>> {
        let remove = self.fixed.remove_candidates(solution);
        let add = self.fixed.add_candidates(solution);
        if remove.is_empty() || add.is_empty() {
            return Vec::new();
        }
        add.iter()
            .flat_map(|&a| remove.iter().map(move |&d| boxed(SubsetMove::swap(a, d))))
            .collect()
    }
}

/// Generates moves that swap k disjoint selected IDs against k disjoint
/// unselected IDs in a single step.
#[derive(Debug, Clone)]
pub struct DisjointMultiSwapNeighborhood {
    fixed: FixedIds,
    arity: usize,
}

impl DisjointMultiSwapNeighborhood {
    /// Creates a multi-swap neighborhood swapping exactly `arity` pairs per
    /// move.
    ///
    /// # Panics
    ///
    /// Panics if the arity is zero.
    pub fn new(arity: usize) -> Self {
        assert!(arity >= 1, "multi-swap arity must be at least 1");
        DisjointMultiSwapNeighborhood {
            fixed: FixedIds::default(),
            arity,
        }
    }

    /// Restricts the neighborhood to never swap the given IDs.
    pub fn with_fixed_ids(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.fixed = FixedIds::new(ids);
        self
    }

    /// The number of pairs swapped per move.
    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl Neighborhood<SubsetSolution> for DisjointMultiSwapNeighborhood {
    fn random_move(
        &self,
        solution: &SubsetSolution,
        rng: &mut dyn RngCore,
    ) -> Option<Box<dyn Move<SubsetSolution>>> {
        let remove = self.fixed.remove_candidates(solution);
        let add = self.fixed.add_candidates(solution);
        if remove.len() < self.arity || add.len() < self.arity {
            return None;
        }
        let added = rand::seq::index::sample(rng, add.len(), self.arity)
            .into_iter()
            .map(|i| add[i]);
        let deleted = rand::seq::index::sample(rng, remove.len(), self.arity)
            .into_iter()
            .map(|i| remove[i]);
        Some(boxed(SubsetMove::disjoint_multi_swap(added, deleted)))
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<Box<dyn Move<SubsetSolution>>> {
        let remove = self.fixed.remove_candidates(solution);
        let add = self.fixed.add_candidates(solution);
        if remove.len() < self.arity || add.len() < self.arity {
            return Vec::new();
        }
        let mut moves = Vec::new();
        each_combination(add.len(), self.arity, |added| {
            each_combination(remove.len(), self.arity, |deleted| {
                moves.push(boxed(SubsetMove::disjoint_multi_swap(
                    added.iter().map(|&i| add[i]),
                    deleted.iter().map(|&i| remove[i]),
                )));
            });
        });
        moves
    }
}

/// Visits every k-combination of `0..n` in lexicographic order.
fn each_combination(n: usize, k: usize, mut visit: impl FnMut(&[usize])) {
    if k == 0 || k > n {
        return;
    }
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        visit(&indices);
        let mut i = k;
        while i > 0 && indices[i - 1] == n - k + (i - 1) {
            i -= 1;
        }
        if i == 0 {
            return;
        }
        indices[i - 1] += 1;
        for j in i..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use smallvec::SmallVec;

    fn solution() -> SubsetSolution {
        SubsetSolution::with_selection(0..10, [0, 1, 2]).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn as_subset_move(mv: &dyn Move<SubsetSolution>) -> &SubsetMove {
        mv.as_any().downcast_ref::<SubsetMove>().unwrap()
    }

    #[test]
    fn test_addition_generates_unselected_ids() {
        let neigh = SingleAdditionNeighborhood::new();
        let sol = solution();
        let moves = neigh.all_moves(&sol);
        assert_eq!(moves.len(), 7);
        for mv in &moves {
            let added = as_subset_move(mv.as_ref()).added_ids();
            assert!(!sol.is_selected(added[0]));
        }
    }

    #[test]
    fn test_addition_respects_max_size() {
        let neigh = SingleAdditionNeighborhood::new().with_max_subset_size(3);
        let sol = solution();
        assert!(neigh.all_moves(&sol).is_empty());
        assert!(neigh.random_move(&sol, &mut rng()).is_none());
    }

    #[test]
    fn test_deletion_respects_min_size() {
        let neigh = SingleDeletionNeighborhood::new().with_min_subset_size(3);
        let sol = solution();
        assert!(neigh.all_moves(&sol).is_empty());

        let neigh = SingleDeletionNeighborhood::new();
        assert_eq!(neigh.all_moves(&sol).len(), 3);
    }

    #[test]
    fn test_swap_enumerates_cross_product() {
        let neigh = SingleSwapNeighborhood::new();
        let moves = neigh.all_moves(&solution());
        // 7 unselected x 3 selected
        assert_eq!(moves.len(), 21);
    }

    #[test]
    fn test_swap_returns_none_when_impossible() {
        let neigh = SingleSwapNeighborhood::new();
        let empty = SubsetSolution::new(0..5);
        assert!(neigh.random_move(&empty, &mut rng()).is_none());
        assert!(neigh.all_moves(&empty).is_empty());

        let full = SubsetSolution::with_selection(0..3, 0..3).unwrap();
        assert!(neigh.random_move(&full, &mut rng()).is_none());
    }

    #[test]
    fn test_fixed_ids_are_never_moved() {
        let fixed = [0u32, 5];
        let neigh = SingleSwapNeighborhood::new().with_fixed_ids(fixed);
        let sol = solution();
        let moves = neigh.all_moves(&sol);
        // (7 - 1 fixed unselected) x (3 - 1 fixed selected)
        assert_eq!(moves.len(), 12);
        for mv in &moves {
            let mv = as_subset_move(mv.as_ref());
            let touched: SmallVec<[u32; 4]> = mv
                .added_ids()
                .into_iter()
                .chain(mv.deleted_ids())
                .collect();
            assert!(touched.iter().all(|id| !fixed.contains(id)));
        }

        let mut r = rng();
        for _ in 0..50 {
            let mv = neigh.random_move(&sol, &mut r).unwrap();
            let mv = as_subset_move(mv.as_ref());
            assert!(!fixed.contains(&mv.added_ids()[0]));
            assert!(!fixed.contains(&mv.deleted_ids()[0]));
        }
    }

    #[test]
    fn test_multi_swap_counts_combinations() {
        let neigh = DisjointMultiSwapNeighborhood::new(2);
        let moves = neigh.all_moves(&solution());
        // C(7, 2) x C(3, 2) = 21 x 3
        assert_eq!(moves.len(), 63);
    }

    #[test]
    fn test_multi_swap_requires_enough_candidates() {
        let neigh = DisjointMultiSwapNeighborhood::new(4);
        let sol = solution();
        // only 3 selected
        assert!(neigh.random_move(&sol, &mut rng()).is_none());
        assert!(neigh.all_moves(&sol).is_empty());
    }

    #[test]
    fn test_multi_swap_random_move_is_applicable() {
        let neigh = DisjointMultiSwapNeighborhood::new(3);
        let sol = solution();
        let mut r = rng();
        for _ in 0..20 {
            let mv = neigh.random_move(&sol, &mut r).unwrap();
            let mut copy = sol.clone();
            mv.apply(&mut copy).unwrap();
            assert_eq!(copy.num_selected(), sol.num_selected());
        }
    }

    #[test]
    fn test_each_combination() {
        let mut seen = Vec::new();
        each_combination(4, 2, |c| seen.push(c.to_vec()));
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[test]
    #[should_panic(expected = "arity must be at least 1")]
    fn test_zero_arity_panics() {
        DisjointMultiSwapNeighborhood::new(0);
    }
}
