//! Benchmarks for subset move generation and descent steps.

use std::collections::BTreeSet;
use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use vicinity_core::{
    Evaluation, Neighborhood, Objective, SimpleEvaluation, SingleSwapNeighborhood, SubsetData,
    SubsetProblem, SubsetSolution,
};
use vicinity_solver::{MaxSteps, RandomDescent, Search};

#[derive(Debug)]
struct Ids(BTreeSet<u32>);

impl SubsetData for Ids {
    fn ids(&self) -> &BTreeSet<u32> {
        &self.0
    }
}

#[derive(Debug)]
struct SumOfIds;

impl Objective<SubsetSolution, Ids> for SumOfIds {
    fn evaluate(&self, solution: &SubsetSolution, _data: &Ids) -> Box<dyn Evaluation> {
        let sum: u32 = solution.selected_ids().iter().sum();
        Box::new(SimpleEvaluation::of(sum as f64))
    }
}

fn bench_swap_move_generation(c: &mut Criterion) {
    let neighborhood = SingleSwapNeighborhood::new();
    let solution = SubsetSolution::with_selection(0..500, 0..100).unwrap();

    c.bench_function("swap_all_moves_500_100", |b| {
        b.iter(|| black_box(neighborhood.all_moves(black_box(&solution))).len())
    });
}

fn bench_random_descent_steps(c: &mut Criterion) {
    c.bench_function("random_descent_1000_steps", |b| {
        b.iter(|| {
            let problem = SubsetProblem::new(SumOfIds, Ids((0..200).collect()), 20..=20);
            let mut search = Search::new(
                problem,
                RandomDescent::new(Arc::new(SingleSwapNeighborhood::new())),
            );
            search.set_seed(42);
            search.add_stop_criterion(MaxSteps::new(1000));
            search.start().unwrap();
            black_box(search.handle().step_count())
        })
    });
}

criterion_group!(benches, bench_swap_move_generation, bench_random_descent_steps);
criterion_main!(benches);
