use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use matsum::{
    partition, reduce, reduce_with, Cell, Matrix, MergeHook, MergeStrategy, ReduceOptionsBuilder,
};
use proptest::prelude::*;

fn square_matrix() -> impl Strategy<Value = Matrix> {
    (1usize..=24).prop_flat_map(|size| {
        prop::collection::vec(any::<Cell>(), size * size).prop_map(move |cells| {
            let mut it = cells.into_iter();
            Matrix::from_fn(size, |_, _| it.next().unwrap_or_default()).unwrap()
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parallel_total_matches_sequential(matrix in square_matrix(), pick in any::<prop::sample::Index>()) {
        let size = matrix.size();
        let workers = pick.index(size) + 1;
        let ranges = partition(size, workers).unwrap();

        let reduction = reduce(&matrix, &ranges).unwrap();
        prop_assert_eq!(reduction.total, matrix.sequential_sum());
        prop_assert_eq!(reduction.workers.len(), workers);
    }
}

#[test]
fn merge_order_does_not_change_total() {
    let size = 12;
    let matrix = Matrix::from_fn(size, |i, j| (i as Cell * 31 - j as Cell * 17) % 97).unwrap();
    let expected = matrix.sequential_sum();
    let ranges = partition(size, size).unwrap();

    for trial in 0..20u64 {
        let order = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&order);
        // Stagger merges differently on every trial.
        let hook: MergeHook = Arc::new(move |worker| {
            let delay = (worker as u64 * 7 + trial * 3) % 5;
            thread::sleep(Duration::from_millis(delay));
            seen.lock().unwrap().push(worker);
        });

        for merge in MergeStrategy::ALL {
            let options = ReduceOptionsBuilder::default()
                .merge(merge)
                .before_merge(hook.clone())
                .build()
                .unwrap();
            let reduction = reduce_with(&matrix, &ranges, &options).unwrap();
            assert_eq!(reduction.total, expected, "trial {trial} ({merge})");
        }

        let mut merged = order.lock().unwrap().clone();
        merged.sort_unstable();
        merged.dedup();
        assert_eq!(merged.len(), size, "every worker merged in trial {trial}");
    }
}

#[test]
fn single_cell_matrix() {
    let matrix = Matrix::from_rows(vec![vec![-42]]).unwrap();
    let ranges = partition(1, 1).unwrap();
    assert_eq!(reduce(&matrix, &ranges).unwrap().total, -42);
}

#[test]
fn workers_named_with_prefix() {
    let matrix = Matrix::from_fn(3, |_, _| 1).unwrap();
    let ranges = partition(3, 3).unwrap();
    let names = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&names);
    let hook: MergeHook = Arc::new(move |_| {
        let name = thread::current().name().map(str::to_string);
        seen.lock().unwrap().push(name);
    });
    let options = ReduceOptionsBuilder::default()
        .thread_name("sum")
        .before_merge(hook)
        .build()
        .unwrap();

    assert_eq!(reduce_with(&matrix, &ranges, &options).unwrap().total, 9);

    let mut names: Vec<String> = names.lock().unwrap().iter().flatten().cloned().collect();
    names.sort();
    assert_eq!(names, ["sum-0", "sum-1", "sum-2"]);
}
