use matsum::{partition, PartitionError, RowRange};
use proptest::prelude::*;

fn size_and_workers() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=300).prop_flat_map(|size| (Just(size), 1..=size))
}

proptest! {
    #[test]
    fn ranges_tile_all_rows((size, workers) in size_and_workers()) {
        let ranges = partition(size, workers).unwrap();
        prop_assert_eq!(ranges.len(), workers);

        let mut next = 0;
        for range in &ranges {
            prop_assert_eq!(range.start, next);
            prop_assert!(!range.is_empty());
            next = range.end;
        }
        prop_assert_eq!(next, size);
    }

    #[test]
    fn ranges_are_balanced((size, workers) in size_and_workers()) {
        let ranges = partition(size, workers).unwrap();
        let small = size / workers;
        let large = size.div_ceil(workers);

        prop_assert!(ranges.iter().all(|r| r.len() == small || r.len() == large));

        let larger = ranges.iter().filter(|r| r.len() == small + 1).count();
        prop_assert_eq!(larger, size % workers);

        // Extra rows go to the lowest-indexed workers.
        let lens: Vec<usize> = ranges.iter().map(RowRange::len).collect();
        prop_assert!(lens.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn partition_is_deterministic((size, workers) in size_and_workers()) {
        prop_assert_eq!(partition(size, workers), partition(size, workers));
    }

    #[test]
    fn more_workers_than_rows_is_rejected(size in 1usize..100, excess in 1usize..10) {
        let workers = size + excess;
        prop_assert_eq!(
            partition(size, workers),
            Err(PartitionError::TooManyWorkers { workers, size })
        );
    }
}
