mod common;

use common::strategies::*;
use common::DispatcherBuilder;
use proptest::prelude::*;
use std::time::Duration;

use batch_dispatch::dispatch::{batch_bounds, batch_count, Batches};

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    /// Property: batches are disjoint, in order, and cover every item exactly once
    #[test]
    fn batches_cover_items_exactly_once(
        number_of_items in number_of_items_strategy(),
        batch_size in batch_size_strategy(),
    ) {
        let mut covered = Vec::new();
        for (_, bounds) in Batches::new(number_of_items, batch_size) {
            prop_assert!(bounds.start <= bounds.end);
            prop_assert!(bounds.end <= number_of_items);
            prop_assert!(bounds.len() <= batch_size);
            covered.extend(bounds);
        }
        prop_assert_eq!(covered, (0..number_of_items).collect::<Vec<_>>());
    }

    /// Property: only an empty collection ever produces an empty batch
    #[test]
    fn empty_batches_only_for_empty_collections(
        number_of_items in number_of_items_strategy(),
        batch_size in batch_size_strategy(),
    ) {
        let empties = Batches::new(number_of_items, batch_size)
            .filter(|(_, bounds)| bounds.is_empty())
            .count();
        prop_assert_eq!(empties, usize::from(number_of_items == 0));
    }

    /// Property: batch count is the exact ceiling, never less than one
    #[test]
    fn batch_count_is_exact_ceiling(
        number_of_items in number_of_items_strategy(),
        batch_size in batch_size_strategy(),
    ) {
        let count = batch_count(number_of_items, batch_size);
        prop_assert!(count >= 1);
        prop_assert!(count * batch_size >= number_of_items);
        if number_of_items > 0 {
            prop_assert!((count - 1) * batch_size < number_of_items);
        }
        prop_assert_eq!(Batches::new(number_of_items, batch_size).count(), count);
    }

    /// Property: bounds are a pure function of their inputs
    #[test]
    fn batch_bounds_are_pure(
        cursor in 0usize..1000,
        batch_size in batch_size_strategy(),
        number_of_items in number_of_items_strategy(),
    ) {
        prop_assert_eq!(
            batch_bounds(cursor, batch_size, number_of_items),
            batch_bounds(cursor, batch_size, number_of_items)
        );
    }

    /// Property: a batch is blocked exactly when it exceeds the service capacity
    #[test]
    fn blocked_iff_batch_exceeds_capacity(
        number_of_items in 0usize..120,
        batch_size in batch_size_strategy(),
        capacity in capacity_strategy(),
    ) {
        let dispatcher = DispatcherBuilder::new(batch_size, number_of_items)
            .period(Duration::from_millis(5))
            .capacity(capacity)
            .build();

        let summary = paused_runtime().block_on(dispatcher.run_all()).unwrap();

        prop_assert_eq!(summary.items_processed + summary.items_rejected, number_of_items);
        for outcome in &summary.outcomes {
            prop_assert_eq!(outcome.is_blocked(), outcome.items() as u64 > capacity);
        }
    }
}
