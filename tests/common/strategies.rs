use proptest::prelude::*;

/// Strategy for batch sizes, always positive
pub fn batch_size_strategy() -> impl Strategy<Value = usize> {
    1usize..=64
}

/// Strategy for collection sizes, including empty collections
pub fn number_of_items_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![Just(0usize), 0usize..=500]
}

/// Strategy for service capacities around typical batch sizes
pub fn capacity_strategy() -> impl Strategy<Value = u64> {
    0u64..=80
}
