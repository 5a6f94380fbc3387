pub mod builders;
pub mod strategies;

pub use builders::*;
pub use strategies::*;

use std::time::Duration;
use tokio::time::Instant;

/// Timer slack: the paused clock advances in whole-millisecond ticks
const ELAPSED_TOLERANCE: Duration = Duration::from_millis(5);

#[track_caller]
pub fn assert_elapsed(started: Instant, expected: Duration) {
    let elapsed = started.elapsed();
    assert!(
        elapsed >= expected && elapsed <= expected + ELAPSED_TOLERANCE,
        "expected ~{expected:?} elapsed, got {elapsed:?}"
    );
}
