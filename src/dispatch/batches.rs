//! Batch arithmetic.
//!
//! Everything here is a pure function of `(number_of_items, batch_size)`.
//! The cursor lives inside [`Batches`] and is carried from one iteration to
//! the next; nothing else can observe or move it.

use std::ops::Range;

/// Number of submissions needed to cover `number_of_items`.
///
/// Exact ceiling division, with a floor of one so an empty collection still
/// yields a single (empty) submission. `batch_size` must be non-zero; the
/// caller guarantees this through `ServiceParameters`.
pub fn batch_count(number_of_items: usize, batch_size: usize) -> usize {
    debug_assert!(batch_size > 0, "batch_size must be positive");
    number_of_items.div_ceil(batch_size).max(1)
}

/// Bounds of the batch starting at `cursor`, clamped to the collection.
pub fn batch_bounds(cursor: usize, batch_size: usize, number_of_items: usize) -> Range<usize> {
    let lower = cursor.min(number_of_items);
    let upper = cursor.saturating_add(batch_size).min(number_of_items);
    lower..upper
}

/// Lazy, restartable sequence of batch bounds.
///
/// Yields `(index, bounds)` pairs for `0..batch_count(..)`. Cloning the
/// iterator or constructing a new one with the same inputs replays the
/// identical sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batches {
    number_of_items: usize,
    batch_size: usize,
    count: usize,
    index: usize,
    cursor: usize,
}

impl Batches {
    pub fn new(number_of_items: usize, batch_size: usize) -> Self {
        Self {
            number_of_items,
            batch_size,
            count: batch_count(number_of_items, batch_size),
            index: 0,
            cursor: 0,
        }
    }

    /// Total number of batches this sequence yields from the start
    pub fn count_total(&self) -> usize {
        self.count
    }

    /// Offset of the next batch's first item
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Iterator for Batches {
    type Item = (usize, Range<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }

        let bounds = batch_bounds(self.cursor, self.batch_size, self.number_of_items);
        let index = self.index;

        self.index += 1;
        self.cursor = self.cursor.saturating_add(self.batch_size);

        Some((index, bounds))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Batches {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(number_of_items: usize, batch_size: usize) -> Vec<usize> {
        Batches::new(number_of_items, batch_size)
            .map(|(_, bounds)| bounds.len())
            .collect()
    }

    #[test]
    fn test_batch_count_uses_exact_division() {
        assert_eq!(batch_count(69, 25), 3);
        assert_eq!(batch_count(75, 25), 3);
        assert_eq!(batch_count(76, 25), 4);
        assert_eq!(batch_count(69, 30), 3);
        assert_eq!(batch_count(1, 100), 1);
    }

    #[test]
    fn test_empty_collection_yields_one_empty_batch() {
        assert_eq!(batch_count(0, 25), 1);
        assert_eq!(sizes(0, 25), vec![0]);
    }

    #[test]
    fn test_final_batch_is_short() {
        assert_eq!(sizes(69, 25), vec![25, 25, 19]);
        assert_eq!(sizes(69, 30), vec![30, 30, 9]);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_empty_batch() {
        assert_eq!(sizes(50, 25), vec![25, 25]);
    }

    #[test]
    fn test_bounds_are_clamped() {
        assert_eq!(batch_bounds(50, 25, 69), 50..69);
        assert_eq!(batch_bounds(75, 25, 69), 69..69);
        assert_eq!(batch_bounds(usize::MAX, 25, 69), 69..69);
    }

    #[test]
    fn test_cursor_advances_by_batch_size() {
        let mut batches = Batches::new(69, 25);
        assert_eq!(batches.cursor(), 0);
        batches.next();
        assert_eq!(batches.cursor(), 25);
        batches.next();
        batches.next();
        assert_eq!(batches.cursor(), 75);
        assert_eq!(batches.next(), None);
    }

    #[test]
    fn test_restart_replays_sequence() {
        let first: Vec<_> = Batches::new(69, 25).collect();
        let second: Vec<_> = Batches::new(69, 25).collect();
        assert_eq!(first, second);
        assert_eq!(Batches::new(69, 25).len(), 3);
    }
}
