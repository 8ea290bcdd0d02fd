//! Peak search over a bounded range of spectrum bins
//!
//! Callers keep their own scan range as a named constant; the ranges differ
//! between the frame pipeline and the standalone engine and are not unified.

use std::ops::Range;

/// Largest `key(item)` over `items[range]`, starting from 0.
///
/// Returns 0.0 when nothing in range is positive. The range end is clamped
/// to the slice length.
pub fn find_max<T>(items: &[T], range: Range<usize>, key: impl Fn(&T) -> f64) -> f64 {
    let end = range.end.min(items.len());
    let start = range.start.min(end);

    items[start..end]
        .iter()
        .map(key)
        .fold(0.0, |max, v| if v > max { v } else { max })
}

/// Index and value of the largest positive `key(item)` in `items[range]`.
pub fn peak_bin<T>(items: &[T], range: Range<usize>, key: impl Fn(&T) -> f64) -> Option<(usize, f64)> {
    let end = range.end.min(items.len());
    let start = range.start.min(end);

    let mut best: Option<(usize, f64)> = None;
    for (offset, item) in items[start..end].iter().enumerate() {
        let v = key(item);
        if v > best.map_or(0.0, |(_, b)| b) {
            best = Some((start + offset, v));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_respected() {
        let values = [100.0, 50.0, 3.0, 7.0, 1.0];
        assert_eq!(find_max(&values, 1..5, |&v| v), 50.0);
        assert_eq!(find_max(&values, 2..5, |&v| v), 7.0);
        assert_eq!(peak_bin(&values, 2..5, |&v| v), Some((3, 7.0)));
    }

    #[test]
    fn test_non_positive_input() {
        let values = [-1.0, -2.0, 0.0];
        assert_eq!(find_max(&values, 0..3, |&v| v), 0.0);
        assert_eq!(peak_bin(&values, 0..3, |&v| v), None);
    }

    #[test]
    fn test_range_clamped() {
        let values = [1.0, 2.0];
        assert_eq!(find_max(&values, 1..512, |&v| v), 2.0);
        assert_eq!(find_max(&values, 5..512, |&v| v), 0.0);
    }
}
