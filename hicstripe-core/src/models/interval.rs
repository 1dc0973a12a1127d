use num_traits::{PrimInt, Unsigned, identities::zero};
use std::cmp::Ordering;

/// A half-open range `[start, end)` carrying a payload.
///
/// Ordering and equality only look at the coordinates, so intervals sort by start and then
/// by end no matter what they carry.
#[derive(Eq, Debug, Clone)]
pub struct Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub start: I,
    pub end: I,
    pub val: T,
}

impl<I, T> Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Length of the interval, zero when `end <= start`
    #[inline]
    pub fn len(&self) -> I {
        self.end.checked_sub(&self.start).unwrap_or_else(zero::<I>)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether this interval shares at least one position with `[start, end)`
    #[inline]
    pub fn overlaps(&self, start: I, end: I) -> bool {
        self.start < end && self.end > start
    }
}

impl<I, T> Ord for Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn cmp(&self, other: &Interval<I, T>) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl<I, T> PartialOrd for Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I, T> PartialEq for Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn eq(&self, other: &Interval<I, T>) -> bool {
        self.start == other.start && self.end == other.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn test_overlaps_is_half_open() {
        let iv = Interval {
            start: 10u64,
            end: 20,
            val: 0usize,
        };
        assert!(iv.overlaps(19, 25));
        assert!(iv.overlaps(0, 11));
        assert!(!iv.overlaps(20, 30));
        assert!(!iv.overlaps(0, 10));
        assert_eq!(iv.len(), 10);
    }
}
