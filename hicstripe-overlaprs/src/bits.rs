use num_traits::{PrimInt, Unsigned, identities::zero};

use hicstripe_core::models::Interval;

/// A Binary Interval Search list for overlap queries along one axis.
///
/// From the journal article: <https://academic.oup.com/bioinformatics/article/29/1/1/273289>
///
/// Intervals are kept sorted by start. A query binary-searches for the first interval that
/// could reach the query start (`start - max_len`) and scans forward until intervals begin past
/// the query end.
///
/// # Examples
///
/// ```
/// use hicstripe_overlaprs::{Bits, Interval};
///
/// let bits = Bits::build(vec![
///     Interval { start: 100u64, end: 150, val: 0usize },
///     Interval { start: 200, end: 250, val: 1 },
///     Interval { start: 225, end: 275, val: 2 },
/// ]);
///
/// assert_eq!(bits.count(210, 240), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    intervals: Vec<Interval<I, T>>,
    /// The length of the longest interval
    max_len: I,
}

impl<I, T> Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub fn build(mut intervals: Vec<Interval<I, T>>) -> Self {
        intervals.sort();
        let max_len = intervals
            .iter()
            .map(|iv| iv.len())
            .max()
            .unwrap_or_else(zero::<I>);
        Bits { intervals, max_len }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Iterate the intervals overlapping `[start, stop)`, in start order.
    #[inline]
    pub fn find_iter(&self, start: I, stop: I) -> IterFind<'_, I, T> {
        let reach = start.checked_sub(&self.max_len).unwrap_or_else(zero::<I>);
        IterFind {
            inner: self,
            off: Self::lower_bound(reach, &self.intervals),
            start,
            stop,
        }
    }

    pub fn find(&self, start: I, stop: I) -> Vec<Interval<I, T>> {
        self.find_iter(start, stop).cloned().collect()
    }

    /// Count the intervals overlapping `[start, stop)` without allocating.
    pub fn count(&self, start: I, stop: I) -> usize {
        self.find_iter(start, stop).count()
    }

    /// Index of the first interval whose start is not below `start`.
    #[inline]
    pub fn lower_bound(start: I, intervals: &[Interval<I, T>]) -> usize {
        intervals.partition_point(|iv| iv.start < start)
    }
}

/// Iterator returned by [`Bits::find_iter`].
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    inner: &'a Bits<I, T>,
    off: usize,
    start: I,
    stop: I,
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    type Item = &'a Interval<I, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while let Some(interval) = self.inner.intervals.get(self.off) {
            if interval.start >= self.stop {
                break;
            }
            self.off += 1;
            if interval.overlaps(self.start, self.stop) {
                return Some(interval);
            }
        }
        None
    }
}
