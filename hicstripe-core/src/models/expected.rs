use super::normalization::Normalization;

///
/// Distance-dependent expected contact baseline for one resolution and normalization.
///
/// `values[d]` is the expected value between two bins `d` bins apart.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedValues {
    pub resolution: u32,
    pub normalization: Normalization,
    pub values: Vec<f64>,
}

impl ExpectedValues {
    pub fn new(resolution: u32, normalization: Normalization, values: Vec<f64>) -> Self {
        Self {
            resolution,
            normalization,
            values,
        }
    }

    /// Expected value at diagonal distance `distance`.
    ///
    /// Distances past the end of the vector reuse the last known value; an empty baseline
    /// expects zero everywhere.
    pub fn at_distance(&self, distance: u64) -> f64 {
        let idx = distance as usize;
        match self.values.get(idx) {
            Some(v) => *v,
            None => self.values.last().copied().unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn test_at_distance_extends_tail() {
        let ev = ExpectedValues::new(5000, Normalization::None, vec![10.0, 4.0, 2.0]);
        assert_eq!(ev.at_distance(0), 10.0);
        assert_eq!(ev.at_distance(2), 2.0);
        assert_eq!(ev.at_distance(50), 2.0);

        let empty = ExpectedValues::new(5000, Normalization::None, vec![]);
        assert_eq!(empty.at_distance(3), 0.0);
    }
}
