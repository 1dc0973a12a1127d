use fxhash::FxHashMap as HashMap;

use hicstripe_core::models::Normalization;

///
/// Coverage of every bin: the row sums of the symmetric matrix whose upper triangle is
/// `counts`.
///
pub fn coverage(n_bins: usize, counts: &HashMap<(u64, u64), f64>) -> Vec<f64> {
    let mut cov = vec![0.0; n_bins];
    for (&(i, j), &v) in counts.iter() {
        cov[i as usize] += v;
        if i != j {
            cov[j as usize] += v;
        }
    }
    cov
}

/// Per-bin normalization vectors for one matrix at one resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct NormVectors {
    vc: Vec<f64>,
    vc_sqrt: Vec<f64>,
}

impl NormVectors {
    ///
    /// Vanilla coverage scaled so that the covered bins average to one, and its square root.
    ///
    pub fn from_coverage(coverage: &[f64]) -> Self {
        let covered: Vec<f64> = coverage.iter().copied().filter(|c| *c > 0.0).collect();
        let mean = if covered.is_empty() {
            1.0
        } else {
            covered.iter().sum::<f64>() / covered.len() as f64
        };

        let vc: Vec<f64> = coverage.iter().map(|c| c / mean).collect();
        let vc_sqrt = vc.iter().map(|v| v.sqrt()).collect();
        NormVectors { vc, vc_sqrt }
    }

    pub fn vector(&self, norm: Normalization) -> Option<&[f64]> {
        match norm {
            Normalization::None => None,
            Normalization::Vc => Some(&self.vc),
            Normalization::VcSqrt => Some(&self.vc_sqrt),
        }
    }

    /// Multiplier turning the raw count at `(i, j)` into its normalized value.
    ///
    /// Bins without coverage normalize to zero.
    #[inline]
    pub fn factor(&self, norm: Normalization, i: usize, j: usize) -> f64 {
        let Some(vector) = self.vector(norm) else {
            return 1.0;
        };
        match (vector.get(i), vector.get(j)) {
            (Some(&a), Some(&b)) if a > 0.0 && b > 0.0 => 1.0 / (a * b),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn counts() -> HashMap<(u64, u64), f64> {
        let mut counts = HashMap::default();
        counts.insert((0, 0), 2.0);
        counts.insert((0, 1), 4.0);
        counts.insert((1, 2), 2.0);
        counts
    }

    #[rstest]
    fn test_coverage_counts_off_diagonal_twice(counts: HashMap<(u64, u64), f64>) {
        assert_eq!(coverage(4, &counts), vec![6.0, 6.0, 2.0, 0.0]);
    }

    #[rstest]
    fn test_vc_factor(counts: HashMap<(u64, u64), f64>) {
        let vectors = NormVectors::from_coverage(&coverage(4, &counts));
        // covered bins average (6 + 6 + 2) / 3 = 14 / 3
        let vc = vectors.vector(Normalization::Vc).unwrap();
        assert!((vc[0] - 6.0 * 3.0 / 14.0).abs() < 1e-12);
        assert_eq!(vc[3], 0.0);

        let expected = 1.0 / (vc[0] * vc[1]);
        assert!((vectors.factor(Normalization::Vc, 0, 1) - expected).abs() < 1e-12);
        assert_eq!(vectors.factor(Normalization::Vc, 0, 3), 0.0);
        assert_eq!(vectors.factor(Normalization::None, 0, 3), 1.0);
    }

    #[rstest]
    fn test_vc_sqrt_is_root_of_vc(counts: HashMap<(u64, u64), f64>) {
        let vectors = NormVectors::from_coverage(&coverage(4, &counts));
        let vc = vectors.vector(Normalization::Vc).unwrap();
        let vc_sqrt = vectors.vector(Normalization::VcSqrt).unwrap();
        for (a, b) in vc.iter().zip(vc_sqrt.iter()) {
            assert!((a.sqrt() - b).abs() < 1e-12);
        }
    }
}
