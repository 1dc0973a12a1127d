use std::fmt::{self, Display};

///
/// A rectangle of the contact map in bin units: rows `[row_start, row_end)`, columns
/// `[col_start, col_end)`.
///
/// Coordinates are signed because vertical stripe windows may reach past the top or left edge
/// of the map; a value source reports those cells as zero.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub struct BinRect {
    pub row_start: i64,
    pub col_start: i64,
    pub row_end: i64,
    pub col_end: i64,
}

impl BinRect {
    pub fn new(row_start: i64, col_start: i64, row_end: i64, col_end: i64) -> Self {
        Self {
            row_start,
            col_start,
            row_end,
            col_end,
        }
    }

    pub fn num_rows(&self) -> usize {
        (self.row_end - self.row_start).max(0) as usize
    }

    pub fn num_cols(&self) -> usize {
        (self.col_end - self.col_start).max(0) as usize
    }

    /// Scale the rectangle to base pairs.
    pub fn to_bp(&self, resolution: u32) -> BpRect {
        let res = i64::from(resolution);
        BpRect {
            x0: self.row_start * res,
            y0: self.col_start * res,
            x1: self.row_end * res,
            y1: self.col_end * res,
        }
    }
}

impl Display for BinRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) x [{}, {})",
            self.row_start, self.row_end, self.col_start, self.col_end
        )
    }
}

///
/// A rectangle of the contact map in base pairs: `[x0, x1)` along the rows and `[y0, y1)`
/// along the columns.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub struct BpRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl BpRect {
    /// Whether `[start1, end1) x [start2, end2)` shares any area with this rectangle.
    pub fn intersects(&self, start1: u64, end1: u64, start2: u64, end2: u64) -> bool {
        (start1 as i64) < self.x1
            && (end1 as i64) > self.x0
            && (start2 as i64) < self.y1
            && (end2 as i64) > self.y0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_dimensions_and_bp_scaling() {
        let rect = BinRect::new(-20, 40, 40, 80);
        assert_eq!(rect.num_rows(), 60);
        assert_eq!(rect.num_cols(), 40);

        let bp = rect.to_bp(5000);
        assert_eq!(
            bp,
            BpRect {
                x0: -100_000,
                y0: 200_000,
                x1: 200_000,
                y1: 400_000
            }
        );
    }

    #[rstest]
    #[case(0, 10, 0, 10, true)]
    #[case(100, 200, 0, 10, false)]
    #[case(0, 10, 100, 200, false)]
    #[case(99, 100, 99, 100, true)]
    #[case(100, 110, 50, 60, false)]
    fn test_intersects(
        #[case] start1: u64,
        #[case] end1: u64,
        #[case] start2: u64,
        #[case] end2: u64,
        #[case] expected: bool,
    ) {
        let rect = BpRect {
            x0: 0,
            y0: 0,
            x1: 100,
            y1: 100,
        };
        assert_eq!(rect.intersects(start1, end1, start2, end2), expected);
    }
}
