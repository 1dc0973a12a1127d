use std::fmt::{self, Display};

use ndarray::{Array2, ArrayView2};

use hicstripe_core::models::BinRect;

use crate::consts::{HORIZONTAL_TAG, VERTICAL_TAG};

///
/// Orientation of a stripe window relative to the diagonal.
///
/// Horizontal windows hang below-right of their anchor and are `x × y`; vertical windows
/// end at their anchor and are `y × x`. Vertical outputs are remapped into the horizontal
/// frame with [`Orientation::canonicalize`] before they are persisted.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn is_vertical(&self) -> bool {
        matches!(self, Orientation::Vertical)
    }

    /// Tag embedded in the file names of windows scanned in this orientation.
    pub fn tag(&self) -> &'static str {
        match self {
            Orientation::Horizontal => HORIZONTAL_TAG,
            Orientation::Vertical => VERTICAL_TAG,
        }
    }

    ///
    /// Rectangle covered by the window anchored at `(row, col)`.
    ///
    pub fn rect(&self, row: i64, col: i64, x: usize, y: usize) -> BinRect {
        let (x, y) = (x as i64, y as i64);
        match self {
            Orientation::Horizontal => BinRect::new(row, col, row + x, col + y),
            Orientation::Vertical => BinRect::new(row - y, col - x, row, col),
        }
    }

    ///
    /// Whether a feature footprint `row_len × col_len` bins is stretched along this
    /// orientation: wider than tall for horizontal windows, taller than wide for vertical ones.
    ///
    pub fn accepts(&self, row_len: i64, col_len: i64) -> bool {
        match self {
            Orientation::Horizontal => col_len > row_len,
            Orientation::Vertical => row_len > col_len,
        }
    }

    /// Bring a grid extracted in this orientation into the canonical (horizontal) frame.
    pub fn canonicalize<T: Clone>(&self, grid: Array2<T>) -> Array2<T> {
        match self {
            Orientation::Horizontal => grid,
            Orientation::Vertical => canonical_transform(&grid.view()),
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

///
/// Remap an `R × C` grid `m` into the `C × R` grid `t` with `t[C-1-j][R-1-i] = m[i][j]`.
///
/// This is a reflection across the anti-diagonal: neither a plain transpose nor a flip.
///
pub fn canonical_transform<T: Clone>(m: &ArrayView2<T>) -> Array2<T> {
    let (rows, cols) = m.dim();
    Array2::from_shape_fn((cols, rows), |(a, b)| {
        m[[rows - 1 - b, cols - 1 - a]].clone()
    })
}

/// Bin coordinates of one scan step, plus the orientation it was scanned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub row: i64,
    pub col: i64,
    pub orientation: Orientation,
}

impl Anchor {
    pub fn new(row: i64, col: i64, orientation: Orientation) -> Self {
        Self {
            row,
            col,
            orientation,
        }
    }

    pub fn window(&self, x: usize, y: usize) -> Window {
        Window {
            anchor: *self,
            rect: self.orientation.rect(self.row, self.col, x, y),
        }
    }
}

/// The rectangle an anchor covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub anchor: Anchor,
    pub rect: BinRect,
}

impl Window {
    pub fn orientation(&self) -> Orientation {
        self.anchor.orientation
    }

    /// `(rows, cols)` of the window before canonicalization.
    pub fn shape(&self) -> (usize, usize) {
        (self.rect.num_rows(), self.rect.num_cols())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Orientation::Horizontal, BinRect::new(10, 12, 14, 18), (4, 6))]
    #[case(Orientation::Vertical, BinRect::new(4, 8, 10, 12), (6, 4))]
    fn test_window_geometry(
        #[case] orientation: Orientation,
        #[case] rect: BinRect,
        #[case] shape: (usize, usize),
    ) {
        let window = Anchor::new(10, 12, orientation).window(4, 6);
        assert_eq!(window.rect, rect);
        assert_eq!(window.shape(), shape);
    }

    #[rstest]
    fn test_vertical_window_can_start_before_the_map() {
        let window = Anchor::new(3, 2, Orientation::Vertical).window(5, 7);
        assert_eq!(window.rect, BinRect::new(-4, -3, 3, 2));
        assert_eq!(window.shape(), (7, 5));
    }

    #[rstest]
    #[case(Orientation::Horizontal, 3, 1, false)]
    #[case(Orientation::Vertical, 3, 1, true)]
    #[case(Orientation::Horizontal, 1, 3, true)]
    #[case(Orientation::Vertical, 1, 3, false)]
    #[case(Orientation::Horizontal, 2, 2, false)]
    #[case(Orientation::Vertical, 2, 2, false)]
    fn test_accepts(
        #[case] orientation: Orientation,
        #[case] row_len: i64,
        #[case] col_len: i64,
        #[case] accepted: bool,
    ) {
        assert_eq!(orientation.accepts(row_len, col_len), accepted);
    }

    #[rstest]
    fn test_canonical_transform_small() {
        let m = array![[1, 2, 3], [4, 5, 6]];
        let t = canonical_transform(&m.view());
        assert_eq!(t, array![[6, 3], [5, 2], [4, 1]]);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 5)]
    #[case(7, 3)]
    fn test_canonical_transform_is_anti_diagonal_reflection(
        #[case] rows: usize,
        #[case] cols: usize,
    ) {
        let m = Array2::from_shape_fn((rows, cols), |(i, j)| i * 100 + j);
        let t = canonical_transform(&m.view());

        assert_eq!(t.dim(), (cols, rows));
        for i in 0..rows {
            for j in 0..cols {
                assert_eq!(t[[cols - 1 - j, rows - 1 - i]], m[[i, j]]);
            }
        }
        // reflecting twice is the identity
        assert_eq!(canonical_transform(&t.view()), m);
    }

    #[rstest]
    fn test_canonicalize_keeps_data_and_labels_aligned() {
        let data = Array2::from_shape_fn((6, 4), |(i, j)| (i * 4 + j) as f64);
        let labels = data.mapv(|v| u8::from(v as usize % 3 == 0));

        let data_c = Orientation::Vertical.canonicalize(data);
        let labels_c = Orientation::Vertical.canonicalize(labels);
        assert_eq!(data_c.dim(), (4, 6));
        for (d, l) in data_c.iter().zip(labels_c.iter()) {
            assert_eq!(*l, u8::from(*d as usize % 3 == 0));
        }

        let h = Array2::from_shape_fn((4, 6), |(i, j)| i + j);
        assert_eq!(Orientation::Horizontal.canonicalize(h.clone()), h);
    }
}
