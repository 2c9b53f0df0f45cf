use crate::error::{FeatureError, Result};

/// A rectangular matrix of per-frame feature coefficients.
///
/// Rows are time frames (row 0 is the earliest frame), columns are
/// coefficient indices. The matrix is stored row-major and is guaranteed
/// rectangular and non-empty by every constructor, so downstream code can
/// rely on `rows >= 1` and `cols >= 1`.
///
/// # Example
///
/// ```rust
/// use mfcc_dynamics::FeatureMatrix;
///
/// let frames = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
/// let matrix = FeatureMatrix::from_rows(frames).unwrap();
/// assert_eq!(matrix.rows(), 2);
/// assert_eq!(matrix.cols(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// Builds a matrix from frame rows.
    ///
    /// Fails with `EmptyInput` when there are no frames or the first frame
    /// is empty, and with `RaggedRow` when any frame has a different length
    /// than the first.
    pub fn from_rows(frames: Vec<Vec<f64>>) -> Result<Self> {
        let rows = frames.len();
        let cols = frames.first().map(|f| f.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(FeatureError::EmptyInput { rows, cols });
        }

        let mut data = Vec::with_capacity(rows * cols);
        for (row, frame) in frames.iter().enumerate() {
            if frame.len() != cols {
                return Err(FeatureError::RaggedRow {
                    row,
                    expected: cols,
                    got: frame.len(),
                });
            }
            data.extend_from_slice(frame);
        }

        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix from single-precision frame rows, widening to `f64`.
    ///
    /// External MFCC extractors commonly emit `f32`; the filter pipeline
    /// works in `f64` throughout.
    pub fn from_f32_rows(frames: &[Vec<f32>]) -> Result<Self> {
        let widened = frames
            .iter()
            .map(|frame| frame.iter().map(|&v| f64::from(v)).collect())
            .collect();
        Self::from_rows(widened)
    }

    /// Builds a matrix from coefficient columns.
    ///
    /// Column `c` becomes matrix column `c`; every column must have the
    /// same length (the frame count).
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Result<Self> {
        let cols = columns.len();
        let rows = columns.first().map(|c| c.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(FeatureError::EmptyInput { rows, cols });
        }

        for (col, series) in columns.iter().enumerate() {
            if series.len() != rows {
                return Err(FeatureError::RaggedRow {
                    row: col,
                    expected: rows,
                    got: series.len(),
                });
            }
        }

        let mut data = vec![0.0; rows * cols];
        for (c, series) in columns.iter().enumerate() {
            for (r, &value) in series.iter().enumerate() {
                data[r * cols + c] = value;
            }
        }

        Ok(Self { rows, cols, data })
    }

    /// Number of time frames.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of coefficients per frame.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics when the indices are out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.data[row * self.cols + col]
    }

    /// The coefficients of frame `row` as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// The time series of coefficient `col`, copied out of the matrix.
    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|r| self.data[r * self.cols + col]).collect()
    }

    /// Returns the transposed matrix.
    ///
    /// Some extractors emit coefficients-as-rows / frames-as-columns; this
    /// puts such a matrix into the frames-as-rows orientation the filter
    /// expects.
    pub fn transposed(&self) -> FeatureMatrix {
        let mut data = vec![0.0; self.rows * self.cols];
        for r in 0..self.rows {
            for c in 0..self.cols {
                data[c * self.rows + r] = self.data[r * self.cols + c];
            }
        }
        FeatureMatrix {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// The backing row-major storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Concatenates the original coefficients with their delta and delta-delta
/// blocks into one augmented matrix.
///
/// The output has the same row count and the layout
/// `[original(0..C) | delta(0..C) | delta2(0..C)]` per row. Row order and
/// per-row coefficient order are preserved exactly; no values are recomputed.
pub fn assemble_augmented(
    original: &FeatureMatrix,
    delta: &FeatureMatrix,
    delta2: &FeatureMatrix,
) -> Result<FeatureMatrix> {
    let expected = (original.rows(), original.cols());
    for block in [delta, delta2] {
        let got = (block.rows(), block.cols());
        if got != expected {
            return Err(FeatureError::ShapeMismatch { expected, got });
        }
    }

    let (rows, cols) = expected;
    let mut data = Vec::with_capacity(rows * cols * 3);
    for r in 0..rows {
        data.extend_from_slice(original.row(r));
        data.extend_from_slice(delta.row(r));
        data.extend_from_slice(delta2.row(r));
    }

    Ok(FeatureMatrix {
        rows,
        cols: cols * 3,
        data,
    })
}
