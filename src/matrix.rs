use ndarray::linalg::general_mat_vec_mul;
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Zip};

/// Dense weight storage, indexed as `(input, output)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Mat {
    data: Array2<f64>,
}

impl Mat {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Mat {
            data: Array2::zeros((rows, cols)),
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[[row, col]]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[[row, col]] = value;
    }

    /// Computes `out = x * M`, treating `x` as a row vector.
    pub fn premultiply_into(&self, x: &[f64], out: &mut [f64]) {
        assert_eq!(x.len(), self.rows());
        assert_eq!(out.len(), self.cols());
        general_mat_vec_mul(
            1.0,
            &self.data.t(),
            &ArrayView1::from(x),
            0.0,
            &mut ArrayViewMut1::from(out),
        );
    }

    /// Computes `out = M * v`.
    pub fn multiply_into(&self, v: &[f64], out: &mut [f64]) {
        assert_eq!(v.len(), self.cols());
        assert_eq!(out.len(), self.rows());
        general_mat_vec_mul(
            1.0,
            &self.data,
            &ArrayView1::from(v),
            0.0,
            &mut ArrayViewMut1::from(out),
        );
    }

    /// Rank-one update: `M[i][j] += alpha * x[i] * y[j]`.
    pub fn add_outer(&mut self, alpha: f64, x: &[f64], y: &[f64]) {
        assert_eq!(x.len(), self.rows());
        assert_eq!(y.len(), self.cols());
        Zip::indexed(&mut self.data).for_each(|(i, j), m| {
            *m += alpha * x[i] * y[j];
        });
    }

    /// Replaces every element with a fresh sample from `sample`.
    pub fn fill_with<F>(&mut self, mut sample: F)
    where
        F: FnMut() -> f64,
    {
        self.data.map_inplace(|m| *m = sample());
    }
}
