//! Dense matrix of pairwise waveform distances.

use std::ops::Index;

use crate::distance::DistanceVector;

/// Square distance matrix stored row-major.
///
/// Entry `(i, j)` is the distance with waveform `i` rescaled onto waveform
/// `j`. The measure is directional, so the matrix is generally not
/// symmetric and all `n*n` entries are stored, the diagonal included.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<DistanceVector>,
}

impl DistanceMatrix {
    /// `data` must contain exactly `n*n` elements in row-major order.
    pub(crate) fn from_raw(n: usize, data: Vec<DistanceVector>) -> Self {
        debug_assert_eq!(data.len(), n * n);
        Self { n, data }
    }

    /// Return the number of waveforms in the matrix.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Return true if the matrix is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Return the distance from waveform `i` to waveform `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n` or `j >= n`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> DistanceVector {
        self[(i, j)]
    }

    /// Return all distances from waveform `i` to every waveform.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[DistanceVector] {
        assert!(i < self.n, "row index {i} out of bounds for matrix of size {}", self.n);
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Iterate over all entries as `(i, j, distance)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, DistanceVector)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(flat, &d)| (flat / self.n, flat % self.n, d))
    }

    /// Return the `d1` components as `n` rows of `n` values.
    #[must_use]
    pub fn shape_rows(&self) -> Vec<Vec<f64>> {
        self.component_rows(DistanceVector::shape)
    }

    /// Return the `d2` components as `n` rows of `n` values.
    #[must_use]
    pub fn scale_rows(&self) -> Vec<Vec<f64>> {
        self.component_rows(DistanceVector::scale)
    }

    fn component_rows(&self, component: fn(DistanceVector) -> f64) -> Vec<Vec<f64>> {
        (0..self.n)
            .map(|i| self.row(i).iter().map(|&d| component(d)).collect())
            .collect()
    }
}

impl Index<(usize, usize)> for DistanceMatrix {
    type Output = DistanceVector;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(i < self.n, "row index {i} out of bounds for matrix of size {}", self.n);
        assert!(j < self.n, "column index {j} out of bounds for matrix of size {}", self.n);
        &self.data[i * self.n + j]
    }
}
