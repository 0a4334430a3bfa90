//! Dense 2D matrix of `f64` values.
//!
//! This is the numeric foundation of the crate. Dimensions are fixed at
//! construction (`rows >= 1`, `columns >= 1`); operations that change shape
//! return a new matrix. A "vector" is a matrix with a single column unless a
//! single-row vector is explicitly called for (see [`Matrix::outer`]).
//!
//! Every fallible operation validates shapes before touching any data, so a
//! returned error never leaves an operand partially mutated.

use std::fmt;

use rand::Rng;

use crate::{Error, Result};

#[derive(Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    columns: usize,
    /// Row-major, `values.len() == rows * columns`.
    values: Vec<f64>,
}

impl Matrix {
    /// A zero-filled `rows x columns` matrix.
    pub fn zeros(rows: usize, columns: usize) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(Error::ZeroDimensionMatrix);
        }
        Ok(Self {
            rows,
            columns,
            values: vec![0.0; rows * columns],
        })
    }

    /// Build a matrix from per-row slices. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(Error::ZeroDimensionMatrix);
        }
        let columns = rows[0].len();
        let mut values = Vec::with_capacity(rows.len() * columns);
        for row in rows {
            if row.len() != columns {
                return Err(Error::MatrixDimensionMismatch {
                    expected: columns,
                    got: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            columns,
            values,
        })
    }

    /// Build a column vector (`len x 1`) from a slice.
    pub fn column(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::ZeroDimensionMatrix);
        }
        Ok(Self {
            rows: values.len(),
            columns: 1,
            values: values.to_vec(),
        })
    }

    /// Uniformly random values in `[-interval, interval]`.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        columns: usize,
        interval: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let mut m = Self::zeros(rows, columns)?;
        for v in &mut m.values {
            *v = rng.gen_range(-interval..=interval);
        }
        Ok(m)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// True for single-row or single-column matrices.
    #[inline]
    pub fn is_vector(&self) -> bool {
        self.rows == 1 || self.columns == 1
    }

    #[inline]
    pub fn is_column_vector(&self) -> bool {
        self.columns == 1
    }

    /// Element at `(row, column)`. Panics if out of bounds.
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> f64 {
        assert!(row < self.rows && column < self.columns, "index out of bounds");
        self.values[row * self.columns + column]
    }

    /// Set the element at `(row, column)`. Panics if out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        assert!(row < self.rows && column < self.columns, "index out of bounds");
        self.values[row * self.columns + column] = value;
    }

    /// The raw row-major buffer.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Matrix-vector product. `vec` must be a vector with `self.columns`
    /// rows; the result is a `self.rows x 1` column vector.
    pub fn multiply(&self, vec: &Matrix) -> Result<Matrix> {
        if !vec.is_vector() {
            return Err(Error::ExpectedVectorGotMatrix);
        }
        if self.columns != vec.rows {
            return Err(Error::MatrixDimensionMismatch {
                expected: self.columns,
                got: vec.rows,
            });
        }

        let mut result = Matrix::zeros(self.rows, 1)?;
        for i in 0..self.rows {
            let mut sum = 0.0;
            let row = i * self.columns;
            for j in 0..self.columns {
                sum += self.values[row + j] * vec.get(j, 0);
            }
            result.values[i] = sum;
        }
        Ok(result)
    }

    /// Multiply every element by `scalar`, in place.
    pub fn scale(&mut self, scalar: f64) {
        for v in &mut self.values {
            *v *= scalar;
        }
    }

    /// Add `scalar` to every element of a vector, in place.
    pub fn add_scalar(&mut self, scalar: f64) -> Result<()> {
        if !self.is_vector() {
            return Err(Error::ExpectedVectorGotMatrix);
        }
        for v in &mut self.values {
            *v += scalar;
        }
        Ok(())
    }

    /// Apply `f` to every element, in place.
    pub fn map(&mut self, f: impl Fn(f64) -> f64) {
        for v in &mut self.values {
            *v = f(*v);
        }
    }

    /// Elementwise `self - other`. Shapes must be identical.
    pub fn subtract(&self, other: &Matrix) -> Result<Matrix> {
        if self.rows != other.rows || self.columns != other.columns {
            return Err(Error::MatrixDimensionMismatch {
                expected: self.rows * self.columns,
                got: other.rows * other.columns,
            });
        }
        let mut result = self.clone();
        for (r, o) in result.values.iter_mut().zip(&other.values) {
            *r -= o;
        }
        Ok(result)
    }

    /// Hadamard product of two equal-length column vectors.
    pub fn hadamard(&self, other: &Matrix) -> Result<Matrix> {
        if !self.is_column_vector() || !other.is_column_vector() {
            return Err(Error::ExpectedVectorGotMatrix);
        }
        if self.rows != other.rows {
            return Err(Error::MatrixDimensionMismatch {
                expected: self.rows,
                got: other.rows,
            });
        }
        let mut result = self.clone();
        for (r, o) in result.values.iter_mut().zip(&other.values) {
            *r *= o;
        }
        Ok(result)
    }

    /// A new matrix with swapped dimensions.
    pub fn transpose(&self) -> Matrix {
        let mut result = Matrix {
            rows: self.columns,
            columns: self.rows,
            values: vec![0.0; self.values.len()],
        };
        for i in 0..self.rows {
            for j in 0..self.columns {
                result.values[j * result.columns + i] = self.values[i * self.columns + j];
            }
        }
        result
    }

    /// Transpose that consumes the input; the old buffer is released and the
    /// caller is left holding only the transposed matrix.
    pub fn into_transposed(self) -> Matrix {
        self.transpose()
    }

    /// Outer product of a column vector and a row vector (either argument
    /// order). For a `r x 1` column and a `1 x c` row the result is `r x c`
    /// with `result[i][j] = column[i] * row[j]`.
    pub fn outer(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        let (col, row) = if a.rows == 1 && b.columns == 1 {
            (b, a)
        } else if b.rows == 1 && a.columns == 1 {
            (a, b)
        } else {
            return Err(Error::ExpectedVectorGotMatrix);
        };

        let mut result = Matrix::zeros(col.rows, row.columns)?;
        for i in 0..col.rows {
            for j in 0..row.columns {
                result.values[i * result.columns + j] = col.values[i] * row.values[j];
            }
        }
        Ok(result)
    }

    /// Sum of all elements.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// The contents of a column vector as an owned `Vec`.
    ///
    /// Returns `ExpectedVectorGotMatrix` for anything wider than one column.
    pub fn to_column_vec(&self) -> Result<Vec<f64>> {
        if !self.is_column_vector() {
            return Err(Error::ExpectedVectorGotMatrix);
        }
        Ok(self.values.clone())
    }

    pub(crate) fn from_parts(rows: usize, columns: usize, values: Vec<f64>) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(Error::ZeroDimensionMatrix);
        }
        if values.len() != rows * columns {
            return Err(Error::MatrixDimensionMismatch {
                expected: rows * columns,
                got: values.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            values,
        })
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix {}x{}", self.rows, self.columns)?;
        fmt::Display::fmt(self, f)
    }
}

/// One space-separated line per row.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            for j in 0..self.columns {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.values[i * self.columns + j])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zeros_is_all_zero() {
        let m = Matrix::zeros(3, 4).unwrap();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.columns(), 4);
        assert!(m.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(Matrix::zeros(0, 4), Err(Error::ZeroDimensionMatrix)));
        assert!(matches!(Matrix::zeros(4, 0), Err(Error::ZeroDimensionMatrix)));
        assert!(matches!(Matrix::column(&[]), Err(Error::ZeroDimensionMatrix)));
    }

    #[test]
    fn identity_multiply_preserves_the_vector() {
        let mut identity = Matrix::zeros(3, 3).unwrap();
        for i in 0..3 {
            identity.set(i, i, 1.0);
        }
        let v = Matrix::column(&[1.5, -2.0, 0.25]).unwrap();
        let out = identity.multiply(&v).unwrap();
        assert_eq!(out, v);
    }

    #[test]
    fn multiply_rejects_mismatched_dimensions() {
        let m = Matrix::zeros(2, 3).unwrap();
        let v = Matrix::column(&[1.0, 2.0]).unwrap();
        assert!(matches!(
            m.multiply(&v),
            Err(Error::MatrixDimensionMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn multiply_rejects_non_vectors() {
        let m = Matrix::zeros(2, 2).unwrap();
        let not_vec = Matrix::zeros(2, 2).unwrap();
        assert!(matches!(
            m.multiply(&not_vec),
            Err(Error::ExpectedVectorGotMatrix)
        ));
    }

    #[test]
    fn multiply_computes_the_product() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let v = Matrix::column(&[1.0, 0.5, -1.0]).unwrap();
        let out = m.multiply(&v).unwrap();
        assert_eq!(out.to_column_vec().unwrap(), vec![-1.0, 0.5]);
    }

    #[test]
    fn double_transpose_is_identity() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.transpose().transpose(), m);

        let t = m.transpose();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.columns(), 2);
        assert_eq!(t.get(2, 1), 6.0);
    }

    #[test]
    fn consuming_transpose_matches_borrowing_transpose() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let expected = m.transpose();
        assert_eq!(m.into_transposed(), expected);
    }

    #[test]
    fn outer_product_of_column_and_row() {
        let col = Matrix::column(&[1.0, 2.0, 3.0]).unwrap();
        let row = Matrix::from_rows(&[vec![4.0, 5.0]]).unwrap();

        let m = Matrix::outer(&col, &row).unwrap();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.columns(), 2);
        for i in 0..3 {
            for j in 0..2 {
                assert_eq!(m.get(i, j), col.get(i, 0) * row.get(0, j));
            }
        }

        // Argument order does not matter.
        assert_eq!(Matrix::outer(&row, &col).unwrap(), m);
    }

    #[test]
    fn outer_rejects_two_column_vectors() {
        let a = Matrix::column(&[1.0, 2.0]).unwrap();
        let b = Matrix::column(&[3.0, 4.0]).unwrap();
        assert!(matches!(
            Matrix::outer(&a, &b),
            Err(Error::ExpectedVectorGotMatrix)
        ));
    }

    #[test]
    fn subtract_requires_identical_shapes() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(3, 2).unwrap();
        assert!(a.subtract(&b).is_err());

        let a = Matrix::from_rows(&[vec![3.0, 2.0]]).unwrap();
        let b = Matrix::from_rows(&[vec![1.0, 5.0]]).unwrap();
        let d = a.subtract(&b).unwrap();
        assert_eq!(d.values(), &[2.0, -3.0]);
    }

    #[test]
    fn hadamard_multiplies_elementwise() {
        let a = Matrix::column(&[1.0, 2.0, 3.0]).unwrap();
        let b = Matrix::column(&[4.0, -1.0, 0.5]).unwrap();
        let h = a.hadamard(&b).unwrap();
        assert_eq!(h.to_column_vec().unwrap(), vec![4.0, -2.0, 1.5]);

        let short = Matrix::column(&[1.0]).unwrap();
        assert!(a.hadamard(&short).is_err());
    }

    #[test]
    fn scale_map_and_add_scalar_mutate_in_place() {
        let mut v = Matrix::column(&[1.0, -2.0]).unwrap();
        v.scale(2.0);
        assert_eq!(v.values(), &[2.0, -4.0]);

        v.map(f64::abs);
        assert_eq!(v.values(), &[2.0, 4.0]);

        v.add_scalar(1.0).unwrap();
        assert_eq!(v.values(), &[3.0, 5.0]);

        let mut m = Matrix::zeros(2, 2).unwrap();
        assert!(matches!(
            m.add_scalar(1.0),
            Err(Error::ExpectedVectorGotMatrix)
        ));
    }

    #[test]
    fn random_stays_within_the_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::random(8, 8, 0.5, &mut rng).unwrap();
        assert!(m.values().iter().all(|&v| (-0.5..=0.5).contains(&v)));
        // A 64-element draw that comes out all-zero means the rng was not used.
        assert!(m.values().iter().any(|&v| v != 0.0));
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let mut a = Matrix::column(&[1.0, 2.0]).unwrap();
        let b = a.clone();
        a.set(0, 0, 9.0);
        assert_eq!(b.get(0, 0), 1.0);
    }
}
