//! LU decomposition by the Doolittle scheme, without pivoting.
//!
//! Decomposes a square matrix `A` into `A = LU` where:
//! - `L` is lower triangular with unit diagonal
//! - `U` is upper triangular
//!
//! Rows are never exchanged, so a matrix whose leading principal minors are
//! not all non-singular fails with [`CoreError::SingularMatrix`] even when
//! `A` itself is invertible.

use tracing::debug;

use crate::Scalar;
use crate::error::{CoreError, Result};
use crate::tensor::Tensor;

use super::square_dim;

/// Result of a pivot-free LU decomposition.
///
/// `L` and `U` are packed into a single row-major matrix; the unit diagonal
/// of `L` is implicit.
#[derive(Debug, Clone)]
pub struct LuDecomposition<T: Scalar> {
    /// Strict lower triangle holds L, upper triangle (with diagonal) holds U.
    lu: Vec<T>,
    n: usize,
}

impl<T: Scalar> LuDecomposition<T> {
    /// Factor a square matrix.
    ///
    /// For increasing `i`:
    /// `U[i,j] = A[i,j] - Σ_{k<i} L[i,k] U[k,j]` for `j >= i`, then
    /// `L[j,i] = (A[j,i] - Σ_{k<i} L[j,k] U[k,i]) / U[i,i]` for `j > i`.
    /// The input is only read.
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// # use strata_core::linalg::decomp::LuDecomposition;
    /// let a = Tensor::from_vec(vec![4.0_f64, 3.0, 6.0, 3.0], vec![2, 2]).unwrap();
    /// let lu = LuDecomposition::decompose(&a).unwrap();
    /// assert_eq!(lu.l().to_vec(), vec![1.0, 0.0, 1.5, 1.0]);
    /// assert_eq!(lu.u().to_vec(), vec![4.0, 3.0, 0.0, -1.5]);
    /// ```
    pub fn decompose(a: &Tensor<T>) -> Result<Self> {
        let n = square_dim(a, "LU decomposition requires a square 2-D matrix")?;
        debug!(n, "LU decomposition");

        let mut lu = vec![T::zero(); n * n];
        for i in 0..n {
            for j in i..n {
                let mut sum = T::zero();
                for k in 0..i {
                    sum += lu[i * n + k] * lu[k * n + j];
                }
                lu[i * n + j] = a.at(i, j) - sum;
            }

            let pivot = lu[i * n + i];
            if pivot.is_zero() {
                return Err(CoreError::SingularMatrix { pivot: i });
            }

            for j in (i + 1)..n {
                let mut sum = T::zero();
                for k in 0..i {
                    sum += lu[j * n + k] * lu[k * n + i];
                }
                lu[j * n + i] = (a.at(j, i) - sum) / pivot;
            }
        }

        Ok(Self { lu, n })
    }

    /// The unit lower triangular factor `L`.
    pub fn l(&self) -> Tensor<T> {
        let n = self.n;
        let mut data = vec![T::zero(); n * n];
        for i in 0..n {
            data[i * n + i] = T::one();
            for j in 0..i {
                data[i * n + j] = self.lu[i * n + j];
            }
        }
        Tensor::from_parts(data, vec![n, n])
    }

    /// The upper triangular factor `U`.
    pub fn u(&self) -> Tensor<T> {
        let n = self.n;
        let mut data = vec![T::zero(); n * n];
        for i in 0..n {
            for j in i..n {
                data[i * n + j] = self.lu[i * n + j];
            }
        }
        Tensor::from_parts(data, vec![n, n])
    }

    /// Split into `(L, U)`.
    pub fn into_parts(self) -> (Tensor<T>, Tensor<T>) {
        (self.l(), self.u())
    }

    /// `det(A) = product(diag(U))`.
    pub fn det(&self) -> T {
        (0..self.n).fold(T::one(), |d, i| d * self.lu[i * self.n + i])
    }

    /// Solve `Ax = b` with the precomputed factors.
    ///
    /// `b` must be a 1-D tensor of length `n`.
    pub fn solve(&self, b: &Tensor<T>) -> Result<Tensor<T>> {
        if b.ndim() != 1 {
            return Err(CoreError::InvalidArgument {
                reason: "solve: `b` must be a 1-D tensor",
            });
        }
        if b.numel() != self.n {
            return Err(CoreError::DimensionMismatch {
                expected: vec![self.n],
                got: b.shape().to_vec(),
            });
        }

        let n = self.n;
        let mut x = b.to_vec();

        // Forward substitution: Ly = b
        #[allow(clippy::needless_range_loop)]
        for i in 1..n {
            for j in 0..i {
                let lij_xj = self.lu[i * n + j] * x[j];
                x[i] -= lij_xj;
            }
        }

        // Back substitution: Ux = y
        #[allow(clippy::needless_range_loop)]
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let uij_xj = self.lu[i * n + j] * x[j];
                x[i] -= uij_xj;
            }
            x[i] /= self.lu[i * n + i];
        }

        Ok(Tensor::from_parts(x, vec![n]))
    }
}

impl<T: Scalar> Tensor<T> {
    /// LU-factor a square matrix into `(L, U)` without pivoting.
    ///
    /// See [`LuDecomposition::decompose`].
    pub fn lu_decomposition(&self) -> Result<(Tensor<T>, Tensor<T>)> {
        Ok(LuDecomposition::decompose(self)?.into_parts())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::tensor::{Layout, SharedBuffer, TensorOptions};

    fn mat(data: &[f64], n: usize) -> Tensor<f64> {
        Tensor::from_vec(data.to_vec(), vec![n, n]).unwrap()
    }

    fn approx_eq(a: &[f64], b: &[f64], tol: f64) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| (x - y).abs() < tol)
    }

    #[test]
    fn test_lu_3x3() {
        let a = mat(&[2.0, 1.0, 1.0, 4.0, 3.0, 3.0, 8.0, 7.0, 9.0], 3);
        let (l, u) = a.lu_decomposition().unwrap();
        let lu_prod = l.matmul(&u).unwrap();
        assert!(approx_eq(&lu_prod.to_vec(), &a.to_vec(), 1e-12));

        // L unit lower, U upper
        for i in 0..3 {
            assert_eq!(l.get(&[i, i]).unwrap(), 1.0);
            for j in (i + 1)..3 {
                assert_eq!(l.get(&[i, j]).unwrap(), 0.0);
                assert_eq!(u.get(&[j, i]).unwrap(), 0.0);
            }
        }
    }

    #[test]
    fn test_lu_column_major_input() {
        // Same matrix as above, stored column-major
        let opts = TensorOptions::new().layout(Layout::ColumnMajor);
        let a = Tensor::from_vec_with(
            vec![2.0, 4.0, 8.0, 1.0, 3.0, 7.0, 1.0, 3.0, 9.0],
            vec![3, 3],
            &opts,
        )
        .unwrap();
        let (l, u) = a.lu_decomposition().unwrap();
        let lu_prod = l.matmul(&u).unwrap();
        assert!(approx_eq(
            &lu_prod.to_vec(),
            &[2.0, 1.0, 1.0, 4.0, 3.0, 3.0, 8.0, 7.0, 9.0],
            1e-12
        ));
    }

    #[test]
    fn test_input_untouched() {
        let buf = SharedBuffer::new(vec![2.0, 1.0, 4.0, 5.0]);
        let a = Tensor::from_shared(buf.clone(), vec![2, 2], &TensorOptions::new()).unwrap();
        a.lu_decomposition().unwrap();
        assert_eq!(buf.to_vec(), vec![2.0, 1.0, 4.0, 5.0]);
    }

    #[test]
    fn test_det() {
        // >>> np.linalg.det([[6,1,1],[4,-2,5],[2,8,7]])
        // -306.0
        let a = mat(&[6.0, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0], 3);
        let lu = LuDecomposition::decompose(&a).unwrap();
        assert!((lu.det() - (-306.0)).abs() < 1e-10);
    }

    #[test]
    fn test_zero_pivot() {
        // Invertible, but U[0,0] = 0 without row exchanges
        let a = mat(&[0.0, 1.0, 1.0, 0.0], 2);
        assert_eq!(
            LuDecomposition::decompose(&a).unwrap_err(),
            CoreError::SingularMatrix { pivot: 0 }
        );

        // Dependent rows give a zero pivot at the last step
        let a = mat(&[1.0, 2.0, 2.0, 4.0], 2);
        assert_eq!(
            a.lu_decomposition().unwrap_err(),
            CoreError::SingularMatrix { pivot: 1 }
        );
    }

    #[test]
    fn test_solve() {
        // >>> A = np.array([[1,2,3],[4,5,6],[7,8,10]])
        // >>> np.linalg.solve(A, [1,2,3])
        // array([-0.33333333,  0.66666667,  0.        ])
        let a = mat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0], 3);
        let b = Tensor::from_vec(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
        let lu = LuDecomposition::decompose(&a).unwrap();
        let x = lu.solve(&b).unwrap();
        assert!(approx_eq(&x.to_vec(), &[-1.0 / 3.0, 2.0 / 3.0, 0.0], 1e-12));
    }

    #[test]
    fn test_solve_dimension_mismatch() {
        let a = mat(&[1.0, 0.0, 0.0, 1.0], 2);
        let lu = LuDecomposition::decompose(&a).unwrap();
        let b = Tensor::from_vec(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
        assert_eq!(lu.solve(&b).unwrap_err().kind(), ErrorKind::Shape);
        assert_eq!(lu.solve(&a).unwrap_err().kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_not_square() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
        assert_eq!(
            LuDecomposition::decompose(&a).unwrap_err().kind(),
            ErrorKind::Argument
        );
        let v = Tensor::from_vec(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
        assert!(v.lu_decomposition().is_err());
    }
}
