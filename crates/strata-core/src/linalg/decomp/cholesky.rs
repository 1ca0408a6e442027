//! Cholesky decomposition for symmetric positive-definite matrices.
//!
//! Decomposes a symmetric positive-definite matrix `A` into `A = L L^T`
//! where `L` is lower triangular with positive diagonal entries. Only the
//! lower triangle of `A` is read; symmetry is not checked.

use tracing::debug;

use crate::error::{CoreError, Result};
use crate::tensor::Tensor;
use crate::{Float, Scalar};

use super::square_dim;

/// Result of a Cholesky decomposition.
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition<T: Scalar> {
    /// Lower triangular factor stored as a flat n x n array.
    l_data: Vec<T>,
    n: usize,
}

#[allow(clippy::many_single_char_names)]
impl<T: Scalar> CholeskyDecomposition<T> {
    /// Factor a square matrix using `sqrt` for the diagonal.
    ///
    /// `L[i,i] = sqrt(A[i,i] - Σ_{k<i} L[i,k]^2)` and
    /// `L[i,j] = (A[i,j] - Σ_{k<j} L[i,k] L[j,k]) / L[j,j]` for `i > j`.
    /// A radicand that is not strictly positive means `A` is not positive
    /// definite and fails with [`CoreError::InvalidArgument`].
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// # use strata_core::linalg::decomp::CholeskyDecomposition;
    /// let a = Tensor::from_vec(vec![4.0_f64, 2.0, 2.0, 3.0], vec![2, 2]).unwrap();
    /// let chol = CholeskyDecomposition::decompose_with(&a, f64::sqrt).unwrap();
    /// let l = chol.l();
    /// let prod = l.matmul(&l.transpose().unwrap()).unwrap();
    /// assert!((prod.get(&[1, 1]).unwrap() - 3.0).abs() < 1e-10);
    /// ```
    pub fn decompose_with<F>(a: &Tensor<T>, sqrt: F) -> Result<Self>
    where
        F: Fn(T) -> T,
    {
        let n = square_dim(a, "Cholesky decomposition requires a square 2-D matrix")?;
        debug!(n, "Cholesky decomposition");

        let mut l = vec![T::zero(); n * n];

        for j in 0..n {
            // Diagonal element
            let mut sum = a.at(j, j);
            for k in 0..j {
                sum -= l[j * n + k] * l[j * n + k];
            }
            if sum <= T::zero() {
                return Err(CoreError::InvalidArgument {
                    reason: "matrix is not positive definite",
                });
            }
            let diag = sqrt(sum);
            l[j * n + j] = diag;

            // Off-diagonal elements
            for i in (j + 1)..n {
                let mut sum = a.at(i, j);
                for k in 0..j {
                    sum -= l[i * n + k] * l[j * n + k];
                }
                l[i * n + j] = sum / diag;
            }
        }

        Ok(Self { l_data: l, n })
    }

    /// The lower triangular factor `L`.
    pub fn l(&self) -> Tensor<T> {
        Tensor::from_parts(self.l_data.clone(), vec![self.n, self.n])
    }

    /// Take the lower triangular factor `L`.
    pub fn into_l(self) -> Tensor<T> {
        Tensor::from_parts(self.l_data, vec![self.n, self.n])
    }

    /// Solve the linear system `Ax = b` using the Cholesky factorization.
    ///
    /// Since `A = L L^T`, solves `L y = b` (forward) then `L^T x = y` (backward).
    pub fn solve(&self, b: &Tensor<T>) -> Result<Tensor<T>> {
        if b.ndim() != 1 {
            return Err(CoreError::InvalidArgument {
                reason: "Cholesky solve: `b` must be a 1-D tensor",
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

        // Forward substitution: L y = b
        #[allow(clippy::needless_range_loop)]
        for i in 0..n {
            for j in 0..i {
                let l_xj = self.l_data[i * n + j] * x[j];
                x[i] -= l_xj;
            }
            x[i] /= self.l_data[i * n + i];
        }

        // Back substitution: L^T x = y
        #[allow(clippy::needless_range_loop)]
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let lt_xj = self.l_data[j * n + i] * x[j];
                x[i] -= lt_xj;
            }
            x[i] /= self.l_data[i * n + i];
        }

        Ok(Tensor::from_parts(x, vec![n]))
    }
}

impl<T: Float> CholeskyDecomposition<T> {
    /// Factor a square float matrix using [`Float::sqrt`].
    pub fn decompose(a: &Tensor<T>) -> Result<Self> {
        Self::decompose_with(a, T::sqrt)
    }
}

impl<T: Scalar> Tensor<T> {
    /// Cholesky factor `L` of a positive-definite matrix, with a
    /// caller-supplied root.
    ///
    /// See [`CholeskyDecomposition::decompose_with`].
    pub fn cholesky_decomposition<F>(&self, sqrt: F) -> Result<Tensor<T>>
    where
        F: Fn(T) -> T,
    {
        Ok(CholeskyDecomposition::decompose_with(self, sqrt)?.into_l())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn approx_eq(a: &[f64], b: &[f64], tol: f64) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| (x - y).abs() < tol)
    }

    fn sym_pd(data: &[f64], n: usize) -> Tensor<f64> {
        // A^T A + I is symmetric positive definite
        let a = Tensor::from_vec(data.to_vec(), vec![n, n]).unwrap();
        let ata = a.transpose().unwrap().matmul(&a).unwrap();
        ata + Tensor::identity(n).unwrap()
    }

    #[test]
    fn test_cholesky_3x3() {
        // A = [[25,15,-5],[15,18,0],[-5,0,11]], L = [[5,0,0],[3,3,0],[-1,1,3]]
        let a = Tensor::from_vec(
            vec![25.0, 15.0, -5.0, 15.0, 18.0, 0.0, -5.0, 0.0, 11.0],
            vec![3, 3],
        )
        .unwrap();
        let l = a.cholesky_decomposition(f64::sqrt).unwrap();
        assert_eq!(
            l.to_vec(),
            vec![5.0, 0.0, 0.0, 3.0, 3.0, 0.0, -1.0, 1.0, 3.0]
        );
        let prod = l.matmul(&l.transpose().unwrap()).unwrap();
        assert!(approx_eq(&prod.to_vec(), &a.to_vec(), 1e-10));
    }

    #[test]
    fn test_cholesky_identity() {
        let eye = Tensor::<f64>::identity(4).unwrap();
        let chol = CholeskyDecomposition::decompose(&eye).unwrap();
        assert_eq!(chol.l(), eye);
    }

    #[test]
    fn test_cholesky_solve() {
        let a = Tensor::from_vec(
            vec![25.0, 15.0, -5.0, 15.0, 18.0, 0.0, -5.0, 0.0, 11.0],
            vec![3, 3],
        )
        .unwrap();
        let b = Tensor::from_vec(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
        let chol = CholeskyDecomposition::decompose(&a).unwrap();
        let x = chol.solve(&b).unwrap();
        let ax = a.matvec(&x).unwrap();
        assert!(approx_eq(&ax.to_vec(), &b.to_vec(), 1e-10));
    }

    #[test]
    fn test_cholesky_not_pd() {
        // Eigenvalues 3 and -1
        let a = Tensor::from_vec(vec![1.0, 2.0, 2.0, 1.0], vec![2, 2]).unwrap();
        assert_eq!(
            CholeskyDecomposition::decompose(&a).unwrap_err(),
            CoreError::InvalidArgument {
                reason: "matrix is not positive definite"
            }
        );
        let z = Tensor::<f64>::zeros(vec![2, 2]).unwrap();
        assert!(z.cholesky_decomposition(f64::sqrt).is_err());
    }

    #[test]
    fn test_cholesky_not_square() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
        assert_eq!(
            CholeskyDecomposition::decompose(&a).unwrap_err().kind(),
            ErrorKind::Argument
        );
    }

    #[test]
    fn test_cholesky_generated_spd() {
        let spd = sym_pd(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0], 3);
        let l = spd.cholesky_decomposition(f64::sqrt).unwrap();
        let prod = l.matmul(&l.transpose().unwrap()).unwrap();
        assert!(approx_eq(&prod.to_vec(), &spd.to_vec(), 1e-10));
    }
}
