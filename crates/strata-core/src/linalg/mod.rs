//! Linear algebra operations.
//!
//! All routines are implemented from scratch and work on any stride layout.
//! The API is split into BLAS-style kernels plus matrix decompositions:
//!
//! | Level | Operations | Complexity |
//! |-------|-----------|------------|
//! | L1 | `dot`, `nrm2` | O(n) |
//! | L2 | `gemv` (matrix-vector multiply) | O(n^2) |
//! | L3 | `gemm` (matrix-matrix multiply) | O(n^3) |
//!
//! On top of those sit the elimination routines on [`Tensor`]
//! ([`determinant`](Tensor::determinant), [`inverse`](Tensor::inverse),
//! [`solve`](Tensor::solve)) and the decompositions: [`LuDecomposition`],
//! [`QrDecomposition`], [`CholeskyDecomposition`], [`SvdDecomposition`],
//! [`EigDecomposition`].

pub mod blas;
pub mod decomp;

pub use blas::{dot, gemm, gemv, nrm2};
pub use decomp::CholeskyDecomposition;
pub use decomp::EigDecomposition;
pub use decomp::LuDecomposition;
pub use decomp::QrDecomposition;
pub use decomp::SvdDecomposition;

use tracing::debug;

use crate::Scalar;
use crate::error::{CoreError, Result};
use crate::tensor::Tensor;

use decomp::square_dim;

/// Transpose of a rank-2 tensor.
///
/// ```
/// # use strata_core::tensor::Tensor;
/// # use strata_core::linalg;
/// let a = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], vec![2, 3]).unwrap();
/// assert_eq!(linalg::transpose(&a).unwrap().shape(), &[3, 2]);
/// ```
pub fn transpose<T: Scalar>(a: &Tensor<T>) -> Result<Tensor<T>> {
    a.transpose()
}

/// Solve the linear system `Ax = b` for a square matrix `A`.
///
/// Uses the pivot-free LU decomposition internally.
///
/// ```
/// # use strata_core::tensor::Tensor;
/// # use strata_core::linalg;
/// let a = Tensor::from_vec(vec![2.0_f64, 1.0, 1.0, 4.0], vec![2, 2]).unwrap();
/// let b = Tensor::from_vec(vec![5.0_f64, 6.0], vec![2]).unwrap();
/// let x = linalg::solve(&a, &b).unwrap();
/// assert!((x.get(&[0]).unwrap() - 2.0).abs() < 1e-10);
/// assert!((x.get(&[1]).unwrap() - 1.0).abs() < 1e-10);
/// ```
pub fn solve<T: Scalar>(a: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>> {
    LuDecomposition::decompose(a)?.solve(b)
}

/// Compute the inverse of a square matrix by Gauss-Jordan elimination.
///
/// Returns [`CoreError::SingularMatrix`] on a zero pivot.
///
/// ```
/// # use strata_core::tensor::Tensor;
/// # use strata_core::linalg;
/// let a = Tensor::from_vec(vec![2.0_f64, 1.0, 1.0, 4.0], vec![2, 2]).unwrap();
/// let inv = linalg::inv(&a).unwrap();
/// // A * A^-1 ≈ I
/// let eye = a.matmul(&inv).unwrap();
/// assert!((eye.get(&[0, 0]).unwrap() - 1.0).abs() < 1e-10);
/// ```
pub fn inv<T: Scalar>(a: &Tensor<T>) -> Result<Tensor<T>> {
    a.inverse()
}

/// Compute the determinant of a square matrix by cofactor expansion.
///
/// ```
/// # use strata_core::tensor::Tensor;
/// # use strata_core::linalg;
/// let a = Tensor::from_vec(vec![2.0_f64, 1.0, 1.0, 4.0], vec![2, 2]).unwrap();
/// let det = linalg::det(&a).unwrap();
/// assert!((det - 7.0).abs() < 1e-10);
/// ```
pub fn det<T: Scalar>(a: &Tensor<T>) -> Result<T> {
    a.determinant()
}

impl<T: Scalar> Tensor<T> {
    /// Determinant of a square matrix.
    ///
    /// Expands along the first row recursively (Laplace expansion), which is
    /// O(n!) and only practical for small matrices. Prefer
    /// [`LuDecomposition::det`] for anything larger.
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// let a = Tensor::from_vec(vec![4, 3, 6, 3], vec![2, 2]).unwrap();
    /// assert_eq!(a.determinant().unwrap(), -6);
    /// ```
    pub fn determinant(&self) -> Result<T> {
        let n = square_dim(self, "determinant requires a square 2-D matrix")?;
        debug!(n, "determinant (cofactor expansion)");
        Ok(cofactor_det(&self.copy().to_vec(), n))
    }

    /// Inverse of a square matrix by Gauss-Jordan elimination without row
    /// exchanges.
    ///
    /// The receiver is left untouched. A zero pivot at step `i` is reported
    /// as [`CoreError::SingularMatrix`] with `pivot: i`, which also happens
    /// for some invertible matrices (e.g. `[[0, 1], [1, 0]]`).
    pub fn inverse(&self) -> Result<Tensor<T>> {
        let mut work = self.copy();
        work.inverse_in_place()
    }

    /// Inverse of a square matrix, reducing `self` towards the identity.
    ///
    /// Same algorithm as [`inverse`](Self::inverse), but the elimination
    /// steps are applied to the receiver. For a tensor on a
    /// [`SharedBuffer`](crate::tensor::SharedBuffer) every alias observes the
    /// writes. On error the receiver holds the partially reduced matrix.
    pub fn inverse_in_place(&mut self) -> Result<Tensor<T>> {
        let n = square_dim(self, "inverse requires a square 2-D matrix")?;
        debug!(n, "inverse (Gauss-Jordan)");

        let mut inv = vec![T::zero(); n * n];
        for i in 0..n {
            inv[i * n + i] = T::one();
        }

        for i in 0..n {
            let pivot = self.at(i, i);
            if pivot.is_zero() {
                return Err(CoreError::SingularMatrix { pivot: i });
            }

            for j in 0..n {
                let v = self.at(i, j);
                self.put(i, j, v / pivot);
                inv[i * n + j] /= pivot;
            }

            for k in (0..n).filter(|&k| k != i) {
                let factor = self.at(k, i);
                if factor.is_zero() {
                    continue;
                }
                for j in 0..n {
                    let v = self.at(k, j) - factor * self.at(i, j);
                    self.put(k, j, v);
                    let inv_ij = inv[i * n + j];
                    inv[k * n + j] -= factor * inv_ij;
                }
            }
        }

        Ok(Tensor::from_parts(inv, vec![n, n]))
    }

    /// Solve `self · x = b` for a square `self` and 1-D `b`.
    ///
    /// See [`solve`].
    pub fn solve(&self, b: &Tensor<T>) -> Result<Tensor<T>> {
        solve(self, b)
    }
}

/// Laplace expansion along row 0 of a row-major `n x n` matrix.
fn cofactor_det<T: Scalar>(m: &[T], n: usize) -> T {
    match n {
        1 => m[0],
        2 => m[0] * m[3] - m[1] * m[2],
        _ => {
            let mut det = T::zero();
            let mut minor = Vec::with_capacity((n - 1) * (n - 1));
            for col in 0..n {
                minor.clear();
                for r in 1..n {
                    for c in (0..n).filter(|&c| c != col) {
                        minor.push(m[r * n + c]);
                    }
                }
                let term = m[col] * cofactor_det(&minor, n - 1);
                if col % 2 == 0 {
                    det += term;
                } else {
                    det -= term;
                }
            }
            det
        }
    }
}
