//! QR decomposition by classical Gram-Schmidt orthogonalization.
//!
//! Decomposes a square matrix `A` into `A = QR` where:
//! - `Q` has orthonormal columns
//! - `R` is upper triangular with a positive diagonal
//!
//! Classical Gram-Schmidt loses orthogonality for nearly collinear columns.
//! The element type carries no square root of its own, so the caller
//! supplies one; float types can use [`QrDecomposition::decompose`].

use tracing::debug;

use crate::error::{CoreError, Result};
use crate::tensor::Tensor;
use crate::{Float, Scalar};

use super::square_dim;

/// Result of a QR decomposition.
#[derive(Debug, Clone)]
pub struct QrDecomposition<T: Scalar> {
    /// Row-major `n x n`; column `i` is the i-th orthonormal vector.
    q: Vec<T>,
    /// Row-major `n x n` upper triangle.
    r: Vec<T>,
    n: usize,
}

#[allow(clippy::many_single_char_names)]
impl<T: Scalar> QrDecomposition<T> {
    /// Factor a square matrix using `sqrt` for column norms.
    ///
    /// For each column `i` the running vector `v_i` (column `i` of `A` with
    /// the projections onto `q_0..q_{i-1}` removed) gives
    /// `R[i,i] = sqrt(v_i · v_i)` and `q_i = v_i / R[i,i]`; every later
    /// column then loses its projection `R[i,j] = q_i · v_j`.
    ///
    /// A column that is linearly dependent on its predecessors has zero
    /// norm and is reported as [`CoreError::SingularMatrix`] at that column.
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// # use strata_core::linalg::decomp::QrDecomposition;
    /// let a = Tensor::from_vec(vec![3.0_f64, 0.0, 4.0, 5.0], vec![2, 2]).unwrap();
    /// let qr = QrDecomposition::decompose_with(&a, f64::sqrt).unwrap();
    /// assert_eq!(qr.r().get(&[0, 0]).unwrap(), 5.0);
    /// assert_eq!(qr.r().get(&[1, 0]).unwrap(), 0.0);
    /// ```
    pub fn decompose_with<F>(a: &Tensor<T>, sqrt: F) -> Result<Self>
    where
        F: Fn(T) -> T,
    {
        let n = square_dim(a, "QR decomposition requires a square 2-D matrix")?;
        debug!(n, "QR decomposition (Gram-Schmidt)");

        // Working columns, stored row-major like A
        let mut v = a.copy().to_vec();
        let mut q = vec![T::zero(); n * n];
        let mut r = vec![T::zero(); n * n];

        for i in 0..n {
            let norm_sq = (0..n).fold(T::zero(), |acc, k| acc + v[k * n + i] * v[k * n + i]);
            let norm = sqrt(norm_sq);
            if norm.is_zero() {
                return Err(CoreError::SingularMatrix { pivot: i });
            }
            r[i * n + i] = norm;
            for k in 0..n {
                q[k * n + i] = v[k * n + i] / norm;
            }

            for j in (i + 1)..n {
                let proj = (0..n).fold(T::zero(), |acc, k| acc + q[k * n + i] * v[k * n + j]);
                r[i * n + j] = proj;
                for k in 0..n {
                    let qki = q[k * n + i];
                    v[k * n + j] -= proj * qki;
                }
            }
        }

        Ok(Self { q, r, n })
    }

    /// The orthonormal factor `Q`.
    pub fn q(&self) -> Tensor<T> {
        Tensor::from_parts(self.q.clone(), vec![self.n, self.n])
    }

    /// The upper triangular factor `R`.
    pub fn r(&self) -> Tensor<T> {
        Tensor::from_parts(self.r.clone(), vec![self.n, self.n])
    }

    /// Split into `(Q, R)`.
    pub fn into_parts(self) -> (Tensor<T>, Tensor<T>) {
        let shape = vec![self.n, self.n];
        (
            Tensor::from_parts(self.q, shape.clone()),
            Tensor::from_parts(self.r, shape),
        )
    }

    /// Solve `Ax = b` as `R x = Q^T b`.
    ///
    /// `b` must be a 1-D tensor of length `n`.
    pub fn solve(&self, b: &Tensor<T>) -> Result<Tensor<T>> {
        if b.ndim() != 1 {
            return Err(CoreError::InvalidArgument {
                reason: "QR solve: `b` must be a 1-D tensor",
            });
        }
        if b.numel() != self.n {
            return Err(CoreError::DimensionMismatch {
                expected: vec![self.n],
                got: b.shape().to_vec(),
            });
        }

        let n = self.n;
        let b = b.to_vec();

        // y = Q^T b
        let mut x: Vec<T> = (0..n)
            .map(|i| (0..n).fold(T::zero(), |acc, k| acc + self.q[k * n + i] * b[k]))
            .collect();

        // Back substitution on R
        #[allow(clippy::needless_range_loop)]
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let xj = x[j];
                x[i] -= self.r[i * n + j] * xj;
            }
            x[i] /= self.r[i * n + i];
        }

        Ok(Tensor::from_parts(x, vec![n]))
    }
}

impl<T: Float> QrDecomposition<T> {
    /// Factor a square float matrix using [`Float::sqrt`].
    pub fn decompose(a: &Tensor<T>) -> Result<Self> {
        Self::decompose_with(a, T::sqrt)
    }
}

impl<T: Scalar> Tensor<T> {
    /// QR-factor a square matrix into `(Q, R)` with a caller-supplied root.
    ///
    /// See [`QrDecomposition::decompose_with`].
    pub fn qr_decomposition<F>(&self, sqrt: F) -> Result<(Tensor<T>, Tensor<T>)>
    where
        F: Fn(T) -> T,
    {
        Ok(QrDecomposition::decompose_with(self, sqrt)?.into_parts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn mat(data: &[f64], n: usize) -> Tensor<f64> {
        Tensor::from_vec(data.to_vec(), vec![n, n]).unwrap()
    }

    fn approx_eq(a: &[f64], b: &[f64], tol: f64) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| (x - y).abs() < tol)
    }

    #[test]
    fn test_qr_reconstruction() {
        let a = mat(&[12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0], 3);
        let (q, r) = a.qr_decomposition(f64::sqrt).unwrap();
        let qr = q.matmul(&r).unwrap();
        assert!(approx_eq(&qr.to_vec(), &a.to_vec(), 1e-9));
    }

    #[test]
    fn test_q_orthonormal() {
        let a = mat(&[12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0], 3);
        let qr = QrDecomposition::decompose(&a).unwrap();
        let q = qr.q();
        let qtq = q.transpose().unwrap().matmul(&q).unwrap();
        let eye = Tensor::<f64>::identity(3).unwrap();
        assert!(approx_eq(&qtq.to_vec(), &eye.to_vec(), 1e-12));
    }

    #[test]
    fn test_r_upper_triangular() {
        // Known factorization of the classic 3x3 example:
        // R = [[14, 21, -14], [0, 175, -70], [0, 0, 35]]
        let a = mat(&[12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0], 3);
        let r = QrDecomposition::decompose(&a).unwrap().r();
        assert!(approx_eq(
            &r.to_vec(),
            &[14.0, 21.0, -14.0, 0.0, 175.0, -70.0, 0.0, 0.0, 35.0],
            1e-9
        ));
    }

    #[test]
    fn test_dependent_column() {
        let a = mat(&[1.0, 2.0, 2.0, 4.0], 2);
        let err = QrDecomposition::decompose(&a).unwrap_err();
        assert_eq!(err, CoreError::SingularMatrix { pivot: 1 });
    }

    #[test]
    fn test_solve() {
        // 2x + y = 5, x + 4y = 6 => x = 2, y = 1
        let a = mat(&[2.0, 1.0, 1.0, 4.0], 2);
        let b = Tensor::from_vec(vec![5.0, 6.0], vec![2]).unwrap();
        let x = QrDecomposition::decompose(&a).unwrap().solve(&b).unwrap();
        assert!(approx_eq(&x.to_vec(), &[2.0, 1.0], 1e-12));
    }

    #[test]
    fn test_not_square() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![3, 2]).unwrap();
        assert_eq!(
            a.qr_decomposition(f64::sqrt).unwrap_err().kind(),
            ErrorKind::Argument
        );
    }
}
