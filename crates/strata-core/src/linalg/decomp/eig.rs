//! Eigendecomposition for symmetric matrices.
//!
//! Decomposes a real symmetric matrix `A` into `A = V D V^T` where:
//! - `V` is orthogonal (columns are eigenvectors)
//! - `D` is diagonal (eigenvalues on the diagonal)
//!
//! Implementation uses the cyclic Jacobi eigenvalue algorithm.

use tracing::{debug, trace};

use crate::Float;
use crate::error::{CoreError, Result};
use crate::tensor::Tensor;

use super::square_dim;

/// Result of an eigendecomposition for symmetric matrices.
#[derive(Debug, Clone)]
pub struct EigDecomposition<T: Float> {
    /// Eigenvalues in descending order of absolute value.
    eigenvalues: Vec<T>,
    /// Eigenvectors as columns of an n x n matrix (stored row-major).
    eigenvectors: Vec<T>,
    n: usize,
}

/// Maximum number of Jacobi sweeps.
const MAX_SWEEPS: usize = 100;

#[allow(clippy::many_single_char_names)]
impl<T: Float> EigDecomposition<T> {
    /// Compute the eigendecomposition of a symmetric matrix.
    ///
    /// Returns eigenvalues and eigenvectors such that `A = V diag(d) V^T`.
    /// A matrix that is not symmetric (up to rounding) is rejected with
    /// [`CoreError::InvalidArgument`]; running out of sweeps yields
    /// [`CoreError::NoConvergence`].
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// # use strata_core::linalg::decomp::EigDecomposition;
    /// let a = Tensor::from_vec(vec![2.0_f64, 1.0, 1.0, 2.0], vec![2, 2]).unwrap();
    /// let eig = EigDecomposition::decompose_symmetric(&a).unwrap();
    /// let vals = eig.eigenvalues();
    /// assert!((vals[0] - 3.0).abs() < 1e-10);
    /// assert!((vals[1] - 1.0).abs() < 1e-10);
    /// ```
    pub fn decompose_symmetric(a: &Tensor<T>) -> Result<Self> {
        let n = square_dim(a, "eigendecomposition requires a square 2-D matrix")?;
        debug!(n, "symmetric eigendecomposition (Jacobi)");

        let mut s = a.copy().to_vec();
        let scale = s
            .iter()
            .fold(T::zero(), |m, &x| if x.abs() > m { x.abs() } else { m });
        let tol = T::epsilon() * T::from_f64(100.0) * scale;

        for i in 0..n {
            for j in (i + 1)..n {
                if (s[i * n + j] - s[j * n + i]).abs() > tol {
                    return Err(CoreError::InvalidArgument {
                        reason: "eigendecomposition requires a symmetric matrix",
                    });
                }
            }
        }

        // V starts as identity
        let mut v = vec![T::zero(); n * n];
        for i in 0..n {
            v[i * n + i] = T::one();
        }

        if scale.is_zero() {
            return Ok(Self {
                eigenvalues: vec![T::zero(); n],
                eigenvectors: v,
                n,
            });
        }

        let mut converged = false;
        for sweep in 0..=MAX_SWEEPS {
            // Off-diagonal norm
            let mut off_sq = T::zero();
            for i in 0..n {
                for j in (i + 1)..n {
                    off_sq += s[i * n + j] * s[i * n + j];
                }
            }
            let off = off_sq.sqrt();
            trace!(sweep, off = ?off, "jacobi sweep");
            if off <= tol {
                converged = true;
                break;
            }
            if sweep == MAX_SWEEPS {
                break;
            }

            for p in 0..n {
                for q in (p + 1)..n {
                    let apq = s[p * n + q];
                    if apq.is_zero() {
                        continue;
                    }

                    let app = s[p * n + p];
                    let aqq = s[q * n + q];

                    // Rotation angle, smaller root of t^2 + 2*theta*t - 1 = 0
                    let theta = (aqq - app) / (apq + apq);
                    let root = (T::one() + theta * theta).sqrt();
                    let t = if theta >= T::zero() {
                        T::one() / (theta + root)
                    } else {
                        -(T::one() / (root - theta))
                    };
                    let cs = T::one() / (T::one() + t * t).sqrt();
                    let sn = t * cs;

                    // S' = G^T S G on rows/cols p and q
                    s[p * n + p] = app - t * apq;
                    s[q * n + q] = aqq + t * apq;
                    s[p * n + q] = T::zero();
                    s[q * n + p] = T::zero();

                    for r in 0..n {
                        if r == p || r == q {
                            continue;
                        }
                        let srp = s[r * n + p];
                        let srq = s[r * n + q];
                        s[r * n + p] = cs * srp - sn * srq;
                        s[p * n + r] = cs * srp - sn * srq;
                        s[r * n + q] = sn * srp + cs * srq;
                        s[q * n + r] = sn * srp + cs * srq;
                    }

                    // V' = V G
                    for i in 0..n {
                        let vp = v[i * n + p];
                        let vq = v[i * n + q];
                        v[i * n + p] = cs * vp - sn * vq;
                        v[i * n + q] = sn * vp + cs * vq;
                    }
                }
            }
        }

        if !converged {
            return Err(CoreError::NoConvergence {
                algorithm: "Jacobi eigenvalue iteration",
                sweeps: MAX_SWEEPS,
            });
        }

        let eigenvalues: Vec<T> = (0..n).map(|i| s[i * n + i]).collect();

        // Sort by descending absolute value
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| {
            eigenvalues[b]
                .abs()
                .partial_cmp(&eigenvalues[a].abs())
                .unwrap_or(core::cmp::Ordering::Equal)
        });

        let eigenvalues_sorted: Vec<T> = indices.iter().map(|&i| eigenvalues[i]).collect();
        let mut v_sorted = vec![T::zero(); n * n];
        for (new_j, &old_j) in indices.iter().enumerate() {
            for i in 0..n {
                v_sorted[i * n + new_j] = v[i * n + old_j];
            }
        }

        Ok(Self {
            eigenvalues: eigenvalues_sorted,
            eigenvectors: v_sorted,
            n,
        })
    }

    /// The eigenvalues, sorted by descending absolute value.
    pub fn eigenvalues(&self) -> &[T] {
        &self.eigenvalues
    }

    /// The eigenvalues as a 1-D tensor.
    pub fn eigenvalues_tensor(&self) -> Tensor<T> {
        Tensor::from_parts(self.eigenvalues.clone(), vec![self.n])
    }

    /// The eigenvector matrix `V` (n x n, columns are eigenvectors).
    pub fn eigenvectors(&self) -> Tensor<T> {
        Tensor::from_parts(self.eigenvectors.clone(), vec![self.n, self.n])
    }
}

impl<T: Float> Tensor<T> {
    /// Eigenvalues (1-D) and eigenvectors (columns of an `n x n` matrix) of
    /// a real symmetric matrix.
    ///
    /// See [`EigDecomposition::decompose_symmetric`].
    pub fn eigen(&self) -> Result<(Tensor<T>, Tensor<T>)> {
        let eig = EigDecomposition::decompose_symmetric(self)?;
        Ok((eig.eigenvalues_tensor(), eig.eigenvectors()))
    }
}
