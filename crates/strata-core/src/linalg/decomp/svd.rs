//! Singular Value Decomposition (SVD).
//!
//! Decomposes a matrix `A` (m x n) into `A = U S V^T` where:
//! - `U` is orthogonal (m x m)
//! - `S` is diagonal with non-negative entries (m x n)
//! - `V` is orthogonal (n x n)
//!
//! Implementation uses the one-sided Jacobi method.

use tracing::{debug, trace};

use crate::Float;
use crate::error::{CoreError, Result};
use crate::tensor::Tensor;

/// Result of a Singular Value Decomposition.
#[derive(Debug, Clone)]
pub struct SvdDecomposition<T: Float> {
    /// Left singular vectors (m x m), row-major.
    u: Vec<T>,
    /// Singular values in descending order (length min(m,n)).
    s: Vec<T>,
    /// Right singular vectors (n x n), row-major.
    v: Vec<T>,
    m: usize,
    n: usize,
}

/// Maximum number of Jacobi sweeps before giving up.
const MAX_SWEEPS: usize = 100;

#[allow(clippy::many_single_char_names)]
impl<T: Float> SvdDecomposition<T> {
    /// Compute the SVD of a matrix `A` (m x n).
    ///
    /// Returns `A = U diag(s) V^T`.
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// # use strata_core::linalg::decomp::SvdDecomposition;
    /// let a = Tensor::from_vec(vec![3.0_f64, 0.0, 0.0, 4.0], vec![2, 2]).unwrap();
    /// let svd = SvdDecomposition::decompose(&a).unwrap();
    /// let s = svd.singular_values();
    /// // Singular values of diag(3,4) are 4 and 3
    /// assert!((s[0] - 4.0).abs() < 1e-10);
    /// assert!((s[1] - 3.0).abs() < 1e-10);
    /// ```
    pub fn decompose(a: &Tensor<T>) -> Result<Self> {
        a.check_matrix("SVD requires a 2-D tensor (matrix)")?;
        let m = a.shape()[0];
        let n = a.shape()[1];
        debug!(m, n, "SVD (one-sided Jacobi)");

        if m >= n {
            Self::svd_tall(a.copy().to_vec(), m, n)
        } else {
            // A^T = U' S V'^T, so A = V' S^T U'^T
            let at = a.transpose()?.to_vec();
            let result = Self::svd_tall(at, n, m)?;
            Ok(Self {
                u: result.v,
                s: result.s,
                v: result.u,
                m,
                n,
            })
        }
    }

    /// SVD for tall/square matrices (m >= n).
    fn svd_tall(mut work: Vec<T>, m: usize, n: usize) -> Result<Self> {
        // V starts as identity
        let mut v = vec![T::zero(); n * n];
        for i in 0..n {
            v[i * n + i] = T::one();
        }

        let tol = T::epsilon() * T::from_f64(100.0);
        let frob_sq = work.iter().fold(T::zero(), |acc, &x| acc + x * x);
        // Columns below this squared norm are numerically zero
        let floor = T::epsilon() * T::epsilon() * frob_sq;

        let mut converged = false;
        for sweep in 0..MAX_SWEEPS {
            let mut rotations = 0usize;

            for p in 0..n {
                for q in (p + 1)..n {
                    // Gram matrix elements for columns p and q
                    let mut app = T::zero();
                    let mut aqq = T::zero();
                    let mut apq = T::zero();
                    for i in 0..m {
                        let wp = work[i * n + p];
                        let wq = work[i * n + q];
                        app += wp * wp;
                        aqq += wq * wq;
                        apq += wp * wq;
                    }

                    if apq.abs() <= tol * (app * aqq).sqrt() || app <= floor || aqq <= floor {
                        continue;
                    }
                    rotations += 1;

                    let tau = (aqq - app) / (apq + apq);
                    let root = (T::one() + tau * tau).sqrt();
                    let t = if tau >= T::zero() {
                        T::one() / (tau + root)
                    } else {
                        -(T::one() / (root - tau))
                    };
                    let cs = T::one() / (T::one() + t * t).sqrt();
                    let sn = t * cs;

                    for i in 0..m {
                        let wp = work[i * n + p];
                        let wq = work[i * n + q];
                        work[i * n + p] = cs * wp - sn * wq;
                        work[i * n + q] = sn * wp + cs * wq;
                    }
                    for i in 0..n {
                        let vp = v[i * n + p];
                        let vq = v[i * n + q];
                        v[i * n + p] = cs * vp - sn * vq;
                        v[i * n + q] = sn * vp + cs * vq;
                    }
                }
            }

            trace!(sweep, rotations, "one-sided jacobi sweep");
            if rotations == 0 {
                converged = true;
                break;
            }
        }

        if !converged {
            return Err(CoreError::NoConvergence {
                algorithm: "one-sided Jacobi SVD",
                sweeps: MAX_SWEEPS,
            });
        }

        // Singular values are the column norms of the rotated matrix
        let norms: Vec<T> = (0..n)
            .map(|j| {
                (0..m)
                    .fold(T::zero(), |acc, i| acc + work[i * n + j] * work[i * n + j])
                    .sqrt()
            })
            .collect();

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            norms[b]
                .partial_cmp(&norms[a])
                .unwrap_or(core::cmp::Ordering::Equal)
        });

        let s: Vec<T> = order.iter().map(|&j| norms[j]).collect();
        let mut v_sorted = vec![T::zero(); n * n];
        let mut u = vec![T::zero(); m * m];
        let mut filled = vec![false; m];
        let cutoff = s.first().map_or(T::zero(), |&s_max| tol * s_max);

        for (new_j, &old_j) in order.iter().enumerate() {
            for i in 0..n {
                v_sorted[i * n + new_j] = v[i * n + old_j];
            }
            let norm = s[new_j];
            if norm > cutoff && !norm.is_zero() {
                for i in 0..m {
                    u[i * m + new_j] = work[i * n + old_j] / norm;
                }
                filled[new_j] = true;
            }
        }

        complete_basis(&mut u, &mut filled, m);

        Ok(Self {
            u,
            s,
            v: v_sorted,
            m,
            n,
        })
    }

    /// The singular values in descending order.
    pub fn singular_values(&self) -> &[T] {
        &self.s
    }

    /// The left singular vectors `U` (m x m).
    pub fn u(&self) -> Tensor<T> {
        Tensor::from_parts(self.u.clone(), vec![self.m, self.m])
    }

    /// The singular values on the diagonal of an `m x n` matrix.
    pub fn s(&self) -> Tensor<T> {
        let (m, n) = (self.m, self.n);
        let mut data = vec![T::zero(); m * n];
        for (i, &sv) in self.s.iter().enumerate() {
            data[i * n + i] = sv;
        }
        Tensor::from_parts(data, vec![m, n])
    }

    /// The right singular vectors `V` (n x n).
    pub fn v(&self) -> Tensor<T> {
        Tensor::from_parts(self.v.clone(), vec![self.n, self.n])
    }

    /// Number of singular values above `tol`.
    pub fn rank(&self, tol: T) -> usize {
        self.s.iter().filter(|&&sv| sv > tol).count()
    }
}

/// Fill the unset columns of the row-major `m x m` matrix `u` so that all
/// columns form an orthonormal basis.
///
/// Each missing column is the standard basis vector with the largest
/// residual after projecting out the columns already present.
fn complete_basis<T: Float>(u: &mut [T], filled: &mut [bool], m: usize) {
    for j in 0..m {
        if filled[j] {
            continue;
        }
        let mut best: Option<(T, Vec<T>)> = None;
        for k in 0..m {
            let mut cand = vec![T::zero(); m];
            cand[k] = T::one();
            // Two passes of Gram-Schmidt against the filled columns
            for _ in 0..2 {
                for c in (0..m).filter(|&c| filled[c]) {
                    let d = (0..m).fold(T::zero(), |acc, i| acc + cand[i] * u[i * m + c]);
                    for (i, x) in cand.iter_mut().enumerate() {
                        *x -= d * u[i * m + c];
                    }
                }
            }
            let norm = cand.iter().fold(T::zero(), |acc, &x| acc + x * x).sqrt();
            if best.as_ref().is_none_or(|(b, _)| norm > *b) {
                best = Some((norm, cand));
            }
        }
        if let Some((norm, cand)) = best {
            for (i, x) in cand.into_iter().enumerate() {
                u[i * m + j] = x / norm;
            }
            filled[j] = true;
        }
    }
}

impl<T: Float> Tensor<T> {
    /// Singular value decomposition `(U, S, V)` with `A = U S V^T`.
    ///
    /// `U` is `m x m`, `S` is the `m x n` diagonal matrix of singular values
    /// and `V` is `n x n`. See [`SvdDecomposition::decompose`].
    pub fn svd(&self) -> Result<(Tensor<T>, Tensor<T>, Tensor<T>)> {
        let svd = SvdDecomposition::decompose(self)?;
        Ok((svd.u(), svd.s(), svd.v()))
    }
}
