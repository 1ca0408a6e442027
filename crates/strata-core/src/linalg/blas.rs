//! BLAS-style Level 1–3 kernels on [`Tensor`].
//!
//! All functions validate shapes, return [`Result`] on bad operands, and
//! read their inputs through strides, so any layout or offset is accepted.

use crate::error::{CoreError, Result};
use crate::tensor::Tensor;
use crate::{Float, Scalar};

// ======================================================================
// BLAS Level 1 — vector operations, O(n)
// ======================================================================

/// Inner (dot) product of two 1-D tensors: `sum(x_i * y_i)`.
///
/// Both tensors must be 1-D with the same length.
///
/// ```
/// # use strata_core::tensor::Tensor;
/// # use strata_core::linalg::dot;
/// let x = Tensor::from_vec(vec![1.0_f64, 2.0, 3.0], vec![3]).unwrap();
/// let y = Tensor::from_vec(vec![4.0_f64, 5.0, 6.0], vec![3]).unwrap();
/// let d = dot(&x, &y).unwrap();
/// assert!((d - 32.0).abs() < 1e-10);
/// ```
pub fn dot<T: Scalar>(x: &Tensor<T>, y: &Tensor<T>) -> Result<T> {
    if x.ndim() != 1 || y.ndim() != 1 {
        return Err(CoreError::InvalidArgument {
            reason: "dot: both arguments must be 1-D tensors",
        });
    }
    if x.numel() != y.numel() {
        return Err(CoreError::InvalidArgument {
            reason: "dot: vectors must have the same length",
        });
    }
    Ok(x.iter()
        .zip(y.iter())
        .fold(T::zero(), |acc, (a, b)| acc + a * b))
}

/// Euclidean norm (L2 norm) of a 1-D tensor: `sqrt(sum(x_i^2))`.
///
/// ```
/// # use strata_core::tensor::Tensor;
/// # use strata_core::linalg::nrm2;
/// let x = Tensor::from_vec(vec![3.0_f64, 4.0], vec![2]).unwrap();
/// let n = nrm2(&x).unwrap();
/// assert!((n - 5.0).abs() < 1e-10);
/// ```
pub fn nrm2<T: Float>(x: &Tensor<T>) -> Result<T> {
    if x.ndim() != 1 {
        return Err(CoreError::InvalidArgument {
            reason: "nrm2: expected a 1-D tensor",
        });
    }
    let sum_sq = x.iter().fold(T::zero(), |acc, v| acc + v * v);
    Ok(sum_sq.sqrt())
}

// ======================================================================
// BLAS Level 2 — matrix-vector operations, O(n^2)
// ======================================================================

/// General matrix-vector multiply: `y = alpha * A * x + beta * y`.
///
/// - `a` must be 2-D with shape `[m, n]`.
/// - `x` must be 1-D with length `n`.
/// - `y` must be 1-D with length `m`.
///
/// ```
/// # use strata_core::tensor::Tensor;
/// # use strata_core::linalg::gemv;
/// // A = [[1, 2], [3, 4]], x = [5, 6]
/// let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
/// let x = Tensor::from_vec(vec![5.0, 6.0], vec![2]).unwrap();
/// let mut y = Tensor::<f64>::zeros(vec![2]).unwrap();
/// gemv(1.0, &a, &x, 0.0, &mut y).unwrap();
/// assert_eq!(y.to_vec(), vec![17.0, 39.0]);
/// ```
#[allow(clippy::many_single_char_names)]
pub fn gemv<T: Scalar>(
    alpha: T,
    a: &Tensor<T>,
    x: &Tensor<T>,
    beta: T,
    y: &mut Tensor<T>,
) -> Result<()> {
    if a.ndim() != 2 {
        return Err(CoreError::InvalidArgument {
            reason: "gemv: `a` must be a 2-D tensor (matrix)",
        });
    }
    if x.ndim() != 1 || y.ndim() != 1 {
        return Err(CoreError::InvalidArgument {
            reason: "gemv: `x` and `y` must be 1-D tensors (vectors)",
        });
    }

    let m = a.shape()[0];
    let n = a.shape()[1];

    if x.numel() != n {
        return Err(CoreError::DimensionMismatch {
            expected: vec![n],
            got: x.shape().to_vec(),
        });
    }
    if y.numel() != m {
        return Err(CoreError::DimensionMismatch {
            expected: vec![m],
            got: y.shape().to_vec(),
        });
    }

    // `y` may share a buffer with `a` or `x`; finish every read first
    let out: Vec<T> = (0..m)
        .map(|i| {
            let sum = (0..n).fold(T::zero(), |acc, j| acc + a.at(i, j) * x.at1(j));
            alpha * sum + beta * y.at1(i)
        })
        .collect();
    for (i, yi) in out.into_iter().enumerate() {
        y.put1(i, yi);
    }

    Ok(())
}

// ======================================================================
// BLAS Level 3 — matrix-matrix operations, O(n^3)
// ======================================================================

/// General matrix-matrix multiply: `C = alpha * A * B + beta * C`.
///
/// - `a` must be 2-D with shape `[m, k]`.
/// - `b` must be 2-D with shape `[k, n]`.
/// - `c` must be 2-D with shape `[m, n]`.
///
/// ```
/// # use strata_core::tensor::Tensor;
/// # use strata_core::linalg::gemm;
/// let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
/// let b = Tensor::from_vec(vec![5.0, 6.0, 7.0, 8.0], vec![2, 2]).unwrap();
/// let mut c = Tensor::<f64>::zeros(vec![2, 2]).unwrap();
/// gemm(1.0, &a, &b, 0.0, &mut c).unwrap();
/// assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
/// ```
#[allow(clippy::many_single_char_names)]
pub fn gemm<T: Scalar>(
    alpha: T,
    a: &Tensor<T>,
    b: &Tensor<T>,
    beta: T,
    c: &mut Tensor<T>,
) -> Result<()> {
    if a.ndim() != 2 || b.ndim() != 2 || c.ndim() != 2 {
        return Err(CoreError::InvalidArgument {
            reason: "gemm: all arguments must be 2-D tensors (matrices)",
        });
    }

    let m = a.shape()[0];
    let k = a.shape()[1];
    let n = b.shape()[1];

    if b.shape()[0] != k {
        return Err(CoreError::InvalidArgument {
            reason: "gemm: inner dimensions of `a` and `b` differ",
        });
    }
    if c.shape()[0] != m || c.shape()[1] != n {
        return Err(CoreError::DimensionMismatch {
            expected: vec![m, n],
            got: c.shape().to_vec(),
        });
    }

    // ijk loop order into scratch; `c` may alias `a` or `b`
    let mut out = Vec::with_capacity(m * n);
    for i in 0..m {
        for j in 0..n {
            let mut sum = T::zero();
            for p in 0..k {
                sum += a.at(i, p) * b.at(p, j);
            }
            out.push(alpha * sum + beta * c.at(i, j));
        }
    }
    for (idx, cij) in out.into_iter().enumerate() {
        c.put(idx / n, idx % n, cij);
    }

    Ok(())
}

// ======================================================================
// Convenience methods on Tensor
// ======================================================================

impl<T: Scalar> Tensor<T> {
    /// Matrix-vector multiply: returns `A @ x` as a new 1-D tensor.
    ///
    /// `self` must be 2-D `[m, n]`, `x` must be 1-D `[n]`.
    pub fn matvec(&self, x: &Tensor<T>) -> Result<Tensor<T>> {
        self.check_matrix("matvec() requires a 2-D tensor")?;
        let mut y = Tensor::zeros(vec![self.shape()[0]])?;
        gemv(T::one(), self, x, T::zero(), &mut y)?;
        Ok(y)
    }

    /// Matrix-matrix multiply: returns `self @ other` as a new 2-D tensor.
    ///
    /// `self` must be 2-D `[m, k]`, `other` must be 2-D `[k, n]`; anything
    /// else is [`CoreError::InvalidArgument`].
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// let a = Tensor::from_vec(vec![1, 2, 3, 4], vec![2, 2]).unwrap();
    /// let b = Tensor::from_vec(vec![5, 6, 7, 8], vec![2, 2]).unwrap();
    /// assert_eq!(a.matmul(&b).unwrap().to_vec(), vec![19, 22, 43, 50]);
    /// ```
    pub fn matmul(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        if self.ndim() != 2 || other.ndim() != 2 {
            return Err(CoreError::InvalidArgument {
                reason: "matmul() requires two 2-D tensors",
            });
        }
        let mut c = Tensor::zeros(vec![self.shape()[0], other.shape()[1]])?;
        gemm(T::one(), self, other, T::zero(), &mut c)?;
        Ok(c)
    }

    /// Dot product with another 1-D tensor.
    pub fn dot(&self, other: &Tensor<T>) -> Result<T> {
        dot(self, other)
    }
}

impl<T: Float> Tensor<T> {
    /// Euclidean (L2) norm of a 1-D tensor.
    pub fn norm(&self) -> Result<T> {
        nrm2(self)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::tensor::{Layout, SharedBuffer, TensorOptions};

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn vec_f64(data: &[f64]) -> Tensor<f64> {
        Tensor::from_vec(data.to_vec(), vec![data.len()]).unwrap()
    }

    fn mat_f64(data: &[f64], rows: usize, cols: usize) -> Tensor<f64> {
        Tensor::from_vec(data.to_vec(), vec![rows, cols]).unwrap()
    }

    // ------------------------------------------------------------------
    // BLAS L1
    // ------------------------------------------------------------------

    #[test]
    fn test_dot_basic() {
        let x = vec_f64(&[1.0, 2.0, 3.0]);
        let y = vec_f64(&[4.0, 5.0, 6.0]);
        assert_eq!(dot(&x, &y).unwrap(), 32.0);
    }

    #[test]
    fn test_dot_strided() {
        // Every other element of [1, _, 2, _, 3]
        let opts = TensorOptions::new().strides(vec![2]);
        let x = Tensor::from_vec_with(vec![1.0, 9.0, 2.0, 9.0, 3.0], vec![3], &opts).unwrap();
        let y = vec_f64(&[1.0, 1.0, 1.0]);
        assert_eq!(x.dot(&y).unwrap(), 6.0);
    }

    #[test]
    fn test_dot_errors() {
        let x = vec_f64(&[1.0, 2.0]);
        let y = vec_f64(&[1.0, 2.0, 3.0]);
        assert_eq!(dot(&x, &y).unwrap_err().kind(), ErrorKind::Argument);
        let m = mat_f64(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        assert_eq!(dot(&m, &x).unwrap_err().kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_nrm2() {
        let x = vec_f64(&[3.0, 4.0]);
        assert!((nrm2(&x).unwrap() - 5.0).abs() < 1e-10);
        assert!((x.norm().unwrap() - 5.0).abs() < 1e-10);
    }

    // ------------------------------------------------------------------
    // BLAS L2
    // ------------------------------------------------------------------

    #[test]
    fn test_gemv_with_alpha_beta() {
        // y = 2 * A @ x + 3 * y
        let a = mat_f64(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let x = vec_f64(&[1.0, 1.0]);
        let mut y = vec_f64(&[10.0, 10.0]);
        gemv(2.0, &a, &x, 3.0, &mut y).unwrap();
        // A @ x = [3, 7], 2*[3,7] + 3*[10,10] = [36, 44]
        assert_eq!(y.to_vec(), vec![36.0, 44.0]);
    }

    #[test]
    fn test_gemv_rectangular() {
        let a = mat_f64(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        let x = vec_f64(&[1.0, 0.0, 1.0]);
        let y = a.matvec(&x).unwrap();
        assert_eq!(y.to_vec(), vec![4.0, 10.0]);
    }

    #[test]
    fn test_gemv_dimension_mismatch() {
        let a = mat_f64(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let x = vec_f64(&[1.0, 2.0, 3.0]);
        let mut y = Tensor::<f64>::zeros(vec![2]).unwrap();
        assert!(gemv(1.0, &a, &x, 0.0, &mut y).is_err());
        let x = vec_f64(&[1.0, 2.0]);
        let mut y = Tensor::<f64>::zeros(vec![3]).unwrap();
        assert!(gemv(1.0, &a, &x, 0.0, &mut y).is_err());
    }

    // ------------------------------------------------------------------
    // BLAS L3
    // ------------------------------------------------------------------

    #[test]
    fn test_gemm_rectangular() {
        // A (2x3) @ B (3x2) = C (2x2)
        let a = mat_f64(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        let b = mat_f64(&[7.0, 8.0, 9.0, 10.0, 11.0, 12.0], 3, 2);
        let mut c = Tensor::<f64>::zeros(vec![2, 2]).unwrap();
        gemm(1.0, &a, &b, 0.0, &mut c).unwrap();
        // Row 0: 1*7+2*9+3*11 = 58, 1*8+2*10+3*12 = 64
        // Row 1: 4*7+5*9+6*11 = 139, 4*8+5*10+6*12 = 154
        assert_eq!(c.to_vec(), vec![58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_gemm_with_alpha_beta() {
        let a = Tensor::<f64>::identity(2).unwrap();
        let b = mat_f64(&[5.0, 6.0, 7.0, 8.0], 2, 2);
        let mut c = Tensor::<f64>::ones(vec![2, 2]).unwrap();
        gemm(2.0, &a, &b, 3.0, &mut c).unwrap();
        assert_eq!(c.to_vec(), vec![13.0, 15.0, 17.0, 19.0]);
    }

    #[test]
    fn test_gemm_c_shape_mismatch() {
        let a = mat_f64(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let b = mat_f64(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let mut c = Tensor::<f64>::zeros(vec![3, 3]).unwrap();
        let err = gemm(1.0, &a, &b, 0.0, &mut c).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    // ------------------------------------------------------------------
    // Convenience methods
    // ------------------------------------------------------------------

    #[test]
    fn test_matmul() {
        let a = mat_f64(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let b = mat_f64(&[5.0, 6.0, 7.0, 8.0], 2, 2);
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matmul_column_major_operand() {
        // b = [[5, 6], [7, 8]] stored column-major
        let a = mat_f64(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let opts = TensorOptions::new().layout(Layout::ColumnMajor);
        let b = Tensor::from_vec_with(vec![5.0, 7.0, 6.0, 8.0], vec![2, 2], &opts).unwrap();
        assert_eq!(a.matmul(&b).unwrap().to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matmul_identity() {
        let a = Tensor::<i64>::arange(12).unwrap().reshape(vec![3, 4]).unwrap();
        let eye = Tensor::identity(4).unwrap();
        assert_eq!(a.matmul(&eye).unwrap(), a);
    }

    #[test]
    fn test_matmul_errors() {
        let a = mat_f64(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let b = mat_f64(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        assert_eq!(a.matmul(&b).unwrap_err().kind(), ErrorKind::Argument);
        let v = vec_f64(&[1.0, 2.0]);
        assert_eq!(a.matmul(&v).unwrap_err().kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_gemm_output_aliases_input() {
        let buf = SharedBuffer::new(vec![1.0, 2.0, 3.0, 4.0]);
        let a = Tensor::from_shared(buf.clone(), vec![2, 2], &TensorOptions::new()).unwrap();
        let mut c = Tensor::from_shared(buf.clone(), vec![2, 2], &TensorOptions::new()).unwrap();
        let b = mat_f64(&[5.0, 6.0, 7.0, 8.0], 2, 2);
        gemm(1.0, &a, &b, 0.0, &mut c).unwrap();
        assert_eq!(buf.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_gemv_output_aliases_input() {
        // y views the first two elements of x's buffer
        let buf = SharedBuffer::new(vec![5.0, 6.0]);
        let a = mat_f64(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let x = Tensor::from_shared(buf.clone(), vec![2], &TensorOptions::new()).unwrap();
        let mut y = Tensor::from_shared(buf.clone(), vec![2], &TensorOptions::new()).unwrap();
        gemv(1.0, &a, &x, 0.0, &mut y).unwrap();
        assert_eq!(buf.to_vec(), vec![17.0, 39.0]);
    }

    #[test]
    fn test_gemm_numpy_reference() {
        // >>> a = np.array([[1,2,3],[4,5,6]], dtype=np.float64)
        // >>> b = np.array([[7,8],[9,10],[11,12]], dtype=np.float64)
        // >>> a @ b
        // array([[ 58.,  64.],
        //        [139., 154.]])
        let a = mat_f64(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        let b = mat_f64(&[7.0, 8.0, 9.0, 10.0, 11.0, 12.0], 3, 2);
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.to_vec(), vec![58.0, 64.0, 139.0, 154.0]);
    }
}
