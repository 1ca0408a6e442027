//! Shape manipulation: reshape, flatten, copy and transpose.
//!
//! Every method here returns a compact row-major tensor that owns its data.

use crate::Scalar;
use crate::error::{CoreError, Result};

use super::Tensor;

impl<T: Scalar> Tensor<T> {
    /// Copy the elements into a tensor of a new shape.
    ///
    /// The total number of elements must remain the same. Elements are taken
    /// in logical row-major order, so the source layout does not matter.
    pub fn reshape(&self, new_shape: Vec<usize>) -> Result<Self> {
        let new_numel = new_shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d));
        if new_shape.is_empty() || new_numel != Some(self.numel()) {
            return Err(CoreError::InvalidArgument {
                reason: "new shape has different number of elements",
            });
        }
        Ok(Tensor::from_parts(self.to_vec(), new_shape))
    }

    /// Return a flattened 1-D copy of the tensor.
    pub fn flatten(&self) -> Self {
        let n = self.numel();
        Tensor::from_parts(self.to_vec(), vec![n])
    }

    /// Deep, compact row-major duplicate.
    ///
    /// Unlike [`Clone`], which keeps the source's strides and offset, the
    /// copy always has default strides and a buffer of exactly
    /// [`numel`](Self::numel) elements.
    ///
    /// ```
    /// # use strata_core::tensor::{Tensor, TensorOptions};
    /// let opts = TensorOptions::new().offset(2);
    /// let t = Tensor::from_vec_with(vec![0, 0, 1, 2, 3, 4], vec![2, 2], &opts).unwrap();
    /// let c = t.copy();
    /// assert_eq!(c.offset(), 0);
    /// assert_eq!(c.storage_len(), 4);
    /// assert_eq!(c, t);
    /// ```
    pub fn copy(&self) -> Self {
        Tensor::from_parts(self.to_vec(), self.shape.clone())
    }

    /// Transpose a 2-D tensor (matrix). Returns a new tensor with copied data.
    pub fn transpose(&self) -> Result<Self> {
        self.check_matrix("transpose() requires a 2-D tensor")?;
        let (rows, cols) = (self.shape[0], self.shape[1]);
        let mut data = Vec::with_capacity(self.numel());
        for c in 0..cols {
            for r in 0..rows {
                data.push(self.at(r, c));
            }
        }
        Ok(Tensor::from_parts(data, vec![cols, rows]))
    }
}
