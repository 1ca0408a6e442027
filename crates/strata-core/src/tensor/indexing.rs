//! Sub-tensor extraction for [`Tensor`].
//!
//! Slices are always deep copies; the result never aliases the source buffer.

use crate::Scalar;
use crate::error::{CoreError, Result};

use super::{Positions, Tensor};

impl<T: Scalar> Tensor<T> {
    /// Copy out the block `start[d]..end[d]` along every axis.
    ///
    /// Requires `start` and `end` to have one entry per dimension and
    /// `start[d] < end[d] <= shape[d]`. Element `t` of the result is element
    /// `t + start` of `self`.
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// let t = Tensor::from_vec((1..=9).collect(), vec![3, 3]).unwrap();
    /// let s = t.slice(&[0, 1], &[2, 3]).unwrap();
    /// assert_eq!(s.shape(), &[2, 2]);
    /// assert_eq!(s.to_vec(), vec![2, 3, 5, 6]);
    /// ```
    pub fn slice(&self, start: &[usize], end: &[usize]) -> Result<Self> {
        if start.len() != self.ndim() || end.len() != self.ndim() {
            return Err(CoreError::InvalidArgument {
                reason: "slice bounds must have one entry per dimension",
            });
        }
        for ((&s, &e), &dim) in start.iter().zip(end).zip(&self.shape) {
            if s >= e || e > dim {
                return Err(CoreError::InvalidArgument {
                    reason: "slice bounds must satisfy start < end <= shape",
                });
            }
        }

        let new_shape: Vec<usize> = start.iter().zip(end).map(|(&s, &e)| e - s).collect();
        let base = self.offset
            + start
                .iter()
                .zip(&self.strides)
                .map(|(&s, &st)| s * st)
                .sum::<usize>();

        // Walk the sub-block through the source strides, starting at `start`.
        let data = Positions::new(&new_shape, &self.strides, base)
            .map(|p| self.storage.read(p))
            .collect();
        Ok(Tensor::from_parts(data, new_shape))
    }

    /// Copy row `i` of a matrix as a 1-D tensor.
    pub fn row(&self, i: usize) -> Result<Self> {
        self.check_matrix("row() requires a 2-D tensor")?;
        let cols = self.shape[1];
        let row = self.slice(&[i, 0], &[i + 1, cols]).map_err(|_| {
            CoreError::IndexOutOfBounds {
                index: vec![i, 0],
                shape: self.shape.clone(),
            }
        })?;
        Ok(Tensor::from_parts(row.to_vec(), vec![cols]))
    }

    /// Copy column `j` of a matrix as a 1-D tensor.
    pub fn column(&self, j: usize) -> Result<Self> {
        self.check_matrix("column() requires a 2-D tensor")?;
        let rows = self.shape[0];
        if j >= self.shape[1] {
            return Err(CoreError::IndexOutOfBounds {
                index: vec![0, j],
                shape: self.shape.clone(),
            });
        }
        let data = (0..rows).map(|i| self.at(i, j)).collect();
        Ok(Tensor::from_parts(data, vec![rows]))
    }

    pub(crate) fn check_matrix(&self, reason: &'static str) -> Result<()> {
        if self.ndim() != 2 {
            return Err(CoreError::InvalidArgument { reason });
        }
        Ok(())
    }
}
