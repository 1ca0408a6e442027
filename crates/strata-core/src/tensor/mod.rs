//! N-dimensional strided tensor type.
//!
//! A [`Tensor`] is a shape, a stride per dimension, and an offset into a flat
//! element buffer. The buffer is either owned by the tensor or a
//! [`SharedBuffer`] supplied by the caller and possibly aliased by other
//! tensors. Every operation walks the *logical* index space through the
//! strides, so owned, column-major, offset and shared tensors all behave the
//! same way.

mod create;
mod display;
mod indexing;
mod layout;
mod ops;
mod reshape;
mod storage;

pub use layout::{Layout, TensorOptions};
pub use storage::SharedBuffer;

pub(crate) use layout::row_major_strides;

use crate::Scalar;
use crate::error::{CoreError, Result};

use storage::Storage;

/// An N-dimensional tensor with dynamic shape and explicit strides.
///
/// Cloning performs a deep copy. A clone of a tensor built on a
/// [`SharedBuffer`] owns a private copy of that buffer and no longer aliases
/// it.
///
/// # Type Parameters
///
/// - `T`: The element type, which must implement [`Scalar`].
#[derive(Debug, Clone)]
pub struct Tensor<T: Scalar> {
    storage: Storage<T>,
    shape: Vec<usize>,
    strides: Vec<usize>,
    offset: usize,
}

impl<T: Scalar> Tensor<T> {
    /// Assemble a tensor from owned row-major data whose length is already
    /// known to equal `product(shape)`.
    pub(crate) fn from_parts(data: Vec<T>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(data.len(), shape.iter().product::<usize>());
        let strides = row_major_strides(&shape);
        Self {
            storage: Storage::Owned(data),
            shape,
            strides,
            offset: 0,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The shape of the tensor as a slice.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The strides of the tensor as a slice (in number of elements).
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Start position of element `[0, 0, ...]` inside the buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The number of dimensions (rank) of the tensor.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// The total number of logical elements.
    #[inline]
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Length of the underlying buffer, which may exceed [`numel`](Self::numel)
    /// for offset or strided tensors.
    #[inline]
    pub fn storage_len(&self) -> usize {
        self.storage.len()
    }

    /// Whether the tensor views a caller-supplied [`SharedBuffer`].
    #[inline]
    pub fn is_shared(&self) -> bool {
        self.storage.is_shared()
    }

    /// Whether `self` and `other` view the same shared buffer.
    pub fn shares_buffer_with(&self, other: &Tensor<T>) -> bool {
        self.storage.aliases(&other.storage)
    }

    /// Whether the tensor is square and rank 2.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.ndim() == 2 && self.shape[0] == self.shape[1]
    }

    // ------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------

    /// Compute the buffer position for a multi-dimensional index.
    fn flat_index(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.ndim() {
            return Err(CoreError::IndexRank {
                expected: self.ndim(),
                got: index.len(),
            });
        }
        let mut flat = self.offset;
        for ((&idx, &dim), &stride) in index.iter().zip(&self.shape).zip(&self.strides) {
            if idx >= dim {
                return Err(CoreError::IndexOutOfBounds {
                    index: index.to_vec(),
                    shape: self.shape.clone(),
                });
            }
            flat += idx * stride;
        }
        Ok(flat)
    }

    /// Get the element at the given multi-dimensional index.
    pub fn get(&self, index: &[usize]) -> Result<T> {
        let flat = self.flat_index(index)?;
        Ok(self.storage.read(flat))
    }

    /// Set the element at the given multi-dimensional index.
    ///
    /// For a tensor on a [`SharedBuffer`] the write is visible through every
    /// alias of that buffer.
    pub fn set(&mut self, index: &[usize], value: T) -> Result<()> {
        let flat = self.flat_index(index)?;
        self.storage.write(flat, value);
        Ok(())
    }

    /// Unchecked 2-D read for callers that validated rank and bounds.
    #[inline]
    pub(crate) fn at(&self, i: usize, j: usize) -> T {
        self.storage
            .read(self.offset + i * self.strides[0] + j * self.strides[1])
    }

    /// Unchecked 2-D write for callers that validated rank and bounds.
    #[inline]
    pub(crate) fn put(&mut self, i: usize, j: usize, value: T) {
        let pos = self.offset + i * self.strides[0] + j * self.strides[1];
        self.storage.write(pos, value);
    }

    /// Unchecked 1-D read.
    #[inline]
    pub(crate) fn at1(&self, i: usize) -> T {
        self.storage.read(self.offset + i * self.strides[0])
    }

    /// Unchecked 1-D write.
    #[inline]
    pub(crate) fn put1(&mut self, i: usize, value: T) {
        let pos = self.offset + i * self.strides[0];
        self.storage.write(pos, value);
    }

    // ------------------------------------------------------------------
    // Iterators
    // ------------------------------------------------------------------

    /// Buffer positions of every element in logical row-major order.
    pub(crate) fn positions(&self) -> Positions<'_> {
        Positions::new(&self.shape, &self.strides, self.offset)
    }

    /// Iterate over all elements in logical row-major order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.positions().map(|p| self.storage.read(p))
    }

    /// Copy the elements out in logical row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    // ------------------------------------------------------------------
    // Map / apply
    // ------------------------------------------------------------------

    /// Apply a function to every element, returning a new tensor.
    pub fn map<F>(&self, f: F) -> Tensor<T>
    where
        F: Fn(T) -> T,
    {
        let data = self.iter().map(f).collect();
        Tensor::from_parts(data, self.shape.clone())
    }

    /// Apply a function element-wise to two tensors of the same shape.
    pub fn zip_map<F>(&self, other: &Tensor<T>, f: F) -> Result<Tensor<T>>
    where
        F: Fn(T, T) -> T,
    {
        self.check_same_shape(other)?;
        let data = self.iter().zip(other.iter()).map(|(a, b)| f(a, b)).collect();
        Ok(Tensor::from_parts(data, self.shape.clone()))
    }

    /// Apply a function to every element in place.
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(T) -> T,
    {
        let positions: Vec<usize> = self.positions().collect();
        for p in positions {
            let v = self.storage.read(p);
            self.storage.write(p, f(v));
        }
    }

    pub(crate) fn check_same_shape(&self, other: &Tensor<T>) -> Result<()> {
        if self.shape != other.shape {
            return Err(CoreError::DimensionMismatch {
                expected: self.shape.clone(),
                got: other.shape.clone(),
            });
        }
        Ok(())
    }
}

impl<T: Scalar> PartialEq for Tensor<T> {
    /// Logical equality: same shape and same elements, whatever the layout.
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.iter().eq(other.iter())
    }
}

/// Odometer over the buffer positions of a strided tensor.
pub(crate) struct Positions<'a> {
    shape: &'a [usize],
    strides: &'a [usize],
    index: Vec<usize>,
    pos: usize,
    remaining: usize,
}

impl<'a> Positions<'a> {
    pub(crate) fn new(shape: &'a [usize], strides: &'a [usize], offset: usize) -> Self {
        Self {
            shape,
            strides,
            index: vec![0; shape.len()],
            pos: offset,
            remaining: shape.iter().product(),
        }
    }
}

impl Iterator for Positions<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.pos;
        self.remaining -= 1;

        // Advance the odometer, last axis fastest
        for d in (0..self.shape.len()).rev() {
            self.index[d] += 1;
            self.pos += self.strides[d];
            if self.index[d] < self.shape[d] {
                break;
            }
            self.pos -= self.index[d] * self.strides[d];
            self.index[d] = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Positions<'_> {}
