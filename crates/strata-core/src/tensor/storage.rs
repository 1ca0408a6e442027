//! Backing buffers for [`Tensor`](super::Tensor).
//!
//! A tensor either owns its elements outright or aliases a [`SharedBuffer`]
//! handed in by the caller. Shared buffers are reference counted and
//! single-threaded (`!Send`), so aliasing never crosses a thread boundary.

use std::cell::RefCell;
use std::rc::Rc;

use crate::Scalar;

/// A caller-managed element buffer that several tensors may view at once.
///
/// Cloning a `SharedBuffer` creates another handle to the *same* storage.
/// Writes made through any tensor built on it are visible through every
/// other handle.
///
/// ```
/// # use strata_core::tensor::{SharedBuffer, Tensor, TensorOptions};
/// let buf = SharedBuffer::new(vec![0.0_f64; 4]);
/// let mut a = Tensor::from_shared(buf.clone(), vec![2, 2], &TensorOptions::new()).unwrap();
/// a.set(&[1, 1], 5.0).unwrap();
/// assert_eq!(buf.get(3), Some(5.0));
/// ```
#[derive(Debug)]
pub struct SharedBuffer<T> {
    inner: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for SharedBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Scalar> SharedBuffer<T> {
    /// Wrap a vector as a shareable buffer.
    pub fn new(data: Vec<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(data)),
        }
    }

    /// Copy a slice into a new shareable buffer.
    pub fn from_slice(data: &[T]) -> Self {
        Self::new(data.to_vec())
    }

    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Read the element at a flat position.
    pub fn get(&self, pos: usize) -> Option<T> {
        self.inner.borrow().get(pos).copied()
    }

    /// Copy the whole buffer out.
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.borrow().clone()
    }

    /// Number of live handles (tensors and buffers) sharing this storage.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Element storage behind a tensor.
#[derive(Debug)]
pub(crate) enum Storage<T> {
    Owned(Vec<T>),
    Shared(SharedBuffer<T>),
}

impl<T: Scalar> Storage<T> {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Owned(v) => v.len(),
            Self::Shared(b) => b.len(),
        }
    }

    /// Read a flat position. Callers have already validated `pos`.
    #[inline]
    pub(crate) fn read(&self, pos: usize) -> T {
        match self {
            Self::Owned(v) => v[pos],
            Self::Shared(b) => b.inner.borrow()[pos],
        }
    }

    /// Write a flat position. Callers have already validated `pos`.
    #[inline]
    pub(crate) fn write(&mut self, pos: usize, value: T) {
        match self {
            Self::Owned(v) => v[pos] = value,
            Self::Shared(b) => b.inner.borrow_mut()[pos] = value,
        }
    }

    pub(crate) fn is_shared(&self) -> bool {
        matches!(self, Self::Shared(_))
    }

    /// Whether both storages refer to the same shared buffer.
    pub(crate) fn aliases(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Shared(a), Self::Shared(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl<T: Scalar> Clone for Storage<T> {
    /// Deep copy; a shared buffer is detached into an owned vector.
    fn clone(&self) -> Self {
        match self {
            Self::Owned(v) => Self::Owned(v.clone()),
            Self::Shared(b) => Self::Owned(b.to_vec()),
        }
    }
}
