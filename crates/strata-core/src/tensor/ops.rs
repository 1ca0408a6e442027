//! Element-wise arithmetic operators for [`Tensor`].
//!
//! Implements `Add`, `Sub`, `Mul`, `Div` for:
//! - `Tensor<T> op Tensor<T>` (element-wise, same shape)
//! - `Tensor<T> op T` (scalar applied to every element)
//! - `Neg` for `Float` tensors
//!
//! The operator forms panic on invalid operands; the `*_checked` methods
//! return the same failures as a [`CoreError`].

use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::{CoreError, Result};
use crate::{Float, Scalar};

use super::Tensor;

// ======================================================================
// Fallible (Result-returning) arithmetic
// ======================================================================

impl<T: Scalar> Tensor<T> {
    /// Element-wise addition, returning `Err` on shape mismatch.
    pub fn add_checked(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip_map(other, |a, b| a + b)
    }

    /// Element-wise subtraction, returning `Err` on shape mismatch.
    pub fn sub_checked(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip_map(other, |a, b| a - b)
    }

    /// Element-wise multiplication, returning `Err` on shape mismatch.
    pub fn mul_checked(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip_map(other, |a, b| a * b)
    }

    /// Element-wise division.
    ///
    /// Fails on shape mismatch, or with [`CoreError::DivisionByZero`] naming
    /// the first zero divisor in row-major order.
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// # use strata_core::error::ErrorKind;
    /// let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
    /// let b = Tensor::from_vec(vec![1.0, 2.0, 0.0, 4.0], vec![2, 2]).unwrap();
    /// let err = a.div_checked(&b).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::DivisionByZero);
    /// ```
    pub fn div_checked(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.check_same_shape(other)?;
        if let Some(k) = other.iter().position(|x| x.is_zero()) {
            return Err(CoreError::DivisionByZero {
                index: unravel(k, &other.shape),
            });
        }
        self.zip_map(other, |a, b| a / b)
    }
}

/// Multi-index of the `k`-th element in row-major order.
fn unravel(mut k: usize, shape: &[usize]) -> Vec<usize> {
    let mut index = vec![0; shape.len()];
    for d in (0..shape.len()).rev() {
        index[d] = k % shape[d];
        k /= shape[d];
    }
    index
}

// ======================================================================
// Tensor op Tensor  (element-wise, same shape; panics otherwise)
// ======================================================================

macro_rules! impl_tensor_binop {
    ($trait:ident, $method:ident, $checked:ident) => {
        impl<T: Scalar> $trait for Tensor<T> {
            type Output = Tensor<T>;

            fn $method(self, rhs: Tensor<T>) -> Tensor<T> {
                (&self).$method(&rhs)
            }
        }

        impl<T: Scalar> $trait for &Tensor<T> {
            type Output = Tensor<T>;

            fn $method(self, rhs: &Tensor<T>) -> Tensor<T> {
                match self.$checked(rhs) {
                    Ok(t) => t,
                    Err(e) => panic!("element-wise {}: {e}", stringify!($method)),
                }
            }
        }
    };
}

impl_tensor_binop!(Add, add, add_checked);
impl_tensor_binop!(Sub, sub, sub_checked);
impl_tensor_binop!(Mul, mul, mul_checked);
impl_tensor_binop!(Div, div, div_checked);

// ======================================================================
// Tensor op scalar
// ======================================================================

macro_rules! impl_scalar_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<T: Scalar> $trait<T> for Tensor<T> {
            type Output = Tensor<T>;

            fn $method(self, rhs: T) -> Tensor<T> {
                self.map(|a| a $op rhs)
            }
        }

        impl<T: Scalar> $trait<T> for &Tensor<T> {
            type Output = Tensor<T>;

            fn $method(self, rhs: T) -> Tensor<T> {
                self.map(|a| a $op rhs)
            }
        }
    };
}

impl_scalar_binop!(Add, add, +);
impl_scalar_binop!(Sub, sub, -);
impl_scalar_binop!(Mul, mul, *);
impl_scalar_binop!(Div, div, /);

// ======================================================================
// Negation
// ======================================================================

impl<T: Float> Neg for Tensor<T> {
    type Output = Tensor<T>;

    fn neg(self) -> Tensor<T> {
        self.map(|a| -a)
    }
}

impl<T: Float> Neg for &Tensor<T> {
    type Output = Tensor<T>;

    fn neg(self) -> Tensor<T> {
        self.map(|a| -a)
    }
}

// ======================================================================
// Reductions
// ======================================================================

impl<T: Scalar> Tensor<T> {
    /// Sum of all elements.
    pub fn sum(&self) -> T {
        self.iter().sum()
    }

    /// Product of all elements.
    pub fn product(&self) -> T {
        self.iter().fold(T::one(), |acc, x| acc * x)
    }

    /// Smallest element. Incomparable values (NaN) never replace the
    /// running minimum.
    pub fn min_element(&self) -> T {
        let mut it = self.iter();
        let first = it.next().unwrap_or_default();
        it.fold(first, |a, b| if b < a { b } else { a })
    }

    /// Largest element.
    pub fn max_element(&self) -> T {
        let mut it = self.iter();
        let first = it.next().unwrap_or_default();
        it.fold(first, |a, b| if b > a { b } else { a })
    }
}

impl<T: Float> Tensor<T> {
    /// Mean of all elements.
    pub fn mean(&self) -> T {
        self.sum() / T::from_usize(self.numel())
    }
}
