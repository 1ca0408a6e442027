//! Tensor construction: explicit buffers and the `zeros`/`ones`/`identity`
//! family of factories.

use rand::Rng;

use crate::error::{CoreError, Result};
use crate::{Float, Scalar};

use super::Tensor;
use super::layout::{self, TensorOptions};
use super::storage::{SharedBuffer, Storage};

impl<T: Scalar> Tensor<T> {
    // ------------------------------------------------------------------
    // Construction from a shape
    // ------------------------------------------------------------------

    /// Create a zero-filled row-major tensor.
    ///
    /// Every dimension must be positive and the element count must fit in
    /// `usize`.
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// let t = Tensor::<f64>::new(vec![2, 3]).unwrap();
    /// assert_eq!(t.storage_len(), 6);
    /// assert!(Tensor::<f64>::new(vec![2, 0]).is_err());
    /// ```
    pub fn new(shape: Vec<usize>) -> Result<Self> {
        Self::with_options(shape, &TensorOptions::new())
    }

    /// Create a zero-filled tensor with the given layout, strides and offset.
    ///
    /// The buffer is sized to reach every element, which is exactly
    /// `product(shape)` for the default layouts at offset 0.
    pub fn with_options(shape: Vec<usize>, options: &TensorOptions) -> Result<Self> {
        let geometry = layout::plan(shape, options, None)?;
        let len = geometry.required_len.max(geometry.numel);
        Ok(Self {
            storage: Storage::Owned(vec![T::zero(); len]),
            shape: geometry.shape,
            strides: geometry.strides,
            offset: geometry.offset,
        })
    }

    // ------------------------------------------------------------------
    // Construction from an external buffer
    // ------------------------------------------------------------------

    /// Create a row-major tensor from a flat data vector and a shape.
    ///
    /// Returns an error if the product of `shape` does not equal `data.len()`.
    pub fn from_vec(data: Vec<T>, shape: Vec<usize>) -> Result<Self> {
        let numel = layout::checked_numel(&shape)?;
        if numel != data.len() {
            return Err(CoreError::InvalidShape {
                shape,
                reason: "shape product does not match data length",
            });
        }
        Ok(Self::from_parts(data, shape))
    }

    /// Create a tensor from a flat slice and a shape (copies the data).
    pub fn from_slice(data: &[T], shape: Vec<usize>) -> Result<Self> {
        Self::from_vec(data.to_vec(), shape)
    }

    /// Take ownership of `data` and view it with the given options.
    ///
    /// `data` may be longer than the tensor needs; the offset and strides
    /// pick out the elements.
    pub fn from_vec_with(data: Vec<T>, shape: Vec<usize>, options: &TensorOptions) -> Result<Self> {
        let geometry = layout::plan(shape, options, Some(data.len()))?;
        Ok(Self {
            storage: Storage::Owned(data),
            shape: geometry.shape,
            strides: geometry.strides,
            offset: geometry.offset,
        })
    }

    /// View a caller-managed [`SharedBuffer`] without copying it.
    ///
    /// Several tensors may be built over the same buffer; writes through one
    /// are visible through the others. The buffer stays alive as long as any
    /// handle to it does.
    pub fn from_shared(
        buffer: SharedBuffer<T>,
        shape: Vec<usize>,
        options: &TensorOptions,
    ) -> Result<Self> {
        let geometry = layout::plan(shape, options, Some(buffer.len()))?;
        Ok(Self {
            storage: Storage::Shared(buffer),
            shape: geometry.shape,
            strides: geometry.strides,
            offset: geometry.offset,
        })
    }

    // ------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------

    /// Create a tensor filled with zeros.
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// let t = Tensor::<f64>::zeros(vec![2, 3]).unwrap();
    /// assert_eq!(t.shape(), &[2, 3]);
    /// assert!(t.iter().all(|x| x == 0.0));
    /// ```
    pub fn zeros(shape: Vec<usize>) -> Result<Self> {
        Self::new(shape)
    }

    /// Create a tensor filled with ones.
    pub fn ones(shape: Vec<usize>) -> Result<Self> {
        Self::full(shape, T::one())
    }

    /// Create a tensor filled with a constant value.
    pub fn full(shape: Vec<usize>, value: T) -> Result<Self> {
        let numel = layout::checked_numel(&shape)?;
        Ok(Self::from_parts(vec![value; numel], shape))
    }

    /// Create a 1-D tensor with values `[0, 1, 2, ..., n-1]`.
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// let t = Tensor::<i32>::arange(5).unwrap();
    /// assert_eq!(t.to_vec(), vec![0, 1, 2, 3, 4]);
    /// ```
    pub fn arange(n: usize) -> Result<Self> {
        layout::checked_numel(&[n])?;
        let data: Vec<T> = (0..n).map(T::from_usize).collect();
        Ok(Self::from_parts(data, vec![n]))
    }

    /// Create an identity matrix of size `n x n`.
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// let eye = Tensor::<f64>::identity(3).unwrap();
    /// assert_eq!(eye.shape(), &[3, 3]);
    /// assert_eq!(eye.get(&[0, 0]).unwrap(), 1.0);
    /// assert_eq!(eye.get(&[0, 1]).unwrap(), 0.0);
    /// ```
    pub fn identity(n: usize) -> Result<Self> {
        let numel = layout::checked_numel(&[n, n])?;
        let mut data = vec![T::zero(); numel];
        for i in 0..n {
            data[i * n + i] = T::one();
        }
        Ok(Self::from_parts(data, vec![n, n]))
    }
}

impl<T: Float> Tensor<T> {
    /// Create a tensor of uniform samples in `[0, 1)` from the thread-local
    /// generator.
    pub fn random(shape: Vec<usize>) -> Result<Self> {
        Self::random_with(shape, &mut rand::rng())
    }

    /// Create a tensor of uniform samples in `[0, 1)` drawn from `rng`.
    ///
    /// ```
    /// # use strata_core::tensor::Tensor;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let t = Tensor::<f64>::random_with(vec![4, 4], &mut rng).unwrap();
    /// assert!(t.iter().all(|x| (0.0..1.0).contains(&x)));
    /// ```
    pub fn random_with<R: Rng + ?Sized>(shape: Vec<usize>, rng: &mut R) -> Result<Self> {
        let numel = layout::checked_numel(&shape)?;
        // Narrowing a draw just below 1 can round up to 1
        let below_one = T::one() - T::epsilon() / T::from_f64(2.0);
        let data: Vec<T> = (0..numel)
            .map(|_| {
                let x = T::from_f64(rng.random::<f64>());
                if x < T::one() { x } else { below_one }
            })
            .collect();
        Ok(Self::from_parts(data, shape))
    }
}
