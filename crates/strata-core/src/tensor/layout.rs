//! Memory layout configuration and shape/stride validation.

use core::fmt;
use core::str::FromStr;

use crate::error::{CoreError, Result};

/// Order in which a tensor's elements are laid out in its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layout {
    /// C order: the last index varies fastest.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "C"))]
    RowMajor,
    /// Fortran order: the first index varies fastest.
    #[cfg_attr(feature = "serde", serde(rename = "F"))]
    ColumnMajor,
}

impl Layout {
    /// The single-letter token for this layout (`"C"` or `"F"`).
    pub fn token(self) -> &'static str {
        match self {
            Self::RowMajor => "C",
            Self::ColumnMajor => "F",
        }
    }

    /// Contiguous strides for `shape` in this order.
    pub fn strides(self, shape: &[usize]) -> Vec<usize> {
        match self {
            Self::RowMajor => row_major_strides(shape),
            Self::ColumnMajor => col_major_strides(shape),
        }
    }
}

impl FromStr for Layout {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "C" => Ok(Self::RowMajor),
            "F" => Ok(Self::ColumnMajor),
            _ => Err(CoreError::InvalidLayout {
                token: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Construction options for [`Tensor`](super::Tensor).
///
/// ```
/// # use strata_core::tensor::{Layout, Tensor, TensorOptions};
/// let opts = TensorOptions::new().layout(Layout::ColumnMajor);
/// let t = Tensor::<f64>::with_options(vec![2, 3], &opts).unwrap();
/// assert_eq!(t.strides(), &[1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TensorOptions {
    /// Layout used to derive strides when none are given.
    pub layout: Layout,
    /// Explicit strides; overrides `layout`.
    pub strides: Option<Vec<usize>>,
    /// Start position inside the buffer.
    pub offset: usize,
}

impl TensorOptions {
    /// Row-major, derived strides, offset 0.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn strides(mut self, strides: Vec<usize>) -> Self {
        self.strides = Some(strides);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// A validated shape/stride pair ready to be paired with storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Geometry {
    pub(crate) shape: Vec<usize>,
    pub(crate) strides: Vec<usize>,
    pub(crate) offset: usize,
    /// `product(shape)`.
    pub(crate) numel: usize,
    /// Buffer length needed to reach every element: `offset + 1 + Σ (n-1)*s`.
    pub(crate) required_len: usize,
}

/// Validate `shape` and `options` and work out the strides.
///
/// `buffer_len` is the length of a caller-supplied buffer, if any.
pub(crate) fn plan(
    shape: Vec<usize>,
    options: &TensorOptions,
    buffer_len: Option<usize>,
) -> Result<Geometry> {
    let numel = checked_numel(&shape)?;

    let strides = match &options.strides {
        Some(strides) => {
            if strides.len() != shape.len() {
                return Err(CoreError::InvalidShape {
                    shape,
                    reason: "strides must have one entry per dimension",
                });
            }
            strides.clone()
        }
        None => options.layout.strides(&shape),
    };

    let offset = options.offset;
    let required_len = reach(&shape, &strides, offset)?;

    if let Some(len) = buffer_len {
        if offset >= len {
            return Err(CoreError::InvalidArgument {
                reason: "offset lies beyond the end of the buffer",
            });
        }
        if len - offset < numel {
            return Err(CoreError::InvalidShape {
                shape,
                reason: "buffer too small for shape at this offset",
            });
        }
        if required_len > len {
            return Err(CoreError::InvalidShape {
                shape,
                reason: "strides reach past the end of the buffer",
            });
        }
    }

    Ok(Geometry {
        shape,
        strides,
        offset,
        numel,
        required_len,
    })
}

/// Check that every dimension is positive and the element count fits `usize`.
pub(crate) fn checked_numel(shape: &[usize]) -> Result<usize> {
    if shape.is_empty() {
        return Err(CoreError::InvalidShape {
            shape: vec![],
            reason: "shape must have at least one dimension",
        });
    }
    if shape.contains(&0) {
        return Err(CoreError::InvalidShape {
            shape: shape.to_vec(),
            reason: "every dimension must be positive",
        });
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| CoreError::Overflow {
            shape: shape.to_vec(),
        })
}

/// One past the furthest flat position addressed by `shape`/`strides`.
fn reach(shape: &[usize], strides: &[usize], offset: usize) -> Result<usize> {
    let overflow = || CoreError::Overflow {
        shape: shape.to_vec(),
    };
    let mut last = offset;
    for (&dim, &stride) in shape.iter().zip(strides) {
        let span = (dim - 1).checked_mul(stride).ok_or_else(overflow)?;
        last = last.checked_add(span).ok_or_else(overflow)?;
    }
    last.checked_add(1).ok_or_else(overflow)
}

/// Compute row-major (C-order) strides from a shape.
pub(crate) fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let ndim = shape.len();
    if ndim == 0 {
        return vec![];
    }
    let mut strides = vec![1usize; ndim];
    for i in (0..ndim - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Compute column-major (Fortran-order) strides from a shape.
pub(crate) fn col_major_strides(shape: &[usize]) -> Vec<usize> {
    let ndim = shape.len();
    if ndim == 0 {
        return vec![];
    }
    let mut strides = vec![1usize; ndim];
    for i in 1..ndim {
        strides[i] = strides[i - 1] * shape[i - 1];
    }
    strides
}
