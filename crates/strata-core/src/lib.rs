//! `strata-core` — strided N-dimensional tensors and dense linear algebra.
//!
//! Provides the [`Tensor`] type, numeric capability traits, element-wise
//! arithmetic and the [`linalg`] routines built on top of them.
//!
//! # Design
//!
//! - A tensor is a shape, per-dimension strides and an offset into a flat
//!   buffer. The buffer is either owned or a caller-supplied
//!   [`SharedBuffer`](tensor::SharedBuffer) aliased by several tensors.
//! - Generic over numeric types via the [`Scalar`] / [`Float`] traits.
//! - Fallible operations return [`Result`]; the arithmetic operators panic
//!   with the same error message their checked counterparts return.
//! - Diagnostics go through `tracing`; no subscriber is installed.

pub mod dtype;
pub mod error;
pub mod linalg;
pub mod tensor;

// Re-export key types at crate root for convenience.
pub use dtype::{Float, Scalar};
pub use error::{CoreError, ErrorKind, Result};
pub use tensor::Tensor;

/// Items intended for glob-import: `use strata_core::prelude::*;`
pub mod prelude {
    pub use crate::dtype::{Float, Scalar};
    pub use crate::error::{CoreError, ErrorKind, Result};
    pub use crate::linalg;
    pub use crate::tensor::{Layout, SharedBuffer, Tensor, TensorOptions};
}
