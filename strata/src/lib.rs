//! # Strata
//!
//! Strided N-dimensional tensors with dense linear algebra.
//!
//! One `use strata::prelude::*;` gives you tensors over owned or shared
//! buffers, element-wise arithmetic, matrix products, determinants,
//! inverses and the LU, QR, Cholesky, eigen and singular value
//! decompositions.
//!
//! ```
//! use strata::prelude::*;
//!
//! let a = Tensor::from_vec(vec![4.0_f64, 7.0, 2.0, 6.0], vec![2, 2]).unwrap();
//! let inv = a.inverse().unwrap();
//! let eye = a.matmul(&inv).unwrap();
//! assert!((eye.get(&[1, 1]).unwrap() - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Enables |
//! |---------|---------|
//! | `core` *(default)* | Tensors and linear algebra |
//! | `serde` | `Serialize`/`Deserialize` for `Layout` and `TensorOptions` |

pub use strata_core as core;

/// Glob-import convenience: `use strata::prelude::*;`
pub mod prelude {
    pub use strata_core::prelude::*;
}
