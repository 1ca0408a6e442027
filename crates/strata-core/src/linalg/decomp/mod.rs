//! Matrix decompositions.
//!
//! | Decomposition | Module       | Factorization           |
//! |---------------|-------------|-------------------------|
//! | LU            | [`lu`]      | `A = LU` (no pivoting)  |
//! | QR            | [`qr`]      | `A = QR`                |
//! | Cholesky      | [`cholesky`]| `A = L L^T`             |
//! | SVD           | [`svd`]     | `A = U S V^T`           |
//! | Eigen         | [`eig`]     | `A = V diag(d) V^T`     |

pub mod cholesky;
pub mod eig;
pub mod lu;
pub mod qr;
pub mod svd;

pub use cholesky::CholeskyDecomposition;
pub use eig::EigDecomposition;
pub use lu::LuDecomposition;
pub use qr::QrDecomposition;
pub use svd::SvdDecomposition;

use crate::Scalar;
use crate::error::{CoreError, Result};
use crate::tensor::Tensor;

/// Side length of a square rank-2 tensor, or `InvalidArgument { reason }`.
pub(crate) fn square_dim<T: Scalar>(a: &Tensor<T>, reason: &'static str) -> Result<usize> {
    if !a.is_square() {
        return Err(CoreError::InvalidArgument { reason });
    }
    Ok(a.shape()[0])
}
