/// All errors returned by `strata-core`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A shape or stride specification is invalid.
    #[error("invalid shape {shape:?}: {reason}")]
    InvalidShape {
        shape: Vec<usize>,
        reason: &'static str,
    },

    /// Operand shapes do not match the required layout.
    #[error("dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// A multi-dimensional index is out of bounds.
    #[error("index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    /// The number of indices does not match the tensor's rank.
    #[error("expected {expected} indices, got {got}")]
    IndexRank { expected: usize, got: usize },

    /// The element count of a shape does not fit in `usize`.
    #[error("element count of shape {shape:?} overflows usize")]
    Overflow { shape: Vec<usize> },

    /// The operation is not supported for the given input.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },

    /// A layout token other than `"C"` or `"F"`.
    #[error("invalid layout {token:?}: expected \"C\" or \"F\"")]
    InvalidLayout { token: String },

    /// Elimination hit a zero pivot.
    #[error("singular matrix: zero pivot at step {pivot}")]
    SingularMatrix { pivot: usize },

    /// Element-wise division by a zero element.
    #[error("division by zero at index {index:?}")]
    DivisionByZero { index: Vec<usize> },

    /// An iterative algorithm ran out of sweeps.
    #[error("{algorithm} did not converge within {sweeps} sweeps")]
    NoConvergence {
        algorithm: &'static str,
        sweeps: usize,
    },
}

/// Coarse classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid or mismatched shapes and strides.
    Shape,
    /// An index outside `[0, shape[d])`.
    Bounds,
    /// Element count overflow.
    Overflow,
    /// Wrong rank, wrong index count, or an unrecognised option.
    Argument,
    /// Zero pivot during elimination.
    SingularMatrix,
    /// Zero divisor in element-wise division.
    DivisionByZero,
    /// Iteration limit reached.
    Convergence,
}

impl CoreError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidShape { .. } | Self::DimensionMismatch { .. } => ErrorKind::Shape,
            Self::IndexOutOfBounds { .. } => ErrorKind::Bounds,
            Self::Overflow { .. } => ErrorKind::Overflow,
            Self::InvalidArgument { .. } | Self::IndexRank { .. } | Self::InvalidLayout { .. } => {
                ErrorKind::Argument
            }
            Self::SingularMatrix { .. } => ErrorKind::SingularMatrix,
            Self::DivisionByZero { .. } => ErrorKind::DivisionByZero,
            Self::NoConvergence { .. } => ErrorKind::Convergence,
        }
    }
}

/// Convenience alias used throughout `strata-core`.
pub type Result<T> = std::result::Result<T, CoreError>;
