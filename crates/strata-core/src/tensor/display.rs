//! `Display` formatting for [`Tensor`].

use core::fmt;

use crate::Scalar;

use super::Tensor;

fn write_row<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    values: impl Iterator<Item = T>,
) -> fmt::Result {
    write!(f, "[")?;
    for (i, v) in values.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{v}")?;
    }
    write!(f, "]")
}

impl<T: Scalar> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ndim() {
            1 => {
                write!(f, "tensor(")?;
                write_row(f, self.iter())?;
                write!(f, ")")
            }
            2 => {
                let (rows, cols) = (self.shape[0], self.shape[1]);
                writeln!(f, "tensor([")?;
                for r in 0..rows {
                    write!(f, "  ")?;
                    write_row(f, (0..cols).map(|c| self.at(r, c)))?;
                    if r < rows - 1 {
                        writeln!(f, ",")?;
                    } else {
                        writeln!(f)?;
                    }
                }
                write!(f, "])")
            }
            _ => {
                // 3-D and up: shape plus the first and last elements
                let n = self.numel();
                let mut it = self.iter();
                write!(f, "tensor(shape={:?}, data=", self.shape)?;
                if n <= 3 {
                    write_row(f, it)?;
                    return write!(f, ")");
                }
                write!(f, "[")?;
                let first = it.next().unwrap_or_default();
                let second = it.next().unwrap_or_default();
                let last = it.last().unwrap_or_default();
                write!(f, "{first}, {second}, ..., {last}])")
            }
        }
    }
}
