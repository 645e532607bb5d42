use std::fmt;

/// Errors reported by the fallible [`crate::BoolMatrix`] operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoolMatrixError {
    /// A row or column index was not smaller than the matrix size
    IndexOutOfRange { row: usize, col: usize, size: usize },

    /// An unexpected character in the text form of a matrix. `line` and `column` are 1-based
    Parse {
        line: usize,
        column: usize,
        found: char,
    },

    /// A packed row has bits set at or beyond the matrix size
    PaddingBitsSet { row: usize },
}

impl fmt::Display for BoolMatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolMatrixError::IndexOutOfRange { row, col, size } => write!(
                f,
                "index ({}, {}) out of range for a {}x{} matrix",
                row, col, size, size
            ),
            BoolMatrixError::Parse {
                line,
                column,
                found,
            } => write!(
                f,
                "unexpected character {:?} at line {}, column {}; expected '0' or '1'",
                found, line, column
            ),
            BoolMatrixError::PaddingBitsSet { row } => {
                write!(f, "row {} has bits set beyond the matrix size", row)
            }
        }
    }
}

impl std::error::Error for BoolMatrixError {}
