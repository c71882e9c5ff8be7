//! Error types for imp-core operations.
//!
//! Every fallible container operation returns [`Result`]. Failures are
//! deterministic functions of the inputs and are reported before any
//! mutation of the target container takes place.
//!
//! # Usage
//!
//! ```rust
//! use imp_core::{Error, Matrix};
//!
//! let mut a: Matrix<i32> = Matrix::zeros(2, 2);
//! let b: Matrix<i32> = Matrix::zeros(3, 1);
//! let err = a.checked_add_assign(&b).unwrap_err();
//! assert!(err.is_shape_error());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation
//!
//! # Used By
//!
//! - [`crate::buffer::Buffer`] - Allocation and resize failures
//! - [`crate::matrix::Matrix`] - Shape and size checks
//! - [`crate::rgb_image::RgbImage`] - Plane construction
//! - `imp-io` - wraps this type in its own error enum

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in container operations.
///
/// # Categories
///
/// - **Shape errors**: [`ShapeMismatch`](Error::ShapeMismatch), [`SizeMismatch`](Error::SizeMismatch)
/// - **Dimension errors**: [`InvalidDimensions`](Error::InvalidDimensions), [`OutOfBounds`](Error::OutOfBounds)
/// - **Allocation errors**: [`AllocationFailed`](Error::AllocationFailed)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Operand shapes differ for an elementwise operation.
    ///
    /// Both operands of `+=`/`-=` must have identical `rows` and `cols`.
    #[error("shape mismatch: {a_rows}x{a_cols} vs {b_rows}x{b_cols}")]
    ShapeMismatch {
        /// Rows of the left operand
        a_rows: usize,
        /// Columns of the left operand
        a_cols: usize,
        /// Rows of the right operand
        b_rows: usize,
        /// Columns of the right operand
        b_cols: usize,
    },

    /// Element count does not fit a fixed-size (borrowed) target, or a
    /// source slice does not hold exactly `rows * cols` elements.
    #[error("size mismatch: expected {expected} elements, got {got}")]
    SizeMismatch {
        /// Element count the target requires
        expected: usize,
        /// Element count that was supplied
        got: usize,
    },

    /// `rows * cols` (or `3 * width * height`) overflows `usize`.
    #[error("invalid dimensions: {rows}x{cols} ({reason})")]
    InvalidDimensions {
        /// Requested rows
        rows: usize,
        /// Requested columns
        cols: usize,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Element coordinates are outside the container.
    #[error("element ({row}, {col}) out of bounds for {rows}x{cols}")]
    OutOfBounds {
        /// Row that was accessed
        row: usize,
        /// Column that was accessed
        col: usize,
        /// Container rows
        rows: usize,
        /// Container columns
        cols: usize,
    },

    /// Memory allocation failed.
    ///
    /// Returned when `try_reserve_exact` cannot satisfy a request.
    #[error("failed to allocate {requested} elements: {reason}")]
    AllocationFailed {
        /// Elements requested
        requested: usize,
        /// Failure reason
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::ShapeMismatch`] error from `(rows, cols)` pairs.
    #[inline]
    pub fn shape_mismatch(a: (usize, usize), b: (usize, usize)) -> Self {
        Self::ShapeMismatch {
            a_rows: a.0,
            a_cols: a.1,
            b_rows: b.0,
            b_cols: b.1,
        }
    }

    /// Creates an [`Error::SizeMismatch`] error.
    #[inline]
    pub fn size_mismatch(expected: usize, got: usize) -> Self {
        Self::SizeMismatch { expected, got }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(rows: usize, cols: usize, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            rows,
            cols,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(row: usize, col: usize, rows: usize, cols: usize) -> Self {
        Self::OutOfBounds {
            row,
            col,
            rows,
            cols,
        }
    }

    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    /// Returns `true` for shape and size disagreements.
    #[inline]
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. } | Self::SizeMismatch { .. })
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }
}

/// Computes `rows * cols`, failing on overflow.
pub(crate) fn checked_area(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols)
        .ok_or_else(|| Error::invalid_dimensions(rows, cols, "element count overflows usize"))
}
