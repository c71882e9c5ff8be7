//! Row-major 2-D numeric container over a [`Buffer`].
//!
//! [`Matrix`] couples a `rows x cols` shape with a [`Buffer`] whose occupied
//! length is always `rows * cols`. Element `i` lives at
//! `(row, col) = (i / cols, i % cols)`.
//!
//! # Construction modes
//!
//! ```rust
//! use imp_core::{Matrix, StorageMode};
//!
//! // Nested literal (Owned)
//! let m = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6]]);
//! assert_eq!((m.rows(), m.cols()), (2, 3));
//!
//! // Copy mode: independent of the caller's memory
//! let src = [1.0f32, 2.0, 3.0, 4.0];
//! let copy = Matrix::from_slice(2, 2, &src).unwrap();
//! assert_ne!(copy.as_ptr(), src.as_ptr());
//!
//! // Borrow mode: aliases the caller's memory for `'a`
//! let mut raw = [0u8; 6];
//! let ptr = raw.as_ptr();
//! let view = Matrix::map(2, 3, &mut raw).unwrap();
//! assert_eq!(view.mode(), StorageMode::Borrowed);
//! assert_eq!(view.as_ptr(), ptr);
//! ```
//!
//! # Coordinates
//!
//! Two-coordinate access is always `(row, col)`:
//!
//! ```rust
//! use imp_core::Matrix;
//!
//! let m = Matrix::from_rows(&[[0, 1, 2], [3, 4, 5]]);
//! assert_eq!(m[(1, 0)], 3);
//! assert_eq!(m[4], m[(1, 1)]);
//! ```
//!
//! # Assignment
//!
//! - [`Clone::clone`] always yields an Owned copy.
//! - [`Matrix::take`] moves the storage (mode and identity preserved) and
//!   resets the source to the empty 0x0 matrix.
//! - [`Matrix::assign`] / [`Matrix::assign_rows`] write through: an Owned
//!   target reuses or reallocates per [`StoragePlan`](crate::StoragePlan),
//!   a Borrowed target only accepts the same element count.

use crate::buffer::{Buffer, StorageMode, StoragePlan};
use crate::error::{checked_area, Error, Result};
use crate::scalar::Scalar;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Row-major matrix with an explicit ownership mode.
///
/// `'a` is the lifetime of borrowed caller memory; Owned matrices can be
/// `Matrix<'static, T>`.
pub struct Matrix<'a, T: Scalar> {
    rows: usize,
    cols: usize,
    buf: Buffer<'a, T>,
}

impl<T: Scalar> Default for Matrix<'_, T> {
    /// Empty 0x0 matrix with no storage.
    fn default() -> Self {
        Self {
            rows: 0,
            cols: 0,
            buf: Buffer::default(),
        }
    }
}

impl<'a, T: Scalar> Matrix<'a, T> {
    /// Creates a `rows x cols` Owned matrix.
    ///
    /// Contents are implementation-defined; use [`zeros`](Self::zeros) when
    /// zero-fill is required.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows or allocation fails. See
    /// [`try_new`](Self::try_new) for the fallible variant.
    pub fn new(rows: usize, cols: usize) -> Self {
        match Self::try_new(rows, cols) {
            Ok(m) => m,
            Err(e) => panic!("cannot create {rows}x{cols} matrix: {e}"),
        }
    }

    /// Fallible [`new`](Self::new).
    pub fn try_new(rows: usize, cols: usize) -> Result<Self> {
        let len = checked_area(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            buf: Buffer::owned(len)?,
        })
    }

    /// Creates a `rows x cols` Owned matrix filled with zeros.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows or allocation fails.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let len = rows
            .checked_mul(cols)
            .unwrap_or_else(|| panic!("cannot create {rows}x{cols} matrix: size overflow"));
        Self {
            rows,
            cols,
            buf: Buffer::adopt(vec![T::zero(); len]),
        }
    }

    /// Copy mode: allocates an Owned matrix and copies `data` into it.
    ///
    /// # Errors
    ///
    /// [`Error::SizeMismatch`] if `data.len() != rows * cols`.
    pub fn from_slice(rows: usize, cols: usize, data: &[T]) -> Result<Self> {
        let len = checked_area(rows, cols)?;
        if data.len() != len {
            return Err(Error::size_mismatch(len, data.len()));
        }
        Ok(Self {
            rows,
            cols,
            buf: Buffer::copied(data)?,
        })
    }

    /// Borrow mode: aliases `data` without copying or taking ownership.
    ///
    /// Writes through the matrix are visible in `data` once the matrix is
    /// dropped.
    ///
    /// # Errors
    ///
    /// [`Error::SizeMismatch`] if `data.len() != rows * cols`.
    pub fn map(rows: usize, cols: usize, data: &'a mut [T]) -> Result<Self> {
        let len = checked_area(rows, cols)?;
        if data.len() != len {
            return Err(Error::size_mismatch(len, data.len()));
        }
        Ok(Self {
            rows,
            cols,
            buf: Buffer::borrowed(data),
        })
    }

    /// Adopts an existing allocation (ownership transfer, no copy).
    ///
    /// # Errors
    ///
    /// [`Error::SizeMismatch`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let len = checked_area(rows, cols)?;
        if data.len() != len {
            return Err(Error::size_mismatch(len, data.len()));
        }
        Ok(Self {
            rows,
            cols,
            buf: Buffer::adopt(data),
        })
    }

    /// Builds an Owned matrix from a nested row literal.
    ///
    /// ```rust
    /// use imp_core::Matrix;
    ///
    /// let m = Matrix::from_rows(&[[1u8, 2], [3, 4], [5, 6]]);
    /// assert_eq!((m.rows(), m.cols()), (3, 2));
    /// ```
    pub fn from_rows<const N: usize>(rows: &[[T; N]]) -> Self {
        Self {
            rows: rows.len(),
            cols: N,
            buf: Buffer::adopt(rows.as_flattened().to_vec()),
        }
    }

    /// Builds an `n x 1` column vector from a flat literal.
    pub fn from_column(values: &[T]) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            buf: Buffer::adopt(values.to_vec()),
        }
    }

    /// Builds a `1 x n` row vector from a flat literal.
    pub fn from_row(values: &[T]) -> Self {
        Self {
            rows: 1,
            cols: values.len(),
            buf: Buffer::adopt(values.to_vec()),
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape as `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of elements (`rows * cols`).
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if the matrix holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Size of the occupied elements in bytes.
    #[inline]
    pub fn mem_size(&self) -> usize {
        self.len() * std::mem::size_of::<T>()
    }

    /// Ownership mode of the underlying buffer.
    #[inline]
    pub fn mode(&self) -> StorageMode {
        self.buf.mode()
    }

    /// Returns `true` if the matrix owns its storage.
    #[inline]
    pub fn is_owned(&self) -> bool {
        self.buf.is_owned()
    }

    /// Elements the storage can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Storage identity; null for an empty matrix without storage.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Elements in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    /// Elements in row-major order, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buf.as_mut_slice()
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// Returns the element at `(row, col)`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        self.offset(row, col).map(|i| self.as_slice()[i])
    }

    /// Returns a mutable reference to the element at `(row, col)`.
    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        let i = self.offset(row, col)?;
        Some(&mut self.as_mut_slice()[i])
    }

    /// Sets the element at `(row, col)`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if the coordinates are outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let (rows, cols) = self.shape();
        let slot = self
            .get_mut(row, col)
            .ok_or_else(|| Error::out_of_bounds(row, col, rows, cols))?;
        *slot = value;
        Ok(())
    }

    /// Returns row `row` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`.
    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.rows, "row {row} out of bounds for {} rows", self.rows);
        let start = row * self.cols;
        &self.as_slice()[start..start + self.cols]
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.as_mut_slice().fill(value);
    }

    /// Move: returns this matrix's shape and storage (mode and identity
    /// unchanged) and leaves `self` as the empty 0x0 matrix.
    ///
    /// ```rust
    /// use imp_core::Matrix;
    ///
    /// let mut a = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6]]);
    /// let ptr = a.as_ptr();
    /// let b = a.take();
    /// assert_eq!(b.as_ptr(), ptr);
    /// assert_eq!(a.shape(), (0, 0));
    /// assert!(a.as_ptr().is_null());
    /// ```
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Write-through assignment from another matrix.
    ///
    /// An Owned target adopts the source shape and reuses or reallocates
    /// storage per [`StoragePlan`]. A Borrowed target accepts only an equal
    /// element count and is left unmodified otherwise.
    ///
    /// # Errors
    ///
    /// [`Error::SizeMismatch`] for a Borrowed target of a different length.
    pub fn assign(&mut self, src: &Matrix<'_, T>) -> Result<StoragePlan> {
        self.assign_flat(src.rows, src.cols, src.as_slice())
    }

    /// Literal assignment from a nested row literal.
    ///
    /// Same storage rules as [`assign`](Self::assign).
    ///
    /// ```rust
    /// use imp_core::{Matrix, StoragePlan};
    ///
    /// let mut m = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6]]);
    /// let ptr = m.as_ptr();
    /// let plan = m.assign_rows(&[[0, 0], [0, 0], [0, 0]]).unwrap();
    /// assert_eq!(plan, StoragePlan::Reuse);
    /// assert_eq!(m.as_ptr(), ptr);
    /// assert_eq!(m.shape(), (3, 2));
    /// ```
    pub fn assign_rows<const N: usize>(&mut self, rows: &[[T; N]]) -> Result<StoragePlan> {
        self.assign_flat(rows.len(), N, rows.as_flattened())
    }

    fn assign_flat(&mut self, rows: usize, cols: usize, data: &[T]) -> Result<StoragePlan> {
        let plan = self.buf.assign_from_slice(data)?;
        self.rows = rows;
        self.cols = cols;
        Ok(plan)
    }

    /// Shape plus storage whose length is already `rows * cols`.
    pub(crate) fn from_buffer(rows: usize, cols: usize, buf: Buffer<'a, T>) -> Self {
        debug_assert_eq!(buf.len(), rows * cols);
        Self { rows, cols, buf }
    }

    /// Detached Owned copy with a `'static` lifetime.
    pub fn to_owned_matrix(&self) -> Matrix<'static, T> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            buf: Buffer::adopt(self.as_slice().to_vec()),
        }
    }

    /// Compares shapes and elements within an absolute `tolerance`.
    ///
    /// Used where values went through quantization, e.g. a float matrix
    /// loaded back from an 8/16-bit pixel map.
    pub fn approx_eq(&self, other: &Matrix<'_, T>, tolerance: f64) -> bool {
        self.shape() == other.shape()
            && self
                .as_slice()
                .iter()
                .zip(other.as_slice())
                .all(|(a, b)| (a.to_f64() - b.to_f64()).abs() <= tolerance)
    }
}

impl<T: Scalar> Clone for Matrix<'_, T> {
    /// Always yields an Owned copy, decoupled from the source's mode.
    fn clone(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            buf: self.buf.clone(),
        }
    }

    /// Copy assignment through [`assign`](Matrix::assign): an Owned target
    /// reuses its storage per [`StoragePlan`], a Borrowed target writes
    /// into the memory it aliases and keeps its mode.
    ///
    /// # Panics
    ///
    /// Panics if a Borrowed target's length differs from the source's, or
    /// if allocation fails.
    fn clone_from(&mut self, source: &Self) {
        if let Err(e) = self.assign(source) {
            panic!("{e}");
        }
    }
}

impl<T: Scalar> PartialEq<Matrix<'_, T>> for Matrix<'_, T> {
    /// Equal iff shapes match and every element pair is
    /// [`Scalar::approx_eq`].
    fn eq(&self, other: &Matrix<'_, T>) -> bool {
        elements_eq(self.shape(), self.as_slice(), other.shape(), other.as_slice())
    }
}

pub(crate) fn elements_eq<T: Scalar>(
    a_shape: (usize, usize),
    a: &[T],
    b_shape: (usize, usize),
    b: &[T],
) -> bool {
    a_shape == b_shape && a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.approx_eq(*y))
}

impl<T: Scalar> Index<usize> for Matrix<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.as_slice()[i]
    }
}

impl<T: Scalar> IndexMut<usize> for Matrix<'_, T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.as_mut_slice()[i]
    }
}

impl<T: Scalar> Index<(usize, usize)> for Matrix<'_, T> {
    type Output = T;

    /// `(row, col)` access.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        match self.offset(row, col) {
            Some(i) => &self.as_slice()[i],
            None => panic!("({row}, {col}) out of bounds for {}x{}", self.rows, self.cols),
        }
    }
}

impl<T: Scalar> IndexMut<(usize, usize)> for Matrix<'_, T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        let (rows, cols) = self.shape();
        match self.offset(row, col) {
            Some(i) => &mut self.as_mut_slice()[i],
            None => panic!("({row}, {col}) out of bounds for {rows}x{cols}"),
        }
    }
}

impl<T: Scalar> From<Vec<T>> for Matrix<'_, T> {
    /// Adopts `data` as an `n x 1` column vector.
    fn from(data: Vec<T>) -> Self {
        Self {
            rows: data.len(),
            cols: 1,
            buf: Buffer::adopt(data),
        }
    }
}

impl<T: Scalar> fmt::Debug for Matrix<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("mode", &self.mode())
            .field("data", &self.as_slice())
            .finish()
    }
}

impl<T: Scalar> fmt::Display for Matrix<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let row = self.row(r);
            for (c, v) in row.iter().enumerate() {
                if c > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{v}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_shape() {
        let m: Matrix<u16> = Matrix::new(2, 3);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.len(), 6);
        assert_eq!(m.mem_size(), 12);
        assert!(m.is_owned());
    }

    #[test]
    fn test_default_is_empty() {
        let m: Matrix<f32> = Matrix::default();
        assert_eq!(m.shape(), (0, 0));
        assert!(m.is_empty());
        assert!(m.as_ptr().is_null());
    }

    #[test]
    fn test_try_new_overflow() {
        let err = Matrix::<u8>::try_new(usize::MAX, 3).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_from_slice_wrong_len() {
        let err = Matrix::from_slice(2, 2, &[1, 2, 3]).unwrap_err();
        assert_eq!(err, Error::size_mismatch(4, 3));
    }

    #[test]
    fn test_map_writes_through() {
        let mut raw = [0i32; 6];
        {
            let mut m = Matrix::map(2, 3, &mut raw).unwrap();
            m[(1, 2)] = 7;
            m[0] = 1;
        }
        assert_eq!(raw, [1, 0, 0, 0, 0, 7]);
    }

    #[test]
    fn test_get_and_set() {
        let mut m = Matrix::from_rows(&[[1, 2], [3, 4]]);
        assert_eq!(m.get(1, 0), Some(3));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 2), None);
        m.set(0, 1, 9).unwrap();
        assert_eq!(m.row(0), &[1, 9]);
        assert_eq!(m.set(5, 5, 0), Err(Error::out_of_bounds(5, 5, 2, 2)));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_index_col_out_of_range_panics() {
        let m = Matrix::from_rows(&[[1, 2], [3, 4]]);
        // (0, 2) would alias (1, 0) under flat arithmetic
        let _v = m[(0, 2)];
    }

    #[test]
    fn test_clone_from_borrowed_writes_through() {
        let mut raw = [1u8, 2, 3, 4];
        let ptr = raw.as_ptr();
        let src = Matrix::from_rows(&[[5u8, 6, 7, 8]]);
        {
            let mut dst = Matrix::map(2, 2, &mut raw).unwrap();
            dst.clone_from(&src);
            assert!(!dst.is_owned());
            assert_eq!(dst.as_ptr(), ptr);
            assert_eq!(dst, src);
        }
        assert_eq!(raw, [5, 6, 7, 8]);
    }

    #[test]
    #[should_panic(expected = "size mismatch")]
    fn test_clone_from_borrowed_rejects_other_lengths() {
        let mut raw = [1u8, 2, 3, 4];
        let mut dst = Matrix::map(2, 2, &mut raw).unwrap();
        dst.clone_from(&Matrix::from_rows(&[[5u8, 6]]));
    }

    #[test]
    fn test_clone_from_owned_reuses_storage() {
        let src = Matrix::from_rows(&[[1i64, 2, 3]]);
        let mut dst: Matrix<i64> = Matrix::zeros(2, 2);
        let ptr = dst.as_ptr();
        dst.clone_from(&src);
        assert_eq!(dst.as_ptr(), ptr);
        assert_eq!(dst.shape(), (1, 3));
        assert_eq!(dst, src);
    }

    #[test]
    fn test_display() {
        let m = Matrix::from_rows(&[[1, 2], [3, 4]]);
        assert_eq!(m.to_string(), "1 2\n3 4\n");
    }

    #[test]
    fn test_approx_eq_tolerance() {
        let a = Matrix::from_rows(&[[4.0f64, 8.0]]);
        let b = Matrix::from_rows(&[[4.0002f64, 7.9999]]);
        assert!(a != b);
        assert!(a.approx_eq(&b, 1e-3));
        assert!(!a.approx_eq(&b, 1e-5));
    }
}
