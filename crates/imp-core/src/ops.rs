//! Elementwise arithmetic for [`Matrix`].
//!
//! Both operands must share `rows` and `cols`. The `checked_*` methods
//! report [`Error::ShapeMismatch`] and leave both operands untouched; the
//! operator impls panic instead.
//!
//! Integer elements wrap (two's complement), see [`Scalar::wrapping_add`]:
//!
//! ```rust
//! use imp_core::Matrix;
//!
//! let a = Matrix::from_column(&[255u8, 255]);
//! let b = Matrix::from_column(&[2u8, 2]);
//! assert_eq!(&a + &b, Matrix::from_column(&[1u8, 1]));
//! ```

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::scalar::Scalar;
use std::ops::{Add, AddAssign, Sub, SubAssign};

impl<T: Scalar> Matrix<'_, T> {
    fn zip_assign(&mut self, rhs: &Matrix<'_, T>, op: impl Fn(T, T) -> T) -> Result<()> {
        if self.shape() != rhs.shape() {
            return Err(Error::shape_mismatch(self.shape(), rhs.shape()));
        }
        for (a, &b) in self.as_mut_slice().iter_mut().zip(rhs.as_slice()) {
            *a = op(*a, b);
        }
        Ok(())
    }

    /// In-place elementwise sum.
    ///
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`] if the shapes differ; `self` is unmodified.
    pub fn checked_add_assign(&mut self, rhs: &Matrix<'_, T>) -> Result<()> {
        self.zip_assign(rhs, T::wrapping_add)
    }

    /// In-place elementwise difference.
    ///
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`] if the shapes differ; `self` is unmodified.
    pub fn checked_sub_assign(&mut self, rhs: &Matrix<'_, T>) -> Result<()> {
        self.zip_assign(rhs, T::wrapping_sub)
    }

    /// Elementwise sum into a new Owned matrix.
    pub fn checked_add(&self, rhs: &Matrix<'_, T>) -> Result<Matrix<'static, T>> {
        let mut out = self.to_owned_matrix();
        out.checked_add_assign(rhs)?;
        Ok(out)
    }

    /// Elementwise difference into a new Owned matrix.
    pub fn checked_sub(&self, rhs: &Matrix<'_, T>) -> Result<Matrix<'static, T>> {
        let mut out = self.to_owned_matrix();
        out.checked_sub_assign(rhs)?;
        Ok(out)
    }
}

impl<T: Scalar> AddAssign<&Matrix<'_, T>> for Matrix<'_, T> {
    /// # Panics
    ///
    /// Panics on shape mismatch.
    fn add_assign(&mut self, rhs: &Matrix<'_, T>) {
        if let Err(e) = self.checked_add_assign(rhs) {
            panic!("{e}");
        }
    }
}

impl<T: Scalar> SubAssign<&Matrix<'_, T>> for Matrix<'_, T> {
    /// # Panics
    ///
    /// Panics on shape mismatch.
    fn sub_assign(&mut self, rhs: &Matrix<'_, T>) {
        if let Err(e) = self.checked_sub_assign(rhs) {
            panic!("{e}");
        }
    }
}

impl<T: Scalar> Add<&Matrix<'_, T>> for &Matrix<'_, T> {
    type Output = Matrix<'static, T>;

    /// # Panics
    ///
    /// Panics on shape mismatch.
    fn add(self, rhs: &Matrix<'_, T>) -> Self::Output {
        match self.checked_add(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Scalar> Sub<&Matrix<'_, T>> for &Matrix<'_, T> {
    type Output = Matrix<'static, T>;

    /// # Panics
    ///
    /// Panics on shape mismatch.
    fn sub(self, rhs: &Matrix<'_, T>) -> Self::Output {
        match self.checked_sub(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }
}
