//! Element types for matrices and images.
//!
//! [`Scalar`] is implemented for every fixed-width integer, `f32`, `f64`
//! and half-precision [`half::f16`].
//!
//! # Numeric semantics
//!
//! Arithmetic and comparison are spelled out per type instead of relying on
//! the defaults of the `+`/`==` operators:
//!
//! | Operation | Integers | Floats |
//! |-----------|----------|--------|
//! | [`wrapping_add`](Scalar::wrapping_add) | two's-complement wrap | IEEE add |
//! | [`wrapping_sub`](Scalar::wrapping_sub) | two's-complement wrap | IEEE sub |
//! | [`approx_eq`](Scalar::approx_eq) | exact | `\|a - b\| <= EPSILON` |
//! | [`from_f64`](Scalar::from_f64) | round half away, saturate | cast |
//!
//! ```
//! use imp_core::Scalar;
//!
//! assert_eq!(255u8.wrapping_add(2), 1);
//! assert_eq!(i8::MIN.wrapping_sub(1), i8::MAX);
//! assert!(Scalar::approx_eq(1.0f32, 1.0 + f32::EPSILON / 2.0));
//! assert_eq!(<u8 as Scalar>::from_f64(42.5), 43);
//! assert_eq!(<u8 as Scalar>::from_f64(300.0), 255);
//! ```

use half::f16;
use std::fmt;

/// Trait for matrix and image element types.
pub trait Scalar: Copy + Default + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Whether this is a floating-point type.
    const IS_FLOAT: bool;

    /// Zero value.
    fn zero() -> Self;

    /// Addition with two's-complement wraparound for integers.
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Subtraction with two's-complement wraparound for integers.
    fn wrapping_sub(self, rhs: Self) -> Self;

    /// Equality used by containers: exact for integers, within one machine
    /// epsilon (absolute) for floats.
    fn approx_eq(self, other: Self) -> bool;

    /// Widens to `f64`.
    fn to_f64(self) -> f64;

    /// Narrows from `f64`.
    ///
    /// Integers round half away from zero and saturate at their range
    /// (NaN maps to zero).
    fn from_f64(v: f64) -> Self;
}

macro_rules! impl_scalar_int {
    ($($t:ty),* $(,)?) => {$(
        impl Scalar for $t {
            const IS_FLOAT: bool = false;

            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$t>::wrapping_add(self, rhs)
            }

            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$t>::wrapping_sub(self, rhs)
            }

            #[inline]
            fn approx_eq(self, other: Self) -> bool {
                self == other
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                // `as` saturates float -> int casts
                v.round() as $t
            }
        }
    )*};
}

impl_scalar_int!(u8, i8, u16, i16, u32, i32, u64, i64);

macro_rules! impl_scalar_float {
    ($($t:ty),* $(,)?) => {$(
        impl Scalar for $t {
            const IS_FLOAT: bool = true;

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn approx_eq(self, other: Self) -> bool {
                self == other || (self - other).abs() <= <$t>::EPSILON
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }
        }
    )*};
}

impl_scalar_float!(f32, f64);

impl Scalar for f16 {
    const IS_FLOAT: bool = true;

    #[inline]
    fn zero() -> Self {
        f16::ZERO
    }

    #[inline]
    fn wrapping_add(self, rhs: Self) -> Self {
        f16::from_f32(self.to_f32() + rhs.to_f32())
    }

    #[inline]
    fn wrapping_sub(self, rhs: Self) -> Self {
        f16::from_f32(self.to_f32() - rhs.to_f32())
    }

    #[inline]
    fn approx_eq(self, other: Self) -> bool {
        self == other || (self.to_f32() - other.to_f32()).abs() <= f16::EPSILON.to_f32()
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self.to_f64()
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        f16::from_f64(v)
    }
}
