//! # imp-core
//!
//! Numeric containers with explicit ownership for the imp image toolkit.
//!
//! - [`Buffer`] - Element storage that is either Owned or Borrowed
//! - [`Matrix`] - Row-major 2-D grid over a [`Buffer`]
//! - [`RgbImage`] - Planar three-channel image with [`Plane`] views
//! - [`Scalar`] - Element types (all integer widths, `f16`, `f32`, `f64`)
//! - [`StoragePlan`] - Reuse/reallocate decision for shrinking assignments
//!
//! ## Ownership Model
//!
//! Every container records whether it owns its memory. Borrowed storage
//! carries the lifetime of the caller's slice, so a view can never
//! outlive the memory it aliases:
//!
//! ```rust
//! use imp_core::Matrix;
//!
//! let mut raw = vec![1u16, 2, 3, 4];
//! {
//!     let mut m = Matrix::map(2, 2, &mut raw).unwrap();
//!     m[(1, 1)] = 40;
//! }
//! assert_eq!(raw, [1, 2, 3, 40]);
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//! imp-core (this crate)
//!    ^
//!    |
//!    +-- imp-io (PGM/PPM codec)
//!    +-- imp-bench
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod plane;
pub mod rgb_image;
pub mod scalar;

pub use buffer::{Buffer, StorageMode, StoragePlan, SHRINK_SCALE};
pub use error::{Error, Result};
pub use matrix::Matrix;
pub use plane::{Channel, ChannelView, Plane};
pub use rgb_image::{RgbImage, CHANNELS};
pub use scalar::Scalar;

/// Prelude module for convenient imports.
///
/// ```
/// use imp_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{StorageMode, StoragePlan};
    pub use crate::error::{Error, Result};
    pub use crate::matrix::Matrix;
    pub use crate::plane::{Channel, Plane};
    pub use crate::rgb_image::RgbImage;
    pub use crate::scalar::Scalar;
}
