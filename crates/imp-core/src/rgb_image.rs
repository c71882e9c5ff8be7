//! Planar three-channel image.
//!
//! [`RgbImage`] stores `width * height` samples per channel in one buffer,
//! laid out as three contiguous planes: `R` at offset 0, `G` at
//! `plane_size`, `B` at `2 * plane_size`. Channel access goes through
//! [`ChannelView`] descriptors, so every plane always aliases the image's
//! own buffer.
//!
//! ```rust
//! use imp_core::{Channel, RgbImage};
//!
//! let mut img = RgbImage::<u8>::zeros(3, 2);
//! img.g_plane_mut().fill(7);
//! img[(1, 2, Channel::B)] = 9;
//!
//! assert_eq!(img.color_at(0, 0, Channel::G), 7);
//! assert_eq!(img.pixel(1, 2), [0, 7, 9]);
//! assert_eq!(img.b_plane()[5], 9);
//! ```
//!
//! Rows are image rows (`height`), columns are image columns (`width`);
//! two-coordinate access is `(row, col)` as for [`Matrix`].

use crate::buffer::{Buffer, StorageMode, StoragePlan};
use crate::error::{checked_area, Error, Result};
use crate::matrix::{elements_eq, Matrix};
use crate::plane::{Channel, ChannelView, Plane};
use crate::scalar::Scalar;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Number of channel planes.
pub const CHANNELS: usize = 3;

/// Planar RGB image over a single [`Buffer`].
pub struct RgbImage<'a, T: Scalar> {
    width: usize,
    height: usize,
    buf: Buffer<'a, T>,
}

impl<T: Scalar> Default for RgbImage<'_, T> {
    /// Empty 0x0 image with no storage.
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            buf: Buffer::default(),
        }
    }
}

fn image_len(width: usize, height: usize) -> Result<usize> {
    checked_area(height, width)?
        .checked_mul(CHANNELS)
        .ok_or_else(|| Error::invalid_dimensions(height, width, "size overflow"))
}

fn check_len(width: usize, height: usize, got: usize) -> Result<usize> {
    let len = image_len(width, height)?;
    if got != len {
        return Err(Error::size_mismatch(len, got));
    }
    Ok(len)
}

impl<'a, T: Scalar> RgbImage<'a, T> {
    /// Creates a `width x height` Owned image.
    ///
    /// Contents are implementation-defined.
    ///
    /// # Panics
    ///
    /// Panics if the size overflows or allocation fails.
    pub fn new(width: usize, height: usize) -> Self {
        match Self::try_new(width, height) {
            Ok(img) => img,
            Err(e) => panic!("cannot create {width}x{height} image: {e}"),
        }
    }

    /// Fallible [`new`](Self::new).
    pub fn try_new(width: usize, height: usize) -> Result<Self> {
        let len = image_len(width, height)?;
        Ok(Self {
            width,
            height,
            buf: Buffer::owned(len)?,
        })
    }

    /// Creates a `width x height` Owned image filled with zeros.
    ///
    /// # Panics
    ///
    /// Panics if the size overflows or allocation fails.
    pub fn zeros(width: usize, height: usize) -> Self {
        let buf = image_len(width, height)
            .and_then(Buffer::zeroed)
            .unwrap_or_else(|e| panic!("cannot create {width}x{height} image: {e}"));
        Self { width, height, buf }
    }

    /// Copy mode: allocates an Owned image from planar `data` (`R`, `G`,
    /// `B` planes back to back).
    ///
    /// # Errors
    ///
    /// [`Error::SizeMismatch`] if `data.len() != 3 * width * height`.
    pub fn from_slice(width: usize, height: usize, data: &[T]) -> Result<Self> {
        check_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            buf: Buffer::copied(data)?,
        })
    }

    /// Borrow mode: uses caller memory as the planar triple buffer.
    ///
    /// # Errors
    ///
    /// [`Error::SizeMismatch`] if `data.len() != 3 * width * height`.
    pub fn map(width: usize, height: usize, data: &'a mut [T]) -> Result<Self> {
        check_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            buf: Buffer::borrowed(data),
        })
    }

    /// Adopts a planar allocation without copying.
    ///
    /// # Errors
    ///
    /// [`Error::SizeMismatch`] if `data.len() != 3 * width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        check_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            buf: Buffer::adopt(data),
        })
    }

    /// Builds an Owned image from three nested plane literals.
    ///
    /// ```rust
    /// use imp_core::RgbImage;
    ///
    /// let img = RgbImage::from_planes(&[
    ///     [[1u8, 2, 3], [4, 5, 6]],
    ///     [[0, 0, 0], [0, 0, 0]],
    ///     [[9, 9, 9], [9, 9, 9]],
    /// ]);
    /// assert_eq!((img.width(), img.height()), (3, 2));
    /// assert_eq!(img.r_plane()[(1, 0)], 4);
    /// ```
    pub fn from_planes<const W: usize, const H: usize>(planes: &[[[T; W]; H]; CHANNELS]) -> Self {
        Self {
            width: W,
            height: H,
            buf: Buffer::adopt(planes.as_flattened().as_flattened().to_vec()),
        }
    }

    /// Builds an Owned image by stacking three equally shaped matrices.
    ///
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`] if `g` or `b` differ in shape from `r`.
    pub fn from_matrices(r: &Matrix<'_, T>, g: &Matrix<'_, T>, b: &Matrix<'_, T>) -> Result<Self> {
        for other in [g, b] {
            if other.shape() != r.shape() {
                return Err(Error::shape_mismatch(r.shape(), other.shape()));
            }
        }
        let (height, width) = r.shape();
        let mut data = Vec::new();
        data.try_reserve_exact(3 * r.len())
            .map_err(|e| Error::allocation_failed(3 * r.len(), e.to_string()))?;
        for m in [r, g, b] {
            data.extend_from_slice(m.as_slice());
        }
        Ok(Self {
            width,
            height,
            buf: Buffer::adopt(data),
        })
    }

    /// Image width (columns).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height (rows).
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples per plane (`width * height`).
    #[inline]
    pub fn plane_size(&self) -> usize {
        self.width * self.height
    }

    /// Samples in all three planes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` for a zero-area image.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Size of the sample data in bytes.
    #[inline]
    pub fn mem_size(&self) -> usize {
        self.len() * std::mem::size_of::<T>()
    }

    /// Ownership mode of the triple buffer.
    #[inline]
    pub fn mode(&self) -> StorageMode {
        self.buf.mode()
    }

    /// Returns `true` if the image owns its buffer.
    #[inline]
    pub fn is_owned(&self) -> bool {
        self.buf.is_owned()
    }

    /// Storage identity; null for an empty image without storage.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// All samples, planar.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    /// All samples, planar, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buf.as_mut_slice()
    }

    /// Descriptors of the `R`, `G` and `B` planes.
    pub fn views(&self) -> [ChannelView; CHANNELS] {
        Channel::ALL.map(|c| self.view(c))
    }

    #[inline]
    fn view(&self, channel: Channel) -> ChannelView {
        ChannelView::new(channel, self.height, self.width)
    }

    /// Read-only plane of `channel`.
    pub fn plane(&self, channel: Channel) -> Plane<'_, T> {
        Plane::new(self.view(channel), self.as_slice())
    }

    /// Red plane.
    #[inline]
    pub fn r_plane(&self) -> Plane<'_, T> {
        self.plane(Channel::R)
    }

    /// Green plane.
    #[inline]
    pub fn g_plane(&self) -> Plane<'_, T> {
        self.plane(Channel::G)
    }

    /// Blue plane.
    #[inline]
    pub fn b_plane(&self) -> Plane<'_, T> {
        self.plane(Channel::B)
    }

    /// Mutable plane of `channel` as a Borrowed matrix.
    ///
    /// Element writes land in the image. Whole-plane assignment through
    /// [`Matrix::assign`] or [`Matrix::assign_rows`] only accepts exactly
    /// `plane_size` elements and leaves the plane untouched otherwise.
    ///
    /// ```rust
    /// use imp_core::RgbImage;
    ///
    /// let mut img = RgbImage::<i32>::zeros(2, 2);
    /// assert!(img.r_plane_mut().assign_rows(&[[1, 2, 3]]).is_err());
    /// img.r_plane_mut().assign_rows(&[[1, 2], [3, 4]]).unwrap();
    /// assert_eq!(img.as_slice()[..4], [1, 2, 3, 4]);
    /// ```
    pub fn plane_mut(&mut self, channel: Channel) -> Matrix<'_, T> {
        let view = self.view(channel);
        let data = &mut self.as_mut_slice()[view.range()];
        Matrix::from_buffer(view.rows, view.cols, Buffer::borrowed(data))
    }

    /// Mutable red plane.
    #[inline]
    pub fn r_plane_mut(&mut self) -> Matrix<'_, T> {
        self.plane_mut(Channel::R)
    }

    /// Mutable green plane.
    #[inline]
    pub fn g_plane_mut(&mut self) -> Matrix<'_, T> {
        self.plane_mut(Channel::G)
    }

    /// Mutable blue plane.
    #[inline]
    pub fn b_plane_mut(&mut self) -> Matrix<'_, T> {
        self.plane_mut(Channel::B)
    }

    /// All three planes mutably at once.
    pub fn planes_mut(&mut self) -> [Matrix<'_, T>; CHANNELS] {
        let (rows, cols) = (self.height, self.width);
        let n = self.plane_size();
        let (r, rest) = self.buf.as_mut_slice().split_at_mut(n);
        let (g, b) = rest.split_at_mut(n);
        [r, g, b].map(|s| Matrix::from_buffer(rows, cols, Buffer::borrowed(s)))
    }

    /// Sample `i` (row-major within the plane) of `channel`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= plane_size`.
    #[inline]
    pub fn color(&self, i: usize, channel: Channel) -> T {
        *self.color_ref(i, channel)
    }

    /// Sample at `(row, col)` of `channel`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn color_at(&self, row: usize, col: usize, channel: Channel) -> T {
        self[(row, col, channel)]
    }

    /// Mutable sample `i` of `channel`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= plane_size`.
    #[inline]
    pub fn color_mut(&mut self, i: usize, channel: Channel) -> &mut T {
        let at = self.flat_offset(i, channel);
        &mut self.as_mut_slice()[at]
    }

    /// Mutable sample at `(row, col)` of `channel`.
    #[inline]
    pub fn color_at_mut(&mut self, row: usize, col: usize, channel: Channel) -> &mut T {
        &mut self[(row, col, channel)]
    }

    /// `[r, g, b]` at `(row, col)`.
    pub fn pixel(&self, row: usize, col: usize) -> [T; CHANNELS] {
        Channel::ALL.map(|c| self.color_at(row, col, c))
    }

    /// Writes `[r, g, b]` at `(row, col)`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if the coordinates are outside the image.
    pub fn set_pixel(&mut self, row: usize, col: usize, rgb: [T; CHANNELS]) -> Result<()> {
        if row >= self.height || col >= self.width {
            return Err(Error::out_of_bounds(row, col, self.height, self.width));
        }
        let i = row * self.width + col;
        let n = self.plane_size();
        let data = self.as_mut_slice();
        for (c, v) in rgb.into_iter().enumerate() {
            data[c * n + i] = v;
        }
        Ok(())
    }

    #[inline]
    fn flat_offset(&self, i: usize, channel: Channel) -> usize {
        let n = self.plane_size();
        assert!(i < n, "sample {i} out of bounds for plane of {n}");
        channel.index() * n + i
    }

    #[inline]
    fn color_ref(&self, i: usize, channel: Channel) -> &T {
        &self.as_slice()[self.flat_offset(i, channel)]
    }

    #[inline]
    fn coord_offset(&self, row: usize, col: usize, channel: Channel) -> usize {
        assert!(
            row < self.height && col < self.width,
            "({row}, {col}) out of bounds for {}x{} image",
            self.height,
            self.width
        );
        channel.index() * self.plane_size() + row * self.width + col
    }

    /// Move: returns the image (mode and storage identity unchanged) and
    /// leaves `self` at 0x0 with no storage.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Write-through assignment from another image.
    ///
    /// An Owned target adopts the source dimensions and reuses or
    /// reallocates its buffer per [`StoragePlan`]. A Borrowed target only
    /// accepts a source with the same sample count.
    pub fn assign(&mut self, src: &RgbImage<'_, T>) -> Result<StoragePlan> {
        let plan = self.buf.assign_from_slice(src.as_slice())?;
        self.width = src.width;
        self.height = src.height;
        Ok(plan)
    }

    /// Detached Owned copy with a `'static` lifetime.
    pub fn to_owned_image(&self) -> RgbImage<'static, T> {
        RgbImage {
            width: self.width,
            height: self.height,
            buf: Buffer::adopt(self.as_slice().to_vec()),
        }
    }

    /// Compares dimensions and samples within an absolute `tolerance`.
    pub fn approx_eq(&self, other: &RgbImage<'_, T>, tolerance: f64) -> bool {
        (self.width, self.height) == (other.width, other.height)
            && self
                .as_slice()
                .iter()
                .zip(other.as_slice())
                .all(|(a, b)| (a.to_f64() - b.to_f64()).abs() <= tolerance)
    }
}

impl<T: Scalar> Clone for RgbImage<'_, T> {
    /// Fresh Owned triple buffer; copy assignment through `clone_from`
    /// allocates one as well.
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            buf: self.buf.clone(),
        }
    }
}

impl<T: Scalar> PartialEq<RgbImage<'_, T>> for RgbImage<'_, T> {
    fn eq(&self, other: &RgbImage<'_, T>) -> bool {
        elements_eq(
            (self.height, self.width),
            self.as_slice(),
            (other.height, other.width),
            other.as_slice(),
        )
    }
}

impl<T: Scalar> Index<usize> for RgbImage<'_, T> {
    type Output = T;

    /// Flat access over the planar triple buffer.
    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.as_slice()[i]
    }
}

impl<T: Scalar> IndexMut<usize> for RgbImage<'_, T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.as_mut_slice()[i]
    }
}

impl<T: Scalar> Index<(usize, usize, Channel)> for RgbImage<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col, channel): (usize, usize, Channel)) -> &T {
        &self.as_slice()[self.coord_offset(row, col, channel)]
    }
}

impl<T: Scalar> IndexMut<(usize, usize, Channel)> for RgbImage<'_, T> {
    #[inline]
    fn index_mut(&mut self, (row, col, channel): (usize, usize, Channel)) -> &mut T {
        let at = self.coord_offset(row, col, channel);
        &mut self.as_mut_slice()[at]
    }
}

impl<T: Scalar> fmt::Debug for RgbImage<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RgbImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("mode", &self.mode())
            .finish()
    }
}
