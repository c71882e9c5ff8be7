//! Channel planes of an [`RgbImage`](crate::RgbImage).
//!
//! An image stores its three channels as contiguous, equal-length blocks of
//! one buffer (`R` then `G` then `B`). A [`ChannelView`] is the descriptor
//! of one block (offset plus shape). It never owns or allocates memory.
//! Resolving a descriptor against the image buffer yields either
//! - a read-only [`Plane`], or
//! - a mutable, Borrowed [`Matrix`] (see `RgbImage::plane_mut`) whose
//!   whole-plane assignment only accepts the plane's element count.

use crate::buffer::Buffer;
use crate::matrix::{elements_eq, Matrix};
use crate::scalar::Scalar;
use std::fmt;
use std::ops::{Index, Range};

/// Color channel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red, the first plane.
    R,
    /// Green, the second plane.
    G,
    /// Blue, the third plane.
    B,
}

impl Channel {
    /// All channels in storage order.
    pub const ALL: [Channel; 3] = [Channel::R, Channel::G, Channel::B];

    /// Plane index in storage order (0, 1, 2).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Channel::R => 0,
            Channel::G => 1,
            Channel::B => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::R => "R",
            Channel::G => "G",
            Channel::B => "B",
        })
    }
}

/// Fixed-size window into an image buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelView {
    /// Channel this window covers.
    pub channel: Channel,
    /// First element of the window in the image buffer.
    pub offset: usize,
    /// Rows (image height).
    pub rows: usize,
    /// Columns (image width).
    pub cols: usize,
}

impl ChannelView {
    /// Descriptor for `channel` of a `rows x cols` image.
    #[inline]
    pub fn new(channel: Channel, rows: usize, cols: usize) -> Self {
        Self {
            channel,
            offset: channel.index() * rows * cols,
            rows,
            cols,
        }
    }

    /// Window length (`rows * cols`).
    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Returns `true` for a zero-area window.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element range in the image buffer.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len()
    }
}

/// Read-only channel plane resolved against its image buffer.
#[derive(Clone, Copy)]
pub struct Plane<'b, T: Scalar> {
    view: ChannelView,
    data: &'b [T],
}

impl<'b, T: Scalar> Plane<'b, T> {
    pub(crate) fn new(view: ChannelView, buffer: &'b [T]) -> Self {
        Self {
            view,
            data: &buffer[view.range()],
        }
    }

    /// The descriptor this plane was resolved from.
    #[inline]
    pub fn view(&self) -> ChannelView {
        self.view
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.view.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.view.cols
    }

    /// Shape as `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.view.rows, self.view.cols)
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the plane holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Planes never own their memory.
    #[inline]
    pub fn is_owned(&self) -> bool {
        false
    }

    /// Storage identity of the first element.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// Elements in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &'b [T] {
        self.data
    }

    /// Element at `(row, col)`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        (row < self.rows() && col < self.cols()).then(|| self.data[row * self.cols() + col])
    }

    /// Owned copy of this plane.
    pub fn to_matrix(&self) -> Matrix<'static, T> {
        Matrix::from_buffer(self.rows(), self.cols(), Buffer::adopt(self.data.to_vec()))
    }
}

impl<T: Scalar> Index<usize> for Plane<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T: Scalar> Index<(usize, usize)> for Plane<'_, T> {
    type Output = T;

    /// `(row, col)` access.
    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows() && col < self.cols(),
            "({row}, {col}) out of bounds for {}x{}",
            self.rows(),
            self.cols()
        );
        &self.data[row * self.cols() + col]
    }
}

impl<T: Scalar> PartialEq<Plane<'_, T>> for Plane<'_, T> {
    fn eq(&self, other: &Plane<'_, T>) -> bool {
        elements_eq(self.shape(), self.data, other.shape(), other.data)
    }
}

impl<T: Scalar> PartialEq<Matrix<'_, T>> for Plane<'_, T> {
    fn eq(&self, other: &Matrix<'_, T>) -> bool {
        elements_eq(self.shape(), self.data, other.shape(), other.as_slice())
    }
}

impl<T: Scalar> PartialEq<Plane<'_, T>> for Matrix<'_, T> {
    fn eq(&self, other: &Plane<'_, T>) -> bool {
        other == self
    }
}

impl<T: Scalar> fmt::Debug for Plane<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plane")
            .field("channel", &self.view.channel)
            .field("rows", &self.view.rows)
            .field("cols", &self.view.cols)
            .field("data", &self.data)
            .finish()
    }
}
