//! Contiguous element storage with an explicit ownership mode.
//!
//! A [`Buffer`] is either:
//! - **Owned** - backed by a `Vec<T>` this buffer allocated or adopted, freed
//!   when the buffer is dropped
//! - **Borrowed** - a non-owning alias into caller memory (`&'a mut [T]`);
//!   the lifetime `'a` ties the buffer to the caller's slice
//!
//! # Ownership contract
//!
//! | Operation | Result mode | Copies? | Source after |
//! |-----------|-------------|---------|--------------|
//! | [`Buffer::owned`] / [`Buffer::zeroed`] | Owned | - | - |
//! | [`Buffer::borrowed`] | Borrowed | no | aliased |
//! | [`Buffer::copied`] | Owned | yes | untouched |
//! | [`Buffer::adopt`] | Owned | no | consumed |
//! | [`Clone::clone`] | Owned | yes | untouched |
//! | [`Buffer::take`] | source's mode | no | empty |
//!
//! # Reuse vs. reallocation
//!
//! When an Owned buffer receives content of a different length,
//! [`StoragePlan::decide`] chooses between reusing the allocation and
//! reallocating. Borrowed buffers never reallocate; they only accept content
//! of their exact length.

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use std::fmt;

/// Threshold multiplier for shrinking assignments.
///
/// An Owned buffer whose allocation exceeds `SHRINK_SCALE * new_len`
/// elements is reallocated to exactly `new_len`.
pub const SHRINK_SCALE: usize = 2;

/// Storage ownership mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageMode {
    /// Allocated (or adopted) by the holder, freed on drop.
    Owned,
    /// Aliases memory owned elsewhere; never allocated or freed here.
    Borrowed,
}

/// Decision taken when an Owned buffer is given a new element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoragePlan {
    /// Keep the current allocation; only the occupied length changes.
    Reuse,
    /// Allocate exactly the new element count.
    Reallocate,
}

impl StoragePlan {
    /// Chooses between reuse and reallocation.
    ///
    /// Growing always reallocates. Shrinking reuses the allocation unless
    /// `capacity > shrink_scale * new_len`.
    ///
    /// ```
    /// use imp_core::StoragePlan;
    ///
    /// assert_eq!(StoragePlan::decide(6, 6, 2), StoragePlan::Reuse);
    /// assert_eq!(StoragePlan::decide(6, 4, 2), StoragePlan::Reuse);
    /// assert_eq!(StoragePlan::decide(6, 2, 2), StoragePlan::Reallocate);
    /// assert_eq!(StoragePlan::decide(6, 7, 2), StoragePlan::Reallocate);
    /// ```
    #[inline]
    pub fn decide(capacity: usize, new_len: usize, shrink_scale: usize) -> Self {
        if new_len > capacity {
            return Self::Reallocate;
        }
        match shrink_scale.checked_mul(new_len) {
            Some(limit) if capacity > limit => Self::Reallocate,
            _ => Self::Reuse,
        }
    }
}

enum Storage<'a, T> {
    Owned(Vec<T>),
    Borrowed(&'a mut [T]),
}

/// Contiguous storage of one element type, tagged Owned or Borrowed.
///
/// The occupied length may be smaller than the allocation of an Owned
/// buffer (see [`StoragePlan`]); a Borrowed buffer always spans its whole
/// slice.
pub struct Buffer<'a, T> {
    storage: Storage<'a, T>,
    len: usize,
}

impl<T> Default for Buffer<'_, T> {
    /// The canonical empty state: Owned, zero length, no allocation.
    fn default() -> Self {
        Self {
            storage: Storage::Owned(Vec::new()),
            len: 0,
        }
    }
}

impl<'a, T: Scalar> Buffer<'a, T> {
    /// Allocates an Owned buffer of `n` elements.
    ///
    /// Contents are implementation-defined; use [`zeroed`](Self::zeroed)
    /// when zero-fill is required.
    pub fn owned(n: usize) -> Result<Self> {
        Ok(Self {
            storage: Storage::Owned(allocate(n)?),
            len: n,
        })
    }

    /// Allocates an Owned buffer of `n` zero elements.
    pub fn zeroed(n: usize) -> Result<Self> {
        Self::owned(n)
    }

    /// Aliases caller memory without copying or taking ownership.
    pub fn borrowed(data: &'a mut [T]) -> Self {
        let len = data.len();
        Self {
            storage: Storage::Borrowed(data),
            len,
        }
    }

    /// Allocates an Owned buffer and copies `data` into it.
    pub fn copied(data: &[T]) -> Result<Self> {
        let mut vec = Vec::new();
        vec.try_reserve_exact(data.len())
            .map_err(|e| Error::allocation_failed(data.len(), e.to_string()))?;
        vec.extend_from_slice(data);
        Ok(Self {
            len: vec.len(),
            storage: Storage::Owned(vec),
        })
    }

    /// Takes ownership of an existing allocation without copying.
    pub fn adopt(data: Vec<T>) -> Self {
        Self {
            len: data.len(),
            storage: Storage::Owned(data),
        }
    }

    /// Moves the storage out, leaving the canonical empty state behind.
    ///
    /// The returned buffer keeps the source's mode and storage identity.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Returns the ownership mode.
    #[inline]
    pub fn mode(&self) -> StorageMode {
        match self.storage {
            Storage::Owned(_) => StorageMode::Owned,
            Storage::Borrowed(_) => StorageMode::Borrowed,
        }
    }

    /// Returns `true` if this buffer frees its storage on drop.
    #[inline]
    pub fn is_owned(&self) -> bool {
        self.mode() == StorageMode::Owned
    }

    /// Number of occupied elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no elements are occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the storage can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Owned(v) => v.len(),
            Storage::Borrowed(s) => s.len(),
        }
    }

    /// Storage identity: address of the first element, or null when no
    /// storage is referenced.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        if self.capacity() == 0 {
            return std::ptr::null();
        }
        match &self.storage {
            Storage::Owned(v) => v.as_ptr(),
            Storage::Borrowed(s) => s.as_ptr(),
        }
    }

    /// Occupied elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        match &self.storage {
            Storage::Owned(v) => &v[..self.len],
            Storage::Borrowed(s) => &s[..self.len],
        }
    }

    /// Occupied elements, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        match &mut self.storage {
            Storage::Owned(v) => &mut v[..len],
            Storage::Borrowed(s) => &mut s[..len],
        }
    }

    /// Prepares the buffer to hold `new_len` elements.
    ///
    /// Owned buffers follow [`StoragePlan::decide`] with [`SHRINK_SCALE`];
    /// after a reallocation the contents are implementation-defined.
    /// Borrowed buffers accept only their current length.
    ///
    /// Returns the plan that was applied.
    pub fn resize_for(&mut self, new_len: usize) -> Result<StoragePlan> {
        match &mut self.storage {
            Storage::Borrowed(s) => {
                if new_len != s.len() {
                    return Err(Error::size_mismatch(s.len(), new_len));
                }
                Ok(StoragePlan::Reuse)
            }
            Storage::Owned(v) => {
                let plan = StoragePlan::decide(v.len(), new_len, SHRINK_SCALE);
                if plan == StoragePlan::Reallocate {
                    tracing::trace!(
                        capacity = v.len(),
                        new_len,
                        "reallocating owned buffer"
                    );
                    *v = allocate(new_len)?;
                }
                self.len = new_len;
                Ok(plan)
            }
        }
    }

    /// Replaces the contents with a copy of `data`.
    ///
    /// Storage is prepared with [`resize_for`](Self::resize_for); a Borrowed
    /// buffer of a different length is left unmodified.
    pub fn assign_from_slice(&mut self, data: &[T]) -> Result<StoragePlan> {
        let plan = self.resize_for(data.len())?;
        self.as_mut_slice().copy_from_slice(data);
        Ok(plan)
    }
}

impl<T: Scalar> Clone for Buffer<'_, T> {
    /// Always produces an Owned buffer, regardless of the source's mode.
    fn clone(&self) -> Self {
        Self {
            storage: Storage::Owned(self.as_slice().to_vec()),
            len: self.len,
        }
    }
}

impl<T: Scalar> From<Vec<T>> for Buffer<'_, T> {
    fn from(data: Vec<T>) -> Self {
        Self::adopt(data)
    }
}

impl<T: Scalar> From<Box<[T]>> for Buffer<'_, T> {
    fn from(data: Box<[T]>) -> Self {
        Self::adopt(data.into_vec())
    }
}

impl<T: Scalar> fmt::Debug for Buffer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("mode", &self.mode())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

fn allocate<T: Scalar>(n: usize) -> Result<Vec<T>> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(n)
        .map_err(|e| Error::allocation_failed(n, e.to_string()))?;
    vec.resize(n, T::zero());
    Ok(vec)
}
