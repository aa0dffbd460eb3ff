//! # Buffer Module - *Immutable, reference counted byte regions*
//!
//! A [`Buffer`] is a handle onto a contiguous, 64-byte aligned memory region that
//! backs a validity bitmap, an offsets array, or values.
//!
//! ## Behaviour
//! - Cloning a handle retains the region; dropping it releases. The region is
//!   returned to the allocator that produced it exactly once, when the last handle
//!   is dropped.
//! - The handle is read-only. Memory is written through a
//!   [`MutableBuffer`](crate::MutableBuffer) and frozen with `into_buffer`.
//! - `len` is the logical byte length; `capacity` is the allocated size and is
//!   what gets returned to the allocator.
//!
//! Buffers are `Send + Sync`: the count is atomic and the bytes are never mutated
//! after freezing.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::ptr::NonNull;
use std::slice;
use std::sync::Arc;

use crate::structs::allocator::{Allocator, default_allocator};
use crate::structs::refcount::RefCount;
use crate::traits::type_unions::NativeType;

/// Shared header of one allocation.
struct Header {
    refs: RefCount,
    allocator: Arc<dyn Allocator>,
    ptr: NonNull<u8>,
    len: usize,
    capacity: usize,
}

/// # Buffer
///
/// Reference-counted, immutable byte region.
///
/// ## Example
/// ```rust
/// use nestarrow::Buffer;
///
/// let b = Buffer::from_slice(&[1i32, 2, 3]);
/// let c = b.clone();
/// assert_eq!(b.ref_count(), 2);
/// assert_eq!(c.typed_data::<i32>(), &[1, 2, 3]);
/// drop(c);
/// assert_eq!(b.ref_count(), 1);
/// ```
pub struct Buffer {
    header: NonNull<Header>,
}

// SAFETY: the header is only mutated through the atomic count and the bytes are
// immutable once a Buffer exists.
unsafe impl Send for Buffer {}
unsafe impl Sync for Buffer {}

impl Buffer {
    /// Takes ownership of an allocation of `capacity` bytes of which the first
    /// `len` are initialised.
    ///
    /// # Safety
    /// `ptr` must come from `allocator` with exactly `capacity` bytes, and must not
    /// be freed by anyone else.
    pub(crate) unsafe fn from_raw_parts(
        allocator: Arc<dyn Allocator>,
        ptr: NonNull<u8>,
        len: usize,
        capacity: usize,
    ) -> Self {
        debug_assert!(len <= capacity);
        let header = Box::new(Header {
            refs: RefCount::new(),
            allocator,
            ptr,
            len,
            capacity,
        });
        Buffer {
            header: NonNull::from(Box::leak(header)),
        }
    }

    /// Copies `values` into a new buffer from the default allocator.
    pub fn from_slice<T: NativeType>(values: &[T]) -> Self {
        Self::from_slice_in(default_allocator(), values)
    }

    /// Copies `values` into a new buffer from `allocator`.
    pub fn from_slice_in<T: NativeType>(allocator: Arc<dyn Allocator>, values: &[T]) -> Self {
        let bytes = size_of_val(values);
        let ptr = allocator.allocate(bytes);
        // SAFETY: freshly allocated region of `bytes` bytes, source is a valid slice
        unsafe {
            std::ptr::copy_nonoverlapping(values.as_ptr() as *const u8, ptr.as_ptr(), bytes);
            Self::from_raw_parts(allocator, ptr, bytes, bytes)
        }
    }

    /// Zero length buffer.
    pub fn empty() -> Self {
        Self::from_slice::<u8>(&[])
    }

    #[inline]
    fn header(&self) -> &Header {
        // SAFETY: header stays alive while any handle exists
        unsafe { self.header.as_ref() }
    }

    /// Logical byte length.
    #[inline]
    pub fn len(&self) -> usize {
        self.header().len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocated byte size.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.header().capacity
    }

    /// Number of live handles onto this region.
    #[inline]
    pub fn ref_count(&self) -> i64 {
        self.header().refs.load()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.header().ptr.as_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        let h = self.header();
        // SAFETY: the first `len` bytes are initialised and immutable
        unsafe { slice::from_raw_parts(h.ptr.as_ptr(), h.len) }
    }

    /// Reinterprets the bytes as a slice of `T`. Trailing bytes that do not fill
    /// a whole `T` are ignored.
    #[inline]
    pub fn typed_data<T: NativeType>(&self) -> &[T] {
        let h = self.header();
        let n = h.len / size_of::<T>();
        // SAFETY: allocations are 64-byte aligned and NativeType is plain old data
        unsafe { slice::from_raw_parts(h.ptr.as_ptr() as *const T, n) }
    }

    /// True when both handles share one allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        self.header == other.header
    }
}

impl Clone for Buffer {
    fn clone(&self) -> Self {
        self.header().refs.retain();
        Buffer {
            header: self.header,
        }
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        if self.header().refs.release() {
            // SAFETY: this was the last handle; the header was leaked from a Box
            let header = unsafe { Box::from_raw(self.header.as_ptr()) };
            unsafe { header.allocator.free(header.ptr, header.capacity) };
        }
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Debug for Buffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Buffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("refs", &self.ref_count())
            .finish()
    }
}
