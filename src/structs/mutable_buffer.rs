//! # MutableBuffer Module
//!
//! Growable, exclusively owned byte region used by builders. Capacity is always a
//! multiple of 64 bytes; growth at least doubles so that appends amortise.
//! [`MutableBuffer::into_buffer`] freezes the region into a shared
//! [`Buffer`] without copying.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::ptr::NonNull;
use std::slice;
use std::sync::Arc;

use crate::structs::allocator::{ALIGNMENT, Allocator, default_allocator};
use crate::structs::buffer::Buffer;
use crate::traits::type_unions::NativeType;

#[inline]
fn round_up(n: usize) -> usize {
    n.div_ceil(ALIGNMENT) * ALIGNMENT
}

pub struct MutableBuffer {
    allocator: Arc<dyn Allocator>,
    ptr: NonNull<u8>,
    len: usize,
    capacity: usize,
}

// SAFETY: exclusively owned region
unsafe impl Send for MutableBuffer {}
unsafe impl Sync for MutableBuffer {}

impl MutableBuffer {
    pub fn new() -> Self {
        Self::new_in(default_allocator())
    }

    pub fn new_in(allocator: Arc<dyn Allocator>) -> Self {
        Self::with_capacity_in(allocator, 0)
    }

    /// Allocates at least `capacity` bytes, rounded up to the alignment.
    pub fn with_capacity_in(allocator: Arc<dyn Allocator>, capacity: usize) -> Self {
        let capacity = round_up(capacity);
        let ptr = allocator.allocate(capacity);
        Self {
            allocator,
            ptr,
            len: 0,
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn allocator(&self) -> &Arc<dyn Allocator> {
        &self.allocator
    }

    /// Ensures room for `additional` more bytes past `len`.
    pub fn reserve(&mut self, additional: usize) {
        let required = self.len + additional;
        if required > self.capacity {
            let target = round_up(required).max(self.capacity * 2);
            self.reallocate(target);
        }
    }

    /// Grows or shrinks the allocation to exactly `capacity` bytes (rounded up),
    /// never below `len`.
    pub fn reallocate(&mut self, capacity: usize) {
        let capacity = round_up(capacity.max(self.len));
        if capacity == self.capacity {
            return;
        }
        log::trace!("MutableBuffer: reallocating {} -> {} bytes", self.capacity, capacity);
        // SAFETY: ptr/capacity are ours and the old pointer is replaced right away
        self.ptr = unsafe { self.allocator.reallocate(self.ptr, self.capacity, capacity) };
        self.capacity = capacity;
    }

    /// Sets the length to `new_len`, filling new bytes with `value`.
    pub fn resize(&mut self, new_len: usize, value: u8) {
        if new_len > self.len {
            self.reserve(new_len - self.len);
            // SAFETY: capacity covers new_len after reserve
            unsafe {
                self.ptr
                    .as_ptr()
                    .add(self.len)
                    .write_bytes(value, new_len - self.len)
            };
        }
        self.len = new_len;
    }

    #[inline]
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn push<T: NativeType>(&mut self, v: T) {
        self.extend_from_slice(slice::from_ref(&v));
    }

    pub fn extend_from_slice<T: NativeType>(&mut self, values: &[T]) {
        let bytes = size_of_val(values);
        self.reserve(bytes);
        // SAFETY: reserve guarantees room; source and destination never overlap
        unsafe {
            std::ptr::copy_nonoverlapping(
                values.as_ptr() as *const u8,
                self.ptr.as_ptr().add(self.len),
                bytes,
            );
        }
        self.len += bytes;
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: the first len bytes are initialised (allocations are zeroed)
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        // SAFETY: exclusive access; the first len bytes are initialised
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn typed_data<T: NativeType>(&self) -> &[T] {
        // SAFETY: 64-byte aligned region of plain old data
        unsafe { slice::from_raw_parts(self.ptr.as_ptr() as *const T, self.len / size_of::<T>()) }
    }

    #[inline]
    pub fn typed_data_mut<T: NativeType>(&mut self) -> &mut [T] {
        // SAFETY: as typed_data, with exclusive access
        unsafe {
            slice::from_raw_parts_mut(self.ptr.as_ptr() as *mut T, self.len / size_of::<T>())
        }
    }

    /// Freezes the region into an immutable shared buffer without copying.
    pub fn into_buffer(self) -> Buffer {
        let this = std::mem::ManuallyDrop::new(self);
        // SAFETY: ownership of the allocation moves to the Buffer; self is not dropped
        unsafe {
            let allocator = std::ptr::read(&this.allocator);
            Buffer::from_raw_parts(allocator, this.ptr, this.len, this.capacity)
        }
    }
}

impl Default for MutableBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MutableBuffer {
    fn drop(&mut self) {
        // SAFETY: region is exclusively ours
        unsafe { self.allocator.free(self.ptr, self.capacity) };
    }
}

impl Debug for MutableBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MutableBuffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::allocator::CheckedAllocator;

    #[test]
    fn test_push_and_grow() {
        let mut b = MutableBuffer::new();
        assert_eq!(b.capacity(), 0);
        for i in 0..100i32 {
            b.push(i);
        }
        assert_eq!(b.len(), 400);
        assert_eq!(b.capacity() % ALIGNMENT, 0);
        assert!(b.capacity() >= 400);
        assert_eq!(b.typed_data::<i32>()[99], 99);
    }

    #[test]
    fn test_resize_fills() {
        let mut b = MutableBuffer::new();
        b.resize(10, 0xFF);
        assert_eq!(b.as_slice(), &[0xFF; 10]);
        b.truncate(4);
        assert_eq!(b.len(), 4);
        b.resize(6, 0);
        assert_eq!(b.as_slice(), &[0xFF, 0xFF, 0xFF, 0xFF, 0, 0]);
    }

    #[test]
    fn test_into_buffer_transfers_allocation() {
        let mem = Arc::new(CheckedAllocator::default());
        let mut b = MutableBuffer::with_capacity_in(mem.clone(), 10);
        mem.assert_size(64);
        b.extend_from_slice(&[1u16, 2, 3]);
        let ptr = b.as_slice().as_ptr();
        let frozen = b.into_buffer();
        assert_eq!(frozen.as_ptr(), ptr);
        assert_eq!(frozen.typed_data::<u16>(), &[1, 2, 3]);
        mem.assert_size(64);
        drop(frozen);
        mem.assert_size(0);
    }

    #[test]
    fn test_drop_frees() {
        let mem = Arc::new(CheckedAllocator::default());
        {
            let mut b = MutableBuffer::new_in(mem.clone());
            b.resize(1000, 1);
        }
        mem.assert_size(0);
    }
}
