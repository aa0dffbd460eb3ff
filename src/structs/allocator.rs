//! # Allocator Module - *64-byte aligned memory for column buffers*
//!
//! Every buffer in the crate obtains its memory through an [`Allocator`]. The
//! default [`Alloc64`] hands out zeroed, 64-byte aligned regions from the global
//! allocator so that buffers are SIMD friendly and match the Arrow memory layout.
//!
//! [`CheckedAllocator`] wraps another allocator and keeps a running total of
//! outstanding bytes. Tests use it to prove that every buffer is returned exactly
//! once after all arrays and builders holding it have been dropped.

use std::alloc::{Layout, alloc_zeroed, dealloc, handle_alloc_error, realloc};
use std::fmt::Debug;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, LazyLock};

/// Alignment in bytes of every allocation.
pub const ALIGNMENT: usize = 64;

/// Source of raw buffer memory.
///
/// Implementations must return `ALIGNMENT` aligned, zero-initialised memory.
/// A zero sized request may return a dangling, aligned pointer that is never read.
pub trait Allocator: Send + Sync + Debug {
    /// Allocates `size` zeroed bytes.
    fn allocate(&self, size: usize) -> NonNull<u8>;

    /// Grows or shrinks an allocation made by this allocator. Bytes past
    /// `old_size` are zeroed.
    ///
    /// # Safety
    /// `ptr` must have been returned by this allocator with exactly `old_size` bytes
    /// and must not be used afterwards.
    unsafe fn reallocate(&self, ptr: NonNull<u8>, old_size: usize, new_size: usize) -> NonNull<u8>;

    /// Returns memory to the allocator.
    ///
    /// # Safety
    /// `ptr` must have been returned by this allocator with exactly `size` bytes
    /// and must not be freed twice.
    unsafe fn free(&self, ptr: NonNull<u8>, size: usize);
}

/// Shared handle to the process wide default allocator.
pub fn default_allocator() -> Arc<dyn Allocator> {
    static DEFAULT: LazyLock<Arc<dyn Allocator>> = LazyLock::new(|| Arc::new(Alloc64));
    DEFAULT.clone()
}

#[inline]
fn dangling() -> NonNull<u8> {
    // SAFETY: ALIGNMENT is non-zero
    unsafe { NonNull::new_unchecked(ALIGNMENT as *mut u8) }
}

#[inline]
fn layout_for(size: usize) -> Layout {
    match Layout::from_size_align(size, ALIGNMENT) {
        Ok(l) => l,
        Err(_) => panic!("allocation of {size} bytes exceeds the addressable size"),
    }
}

/// Global allocator backed, 64-byte aligned allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct Alloc64;

impl Allocator for Alloc64 {
    fn allocate(&self, size: usize) -> NonNull<u8> {
        if size == 0 {
            return dangling();
        }
        let layout = layout_for(size);
        // SAFETY: size is non-zero
        let raw = unsafe { alloc_zeroed(layout) };
        NonNull::new(raw).unwrap_or_else(|| handle_alloc_error(layout))
    }

    unsafe fn reallocate(&self, ptr: NonNull<u8>, old_size: usize, new_size: usize) -> NonNull<u8> {
        if old_size == 0 {
            return self.allocate(new_size);
        }
        if new_size == 0 {
            unsafe { self.free(ptr, old_size) };
            return dangling();
        }
        let old = layout_for(old_size);
        // SAFETY: caller guarantees ptr/old_size came from this allocator
        let raw = unsafe { realloc(ptr.as_ptr(), old, new_size) };
        let Some(new) = NonNull::new(raw) else {
            handle_alloc_error(layout_for(new_size))
        };
        if new_size > old_size {
            // SAFETY: the tail lies within the new allocation
            unsafe { new.as_ptr().add(old_size).write_bytes(0, new_size - old_size) };
        }
        new
    }

    unsafe fn free(&self, ptr: NonNull<u8>, size: usize) {
        if size == 0 {
            return;
        }
        // SAFETY: caller guarantees ptr/size came from this allocator
        unsafe { dealloc(ptr.as_ptr(), layout_for(size)) };
    }
}

/// # CheckedAllocator
///
/// Wraps an allocator and tracks outstanding bytes.
///
/// ```rust
/// use std::sync::Arc;
/// use nestarrow::{Allocator, CheckedAllocator};
///
/// let mem = Arc::new(CheckedAllocator::default());
/// let p = mem.allocate(100);
/// assert_eq!(mem.current_alloc(), 100);
/// unsafe { mem.free(p, 100) };
/// mem.assert_size(0);
/// ```
#[derive(Debug)]
pub struct CheckedAllocator {
    inner: Arc<dyn Allocator>,
    outstanding: AtomicI64,
}

impl CheckedAllocator {
    pub fn new(inner: Arc<dyn Allocator>) -> Self {
        Self {
            inner,
            outstanding: AtomicI64::new(0),
        }
    }

    /// Bytes currently allocated and not yet freed.
    #[inline]
    pub fn current_alloc(&self) -> i64 {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Panics unless exactly `size` bytes are outstanding.
    #[track_caller]
    pub fn assert_size(&self, size: i64) {
        let got = self.current_alloc();
        assert_eq!(got, size, "invalid memory size: expected {size} outstanding bytes, got {got}");
    }
}

impl Default for CheckedAllocator {
    fn default() -> Self {
        Self::new(default_allocator())
    }
}

impl Allocator for CheckedAllocator {
    fn allocate(&self, size: usize) -> NonNull<u8> {
        let p = self.inner.allocate(size);
        self.outstanding.fetch_add(size as i64, Ordering::SeqCst);
        p
    }

    unsafe fn reallocate(&self, ptr: NonNull<u8>, old_size: usize, new_size: usize) -> NonNull<u8> {
        let p = unsafe { self.inner.reallocate(ptr, old_size, new_size) };
        self.outstanding
            .fetch_add(new_size as i64 - old_size as i64, Ordering::SeqCst);
        p
    }

    unsafe fn free(&self, ptr: NonNull<u8>, size: usize) {
        unsafe { self.inner.free(ptr, size) };
        self.outstanding.fetch_sub(size as i64, Ordering::SeqCst);
    }
}
