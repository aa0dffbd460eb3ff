//! # Builder Base Module
//!
//! State every builder shares: allocator, validity bitmap, length, null count
//! and slot capacity. Concrete builders compose a [`BuilderBase`] and add their own
//! value buffers and child builders.

use std::fmt::Debug;
use std::sync::Arc;

use crate::structs::allocator::Allocator;
use crate::structs::buffer::Buffer;
use crate::structs::mutable_buffer::MutableBuffer;
use crate::utils::{bytes_for, count_set_bits, set_bit, unset_bit};

/// Smallest slot capacity a builder allocates or resizes to.
pub const MIN_BUILDER_CAPACITY: usize = 32;

/// Capacity a builder grows to so that `required` slots fit.
#[inline]
pub fn grow_capacity(required: usize) -> usize {
    required.next_power_of_two().max(MIN_BUILDER_CAPACITY)
}

#[derive(Debug)]
pub struct BuilderBase {
    allocator: Arc<dyn Allocator>,
    null_bitmap: Option<MutableBuffer>,
    nulls: usize,
    length: usize,
    capacity: usize,
}

impl BuilderBase {
    pub fn new(allocator: Arc<dyn Allocator>) -> Self {
        Self {
            allocator,
            null_bitmap: None,
            nulls: 0,
            length: 0,
            capacity: 0,
        }
    }

    #[inline]
    pub fn allocator(&self) -> &Arc<dyn Allocator> {
        &self.allocator
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn null_count(&self) -> usize {
        self.nulls
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Allocates a zeroed bitmap for `capacity` slots.
    pub fn init(&mut self, capacity: usize) {
        let bytes = bytes_for(capacity);
        let mut bitmap = MutableBuffer::with_capacity_in(self.allocator.clone(), bytes);
        bitmap.resize(bytes, 0);
        self.null_bitmap = Some(bitmap);
        self.capacity = capacity;
    }

    /// New capacity needed to append `additional` slots, if growth is required.
    #[inline]
    pub fn grow_target(&self, additional: usize) -> Option<usize> {
        let required = self.length + additional;
        (required > self.capacity).then(|| grow_capacity(required))
    }

    /// Resizes the bitmap to `capacity` slots. Shrinking below the current length
    /// truncates and recounts nulls.
    pub fn resize(&mut self, capacity: usize) {
        let Some(bitmap) = self.null_bitmap.as_mut() else {
            self.init(capacity);
            return;
        };
        if capacity < self.length {
            let bytes = bitmap.as_slice_mut();
            for i in capacity..(bytes.len() * 8).min(bytes_for(self.length) * 8) {
                unset_bit(bytes, i);
            }
            self.length = capacity;
            self.nulls = capacity - count_set_bits(bitmap.as_slice(), 0, capacity);
        }
        let bytes = bytes_for(capacity);
        bitmap.resize(bytes, 0);
        bitmap.reallocate(bytes);
        self.capacity = capacity;
    }

    /// Records one slot. Capacity must already cover it.
    #[inline]
    pub fn append_validity(&mut self, valid: bool) {
        debug_assert!(self.length < self.capacity, "append past builder capacity");
        if valid {
            if let Some(bitmap) = self.null_bitmap.as_mut() {
                set_bit(bitmap.as_slice_mut(), self.length);
            }
        } else {
            self.nulls += 1;
        }
        self.length += 1;
    }

    /// Records `n` slots of the same validity. Capacity must already cover them.
    pub fn append_validities(&mut self, valid: bool, n: usize) {
        debug_assert!(self.length + n <= self.capacity, "append past builder capacity");
        if valid {
            if let Some(bitmap) = self.null_bitmap.as_mut() {
                let bytes = bitmap.as_slice_mut();
                for i in self.length..self.length + n {
                    set_bit(bytes, i);
                }
            }
        } else {
            self.nulls += n;
        }
        self.length += n;
    }

    /// Freezes the bitmap, or returns `None` when no slot is null, and resets the
    /// shared state for reuse.
    pub fn finish_bitmap(&mut self) -> Option<Buffer> {
        let bitmap = self.null_bitmap.take();
        let out = match bitmap {
            Some(mut b) if self.nulls > 0 => {
                b.truncate(bytes_for(self.length));
                Some(b.into_buffer())
            }
            _ => None,
        };
        self.reset();
        out
    }

    pub fn reset(&mut self) {
        self.null_bitmap = None;
        self.nulls = 0;
        self.length = 0;
        self.capacity = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::allocator::CheckedAllocator;
    use crate::utils::get_bit;

    #[test]
    fn test_grow_capacity() {
        assert_eq!(grow_capacity(1), MIN_BUILDER_CAPACITY);
        assert_eq!(grow_capacity(33), 64);
        assert_eq!(grow_capacity(64), 64);
    }

    #[test]
    fn test_append_and_finish() {
        let mut base = BuilderBase::new(Arc::new(CheckedAllocator::default()));
        base.init(8);
        base.append_validity(true);
        base.append_validity(false);
        base.append_validities(true, 3);
        assert_eq!(base.len(), 5);
        assert_eq!(base.null_count(), 1);
        let bits = base.finish_bitmap().unwrap();
        assert!(get_bit(bits.as_slice(), 0));
        assert!(!get_bit(bits.as_slice(), 1));
        assert!(get_bit(bits.as_slice(), 4));
        assert_eq!(base.len(), 0);
        assert_eq!(base.capacity(), 0);
    }

    #[test]
    fn test_no_nulls_drops_bitmap() {
        let mem = Arc::new(CheckedAllocator::default());
        let mut base = BuilderBase::new(mem.clone());
        base.init(4);
        base.append_validities(true, 4);
        assert!(base.finish_bitmap().is_none());
        mem.assert_size(0);
    }

    #[test]
    fn test_shrink_truncates() {
        let mut base = BuilderBase::new(Arc::new(CheckedAllocator::default()));
        base.init(32);
        for i in 0..10 {
            base.append_validity(i % 2 == 0);
        }
        assert_eq!(base.null_count(), 5);
        base.resize(4);
        assert_eq!(base.len(), 4);
        assert_eq!(base.null_count(), 2);
        assert_eq!(base.capacity(), 4);
    }
}
