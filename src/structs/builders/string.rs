//! # Byte Builder Module
//!
//! Builder for UTF-8 and binary arrays.
//!
//! The start offset of a slot is recorded when the slot is opened; the closing
//! offset of the last slot is appended when the builder finishes.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::structs::allocator::{Allocator, default_allocator};
use crate::structs::builders::base::{BuilderBase, MIN_BUILDER_CAPACITY};
use crate::structs::data::ArrayData;
use crate::structs::mutable_buffer::MutableBuffer;
use crate::structs::variants::string::{BinaryType, ByteArrayType, GenericByteArray, Utf8Type};
use crate::traits::builder::ArrayBuilder;

#[derive(Debug)]
pub struct GenericByteBuilder<K: ByteArrayType> {
    base: BuilderBase,
    offsets: MutableBuffer,
    values: MutableBuffer,
    _marker: PhantomData<K>,
}

pub type StringBuilder = GenericByteBuilder<Utf8Type>;
pub type BinaryBuilder = GenericByteBuilder<BinaryType>;

impl<K: ByteArrayType> GenericByteBuilder<K> {
    pub fn new() -> Self {
        Self::new_in(default_allocator())
    }

    pub fn new_in(allocator: Arc<dyn Allocator>) -> Self {
        Self {
            offsets: MutableBuffer::new_in(allocator.clone()),
            values: MutableBuffer::new_in(allocator.clone()),
            base: BuilderBase::new(allocator),
            _marker: PhantomData,
        }
    }

    /// Room for `capacity` slots and `data_capacity` value bytes.
    pub fn with_capacity(capacity: usize, data_capacity: usize) -> Self {
        let mut b = Self::new();
        b.resize(capacity);
        b.values.reserve(data_capacity);
        b
    }

    #[inline]
    fn open_slot(&mut self) {
        self.reserve(1);
        let start = self.current_offset();
        self.offsets.push(start);
    }

    #[inline]
    fn current_offset(&self) -> i32 {
        let n = self.values.len();
        assert!(
            n <= i32::MAX as usize,
            "{} builder exceeded the i32 offset range with {n} value bytes",
            K::DATA_TYPE
        );
        n as i32
    }

    pub fn append_value(&mut self, v: &K::Native) {
        self.open_slot();
        self.values.extend_from_slice::<u8>(v.as_ref());
        self.base.append_validity(true);
    }

    pub fn append_option(&mut self, v: Option<&K::Native>) {
        match v {
            Some(v) => self.append_value(v),
            None => self.append_null(),
        }
    }

    /// Value bytes appended so far.
    #[inline]
    pub fn value_bytes(&self) -> usize {
        self.values.len()
    }

    pub fn finish_bytes(&mut self) -> GenericByteArray<K> {
        GenericByteArray::from_data(Arc::new(self.finish_data()))
    }
}

impl<K: ByteArrayType> Default for GenericByteBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ByteArrayType> ArrayBuilder for GenericByteBuilder<K> {
    fn data_type(&self) -> DataType {
        K::DATA_TYPE
    }

    fn len(&self) -> usize {
        self.base.len()
    }

    fn null_count(&self) -> usize {
        self.base.null_count()
    }

    fn capacity(&self) -> usize {
        self.base.capacity()
    }

    fn append_null(&mut self) {
        self.open_slot();
        self.base.append_validity(false);
    }

    fn reserve(&mut self, additional: usize) {
        if let Some(cap) = self.base.grow_target(additional) {
            self.resize(cap);
        }
    }

    fn resize(&mut self, capacity: usize) {
        let capacity = capacity.max(MIN_BUILDER_CAPACITY);
        self.base.resize(capacity);
        let len = self.base.len();
        if self.offsets.len() > len * 4 {
            let end = self.offsets.typed_data::<i32>()[len] as usize;
            self.offsets.truncate(len * 4);
            self.values.truncate(end);
        }
        self.offsets.reallocate((capacity + 1) * 4);
    }

    fn finish_data(&mut self) -> ArrayData {
        let end = self.current_offset();
        self.offsets.push(end);
        let len = self.base.len();
        let nulls = self.base.null_count();
        let validity = self.base.finish_bitmap();
        let allocator = self.base.allocator().clone();
        let offsets = std::mem::replace(&mut self.offsets, MutableBuffer::new_in(allocator.clone()));
        let values = std::mem::replace(&mut self.values, MutableBuffer::new_in(allocator));
        log::trace!(
            "{} builder: finished {len} slots, {nulls} null, {} value bytes",
            K::DATA_TYPE,
            values.len()
        );
        // SAFETY: len + 1 monotonic offsets over the value bytes; utf8 input came from &str
        unsafe {
            ArrayData::new_unchecked(
                K::DATA_TYPE,
                len,
                0,
                Some(nulls),
                vec![validity, Some(offsets.into_buffer()), Some(values.into_buffer())],
                vec![],
                None,
            )
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_box_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::array::Array;

    #[test]
    fn test_offsets_recorded_on_open() {
        let mut b = StringBuilder::new();
        b.append_value("ab");
        b.append_null();
        b.append_value("");
        b.append_value("xyz");
        assert_eq!(b.value_bytes(), 5);
        let arr = b.finish_bytes();
        assert_eq!(arr.value_offsets(), &[0, 2, 2, 2, 5]);
        assert_eq!(arr.null_count(), 1);
        arr.data().validate_full().unwrap();
    }

    #[test]
    fn test_empty_finish() {
        let mut b = BinaryBuilder::new();
        let arr = b.finish_bytes();
        assert_eq!(arr.len(), 0);
        assert_eq!(arr.value_offsets(), &[0]);
        arr.data().validate_full().unwrap();
    }

    #[test]
    fn test_resize_truncates_values() {
        let mut b = StringBuilder::new();
        for s in ["a", "bb", "ccc"] {
            b.append_value(s);
        }
        b.resize(MIN_BUILDER_CAPACITY);
        assert_eq!(b.len(), 3);
        let arr = b.finish_bytes();
        assert_eq!(arr.value(2), "ccc");
    }
}
