//! # BooleanBuilder Module
//!
//! Builder for bit-packed boolean arrays.

use std::any::Any;
use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::structs::allocator::{Allocator, default_allocator};
use crate::structs::builders::base::{BuilderBase, MIN_BUILDER_CAPACITY};
use crate::structs::data::ArrayData;
use crate::structs::mutable_buffer::MutableBuffer;
use crate::structs::variants::boolean::BooleanArray;
use crate::traits::builder::ArrayBuilder;
use crate::utils::{bytes_for, set_bit, unset_bit};

#[derive(Debug)]
pub struct BooleanBuilder {
    base: BuilderBase,
    values: MutableBuffer,
}

impl BooleanBuilder {
    pub fn new() -> Self {
        Self::new_in(default_allocator())
    }

    pub fn new_in(allocator: Arc<dyn Allocator>) -> Self {
        Self {
            values: MutableBuffer::new_in(allocator.clone()),
            base: BuilderBase::new(allocator),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut b = Self::new();
        b.resize(capacity);
        b
    }

    #[inline]
    pub fn append_value(&mut self, v: bool) {
        self.append(v, true);
    }

    #[inline]
    pub fn append_option(&mut self, v: Option<bool>) {
        match v {
            Some(v) => self.append_value(v),
            None => self.append_null(),
        }
    }

    fn append(&mut self, v: bool, valid: bool) {
        self.reserve(1);
        let i = self.base.len();
        self.values.resize(bytes_for(i + 1), 0);
        if v {
            set_bit(self.values.as_slice_mut(), i);
        } else {
            unset_bit(self.values.as_slice_mut(), i);
        }
        self.base.append_validity(valid);
    }

    pub fn finish_boolean(&mut self) -> BooleanArray {
        BooleanArray::from_data(Arc::new(self.finish_data()))
    }
}

impl Default for BooleanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrayBuilder for BooleanBuilder {
    fn data_type(&self) -> DataType {
        DataType::Boolean
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
        self.append(false, false);
    }

    fn reserve(&mut self, additional: usize) {
        if let Some(cap) = self.base.grow_target(additional) {
            self.resize(cap);
        }
    }

    fn resize(&mut self, capacity: usize) {
        let capacity = capacity.max(MIN_BUILDER_CAPACITY);
        self.base.resize(capacity);
        self.values.truncate(bytes_for(self.base.len()));
        self.values.reallocate(bytes_for(capacity));
    }

    fn finish_data(&mut self) -> ArrayData {
        let len = self.base.len();
        let nulls = self.base.null_count();
        let validity = self.base.finish_bitmap();
        let allocator = self.base.allocator().clone();
        let values = std::mem::replace(&mut self.values, MutableBuffer::new_in(allocator));
        log::trace!("BooleanBuilder: finished {len} slots, {nulls} null");
        // SAFETY: value bitmap holds bytes_for(len) bytes
        unsafe {
            ArrayData::new_unchecked(
                DataType::Boolean,
                len,
                0,
                Some(nulls),
                vec![validity, Some(values.into_buffer())],
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
