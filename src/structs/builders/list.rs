//! # ListBuilder Module
//!
//! Builder for variable-length lists over any child builder.
//!
//! `append(true)` opens a slot by recording the child's current length as the
//! slot's start offset; values are then appended through [`ListBuilder::values_mut`].
//! The closing offset is written at finish.

use std::any::Any;
use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::structs::allocator::{Allocator, default_allocator};
use crate::structs::builders::base::{BuilderBase, MIN_BUILDER_CAPACITY};
use crate::structs::data::ArrayData;
use crate::structs::mutable_buffer::MutableBuffer;
use crate::structs::variants::list::ListArray;
use crate::traits::builder::ArrayBuilder;

#[derive(Debug)]
pub struct ListBuilder<B: ArrayBuilder> {
    base: BuilderBase,
    offsets: MutableBuffer,
    values: B,
}

impl<B: ArrayBuilder> ListBuilder<B> {
    pub fn new(values: B) -> Self {
        Self::new_in(default_allocator(), values)
    }

    pub fn new_in(allocator: Arc<dyn Allocator>, values: B) -> Self {
        Self {
            offsets: MutableBuffer::new_in(allocator.clone()),
            base: BuilderBase::new(allocator),
            values,
        }
    }

    /// Opens a new slot, valid or null.
    pub fn append(&mut self, is_valid: bool) {
        self.reserve(1);
        let start = self.child_offset();
        self.offsets.push(start);
        self.base.append_validity(is_valid);
    }

    #[inline]
    pub fn values(&self) -> &B {
        &self.values
    }

    #[inline]
    pub fn values_mut(&mut self) -> &mut B {
        &mut self.values
    }

    #[inline]
    fn child_offset(&self) -> i32 {
        let n = self.values.len();
        assert!(n <= i32::MAX as usize, "list child exceeded the i32 offset range");
        n as i32
    }

    pub fn finish_list(&mut self) -> ListArray {
        ListArray::from_data(Arc::new(self.finish_data()))
    }

    /// Finalizes the list as data of type `data_type`, which must share the list
    /// layout over this builder's child.
    pub(crate) fn finish_as(&mut self, data_type: DataType) -> ArrayData {
        let end = self.child_offset();
        self.offsets.push(end);
        let len = self.base.len();
        let nulls = self.base.null_count();
        let validity = self.base.finish_bitmap();
        let allocator = self.base.allocator().clone();
        let offsets = std::mem::replace(&mut self.offsets, MutableBuffer::new_in(allocator));
        let child = self.values.finish_data();
        log::debug!(
            "{data_type} builder: finished {len} slots, {nulls} null, {} child values",
            child.len()
        );
        // SAFETY: len + 1 monotonic offsets bounded by the child length
        unsafe {
            ArrayData::new_unchecked(
                data_type,
                len,
                0,
                Some(nulls),
                vec![validity, Some(offsets.into_buffer())],
                vec![Arc::new(child)],
                None,
            )
        }
    }
}

impl<B: ArrayBuilder> ArrayBuilder for ListBuilder<B> {
    fn data_type(&self) -> DataType {
        DataType::list_of(self.values.data_type())
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
        self.append(false);
    }

    fn reserve(&mut self, additional: usize) {
        if let Some(cap) = self.base.grow_target(additional) {
            self.resize(cap);
        }
    }

    fn resize(&mut self, capacity: usize) {
        let capacity = capacity.max(MIN_BUILDER_CAPACITY);
        self.base.resize(capacity);
        self.offsets.truncate(self.base.len() * 4);
        self.offsets.reallocate((capacity + 1) * 4);
    }

    fn finish_data(&mut self) -> ArrayData {
        let data_type = self.data_type();
        self.finish_as(data_type)
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
