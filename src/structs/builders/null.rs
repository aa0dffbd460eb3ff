//! # NullBuilder Module
//!
//! Counts null slots; allocates nothing.

use std::any::Any;

use crate::enums::datatype::DataType;
use crate::structs::builders::base::MIN_BUILDER_CAPACITY;
use crate::structs::data::ArrayData;
use crate::traits::builder::ArrayBuilder;

#[derive(Debug, Default)]
pub struct NullBuilder {
    len: usize,
    capacity: usize,
}

impl NullBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArrayBuilder for NullBuilder {
    fn data_type(&self) -> DataType {
        DataType::Null
    }

    fn len(&self) -> usize {
        self.len
    }

    fn null_count(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn append_null(&mut self) {
        self.reserve(1);
        self.len += 1;
    }

    fn reserve(&mut self, additional: usize) {
        let required = self.len + additional;
        if required > self.capacity {
            self.resize(required.next_power_of_two());
        }
    }

    fn resize(&mut self, capacity: usize) {
        self.capacity = capacity.max(MIN_BUILDER_CAPACITY);
        self.len = self.len.min(self.capacity);
    }

    fn finish_data(&mut self) -> ArrayData {
        let len = std::mem::take(&mut self.len);
        self.capacity = 0;
        // SAFETY: null data owns no memory
        unsafe { ArrayData::new_unchecked(DataType::Null, len, 0, Some(len), vec![None], vec![], None) }
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
