//! # FixedSizeListBuilder Module
//!
//! Builder for lists of exactly `n` child values per slot. A null slot still
//! occupies `n` child rows, which are padded with nulls.

use std::any::Any;
use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::structs::allocator::{Allocator, default_allocator};
use crate::structs::builders::base::{BuilderBase, MIN_BUILDER_CAPACITY};
use crate::structs::data::ArrayData;
use crate::structs::variants::fixed_size_list::FixedSizeListArray;
use crate::traits::builder::ArrayBuilder;

#[derive(Debug)]
pub struct FixedSizeListBuilder<B: ArrayBuilder> {
    base: BuilderBase,
    values: B,
    n: i32,
}

impl<B: ArrayBuilder> FixedSizeListBuilder<B> {
    /// Panics if `n` is negative.
    pub fn new(values: B, n: i32) -> Self {
        Self::new_in(default_allocator(), values, n)
    }

    pub fn new_in(allocator: Arc<dyn Allocator>, values: B, n: i32) -> Self {
        assert!(n >= 0, "fixed_size_list length must not be negative, got {n}");
        Self {
            base: BuilderBase::new(allocator),
            values,
            n,
        }
    }

    /// Opens a slot. For a valid slot the caller appends exactly `n` child values.
    pub fn append(&mut self, is_valid: bool) {
        self.reserve(1);
        self.base.append_validity(is_valid);
        if !is_valid {
            for _ in 0..self.n {
                self.values.append_null();
            }
        }
    }

    #[inline]
    pub fn values(&self) -> &B {
        &self.values
    }

    #[inline]
    pub fn values_mut(&mut self) -> &mut B {
        &mut self.values
    }

    pub fn finish_fixed_size_list(&mut self) -> FixedSizeListArray {
        FixedSizeListArray::from_data(Arc::new(self.finish_data()))
    }
}

impl<B: ArrayBuilder> ArrayBuilder for FixedSizeListBuilder<B> {
    fn data_type(&self) -> DataType {
        DataType::fixed_size_list_of(self.n, self.values.data_type())
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
        self.base.resize(capacity.max(MIN_BUILDER_CAPACITY));
    }

    fn finish_data(&mut self) -> ArrayData {
        let data_type = self.data_type();
        let len = self.base.len();
        let expected = len * self.n as usize;
        assert_eq!(
            self.values.len(),
            expected,
            "fixed_size_list builder holds {} child values for {len} slots of {}",
            self.values.len(),
            self.n
        );
        let nulls = self.base.null_count();
        let validity = self.base.finish_bitmap();
        let child = self.values.finish_data();
        log::debug!("{data_type} builder: finished {len} slots, {nulls} null");
        // SAFETY: child holds exactly len * n rows
        unsafe {
            ArrayData::new_unchecked(
                data_type,
                len,
                0,
                Some(nulls),
                vec![validity],
                vec![Arc::new(child)],
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
