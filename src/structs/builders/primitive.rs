//! # PrimitiveBuilder Module
//!
//! Builder for fixed-width numeric arrays.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::structs::allocator::{Allocator, default_allocator};
use crate::structs::builders::base::{BuilderBase, MIN_BUILDER_CAPACITY};
use crate::structs::data::ArrayData;
use crate::structs::mutable_buffer::MutableBuffer;
use crate::structs::variants::primitive::PrimitiveArray;
use crate::traits::builder::ArrayBuilder;
use crate::traits::type_unions::NativeType;

/// # PrimitiveBuilder
///
/// ## Example
/// ```rust
/// use nestarrow::{Array, ArrayBuilder, Int64Builder};
///
/// let mut b = Int64Builder::new();
/// b.append_value(1);
/// b.append_null();
/// b.append_slice(&[3, 4]);
/// let arr = b.finish_primitive();
/// assert_eq!(arr.len(), 4);
/// assert_eq!(arr.null_count(), 1);
/// ```
#[derive(Debug)]
pub struct PrimitiveBuilder<T: NativeType> {
    base: BuilderBase,
    values: MutableBuffer,
    _marker: PhantomData<T>,
}

impl<T: NativeType> PrimitiveBuilder<T> {
    pub fn new() -> Self {
        Self::new_in(default_allocator())
    }

    pub fn new_in(allocator: Arc<dyn Allocator>) -> Self {
        Self {
            values: MutableBuffer::new_in(allocator.clone()),
            base: BuilderBase::new(allocator),
            _marker: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut b = Self::new();
        b.resize(capacity);
        b
    }

    #[inline]
    pub fn append_value(&mut self, v: T) {
        self.reserve(1);
        self.values.push(v);
        self.base.append_validity(true);
    }

    #[inline]
    pub fn append_option(&mut self, v: Option<T>) {
        match v {
            Some(v) => self.append_value(v),
            None => self.append_null(),
        }
    }

    pub fn append_slice(&mut self, values: &[T]) {
        self.reserve(values.len());
        self.values.extend_from_slice(values);
        self.base.append_validities(true, values.len());
    }

    /// Appends `values`, marking slot `i` null where `valid[i]` is false.
    ///
    /// Panics if the slices differ in length.
    pub fn append_values(&mut self, values: &[T], valid: &[bool]) {
        assert_eq!(values.len(), valid.len(), "values and validity must have equal length");
        self.reserve(values.len());
        self.values.extend_from_slice(values);
        for &v in valid {
            self.base.append_validity(v);
        }
    }

    /// Values appended so far.
    #[inline]
    pub fn values_slice(&self) -> &[T] {
        self.values.typed_data::<T>()
    }

    pub fn finish_primitive(&mut self) -> PrimitiveArray<T> {
        PrimitiveArray::from_data(Arc::new(self.finish_data()))
    }
}

impl<T: NativeType> Default for PrimitiveBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NativeType> ArrayBuilder for PrimitiveBuilder<T> {
    fn data_type(&self) -> DataType {
        T::DATA_TYPE
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
        self.reserve(1);
        self.values.push(T::default());
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
        let width = size_of::<T>();
        self.values.truncate(self.base.len() * width);
        self.values.reallocate(capacity * width);
    }

    fn finish_data(&mut self) -> ArrayData {
        let len = self.base.len();
        let nulls = self.base.null_count();
        let validity = self.base.finish_bitmap();
        let allocator = self.base.allocator().clone();
        let values = std::mem::replace(&mut self.values, MutableBuffer::new_in(allocator));
        log::trace!("PrimitiveBuilder<{}>: finished {len} slots, {nulls} null", T::DATA_TYPE);
        // SAFETY: one T per slot and a bitmap covering every slot
        unsafe {
            ArrayData::new_unchecked(
                T::DATA_TYPE,
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
