//! # StructBuilder Module
//!
//! Builder for struct arrays. Owns one child builder per field; every struct slot
//! must be matched by exactly one appended row in each child.

use std::any::Any;
use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::structs::allocator::{Allocator, default_allocator};
use crate::structs::builders::base::{BuilderBase, MIN_BUILDER_CAPACITY};
use crate::structs::builders::factory::new_builder;
use crate::structs::data::ArrayData;
use crate::structs::field::Field;
use crate::structs::types::StructType;
use crate::structs::variants::struct_array::StructArray;
use crate::traits::builder::ArrayBuilder;

/// # StructBuilder
///
/// ## Example
/// ```rust
/// use nestarrow::{Array, ArrayBuilder, DataType, Field, Int32Builder, StringBuilder, StructBuilder};
///
/// let mut b = StructBuilder::from_fields(vec![
///     Field::new("id", DataType::Int32, false, None),
///     Field::new("name", DataType::Utf8, true, None),
/// ]);
/// b.append(true);
/// b.field_builder::<Int32Builder>(0).unwrap().append_value(7);
/// b.field_builder::<StringBuilder>(1).unwrap().append_value("seven");
/// b.append_null();
///
/// let s = b.finish_struct();
/// assert_eq!(s.len(), 2);
/// assert_eq!(s.null_count(), 1);
/// ```
#[derive(Debug)]
pub struct StructBuilder {
    base: BuilderBase,
    struct_type: StructType,
    builders: Vec<Box<dyn ArrayBuilder>>,
}

impl StructBuilder {
    /// Pairs `fields` with caller supplied child builders.
    ///
    /// Panics if counts or types disagree, or on duplicate field names.
    pub fn new(
        allocator: Arc<dyn Allocator>,
        fields: Vec<Field>,
        builders: Vec<Box<dyn ArrayBuilder>>,
    ) -> Self {
        assert_eq!(
            fields.len(),
            builders.len(),
            "struct builder needs one child builder per field"
        );
        for (f, b) in fields.iter().zip(&builders) {
            assert_eq!(
                f.data_type,
                b.data_type(),
                "child builder for field \"{}\" produces the wrong type",
                f.name
            );
        }
        Self {
            base: BuilderBase::new(allocator),
            struct_type: StructType::new(fields),
            builders,
        }
    }

    /// Creates child builders for `fields` from the default allocator.
    pub fn from_fields(fields: Vec<Field>) -> Self {
        Self::from_fields_in(default_allocator(), fields)
    }

    pub fn from_fields_in(allocator: Arc<dyn Allocator>, fields: Vec<Field>) -> Self {
        let builders = fields
            .iter()
            .map(|f| new_builder(allocator.clone(), &f.data_type))
            .collect();
        Self::new(allocator, fields, builders)
    }

    /// Records one struct slot. Child values are appended separately.
    pub fn append(&mut self, is_valid: bool) {
        self.reserve(1);
        self.base.append_validity(is_valid);
    }

    #[inline]
    pub fn num_fields(&self) -> usize {
        self.builders.len()
    }

    /// Child builder `i` downcast to `T`, or `None` on a type mismatch.
    pub fn field_builder<T: ArrayBuilder>(&mut self, i: usize) -> Option<&mut T> {
        self.builders[i].as_any_mut().downcast_mut::<T>()
    }

    /// Type-erased child builder `i`.
    #[inline]
    pub fn field_builder_dyn(&mut self, i: usize) -> &mut dyn ArrayBuilder {
        self.builders[i].as_mut()
    }

    pub fn finish_struct(&mut self) -> StructArray {
        StructArray::from_data(Arc::new(self.finish_data()))
    }
}

impl ArrayBuilder for StructBuilder {
    fn data_type(&self) -> DataType {
        DataType::Struct(self.struct_type.clone())
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

    /// Appends a null slot and one null row to every child.
    fn append_null(&mut self) {
        self.append(false);
        for b in &mut self.builders {
            b.append_null();
        }
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
        let len = self.base.len();
        for (f, b) in self.struct_type.fields().iter().zip(&self.builders) {
            assert_eq!(
                b.len(),
                len,
                "struct field \"{}\" has {} rows but the struct has {len}",
                f.name,
                b.len()
            );
        }
        let nulls = self.base.null_count();
        let validity = self.base.finish_bitmap();
        let children = self
            .builders
            .iter_mut()
            .map(|b| Arc::new(b.finish_data()))
            .collect();
        log::debug!("struct builder: finished {len} slots, {nulls} null");
        // SAFETY: every child has exactly len rows of its field type
        unsafe {
            ArrayData::new_unchecked(
                self.data_type(),
                len,
                0,
                Some(nulls),
                vec![validity],
                children,
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
