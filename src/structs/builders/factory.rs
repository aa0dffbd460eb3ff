//! # Builder Factory
//!
//! Creates a type-erased builder for any non-dictionary [`DataType`], recursing
//! into nested element, field, key and value types.

use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::structs::allocator::Allocator;
use crate::structs::builders::boolean::BooleanBuilder;
use crate::structs::builders::fixed_size_list::FixedSizeListBuilder;
use crate::structs::builders::list::ListBuilder;
use crate::structs::builders::map::MapBuilder;
use crate::structs::builders::null::NullBuilder;
use crate::structs::builders::primitive::PrimitiveBuilder;
use crate::structs::builders::string::{BinaryBuilder, StringBuilder};
use crate::structs::builders::struct_builder::StructBuilder;
use crate::traits::builder::ArrayBuilder;

/// Returns an empty builder producing arrays of `data_type`.
///
/// Nested types get `Box<dyn ArrayBuilder>` children, so a list of int32 is a
/// `ListBuilder<Box<dyn ArrayBuilder>>` whose child downcasts to `Int32Builder`.
///
/// # Panics
/// For dictionary types, which are assembled from an index and a value array
/// via `DictionaryArray::try_new_from_arrays` instead.
pub fn new_builder(allocator: Arc<dyn Allocator>, data_type: &DataType) -> Box<dyn ArrayBuilder> {
    match data_type {
        DataType::Null => Box::new(NullBuilder::new()),
        DataType::Boolean => Box::new(BooleanBuilder::new_in(allocator)),
        DataType::Int8 => Box::new(PrimitiveBuilder::<i8>::new_in(allocator)),
        DataType::Int16 => Box::new(PrimitiveBuilder::<i16>::new_in(allocator)),
        DataType::Int32 => Box::new(PrimitiveBuilder::<i32>::new_in(allocator)),
        DataType::Int64 => Box::new(PrimitiveBuilder::<i64>::new_in(allocator)),
        DataType::UInt8 => Box::new(PrimitiveBuilder::<u8>::new_in(allocator)),
        DataType::UInt16 => Box::new(PrimitiveBuilder::<u16>::new_in(allocator)),
        DataType::UInt32 => Box::new(PrimitiveBuilder::<u32>::new_in(allocator)),
        DataType::UInt64 => Box::new(PrimitiveBuilder::<u64>::new_in(allocator)),
        DataType::Float32 => Box::new(PrimitiveBuilder::<f32>::new_in(allocator)),
        DataType::Float64 => Box::new(PrimitiveBuilder::<f64>::new_in(allocator)),
        DataType::Utf8 => Box::new(StringBuilder::new_in(allocator)),
        DataType::Binary => Box::new(BinaryBuilder::new_in(allocator)),
        DataType::List(t) => {
            let values = new_builder(allocator.clone(), t.elem());
            Box::new(ListBuilder::new_in(allocator, values))
        }
        DataType::FixedSizeList(t) => {
            let values = new_builder(allocator.clone(), t.elem());
            Box::new(FixedSizeListBuilder::new_in(allocator, values, t.size() as i32))
        }
        DataType::Struct(t) => Box::new(StructBuilder::from_fields_in(allocator, t.fields().to_vec())),
        DataType::Map(t) => {
            let keys = new_builder(allocator.clone(), t.key_type());
            let values = new_builder(allocator.clone(), t.value_type());
            Box::new(MapBuilder::new_in(allocator, keys, values, t.keys_sorted()))
        }
        DataType::Dictionary(t) => {
            panic!("no builder for {t}; build the indices and values separately")
        }
    }
}
