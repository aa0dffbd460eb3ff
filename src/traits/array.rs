//! # Array Trait Module
//!
//! Read-only capability shared by every array view, plus the [`make_array`]
//! factory that wraps type-erased [`ArrayData`] in the matching concrete view.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::structs::data::ArrayData;
use crate::structs::variants::boolean::BooleanArray;
use crate::structs::variants::dictionary::DictionaryArray;
use crate::structs::variants::fixed_size_list::FixedSizeListArray;
use crate::structs::variants::list::ListArray;
use crate::structs::variants::map::MapArray;
use crate::structs::variants::null::NullArray;
use crate::structs::variants::primitive::PrimitiveArray;
use crate::structs::variants::string::{BinaryArray, StringArray};
use crate::structs::variants::struct_array::StructArray;

/// Shared, type-erased array handle. Cloning retains; dropping releases.
pub type ArrayRef = Arc<dyn Array>;

/// # Array
///
/// Read view over immutable [`ArrayData`].
///
/// Implementors hold their data behind `Arc`, so every accessor is cheap and child
/// views share buffers with their parent.
pub trait Array: Debug + Send + Sync {
    /// Downcast hook, e.g. `array.as_any().downcast_ref::<MapArray>()`.
    fn as_any(&self) -> &dyn Any;

    fn data(&self) -> &Arc<ArrayData>;

    #[inline]
    fn data_type(&self) -> &DataType {
        self.data().data_type()
    }

    #[inline]
    fn len(&self) -> usize {
        self.data().len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn offset(&self) -> usize {
        self.data().offset()
    }

    #[inline]
    fn null_count(&self) -> usize {
        self.data().null_count()
    }

    #[inline]
    fn is_null(&self, i: usize) -> bool {
        self.data().is_null(i)
    }

    #[inline]
    fn is_valid(&self, i: usize) -> bool {
        self.data().is_valid(i)
    }

    /// Zero-copy window `[offset, offset + len)` as a new array.
    fn slice(&self, offset: usize, len: usize) -> ArrayRef {
        make_array(Arc::new(self.data().slice(offset, len)))
    }
}

/// Wraps `data` in the concrete array view for its type.
pub fn make_array(data: Arc<ArrayData>) -> ArrayRef {
    match data.data_type() {
        DataType::Null => Arc::new(NullArray::from_data(data)),
        DataType::Boolean => Arc::new(BooleanArray::from_data(data)),
        DataType::Int8 => Arc::new(PrimitiveArray::<i8>::from_data(data)),
        DataType::Int16 => Arc::new(PrimitiveArray::<i16>::from_data(data)),
        DataType::Int32 => Arc::new(PrimitiveArray::<i32>::from_data(data)),
        DataType::Int64 => Arc::new(PrimitiveArray::<i64>::from_data(data)),
        DataType::UInt8 => Arc::new(PrimitiveArray::<u8>::from_data(data)),
        DataType::UInt16 => Arc::new(PrimitiveArray::<u16>::from_data(data)),
        DataType::UInt32 => Arc::new(PrimitiveArray::<u32>::from_data(data)),
        DataType::UInt64 => Arc::new(PrimitiveArray::<u64>::from_data(data)),
        DataType::Float32 => Arc::new(PrimitiveArray::<f32>::from_data(data)),
        DataType::Float64 => Arc::new(PrimitiveArray::<f64>::from_data(data)),
        DataType::Utf8 => Arc::new(StringArray::from_data(data)),
        DataType::Binary => Arc::new(BinaryArray::from_data(data)),
        DataType::List(_) => Arc::new(ListArray::from_data(data)),
        DataType::FixedSizeList(_) => Arc::new(FixedSizeListArray::from_data(data)),
        DataType::Struct(_) => Arc::new(StructArray::from_data(data)),
        DataType::Map(_) => Arc::new(MapArray::from_data(data)),
        DataType::Dictionary(_) => Arc::new(DictionaryArray::from_data(data)),
    }
}

impl Array for ArrayRef {
    fn as_any(&self) -> &dyn Any {
        self.as_ref().as_any()
    }

    fn data(&self) -> &Arc<ArrayData> {
        self.as_ref().data()
    }
}
