//! # Type Unions Module
//!
//! Trait families that bound the element types the crate stores natively.

use std::fmt::Debug;

use num_traits::{AsPrimitive, PrimInt};

use crate::enums::datatype::DataType;
use crate::impl_native_type;

mod private {
    pub trait Sealed {}
}

/// Trait for plain old data types valid as fixed-width array elements.
///
/// Sealed: every implementor is safe to reinterpret from a 64-byte aligned byte
/// buffer, which the buffer types rely on.
pub trait NativeType:
    private::Sealed + Copy + Default + Debug + PartialEq + Send + Sync + 'static
{
    /// Logical type of an array of `Self`.
    const DATA_TYPE: DataType;
}

impl_native_type!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64
);

/// Trait for types valid as dictionary indices.
///
/// Useful when specifying `my_fn::<K: DictionaryKey>() {}`.
///
/// Extends the *num-traits* `PrimInt` implementation with a widening cast to `i64`
/// used for bounds checks and error reporting.
pub trait DictionaryKey: NativeType + PrimInt + AsPrimitive<i64> {}
impl DictionaryKey for i8 {}
impl DictionaryKey for i16 {}
impl DictionaryKey for i32 {}
impl DictionaryKey for i64 {}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_type_of<T: NativeType>() -> DataType {
        T::DATA_TYPE
    }

    #[test]
    fn test_native_data_types() {
        assert_eq!(data_type_of::<i8>(), DataType::Int8);
        assert_eq!(data_type_of::<u64>(), DataType::UInt64);
        assert_eq!(data_type_of::<f32>(), DataType::Float32);
    }

    #[test]
    fn test_dictionary_key_widening() {
        fn widen<K: DictionaryKey>(k: K) -> i64 {
            k.as_()
        }
        assert_eq!(widen(-3i8), -3);
        assert_eq!(widen(i32::MAX), i32::MAX as i64);
    }
}
