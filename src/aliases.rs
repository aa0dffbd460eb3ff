//! # Aliases Module
//!
//! Concrete names for the generic primitive arrays and builders.

use crate::structs::builders::primitive::PrimitiveBuilder;
use crate::structs::variants::primitive::PrimitiveArray;

pub use crate::traits::array::ArrayRef;

pub type Int8Array = PrimitiveArray<i8>;
pub type Int16Array = PrimitiveArray<i16>;
pub type Int32Array = PrimitiveArray<i32>;
pub type Int64Array = PrimitiveArray<i64>;
pub type UInt8Array = PrimitiveArray<u8>;
pub type UInt16Array = PrimitiveArray<u16>;
pub type UInt32Array = PrimitiveArray<u32>;
pub type UInt64Array = PrimitiveArray<u64>;
pub type Float32Array = PrimitiveArray<f32>;
pub type Float64Array = PrimitiveArray<f64>;

pub type Int8Builder = PrimitiveBuilder<i8>;
pub type Int16Builder = PrimitiveBuilder<i16>;
pub type Int32Builder = PrimitiveBuilder<i32>;
pub type Int64Builder = PrimitiveBuilder<i64>;
pub type UInt8Builder = PrimitiveBuilder<u8>;
pub type UInt16Builder = PrimitiveBuilder<u16>;
pub type UInt32Builder = PrimitiveBuilder<u32>;
pub type UInt64Builder = PrimitiveBuilder<u64>;
pub type Float32Builder = PrimitiveBuilder<f32>;
pub type Float64Builder = PrimitiveBuilder<f64>;
