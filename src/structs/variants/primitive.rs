//! # **PrimitiveArray Module** - *Fixed-width numeric arrays*
//!
//! Arrow-compatible, 64-byte aligned array of a [`NativeType`].
//!
//! ## Overview
//! - Logical type: `T::DATA_TYPE` (int8 .. float64).
//! - Physical storage: optional validity bitmap plus one contiguous `T` buffer.
//! - Slicing is zero-copy; `values()` always returns the window of the slice.

use std::sync::Arc;

use crate::impl_array;
use crate::structs::builders::primitive::PrimitiveBuilder;
use crate::structs::data::ArrayData;
use crate::traits::array::Array;
use crate::traits::type_unions::NativeType;

/// # PrimitiveArray
///
/// ## Example
/// ```rust
/// use nestarrow::{Array, Int32Array};
///
/// let arr = Int32Array::from_slice(&[1, 2, 3, 4]);
/// assert_eq!(arr.value(2), 3);
///
/// let arr = Int32Array::from(vec![Some(10), None, Some(30)]);
/// assert_eq!(arr.null_count(), 1);
/// assert_eq!(arr.iter().collect::<Vec<_>>(), vec![Some(10), None, Some(30)]);
/// ```
#[derive(Debug, Clone)]
pub struct PrimitiveArray<T: NativeType> {
    data: Arc<ArrayData>,
    _marker: std::marker::PhantomData<T>,
}

impl<T: NativeType> PrimitiveArray<T> {
    /// Panics if `data` is not typed `T::DATA_TYPE`.
    pub fn from_data(data: Arc<ArrayData>) -> Self {
        assert!(
            data.data_type() == &T::DATA_TYPE,
            "PrimitiveArray<{}> requires {} data, got {}",
            std::any::type_name::<T>(),
            T::DATA_TYPE,
            data.data_type()
        );
        assert!(data.buffer(1).is_some(), "PrimitiveArray data is missing its values buffer");
        Self {
            data,
            _marker: std::marker::PhantomData,
        }
    }

    /// Dense array with no nulls.
    pub fn from_slice(values: &[T]) -> Self {
        let mut b = PrimitiveBuilder::<T>::with_capacity(values.len());
        b.append_slice(values);
        b.finish_primitive()
    }

    /// Values of this window, including the placeholders behind null slots.
    #[inline]
    pub fn values(&self) -> &[T] {
        let start = self.data.offset();
        match self.data.buffer(1) {
            Some(b) => &b.typed_data::<T>()[start..start + self.data.len()],
            None => &[],
        }
    }

    /// Value at `i`, ignoring validity. Panics when out of range.
    #[inline]
    pub fn value(&self, i: usize) -> T {
        assert!(i < self.len(), "index {i} out of range for length {}", self.len());
        self.values()[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<T>> + '_ {
        self.values()
            .iter()
            .enumerate()
            .map(move |(i, v)| self.is_valid(i).then_some(*v))
    }
}

impl_array!(PrimitiveArray<T: NativeType>);

impl<T: NativeType> From<Vec<T>> for PrimitiveArray<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_slice(&values)
    }
}

impl<T: NativeType> From<Vec<Option<T>>> for PrimitiveArray<T> {
    fn from(values: Vec<Option<T>>) -> Self {
        let mut b = PrimitiveBuilder::<T>::with_capacity(values.len());
        for v in values {
            b.append_option(v);
        }
        b.finish_primitive()
    }
}
