//! # **BooleanArray Module**
//!
//! Bit-packed boolean array: one validity bitmap plus one value bitmap, both
//! LSB-first.

use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::impl_array;
use crate::structs::bitmask::Bitmask;
use crate::structs::builders::boolean::BooleanBuilder;
use crate::structs::data::ArrayData;
use crate::traits::array::Array;

/// # BooleanArray
///
/// ## Example
/// ```rust
/// use nestarrow::{Array, BooleanArray};
///
/// let arr = BooleanArray::from(vec![Some(true), None, Some(false)]);
/// assert_eq!(arr.value(0), true);
/// assert!(arr.is_null(1));
/// assert_eq!(arr.iter().collect::<Vec<_>>(), vec![Some(true), None, Some(false)]);
/// ```
#[derive(Debug, Clone)]
pub struct BooleanArray {
    data: Arc<ArrayData>,
    values: Bitmask,
}

impl BooleanArray {
    /// Panics if `data` is not boolean data.
    pub fn from_data(data: Arc<ArrayData>) -> Self {
        assert!(
            matches!(data.data_type(), DataType::Boolean),
            "BooleanArray requires boolean data, got {}",
            data.data_type()
        );
        let values = match data.buffer(1) {
            Some(b) => Bitmask::new(b.clone(), data.offset(), data.len()),
            None => panic!("BooleanArray data is missing its value bitmap"),
        };
        Self { data, values }
    }

    /// Value bitmap over this array's window.
    #[inline]
    pub fn values(&self) -> &Bitmask {
        &self.values
    }

    /// Value at `i`, ignoring validity. Panics when out of range.
    #[inline]
    pub fn value(&self, i: usize) -> bool {
        self.values.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<bool>> + '_ {
        (0..self.len()).map(move |i| self.is_valid(i).then(|| self.value(i)))
    }

    /// Number of valid `true` values.
    pub fn true_count(&self) -> usize {
        (0..self.len())
            .filter(|&i| self.is_valid(i) && self.value(i))
            .count()
    }
}

impl_array!(BooleanArray);

impl From<Vec<bool>> for BooleanArray {
    fn from(values: Vec<bool>) -> Self {
        let mut b = BooleanBuilder::with_capacity(values.len());
        for v in values {
            b.append_value(v);
        }
        b.finish_boolean()
    }
}

impl From<Vec<Option<bool>>> for BooleanArray {
    fn from(values: Vec<Option<bool>>) -> Self {
        let mut b = BooleanBuilder::with_capacity(values.len());
        for v in values {
            b.append_option(v);
        }
        b.finish_boolean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_options() {
        let arr = BooleanArray::from(vec![Some(true), None, Some(false), Some(true)]);
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.null_count(), 1);
        assert_eq!(arr.true_count(), 2);
    }

    #[test]
    fn test_slice_window() {
        let arr = BooleanArray::from(vec![true, false, true, true, false, false, false, false, true]);
        let s = arr.slice(7, 2);
        let s = s.as_any().downcast_ref::<BooleanArray>().unwrap();
        assert!(!s.value(0));
        assert!(s.value(1));
    }
}
