//! # **FixedSizeListArray Module**
//!
//! Lists of exactly `n` child values per slot. There is no offsets buffer: slot
//! `i` covers child rows `(offset + i) * n .. (offset + i + 1) * n`.

use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::impl_array;
use crate::structs::data::ArrayData;
use crate::traits::array::{Array, ArrayRef, make_array};

#[derive(Debug, Clone)]
pub struct FixedSizeListArray {
    data: Arc<ArrayData>,
    values: ArrayRef,
    size: usize,
}

impl FixedSizeListArray {
    /// Panics if `data` is not fixed size list data.
    pub fn from_data(data: Arc<ArrayData>) -> Self {
        let size = match data.data_type() {
            DataType::FixedSizeList(t) => t.size(),
            other => panic!("FixedSizeListArray requires fixed_size_list data, got {other}"),
        };
        assert_eq!(data.child_data().len(), 1, "fixed_size_list data must carry exactly one child");
        let values = make_array(data.child(0).clone());
        Self { data, values, size }
    }

    #[inline]
    pub fn values(&self) -> &ArrayRef {
        &self.values
    }

    /// Child values per slot.
    #[inline]
    pub fn value_length(&self) -> usize {
        self.size
    }

    /// Child rows of slot `i`. Panics when out of range.
    pub fn value(&self, i: usize) -> ArrayRef {
        assert!(i < self.len(), "index {i} out of range for length {}", self.len());
        self.values.slice((self.offset() + i) * self.size, self.size)
    }
}

impl_array!(FixedSizeListArray);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::Int16Array;
    use crate::traits::builder::ArrayBuilder;
    use crate::structs::builders::fixed_size_list::FixedSizeListBuilder;
    use crate::structs::builders::primitive::PrimitiveBuilder;

    #[test]
    fn test_value_windows() {
        let mut b = FixedSizeListBuilder::new(PrimitiveBuilder::<i16>::new(), 2);
        b.append(true);
        b.values_mut().append_slice(&[1, 2]);
        b.append_null();
        b.append(true);
        b.values_mut().append_slice(&[5, 6]);
        let arr = b.finish_fixed_size_list();

        assert_eq!(arr.len(), 3);
        assert_eq!(arr.null_count(), 1);
        assert_eq!(arr.values().len(), 6);
        let v = arr.value(2);
        assert_eq!(v.as_any().downcast_ref::<Int16Array>().unwrap().values(), &[5, 6]);

        let s = arr.slice(2, 1);
        let s = s.as_any().downcast_ref::<FixedSizeListArray>().unwrap();
        let v = s.value(0);
        assert_eq!(v.as_any().downcast_ref::<Int16Array>().unwrap().values(), &[5, 6]);
    }
}
