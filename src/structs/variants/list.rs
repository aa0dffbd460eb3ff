//! # **ListArray Module**
//!
//! Variable-length lists. Slot `i` covers child rows `offsets[i]..offsets[i + 1]`
//! of a single child array.

use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::impl_array;
use crate::structs::data::ArrayData;
use crate::traits::array::{Array, ArrayRef, make_array};

/// # ListArray
///
/// ## Example
/// ```rust
/// use nestarrow::{Array, ArrayBuilder, Int32Array, Int32Builder, ListBuilder};
///
/// let mut b = ListBuilder::new(Int32Builder::new());
/// b.append(true);
/// b.values_mut().append_value(1);
/// b.values_mut().append_value(2);
/// b.append_null();
/// b.append(true);
/// b.values_mut().append_value(3);
/// let list = b.finish_list();
///
/// assert_eq!(list.value_offsets(), &[0, 2, 2, 3]);
/// let first = list.value(0);
/// let first = first.as_any().downcast_ref::<Int32Array>().unwrap();
/// assert_eq!(first.values(), &[1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct ListArray {
    data: Arc<ArrayData>,
    values: ArrayRef,
}

impl ListArray {
    /// Panics if `data` is not list data.
    pub fn from_data(data: Arc<ArrayData>) -> Self {
        assert!(
            matches!(data.data_type(), DataType::List(_)),
            "ListArray requires list data, got {}",
            data.data_type()
        );
        assert_eq!(data.child_data().len(), 1, "list data must carry exactly one child");
        let values = make_array(data.child(0).clone());
        Self { data, values }
    }

    /// The full child array. Offsets index into it.
    #[inline]
    pub fn values(&self) -> &ArrayRef {
        &self.values
    }

    #[inline]
    pub fn value_offsets(&self) -> &[i32] {
        self.data.value_offsets()
    }

    #[inline]
    pub fn value_length(&self, i: usize) -> usize {
        let o = self.value_offsets();
        (o[i + 1] - o[i]) as usize
    }

    /// Child rows of slot `i` as a zero-copy array. Panics when out of range.
    pub fn value(&self, i: usize) -> ArrayRef {
        assert!(i < self.len(), "index {i} out of range for length {}", self.len());
        let o = self.value_offsets();
        self.values
            .slice(o[i] as usize, (o[i + 1] - o[i]) as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<ArrayRef>> + '_ {
        (0..self.len()).map(move |i| self.is_valid(i).then(|| self.value(i)))
    }
}

impl_array!(ListArray);
