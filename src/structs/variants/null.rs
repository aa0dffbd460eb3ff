//! # **NullArray Module**
//!
//! Array of the `null` type: every slot is null and no buffer memory is held.

use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::impl_array;
use crate::structs::data::ArrayData;

#[derive(Debug, Clone)]
pub struct NullArray {
    data: Arc<ArrayData>,
}

impl NullArray {
    /// `len` nulls.
    pub fn new(len: usize) -> Self {
        // SAFETY: the null layout has a single absent buffer and no children
        let data = unsafe {
            ArrayData::new_unchecked(DataType::Null, len, 0, Some(len), vec![None], vec![], None)
        };
        Self {
            data: Arc::new(data),
        }
    }

    /// Panics if `data` is not of the null type.
    pub fn from_data(data: Arc<ArrayData>) -> Self {
        assert!(
            matches!(data.data_type(), DataType::Null),
            "NullArray requires null data, got {}",
            data.data_type()
        );
        Self { data }
    }
}

impl_array!(NullArray);
