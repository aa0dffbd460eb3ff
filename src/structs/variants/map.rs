//! # **MapArray Module** - *Maps as lists of key/value structs*
//!
//! A map array is physically identical to `list<struct<key, value>>`: one optional
//! validity bitmap, one `i32` offsets buffer and a single child holding the entries
//! struct. Entry `i` spans struct rows `offsets[i]..offsets[i + 1]`.
//!
//! The array composes a [`ListArray`] over the same buffers for offsets, nulls and
//! slot access, and exposes the `key` and `value` struct columns directly.

use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::impl_array;
use crate::structs::data::ArrayData;
use crate::structs::types::MapType;
use crate::structs::variants::list::ListArray;
use crate::structs::variants::struct_array::StructArray;
use crate::traits::array::{Array, ArrayRef};

/// # MapArray
///
/// ## Example
/// ```rust
/// use nestarrow::{Array, ArrayBuilder, Int32Builder, MapBuilder, StringBuilder};
///
/// let mut b = MapBuilder::new(StringBuilder::new(), Int32Builder::new(), false);
/// b.append(true).unwrap();
/// b.keys().append_value("a");
/// b.values().append_value(1);
/// b.append_null();
/// let map = b.finish_map();
///
/// assert_eq!(map.data_type().to_string(), "map<utf8, int32>");
/// assert_eq!(map.value_offsets(), &[0, 1, 1]);
/// assert!(map.is_null(1));
/// ```
#[derive(Debug, Clone)]
pub struct MapArray {
    data: Arc<ArrayData>,
    map_type: MapType,
    list: ListArray,
    entries: StructArray,
}

impl MapArray {
    /// Panics if `data` is not map data, or its child is not the key/value struct.
    pub fn from_data(data: Arc<ArrayData>) -> Self {
        let map_type = match data.data_type() {
            DataType::Map(t) => t.clone(),
            other => panic!("MapArray requires map data, got {other}"),
        };
        // SAFETY: a map shares the list layout over its entries struct
        let list_data = unsafe {
            data.as_ref()
                .clone()
                .with_data_type(DataType::List(map_type.as_list_type().clone()))
        };
        let list = ListArray::from_data(Arc::new(list_data));
        let entries = match list.values().as_any().downcast_ref::<StructArray>() {
            Some(s) if s.num_fields() == 2 => s.clone(),
            _ => panic!("map child must be a struct of key and value"),
        };
        Self {
            data,
            map_type,
            list,
            entries,
        }
    }

    #[inline]
    pub fn map_type(&self) -> &MapType {
        &self.map_type
    }

    #[inline]
    pub fn keys_sorted(&self) -> bool {
        self.map_type.keys_sorted()
    }

    /// Same buffers viewed as `list<struct<key, value>>`.
    #[inline]
    pub fn as_list(&self) -> &ListArray {
        &self.list
    }

    /// The entries struct across all slots.
    #[inline]
    pub fn entries(&self) -> &StructArray {
        &self.entries
    }

    /// The key column across all entries.
    #[inline]
    pub fn keys(&self) -> &ArrayRef {
        self.entries.field(0)
    }

    /// The value column across all entries.
    #[inline]
    pub fn values(&self) -> &ArrayRef {
        self.entries.field(1)
    }

    #[inline]
    pub fn value_offsets(&self) -> &[i32] {
        self.list.value_offsets()
    }

    #[inline]
    pub fn value_length(&self, i: usize) -> usize {
        self.list.value_length(i)
    }

    /// Entries of slot `i` as a zero-copy struct. Panics when out of range.
    pub fn value(&self, i: usize) -> StructArray {
        assert!(i < self.len(), "index {i} out of range for length {}", self.len());
        let o = self.value_offsets();
        let start = o[i] as usize;
        let len = (o[i + 1] - o[i]) as usize;
        StructArray::from_data(Arc::new(self.entries.data().slice(start, len)))
    }
}

impl_array!(MapArray);
