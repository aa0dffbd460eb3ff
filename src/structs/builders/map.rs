//! # MapBuilder Module - *Incremental maps over key and value builders*
//!
//! A map builder is a list builder over a key/value entries builder. Opening an
//! entry with `append(true)` records the current entry count as the slot offset;
//! keys and values are then appended through [`MapBuilder::keys`] and
//! [`MapBuilder::values`], one key per value.
//!
//! Finishing produces `list<struct<key, value>>` data re-tagged as a map type
//! that carries the builder's `keys_sorted` flag.

use std::any::Any;
use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::enums::error::{ArrayError, ArrayResult};
use crate::structs::allocator::{Allocator, default_allocator};
use crate::structs::builders::base::MIN_BUILDER_CAPACITY;
use crate::structs::builders::list::ListBuilder;
use crate::structs::data::ArrayData;
use crate::structs::types::MapType;
use crate::structs::variants::map::MapArray;
use crate::traits::builder::ArrayBuilder;

/// Builds the non-null `{key, value}` entries struct of a map.
///
/// Its length is the number of keys. Keys and values must be appended in pairs.
#[derive(Debug)]
pub struct MapEntriesBuilder<K: ArrayBuilder, V: ArrayBuilder> {
    keys: K,
    items: V,
}

impl<K: ArrayBuilder, V: ArrayBuilder> MapEntriesBuilder<K, V> {
    pub fn new(keys: K, items: V) -> Self {
        Self { keys, items }
    }

    #[inline]
    pub fn keys(&mut self) -> &mut K {
        &mut self.keys
    }

    #[inline]
    pub fn items(&mut self) -> &mut V {
        &mut self.items
    }

    fn map_type(&self, keys_sorted: bool) -> MapType {
        MapType::new(self.keys.data_type(), self.items.data_type(), keys_sorted)
    }
}

impl<K: ArrayBuilder, V: ArrayBuilder> ArrayBuilder for MapEntriesBuilder<K, V> {
    fn data_type(&self) -> DataType {
        self.map_type(false).entries_type().clone()
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn null_count(&self) -> usize {
        0
    }

    fn capacity(&self) -> usize {
        self.keys.capacity().min(self.items.capacity())
    }

    /// Appends a null key and a null value. The finished map then fails
    /// [`ArrayData::validate`], since map keys must not be null.
    fn append_null(&mut self) {
        self.keys.append_null();
        self.items.append_null();
    }

    fn reserve(&mut self, additional: usize) {
        self.keys.reserve(additional);
        self.items.reserve(additional);
    }

    fn resize(&mut self, capacity: usize) {
        self.keys.resize(capacity);
        self.items.resize(capacity);
    }

    fn finish_data(&mut self) -> ArrayData {
        let len = self.keys.len();
        assert_eq!(
            len,
            self.items.len(),
            "map builder holds {len} keys but {} values",
            self.items.len()
        );
        let data_type = self.data_type();
        let keys = self.keys.finish_data();
        let items = self.items.finish_data();
        // SAFETY: both children hold len rows; the entries struct is never null
        unsafe {
            ArrayData::new_unchecked(
                data_type,
                len,
                0,
                Some(0),
                vec![None],
                vec![Arc::new(keys), Arc::new(items)],
                None,
            )
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_box_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// # MapBuilder
///
/// ## Example
/// ```rust
/// use nestarrow::{Array, ArrayBuilder, Int32Builder, MapBuilder};
///
/// let mut b = MapBuilder::new(Int32Builder::new(), Int32Builder::new(), true);
/// b.append(true).unwrap();
/// b.keys().append_value(1);
/// b.values().append_value(10);
/// b.append(false).unwrap();
/// assert_eq!(b.len(), 2);
/// assert_eq!(b.null_count(), 1);
///
/// let map = b.finish_map();
/// assert_eq!(map.data_type().to_string(), "map<int32, int32, keys_sorted>");
/// assert!(b.is_empty());
/// ```
#[derive(Debug)]
pub struct MapBuilder<K: ArrayBuilder, V: ArrayBuilder> {
    list: ListBuilder<MapEntriesBuilder<K, V>>,
    keys_sorted: bool,
}

impl<K: ArrayBuilder, V: ArrayBuilder> MapBuilder<K, V> {
    pub fn new(keys: K, values: V, keys_sorted: bool) -> Self {
        Self::new_in(default_allocator(), keys, values, keys_sorted)
    }

    pub fn new_in(allocator: Arc<dyn Allocator>, keys: K, values: V, keys_sorted: bool) -> Self {
        Self {
            list: ListBuilder::new_in(allocator, MapEntriesBuilder::new(keys, values)),
            keys_sorted,
        }
    }

    /// Opens a new entry, or appends a null entry when `is_valid` is false.
    ///
    /// # Errors
    /// `InvalidArgument` when the previous entry was left with a different number
    /// of keys and values.
    pub fn append(&mut self, is_valid: bool) -> ArrayResult<()> {
        let entries = self.list.values();
        if entries.keys.len() != entries.items.len() {
            return Err(ArrayError::InvalidArgument {
                message: format!(
                    "map entry has {} keys but {} values",
                    entries.keys.len(),
                    entries.items.len()
                ),
            });
        }
        self.list.append(is_valid);
        Ok(())
    }

    /// Key builder of the open entry.
    #[inline]
    pub fn keys(&mut self) -> &mut K {
        self.list.values_mut().keys()
    }

    /// Value builder of the open entry.
    #[inline]
    pub fn values(&mut self) -> &mut V {
        self.list.values_mut().items()
    }

    #[inline]
    pub fn keys_sorted(&self) -> bool {
        self.keys_sorted
    }

    /// The map type this builder produces.
    pub fn map_type(&self) -> MapType {
        self.list.values().map_type(self.keys_sorted)
    }

    /// Finalizes into a [`MapArray`] and resets the builder.
    pub fn finish_map(&mut self) -> MapArray {
        MapArray::from_data(Arc::new(self.finish_data()))
    }
}

impl<K: ArrayBuilder, V: ArrayBuilder> ArrayBuilder for MapBuilder<K, V> {
    fn data_type(&self) -> DataType {
        DataType::Map(self.map_type())
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn null_count(&self) -> usize {
        self.list.null_count()
    }

    fn capacity(&self) -> usize {
        self.list.capacity()
    }

    fn append_null(&mut self) {
        self.list.append(false);
    }

    fn reserve(&mut self, additional: usize) {
        self.list.reserve(additional);
        self.list.values_mut().reserve(additional);
    }

    fn resize(&mut self, capacity: usize) {
        let capacity = capacity.max(MIN_BUILDER_CAPACITY);
        self.list.resize(capacity);
        self.list.values_mut().resize(capacity);
    }

    fn finish_data(&mut self) -> ArrayData {
        let data_type = self.data_type();
        self.list.finish_as(data_type)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_box_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::builders::primitive::PrimitiveBuilder;
    use crate::structs::builders::string::StringBuilder;
    use crate::traits::array::Array;

    fn builder() -> MapBuilder<StringBuilder, PrimitiveBuilder<i64>> {
        MapBuilder::new(StringBuilder::new(), PrimitiveBuilder::<i64>::new(), false)
    }

    #[test]
    fn test_len_and_nulls_track_list() {
        let mut b = builder();
        b.append(true).unwrap();
        b.append(false).unwrap();
        b.append_null();
        assert_eq!(b.len(), 3);
        assert_eq!(b.null_count(), 2);
    }

    #[test]
    fn test_unbalanced_entry_rejected() {
        let mut b = builder();
        b.append(true).unwrap();
        b.keys().append_value("k");
        let err = b.append(true).unwrap_err();
        assert!(matches!(err, ArrayError::InvalidArgument { .. }));
        b.values().append_value(1);
        assert!(b.append(true).is_ok());
    }

    #[test]
    fn test_reserve_and_resize_propagate() {
        let mut b = builder();
        b.reserve(100);
        assert!(b.capacity() >= 100);
        assert!(b.list.values().keys.capacity() >= 100);
        assert!(b.list.values().items.capacity() >= 100);

        b.resize(5);
        assert_eq!(b.capacity(), MIN_BUILDER_CAPACITY);
        assert_eq!(b.list.values().keys.capacity(), MIN_BUILDER_CAPACITY);
        assert_eq!(b.list.values().items.capacity(), MIN_BUILDER_CAPACITY);
    }

    #[test]
    fn test_finish_resets_for_reuse() {
        let mut b = builder();
        b.append(true).unwrap();
        b.keys().append_value("a");
        b.values().append_value(1);
        let first = b.finish_map();
        assert!(b.is_empty());

        b.append(true).unwrap();
        b.keys().append_value("z");
        b.values().append_value(26);
        b.keys().append_value("y");
        b.values().append_value(25);
        let second = b.finish_map();

        assert_eq!(first.value_offsets(), &[0, 1]);
        assert_eq!(second.value_offsets(), &[0, 2]);
        assert_eq!(second.keys().len(), 2);
        first.data().validate_full().unwrap();
        second.data().validate_full().unwrap();
    }

    #[test]
    fn test_null_key_fails_validation() {
        let mut b = builder();
        b.append(true).unwrap();
        b.keys().append_null();
        b.values().append_value(1);
        let err = b.finish_map().data().validate_full().unwrap_err();
        assert!(err.to_string().contains("map keys must not be null"));
    }

    #[test]
    fn test_map_type_matches_entries() {
        let b = builder();
        let t = b.map_type();
        assert_eq!(t.key_type(), &DataType::Utf8);
        assert_eq!(t.value_type(), &DataType::Int64);
        assert_eq!(b.data_type().to_string(), "map<utf8, int64>");
    }
}
