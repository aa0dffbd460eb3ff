//! # Nested Types Module - *Payloads of the nested DataType variants*
//!
//! Holds the parameters of the nested and dictionary [`DataType`] variants.
//! Every child type is kept behind `Arc`, so nested types clone in O(1).
//!
//! A map type is not a separate shape: it is a [`ListType`] over a two-field
//! struct of `key` (never null) and `value` (nullable), plus a `keys_sorted` flag.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::enums::error::{ArrayError, ArrayResult};
use crate::structs::field::Field;
use crate::structs::layout::DataTypeLayout;

#[cfg(feature = "fast_hash")]
type FieldIndex = ahash::AHashMap<String, usize>;
#[cfg(not(feature = "fast_hash"))]
type FieldIndex = std::collections::HashMap<String, usize>;

/// Name of the key column inside a map's entries struct.
pub const MAP_KEY_NAME: &str = "key";
/// Name of the value column inside a map's entries struct.
pub const MAP_VALUE_NAME: &str = "value";
/// Name of the entries struct field.
pub const MAP_ENTRIES_NAME: &str = "entries";

/// Variable-length list of a single element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListType {
    elem: Arc<DataType>,
}

impl ListType {
    pub fn new(elem: DataType) -> Self {
        Self {
            elem: Arc::new(elem),
        }
    }

    #[inline]
    pub fn elem(&self) -> &DataType {
        &self.elem
    }
}

impl Display for ListType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "list<item: {}>", self.elem)
    }
}

/// List with exactly `n` child values per slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSizeListType {
    elem: Arc<DataType>,
    n: i32,
}

impl FixedSizeListType {
    pub fn new(n: i32, elem: DataType) -> Self {
        assert!(n >= 0, "fixed_size_list length must not be negative, got {n}");
        Self {
            elem: Arc::new(elem),
            n,
        }
    }

    #[inline]
    pub fn elem(&self) -> &DataType {
        &self.elem
    }

    /// Number of child values per slot.
    #[inline]
    pub fn size(&self) -> usize {
        self.n as usize
    }
}

impl Display for FixedSizeListType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "fixed_size_list<size={}, item: {}>", self.n, self.elem)
    }
}

/// # StructType
///
/// Ordered set of uniquely named fields with an O(1) name lookup.
///
/// Equality only considers the fields, so two struct types built from the same
/// field list compare equal regardless of how the lookup index was hashed.
#[derive(Debug, Clone)]
pub struct StructType {
    fields: Arc<[Field]>,
    index: Arc<FieldIndex>,
}

impl StructType {
    /// Panics on a duplicate field name.
    pub fn new(fields: impl Into<Vec<Field>>) -> Self {
        match Self::try_new(fields) {
            Ok(t) => t,
            Err(e) => panic!("{e}"),
        }
    }

    /// Builds the struct type, returning `InvalidSchema` on a duplicate field name.
    pub fn try_new(fields: impl Into<Vec<Field>>) -> ArrayResult<Self> {
        let fields: Vec<Field> = fields.into();
        let mut index = FieldIndex::default();
        for (i, f) in fields.iter().enumerate() {
            if index.insert(f.name.clone(), i).is_some() {
                return Err(ArrayError::InvalidSchema {
                    message: format!("duplicate field name \"{}\" in struct type", f.name),
                });
            }
        }
        Ok(Self {
            fields: fields.into(),
            index: Arc::new(index),
        })
    }

    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[inline]
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Field at position `i`. Panics when out of range.
    #[inline]
    pub fn field(&self, i: usize) -> &Field {
        &self.fields[i]
    }

    #[inline]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[inline]
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.field_index(name).map(|i| &self.fields[i])
    }
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields) || self.fields == other.fields
    }
}

impl Eq for StructType {}

impl Display for StructType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("struct<")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field.name, field.data_type)?;
        }
        f.write_str(">")
    }
}

/// # MapType
///
/// Map from `key` to `value`, physically a list of `{key, value}` structs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapType {
    entries: ListType,
    keys_sorted: bool,
}

impl MapType {
    pub fn new(key: DataType, value: DataType, keys_sorted: bool) -> Self {
        let entries = DataType::struct_of(vec![
            Field::new(MAP_KEY_NAME, key, false, None),
            Field::new(MAP_VALUE_NAME, value, true, None),
        ]);
        Self {
            entries: ListType::new(entries),
            keys_sorted,
        }
    }

    /// The `struct<key: K, value: V>` entries type.
    #[inline]
    pub fn entries_type(&self) -> &DataType {
        self.entries.elem()
    }

    /// The backing `list<struct<key, value>>` type.
    #[inline]
    pub fn as_list_type(&self) -> &ListType {
        &self.entries
    }

    #[inline]
    pub fn key_type(&self) -> &DataType {
        &self.entries_struct().field(0).data_type
    }

    #[inline]
    pub fn value_type(&self) -> &DataType {
        &self.entries_struct().field(1).data_type
    }

    #[inline]
    pub fn keys_sorted(&self) -> bool {
        self.keys_sorted
    }

    #[inline]
    fn entries_struct(&self) -> &StructType {
        match self.entries.elem() {
            DataType::Struct(s) => s,
            other => unreachable!("map entries must be a struct, found {other}"),
        }
    }
}

impl Display for MapType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "map<{}, {}", self.key_type(), self.value_type())?;
        if self.keys_sorted {
            f.write_str(", keys_sorted")?;
        }
        f.write_str(">")
    }
}

/// # DictionaryType
///
/// Integer indices into a side dictionary of `value` typed entries.
///
/// The index type must be one of the fixed-width integer types. Arrays of a
/// dictionary type carry the index buffers only, the dictionary rides alongside
/// as separate data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryType {
    index: Arc<DataType>,
    value: Arc<DataType>,
    ordered: bool,
}

impl DictionaryType {
    pub fn new(index: DataType, value: DataType, ordered: bool) -> Self {
        assert!(
            index.is_integer(),
            "dictionary index type must be an integer type, got {index}"
        );
        Self {
            index: Arc::new(index),
            value: Arc::new(value),
            ordered,
        }
    }

    #[inline]
    pub fn index_type(&self) -> &DataType {
        &self.index
    }

    #[inline]
    pub fn value_type(&self) -> &DataType {
        &self.value
    }

    #[inline]
    pub fn ordered(&self) -> bool {
        self.ordered
    }

    /// Bit width of the index type.
    #[inline]
    pub fn bit_width(&self) -> usize {
        self.index.bit_width().unwrap_or_default()
    }

    /// Layout of the index type with the dictionary flag raised.
    pub fn layout(&self) -> DataTypeLayout {
        let mut layout = self.index.layout();
        layout.has_dictionary = true;
        layout
    }
}

impl Display for DictionaryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "dictionary<values={}, indices={}, ordered={}>",
            self.value, self.index, self.ordered
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::layout::BufferKind;

    #[test]
    fn test_map_of_string_forms() {
        let cases = [
            (DataType::Int32, DataType::Utf8, false, "map<int32, utf8>"),
            (DataType::Int32, DataType::Utf8, true, "map<int32, utf8, keys_sorted>"),
            (
                DataType::Utf8,
                DataType::list_of(DataType::Float64),
                false,
                "map<utf8, list<item: float64>>",
            ),
        ];
        for (k, v, sorted, want) in cases {
            let t = MapType::new(k.clone(), v.clone(), sorted);
            assert_eq!(t.to_string(), want);
            assert_eq!(t.key_type(), &k);
            assert_eq!(t.value_type(), &v);
            assert_eq!(t.keys_sorted(), sorted);
        }
    }

    #[test]
    fn test_map_entries_shape() {
        let t = MapType::new(DataType::Int16, DataType::Boolean, false);
        let entries = t.entries_type().as_struct().unwrap();
        assert_eq!(entries.num_fields(), 2);
        assert_eq!(entries.field(0).name, MAP_KEY_NAME);
        assert!(!entries.field(0).nullable);
        assert_eq!(entries.field(1).name, MAP_VALUE_NAME);
        assert!(entries.field(1).nullable);
    }

    #[test]
    fn test_map_equality_respects_sorted_flag() {
        let a = DataType::map_of(DataType::Int32, DataType::Utf8);
        let b = DataType::map_of(DataType::Int32, DataType::Utf8);
        let c = DataType::sorted_map_of(DataType::Int32, DataType::Utf8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, DataType::map_of(DataType::Int64, DataType::Utf8));
    }

    #[test]
    fn test_struct_lookup() {
        let t = StructType::new(vec![
            Field::new("f1", DataType::Int32, true, None),
            Field::new("", DataType::Utf8, false, None),
        ]);
        assert_eq!(t.field_index("f1"), Some(0));
        assert_eq!(t.field_index(""), Some(1));
        assert_eq!(t.field_by_name("missing"), None);
        assert_eq!(t.field_by_name("").unwrap().data_type, DataType::Utf8);
    }

    #[test]
    #[should_panic(expected = "duplicate field name")]
    fn test_struct_duplicate_empty_names_panic() {
        let _ = StructType::new(vec![
            Field::new("", DataType::Int32, false, None),
            Field::new("", DataType::Int64, false, None),
        ]);
    }

    #[test]
    fn test_try_struct_of_duplicate() {
        let err = DataType::try_struct_of(vec![
            Field::new("a", DataType::Int32, false, None),
            Field::new("a", DataType::Int32, false, None),
        ])
        .unwrap_err();
        assert!(matches!(err, ArrayError::InvalidSchema { .. }));
    }

    #[test]
    fn test_dictionary_type() {
        let t = DictionaryType::new(DataType::Int16, DataType::Utf8, true);
        assert_eq!(t.bit_width(), 16);
        assert!(t.ordered());
        let layout = t.layout();
        assert!(layout.has_dictionary);
        assert_eq!(
            layout.buffers,
            vec![BufferKind::Bitmap, BufferKind::FixedWidth { byte_width: 2 }]
        );
        assert_eq!(layout.buffers, DataType::Int16.layout().buffers);
    }

    #[test]
    #[should_panic(expected = "must be an integer type")]
    fn test_dictionary_non_integer_index_panics() {
        let _ = DictionaryType::new(DataType::Float32, DataType::Utf8, false);
    }
}
