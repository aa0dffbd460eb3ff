//! # DataType Module - *Logical types and their physical shape*
//!
//! [`DataType`] describes the logical shape of every array in the crate, from the
//! fixed-width primitives through to arbitrarily nested lists, structs, maps and
//! dictionary-encoded columns.
//!
//! ## Overview
//! - Leaf types are unit variants and therefore process-wide constants
//!   (`DataType::Int32`, `DataType::Utf8`, ...). They are freely shared across threads.
//! - Nested types hold their children behind `Arc`, so cloning a type is cheap no
//!   matter how deep it is.
//! - Equality is structural and recursive: two independently constructed
//!   `DataType::map_of(k, v)` values compare equal, while a map and a sorted map over
//!   the same key/value types do not.
//! - [`DataType::layout`] reports the ordered buffer kinds an array of the type needs.
//!
//! ## Display
//! The canonical string forms are part of the public contract, e.g.
//! `map<int32, utf8>` and `map<int32, utf8, keys_sorted>`.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::enums::error::ArrayResult;
use crate::structs::field::Field;
use crate::structs::layout::{BufferKind, DataTypeLayout};
use crate::structs::types::{DictionaryType, FixedSizeListType, ListType, MapType, StructType};

/// # TypeId
///
/// Payload-free discriminant of a [`DataType`].
///
/// Used wherever two types only need to agree on their *kind*, for example when
/// checking that an index array matches the index type of a dictionary type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeId {
    Null,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Utf8,
    Binary,
    List,
    FixedSizeList,
    Struct,
    Map,
    Dictionary,
}

impl TypeId {
    /// Short lowercase name of the type kind.
    pub fn name(&self) -> &'static str {
        match self {
            TypeId::Null => "null",
            TypeId::Boolean => "bool",
            TypeId::Int8 => "int8",
            TypeId::Int16 => "int16",
            TypeId::Int32 => "int32",
            TypeId::Int64 => "int64",
            TypeId::UInt8 => "uint8",
            TypeId::UInt16 => "uint16",
            TypeId::UInt32 => "uint32",
            TypeId::UInt64 => "uint64",
            TypeId::Float32 => "float32",
            TypeId::Float64 => "float64",
            TypeId::Utf8 => "utf8",
            TypeId::Binary => "binary",
            TypeId::List => "list",
            TypeId::FixedSizeList => "fixed_size_list",
            TypeId::Struct => "struct",
            TypeId::Map => "map",
            TypeId::Dictionary => "dictionary",
        }
    }
}

impl Display for TypeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// # DataType
///
/// Logical type of an array.
///
/// ## Coverage
/// - **Primitives**: null, boolean, signed/unsigned integers, floats.
/// - **Variable width**: UTF-8 strings and opaque binary.
/// - **Nested**: `List`, `FixedSizeList`, `Struct`, `Map`.
/// - **Dictionary-encoded**: integer indices into a side dictionary of any value type.
///
/// ## Example
/// ```rust
/// use nestarrow::DataType;
///
/// let t = DataType::map_of(DataType::Int32, DataType::Utf8);
/// assert_eq!(t.to_string(), "map<int32, utf8>");
/// assert_ne!(t, DataType::sorted_map_of(DataType::Int32, DataType::Utf8));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Null,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Utf8,
    Binary,
    List(ListType),
    FixedSizeList(FixedSizeListType),
    Struct(StructType),
    Map(MapType),
    Dictionary(DictionaryType),
}

impl DataType {
    /// Variable-length list of `elem`.
    #[inline]
    pub fn list_of(elem: DataType) -> DataType {
        DataType::List(ListType::new(elem))
    }

    /// List of exactly `n` values of `elem` per slot.
    ///
    /// Panics if `n` is negative.
    #[inline]
    pub fn fixed_size_list_of(n: i32, elem: DataType) -> DataType {
        DataType::FixedSizeList(FixedSizeListType::new(n, elem))
    }

    /// Struct over `fields`, in declaration order.
    ///
    /// Panics if two fields share a name, including two empty names.
    /// See [`DataType::try_struct_of`] for the fallible variant.
    #[inline]
    pub fn struct_of(fields: impl Into<Vec<Field>>) -> DataType {
        DataType::Struct(StructType::new(fields))
    }

    /// Fallible [`DataType::struct_of`].
    #[inline]
    pub fn try_struct_of(fields: impl Into<Vec<Field>>) -> ArrayResult<DataType> {
        StructType::try_new(fields).map(DataType::Struct)
    }

    /// Map with unsorted keys.
    #[inline]
    pub fn map_of(key: DataType, value: DataType) -> DataType {
        DataType::Map(MapType::new(key, value, false))
    }

    /// Map whose keys are sorted within each entry.
    #[inline]
    pub fn sorted_map_of(key: DataType, value: DataType) -> DataType {
        DataType::Map(MapType::new(key, value, true))
    }

    /// Unordered dictionary type. Panics if `index` is not an integer type.
    #[inline]
    pub fn dict_of(index: DataType, value: DataType) -> DataType {
        DataType::Dictionary(DictionaryType::new(index, value, false))
    }

    /// Ordered dictionary type. Panics if `index` is not an integer type.
    #[inline]
    pub fn ordered_dict_of(index: DataType, value: DataType) -> DataType {
        DataType::Dictionary(DictionaryType::new(index, value, true))
    }

    /// Discriminant of this type.
    pub fn id(&self) -> TypeId {
        match self {
            DataType::Null => TypeId::Null,
            DataType::Boolean => TypeId::Boolean,
            DataType::Int8 => TypeId::Int8,
            DataType::Int16 => TypeId::Int16,
            DataType::Int32 => TypeId::Int32,
            DataType::Int64 => TypeId::Int64,
            DataType::UInt8 => TypeId::UInt8,
            DataType::UInt16 => TypeId::UInt16,
            DataType::UInt32 => TypeId::UInt32,
            DataType::UInt64 => TypeId::UInt64,
            DataType::Float32 => TypeId::Float32,
            DataType::Float64 => TypeId::Float64,
            DataType::Utf8 => TypeId::Utf8,
            DataType::Binary => TypeId::Binary,
            DataType::List(_) => TypeId::List,
            DataType::FixedSizeList(_) => TypeId::FixedSizeList,
            DataType::Struct(_) => TypeId::Struct,
            DataType::Map(_) => TypeId::Map,
            DataType::Dictionary(_) => TypeId::Dictionary,
        }
    }

    /// Short lowercase name, e.g. `"list"` or `"int32"`.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.id().name()
    }

    /// Number of bits one element occupies, for fixed-width types.
    ///
    /// Dictionary types report the width of their index type.
    pub fn bit_width(&self) -> Option<usize> {
        match self {
            DataType::Boolean => Some(1),
            DataType::Int8 | DataType::UInt8 => Some(8),
            DataType::Int16 | DataType::UInt16 => Some(16),
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => Some(32),
            DataType::Int64 | DataType::UInt64 | DataType::Float64 => Some(64),
            DataType::Dictionary(d) => Some(d.bit_width()),
            _ => None,
        }
    }

    /// Byte width of one element for byte-aligned fixed-width types.
    pub fn byte_width(&self) -> Option<usize> {
        match self.bit_width() {
            Some(bits) if bits % 8 == 0 => Some(bits / 8),
            _ => None,
        }
    }

    /// True for the eight fixed-width integer types.
    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    /// True for types whose arrays own child data.
    #[inline]
    pub fn is_nested(&self) -> bool {
        matches!(
            self,
            DataType::List(_) | DataType::FixedSizeList(_) | DataType::Struct(_) | DataType::Map(_)
        )
    }

    /// Ordered physical buffers required by an array of this type.
    pub fn layout(&self) -> DataTypeLayout {
        match self {
            DataType::Null => DataTypeLayout::new(vec![BufferKind::AlwaysNull]),
            DataType::Boolean => DataTypeLayout::new(vec![BufferKind::Bitmap, BufferKind::Bitmap]),
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64 => DataTypeLayout::new(vec![
                BufferKind::Bitmap,
                BufferKind::FixedWidth {
                    byte_width: self.byte_width().unwrap_or_default(),
                },
            ]),
            DataType::Utf8 | DataType::Binary => DataTypeLayout::new(vec![
                BufferKind::Bitmap,
                BufferKind::FixedWidth { byte_width: 4 },
                BufferKind::VariableWidth,
            ]),
            DataType::List(_) | DataType::Map(_) => DataTypeLayout::new(vec![
                BufferKind::Bitmap,
                BufferKind::FixedWidth { byte_width: 4 },
            ]),
            DataType::FixedSizeList(_) | DataType::Struct(_) => {
                DataTypeLayout::new(vec![BufferKind::Bitmap])
            }
            DataType::Dictionary(d) => d.layout(),
        }
    }

    /// Number of child data entries an array of this type carries.
    pub fn num_children(&self) -> usize {
        match self {
            DataType::List(_) | DataType::FixedSizeList(_) | DataType::Map(_) => 1,
            DataType::Struct(s) => s.num_fields(),
            _ => 0,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&ListType> {
        match self {
            DataType::List(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn as_fixed_size_list(&self) -> Option<&FixedSizeListType> {
        match self {
            DataType::FixedSizeList(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            DataType::Struct(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&MapType> {
        match self {
            DataType::Map(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn as_dictionary(&self) -> Option<&DictionaryType> {
        match self {
            DataType::Dictionary(t) => Some(t),
            _ => None,
        }
    }
}

/// Structural, recursive type equality.
#[inline]
pub fn type_equals(lhs: &DataType, rhs: &DataType) -> bool {
    lhs == rhs
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DataType::List(t) => Display::fmt(t, f),
            DataType::FixedSizeList(t) => Display::fmt(t, f),
            DataType::Struct(t) => Display::fmt(t, f),
            DataType::Map(t) => Display::fmt(t, f),
            DataType::Dictionary(t) => Display::fmt(t, f),
            leaf => f.write_str(leaf.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_types() -> Vec<DataType> {
        vec![
            DataType::Boolean,
            DataType::Int8,
            DataType::Int16,
            DataType::Int32,
            DataType::Int64,
            DataType::UInt8,
            DataType::UInt16,
            DataType::UInt32,
            DataType::UInt64,
            DataType::Float32,
            DataType::Float64,
            DataType::list_of(DataType::Int32),
            DataType::fixed_size_list_of(10, DataType::Int32),
            DataType::struct_of(vec![]),
        ]
    }

    #[test]
    fn test_list_of() {
        for elem in leaf_types() {
            let got = DataType::list_of(elem.clone());
            assert_eq!(got.id(), TypeId::List);
            assert_eq!(got.name(), "list");
            assert_eq!(got.as_list().unwrap().elem(), &elem);
            assert_eq!(got, DataType::list_of(elem));
        }
    }

    #[test]
    fn test_fixed_size_list_of() {
        for elem in leaf_types() {
            let got = DataType::fixed_size_list_of(3, elem.clone());
            assert_eq!(got.id(), TypeId::FixedSizeList);
            assert_eq!(got.name(), "fixed_size_list");
            let fsl = got.as_fixed_size_list().unwrap();
            assert_eq!(fsl.elem(), &elem);
            assert_eq!(fsl.size(), 3);
            assert_ne!(got, DataType::fixed_size_list_of(4, elem));
        }
    }

    #[test]
    #[should_panic(expected = "negative")]
    fn test_fixed_size_list_negative_len() {
        let _ = DataType::fixed_size_list_of(-1, DataType::Int32);
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(DataType::Int32.to_string(), "int32");
        assert_eq!(DataType::Utf8.to_string(), "utf8");
        assert_eq!(DataType::Boolean.to_string(), "bool");
        assert_eq!(DataType::list_of(DataType::Int64).to_string(), "list<item: int64>");
        assert_eq!(
            DataType::fixed_size_list_of(2, DataType::Float32).to_string(),
            "fixed_size_list<size=2, item: float32>"
        );
        assert_eq!(
            DataType::struct_of(vec![
                Field::new("a", DataType::Int32, false, None),
                Field::new("b", DataType::Utf8, true, None),
            ])
            .to_string(),
            "struct<a: int32, b: utf8>"
        );
        assert_eq!(
            DataType::dict_of(DataType::Int16, DataType::Utf8).to_string(),
            "dictionary<values=utf8, indices=int16, ordered=false>"
        );
    }

    #[test]
    fn test_bit_widths() {
        assert_eq!(DataType::Boolean.bit_width(), Some(1));
        assert_eq!(DataType::Int16.bit_width(), Some(16));
        assert_eq!(DataType::Float64.byte_width(), Some(8));
        assert_eq!(DataType::Boolean.byte_width(), None);
        assert_eq!(DataType::Utf8.bit_width(), None);
        assert_eq!(DataType::dict_of(DataType::Int8, DataType::Utf8).bit_width(), Some(8));
    }

    #[test]
    fn test_layouts() {
        assert_eq!(
            DataType::Int32.layout().buffers,
            vec![BufferKind::Bitmap, BufferKind::FixedWidth { byte_width: 4 }]
        );
        assert_eq!(DataType::Null.layout().buffers, vec![BufferKind::AlwaysNull]);
        assert_eq!(
            DataType::Utf8.layout().buffers,
            vec![
                BufferKind::Bitmap,
                BufferKind::FixedWidth { byte_width: 4 },
                BufferKind::VariableWidth
            ]
        );
        let list = DataType::list_of(DataType::Int8).layout();
        let map = DataType::map_of(DataType::Int8, DataType::Int8).layout();
        assert_eq!(list, map);
        assert_eq!(DataType::struct_of(vec![]).layout().buffers, vec![BufferKind::Bitmap]);
        assert!(!DataType::Int32.layout().has_dictionary);
    }

    #[test]
    fn test_num_children() {
        assert_eq!(DataType::Int32.num_children(), 0);
        assert_eq!(DataType::list_of(DataType::Int32).num_children(), 1);
        assert_eq!(DataType::map_of(DataType::Int32, DataType::Int32).num_children(), 1);
        let s = DataType::struct_of(vec![
            Field::new("x", DataType::Int32, false, None),
            Field::new("y", DataType::Int32, false, None),
            Field::new("z", DataType::Int32, false, None),
        ]);
        assert_eq!(s.num_children(), 3);
    }
}
