//! # nestarrow
//!
//! Arrow-compatible in-memory columnar arrays with nested types.
//!
//! - [`DataType`] describes leaf and nested logical types: list, fixed-size list,
//!   struct, map and dictionary.
//! - [`Buffer`] is an immutable, reference counted, 64-byte aligned byte region;
//!   [`MutableBuffer`] is its growable counterpart and hands over its memory without copying.
//! - [`ArrayData`] is the type-erased node of buffers, children and an optional
//!   dictionary that every array view reads through.
//! - Builders implement [`ArrayBuilder`] and compose for nested types;
//!   [`MapBuilder`] builds maps as lists of key/value structs.
//! - [`DictionaryArray::try_new_from_arrays`] validates index bounds, in parallel
//!   with the `parallel_proc` feature.
//!
//! ## Example
//! ```rust
//! use nestarrow::{Array, ArrayBuilder, Int64Builder, MapBuilder, StringBuilder};
//!
//! let mut b = MapBuilder::new(StringBuilder::new(), Int64Builder::new(), false);
//! b.append(true).unwrap();
//! b.keys().append_value("a");
//! b.values().append_value(1);
//! b.append_null();
//!
//! let map = b.finish_map();
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.value_offsets(), &[0, 1, 1]);
//! assert_eq!(map.data_type().to_string(), "map<utf8, int64>");
//! ```

pub mod enums {
    pub mod datatype;
    pub mod error;
}

pub mod structs {
    pub mod variants {
        pub mod boolean;
        pub mod dictionary;
        pub mod fixed_size_list;
        pub mod list;
        pub mod map;
        pub mod null;
        pub mod primitive;
        pub mod string;
        pub mod struct_array;
    }
    pub mod builders {
        pub mod base;
        pub mod boolean;
        pub mod factory;
        pub mod fixed_size_list;
        pub mod list;
        pub mod map;
        pub mod null;
        pub mod primitive;
        pub mod string;
        pub mod struct_builder;
    }
    pub mod allocator;
    pub mod bitmask;
    pub mod buffer;
    pub mod data;
    pub mod field;
    pub mod layout;
    pub mod mutable_buffer;
    pub mod refcount;
    pub mod types;
}

pub mod traits {
    pub mod array;
    pub mod builder;
    pub mod type_unions;
}

pub mod aliases;
pub mod equal;
pub mod macros;
pub mod utils;

pub use aliases::{
    Float32Array, Float32Builder, Float64Array, Float64Builder, Int8Array, Int8Builder,
    Int16Array, Int16Builder, Int32Array, Int32Builder, Int64Array, Int64Builder, UInt8Array,
    UInt8Builder, UInt16Array, UInt16Builder, UInt32Array, UInt32Builder, UInt64Array,
    UInt64Builder,
};
pub use enums::datatype::{DataType, TypeId, type_equals};
pub use enums::error::{ArrayError, ArrayResult};
pub use equal::{array_equal, data_equal};

pub use structs::allocator::{ALIGNMENT, Alloc64, Allocator, CheckedAllocator, default_allocator};
pub use structs::bitmask::Bitmask;
pub use structs::buffer::Buffer;
pub use structs::builders::base::MIN_BUILDER_CAPACITY;
pub use structs::builders::boolean::BooleanBuilder;
pub use structs::builders::factory::new_builder;
pub use structs::builders::fixed_size_list::FixedSizeListBuilder;
pub use structs::builders::list::ListBuilder;
pub use structs::builders::map::{MapBuilder, MapEntriesBuilder};
pub use structs::builders::null::NullBuilder;
pub use structs::builders::primitive::PrimitiveBuilder;
pub use structs::builders::string::{BinaryBuilder, GenericByteBuilder, StringBuilder};
pub use structs::builders::struct_builder::StructBuilder;
pub use structs::data::ArrayData;
pub use structs::field::Field;
pub use structs::layout::{BufferKind, DataTypeLayout};
pub use structs::mutable_buffer::MutableBuffer;
pub use structs::refcount::RefCount;
pub use structs::types::{DictionaryType, FixedSizeListType, ListType, MapType, StructType};
pub use structs::variants::boolean::BooleanArray;
pub use structs::variants::dictionary::{
    DictionaryArray, PARALLEL_VALIDATION_THRESHOLD, validate_dictionary_indices,
};
pub use structs::variants::fixed_size_list::FixedSizeListArray;
pub use structs::variants::list::ListArray;
pub use structs::variants::map::MapArray;
pub use structs::variants::null::NullArray;
pub use structs::variants::primitive::PrimitiveArray;
pub use structs::variants::string::{
    BinaryArray, BinaryType, ByteArrayType, GenericByteArray, StringArray, Utf8Type,
};
pub use structs::variants::struct_array::StructArray;
pub use traits::array::{Array, ArrayRef, make_array};
pub use traits::builder::ArrayBuilder;
pub use traits::type_unions::{DictionaryKey, NativeType};
