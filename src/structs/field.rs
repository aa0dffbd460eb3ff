//! # Field Module - *Named, typed struct members*
//!
//! A `Field` captures a struct member's name, logical data type,
//! nullability, and optional lightweight metadata.
//!
//! Fields carry no row data. They describe the children of a
//! [`DataType::Struct`](crate::DataType) and, through the map entries struct,
//! the `key` and `value` columns of a map.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::enums::datatype::DataType;

/// # Field
///
/// ## Description
/// `Field` struct supporting:
/// - Member metadata such as type, name and nullability.
/// - Light metadata, e.g. a few key-value pairs.
///
/// ### Tips:
/// - `Field` is *cloned often* when types are composed, so it is best to keep
///   metadata lightweight. Struct types hold their fields behind `Arc`.
/// - Names are kept verbatim. The empty string is a valid name, but it must
///   still be unique within one struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub metadata: BTreeMap<String, String>,
}

impl Field {
    /// Constructs a new `Field`.
    pub fn new<T: Into<String>>(
        name: T,
        data_type: DataType,
        nullable: bool,
        metadata: Option<BTreeMap<String, String>>,
    ) -> Self {
        Field {
            name: name.into(),
            data_type,
            nullable,
            metadata: metadata.unwrap_or_default(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[inline]
    pub fn has_metadata(&self) -> bool {
        !self.metadata.is_empty()
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Field \"{}\": {}{}",
            self.name,
            self.data_type,
            if self.nullable { " (nullable)" } else { "" }
        )?;

        if self.has_metadata() {
            write!(f, " [metadata: ")?;
            for (i, (k, v)) in self.metadata.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}=\"{}\"", k, v)?;
            }
            write!(f, "]")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_new_and_metadata() {
        let field = Field::new("foo", DataType::Utf8, true, None);
        assert_eq!(field.name(), "foo");
        assert_eq!(field.data_type(), &DataType::Utf8);
        assert!(!field.has_metadata());

        let mut meta = BTreeMap::new();
        meta.insert("k".to_string(), "v".to_string());
        let field2 = Field::new("bar", DataType::Int64, false, Some(meta.clone()));
        assert_eq!(field2.metadata, meta);
        assert_eq!(field2.to_string(), "Field \"bar\": int64 [metadata: k=\"v\"]");
    }

    #[test]
    fn test_field_keeps_empty_name() {
        let f = Field::new("", DataType::Int32, false, None);
        assert_eq!(f.name(), "");
        assert_eq!(f.to_string(), "Field \"\": int32");
    }

    #[test]
    fn test_field_equality_includes_nullability() {
        let a = Field::new("x", DataType::Int32, true, None);
        let b = Field::new("x", DataType::Int32, false, None);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
