//! # **StructArray Module**
//!
//! Rows of named, typed columns. A struct holds only a validity bitmap; each
//! field is a child array with one row per struct row.

use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::enums::error::{ArrayError, ArrayResult};
use crate::impl_array;
use crate::structs::buffer::Buffer;
use crate::structs::data::ArrayData;
use crate::structs::field::Field;
use crate::traits::array::{Array, ArrayRef, make_array};

/// # StructArray
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use nestarrow::{Array, ArrayRef, DataType, Field, Int32Array, StringArray, StructArray};
///
/// let ids: ArrayRef = Arc::new(Int32Array::from_slice(&[1, 2]));
/// let names: ArrayRef = Arc::new(StringArray::from(vec!["a", "b"]));
/// let s = StructArray::try_new(
///     vec![
///         Field::new("id", DataType::Int32, false, None),
///         Field::new("name", DataType::Utf8, true, None),
///     ],
///     vec![ids, names],
///     None,
/// )
/// .unwrap();
/// assert_eq!(s.len(), 2);
/// assert_eq!(s.column_by_name("name").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct StructArray {
    data: Arc<ArrayData>,
    fields: Vec<ArrayRef>,
}

impl StructArray {
    /// Panics if `data` is not struct data.
    pub fn from_data(data: Arc<ArrayData>) -> Self {
        assert!(
            matches!(data.data_type(), DataType::Struct(_)),
            "StructArray requires struct data, got {}",
            data.data_type()
        );
        let fields = data.child_data().iter().cloned().map(make_array).collect();
        Self { data, fields }
    }

    /// Assembles a struct from equally long columns and an optional validity bitmap.
    pub fn try_new(
        fields: Vec<Field>,
        columns: Vec<ArrayRef>,
        validity: Option<Buffer>,
    ) -> ArrayResult<Self> {
        if fields.len() != columns.len() {
            return Err(ArrayError::InvalidArgument {
                message: format!(
                    "struct has {} fields but {} columns were supplied",
                    fields.len(),
                    columns.len()
                ),
            });
        }
        let len = columns.first().map_or(0, |c| c.len());
        let data_type = DataType::try_struct_of(fields)?;
        let children = columns.iter().map(|c| c.data().clone()).collect();
        let data = ArrayData::try_new(data_type, len, 0, None, vec![validity], children, None)?;
        Ok(Self::from_data(Arc::new(data)))
    }

    #[inline]
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// All columns, in field order.
    #[inline]
    pub fn columns(&self) -> &[ArrayRef] {
        &self.fields
    }

    /// Column `i`. Panics when out of range.
    #[inline]
    pub fn field(&self, i: usize) -> &ArrayRef {
        &self.fields[i]
    }

    pub fn column_by_name(&self, name: &str) -> Option<&ArrayRef> {
        match self.data.data_type() {
            DataType::Struct(t) => t.field_index(name).map(|i| &self.fields[i]),
            _ => None,
        }
    }
}

impl_array!(StructArray);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::Int32Array;
    use crate::structs::variants::boolean::BooleanArray;

    #[test]
    fn test_try_new_length_mismatch() {
        let a: ArrayRef = Arc::new(Int32Array::from_slice(&[1, 2]));
        let b: ArrayRef = Arc::new(Int32Array::from_slice(&[1]));
        let err = StructArray::try_new(
            vec![
                Field::new("a", DataType::Int32, false, None),
                Field::new("b", DataType::Int32, false, None),
            ],
            vec![a, b],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ArrayError::InvalidData { .. }));
    }

    #[test]
    fn test_slice_aligns_children() {
        let a: ArrayRef = Arc::new(Int32Array::from_slice(&[1, 2, 3]));
        let b: ArrayRef = Arc::new(BooleanArray::from(vec![true, false, true]));
        let s = StructArray::try_new(
            vec![
                Field::new("a", DataType::Int32, false, None),
                Field::new("b", DataType::Boolean, false, None),
            ],
            vec![a, b],
            Some(Buffer::from_slice(&[0b0000_0101u8])),
        )
        .unwrap();
        assert_eq!(s.null_count(), 1);

        let sliced = s.slice(1, 2);
        let sliced = sliced.as_any().downcast_ref::<StructArray>().unwrap();
        assert!(sliced.is_null(0));
        let a = sliced.field(0).as_any().downcast_ref::<Int32Array>().unwrap();
        assert_eq!(a.values(), &[2, 3]);
        assert!(sliced.column_by_name("missing").is_none());
    }
}
