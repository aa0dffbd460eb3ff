//! # **DictionaryArray Module** - *Dictionary-encoded arrays*
//!
//! A dictionary array stores small signed integer indices and carries the distinct
//! values as a separate dictionary array. Its buffers are exactly the index
//! buffers; the dictionary rides alongside in [`ArrayData::dictionary`].
//!
//! ## Validation
//! [`DictionaryArray::try_new_from_arrays`] checks the index type against the
//! dictionary type, then runs one generic bounds checker over the index values:
//! every non-null index `v` must satisfy `0 <= v < dictionary.len()`. The first
//! offending position is reported.
//!
//! With the `parallel_proc` feature, large index arrays are scanned on `Rayon`.
//! The reported position is still the first one in index order.

use std::sync::Arc;

#[cfg(feature = "parallel_proc")]
use rayon::prelude::*;

use crate::enums::datatype::DataType;
use crate::enums::error::{ArrayError, ArrayResult};
use crate::impl_array;
use crate::structs::data::ArrayData;
use crate::structs::types::DictionaryType;
use crate::traits::array::{Array, ArrayRef, make_array};
use crate::traits::type_unions::DictionaryKey;
use crate::utils::get_bit;

/// Index arrays at least this long are bounds checked in parallel when the
/// `parallel_proc` feature is enabled.
pub const PARALLEL_VALIDATION_THRESHOLD: usize = 1 << 16;

/// # DictionaryArray
///
/// ## Example
/// ```rust
/// use nestarrow::{Array, DataType, DictionaryArray, Int8Array, StringArray};
///
/// let t = DataType::dict_of(DataType::Int8, DataType::Utf8);
/// let indices = Int8Array::from(vec![Some(1), None, Some(0), Some(1)]);
/// let dict = StringArray::from(vec!["lo", "hi"]);
///
/// let arr = DictionaryArray::try_new_from_arrays(t.as_dictionary().unwrap(), &indices, &dict).unwrap();
/// assert_eq!(arr.key(0), Some(1));
/// assert_eq!(arr.key(1), None);
///
/// let bad = Int8Array::from_slice(&[0, 2]);
/// assert!(DictionaryArray::try_new_from_arrays(t.as_dictionary().unwrap(), &bad, &dict).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DictionaryArray {
    data: Arc<ArrayData>,
    dict_type: DictionaryType,
    indices: ArrayRef,
    dictionary: ArrayRef,
}

impl DictionaryArray {
    /// Panics if `data` is not dictionary data with an attached dictionary.
    pub fn from_data(data: Arc<ArrayData>) -> Self {
        let dict_type = match data.data_type() {
            DataType::Dictionary(t) => t.clone(),
            other => panic!("DictionaryArray requires dictionary data, got {other}"),
        };
        let dictionary = match data.dictionary() {
            Some(d) => make_array(d.clone()),
            None => panic!("dictionary data is missing its dictionary"),
        };
        // SAFETY: the index layout is the dictionary layout without the side table
        let index_data = unsafe {
            ArrayData::new_unchecked(
                dict_type.index_type().clone(),
                data.len(),
                data.offset(),
                Some(data.null_count()),
                data.buffers().to_vec(),
                vec![],
                None,
            )
        };
        Self {
            indices: make_array(Arc::new(index_data)),
            data,
            dict_type,
            dictionary,
        }
    }

    /// Pairs `indices` with `dictionary` under `dict_type` after validating every
    /// index. The inputs are left untouched.
    ///
    /// # Errors
    /// - `TypeMismatch` when the indices are not of the declared index type.
    /// - `UnsupportedIndexType` when the declared index type is not int8/16/32/64.
    /// - `IndexOutOfBounds` for the first non-null index outside the dictionary.
    pub fn try_new_from_arrays(
        dict_type: &DictionaryType,
        indices: &dyn Array,
        dictionary: &dyn Array,
    ) -> ArrayResult<Self> {
        let expected = dict_type.index_type().id();
        let found = indices.data_type().id();
        if found != expected {
            return Err(ArrayError::TypeMismatch { expected, found });
        }

        let idx = indices.data();
        dispatch_index_check(dict_type.index_type(), idx, dictionary.len())?;

        // SAFETY: index buffers were validated against the index type and bounds
        let data = unsafe {
            ArrayData::new_unchecked(
                DataType::Dictionary(dict_type.clone()),
                idx.len(),
                idx.offset(),
                Some(idx.null_count()),
                idx.buffers().to_vec(),
                vec![],
                Some(dictionary.data().clone()),
            )
        };
        Ok(Self::from_data(Arc::new(data)))
    }

    #[inline]
    pub fn dict_type(&self) -> &DictionaryType {
        &self.dict_type
    }

    /// Index array sharing this array's buffers.
    #[inline]
    pub fn indices(&self) -> &ArrayRef {
        &self.indices
    }

    #[inline]
    pub fn dictionary(&self) -> &ArrayRef {
        &self.dictionary
    }

    /// Dictionary position referenced by slot `i`, or `None` for a null slot.
    pub fn key(&self, i: usize) -> Option<usize> {
        self.is_valid(i)
            .then(|| dictionary_key_at(&self.data, self.offset() + i))
    }
}

impl_array!(DictionaryArray);

/// Checks the indices of dictionary-typed `data` against a dictionary of `dict_len`.
pub(crate) fn check_dictionary_indices(data: &ArrayData, dict_len: usize) -> ArrayResult<()> {
    match data.data_type() {
        DataType::Dictionary(t) => dispatch_index_check(t.index_type(), data, dict_len),
        other => Err(ArrayError::invalid_data(format!(
            "expected dictionary data, got {other}"
        ))),
    }
}

fn dispatch_index_check(index_type: &DataType, data: &ArrayData, dict_len: usize) -> ArrayResult<()> {
    match index_type {
        DataType::Int8 => validate_dictionary_indices::<i8>(data, dict_len),
        DataType::Int16 => validate_dictionary_indices::<i16>(data, dict_len),
        DataType::Int32 => validate_dictionary_indices::<i32>(data, dict_len),
        DataType::Int64 => validate_dictionary_indices::<i64>(data, dict_len),
        other => Err(ArrayError::UnsupportedIndexType {
            found: other.to_string(),
        }),
    }
}

/// Verifies every non-null index of `data` lies in `[0, dict_len)`.
///
/// `data` is read as `K` from buffer 1 over its own window; its validity bitmap
/// decides which slots are skipped. Returns the first offending position.
pub fn validate_dictionary_indices<K: DictionaryKey>(
    data: &ArrayData,
    dict_len: usize,
) -> ArrayResult<()> {
    let keys: &[K] = match data.buffer(1) {
        Some(b) => &b.typed_data::<K>()[data.offset()..data.offset() + data.len()],
        None => return Err(ArrayError::invalid_data("index data is missing its values buffer")),
    };
    let upper = dict_len as i64;
    let out_of_range = |k: K| {
        let v: i64 = k.as_();
        v < 0 || v >= upper
    };

    let bits = data.buffer(0).filter(|_| data.null_count() > 0);
    let first_bad = match bits {
        None => scan_dense(keys, &out_of_range),
        Some(bits) => {
            let bytes = bits.as_slice();
            let offset = data.offset();
            scan_masked(keys, &|i, k| get_bit(bytes, offset + i) && out_of_range(k))
        }
    };

    match first_bad {
        None => Ok(()),
        Some(position) => {
            let value: i64 = keys[position].as_();
            log::debug!(
                "rejecting dictionary indices: position {position} holds {value}, dictionary has {dict_len} entries"
            );
            Err(ArrayError::IndexOutOfBounds {
                position,
                value,
                len: dict_len,
            })
        }
    }
}

#[cfg(not(feature = "parallel_proc"))]
#[inline]
fn scan_dense<K: DictionaryKey>(keys: &[K], bad: &(dyn Fn(K) -> bool + Sync)) -> Option<usize> {
    keys.iter().position(|&k| bad(k))
}

#[cfg(feature = "parallel_proc")]
fn scan_dense<K: DictionaryKey>(keys: &[K], bad: &(dyn Fn(K) -> bool + Sync)) -> Option<usize> {
    if keys.len() < PARALLEL_VALIDATION_THRESHOLD {
        return keys.iter().position(|&k| bad(k));
    }
    keys.par_iter().position_first(|&k| bad(k))
}

#[cfg(not(feature = "parallel_proc"))]
#[inline]
fn scan_masked<K: DictionaryKey>(
    keys: &[K],
    bad: &(dyn Fn(usize, K) -> bool + Sync),
) -> Option<usize> {
    keys.iter().enumerate().position(|(i, &k)| bad(i, k))
}

#[cfg(feature = "parallel_proc")]
fn scan_masked<K: DictionaryKey>(
    keys: &[K],
    bad: &(dyn Fn(usize, K) -> bool + Sync),
) -> Option<usize> {
    if keys.len() < PARALLEL_VALIDATION_THRESHOLD {
        return keys.iter().enumerate().position(|(i, &k)| bad(i, k));
    }
    keys.par_iter()
        .enumerate()
        .position_first(|(i, &k)| bad(i, k))
}

/// Dictionary position stored at physical slot `pos` of dictionary-typed `data`.
pub(crate) fn dictionary_key_at(data: &ArrayData, pos: usize) -> usize {
    let Some(buf) = data.buffer(1) else {
        panic!("dictionary data is missing its index buffer")
    };
    let index_type = match data.data_type() {
        DataType::Dictionary(t) => t.index_type(),
        other => other,
    };
    match index_type {
        DataType::Int8 => buf.typed_data::<i8>()[pos] as usize,
        DataType::Int16 => buf.typed_data::<i16>()[pos] as usize,
        DataType::Int32 => buf.typed_data::<i32>()[pos] as usize,
        DataType::Int64 => buf.typed_data::<i64>()[pos] as usize,
        DataType::UInt8 => buf.typed_data::<u8>()[pos] as usize,
        DataType::UInt16 => buf.typed_data::<u16>()[pos] as usize,
        DataType::UInt32 => buf.typed_data::<u32>()[pos] as usize,
        DataType::UInt64 => buf.typed_data::<u64>()[pos] as usize,
        other => panic!("{other} is not a dictionary index type"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::{Int8Array, Int16Array, Int32Array, Int64Array, UInt8Array};
    use crate::structs::variants::string::{BinaryArray, StringArray};

    fn dict3() -> StringArray {
        StringArray::from(vec!["a", "b", "c"])
    }

    fn utf8_dict(index: DataType) -> DictionaryType {
        DictionaryType::new(index, DataType::Utf8, false)
    }

    #[test]
    fn test_valid_indices_all_widths() {
        let d = dict3();
        let ok8 = Int8Array::from_slice(&[0, 1, 2]);
        let ok16 = Int16Array::from_slice(&[2, 2, 0]);
        let ok32 = Int32Array::from_slice(&[1]);
        let ok64 = Int64Array::from_slice(&[]);
        assert!(DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::Int8), &ok8, &d).is_ok());
        assert!(DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::Int16), &ok16, &d).is_ok());
        assert!(DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::Int32), &ok32, &d).is_ok());
        assert!(DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::Int64), &ok64, &d).is_ok());
    }

    #[test]
    fn test_out_of_bounds_reports_first_position() {
        let d = dict3();
        let idx = Int32Array::from_slice(&[0, 1, 5, -1, 9]);
        let err = DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::Int32), &idx, &d)
            .unwrap_err();
        assert_eq!(
            err,
            ArrayError::IndexOutOfBounds {
                position: 2,
                value: 5,
                len: 3
            }
        );
    }

    #[test]
    fn test_negative_index_rejected() {
        let d = dict3();
        let idx = Int64Array::from_slice(&[-1]);
        let err = DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::Int64), &idx, &d)
            .unwrap_err();
        assert!(matches!(err, ArrayError::IndexOutOfBounds { position: 0, value: -1, .. }));
    }

    #[test]
    fn test_null_slots_skipped() {
        let d = dict3();
        let idx = Int16Array::from(vec![Some(1), None, Some(2)]);
        let arr = DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::Int16), &idx, &d).unwrap();
        assert_eq!(arr.null_count(), 1);
        assert_eq!(arr.key(1), None);
        assert_eq!(arr.key(2), Some(2));
    }

    #[test]
    fn test_type_mismatch() {
        let d = dict3();
        let idx = Int8Array::from_slice(&[0]);
        let err = DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::Int32), &idx, &d)
            .unwrap_err();
        assert_eq!(
            err,
            ArrayError::TypeMismatch {
                expected: crate::enums::datatype::TypeId::Int32,
                found: crate::enums::datatype::TypeId::Int8
            }
        );
    }

    #[test]
    fn test_type_mismatch_precedes_bounds_check() {
        let d = dict3();
        let idx = Int16Array::from_slice(&[99]);
        let err = DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::Int32), &idx, &d)
            .unwrap_err();
        assert!(matches!(err, ArrayError::TypeMismatch { .. }));
    }

    #[test]
    fn test_unsupported_index_wins_over_value_type() {
        let binary = BinaryArray::from(vec![b"x".as_slice()]);
        let idx = UInt8Array::from_slice(&[0]);
        let err = DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::UInt8), &idx, &binary)
            .unwrap_err();
        assert!(matches!(err, ArrayError::UnsupportedIndexType { .. }));
    }

    #[test]
    fn test_value_type_not_checked() {
        let values = Int32Array::from_slice(&[7, 8]);
        let idx = Int8Array::from_slice(&[1, 0]);
        let arr = DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::Int8), &idx, &values)
            .unwrap();
        assert_eq!(arr.dictionary().data_type(), &DataType::Int32);
    }

    #[test]
    fn test_unsigned_index_unsupported() {
        let d = dict3();
        let idx = UInt8Array::from_slice(&[0]);
        let err = DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::UInt8), &idx, &d)
            .unwrap_err();
        assert!(matches!(err, ArrayError::UnsupportedIndexType { .. }));
    }

    #[test]
    fn test_inputs_untouched_and_shared() {
        let d = dict3();
        let idx = Int8Array::from_slice(&[2, 0]);
        let arr = DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::Int8), &idx, &d).unwrap();
        assert_eq!(idx.data_type(), &DataType::Int8);
        assert!(arr.data().dictionary().is_some());
        let view = arr.indices().as_any().downcast_ref::<Int8Array>().unwrap();
        assert_eq!(view.values(), &[2, 0]);
        assert!(
            view.data().buffer(1).unwrap().ptr_eq(idx.data().buffer(1).unwrap())
        );
        let values = arr.dictionary().as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(values.value(arr.key(0).unwrap()), "c");
    }

    #[test]
    fn test_sliced_indices() {
        let d = dict3();
        let idx = Int32Array::from_slice(&[7, 0, 1]);
        let sliced = idx.slice(1, 2);
        let arr = DictionaryArray::try_new_from_arrays(&utf8_dict(DataType::Int32), sliced.as_ref(), &d)
            .unwrap();
        assert_eq!(arr.key(0), Some(0));
        assert_eq!(arr.key(1), Some(1));
    }
}
