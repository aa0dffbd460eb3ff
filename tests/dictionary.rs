//! Integration tests for dictionary construction and index validation.

use nestarrow::{
    Array, ArrayData, ArrayError, DataType, DictionaryArray, DictionaryType, Int16Array,
    Int32Array, Int64Array, PARALLEL_VALIDATION_THRESHOLD, StringArray, TypeId, UInt32Array,
    validate_dictionary_indices,
};

fn colours() -> StringArray {
    StringArray::from(vec!["red", "green", "blue"])
}

fn dict_type(index: DataType) -> DictionaryType {
    DictionaryType::new(index, DataType::Utf8, false)
}

#[test]
fn test_valid_with_nulls() {
    let idx = Int32Array::from(vec![Some(2), None, Some(0), Some(1)]);
    let arr = DictionaryArray::try_new_from_arrays(&dict_type(DataType::Int32), &idx, &colours()).unwrap();
    assert_eq!(arr.len(), 4);
    assert_eq!(arr.null_count(), 1);
    assert_eq!(arr.key(0), Some(2));
    assert_eq!(arr.key(1), None);
    assert_eq!(
        arr.data_type().to_string(),
        "dictionary<values=utf8, indices=int32, ordered=false>"
    );
    arr.data().validate_full().unwrap();
}

#[test]
fn test_null_slots_may_hold_any_index() {
    // The bytes behind the null slot are garbage on purpose.
    let raw = Int16Array::from(vec![0, 999, 1]);
    let valid = Int16Array::from(vec![Some(0), None, Some(1)]);
    let masked = ArrayData::try_new(
        DataType::Int16,
        3,
        0,
        None,
        vec![valid.data().buffer(0).cloned(), raw.data().buffer(1).cloned()],
        vec![],
        None,
    )
    .unwrap();
    assert!(validate_dictionary_indices::<i16>(&masked, 2).is_ok());
    assert!(validate_dictionary_indices::<i16>(raw.data(), 2).is_err());
}

#[test]
fn test_first_offending_position_reported() {
    let idx = Int64Array::from(vec![0, 1, 5, -1]);
    let err = DictionaryArray::try_new_from_arrays(&dict_type(DataType::Int64), &idx, &colours())
        .unwrap_err();
    match err {
        ArrayError::IndexOutOfBounds { position, value, len } => {
            assert_eq!((position, value, len), (2, 5, 3));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_negative_index_rejected() {
    let idx = Int32Array::from(vec![-1]);
    let err = DictionaryArray::try_new_from_arrays(&dict_type(DataType::Int32), &idx, &colours())
        .unwrap_err();
    assert!(matches!(err, ArrayError::IndexOutOfBounds { position: 0, value: -1, .. }));
}

#[test]
fn test_index_type_mismatch() {
    let idx = Int16Array::from(vec![0]);
    let err = DictionaryArray::try_new_from_arrays(&dict_type(DataType::Int32), &idx, &colours())
        .unwrap_err();
    assert!(matches!(
        err,
        ArrayError::TypeMismatch {
            expected: TypeId::Int32,
            found: TypeId::Int16
        }
    ));
}

#[test]
fn test_type_mismatch_reported_before_bounds() {
    let idx = Int16Array::from(vec![99]);
    let err = DictionaryArray::try_new_from_arrays(&dict_type(DataType::Int32), &idx, &colours())
        .unwrap_err();
    assert!(matches!(
        err,
        ArrayError::TypeMismatch {
            expected: TypeId::Int32,
            found: TypeId::Int16
        }
    ));
}

#[test]
fn test_unsigned_index_type_unsupported() {
    let idx = UInt32Array::from(vec![0u32]);
    let err = DictionaryArray::try_new_from_arrays(&dict_type(DataType::UInt32), &idx, &colours())
        .unwrap_err();
    assert!(matches!(err, ArrayError::UnsupportedIndexType { .. }));
}

#[test]
fn test_large_input_finds_first_bad_position() {
    let n = PARALLEL_VALIDATION_THRESHOLD * 2;
    let mut keys: Vec<i32> = (0..n as i32).map(|i| i % 3).collect();
    keys[n - 10] = 3;
    keys[n - 5] = 7;
    let idx = Int32Array::from(keys);
    let err = DictionaryArray::try_new_from_arrays(&dict_type(DataType::Int32), &idx, &colours())
        .unwrap_err();
    assert!(matches!(err, ArrayError::IndexOutOfBounds { position, value: 3, .. } if position == n - 10));
}

#[test]
fn test_sliced_indices_validated_over_window() {
    let idx = Int32Array::from(vec![9, 0, 1, 2]);
    let window = idx.slice(1, 3);
    let arr = DictionaryArray::try_new_from_arrays(&dict_type(DataType::Int32), window.as_ref(), &colours())
        .unwrap();
    assert_eq!(arr.key(0), Some(0));
    assert_eq!(arr.key(2), Some(2));
}

#[test]
fn test_empty_dictionary_accepts_only_nulls() {
    let empty = StringArray::from(Vec::<&str>::new());
    let nulls = Int32Array::from(vec![None, None]);
    assert!(
        DictionaryArray::try_new_from_arrays(&dict_type(DataType::Int32), &nulls, &empty).is_ok()
    );
    let zero = Int32Array::from(vec![0]);
    assert!(
        DictionaryArray::try_new_from_arrays(&dict_type(DataType::Int32), &zero, &empty).is_err()
    );
}
