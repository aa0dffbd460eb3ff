//! Integration tests for building, reading and slicing map arrays.

use std::sync::Arc;

use nestarrow::{
    Array, ArrayBuilder, ArrayData, CheckedAllocator, DataType, Int32Array, Int32Builder,
    MapArray, MapBuilder, StringArray, StringBuilder, make_array,
};

fn build(sorted: bool) -> MapArray {
    let mut b = MapBuilder::new(StringBuilder::new(), Int32Builder::new(), sorted);
    b.append(true).unwrap();
    b.keys().append_value("a");
    b.values().append_value(1);
    b.keys().append_value("b");
    b.values().append_value(2);
    b.append(false).unwrap();
    b.append(true).unwrap();
    b.keys().append_value("c");
    b.values().append_value(3);
    b.finish_map()
}

#[test]
fn test_three_slot_map() {
    let map = build(false);
    assert_eq!(map.len(), 3);
    assert_eq!(map.null_count(), 1);
    assert_eq!(map.value_offsets(), &[0, 2, 2, 3]);
    assert!(map.is_valid(0));
    assert!(map.is_null(1));
    assert_eq!(map.value_length(0), 2);
    assert_eq!(map.value_length(1), 0);

    let keys = map.keys().as_any().downcast_ref::<StringArray>().unwrap();
    let values = map.values().as_any().downcast_ref::<Int32Array>().unwrap();
    assert_eq!(keys.iter().flatten().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert_eq!(values.values(), &[1, 2, 3]);

    let last = map.value(2);
    assert_eq!(last.len(), 1);
    let k = last.field(0).as_any().downcast_ref::<StringArray>().unwrap();
    assert_eq!(k.value(0), "c");

    map.data().validate_full().unwrap();
}

#[test]
fn test_type_strings() {
    assert_eq!(build(false).data_type().to_string(), "map<utf8, int32>");
    assert_eq!(build(true).data_type().to_string(), "map<utf8, int32, keys_sorted>");
    assert_eq!(
        build(false).entries().data_type().to_string(),
        "struct<key: utf8, value: int32>"
    );
    assert_eq!(
        build(false).as_list().data_type().to_string(),
        "list<item: struct<key: utf8, value: int32>>"
    );
}

#[test]
fn test_sortedness_is_part_of_the_type() {
    let sorted = build(true);
    let unsorted = build(false);
    assert!(sorted.keys_sorted());
    assert_ne!(sorted.data_type(), unsorted.data_type());
    assert_ne!(sorted, unsorted);
    assert_eq!(unsorted, build(false));
}

#[test]
fn test_make_array_dispatches_to_map() {
    let map = build(false);
    let erased = make_array(map.data().clone());
    let back = erased.as_any().downcast_ref::<MapArray>().unwrap();
    assert_eq!(back, &map);
}

#[test]
fn test_slice_keeps_entries_addressable() {
    let map = build(false);
    let tail = map.slice(1, 2);
    let tail = tail.as_any().downcast_ref::<MapArray>().unwrap();
    assert_eq!(tail.len(), 2);
    assert_eq!(tail.null_count(), 1);
    assert_eq!(tail.value_offsets(), &[2, 2, 3]);
    let last = tail.value(1);
    let v = last.field(1).as_any().downcast_ref::<Int32Array>().unwrap();
    assert_eq!(v.value(0), 3);
}

#[test]
fn test_rejects_bad_child_shape() {
    let map = build(false);
    let data = map.data();
    // A map over a bare int32 child instead of the entries struct.
    let ints = Int32Array::from(vec![1, 2, 3]);
    let bad = ArrayData::try_new(
        data.data_type().clone(),
        data.len(),
        0,
        None,
        data.buffers().to_vec(),
        vec![ints.data().clone()],
        None,
    );
    assert!(bad.is_err());
}

#[test]
fn test_builder_returns_all_memory() {
    let mem = Arc::new(CheckedAllocator::default());
    {
        let mut b = MapBuilder::new_in(
            mem.clone(),
            StringBuilder::new_in(mem.clone()),
            Int32Builder::new_in(mem.clone()),
            false,
        );
        for i in 0..500 {
            b.append(i % 5 != 0).unwrap();
            if i % 5 != 0 {
                b.keys().append_value(&format!("k{i}"));
                b.values().append_value(i);
            }
        }
        assert!(mem.current_alloc() > 0);
        let map = b.finish();
        assert_eq!(map.len(), 500);
        let entries = map.as_any().downcast_ref::<MapArray>().unwrap().entries().clone();
        drop(map);
        assert_eq!(entries.len(), 400);
    }
    mem.assert_size(0);
}

#[test]
fn test_unsorted_map_of_maps() {
    let inner = DataType::map_of(DataType::Utf8, DataType::Int32);
    let outer = DataType::map_of(DataType::Int32, inner.clone());
    assert_eq!(
        outer.to_string(),
        "map<int32, map<utf8, int32>>"
    );
    assert_eq!(outer.as_map().unwrap().value_type(), &inner);
}
