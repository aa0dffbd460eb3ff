//! Integration tests for shared buffer lifetimes across arrays, slices and threads.

use std::sync::Arc;
use std::thread;

use nestarrow::{
    Array, ArrayBuilder, Buffer, CheckedAllocator, Int64Builder, ListBuilder, MutableBuffer,
    RefCount, StringBuilder,
};

#[test]
fn test_buffer_clone_shares_memory() {
    let mem = Arc::new(CheckedAllocator::default());
    {
        let a = Buffer::from_slice_in(mem.clone(), &[1i32, 2, 3]);
        assert_eq!(a.ref_count(), 1);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.ref_count(), 2);
        drop(a);
        assert_eq!(b.ref_count(), 1);
        assert_eq!(b.typed_data::<i32>(), &[1, 2, 3]);
        assert!(mem.current_alloc() > 0);
    }
    mem.assert_size(0);
}

#[test]
fn test_mutable_buffer_hands_over_without_copy() {
    let mem = Arc::new(CheckedAllocator::default());
    {
        let mut m = MutableBuffer::new_in(mem.clone());
        m.extend_from_slice(&[7u8; 100]);
        let ptr = m.as_slice().as_ptr();
        let frozen = m.into_buffer();
        assert_eq!(frozen.as_ptr(), ptr);
        assert_eq!(frozen.len(), 100);
        assert_eq!(frozen.as_ptr() as usize % 64, 0);
    }
    mem.assert_size(0);
}

#[test]
fn test_slices_outlive_their_parent() {
    let mem = Arc::new(CheckedAllocator::default());
    {
        let mut b = StringBuilder::new_in(mem.clone());
        for s in ["alpha", "beta", "gamma", "delta"] {
            b.append_value(s);
        }
        let arr = b.finish();
        let tail = arr.slice(2, 2);
        drop(arr);
        drop(b);
        assert_eq!(tail.len(), 2);
        assert!(mem.current_alloc() > 0);
    }
    mem.assert_size(0);
}

#[test]
fn test_arrays_shared_across_threads() {
    let mem = Arc::new(CheckedAllocator::default());
    {
        let mut b = ListBuilder::new_in(mem.clone(), Int64Builder::new_in(mem.clone()));
        for i in 0..64 {
            b.append(true);
            b.values_mut().append_slice(&[i, i + 1]);
        }
        let arr = b.finish();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let local = arr.clone();
                thread::spawn(move || {
                    let part = local.slice(t * 8, 8);
                    part.len()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 8);
        }
        assert_eq!(Arc::strong_count(&arr), 1);
    }
    mem.assert_size(0);
}

#[test]
fn test_retain_release_n_times_frees_once() {
    let mem = Arc::new(CheckedAllocator::default());
    {
        let mut b = StringBuilder::new_in(mem.clone());
        b.append_value("only");
        let arr = b.finish();
        let data = arr.data().clone();
        let handles: Vec<_> = (0..16).map(|_| arr.clone()).collect();
        let datas: Vec<_> = (0..16).map(|_| data.clone()).collect();
        assert_eq!(Arc::strong_count(&arr), 17);
        drop(handles);
        drop(datas);
        assert_eq!(Arc::strong_count(&arr), 1);
        assert!(mem.current_alloc() > 0);
    }
    mem.assert_size(0);
}

#[test]
fn test_refcount_balances() {
    let rc = RefCount::new();
    rc.retain();
    rc.retain();
    assert!(!rc.release());
    assert!(!rc.release());
    assert!(rc.release());
    assert_eq!(rc.load(), 0);
}

#[test]
#[should_panic(expected = "too many releases")]
fn test_over_release_panics() {
    let rc = RefCount::new();
    assert!(rc.release());
    rc.release();
}
