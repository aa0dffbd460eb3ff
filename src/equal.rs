//! # Equality Module
//!
//! Logical equality of arrays and array data.
//!
//! Two arrays are equal when they have the same type, length and null count, and
//! every slot is either null on both sides or holds equal values. Physical
//! offsets, buffer capacities and the bytes behind null slots are ignored, so a
//! slice equals a freshly built array with the same contents. Dictionary arrays
//! compare their resolved values, not their raw indices.

use crate::enums::datatype::DataType;
use crate::structs::data::ArrayData;
use crate::structs::variants::dictionary::dictionary_key_at;
use crate::traits::array::Array;
use crate::utils::get_bit;

/// Logical equality of two arrays.
pub fn array_equal(lhs: &dyn Array, rhs: &dyn Array) -> bool {
    data_equal(lhs.data(), rhs.data())
}

/// Logical equality of two array data nodes, including their children.
pub fn data_equal(lhs: &ArrayData, rhs: &ArrayData) -> bool {
    if std::ptr::eq(lhs, rhs) {
        return true;
    }
    lhs.data_type() == rhs.data_type()
        && lhs.len() == rhs.len()
        && lhs.null_count() == rhs.null_count()
        && range_equal(lhs, rhs, 0, 0, lhs.len())
}

/// Compares `len` logical slots of `lhs` from `lstart` against `rhs` from `rstart`.
///
/// Both sides must share a data type.
fn range_equal(lhs: &ArrayData, rhs: &ArrayData, lstart: usize, rstart: usize, len: usize) -> bool {
    if len == 0 {
        return true;
    }
    if matches!(lhs.data_type(), DataType::Null) {
        return true;
    }
    let dictionary = matches!(lhs.data_type(), DataType::Dictionary(_));
    if !dictionary && lhs.null_count() == 0 && rhs.null_count() == 0 {
        if let Some(width) = lhs.data_type().byte_width() {
            return fixed_width_run(lhs, lstart, len, width) == fixed_width_run(rhs, rstart, len, width);
        }
    }
    (0..len).all(|i| {
        let (l, r) = (lstart + i, rstart + i);
        match (lhs.is_null(l), rhs.is_null(r)) {
            (true, true) => true,
            (false, false) => value_equal(lhs, rhs, l, r),
            _ => false,
        }
    })
}

/// Bytes of `len` fixed-width values starting at logical slot `start`.
fn fixed_width_run(data: &ArrayData, start: usize, len: usize, width: usize) -> &[u8] {
    match data.buffer(1) {
        Some(b) => {
            let from = (data.offset() + start) * width;
            &b.as_slice()[from..from + len * width]
        }
        None => &[],
    }
}

/// Compares the non-null values at logical slots `l` and `r`.
fn value_equal(lhs: &ArrayData, rhs: &ArrayData, l: usize, r: usize) -> bool {
    match lhs.data_type() {
        DataType::Null => true,
        DataType::Boolean => bit_at(lhs, l) == bit_at(rhs, r),
        DataType::Utf8 | DataType::Binary => byte_value(lhs, l) == byte_value(rhs, r),
        DataType::List(_) | DataType::Map(_) => {
            let (ls, le) = offset_pair(lhs, l);
            let (rs, re) = offset_pair(rhs, r);
            le - ls == re - rs && range_equal(lhs.child(0), rhs.child(0), ls, rs, le - ls)
        }
        DataType::FixedSizeList(t) => {
            let n = t.size();
            range_equal(
                lhs.child(0),
                rhs.child(0),
                (lhs.offset() + l) * n,
                (rhs.offset() + r) * n,
                n,
            )
        }
        DataType::Struct(_) => lhs
            .child_data()
            .iter()
            .zip(rhs.child_data())
            .all(|(lc, rc)| range_equal(lc, rc, l, r, 1)),
        DataType::Dictionary(_) => match (lhs.dictionary(), rhs.dictionary()) {
            (Some(ld), Some(rd)) => {
                let lk = dictionary_key_at(lhs, lhs.offset() + l);
                let rk = dictionary_key_at(rhs, rhs.offset() + r);
                range_equal(ld, rd, lk, rk, 1)
            }
            _ => false,
        },
        dt => match dt.byte_width() {
            Some(width) => fixed_width_run(lhs, l, 1, width) == fixed_width_run(rhs, r, 1, width),
            None => false,
        },
    }
}

#[inline]
fn bit_at(data: &ArrayData, i: usize) -> bool {
    data.buffer(1)
        .is_some_and(|b| get_bit(b.as_slice(), data.offset() + i))
}

#[inline]
fn offset_pair(data: &ArrayData, i: usize) -> (usize, usize) {
    let offsets = data.value_offsets();
    (offsets[i] as usize, offsets[i + 1] as usize)
}

fn byte_value(data: &ArrayData, i: usize) -> &[u8] {
    let (start, end) = offset_pair(data, i);
    match data.buffer(2) {
        Some(b) => &b.as_slice()[start..end],
        None => &[],
    }
}
