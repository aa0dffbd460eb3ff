//! # **String and Binary Array Module**
//!
//! Variable-width arrays over `i32` offsets and one contiguous value buffer.
//!
//! ## Layout
//! - `buffers[0]`: optional validity bitmap.
//! - `buffers[1]`: `len + 1` non-decreasing `i32` offsets.
//! - `buffers[2]`: the concatenated value bytes.
//!
//! [`StringArray`] and [`BinaryArray`] share one generic implementation and differ
//! only in the native value type handed out by `value`.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::impl_array;
use crate::structs::builders::string::GenericByteBuilder;
use crate::structs::data::ArrayData;
use crate::traits::array::Array;

/// Binds a byte array family to its logical type and native value view.
pub trait ByteArrayType: Send + Sync + Debug + 'static {
    type Native: ?Sized + AsRef<[u8]>;
    const DATA_TYPE: DataType;

    /// Converts stored bytes back into the native view.
    ///
    /// # Safety
    /// `bytes` must have passed this family's validation, i.e. UTF-8 for strings.
    unsafe fn from_bytes_unchecked(bytes: &[u8]) -> &Self::Native;
}

#[derive(Debug)]
pub struct Utf8Type;

impl ByteArrayType for Utf8Type {
    type Native = str;
    const DATA_TYPE: DataType = DataType::Utf8;

    #[inline]
    unsafe fn from_bytes_unchecked(bytes: &[u8]) -> &str {
        // SAFETY: utf8 data is validated on construction or produced from &str
        unsafe { std::str::from_utf8_unchecked(bytes) }
    }
}

#[derive(Debug)]
pub struct BinaryType;

impl ByteArrayType for BinaryType {
    type Native = [u8];
    const DATA_TYPE: DataType = DataType::Binary;

    #[inline]
    unsafe fn from_bytes_unchecked(bytes: &[u8]) -> &[u8] {
        bytes
    }
}

/// # GenericByteArray
///
/// ## Example
/// ```rust
/// use nestarrow::{Array, StringArray};
///
/// let arr = StringArray::from(vec![Some("a"), None, Some("ccc")]);
/// assert_eq!(arr.value(2), "ccc");
/// assert_eq!(arr.value_offsets(), &[0, 1, 1, 4]);
/// assert!(arr.is_null(1));
/// ```
#[derive(Debug)]
pub struct GenericByteArray<K: ByteArrayType> {
    data: Arc<ArrayData>,
    _marker: PhantomData<K>,
}

pub type StringArray = GenericByteArray<Utf8Type>;
pub type BinaryArray = GenericByteArray<BinaryType>;

impl<K: ByteArrayType> Clone for GenericByteArray<K> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            _marker: PhantomData,
        }
    }
}

impl<K: ByteArrayType> GenericByteArray<K> {
    /// Panics if `data` is not typed `K::DATA_TYPE`.
    pub fn from_data(data: Arc<ArrayData>) -> Self {
        assert!(
            data.data_type() == &K::DATA_TYPE,
            "{} array requires {} data, got {}",
            K::DATA_TYPE,
            K::DATA_TYPE,
            data.data_type()
        );
        Self {
            data,
            _marker: PhantomData,
        }
    }

    /// `len + 1` offsets of this window.
    #[inline]
    pub fn value_offsets(&self) -> &[i32] {
        self.data.value_offsets()
    }

    #[inline]
    pub fn value_length(&self, i: usize) -> usize {
        let o = self.value_offsets();
        (o[i + 1] - o[i]) as usize
    }

    /// Value at `i`, ignoring validity. Panics when out of range.
    pub fn value(&self, i: usize) -> &K::Native {
        assert!(i < self.len(), "index {i} out of range for length {}", self.len());
        let o = self.value_offsets();
        let bytes = match self.data.buffer(2) {
            Some(b) => &b.as_slice()[o[i] as usize..o[i + 1] as usize],
            None => &[],
        };
        // SAFETY: the slot lies on validated offsets of validated data
        unsafe { K::from_bytes_unchecked(bytes) }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&K::Native>> + '_ {
        (0..self.len()).map(move |i| self.is_valid(i).then(|| self.value(i)))
    }
}

impl_array!(GenericByteArray<K: ByteArrayType>);

impl<'a, K, V> From<Vec<Option<&'a V>>> for GenericByteArray<K>
where
    K: ByteArrayType<Native = V>,
    V: ?Sized + AsRef<[u8]> + 'a,
{
    fn from(values: Vec<Option<&'a V>>) -> Self {
        let mut b = GenericByteBuilder::<K>::with_capacity(values.len(), 0);
        for v in values {
            b.append_option(v);
        }
        b.finish_bytes()
    }
}

impl<'a, K, V> From<Vec<&'a V>> for GenericByteArray<K>
where
    K: ByteArrayType<Native = V>,
    V: ?Sized + AsRef<[u8]> + 'a,
{
    fn from(values: Vec<&'a V>) -> Self {
        let mut b = GenericByteBuilder::<K>::with_capacity(values.len(), 0);
        for v in values {
            b.append_value(v);
        }
        b.finish_bytes()
    }
}
