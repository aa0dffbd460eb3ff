//! # ArrayData Module - *Immutable buffer bundle behind every array*
//!
//! [`ArrayData`] is the type-erased core of every array: the logical type, length,
//! offset, null count, the physical buffers in layout order, child data for
//! nested types and the side dictionary for dictionary-encoded types.
//!
//! ## Invariants
//! - `buffers.len()` equals the number of slots in `data_type.layout()`.
//! - Slot 0 holds the validity bitmap; `None` means no element is null.
//! - `null_count <= len`.
//! - Offsets buffers hold `offset + len + 1` non-decreasing `i32` entries.
//! - List, fixed size list and map data carry one child; struct data one per field.
//!   Map data's child is the two-field `{key, value}` struct.
//! - Struct children are row-aligned with the parent's logical rows. Slicing a
//!   struct slices its children alongside.
//! - Dictionary data carries the index buffers and `dictionary` holds the values.
//!
//! `ArrayData` is never mutated once built. Arrays and builders share it via `Arc`.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::enums::datatype::DataType;
use crate::enums::error::{ArrayError, ArrayResult};
use crate::structs::bitmask::Bitmask;
use crate::structs::buffer::Buffer;
use crate::structs::layout::BufferKind;
use crate::structs::variants::dictionary::check_dictionary_indices;
use crate::utils::{bytes_for, count_set_bits, get_bit};

/// # ArrayData
///
/// Immutable `{type, len, offset, null_count, buffers, children, dictionary}` bundle.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use nestarrow::{ArrayData, Buffer, DataType};
///
/// let data = ArrayData::try_new(
///     DataType::Int32,
///     3,
///     0,
///     None,
///     vec![None, Some(Buffer::from_slice(&[1i32, 2, 3]))],
///     vec![],
///     None,
/// )
/// .unwrap();
/// assert_eq!(data.null_count(), 0);
///
/// let tail = data.slice(1, 2);
/// assert_eq!(tail.offset(), 1);
/// assert_eq!(tail.len(), 2);
/// ```
#[derive(Clone)]
pub struct ArrayData {
    data_type: DataType,
    len: usize,
    offset: usize,
    null_count: usize,
    buffers: Vec<Option<Buffer>>,
    child_data: Vec<Arc<ArrayData>>,
    dictionary: Option<Arc<ArrayData>>,
}

impl ArrayData {
    /// Builds and fully validates array data.
    ///
    /// `null_count` of `None` computes the count from the validity bitmap.
    pub fn try_new(
        data_type: DataType,
        len: usize,
        offset: usize,
        null_count: Option<usize>,
        buffers: Vec<Option<Buffer>>,
        child_data: Vec<Arc<ArrayData>>,
        dictionary: Option<Arc<ArrayData>>,
    ) -> ArrayResult<Self> {
        let expected = data_type.layout().num_buffers();
        if buffers.len() != expected {
            return Err(ArrayError::invalid_data(format!(
                "{data_type} requires {expected} buffers, got {}",
                buffers.len()
            )));
        }
        if let Some(Some(bits)) = buffers.first() {
            let need = bytes_for(offset + len);
            if bits.len() < need {
                return Err(ArrayError::invalid_data(format!(
                    "validity bitmap of {} bytes is too short for {} elements at offset {offset}, need {need}",
                    bits.len(),
                    len
                )));
            }
        }
        // SAFETY: validated below before the value escapes
        let data = unsafe {
            Self::new_unchecked(data_type, len, offset, null_count, buffers, child_data, dictionary)
        };
        data.validate_full()?;
        Ok(data)
    }

    /// Builds array data without validation.
    ///
    /// # Safety
    /// The caller guarantees every invariant listed on the module, in particular
    /// buffer sizes and offsets. Readers index buffers without bounds checks on
    /// the strength of those invariants.
    pub unsafe fn new_unchecked(
        data_type: DataType,
        len: usize,
        offset: usize,
        null_count: Option<usize>,
        buffers: Vec<Option<Buffer>>,
        child_data: Vec<Arc<ArrayData>>,
        dictionary: Option<Arc<ArrayData>>,
    ) -> Self {
        let null_count = match null_count {
            Some(n) => n,
            None => compute_null_count(&data_type, len, offset, &buffers),
        };
        Self {
            data_type,
            len,
            offset,
            null_count,
            buffers,
            child_data,
            dictionary,
        }
    }

    #[inline]
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn null_count(&self) -> usize {
        self.null_count
    }

    #[inline]
    pub fn buffers(&self) -> &[Option<Buffer>] {
        &self.buffers
    }

    /// Buffer at layout slot `i`, if present.
    #[inline]
    pub fn buffer(&self, i: usize) -> Option<&Buffer> {
        self.buffers.get(i).and_then(Option::as_ref)
    }

    #[inline]
    pub fn child_data(&self) -> &[Arc<ArrayData>] {
        &self.child_data
    }

    /// Child `i`. Panics when out of range.
    #[inline]
    pub fn child(&self, i: usize) -> &Arc<ArrayData> {
        &self.child_data[i]
    }

    #[inline]
    pub fn dictionary(&self) -> Option<&Arc<ArrayData>> {
        self.dictionary.as_ref()
    }

    /// Validity window over this data's rows, if a bitmap is present.
    pub fn validity(&self) -> Option<Bitmask> {
        self.buffer(0)
            .filter(|_| !matches!(self.data_type, DataType::Null))
            .map(|b| Bitmask::new(b.clone(), self.offset, self.len))
    }

    /// True when element `i` is null. Panics when out of range.
    #[inline]
    pub fn is_null(&self, i: usize) -> bool {
        assert!(i < self.len, "index {i} out of range for length {}", self.len);
        if matches!(self.data_type, DataType::Null) {
            return true;
        }
        match self.buffer(0) {
            Some(bits) => !get_bit(bits.as_slice(), self.offset + i),
            None => false,
        }
    }

    #[inline]
    pub fn is_valid(&self, i: usize) -> bool {
        !self.is_null(i)
    }

    /// The `len + 1` offsets covering this data's window. Empty when the offsets
    /// buffer is empty, which is allowed for zero-length data.
    pub fn value_offsets(&self) -> &[i32] {
        match self.buffer(1) {
            Some(b) if !b.is_empty() => &b.typed_data::<i32>()[self.offset..self.offset + self.len + 1],
            _ => &[],
        }
    }

    /// Same buffers and children re-tagged with `data_type`.
    ///
    /// # Safety
    /// `data_type` must share this data's physical layout and child shape.
    pub unsafe fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Zero-copy window `[offset, offset + len)` of this data.
    ///
    /// Panics if the window exceeds the data.
    pub fn slice(&self, offset: usize, len: usize) -> ArrayData {
        assert!(
            offset + len <= self.len,
            "slice [{offset}, {}) out of range for length {}",
            offset + len,
            self.len
        );
        let new_offset = self.offset + offset;
        let child_data = match &self.data_type {
            DataType::Struct(_) => self
                .child_data
                .iter()
                .map(|c| Arc::new(c.slice(offset, len)))
                .collect(),
            _ => self.child_data.clone(),
        };
        let null_count = compute_null_count(&self.data_type, len, new_offset, &self.buffers);
        ArrayData {
            data_type: self.data_type.clone(),
            len,
            offset: new_offset,
            null_count,
            buffers: self.buffers.clone(),
            child_data,
            dictionary: self.dictionary.clone(),
        }
    }

    /// Checks this node's buffers, counts and offsets against its type.
    pub fn validate(&self) -> ArrayResult<()> {
        let layout = self.data_type.layout();
        if self.buffers.len() != layout.num_buffers() {
            return Err(ArrayError::invalid_data(format!(
                "{} requires {} buffers, got {}",
                self.data_type,
                layout.num_buffers(),
                self.buffers.len()
            )));
        }
        if self.null_count > self.len {
            return Err(ArrayError::invalid_data(format!(
                "null_count {} exceeds length {}",
                self.null_count, self.len
            )));
        }

        let end = self.offset + self.len;
        for (i, kind) in layout.buffers.iter().enumerate() {
            let buf = self.buffer(i);
            match (kind, buf) {
                (BufferKind::AlwaysNull, _) => {}
                (BufferKind::Bitmap, None) if i == 0 => {}
                (BufferKind::Bitmap, Some(b)) => {
                    if b.len() < bytes_for(end) {
                        return Err(ArrayError::invalid_data(format!(
                            "bitmap buffer {i} of {} bytes is too short for {end} bits",
                            b.len()
                        )));
                    }
                }
                (BufferKind::FixedWidth { byte_width }, Some(b)) => {
                    let need = if self.has_offsets() && i == 1 {
                        if self.len == 0 && b.is_empty() { 0 } else { (end + 1) * byte_width }
                    } else {
                        end * byte_width
                    };
                    if b.len() < need {
                        return Err(ArrayError::invalid_data(format!(
                            "buffer {i} of {} bytes is too short, {} needs {need}",
                            b.len(),
                            self.data_type
                        )));
                    }
                }
                (BufferKind::VariableWidth, Some(_)) => {}
                (_, None) => {
                    return Err(ArrayError::invalid_data(format!(
                        "buffer {i} of {} must not be absent",
                        self.data_type
                    )));
                }
            }
        }

        if matches!(self.data_type, DataType::Null) {
            if self.null_count != self.len {
                return Err(ArrayError::invalid_data(format!(
                    "null array of length {} must have null_count {}, got {}",
                    self.len, self.len, self.null_count
                )));
            }
        } else {
            let computed = compute_null_count(&self.data_type, self.len, self.offset, &self.buffers);
            if computed != self.null_count {
                return Err(ArrayError::invalid_data(format!(
                    "null_count {} does not match the validity bitmap, which has {computed} nulls",
                    self.null_count
                )));
            }
        }

        self.validate_children()?;
        if self.has_offsets() {
            self.validate_offsets()?;
        }
        if matches!(self.data_type, DataType::Utf8) {
            self.validate_utf8()?;
        }
        self.validate_dictionary()
    }

    /// [`ArrayData::validate`] applied recursively to children and the dictionary.
    pub fn validate_full(&self) -> ArrayResult<()> {
        self.validate()?;
        for child in &self.child_data {
            child.validate_full()?;
        }
        if let Some(dict) = &self.dictionary {
            dict.validate_full()?;
        }
        Ok(())
    }

    #[inline]
    fn has_offsets(&self) -> bool {
        matches!(
            self.data_type,
            DataType::Utf8 | DataType::Binary | DataType::List(_) | DataType::Map(_)
        )
    }

    fn validate_children(&self) -> ArrayResult<()> {
        let expected = self.data_type.num_children();
        if self.child_data.len() != expected {
            return Err(ArrayError::invalid_data(format!(
                "{} requires {expected} children, got {}",
                self.data_type,
                self.child_data.len()
            )));
        }
        match &self.data_type {
            DataType::List(t) => self.check_child_type(0, t.elem()),
            DataType::Map(t) => {
                self.check_child_type(0, t.entries_type())?;
                let null_keys = self.child_data[0]
                    .child_data()
                    .first()
                    .map_or(0, |keys| keys.null_count());
                if null_keys > 0 {
                    return Err(ArrayError::invalid_data(format!(
                        "map keys must not be null, found {null_keys} null keys"
                    )));
                }
                Ok(())
            }
            DataType::FixedSizeList(t) => {
                self.check_child_type(0, t.elem())?;
                let need = (self.offset + self.len) * t.size();
                let have = self.child_data[0].len();
                if have < need {
                    return Err(ArrayError::invalid_data(format!(
                        "fixed_size_list child has {have} values, needs {need}"
                    )));
                }
                Ok(())
            }
            DataType::Struct(t) => {
                for (i, field) in t.fields().iter().enumerate() {
                    self.check_child_type(i, &field.data_type)?;
                    let child = &self.child_data[i];
                    if child.len() != self.len {
                        return Err(ArrayError::invalid_data(format!(
                            "struct field \"{}\" has {} rows, parent has {}",
                            field.name,
                            child.len(),
                            self.len
                        )));
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn check_child_type(&self, i: usize, expected: &DataType) -> ArrayResult<()> {
        let found = self.child_data[i].data_type();
        if found != expected {
            return Err(ArrayError::invalid_data(format!(
                "child {i} of {} has type {found}, expected {expected}",
                self.data_type
            )));
        }
        Ok(())
    }

    fn validate_offsets(&self) -> ArrayResult<()> {
        let offsets = self.value_offsets();
        if offsets.is_empty() {
            return Ok(());
        }
        if offsets[0] < 0 {
            return Err(ArrayError::invalid_data(format!(
                "first offset {} is negative",
                offsets[0]
            )));
        }
        if let Some(pos) = offsets.windows(2).position(|w| w[1] < w[0]) {
            return Err(ArrayError::invalid_data(format!(
                "offsets must be non-decreasing, {} follows {} at position {}",
                offsets[pos + 1],
                offsets[pos],
                pos + 1
            )));
        }
        let last = offsets[offsets.len() - 1] as usize;
        let bound = match &self.data_type {
            DataType::Utf8 | DataType::Binary => self.buffer(2).map_or(0, Buffer::len),
            _ => self.child_data[0].len(),
        };
        if last > bound {
            return Err(ArrayError::invalid_data(format!(
                "last offset {last} exceeds the {bound} available values"
            )));
        }
        Ok(())
    }

    fn validate_utf8(&self) -> ArrayResult<()> {
        let offsets = self.value_offsets();
        let Some(values) = self.buffer(2) else {
            return Ok(());
        };
        let bytes = values.as_slice();
        for (i, w) in offsets.windows(2).enumerate() {
            let slot = &bytes[w[0] as usize..w[1] as usize];
            if let Err(e) = std::str::from_utf8(slot) {
                return Err(ArrayError::invalid_data(format!(
                    "invalid UTF-8 in slot {i}: {e}"
                )));
            }
        }
        Ok(())
    }

    fn validate_dictionary(&self) -> ArrayResult<()> {
        match (&self.data_type, &self.dictionary) {
            (DataType::Dictionary(t), Some(dict)) => {
                if dict.data_type() != t.value_type() {
                    return Err(ArrayError::invalid_data(format!(
                        "dictionary values have type {}, expected {}",
                        dict.data_type(),
                        t.value_type()
                    )));
                }
                check_dictionary_indices(self, dict.len())
            }
            (DataType::Dictionary(_), None) => Err(ArrayError::invalid_data(
                "dictionary-encoded data requires a dictionary",
            )),
            (_, Some(_)) => Err(ArrayError::invalid_data(format!(
                "{} data must not carry a dictionary",
                self.data_type
            ))),
            (_, None) => Ok(()),
        }
    }
}

fn compute_null_count(
    data_type: &DataType,
    len: usize,
    offset: usize,
    buffers: &[Option<Buffer>],
) -> usize {
    if matches!(data_type, DataType::Null) {
        return len;
    }
    match buffers.first() {
        Some(Some(bits)) => len - count_set_bits(bits.as_slice(), offset, len),
        _ => 0,
    }
}

impl PartialEq for ArrayData {
    fn eq(&self, other: &Self) -> bool {
        crate::equal::data_equal(self, other)
    }
}

impl Debug for ArrayData {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut s = f.debug_struct("ArrayData");
        s.field("data_type", &format_args!("{}", self.data_type))
            .field("len", &self.len)
            .field("offset", &self.offset)
            .field("null_count", &self.null_count)
            .field("buffers", &self.buffers);
        if !self.child_data.is_empty() {
            s.field("child_data", &self.child_data);
        }
        if let Some(d) = &self.dictionary {
            s.field("dictionary", d);
        }
        s.finish()
    }
}
