//! # Layout Module
//!
//! Physical buffer layout implied by a [`DataType`](crate::DataType).
//!
//! Child arrays are not part of the layout; only the buffers owned directly by an
//! array of the type are listed, in order.

/// Kind of one physical buffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Slot holds no memory; every element is null.
    AlwaysNull,
    /// Bit-packed, LSB-first.
    Bitmap,
    /// `byte_width` bytes per element.
    FixedWidth { byte_width: usize },
    /// Raw bytes addressed by a preceding offsets buffer.
    VariableWidth,
}

/// Ordered buffer kinds plus whether a side dictionary is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTypeLayout {
    pub buffers: Vec<BufferKind>,
    pub has_dictionary: bool,
}

impl DataTypeLayout {
    pub fn new(buffers: Vec<BufferKind>) -> Self {
        Self {
            buffers,
            has_dictionary: false,
        }
    }

    #[inline]
    pub fn num_buffers(&self) -> usize {
        self.buffers.len()
    }
}
