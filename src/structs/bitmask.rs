//! # **Bitmask Module** - *Read view over a packed bit buffer*
//!
//! Arrow-compatible, packed validity/boolean bitmask over a shared [`Buffer`].
//!
//! ## Purpose
//! - Validity (null) masks for all array types (1 = valid, 0 = null).
//! - Value storage for `BooleanArray`.
//!
//! ## Behaviour
//! - LSB corresponds to the first logical element.
//! - A bitmask is a zero-copy window `[offset, offset + len)` over its buffer.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::structs::buffer::Buffer;
use crate::utils::{bytes_for, count_set_bits, get_bit};

/// # Bitmask
///
/// Windowed, read-only packed bitmask.
///
/// # Example
/// ```rust
/// use nestarrow::{Bitmask, Buffer};
///
/// let bits = Buffer::from_slice(&[0b0000_1010u8]);
/// let m = Bitmask::new(bits, 1, 4);
/// assert!(m.get(0));   // bit 1
/// assert!(!m.get(1));  // bit 2
/// assert_eq!(m.count_set_bits(), 2);
/// ```
#[derive(Clone)]
pub struct Bitmask {
    bits: Buffer,
    offset: usize,
    len: usize,
}

impl Bitmask {
    /// Panics if the buffer is too short for the window.
    pub fn new(bits: Buffer, offset: usize, len: usize) -> Self {
        assert!(
            bits.len() >= bytes_for(offset + len),
            "bitmask buffer of {} bytes cannot hold {} bits at offset {}",
            bits.len(),
            len,
            offset
        );
        Self { bits, offset, len }
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
    pub fn buffer(&self) -> &Buffer {
        &self.bits
    }

    /// Bit at logical position `i`. Panics when out of range.
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.len, "bitmask index {i} out of range for length {}", self.len);
        get_bit(self.bits.as_slice(), self.offset + i)
    }

    #[inline]
    pub fn count_set_bits(&self) -> usize {
        count_set_bits(self.bits.as_slice(), self.offset, self.len)
    }

    /// Number of cleared bits, i.e. nulls when used as a validity mask.
    #[inline]
    pub fn null_count(&self) -> usize {
        self.len - self.count_set_bits()
    }

    /// Narrower window sharing the same buffer.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.len, "bitmask slice out of range");
        Self {
            bits: self.bits.clone(),
            offset: self.offset + offset,
            len,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        let bytes = self.bits.as_slice();
        (self.offset..self.offset + self.len).map(move |i| get_bit(bytes, i))
    }
}

impl PartialEq for Bitmask {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Debug for Bitmask {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_list()
            .entries(self.iter().map(|b| b as u8))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_and_counts() {
        let m = Bitmask::new(Buffer::from_slice(&[0b1111_0000u8, 0b0000_0001]), 0, 9);
        assert_eq!(m.count_set_bits(), 5);
        assert_eq!(m.null_count(), 4);
        let s = m.slice(4, 5);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![true; 5]);
        assert_eq!(s.null_count(), 0);
    }

    #[test]
    fn test_equality_ignores_offset() {
        let a = Bitmask::new(Buffer::from_slice(&[0b0000_0101u8]), 0, 3);
        let b = Bitmask::new(Buffer::from_slice(&[0b0000_1010u8]), 1, 3);
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "cannot hold")]
    fn test_short_buffer_panics() {
        let _ = Bitmask::new(Buffer::from_slice(&[0u8]), 4, 8);
    }
}
