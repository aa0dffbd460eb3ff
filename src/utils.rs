//! # Utilities - *Internal Bit Helpers*
//!
//! A small collection of bit-packing helpers that support validity bitmaps,
//! boolean values and validation elsewhere within the crate.
//!
//! All helpers use Arrow's LSB-first bit order: element `i` lives in byte `i / 8`
//! at bit `i % 8`.

/// Number of bytes needed to hold `bits` bits.
#[inline]
pub fn bytes_for(bits: usize) -> usize {
    bits.div_ceil(8)
}

#[inline]
pub fn get_bit(bytes: &[u8], i: usize) -> bool {
    bytes[i >> 3] & (1u8 << (i & 7)) != 0
}

#[inline]
pub fn set_bit(bytes: &mut [u8], i: usize) {
    bytes[i >> 3] |= 1u8 << (i & 7);
}

#[inline]
pub fn unset_bit(bytes: &mut [u8], i: usize) {
    bytes[i >> 3] &= !(1u8 << (i & 7));
}

/// Counts set bits in `[offset, offset + len)`.
pub fn count_set_bits(bytes: &[u8], offset: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let end = offset + len;
    let first_full = offset.div_ceil(8);
    let last_full = end / 8;

    if first_full >= last_full {
        return (offset..end).filter(|&i| get_bit(bytes, i)).count();
    }

    let head = (offset..first_full * 8).filter(|&i| get_bit(bytes, i)).count();
    let body: usize = bytes[first_full..last_full]
        .iter()
        .map(|b| b.count_ones() as usize)
        .sum();
    let tail = (last_full * 8..end).filter(|&i| get_bit(bytes, i)).count();
    head + body + tail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_ops() {
        let mut bytes = vec![0u8; 2];
        set_bit(&mut bytes, 0);
        set_bit(&mut bytes, 9);
        assert_eq!(bytes, vec![0b0000_0001, 0b0000_0010]);
        assert!(get_bit(&bytes, 9));
        unset_bit(&mut bytes, 9);
        assert!(!get_bit(&bytes, 9));
    }

    #[test]
    fn test_count_set_bits() {
        let bytes = [0xFFu8, 0b1010_1010, 0x0F];
        assert_eq!(count_set_bits(&bytes, 0, 24), 16);
        assert_eq!(count_set_bits(&bytes, 3, 5), 5);
        assert_eq!(count_set_bits(&bytes, 4, 14), 4 + 4 + 2);
        assert_eq!(count_set_bits(&bytes, 9, 0), 0);
    }

    #[test]
    fn test_bytes_for() {
        assert_eq!(bytes_for(0), 0);
        assert_eq!(bytes_for(1), 1);
        assert_eq!(bytes_for(8), 1);
        assert_eq!(bytes_for(9), 2);
    }
}
