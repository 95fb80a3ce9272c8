pub mod sha256;

use crate::error::{Error, Result};
use std::borrow::Borrow;
use std::iter;

// A Merkle–Damgård hash over fixed-size blocks.
pub trait Hash {
    const OUTPUT_SIZE: usize;
    const BLOCK_SIZE: usize;
    type Output: AsRef<[u8]> + Copy;

    // Perform the hash function on any arbitrary iterator of bytes.
    fn sum<I>(input: I) -> Self::Output
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: Borrow<u8>;

    // Resume the hash function from a serialized state over input that is already padded to a
    // multiple of BLOCK_SIZE bytes.
    fn sum_nopad_with_state<I>(input: I, state: Self::Output) -> Self::Output
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: Borrow<u8>;
}

pub trait MdPadding {
    // Padding for a message of message_len bytes that encodes size_to_encode as its length.
    fn md_padding(message_len: usize, size_to_encode: usize) -> Result<Vec<u8>>;
}

// Bit length of a message of len bytes, if it fits the 64-bit length field.
pub fn bit_length(len: usize) -> Result<u64> {
    u64::try_from(len)
        .ok()
        .and_then(|len| len.checked_mul(8))
        .ok_or_else(|| {
            tracing::warn!(len, "message length overflows the 64-bit length field");
            Error::InputTooLarge { len }
        })
}

// Generate big-endian Merkle–Damgård padding for a message of len bytes.
pub fn md_padding(len: usize) -> Result<impl Iterator<Item = u8>> {
    md_padding_be(len, len)
}

// Padding for message_len bytes of trailing message, encoding size_to_encode bytes as the total.
pub fn md_padding_be(
    message_len: usize,
    size_to_encode: usize,
) -> Result<impl Iterator<Item = u8>> {
    let bits = bit_length(size_to_encode)?;
    // Always pad with one bit.
    // Then pad enough 0 bits to get the length 64 bits less than a multiple of 512.
    // Then always pad with the encoded message length in bits.
    let zeros = 63 - (message_len % 64 + 8) % 64;
    Ok(iter::once(0x80)
        .chain(iter::repeat(0).take(zeros))
        .chain(bits.to_be_bytes()))
}

// Split serialized bytes into N words.
pub fn bytes_to_u32<const N: usize>(bytes: impl AsRef<[u8]>, f: fn([u8; 4]) -> u32) -> [u32; N] {
    let mut words = [0; N];
    for (word, chunk) in words.iter_mut().zip(bytes.as_ref().chunks_exact(4)) {
        *word = f([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

// Serialize words into M bytes.
pub fn u32_to_bytes<const M: usize>(words: &[u32], f: fn(u32) -> [u8; 4]) -> [u8; M] {
    debug_assert_eq!(words.len() * 4, M);
    let mut output = [0; M];
    output
        .iter_mut()
        .zip(words.iter().flat_map(|&word| f(word)))
        .for_each(|(out, byte)| *out = byte);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md_padding_shape() {
        for len in 0..=200 {
            let padding: Vec<_> = md_padding(len).unwrap().collect();
            assert_eq!((len + padding.len()) % 64, 0, "failed test for len {len}");
            assert_eq!(padding[0], 0x80, "failed test for len {len}");
            let (zeros, length) = padding[1..].split_at(padding.len() - 9);
            assert!(zeros.iter().all(|&b| b == 0), "failed test for len {len}");
            assert_eq!(length, (len as u64 * 8).to_be_bytes());
        }
    }

    #[test]
    fn test_md_padding_block_boundary() {
        // 55 bytes leave exactly enough room for the marker and the length.
        assert_eq!(md_padding(55).unwrap().count(), 9);
        // 56 bytes spill into a second block.
        assert_eq!(md_padding(56).unwrap().count(), 72);
        assert_eq!(md_padding(64).unwrap().count(), 64);
        assert_eq!(md_padding(0).unwrap().count(), 64);
    }

    #[test]
    fn test_md_padding_encodes_given_size() {
        let padding: Vec<_> = md_padding_be(3, 131).unwrap().collect();
        assert_eq!(padding.len(), 61);
        assert_eq!(padding[53..], (131u64 * 8).to_be_bytes());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_bit_length_overflow() {
        assert_eq!(bit_length((1 << 61) - 1).unwrap(), u64::MAX - 7);
        assert_eq!(
            bit_length(1 << 61).unwrap_err(),
            Error::InputTooLarge { len: 1 << 61 }
        );
        assert!(md_padding(usize::MAX).is_err());
    }

    #[test]
    fn test_word_conversion() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0xa0, 0xb0, 0xc0, 0xd0];
        let words = bytes_to_u32::<2>(bytes, u32::from_be_bytes);
        assert_eq!(words, [0x01020304, 0xa0b0c0d0]);
        assert_eq!(u32_to_bytes::<8>(&words, u32::to_be_bytes), bytes);
        let words = bytes_to_u32::<2>(bytes, u32::from_le_bytes);
        assert_eq!(words, [0x04030201, 0xd0c0b0a0]);
    }
}
