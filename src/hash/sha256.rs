//! SHA-256 as specified by FIPS 180-4.
//!
//! The message is padded to a multiple of 64 bytes and folded block by block into an 8-word
//! state. The state is threaded through the fold explicitly, so independent digests never share
//! anything but the constant tables.

use crate::error::Result;
use crate::hash::{self, Hash, MdPadding};
use crate::hex::*;
use std::borrow::Borrow;
use std::fmt;
use std::num::Wrapping as W;

const HASH_SIZE: usize = 32;
const BLOCK_SIZE: usize = 64;

/// Initial hash state: fractional parts of the square roots of the first 8 primes.
#[rustfmt::skip]
pub const H: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a,
    0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// Round constants: fractional parts of the cube roots of the first 64 primes.
#[rustfmt::skip]
pub const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Sha256([u8; HASH_SIZE]);

impl Sha256 {
    // Serialize a hash state, each word big-endian.
    pub fn from_state(state: [u32; 8]) -> Self {
        Self(hash::u32_to_bytes(&state, u32::to_be_bytes))
    }

    pub fn state(&self) -> [u32; 8] {
        hash::bytes_to_u32(self.0, u32::from_be_bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Lowercase hexadecimal rendering, 64 characters.
    pub fn to_hex(&self) -> String {
        self.0.into_iter().hex_collect()
    }
}

impl Hash for Sha256 {
    const OUTPUT_SIZE: usize = HASH_SIZE;
    const BLOCK_SIZE: usize = BLOCK_SIZE;
    type Output = Self;

    fn sum<I>(input: I) -> Self
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: Borrow<u8>,
    {
        let input: Vec<_> = input.into_iter().map(|b| *b.borrow()).collect();
        digest(input)
    }

    fn sum_nopad_with_state<I>(input: I, state: Self) -> Self
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: Borrow<u8>,
    {
        let input: Vec<_> = input.into_iter().map(|b| *b.borrow()).collect();
        let mut state = state.state();
        compress(&mut state, &input);
        Self::from_state(state)
    }
}

impl MdPadding for Sha256 {
    fn md_padding(message_len: usize, size_to_encode: usize) -> Result<Vec<u8>> {
        Ok(hash::md_padding_be(message_len, size_to_encode)?.collect())
    }
}

impl AsRef<[u8]> for Sha256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_SIZE]> for Sha256 {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Sha256> for [u8; HASH_SIZE] {
    fn from(hash: Sha256) -> Self {
        hash.0
    }
}

impl IntoIterator for Sha256 {
    type Item = u8;
    type IntoIter = std::array::IntoIter<u8, HASH_SIZE>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::LowerHex for Sha256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0
            .into_iter()
            .hex_encode()
            .try_for_each(|c| fmt::Write::write_char(f, c))
    }
}

impl fmt::Display for Sha256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::Debug for Sha256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256({self:x})")
    }
}

/// Digest `input`.
///
/// # Panics
///
/// If the bit length of `input` does not fit in 64 bits. Use [`try_digest`] to handle that case.
pub fn digest(input: impl AsRef<[u8]>) -> Sha256 {
    match try_digest(input) {
        Ok(hash) => hash,
        Err(err) => panic!("{err}"),
    }
}

pub fn try_digest(input: impl AsRef<[u8]>) -> Result<Sha256> {
    digest_bytes(input.as_ref())
}

#[tracing::instrument(level = "debug", skip_all, fields(len = input.len()))]
fn digest_bytes(input: &[u8]) -> Result<Sha256> {
    let padded = pad(input)?;
    let mut state = H;
    compress(&mut state, &padded);
    Ok(Sha256::from_state(state))
}

// Append the Merkle–Damgård padding to a copy of the input.
pub fn pad(input: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    let input = input.as_ref();
    let padding = hash::md_padding(input.len())?;
    let mut padded = Vec::with_capacity(input.len() + BLOCK_SIZE + 8);
    padded.extend_from_slice(input);
    padded.extend(padding);
    Ok(padded)
}

/// Fold every 64-byte block of `blocks` into `state`, in order.
///
/// # Panics
///
/// If `blocks` is not a whole number of blocks; padding never produces such input.
pub fn compress(state: &mut [u32; 8], blocks: &[u8]) {
    assert_eq!(
        blocks.len() % BLOCK_SIZE,
        0,
        "compressed input must be padded to a multiple of {BLOCK_SIZE} bytes"
    );
    tracing::trace!(blocks = blocks.len() / BLOCK_SIZE, "compressing");
    *state = blocks.chunks_exact(BLOCK_SIZE).fold(*state, compress_block);
}

fn compress_block(state: [u32; 8], block: &[u8]) -> [u32; 8] {
    let words = schedule(block);
    let (ch, maj) = (w(ch), w(maj));

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = state.map(W);
    for (&k, &word) in K.iter().zip(words.iter()) {
        let temp1 = h + W(big_sigma1(e.0)) + ch(e, f, g) + W(k) + W(word);
        let temp2 = W(big_sigma0(a.0)) + maj(a, b, c);
        (h, g, f, e, d, c, b, a) = (g, f, e, d + temp1, c, b, a, temp1 + temp2);
    }

    let mut state = state.map(W);
    for (hi, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *hi += v;
    }
    state.map(|hi| hi.0)
}

// Expand a block's 16 big-endian words into the 64-word message schedule.
fn schedule(block: &[u8]) -> [u32; 64] {
    let mut words = [0; 64];
    words[..16].copy_from_slice(&hash::bytes_to_u32::<16>(block, u32::from_be_bytes));
    for j in 16..64 {
        words[j] = (W(words[j - 16])
            + W(small_sigma0(words[j - 15]))
            + W(words[j - 7])
            + W(small_sigma1(words[j - 2])))
        .0;
    }
    words
}

// Helper function to convert non-wrapped functions into wrapped ones.
fn w(f: fn(u32, u32, u32) -> u32) -> impl Fn(W<u32>, W<u32>, W<u32>) -> W<u32> {
    move |a: W<u32>, b: W<u32>, c: W<u32>| -> W<u32> { W(f(a.0, b.0, c.0)) }
}

fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}
fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}
fn big_sigma0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}
fn big_sigma1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}
fn small_sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}
fn small_sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

// Trait extension to sha256sum method to any iterator.
pub trait Sha256HashExt: Iterator {
    fn sha256sum(self) -> std::array::IntoIter<u8, HASH_SIZE>
    where
        Self: Sized,
        Self::Item: Borrow<u8>,
    {
        Sha256::sum(self).into_iter()
    }
}

impl<I: Iterator> Sha256HashExt for I {}

// Trait extension to add sha256sum method to anything that can be &str.
pub trait Sha256HashStrExt: AsRef<str> {
    fn sha256sum(&self) -> std::array::IntoIter<u8, HASH_SIZE>
    where
        Self: Sized,
    {
        digest(self.as_ref()).into_iter()
    }
}

impl<S: AsRef<str>> Sha256HashStrExt for S {}
