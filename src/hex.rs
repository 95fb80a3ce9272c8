// An iterator rendering bytes as lowercase hex characters, high nibble first.
pub struct HexEncoder<I>
where
    I: Iterator,
{
    upstream: I,
    low: Option<u8>,
}

impl<I> HexEncoder<I>
where
    I: Iterator,
    I::Item: Into<u8>,
{
    const LUT: [u8; 16] = *b"0123456789abcdef";
}

impl<I> Iterator for HexEncoder<I>
where
    I: Iterator,
    I::Item: Into<u8>,
{
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        // Emit the pending low nibble before pulling the next byte.
        let nibble = match self.low.take() {
            Some(n) => n,
            None => {
                let byte = self.upstream.next()?.into();
                self.low = Some(byte & 0x0f);
                byte >> 4
            }
        };
        Some(Self::LUT[nibble as usize] as char)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = usize::from(self.low.is_some());
        let (lower, upper) = self.upstream.size_hint();
        (
            lower.saturating_mul(2).saturating_add(pending),
            upper.and_then(|n| n.checked_mul(2)?.checked_add(pending)),
        )
    }
}

// Trait extension to add hex_encode method to any iterator.
pub trait HexEncoderExt: Iterator {
    fn hex_encode(self) -> HexEncoder<Self>
    where
        Self: Sized,
    {
        HexEncoder {
            upstream: self,
            low: None,
        }
    }
}

impl<I: Iterator> HexEncoderExt for I {}

// Trait extension to add hex_collect method to any iterator.
pub trait HexCollecterExt: Iterator {
    fn hex_collect<B>(self) -> B
    where
        Self: Sized,
        Self::Item: Into<u8>,
        B: FromIterator<char>,
    {
        self.hex_encode().collect()
    }
}

impl<I: Iterator> HexCollecterExt for I {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_to_hex() {
        let result: String = [0u8, 1, 0x7f, 0x80, 0xab, 0xff]
            .into_iter()
            .hex_encode()
            .collect();
        assert_eq!(result, "00017f80abff");
    }

    #[test]
    fn hex_size_hint() {
        let mut encoder = [0xde_u8, 0xad].into_iter().hex_encode();
        assert_eq!(encoder.size_hint(), (4, Some(4)));
        encoder.next();
        assert_eq!(encoder.size_hint(), (3, Some(3)));
        assert_eq!(encoder.collect::<String>(), "ead");
    }

    #[test]
    fn hex_collect_empty() {
        assert_eq!(std::iter::empty::<u8>().hex_collect::<String>(), "");
    }
}
