//! `(2^n - 1, 2^n - n - 1)` Hamming codes for `2 <= n <= 30`.
//!
//! The code itself is textbook; how payload bits are mapped onto code words is
//! not, so this implementation fixes the layout:
//! - Payload bits are consumed least significant bit first, in increasing byte
//!   order, as one continuous stream. Code words do not respect payload byte
//!   boundaries; a payload byte may end up spread over several code words.
//! - Code word bit `i` (0-based) holds the textbook position `i + 1`. Positions
//!   that are powers of two carry parity, all others carry payload bits. Words
//!   are addressed with the same LSB-first convention as payloads, so the
//!   textbook (15,11) word `pp0p123p456789A` is stored as `p321p0pp _A987654`.
//! - Every code word is zero-padded up to a byte boundary.
//! - Decoded payloads may carry trailing zero bits from the last word.

use tracing::{debug, trace};

use crate::bitvec::BitAddressable;
use crate::bitwise::is_parity_position;
use crate::{Error, ErrorCorrectingCode, Result};

/// Width of the syndrome accumulator.
pub const MAX_PARITY_BITS: usize = 32;
/// Bit offsets inside a padded code word stay below 2^31.
const MAX_WORD_BITS: usize = i32::MAX as usize;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hamming {
    codebits: usize,
    databits: usize,
    paddingbits: usize,
    word_bytes: usize,
}

impl Hamming {
    /// Creates a codec for code words of `codebits = 2^n - 1` bits.
    pub fn new(codebits: usize) -> Result<Self> {
        let parity_bits = match codebits.checked_add(1) {
            Some(n) if codebits >= 3 && n.is_power_of_two() => n.trailing_zeros() as usize,
            None => usize::BITS as usize,
            _ => return Err(Error::InvalidCodeBits { codebits }),
        };
        if parity_bits > MAX_PARITY_BITS {
            return Err(Error::TooManyParityBits {
                parity_bits,
                max: MAX_PARITY_BITS,
            });
        }
        let paddingbits = (8 - codebits % 8) % 8;
        if codebits + paddingbits > MAX_WORD_BITS {
            return Err(Error::WordTooLarge { codebits });
        }
        let hamming = Hamming {
            codebits,
            databits: codebits - parity_bits,
            paddingbits,
            word_bytes: (codebits + paddingbits) / 8,
        };
        debug!(
            codebits,
            databits = hamming.databits,
            word_bytes = hamming.word_bytes,
            "hamming codec"
        );
        Ok(hamming)
    }

    pub fn h7_4() -> Self {
        Hamming {
            codebits: 7,
            databits: 4,
            paddingbits: 1,
            word_bytes: 1,
        }
    }

    pub fn h15_11() -> Self {
        Hamming {
            codebits: 15,
            databits: 11,
            paddingbits: 1,
            word_bytes: 2,
        }
    }

    pub fn codebits(&self) -> usize {
        self.codebits
    }
    pub fn databits(&self) -> usize {
        self.databits
    }
    pub fn parity_bits(&self) -> usize {
        self.codebits - self.databits
    }
    pub fn padding_bits(&self) -> usize {
        self.paddingbits
    }
    pub fn word_bytes(&self) -> usize {
        self.word_bytes
    }

    /// Size of `payload_len` bytes once encoded.
    pub fn encoded_len(&self, payload_len: usize) -> usize {
        (payload_len * 8).div_ceil(self.databits) * self.word_bytes
    }

    /// Size of the payload recovered from `encoded_len` bytes, padding included.
    pub fn decoded_len(&self, encoded_len: usize) -> usize {
        (encoded_len / self.word_bytes * self.databits).div_ceil(8)
    }

    fn word_bits(&self) -> usize {
        self.word_bytes * 8
    }

    /// 1-based parity positions: 1, 2, 4, ...
    fn parity_positions(&self) -> impl Iterator<Item = usize> {
        (0..self.parity_bits()).map(|k| 1 << k)
    }

    /// 0-based indices of the data bits within a word.
    fn data_bits(&self) -> impl Iterator<Item = usize> {
        (0..self.codebits).filter(|bit| !is_parity_position(bit + 1))
    }

    /// Parity over every bit past `position` whose 1-based index shares its bit.
    fn parity(&self, buffer: &[u8], offset: usize, position: usize) -> u8 {
        (position..self.codebits)
            .filter(|bit| (bit + 1) & position != 0)
            .fold(0, |parity, bit| parity ^ buffer.bit_or_zero(offset + bit))
    }

    /// 1-based index of the flipped bit of the word at `offset`, 0 if none.
    fn syndrome(&self, buffer: &[u8], offset: usize) -> usize {
        let mut computed = 0u32;
        let mut stored = 0u32;
        for (k, position) in self.parity_positions().enumerate() {
            computed |= u32::from(self.parity(buffer, offset, position)) << k;
            stored |= u32::from(buffer.bit_or_zero(offset + position - 1)) << k;
        }
        (computed ^ stored) as usize
    }

    fn check_shape(&self, buffer: &[u8]) -> Result<()> {
        if buffer.len() % self.word_bytes != 0 {
            return Err(Error::InvalidState {
                len: buffer.len(),
                expected: format!("a multiple of {} bytes", self.word_bytes),
            });
        }
        Ok(())
    }
}

impl ErrorCorrectingCode for Hamming {
    /// Spreads the payload over zeroed code words, leaving parity positions clear.
    fn initialize(&self, buffer: &mut Vec<u8>) {
        let words = (buffer.len() * 8).div_ceil(self.databits);
        let mut encoded = vec![0u8; words * self.word_bytes];
        let mut data_bit = 0;
        for word in 0..words {
            let offset = word * self.word_bits();
            for bit in self.data_bits() {
                encoded.set_bit(offset + bit, buffer.bit_or_zero(data_bit));
                data_bit += 1;
            }
        }
        *buffer = encoded;
    }

    fn compute(&self, buffer: &mut Vec<u8>) -> Result<()> {
        self.check_shape(buffer)?;
        let words = buffer.len() / self.word_bytes;
        for word in 0..words {
            let offset = word * self.word_bits();
            for position in self.parity_positions() {
                let parity = self.parity(buffer, offset, position);
                buffer.set_bit(offset + position - 1, parity);
            }
        }
        Ok(())
    }

    /// Corrects up to one flipped bit per code word and extracts the payload.
    ///
    /// Always returns `Ok(true)` for a well-shaped buffer: a word with two or
    /// more flipped bits is indistinguishable from one with a single flip and
    /// gets silently miscorrected. Layer a detecting code such as
    /// [`Crc16`](crate::Crc16) underneath if that matters.
    fn verify(&self, buffer: &mut Vec<u8>) -> Result<bool> {
        self.check_shape(buffer)?;
        let words = buffer.len() / self.word_bytes;
        let mut decoded = vec![0u8; self.decoded_len(buffer.len())];
        let mut data_bit = 0;
        for word in 0..words {
            let offset = word * self.word_bits();
            let flipped = self.syndrome(buffer, offset);
            assert!(
                flipped <= self.codebits,
                "syndrome {} points outside of a {} bit code word",
                flipped,
                self.codebits
            );
            if flipped > 0 {
                trace!(word, bit = flipped - 1, "correcting flipped bit");
                buffer.flip_bit(offset + flipped - 1);
            }
            for bit in self.data_bits() {
                decoded.set_bit(data_bit, buffer.bit_or_zero(offset + bit));
                data_bit += 1;
            }
        }
        *buffer = decoded;
        Ok(true)
    }

    fn overhead(&self, payload_len: usize) -> usize {
        self.encoded_len(payload_len) - payload_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VECTOR_1: [u8; 2] = [0xff, 0xff];
    const VECTOR_2: [u8; 2] = [0xf4, 0x4f];

    // one bit error per two bytes, correctable for (7,4) and (15,11)
    const MASK_1: [u8; 4] = [0b1000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0001];
    // one bit error per byte, correctable for (7,4) but not for (15,11)
    const MASK_2: [u8; 4] = [0b0000_1000, 0b0001_0000, 0b0010_0000, 0b0000_0010];
    // two bit errors per byte, correctable for neither
    const MASK_3: [u8; 4] = [0b0100_1000, 0b0001_0010, 0b0010_0100, 0b0000_1001];

    fn initialized(hamming: &Hamming, payload: &[u8]) -> Vec<u8> {
        let mut buffer = payload.to_vec();
        hamming.initialize(&mut buffer);
        buffer
    }

    fn encoded(hamming: &Hamming, payload: &[u8]) -> Vec<u8> {
        let mut buffer = payload.to_vec();
        hamming.encode(&mut buffer).unwrap();
        buffer
    }

    /// Encodes, applies `mask`, verifies, and checks everything past
    /// `expected` is zero padding.
    fn run_verify(hamming: &Hamming, payload: &[u8], mask: &[u8], expected: &[u8]) {
        let mut buffer = encoded(hamming, payload);
        for (byte, m) in buffer.iter_mut().zip(mask) {
            *byte ^= m;
        }
        assert!(hamming.verify(&mut buffer).unwrap());
        assert_eq!(buffer.len(), hamming.decoded_len(hamming.encoded_len(payload.len())));
        assert!(buffer.len() >= expected.len());
        assert_eq!(&buffer[..expected.len()], expected);
        assert!(buffer[expected.len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn parameters() {
        let hamming = Hamming::new(7).unwrap();
        assert_eq!(hamming, Hamming::h7_4());
        assert_eq!(hamming.databits(), 4);
        assert_eq!(hamming.parity_bits(), 3);
        assert_eq!(hamming.padding_bits(), 1);
        assert_eq!(hamming.word_bytes(), 1);

        assert_eq!(Hamming::new(15).unwrap(), Hamming::h15_11());

        let hamming = Hamming::new(3).unwrap();
        assert_eq!(hamming.databits(), 1);
        assert_eq!(hamming.padding_bits(), 5);

        let hamming = Hamming::new(255).unwrap();
        assert_eq!(hamming.databits(), 247);
        assert_eq!(hamming.padding_bits(), 1);
        assert_eq!(hamming.word_bytes(), 32);
    }

    #[test]
    fn invalid_codebits() {
        for codebits in [0, 1, 2, 4, 6, 8, 14, 16, 100] {
            assert_eq!(
                Hamming::new(codebits),
                Err(Error::InvalidCodeBits { codebits })
            );
        }
    }

    #[test]
    fn oversized_codebits() {
        assert_eq!(
            Hamming::new(2147483647),
            Err(Error::WordTooLarge {
                codebits: 2147483647
            })
        );
        assert_eq!(
            Hamming::new(usize::MAX),
            Err(Error::TooManyParityBits {
                parity_bits: usize::BITS as usize,
                max: MAX_PARITY_BITS
            })
        );
        assert_eq!(Hamming::new((1 << 30) - 1).unwrap().parity_bits(), 30);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn too_many_parity_bits() {
        assert_eq!(
            Hamming::new((1 << 33) - 1),
            Err(Error::TooManyParityBits {
                parity_bits: 33,
                max: MAX_PARITY_BITS
            })
        );
    }

    #[test]
    fn lengths() {
        let hamming = Hamming::h7_4();
        assert_eq!(hamming.encoded_len(0), 0);
        assert_eq!(hamming.encoded_len(1), 2);
        assert_eq!(hamming.encoded_len(2), 4);
        assert_eq!(hamming.decoded_len(4), 2);
        assert_eq!(hamming.overhead(2), 2);

        let hamming = Hamming::h15_11();
        assert_eq!(hamming.encoded_len(2), 4);
        assert_eq!(hamming.decoded_len(4), 3);
        assert_eq!(hamming.encoded_len(3), 6);

        let hamming = Hamming::new(3).unwrap();
        assert_eq!(hamming.encoded_len(1), 8);
        assert_eq!(hamming.decoded_len(8), 1);
    }

    #[test]
    fn initialize_7_4() {
        let hamming = Hamming::h7_4();
        // 76543210 -> _321p0pp | _765p4pp
        assert_eq!(initialized(&hamming, &VECTOR_1), vec![0x74, 0x74, 0x74, 0x74]);
        assert_eq!(initialized(&hamming, &VECTOR_2), vec![0x20, 0x74, 0x74, 0x20]);
    }

    #[test]
    fn initialize_15_11() {
        let hamming = Hamming::h15_11();
        // 76543210 FEDCBA98 -> p321p0pp _A987654 | pEDCpBpp _______F
        assert_eq!(initialized(&hamming, &VECTOR_1), vec![0x74, 0x7f, 0x74, 0x01]);
        assert_eq!(initialized(&hamming, &VECTOR_2), vec![0x20, 0x7f, 0x44, 0x00]);
    }

    #[test]
    fn initialize_3_1() {
        let hamming = Hamming::new(3).unwrap();
        assert_eq!(
            initialized(&hamming, &[0x01]),
            vec![0x04, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn initialize_empty() {
        assert!(initialized(&Hamming::h7_4(), &[]).is_empty());
    }

    #[test]
    fn compute_7_4() {
        let hamming = Hamming::h7_4();
        assert_eq!(encoded(&hamming, &[0xff]), vec![0b0111_1111, 0b0111_1111]);
        assert_eq!(encoded(&hamming, &VECTOR_1), vec![0x7f, 0x7f, 0x7f, 0x7f]);
        assert_eq!(encoded(&hamming, &VECTOR_2), vec![0x2a, 0x7f, 0x7f, 0x2a]);
    }

    #[test]
    fn compute_15_11() {
        let hamming = Hamming::h15_11();
        assert_eq!(encoded(&hamming, &VECTOR_1), vec![0xff, 0x7f, 0xfe, 0x01]);
        assert_eq!(encoded(&hamming, &VECTOR_2), vec![0xaa, 0x7f, 0x4c, 0x00]);
    }

    #[test]
    fn compute_misaligned() {
        let hamming = Hamming::h15_11();
        let mut buffer = vec![0x74, 0x7f, 0x74];
        assert!(matches!(
            hamming.compute(&mut buffer),
            Err(Error::InvalidState { len: 3, .. })
        ));
        assert_eq!(buffer, vec![0x74, 0x7f, 0x74]);
    }

    #[test]
    fn verify_misaligned() {
        let hamming = Hamming::h15_11();
        let mut buffer = vec![0xff, 0x7f, 0xfe];
        assert!(matches!(
            hamming.verify(&mut buffer),
            Err(Error::InvalidState { len: 3, .. })
        ));
        assert_eq!(buffer, vec![0xff, 0x7f, 0xfe]);
    }

    #[test]
    fn verify_empty() {
        let mut buffer = vec![];
        assert!(Hamming::h7_4().verify(&mut buffer).unwrap());
        assert!(buffer.is_empty());
    }

    #[test]
    fn verify_valid() {
        for hamming in [Hamming::h7_4(), Hamming::h15_11()] {
            run_verify(&hamming, &VECTOR_1, &[], &VECTOR_1);
            run_verify(&hamming, &VECTOR_2, &[], &VECTOR_2);
        }
    }

    #[test]
    fn verify_bitflip_7_4() {
        let hamming = Hamming::h7_4();
        run_verify(&hamming, &VECTOR_1, &MASK_1, &VECTOR_1);
        run_verify(&hamming, &VECTOR_1, &MASK_2, &VECTOR_1);
        run_verify(&hamming, &VECTOR_2, &MASK_1, &VECTOR_2);
        run_verify(&hamming, &VECTOR_2, &MASK_2, &VECTOR_2);
    }

    #[test]
    fn verify_bitflip_15_11() {
        let hamming = Hamming::h15_11();
        run_verify(&hamming, &VECTOR_1, &MASK_1, &VECTOR_1);
        run_verify(&hamming, &VECTOR_2, &MASK_1, &VECTOR_2);
    }

    #[test]
    fn miscorrection_7_4() {
        let hamming = Hamming::h7_4();
        run_verify(&hamming, &VECTOR_1, &MASK_3, &[0x56, 0xd8]);
        run_verify(&hamming, &VECTOR_2, &MASK_3, &[0x5d, 0x68]);
    }

    #[test]
    fn miscorrection_15_11() {
        let hamming = Hamming::h15_11();
        run_verify(&hamming, &VECTOR_1, &MASK_2, &[0xef, 0xde, 0x05]);
        run_verify(&hamming, &VECTOR_2, &MASK_2, &[0xe4, 0x6e, 0x05]);
        run_verify(&hamming, &VECTOR_1, &MASK_3, &[0xd7, 0x56, 0x04]);
        run_verify(&hamming, &VECTOR_2, &MASK_3, &[0xdc, 0xe6, 0x04]);
        // a miscorrected payload encodes and miscorrects again just as deterministically
        run_verify(&hamming, &[0xef, 0xde, 0x05], &MASK_3, &[0xc7, 0x77, 0x01]);
        run_verify(&hamming, &[0xe4, 0x6e, 0x05], &MASK_3, &[0xcc, 0xc7, 0x01]);
    }

    #[test]
    fn padding_bits_ignored() {
        let hamming = Hamming::h7_4();
        let mut buffer = encoded(&hamming, &VECTOR_2);
        for byte in buffer.iter_mut() {
            *byte |= 0x80;
        }
        assert!(hamming.verify(&mut buffer).unwrap());
        assert_eq!(buffer, VECTOR_2.to_vec());
    }
}
