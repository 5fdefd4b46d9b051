//! Bit addressing over byte buffers.
//!
//! Bit `i` of a buffer is bit `i % 8` of byte `i / 8`, bit 0 being the least
//! significant bit of a byte. Hamming payloads and code words are both
//! addressed this way.

pub trait BitAddressable {
    /// Returns bit `index`, or zero when `index` lies past the end of the buffer.
    fn bit_or_zero(&self, index: usize) -> u8;

    /// Copies the least significant bit of `bit` to `index`.
    ///
    /// ## Panics
    /// - If `index / 8` is out of bounds
    fn set_bit(&mut self, index: usize, bit: u8);

    /// ## Panics
    /// - If `index / 8` is out of bounds
    fn flip_bit(&mut self, index: usize);
}

impl BitAddressable for [u8] {
    #[inline]
    fn bit_or_zero(&self, index: usize) -> u8 {
        match self.get(index / 8) {
            Some(byte) => (byte >> (index % 8)) & 1,
            None => 0,
        }
    }

    #[inline]
    fn set_bit(&mut self, index: usize, bit: u8) {
        let shift = index % 8;
        let byte = &mut self[index / 8];
        *byte = (*byte & !(1 << shift)) | ((bit & 1) << shift);
    }

    #[inline]
    fn flip_bit(&mut self, index: usize) {
        self[index / 8] ^= 1 << (index % 8);
    }
}

#[test]
fn get() {
    let buffer = [0b1000_0001u8, 0b0000_0010];
    assert_eq!(buffer.bit_or_zero(0), 1);
    assert_eq!(buffer.bit_or_zero(1), 0);
    assert_eq!(buffer.bit_or_zero(7), 1);
    assert_eq!(buffer.bit_or_zero(9), 1);
    assert_eq!(buffer.bit_or_zero(16), 0);
    assert_eq!(buffer.bit_or_zero(1000), 0);
}

#[test]
fn set() {
    let mut buffer = vec![0u8; 2];
    buffer.set_bit(3, 1);
    buffer.set_bit(15, 0xff);
    assert_eq!(buffer, vec![0b0000_1000, 0b1000_0000]);
    buffer.set_bit(3, 0);
    buffer.set_bit(8, 0b10);
    assert_eq!(buffer, vec![0, 0b1000_0000]);
}

#[test]
fn flip() {
    let mut buffer = vec![0xf0u8];
    buffer.flip_bit(0);
    buffer.flip_bit(7);
    assert_eq!(buffer, vec![0x71]);
}

#[test]
#[should_panic]
fn set_out_of_bounds() {
    let mut buffer = vec![0u8; 1];
    buffer.set_bit(8, 1);
}
