//! Inverted CRC-16-CCITT, polynomial `x^16 + x^12 + x^5 + 1`, initial register `0x84cf`.
//!
//! Input bits are consumed most significant bit first, in increasing byte
//! order. The inverted register is stored after the data, most significant
//! byte first. Running the register over data and stored checksum together
//! yields zero when nothing was corrupted.

use byteorder::{BigEndian, ByteOrder};
use tracing::debug;

use crate::{Error, ErrorCorrectingCode, Result};

pub const POLYNOMIAL: u16 = 0x1021;
pub const INITIAL: u16 = 0x84cf;
/// Size of the frame check sequence in bytes.
pub const FCS_LEN: usize = 2;

/// Runs the shift register over `data` and returns the inverted result.
pub fn checksum(data: &[u8]) -> u16 {
    let mut fcs = INITIAL;
    for &byte in data {
        // LSB of the reversed byte is the MSB of the input
        let mut bits = byte.reverse_bits();
        for _ in 0..8 {
            let mask = if fcs & 0x8000 != 0 { POLYNOMIAL } else { 0 };
            fcs = (fcs << 1) | u16::from(bits & 1);
            bits >>= 1;
            fcs ^= mask;
        }
    }
    !fcs
}

/// CRC-16 frame check sequence codec. Detects corruption, never corrects it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Crc16;

impl ErrorCorrectingCode for Crc16 {
    /// Appends a zeroed checksum.
    fn initialize(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(&[0; FCS_LEN]);
    }

    fn compute(&self, buffer: &mut Vec<u8>) -> Result<()> {
        let len = buffer.len();
        if len < FCS_LEN {
            return Err(Error::InvalidState {
                len,
                expected: format!("at least {} bytes", FCS_LEN),
            });
        }
        let fcs = checksum(buffer);
        BigEndian::write_u16(&mut buffer[len - FCS_LEN..], fcs);
        Ok(())
    }

    /// Returns `Ok(false)` on a buffer too short to hold a checksum, leaving it
    /// untouched. Otherwise the checksum is stripped whatever the verdict, so
    /// the remaining bytes must not be trusted unless `Ok(true)` was returned.
    fn verify(&self, buffer: &mut Vec<u8>) -> Result<bool> {
        if buffer.len() < FCS_LEN {
            return Ok(false);
        }
        let residue = checksum(buffer);
        buffer.truncate(buffer.len() - FCS_LEN);
        if residue != 0 {
            debug!(len = buffer.len(), residue, "crc16 mismatch");
        }
        Ok(residue == 0)
    }

    fn overhead(&self, _payload_len: usize) -> usize {
        FCS_LEN
    }
}

#[cfg(test)]
const MODEM_FRAME: [u8; 17] = [
    0b0100_1000, 0b1001_0011, 0b0000_0001, 0b0000_0001, 0b0000_0001, 0b1001_0000, 0b1010_1101,
    0b0100_0000, 0b0000_0000, 0b0010_1001, 0b1000_0001, 0b1100_0001, 0b1100_0010, 0b1110_0010,
    0b0010_0011, // payload
    0xe4, 0x37, // fcs
];

#[cfg(test)]
const DIGITS_FRAME: &[u8] = b"123456789\xd6\x4e";

#[cfg(test)]
fn run_compute(frame: &[u8]) {
    let mut buffer = frame[..frame.len() - FCS_LEN].to_vec();
    Crc16.initialize(&mut buffer);
    assert_eq!(buffer.len(), frame.len());
    assert_eq!(&buffer[frame.len() - FCS_LEN..], &[0, 0]);
    Crc16.compute(&mut buffer).unwrap();
    assert_eq!(buffer, frame);
}

#[cfg(test)]
fn run_verify(frame: &[u8]) {
    let mut buffer = frame.to_vec();
    assert!(Crc16.verify(&mut buffer).unwrap());
    assert_eq!(buffer, &frame[..frame.len() - FCS_LEN]);
}

#[test]
fn modem_checksum() {
    run_compute(&MODEM_FRAME);
    run_verify(&MODEM_FRAME);
}

#[test]
fn digits_checksum() {
    run_compute(DIGITS_FRAME);
    run_verify(DIGITS_FRAME);
    assert_eq!(checksum(b"123456789\0\0"), 0xd64e);
}

#[test]
fn empty_checksum() {
    let mut buffer = vec![];
    Crc16.encode(&mut buffer).unwrap();
    assert_eq!(buffer, vec![0, 0]);
    assert!(Crc16.verify(&mut buffer).unwrap());
    assert!(buffer.is_empty());
}

#[test]
fn encoded_sums_to_zero() {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    for len in 0..64 {
        let mut buffer: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        Crc16.encode(&mut buffer).unwrap();
        assert_eq!(checksum(&buffer), 0);
    }
}

#[test]
fn bad_input() {
    let mut buffer = vec![0x23, 0x42, 0x47, 0x11, 0x08, 0x15];
    assert!(!Crc16.verify(&mut buffer).unwrap());
    // stripped anyway
    assert_eq!(buffer, vec![0x23, 0x42, 0x47, 0x11]);
}

#[test]
fn short_input() {
    let mut buffer = vec![];
    assert!(!Crc16.verify(&mut buffer).unwrap());
    let mut buffer = vec![0xd6];
    assert!(!Crc16.verify(&mut buffer).unwrap());
    assert_eq!(buffer, vec![0xd6]);
}

#[test]
fn compute_uninitialized() {
    let mut buffer = vec![0x42];
    assert!(matches!(
        Crc16.compute(&mut buffer),
        Err(Error::InvalidState { len: 1, .. })
    ));
    assert_eq!(buffer, vec![0x42]);
}

#[test]
fn detects_single_bit_flips() {
    let mut frame = MODEM_FRAME.to_vec();
    frame.truncate(frame.len() - FCS_LEN);
    Crc16.encode(&mut frame).unwrap();
    for bit in 0..frame.len() * 8 {
        let mut buffer = frame.clone();
        buffer[bit / 8] ^= 1 << (bit % 8);
        assert!(!Crc16.verify(&mut buffer).unwrap(), "flip of bit {} undetected", bit);
    }
}
