//! Error detecting and correcting line codecs over byte buffers.
//!
//! Two codecs share the [`ErrorCorrectingCode`] contract:
//! - [`Hamming`]: `(2^n - 1, 2^n - n - 1)` block codes, correcting one flipped bit per code word;
//! - [`Crc16`]: an inverted CRC-16-CCITT frame check sequence, detecting corruption.
//!
//! ```
//! use linecode::{Crc16, ErrorCorrectingCode, Hamming};
//!
//! let hamming = Hamming::new(7).unwrap();
//! let mut buffer = b"payload".to_vec();
//! hamming.encode(&mut buffer).unwrap();
//! buffer[3] ^= 0x04;
//! assert!(hamming.verify(&mut buffer).unwrap());
//! assert_eq!(&buffer[..7], b"payload");
//!
//! let mut buffer = b"payload".to_vec();
//! Crc16.encode(&mut buffer).unwrap();
//! buffer[0] ^= 0x01;
//! assert!(!Crc16.verify(&mut buffer).unwrap());
//! ```

pub mod bitvec;
pub mod bitwise;
pub mod crc16;
mod error;
pub mod hamming;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use crc16::Crc16;
pub use error::{Error, Result};
pub use hamming::Hamming;

/// An error detecting or correcting code.
///
/// Some codes rearrange the memory layout of the data they protect, so
/// [`initialize`](Self::initialize) must run before [`compute`](Self::compute).
/// [`verify`](Self::verify) undoes both, leaving the original data plus
/// possibly some zero padding.
///
/// Codecs hold only immutable configuration and may be shared between threads;
/// a single buffer must not be handed to two calls at once.
pub trait ErrorCorrectingCode: Send + Sync {
    /// Reshapes `buffer` to carry the code computed by [`compute`](Self::compute).
    fn initialize(&self, buffer: &mut Vec<u8>);

    /// Computes the code of a buffer prepared by [`initialize`](Self::initialize)
    /// and embeds it.
    ///
    /// Fails with [`Error::InvalidState`] if the buffer cannot have been
    /// initialized by this codec; the buffer is left untouched in that case.
    fn compute(&self, buffer: &mut Vec<u8>) -> Result<()>;

    /// Checks and, if the code allows it, corrects `buffer`, then strips the
    /// code from it.
    ///
    /// Returns `Ok(true)` when the data is considered valid. What "valid"
    /// means depends on the codec; see [`Crc16`] and [`Hamming`].
    fn verify(&self, buffer: &mut Vec<u8>) -> Result<bool>;

    /// Number of bytes [`encode`](Self::encode) adds to a payload of `payload_len` bytes.
    fn overhead(&self, payload_len: usize) -> usize;

    /// [`initialize`](Self::initialize) followed by [`compute`](Self::compute).
    fn encode(&self, buffer: &mut Vec<u8>) -> Result<()> {
        self.initialize(buffer);
        self.compute(buffer)
    }
}
