//! C entry points. Buffers are caller owned: `len` bytes are valid, `capacity`
//! bytes are writable. Negative return values signal failure.
#![allow(clippy::missing_safety_doc)]

use crate::{Crc16, ErrorCorrectingCode, Hamming};

unsafe fn write_back(buffer: &[u8], data: *mut u8, capacity: usize) -> isize {
    if buffer.len() > capacity {
        return -1;
    }
    std::ptr::copy_nonoverlapping(buffer.as_ptr(), data, buffer.len());
    buffer.len() as isize
}

#[no_mangle]
pub unsafe extern "C" fn linecode_crc16_encode(data: *mut u8, len: usize, capacity: usize) -> isize {
    let mut buffer = std::slice::from_raw_parts(data, len).to_vec();
    match Crc16.encode(&mut buffer) {
        Ok(()) => write_back(&buffer, data, capacity),
        Err(_) => -1,
    }
}

/// The payload is left in the first `len - 2` bytes whatever the verdict.
#[no_mangle]
pub unsafe extern "C" fn linecode_crc16_verify(data: *const u8, len: usize) -> bool {
    let mut buffer = std::slice::from_raw_parts(data, len).to_vec();
    Crc16.verify(&mut buffer).unwrap_or(false)
}

/// Returns null if `codebits` is not a supported Hamming code size.
#[no_mangle]
pub unsafe extern "C" fn linecode_hamming_new(codebits: usize) -> *mut Hamming {
    match Hamming::new(codebits) {
        Ok(hamming) => Box::into_raw(Box::new(hamming)),
        Err(_) => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn linecode_hamming_free(hamming: *mut Hamming) {
    if !hamming.is_null() {
        drop(Box::from_raw(hamming));
    }
}

#[no_mangle]
pub unsafe extern "C" fn linecode_hamming_encoded_len(hamming: *const Hamming, len: usize) -> usize {
    (*hamming).encoded_len(len)
}

#[no_mangle]
pub unsafe extern "C" fn linecode_hamming_encode(
    hamming: *const Hamming,
    data: *mut u8,
    len: usize,
    capacity: usize,
) -> isize {
    let mut buffer = std::slice::from_raw_parts(data, len).to_vec();
    match (*hamming).encode(&mut buffer) {
        Ok(()) => write_back(&buffer, data, capacity),
        Err(_) => -1,
    }
}

/// Decodes in place and returns the decoded length, padding included.
#[no_mangle]
pub unsafe extern "C" fn linecode_hamming_verify(
    hamming: *const Hamming,
    data: *mut u8,
    len: usize,
) -> isize {
    let mut buffer = std::slice::from_raw_parts(data, len).to_vec();
    match (*hamming).verify(&mut buffer) {
        Ok(_) => write_back(&buffer, data, len),
        Err(_) => -1,
    }
}

#[test]
fn crc16_both() {
    unsafe {
        let mut buffer = [0u8; 11];
        buffer[..9].clone_from_slice(b"123456789");
        assert_eq!(linecode_crc16_encode(buffer.as_mut_ptr(), 9, 11), 11);
        assert_eq!(&buffer[9..], &[0xd6, 0x4e]);
        assert!(linecode_crc16_verify(buffer.as_ptr(), 11));
        assert_eq!(linecode_crc16_encode(buffer.as_mut_ptr(), 9, 10), -1);
        assert!(!linecode_crc16_verify(buffer.as_ptr(), 1));
    }
}

#[test]
fn hamming_both() {
    unsafe {
        assert!(linecode_hamming_new(6).is_null());
        let hamming = linecode_hamming_new(15);
        let expected = [0xf4, 0x4f];
        let mut buffer = [0u8; 4];
        buffer[..2].clone_from_slice(&expected);
        assert_eq!(linecode_hamming_encoded_len(hamming, 2), 4);
        assert_eq!(linecode_hamming_encode(hamming, buffer.as_mut_ptr(), 2, 3), -1);
        assert_eq!(linecode_hamming_encode(hamming, buffer.as_mut_ptr(), 2, 4), 4);
        assert_eq!(buffer, [0xaa, 0x7f, 0x4c, 0x00]);
        buffer[1] ^= 0x10;
        assert_eq!(linecode_hamming_verify(hamming, buffer.as_mut_ptr(), 4), 3);
        assert_eq!(buffer[..2], expected);
        assert_eq!(linecode_hamming_verify(hamming, buffer.as_mut_ptr(), 3), -1);
        linecode_hamming_free(hamming);
    }
}
