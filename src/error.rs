#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// `codebits` is not of the form `2^n - 1` with `n >= 2`.
    #[error("{codebits} code bits violates hamming constraints, must be a power of two minus one (at least 3)")]
    InvalidCodeBits { codebits: usize },

    /// The syndrome accumulator cannot hold that many parity bits.
    #[error("{parity_bits} parity bits requested, at most {max} are supported")]
    TooManyParityBits { parity_bits: usize, max: usize },

    /// A padded code word would span more bits than a word offset can address.
    #[error("code words of {codebits} bits are too large")]
    WordTooLarge { codebits: usize },

    /// The buffer has not been shaped by `initialize` for this codec.
    #[error("buffer of {len} bytes has not been initialized properly (expected {expected})")]
    InvalidState { len: usize, expected: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[test]
fn messages() {
    let err = Error::InvalidCodeBits { codebits: 6 };
    assert_eq!(
        err.to_string(),
        "6 code bits violates hamming constraints, must be a power of two minus one (at least 3)"
    );
    let err = Error::InvalidState {
        len: 5,
        expected: "a multiple of 2 bytes".into(),
    };
    assert_eq!(
        err.to_string(),
        "buffer of 5 bytes has not been initialized properly (expected a multiple of 2 bytes)"
    );
}
