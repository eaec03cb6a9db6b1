use std::fmt::{Debug, Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    /// Malformed call parameters: bad bit counts, mismatched buffer lengths,
    /// empty input, impossible block splits.
    InvalidArgument(&'static str),
    /// Input text cannot be represented in the chosen mode or byte encoding.
    EncodingError(&'static str),
    /// No version and EC level combination, or the explicitly pinned one,
    /// can hold the encoded payload.
    DataTooBig,
    /// Inversion of the zero element or division by the zero polynomial.
    DivisionByZero,
    /// An invariant the encoder itself maintains was violated. Indicates a
    /// bug in this crate, never a problem with caller input.
    InternalConsistency(&'static str),
}

impl Display for QRError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match *self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::EncodingError(msg) => write!(f, "encoding error: {msg}"),
            Self::DataTooBig => f.write_str("data too big"),
            Self::DivisionByZero => f.write_str("division by zero"),
            Self::InternalConsistency(msg) => write!(f, "internal consistency: {msg}"),
        }
    }
}

impl std::error::Error for QRError {}

pub type QRResult<T> = Result<T, QRError>;
