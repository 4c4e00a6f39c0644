use thiserror::Error;

use super::codec::Mode;

// Error
//------------------------------------------------------------------------------

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum QRError {
    // Input
    #[error("Invalid character {ch:?} for {mode:?} mode")]
    InvalidChar { ch: char, mode: Mode },

    // Configuration
    #[error("Invalid version {0}, expected 1 to 40")]
    InvalidVersion(usize),
    #[error("Invalid error correction level {0:?}, expected one of L, M, Q, H")]
    InvalidECLevel(char),
    #[error("Invalid masking pattern {0}, expected 0 to 7")]
    InvalidMaskingPattern(u8),
    #[error("Invalid ecc codeword count {ecc} for {data} data codewords")]
    InvalidEccCount { ecc: usize, data: usize },
    #[error("Data length mismatch: expected {expected} codewords, found {found}")]
    DataLengthMismatch { expected: usize, found: usize },
    #[error("Codeword index {index} out of range for {total} codewords")]
    CodewordOutOfRange { index: usize, total: usize },

    // Capacity
    #[error("Data too long: {required} bits required, {capacity} bits available")]
    DataTooLong { required: usize, capacity: usize },

    // Reed-Solomon decoder
    #[error("Too many errors to correct successfully: {0}")]
    TooManyError(&'static str),

    // Invariants
    #[error("Division by zero in GF(256)")]
    DivisionByZero,
    #[error("Logarithm of zero in GF(256)")]
    LogOfZero,
    #[error("Empty module found at ({r}, {c}) after data placement")]
    EmptyModule { r: usize, c: usize },
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ErrorKind {
    InvalidInput,
    InvalidConfiguration,
    CapacityExceeded,
    DecodeFailure,
    InternalInvariantViolation,
}

impl QRError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidChar { .. } => ErrorKind::InvalidInput,
            Self::InvalidVersion(_)
            | Self::InvalidECLevel(_)
            | Self::InvalidMaskingPattern(_)
            | Self::InvalidEccCount { .. }
            | Self::DataLengthMismatch { .. }
            | Self::CodewordOutOfRange { .. } => ErrorKind::InvalidConfiguration,
            Self::DataTooLong { .. } => ErrorKind::CapacityExceeded,
            Self::TooManyError(_) => ErrorKind::DecodeFailure,
            Self::DivisionByZero | Self::LogOfZero | Self::EmptyModule { .. } => {
                ErrorKind::InternalInvariantViolation
            }
        }
    }
}

pub type QRResult<T> = Result<T, QRError>;

#[cfg(test)]
mod error_tests {
    use test_case::test_case;

    use super::{ErrorKind, QRError};
    use crate::codec::Mode;

    #[test_case(QRError::InvalidChar { ch: 'a', mode: Mode::Numeric }, ErrorKind::InvalidInput)]
    #[test_case(QRError::InvalidVersion(41), ErrorKind::InvalidConfiguration)]
    #[test_case(QRError::InvalidECLevel('X'), ErrorKind::InvalidConfiguration)]
    #[test_case(QRError::DataTooLong { required: 200, capacity: 128 }, ErrorKind::CapacityExceeded)]
    #[test_case(QRError::TooManyError("sigmaTilde(0) was zero"), ErrorKind::DecodeFailure)]
    #[test_case(QRError::EmptyModule { r: 3, c: 4 }, ErrorKind::InternalInvariantViolation)]
    #[test_case(QRError::DivisionByZero, ErrorKind::InternalInvariantViolation)]
    fn test_kind(err: QRError, kind: ErrorKind) {
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn test_display() {
        let err = QRError::InvalidChar { ch: 'a', mode: Mode::Alphanumeric };
        assert_eq!(err.to_string(), "Invalid character 'a' for Alphanumeric mode");
        let err = QRError::DataTooLong { required: 200, capacity: 128 };
        assert_eq!(err.to_string(), "Data too long: 200 bits required, 128 bits available");
    }
}
