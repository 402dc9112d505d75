//! Error types for encoding and decoding.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Debug, Error)]
pub enum HuffmanError {
    /// I/O error from the underlying source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source ran dry while a bit, byte or character was still required.
    #[error("unexpected end of stream after {bytes_read} bytes")]
    UnexpectedEof { bytes_read: u64 },

    /// Bytes that do not form a UTF-8 character within four bytes.
    #[error("malformed character: bytes {bytes:02x?} are not valid UTF-8")]
    MalformedChar { bytes: Vec<u8> },

    /// A character met during the payload pass has no code.
    #[error("character {0:?} has no entry in the lookup table")]
    LookupMiss(char),

    /// The input produced a different number of characters on the second pass.
    #[error("input changed between passes: counted {expected} characters, encoded {actual}")]
    InputChanged { expected: u64, actual: u64 },

    #[error("corrupted header: {0}")]
    CorruptedHeader(String),

    #[error("corrupted payload: {0}")]
    CorruptedPayload(String),
}

impl HuffmanError {
    pub fn malformed(bytes: &[u8]) -> Self {
        HuffmanError::MalformedChar {
            bytes: bytes.to_vec(),
        }
    }

    pub fn header(message: impl Into<String>) -> Self {
        HuffmanError::CorruptedHeader(message.into())
    }

    pub fn payload(message: impl Into<String>) -> Self {
        HuffmanError::CorruptedPayload(message.into())
    }

    /// Short stable name for log fields.
    pub fn category(&self) -> &'static str {
        match self {
            HuffmanError::Io(_) => "io_error",
            HuffmanError::UnexpectedEof { .. } => "unexpected_eof",
            HuffmanError::MalformedChar { .. } => "malformed_char",
            HuffmanError::LookupMiss(_) => "lookup_miss",
            HuffmanError::InputChanged { .. } => "input_changed",
            HuffmanError::CorruptedHeader(_) => "corrupted_header",
            HuffmanError::CorruptedPayload(_) => "corrupted_payload",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_messages() {
        let err = HuffmanError::malformed(&[0xc3, 0x28]);
        assert_eq!(
            err.to_string(),
            "malformed character: bytes [c3, 28] are not valid UTF-8"
        );
        assert_eq!(err.category(), "malformed_char");

        let err = HuffmanError::InputChanged {
            expected: 4,
            actual: 3,
        };
        assert!(err.to_string().contains("counted 4 characters, encoded 3"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: HuffmanError = io.into();
        assert_eq!(err.category(), "io_error");
    }
}
