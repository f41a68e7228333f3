//! Error types for decoding and stream reassembly.

use crate::types::ErrorCode;
use thiserror::Error;

/// Failure to decode a record or header from a byte span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The span ended before the declared field layout did.
    #[error("unexpected end of input: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        /// Bytes required to continue decoding.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// The record type tag does not name any known record.
    #[error("unknown record type tag {0}")]
    UnknownRecordType(u32),

    /// A wire enum field held a value outside its closed range.
    #[error("invalid {what} discriminant {value}")]
    InvalidDiscriminant {
        /// Field name, e.g. "heartbeat kind".
        what: &'static str,
        /// Raw value found on the wire.
        value: u64,
    },

    /// A length-prefixed string was not valid UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    /// A typed decode was requested for a record carrying a different tag.
    #[error("record type mismatch: expected {expected}, found tag {actual}")]
    TypeMismatch {
        /// Record type the caller asked for.
        expected: &'static str,
        /// Tag actually present in the header.
        actual: u32,
    },

    /// A length prefix disagreed with the bytes actually present.
    #[error("declared length {declared} exceeds remaining {actual} bytes")]
    LengthMismatch {
        /// Length claimed by the prefix.
        declared: usize,
        /// Bytes remaining in the span.
        actual: usize,
    },
}

/// Failure while reassembling records from a byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A record header declared a payload larger than the negotiated limit.
    #[error("payload of {length} bytes exceeds limit of {limit}")]
    PayloadTooLarge {
        /// Declared payload length.
        length: u32,
        /// Negotiated payload limit.
        limit: u32,
    },

    /// The bytes between headers failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl StreamError {
    /// The on-wire error code a session layer should report to the peer
    /// for this violation.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            StreamError::PayloadTooLarge { .. } => ErrorCode::PayloadTooLarge,
            StreamError::Decode(DecodeError::UnknownRecordType(_)) => ErrorCode::UnknownRecordType,
            StreamError::Decode(_) => ErrorCode::SequenceError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_error_maps_to_wire_codes() {
        let err = StreamError::PayloadTooLarge {
            length: 2048,
            limit: 1024,
        };
        assert_eq!(err.error_code(), ErrorCode::PayloadTooLarge);

        let err = StreamError::Decode(DecodeError::UnknownRecordType(99));
        assert_eq!(err.error_code(), ErrorCode::UnknownRecordType);

        let err = StreamError::Decode(DecodeError::InvalidUtf8);
        assert_eq!(err.error_code(), ErrorCode::SequenceError);
    }

    #[test]
    fn decode_error_messages_are_descriptive() {
        let err = DecodeError::UnexpectedEof {
            needed: 8,
            available: 3,
        };
        assert!(err.to_string().contains("needed 8"));

        let err = DecodeError::UnknownRecordType(42);
        assert!(err.to_string().contains("42"));
    }
}
