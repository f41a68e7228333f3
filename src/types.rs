//! Wire-significant enumerations shared by all records.
//!
//! Every enum here has a fixed on-wire representation; decode paths reject
//! out-of-range values instead of carrying garbage discriminants forward.

use crate::error::DecodeError;
use bitflags::bitflags;

/// Tag identifying which record variant a payload decodes as (u32 on wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RecordType {
    /// Protocol violation report.
    ProtocolError = 0,
    /// Client handshake opener.
    ClientHello = 1,
    /// Server handshake reply carrying session limits.
    ServerHello = 2,
    /// Client signals it finished loading and accepts traffic.
    ClientReady = 3,
    /// Typed end-of-session signal, no payload.
    Disconnect = 4,
    /// Round-trip time / clock-offset measurement.
    Heartbeat = 5,
    /// Rate-limit warning or enforcement notice.
    RateLimit = 6,
    /// Scene synchronization payload (opaque to this layer).
    Scene = 7,
    /// Physics synchronization payload (opaque to this layer).
    Physics = 8,
    /// Replicated virtual-axis input sample.
    ClientInput = 9,
    /// Application-defined payload (opaque to this layer).
    User = 10,
}

impl TryFrom<u32> for RecordType {
    type Error = DecodeError;

    fn try_from(value: u32) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(RecordType::ProtocolError),
            1 => Ok(RecordType::ClientHello),
            2 => Ok(RecordType::ServerHello),
            3 => Ok(RecordType::ClientReady),
            4 => Ok(RecordType::Disconnect),
            5 => Ok(RecordType::Heartbeat),
            6 => Ok(RecordType::RateLimit),
            7 => Ok(RecordType::Scene),
            8 => Ok(RecordType::Physics),
            9 => Ok(RecordType::ClientInput),
            10 => Ok(RecordType::User),
            _ => Err(DecodeError::UnknownRecordType(value)),
        }
    }
}

/// Protocol-level error taxonomy carried in [`crate::records::ProtocolError`]
/// records (u32 on wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    /// No error.
    None = 0,
    /// Peer sent a record tag outside the known range.
    UnknownRecordType = 1,
    /// Records arrived out of the expected order.
    SequenceError = 2,
    /// Peers disagree on the protocol version.
    ProtocolVersionMismatch = 3,
    /// A record payload exceeded the negotiated limit.
    PayloadTooLarge = 4,
    /// Peer exceeded the negotiated record rate.
    RateLimit = 5,
    /// Peer failed to answer heartbeats in time.
    HeartbeatTimeout = 6,
    /// Peers run incompatible game builds.
    GameVersionMismatch = 7,
}

impl TryFrom<u32> for ErrorCode {
    type Error = DecodeError;

    fn try_from(value: u32) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(ErrorCode::None),
            1 => Ok(ErrorCode::UnknownRecordType),
            2 => Ok(ErrorCode::SequenceError),
            3 => Ok(ErrorCode::ProtocolVersionMismatch),
            4 => Ok(ErrorCode::PayloadTooLarge),
            5 => Ok(ErrorCode::RateLimit),
            6 => Ok(ErrorCode::HeartbeatTimeout),
            7 => Ok(ErrorCode::GameVersionMismatch),
            _ => Err(DecodeError::InvalidDiscriminant {
                what: "error code",
                value: value as u64,
            }),
        }
    }
}

/// How seriously the receiving side should treat a protocol error
/// (u16 on wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum ErrorSeverity {
    /// Informational, no action required.
    Info = 0,
    /// Recoverable; the session continues.
    Warning = 1,
    /// The offending record was dropped.
    Error = 2,
    /// The session cannot continue.
    Fatal = 3,
}

impl TryFrom<u16> for ErrorSeverity {
    type Error = DecodeError;

    fn try_from(value: u16) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(ErrorSeverity::Info),
            1 => Ok(ErrorSeverity::Warning),
            2 => Ok(ErrorSeverity::Error),
            3 => Ok(ErrorSeverity::Fatal),
            _ => Err(DecodeError::InvalidDiscriminant {
                what: "error severity",
                value: value as u64,
            }),
        }
    }
}

/// Opaque protocol version tag carried in every container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolVersion(pub u32);

impl ProtocolVersion {
    /// First and current protocol revision.
    pub const V1: Self = Self(1);
}

bitflags! {
    /// Virtual-axis state bits replicated with each input sample.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputFlags: u8 {
        /// Axis transitioned to active this frame.
        const PRESSED = 0b0000_0001;
        /// Axis is being held.
        const HELD = 0b0000_0010;
        /// Axis transitioned to inactive this frame.
        const RELEASED = 0b0000_0100;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_type_tags_match_wire_values() {
        assert_eq!(RecordType::ProtocolError as u32, 0);
        assert_eq!(RecordType::ClientHello as u32, 1);
        assert_eq!(RecordType::ServerHello as u32, 2);
        assert_eq!(RecordType::ClientReady as u32, 3);
        assert_eq!(RecordType::Disconnect as u32, 4);
        assert_eq!(RecordType::Heartbeat as u32, 5);
        assert_eq!(RecordType::RateLimit as u32, 6);
        assert_eq!(RecordType::Scene as u32, 7);
        assert_eq!(RecordType::Physics as u32, 8);
        assert_eq!(RecordType::ClientInput as u32, 9);
        assert_eq!(RecordType::User as u32, 10);
    }

    #[test]
    fn record_type_roundtrips_through_u32() {
        for tag in 0..=10u32 {
            let ty = RecordType::try_from(tag).unwrap();
            assert_eq!(ty as u32, tag);
        }
    }

    #[test]
    fn unknown_record_tag_rejected() {
        assert_eq!(
            RecordType::try_from(11),
            Err(DecodeError::UnknownRecordType(11))
        );
        assert!(RecordType::try_from(u32::MAX).is_err());
    }

    #[test]
    fn error_code_range_enforced() {
        assert_eq!(ErrorCode::try_from(7), Ok(ErrorCode::GameVersionMismatch));
        assert!(ErrorCode::try_from(8).is_err());
    }

    #[test]
    fn severity_range_enforced() {
        assert_eq!(ErrorSeverity::try_from(3), Ok(ErrorSeverity::Fatal));
        assert!(ErrorSeverity::try_from(4).is_err());
    }

    #[test]
    fn severity_ordering() {
        assert!(ErrorSeverity::Fatal > ErrorSeverity::Warning);
        assert!(ErrorSeverity::Info < ErrorSeverity::Error);
    }

    #[test]
    fn input_flags_byte_roundtrip() {
        let flags = InputFlags::PRESSED | InputFlags::HELD;
        let bits = flags.bits();
        assert_eq!(InputFlags::from_bits_retain(bits), flags);
    }
}
